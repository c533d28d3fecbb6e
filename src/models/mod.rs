mod admin;
mod cart;
mod order;
mod product;
mod store;
mod user;

pub use admin::*;
pub use cart::*;
pub use order::*;
pub use product::*;
pub use store::*;
pub use user::*;
