use std::sync::Arc;

use crate::{
    database::CatalogRepository,
    error::{AppError, Result},
    models::{
        AdminAction, AdminActionQuery, AdminActionType, NewAdminAction, Product, Store,
        StoreRejection,
    },
    utils::{jwt::Claims, policy},
};

/// Admin approval workflow: `Pending -> Active | Deleted` for stores and
/// products. Every decision is written to the audit log in the same
/// transaction as the state change.
#[derive(Clone)]
pub struct ModerationService {
    catalog: Arc<dyn CatalogRepository>,
    require_active_store: bool,
}

impl ModerationService {
    pub fn new(catalog: Arc<dyn CatalogRepository>, require_active_store: bool) -> Self {
        Self {
            catalog,
            require_active_store,
        }
    }

    pub async fn pending_products(&self, admin: &Claims) -> Result<Vec<Product>> {
        policy::require_admin(admin)?;
        self.catalog.list_pending_products().await
    }

    pub async fn inactive_products(&self, admin: &Claims) -> Result<Vec<Product>> {
        policy::require_admin(admin)?;
        self.catalog.list_inactive_products().await
    }

    pub async fn inactive_stores(&self, admin: &Claims) -> Result<Vec<Store>> {
        policy::require_admin(admin)?;
        self.catalog.list_inactive_stores().await
    }

    /// Idempotent: approving an active product leaves it active.
    pub async fn approve_product(&self, admin: &Claims, id: i32) -> Result<Product> {
        policy::require_admin(admin)?;

        let product = self
            .catalog
            .find_product(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;

        let action = audit(
            admin,
            AdminActionType::ApproveProduct,
            id,
            format!("Approved product '{}'", product.name),
        );

        let product = self
            .catalog
            .approve_product(id, &action, self.require_active_store)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;

        tracing::info!("Admin {} approved product {}", admin.sub, id);
        Ok(product)
    }

    pub async fn disapprove_product(&self, admin: &Claims, id: i32) -> Result<()> {
        policy::require_admin(admin)?;

        let product = self
            .catalog
            .find_product(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;

        let action = audit(
            admin,
            AdminActionType::RejectProduct,
            id,
            format!("Rejected product '{}'", product.name),
        );

        if !self.catalog.reject_product(id, &action).await? {
            return Err(AppError::NotFound(format!("Product {} not found", id)));
        }

        tracing::info!("Admin {} rejected product {}", admin.sub, id);
        Ok(())
    }

    pub async fn approve_store(&self, admin: &Claims, id: i32) -> Result<Store> {
        policy::require_admin(admin)?;

        let store = self
            .catalog
            .find_store(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Store {} not found", id)))?;

        let action = audit(
            admin,
            AdminActionType::ApproveStore,
            id,
            format!("Approved store '{}'", store.name),
        );

        let store = self
            .catalog
            .approve_store(id, &action)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Store {} not found", id)))?;

        tracing::info!("Admin {} approved store {}", admin.sub, id);
        Ok(store)
    }

    /// Removes the store together with every product it owns.
    pub async fn reject_store(&self, admin: &Claims, id: i32) -> Result<StoreRejection> {
        policy::require_admin(admin)?;

        let store = self
            .catalog
            .find_store(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Store {} not found", id)))?;

        let action = audit(
            admin,
            AdminActionType::RejectStore,
            id,
            format!("Rejected store '{}'", store.name),
        );

        let products_removed = self
            .catalog
            .reject_store(id, &action)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Store {} not found", id)))?;

        tracing::info!(
            "Admin {} rejected store {} and removed {} products",
            admin.sub,
            id,
            products_removed
        );

        Ok(StoreRejection {
            store_id: id,
            products_removed,
        })
    }

    pub async fn actions(&self, admin: &Claims, query: &AdminActionQuery) -> Result<Vec<AdminAction>> {
        policy::require_admin(admin)?;
        self.catalog.list_admin_actions(query).await
    }
}

fn audit(admin: &Claims, action_type: AdminActionType, target: i32, details: String) -> NewAdminAction {
    NewAdminAction {
        action_type,
        target_id: target.to_string(),
        details,
        admin_id: admin.sub.clone(),
    }
}
