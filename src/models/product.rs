use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub store_id: i32,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub store_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub quantity: i32,
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub store_id: i32,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum SortBy {
    #[serde(rename = "price")]
    Price,
    #[serde(rename = "name")]
    Name,
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
}

impl SortBy {
    pub fn column(self) -> &'static str {
        match self {
            SortBy::Price => "price",
            SortBy::Name => "name",
            SortBy::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Buyer-facing listing criteria, as sent in the `GET /products` query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub store_name: Option<String>,
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
}

pub const DEFAULT_PAGE_SIZE: i64 = 12;
pub const MAX_PAGE_SIZE: i64 = 100;

impl ProductFilter {
    pub fn validate(&self) -> Result<()> {
        if matches!(self.page, Some(page) if page < 1) {
            return Err(AppError::BadRequest("page must be at least 1".to_string()));
        }

        if matches!(self.limit, Some(limit) if limit < 1) {
            return Err(AppError::BadRequest("limit must be at least 1".to_string()));
        }

        for price in [self.min_price, self.max_price].into_iter().flatten() {
            if price.is_sign_negative() {
                return Err(AppError::BadRequest(
                    "price bounds must not be negative".to_string(),
                ));
            }
        }

        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(AppError::BadRequest(
                    "minPrice must not exceed maxPrice".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Saturates, so an absurd page is simply past the end.
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Blank strings in the query string count as "not filtered".
    pub fn normalized(mut self) -> Self {
        fn non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        self.category = non_blank(self.category);
        self.store_name = non_blank(self.store_name);
        self.user_id = non_blank(self.user_id);
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}
