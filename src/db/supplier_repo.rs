// src/db/supplier_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{common::error::AppError, models::supplier::Supplier};

#[async_trait]
pub trait SupplierStore: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Supplier>, AppError>;
    async fn list(&self) -> Result<Vec<Supplier>, AppError>;
    async fn create(&self, name: &str) -> Result<Supplier, AppError>;
}

#[derive(Clone)]
pub struct PgSupplierRepository {
    pool: PgPool,
}

impl PgSupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SupplierStore for PgSupplierRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Supplier>, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>(
            "SELECT id, name, created_at FROM suppliers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(supplier)
    }

    async fn list(&self) -> Result<Vec<Supplier>, AppError> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            "SELECT id, name, created_at FROM suppliers ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(suppliers)
    }

    async fn create(&self, name: &str) -> Result<Supplier, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>(
            "INSERT INTO suppliers (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(supplier)
    }
}
