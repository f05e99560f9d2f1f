// src/db/product_repo.rs

use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    db::transaction::{InventoryTransaction, PgInventoryTransaction},
    models::product::{NewProduct, Product},
};

/// Persistência de produtos. Toda leitura considera apenas produtos ativos.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find_active_by_name_and_supplier(
        &self,
        name: &str,
        supplier_id: i32,
    ) -> Result<Option<Product>, AppError>;

    async fn find_active_by_code(&self, code: i32) -> Result<Option<Product>, AppError>;

    async fn list_active(&self) -> Result<Vec<Product>, AppError>;

    /// Insere um produto ativo; o código é atribuído aqui.
    async fn insert(&self, product: NewProduct) -> Result<Product, AppError>;

    /// Abre a transação em que as alterações de um produto (e das suas
    /// notificações) são gravadas.
    async fn begin(&self) -> Result<Box<dyn InventoryTransaction>, AppError>;
}

// Colunas de `Product`; sempre com o produto como `p` e o fornecedor como `s`.
const PRODUCT_COLUMNS: &str = "p.code, p.name, p.stock, p.price, p.supplier_id, \
     s.name AS supplier_name, p.low_stock_threshold, p.image, p.description, \
     p.active, p.version, p.created_at, p.updated_at";

#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn update_with<'e, E>(executor: E, product: &Product) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            WITH p AS (
                UPDATE products SET
                    name = $2,
                    stock = $3,
                    price = $4,
                    low_stock_threshold = $5,
                    image = $6,
                    description = $7,
                    active = $8,
                    version = version + 1,
                    updated_at = NOW()
                WHERE code = $1 AND version = $9
                RETURNING *
            )
            SELECT {PRODUCT_COLUMNS} FROM p
            JOIN suppliers s ON s.id = p.supplier_id
            "#
        );
        let updated = sqlx::query_as::<_, Product>(&sql)
            .bind(product.code)
            .bind(&product.name)
            .bind(product.stock)
            .bind(product.price)
            .bind(product.low_stock_threshold)
            .bind(&product.image)
            .bind(&product.description)
            .bind(product.active)
            .bind(product.version)
            .fetch_optional(executor)
            .await?;

        // Nenhuma linha: outra transação gravou uma versão mais nova.
        updated.ok_or(AppError::ConcurrentModification(product.code))
    }
}

#[async_trait]
impl ProductStore for PgProductRepository {
    async fn find_active_by_name_and_supplier(
        &self,
        name: &str,
        supplier_id: i32,
    ) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             JOIN suppliers s ON s.id = p.supplier_id \
             WHERE p.active AND p.name = $1 AND p.supplier_id = $2"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(name)
            .bind(supplier_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn find_active_by_code(&self, code: i32) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             JOIN suppliers s ON s.id = p.supplier_id \
             WHERE p.active AND p.code = $1"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn list_active(&self) -> Result<Vec<Product>, AppError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p \
             JOIN suppliers s ON s.id = p.supplier_id \
             WHERE p.active ORDER BY p.code ASC"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, AppError> {
        let sql = format!(
            r#"
            WITH p AS (
                INSERT INTO products (name, stock, price, supplier_id, low_stock_threshold, image, description)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            SELECT {PRODUCT_COLUMNS} FROM p
            JOIN suppliers s ON s.id = p.supplier_id
            "#
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(&product.name)
            .bind(product.stock)
            .bind(product.price)
            .bind(product.supplier_id)
            .bind(product.low_stock_threshold)
            .bind(&product.image)
            .bind(&product.description)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                // O índice único parcial (name, supplier_id) WHERE active cobre a corrida
                // entre duas criações simultâneas.
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::DuplicateProduct;
                    }
                }
                e.into()
            })
    }

    async fn begin(&self) -> Result<Box<dyn InventoryTransaction>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgInventoryTransaction::new(tx)))
    }
}
