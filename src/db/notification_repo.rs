// src/db/notification_repo.rs

use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::notification::{Notification, NotificationDraft},
};

// Só leitura e marcação; criar e remover acontece dentro de uma
// `InventoryTransaction`, junto com a alteração do produto.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Mais recentes primeiro.
    async fn list(&self) -> Result<Vec<Notification>, AppError>;

    async fn mark_read(&self, id: i64) -> Result<Option<Notification>, AppError>;
}

const NOTIFICATION_COLUMNS: &str =
    "id, product_code, message, stock, low_stock_threshold, read, created_at, updated_at";

#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn upsert_with<'e, E>(
        executor: E,
        draft: NotificationDraft,
    ) -> Result<Notification, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // UPSERT: o índice único em product_code garante uma notificação por produto.
        let sql = format!(
            r#"
            INSERT INTO notifications (product_code, message, stock, low_stock_threshold)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (product_code)
            DO UPDATE SET
                message = EXCLUDED.message,
                stock = EXCLUDED.stock,
                low_stock_threshold = EXCLUDED.low_stock_threshold,
                read = FALSE,
                updated_at = NOW()
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        );
        let notification = sqlx::query_as::<_, Notification>(&sql)
            .bind(draft.product_code)
            .bind(&draft.message)
            .bind(draft.stock)
            .bind(draft.low_stock_threshold)
            .fetch_one(executor)
            .await?;
        Ok(notification)
    }

    pub async fn delete_by_product_with<'e, E>(
        executor: E,
        product_code: i32,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM notifications WHERE product_code = $1")
            .bind(product_code)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn list(&self) -> Result<Vec<Notification>, AppError> {
        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications ORDER BY updated_at DESC, id DESC"
        );
        let notifications = sqlx::query_as::<_, Notification>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(notifications)
    }

    async fn mark_read(&self, id: i64) -> Result<Option<Notification>, AppError> {
        let sql = format!(
            "UPDATE notifications SET read = TRUE WHERE id = $1 RETURNING {NOTIFICATION_COLUMNS}"
        );
        let notification = sqlx::query_as::<_, Notification>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(notification)
    }
}
