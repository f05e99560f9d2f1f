// src/db/transaction.rs

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use crate::{
    common::error::AppError,
    db::{PgNotificationRepository, PgProductRepository},
    models::{
        notification::{Notification, NotificationDraft},
        product::Product,
    },
};

/// Escritas de uma operação de inventário: o produto e as notificações dele.
/// Nada fica gravado antes do `commit`; descartar a transação desfaz tudo.
#[async_trait]
pub trait InventoryTransaction: Send {
    /// Grava o produto se `version` ainda for a versão persistida.
    /// O código nunca muda. Devolve o produto com a versão incrementada.
    async fn update_product(&mut self, product: &Product) -> Result<Product, AppError>;

    /// Cria a notificação do produto ou renova a existente (volta a "não lida").
    async fn upsert_notification(
        &mut self,
        draft: NotificationDraft,
    ) -> Result<Notification, AppError>;

    /// Remove as notificações do produto; devolve quantas foram removidas.
    async fn delete_notifications(&mut self, product_code: i32) -> Result<u64, AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}

pub struct PgInventoryTransaction {
    tx: Transaction<'static, Postgres>,
}

impl PgInventoryTransaction {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl InventoryTransaction for PgInventoryTransaction {
    async fn update_product(&mut self, product: &Product) -> Result<Product, AppError> {
        PgProductRepository::update_with(&mut *self.tx, product).await
    }

    async fn upsert_notification(
        &mut self,
        draft: NotificationDraft,
    ) -> Result<Notification, AppError> {
        PgNotificationRepository::upsert_with(&mut *self.tx, draft).await
    }

    async fn delete_notifications(&mut self, product_code: i32) -> Result<u64, AppError> {
        PgNotificationRepository::delete_by_product_with(&mut *self.tx, product_code).await
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
