// src/services/notification_service.rs

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    db::{InventoryTransaction, NotificationRepository},
    models::{
        notification::{Notification, NotificationDraft},
        product::Product,
    },
};

/// O que o serviço de inventário precisa saber sobre notificações:
/// avisar quando um produto cai no estoque baixo e limpar quando se recupera.
/// As escritas entram na transação da operação de estoque que as disparou.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Reavalia o produto e cria (ou renova) a notificação se estiver com estoque baixo.
    async fn check_and_notify(
        &self,
        tx: &mut dyn InventoryTransaction,
        product: &Product,
    ) -> Result<(), AppError>;

    /// Remove as notificações do produto. Devolve quantas existiam.
    async fn clear_for_product(
        &self,
        tx: &mut dyn InventoryTransaction,
        product_code: i32,
    ) -> Result<u64, AppError>;
}

#[derive(Clone)]
pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Notification>, AppError> {
        self.repo.list().await
    }

    pub async fn mark_read(&self, id: i64) -> Result<Notification, AppError> {
        self.repo
            .mark_read(id)
            .await?
            .ok_or(AppError::NotificationNotFound(id))
    }
}

fn low_stock_message(product: &Product) -> String {
    format!(
        "Stock bajo: {} tiene {} unidades (umbral mínimo: {})",
        product.name, product.stock, product.low_stock_threshold
    )
}

#[async_trait]
impl NotificationSink for NotificationService {
    async fn check_and_notify(
        &self,
        tx: &mut dyn InventoryTransaction,
        product: &Product,
    ) -> Result<(), AppError> {
        if !product.is_low_stock() {
            return Ok(());
        }

        let notification = tx
            .upsert_notification(NotificationDraft {
                product_code: product.code,
                message: low_stock_message(product),
                stock: product.stock,
                low_stock_threshold: product.low_stock_threshold,
            })
            .await?;

        tracing::info!(
            "🔔 Notificação {} registrada para o produto código: {}",
            notification.id,
            product.code
        );
        Ok(())
    }

    async fn clear_for_product(
        &self,
        tx: &mut dyn InventoryTransaction,
        product_code: i32,
    ) -> Result<u64, AppError> {
        tx.delete_notifications(product_code).await
    }
}
