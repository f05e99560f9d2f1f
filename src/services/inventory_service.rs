// src/services/inventory_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{ProductStore, SupplierStore},
    models::product::{NewProduct, Product},
    services::notification_service::NotificationSink,
};

pub struct CreateProductParams {
    pub name: String,
    pub supplier_id: i32,
    pub quantity: i32,
    pub price: Decimal,
    pub low_stock_threshold: i32,
    pub image: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct InventoryService {
    products: Arc<dyn ProductStore>,
    suppliers: Arc<dyn SupplierStore>,
    notifications: Arc<dyn NotificationSink>,
}

impl InventoryService {
    pub fn new(
        products: Arc<dyn ProductStore>,
        suppliers: Arc<dyn SupplierStore>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            products,
            suppliers,
            notifications,
        }
    }

    async fn find_active(&self, code: i32) -> Result<Product, AppError> {
        self.products
            .find_active_by_code(code)
            .await?
            .ok_or(AppError::ProductNotFound(code))
    }

    // --- CREATE ---
    pub async fn create_product(&self, params: CreateProductParams) -> Result<Product, AppError> {
        tracing::info!(
            "📦 Tentando criar produto: {} do fornecedor ID: {}",
            params.name,
            params.supplier_id
        );

        if params.quantity < 0 {
            return Err(AppError::InvalidAmount(params.quantity));
        }
        if params.low_stock_threshold < 0 {
            return Err(AppError::InvalidAmount(params.low_stock_threshold));
        }

        // 1. Produto ativo com o mesmo nome e fornecedor?
        let existing = self
            .products
            .find_active_by_name_and_supplier(&params.name, params.supplier_id)
            .await?;
        if existing.is_some() {
            tracing::warn!(
                "⚠️ Produto duplicado detectado: {} do fornecedor ID: {}",
                params.name,
                params.supplier_id
            );
            return Err(AppError::DuplicateProduct);
        }

        // 2. Fornecedor
        let supplier = self
            .suppliers
            .find_by_id(params.supplier_id)
            .await?
            .ok_or(AppError::SupplierNotFound(params.supplier_id))?;

        // 3. Grava (o código é gerado pela persistência)
        let product = self
            .products
            .insert(NewProduct {
                name: params.name,
                stock: params.quantity,
                price: params.price,
                supplier_id: supplier.id,
                supplier_name: supplier.name,
                low_stock_threshold: params.low_stock_threshold,
                image: params.image,
                description: params.description,
            })
            .await?;

        tracing::info!(
            "✅ Produto criado: {} (Código: {}, Estoque: {}, Preço: ${})",
            product.name,
            product.code,
            product.stock,
            product.price
        );
        Ok(product)
    }

    // --- LIST ---
    pub async fn list_active(&self) -> Result<Vec<Product>, AppError> {
        self.products.list_active().await
    }

    pub async fn list_low_stock(&self) -> Result<Vec<Product>, AppError> {
        let products = self.products.list_active().await?;
        Ok(products.into_iter().filter(Product::is_low_stock).collect())
    }

    // --- DELETE (soft) ---
    pub async fn delete_product(&self, code: i32) -> Result<(), AppError> {
        tracing::info!("🗑️ Tentando remover produto com código: {}", code);

        let mut product = self.find_active(code).await?;
        product.active = false;

        let mut tx = self.products.begin().await?;
        let product = tx.update_product(&product).await?;
        // Produto inativo não recebe mais reposição; a notificação ficaria órfã.
        let cleared = self
            .notifications
            .clear_for_product(tx.as_mut(), code)
            .await?;
        tx.commit().await?;

        tracing::info!(
            "✅ Produto removido: {} (Código: {}, notificações removidas: {})",
            product.name,
            code,
            cleared
        );
        Ok(())
    }

    // --- INCREASE STOCK ---
    pub async fn increase_stock(&self, code: i32, amount: i32) -> Result<Product, AppError> {
        tracing::info!(
            "📈 Aumentando estoque do produto código: {} em {} unidades",
            code,
            amount
        );

        if amount < 0 {
            return Err(AppError::InvalidAmount(amount));
        }

        let mut product = self.find_active(code).await?;
        let previous_stock = product.stock;
        product.stock = previous_stock
            .checked_add(amount)
            .ok_or(AppError::InvalidAmount(amount))?;

        let mut tx = self.products.begin().await?;
        let updated = tx.update_product(&product).await?;

        // Estoque reposto acima do limite: as notificações deixam de valer.
        let mut cleared = 0;
        if !updated.is_low_stock() {
            cleared = self
                .notifications
                .clear_for_product(tx.as_mut(), code)
                .await?;
        }
        tx.commit().await?;

        tracing::info!(
            "✅ Estoque aumentado: {} - Estoque anterior: {}, Estoque novo: {}",
            updated.name,
            previous_stock,
            updated.stock
        );
        if cleared > 0 {
            tracing::info!(
                "🔔 Notificações removidas para o produto código: {} (estoque recuperado)",
                code
            );
        }

        Ok(updated)
    }

    // --- DECREASE STOCK ---
    pub async fn decrease_stock(&self, code: i32, amount: i32) -> Result<Product, AppError> {
        tracing::info!(
            "📉 Diminuindo estoque do produto código: {} em {} unidades",
            code,
            amount
        );

        if amount < 0 {
            return Err(AppError::InvalidAmount(amount));
        }

        let mut product = self.find_active(code).await?;
        let previous_stock = product.stock;
        let new_stock = previous_stock - amount;

        if new_stock < 0 {
            tracing::warn!(
                "⚠️ Estoque insuficiente para o produto código: {} - Estoque atual: {}, Tentou diminuir: {}",
                code,
                previous_stock,
                amount
            );
            return Err(AppError::InsufficientStock {
                current: previous_stock,
            });
        }

        product.stock = new_stock;

        let mut tx = self.products.begin().await?;
        let updated = tx.update_product(&product).await?;
        self.notifications
            .check_and_notify(tx.as_mut(), &updated)
            .await?;
        tx.commit().await?;

        tracing::info!(
            "✅ Estoque diminuído: {} - Estoque anterior: {}, Estoque novo: {}",
            updated.name,
            previous_stock,
            updated.stock
        );

        if updated.is_low_stock() {
            tracing::warn!(
                "⚠️ ALERTA: Produto {} (código: {}) com estoque baixo. Estoque atual: {}, Limite: {}",
                updated.name,
                code,
                updated.stock,
                updated.low_stock_threshold
            );
        }

        Ok(updated)
    }

    // --- THRESHOLD ---
    // Só muda o limite; as notificações são reavaliadas na próxima movimentação.
    pub async fn update_threshold(&self, code: i32, threshold: i32) -> Result<Product, AppError> {
        tracing::info!(
            "🎯 Atualizando limite mínimo do produto código: {} para {} unidades",
            code,
            threshold
        );

        if threshold < 0 {
            return Err(AppError::InvalidAmount(threshold));
        }

        let mut product = self.find_active(code).await?;
        let previous_threshold = product.low_stock_threshold;
        product.low_stock_threshold = threshold;

        let mut tx = self.products.begin().await?;
        let updated = tx.update_product(&product).await?;
        tx.commit().await?;

        tracing::info!(
            "✅ Limite atualizado: {} - Limite anterior: {}, Limite novo: {}",
            updated.name,
            previous_threshold,
            updated.low_stock_threshold
        );
        Ok(updated)
    }
}
