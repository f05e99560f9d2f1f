// src/db/memory.rs

// Implementações em memória dos repositórios. Usadas pelos testes e pelo
// modo `INVENTORY_STORAGE=memory` (sem banco). Seguem as mesmas regras das
// versões Postgres: produto ativo único por (nome, fornecedor), versão
// verificada no update, uma notificação por produto, e as escritas de uma
// operação só valem no commit.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::{
    common::error::AppError,
    db::{InventoryTransaction, NotificationRepository, ProductStore, SupplierStore},
    models::{
        notification::{Notification, NotificationDraft},
        product::{NewProduct, Product},
        supplier::Supplier,
    },
};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, AppError> {
    mutex
        .lock()
        .map_err(|_| AppError::InternalServerError(anyhow::anyhow!("in-memory store poisoned")))
}

// Produtos e notificações ficam atrás do mesmo lock, como num único banco.
#[derive(Default, Clone)]
struct Tables {
    last_code: i32,
    // BTreeMap: a listagem sai ordenada por código, como no Postgres.
    products: BTreeMap<i32, Product>,
    last_notification_id: i64,
    notifications: Vec<Notification>,
}

impl Tables {
    fn update_product(&mut self, product: &Product) -> Result<Product, AppError> {
        let current = self
            .products
            .get_mut(&product.code)
            .filter(|p| p.version == product.version)
            .ok_or(AppError::ConcurrentModification(product.code))?;

        // Código, fornecedor e data de criação não mudam.
        current.name = product.name.clone();
        current.stock = product.stock;
        current.price = product.price;
        current.low_stock_threshold = product.low_stock_threshold;
        current.image = product.image.clone();
        current.description = product.description.clone();
        current.active = product.active;
        current.version += 1;
        current.updated_at = Utc::now();

        Ok(current.clone())
    }

    fn upsert_notification(&mut self, draft: NotificationDraft) -> Notification {
        let now = Utc::now();

        if let Some(existing) = self
            .notifications
            .iter_mut()
            .find(|n| n.product_code == draft.product_code)
        {
            existing.message = draft.message;
            existing.stock = draft.stock;
            existing.low_stock_threshold = draft.low_stock_threshold;
            existing.read = false;
            existing.updated_at = now;
            return existing.clone();
        }

        self.last_notification_id += 1;
        let notification = Notification {
            id: self.last_notification_id,
            product_code: draft.product_code,
            message: draft.message,
            stock: draft.stock,
            low_stock_threshold: draft.low_stock_threshold,
            read: false,
            created_at: now,
            updated_at: now,
        };
        self.notifications.push(notification.clone());
        notification
    }

    fn delete_notifications(&mut self, product_code: i32) -> u64 {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.product_code != product_code);
        (before - self.notifications.len()) as u64
    }
}

/// O "banco" em memória. Os repositórios criados a partir dele compartilham
/// as mesmas tabelas.
#[derive(Default, Clone)]
pub struct InMemoryDatabase {
    tables: Arc<AsyncMutex<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> InMemoryProductStore {
        InMemoryProductStore {
            tables: self.tables.clone(),
        }
    }

    pub fn notifications(&self) -> InMemoryNotificationRepository {
        InMemoryNotificationRepository {
            tables: self.tables.clone(),
        }
    }
}

// Segura o lock até o commit (ou o drop) e trabalha sobre uma cópia;
// o commit substitui as tabelas pela cópia.
pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
}

#[async_trait]
impl InventoryTransaction for InMemoryTransaction {
    async fn update_product(&mut self, product: &Product) -> Result<Product, AppError> {
        self.staged.update_product(product)
    }

    async fn upsert_notification(
        &mut self,
        draft: NotificationDraft,
    ) -> Result<Notification, AppError> {
        Ok(self.staged.upsert_notification(draft))
    }

    async fn delete_notifications(&mut self, product_code: i32) -> Result<u64, AppError> {
        Ok(self.staged.delete_notifications(product_code))
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let InMemoryTransaction { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}

// --- Produtos ---

#[derive(Default)]
pub struct InMemoryProductStore {
    tables: Arc<AsyncMutex<Tables>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_active_by_name_and_supplier(
        &self,
        name: &str,
        supplier_id: i32,
    ) -> Result<Option<Product>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .products
            .values()
            .find(|p| p.active && p.name == name && p.supplier_id == supplier_id)
            .cloned())
    }

    async fn find_active_by_code(&self, code: i32) -> Result<Option<Product>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.products.get(&code).filter(|p| p.active).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Product>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.products.values().filter(|p| p.active).cloned().collect())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, AppError> {
        let mut tables = self.tables.lock().await;

        let duplicate = tables
            .products
            .values()
            .any(|p| p.active && p.name == product.name && p.supplier_id == product.supplier_id);
        if duplicate {
            return Err(AppError::DuplicateProduct);
        }

        tables.last_code += 1;
        let now = Utc::now();
        let stored = Product {
            code: tables.last_code,
            name: product.name,
            stock: product.stock,
            price: product.price,
            supplier_id: product.supplier_id,
            supplier_name: product.supplier_name,
            low_stock_threshold: product.low_stock_threshold,
            image: product.image,
            description: product.description,
            active: true,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        tables.products.insert(stored.code, stored.clone());
        Ok(stored)
    }

    async fn begin(&self) -> Result<Box<dyn InventoryTransaction>, AppError> {
        let guard = self.tables.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryTransaction { guard, staged }))
    }
}

// --- Fornecedores ---

#[derive(Default)]
pub struct InMemorySupplierStore {
    rows: Mutex<Vec<Supplier>>,
}

impl InMemorySupplierStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fornecedores com ids 1..=n, na ordem dada.
    pub fn with_suppliers(names: &[&str]) -> Self {
        let now = Utc::now();
        let rows = names
            .iter()
            .zip(1..)
            .map(|(name, id)| Supplier {
                id,
                name: name.to_string(),
                created_at: now,
            })
            .collect();
        Self {
            rows: Mutex::new(rows),
        }
    }
}

#[async_trait]
impl SupplierStore for InMemorySupplierStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Supplier>, AppError> {
        let rows = lock(&self.rows)?;
        Ok(rows.iter().find(|s| s.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Supplier>, AppError> {
        let mut suppliers = lock(&self.rows)?.clone();
        suppliers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(suppliers)
    }

    async fn create(&self, name: &str) -> Result<Supplier, AppError> {
        let mut rows = lock(&self.rows)?;
        let id = rows.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let supplier = Supplier {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        rows.push(supplier.clone());
        Ok(supplier)
    }
}

// --- Notificações ---

pub struct InMemoryNotificationRepository {
    tables: Arc<AsyncMutex<Tables>>,
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn list(&self) -> Result<Vec<Notification>, AppError> {
        let mut notifications = self.tables.lock().await.notifications.clone();
        notifications.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(notifications)
    }

    async fn mark_read(&self, id: i64) -> Result<Option<Notification>, AppError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.notifications.iter_mut().find(|n| n.id == id).map(|n| {
            n.read = true;
            n.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn new_product(name: &str, supplier_id: i32) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            stock: 10,
            price: Decimal::new(2000, 2),
            supplier_id,
            supplier_name: "Pet Supplies SA".into(),
            low_stock_threshold: 5,
            image: None,
            description: None,
        }
    }

    fn draft(product_code: i32, stock: i32) -> NotificationDraft {
        NotificationDraft {
            product_code,
            message: format!("stock {stock}"),
            stock,
            low_stock_threshold: 5,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_codes() {
        let store = InMemoryProductStore::new();
        let a = store.insert(new_product("Dog Food", 1)).await.unwrap();
        let b = store.insert(new_product("Cat Food", 1)).await.unwrap();
        assert_eq!(a.code, 1);
        assert_eq!(b.code, 2);
        assert!(a.active);
    }

    #[tokio::test]
    async fn stale_version_is_rejected() {
        let store = InMemoryProductStore::new();
        let product = store.insert(new_product("Dog Food", 1)).await.unwrap();

        let mut first = product.clone();
        first.stock = 8;
        let mut tx = store.begin().await.unwrap();
        let saved = tx.update_product(&first).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(saved.version, product.version + 1);

        let mut second = product.clone();
        second.stock = 2;
        let mut tx = store.begin().await.unwrap();
        let err = tx.update_product(&second).await.unwrap_err();
        assert!(matches!(err, AppError::ConcurrentModification(code) if code == product.code));
        drop(tx);

        let current = store.find_active_by_code(product.code).await.unwrap().unwrap();
        assert_eq!(current.stock, 8);
    }

    #[tokio::test]
    async fn inactive_products_are_invisible() {
        let store = InMemoryProductStore::new();
        let mut product = store.insert(new_product("Dog Food", 1)).await.unwrap();
        product.active = false;
        let mut tx = store.begin().await.unwrap();
        tx.update_product(&product).await.unwrap();
        tx.commit().await.unwrap();

        assert!(store.find_active_by_code(product.code).await.unwrap().is_none());
        assert!(store.list_active().await.unwrap().is_empty());
        assert!(
            store
                .find_active_by_name_and_supplier("Dog Food", 1)
                .await
                .unwrap()
                .is_none()
        );
        // O nome fica livre para um novo produto.
        store.insert(new_product("Dog Food", 1)).await.unwrap();
    }

    #[tokio::test]
    async fn dropped_transaction_writes_nothing() {
        let db = InMemoryDatabase::new();
        let store = db.products();
        let notifications = db.notifications();
        let product = store.insert(new_product("Dog Food", 1)).await.unwrap();

        let mut changed = product.clone();
        changed.stock = 1;
        let mut tx = store.begin().await.unwrap();
        tx.update_product(&changed).await.unwrap();
        tx.upsert_notification(draft(product.code, 1)).await.unwrap();
        drop(tx);

        let current = store.find_active_by_code(product.code).await.unwrap().unwrap();
        assert_eq!(current.stock, 10);
        assert_eq!(current.version, product.version);
        assert!(notifications.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn notification_upsert_keeps_one_per_product() {
        let db = InMemoryDatabase::new();
        let store = db.products();
        let repo = db.notifications();

        let mut tx = store.begin().await.unwrap();
        let first = tx.upsert_notification(draft(3, 4)).await.unwrap();
        tx.commit().await.unwrap();
        repo.mark_read(first.id).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let second = tx.upsert_notification(draft(3, 2)).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.stock, 2);
        assert!(!second.read);
        assert_eq!(repo.list().await.unwrap().len(), 1);

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.delete_notifications(3).await.unwrap(), 1);
        tx.commit().await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }
}
