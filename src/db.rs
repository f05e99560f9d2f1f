pub mod memory;
pub mod notification_repo;
pub mod product_repo;
pub mod supplier_repo;
pub mod transaction;

pub use notification_repo::{NotificationRepository, PgNotificationRepository};
pub use product_repo::{PgProductRepository, ProductStore};
pub use supplier_repo::{PgSupplierRepository, SupplierStore};
pub use transaction::{InventoryTransaction, PgInventoryTransaction};
