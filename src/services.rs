pub mod inventory_service;
pub mod notification_service;

pub use inventory_service::{CreateProductParams, InventoryService};
pub use notification_service::{NotificationService, NotificationSink};
