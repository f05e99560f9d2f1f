// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Productos ---
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::list_low_stock,
        handlers::products::delete_product,
        handlers::products::increase_stock,
        handlers::products::decrease_stock,
        handlers::products::update_threshold,

        // --- Proveedores ---
        handlers::suppliers::list_suppliers,
        handlers::suppliers::create_supplier,

        // --- Notificaciones ---
        handlers::notifications::list_notifications,
        handlers::notifications::mark_notification_read,
    ),
    components(
        schemas(
            models::product::ProductResponse,
            models::supplier::Supplier,
            models::notification::Notification,

            // --- Payloads ---
            handlers::products::CreateProductPayload,
            handlers::products::StockAdjustmentPayload,
            handlers::products::UpdateThresholdPayload,
            handlers::suppliers::CreateSupplierPayload,
        )
    ),
    tags(
        (name = "Productos", description = "Inventario de productos y stock"),
        (name = "Proveedores", description = "Proveedores de productos"),
        (name = "Notificaciones", description = "Alertas de stock bajo")
    )
)]
pub struct ApiDoc;
