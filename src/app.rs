// src/app.rs

use axum::{
    routing::{delete, get, patch},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

// O mesmo router é usado pelo binário e pelos testes de API.
pub fn build_app(app_state: AppState) -> Router {
    let product_routes = Router::new()
        .route("/"
               ,get(handlers::products::list_products)
               .post(handlers::products::create_product)
        )
        .route("/stock-bajo"
               ,get(handlers::products::list_low_stock)
        )
        .route("/{codigo}"
               ,delete(handlers::products::delete_product)
        )
        .route("/{codigo}/aumentar-stock"
               ,patch(handlers::products::increase_stock)
        )
        .route("/{codigo}/disminuir-stock"
               ,patch(handlers::products::decrease_stock)
        )
        .route("/{codigo}/umbral"
               ,patch(handlers::products::update_threshold)
        );

    let supplier_routes = Router::new()
        .route("/"
               ,get(handlers::suppliers::list_suppliers)
               .post(handlers::suppliers::create_supplier)
        );

    let notification_routes = Router::new()
        .route("/"
               ,get(handlers::notifications::list_notifications)
        )
        .route("/{id}/leida"
               ,patch(handlers::notifications::mark_notification_read)
        );

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/productos", product_routes)
        .nest("/api/proveedores", supplier_routes)
        .nest("/api/notificaciones", notification_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
