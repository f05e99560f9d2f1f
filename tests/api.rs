use petstore_backend::{app::build_app, config::AppState, db::memory::InMemorySupplierStore};
use reqwest::StatusCode;
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Mesmo router da produção, com armazenamento em memória e porta efêmera.
        let state = AppState::in_memory(InMemorySupplierStore::with_suppliers(&[
            "Pet Supplies SA",
            "Mascotas Felices",
        ]));
        let app = build_app(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_dog_food(client: &reqwest::Client, srv: &TestServer) -> Value {
    let res = client
        .post(srv.url("/api/productos"))
        .json(&json!({
            "nombre": "Dog Food",
            "idProveedor": 1,
            "cantidad": 10,
            "precio": 20.0,
            "umbralMinimo": 5,
            "descripcion": "Saco de 10kg"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn adjust(
    client: &reqwest::Client,
    srv: &TestServer,
    code: i64,
    action: &str,
    amount: i64,
) -> reqwest::Response {
    client
        .patch(srv.url(&format!("/api/productos/{code}/{action}")))
        .json(&json!({ "cantidad": amount }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/api/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn stock_lifecycle_over_http() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_dog_food(&client, &srv).await;
    let code = created["codigo"].as_i64().unwrap();
    assert_eq!(created["proveedor"], "Pet Supplies SA");
    assert_eq!(created["stockBajo"], false);

    let res = adjust(&client, &srv, code, "disminuir-stock", 6).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["stock"], 4);
    assert_eq!(body["stockBajo"], true);

    let notifications: Value = client
        .get(srv.url("/api/notificaciones"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(notifications.as_array().unwrap().len(), 1);
    assert_eq!(notifications[0]["codigoProducto"], code);
    assert_eq!(notifications[0]["leida"], false);

    let low: Value = client
        .get(srv.url("/api/productos/stock-bajo"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(low.as_array().unwrap().len(), 1);

    let res = adjust(&client, &srv, code, "aumentar-stock", 2).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["stock"], 6);
    assert_eq!(body["stockBajo"], false);

    let notifications: Value = client
        .get(srv.url("/api/notificaciones"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(notifications.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn insufficient_stock_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let code = create_dog_food(&client, &srv).await["codigo"].as_i64().unwrap();

    let res = adjust(&client, &srv, code, "disminuir-stock", 100).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Stock actual: 10"));

    let products: Value = client
        .get(srv.url("/api/productos"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(products[0]["stock"], 10);
}

#[tokio::test]
async fn duplicate_product_conflicts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create_dog_food(&client, &srv).await;

    let res = client
        .post(srv.url("/api/productos"))
        .json(&json!({
            "nombre": "Dog Food",
            "idProveedor": 1,
            "cantidad": 1,
            "precio": 5.5,
            "umbralMinimo": 0
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_supplier_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/productos"))
        .json(&json!({
            "nombre": "Cat Toy",
            "idProveedor": 99,
            "cantidad": 1,
            "precio": 3.0,
            "umbralMinimo": 0
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_payload_reports_fields() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/productos"))
        .json(&json!({
            "nombre": "",
            "idProveedor": 1,
            "cantidad": -1,
            "precio": 3.0,
            "umbralMinimo": 0
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    let details = &body["details"];
    assert!(details.get("name").or(details.get("nombre")).is_some());
    assert!(details.get("quantity").or(details.get("cantidad")).is_some());

    let code = create_dog_food(&client, &srv).await["codigo"].as_i64().unwrap();
    let res = adjust(&client, &srv, code, "aumentar-stock", 0).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleted_product_disappears() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let code = create_dog_food(&client, &srv).await["codigo"].as_i64().unwrap();

    let res = client
        .delete(srv.url(&format!("/api/productos/{code}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let products: Value = client
        .get(srv.url("/api/productos"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(products.as_array().unwrap().is_empty());

    let res = adjust(&client, &srv, code, "disminuir-stock", 1).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(srv.url(&format!("/api/productos/{code}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn threshold_update_changes_low_stock_flag() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let code = create_dog_food(&client, &srv).await["codigo"].as_i64().unwrap();

    let res = client
        .patch(srv.url(&format!("/api/productos/{code}/umbral")))
        .json(&json!({ "umbralMinimo": 12 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["umbralMinimo"], 12);
    assert_eq!(body["stockBajo"], true);
}

#[tokio::test]
async fn suppliers_and_notifications_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/proveedores"))
        .json(&json!({ "nombre": "Acuarios del Sur" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let supplier: Value = res.json().await.unwrap();
    assert_eq!(supplier["id"], 3);

    let suppliers: Value = client
        .get(srv.url("/api/proveedores"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = suppliers
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["nombre"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Acuarios del Sur", "Mascotas Felices", "Pet Supplies SA"]);

    let code = create_dog_food(&client, &srv).await["codigo"].as_i64().unwrap();
    adjust(&client, &srv, code, "disminuir-stock", 8).await;

    let notifications: Value = client
        .get(srv.url("/api/notificaciones"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = notifications[0]["id"].as_i64().unwrap();

    let res = client
        .patch(srv.url(&format!("/api/notificaciones/{id}/leida")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["leida"], true);

    let res = client
        .patch(srv.url("/api/notificaciones/999/leida"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_names_are_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/proveedores"))
        .json(&json!({ "nombre": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let suppliers: Value = client
        .get(srv.url("/api/proveedores"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(suppliers.as_array().unwrap().len(), 2);

    let res = client
        .post(srv.url("/api/productos"))
        .json(&json!({
            "nombre": " \t ",
            "idProveedor": 1,
            "cantidad": 1,
            "precio": 3.0,
            "umbralMinimo": 0
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_low_stock_product_clears_its_notification() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let code = create_dog_food(&client, &srv).await["codigo"].as_i64().unwrap();
    adjust(&client, &srv, code, "disminuir-stock", 7).await;

    let res = client
        .delete(srv.url(&format!("/api/productos/{code}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let notifications: Value = client
        .get(srv.url("/api/notificaciones"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(notifications.as_array().unwrap().is_empty());
}
