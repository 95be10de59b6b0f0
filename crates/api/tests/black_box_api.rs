use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = factura_api::app::build_app().await;
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
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn product_body(name: &str, price: f64, stock: i64) -> serde_json::Value {
    json!({ "name": name, "price": price, "stock": stock })
}

#[tokio::test]
async fn health_returns_ok() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn product_lifecycle_create_get_update_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Create
    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&product_body("telefono", 0.5, 10))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "telefono");
    assert_eq!(created["stock"], 10);

    // Get
    let res = client
        .get(format!("{}/products/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["id"], id.as_str());
    assert_eq!(fetched["price"], 0.5);

    // Update (partial: only price)
    let res = client
        .put(format!("{}/products/{}", srv.base_url, id))
        .json(&json!({ "price": 0.75 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["price"], 0.75);
    assert_eq!(updated["name"], "telefono");

    // List contains exactly this product
    let res = client
        .get(format!("{}/products", srv.base_url))
        .send()
        .await
        .unwrap();
    let list: serde_json::Value = res.json().await.unwrap();
    assert_eq!(list["items"].as_array().unwrap().len(), 1);

    // Delete
    let res = client
        .delete(format!("{}/products/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/products/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_product_name_is_a_conflict() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&product_body("telefono", 0.5, 9))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&product_body("telefono", 1.0, 5))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn out_of_range_stock_is_unprocessable() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&product_body("telefono", 0.5, 21))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "stock_out_of_range");

    // Nothing was stored.
    let res = client
        .get(format!("{}/products", srv.base_url))
        .send()
        .await
        .unwrap();
    let list: serde_json::Value = res.json().await.unwrap();
    assert!(list["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_product_id_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/products/not-a-uuid", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn invoice_lifecycle_with_details() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // A product to reference from the invoice.
    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&product_body("telefono", 0.5, 10))
        .send()
        .await
        .unwrap();
    let product: serde_json::Value = res.json().await.unwrap();
    let product_id = product["id"].as_str().unwrap().to_string();

    // Create an invoice with one detail line.
    let res = client
        .post(format!("{}/invoices", srv.base_url))
        .json(&json!({
            "client_ci": "1723456789",
            "client_name": "Juan Perez",
            "client_address": "Quito",
            "total_before_taxes": 10.0,
            "taxes": 1.2,
            "total_after_taxes": 11.2,
            "details": [
                { "product_id": product_id, "total_price": 0.5 }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let invoice_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["client_name"], "Juan Perez");
    assert_eq!(created["details"].as_array().unwrap().len(), 1);
    assert_eq!(created["details"][0]["product_id"], product_id.as_str());

    // Listing attaches the details.
    let res = client
        .get(format!("{}/invoices", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let list: serde_json::Value = res.json().await.unwrap();
    let items = list["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["details"].as_array().unwrap().len(), 1);

    // Delete removes the invoice and its details.
    let res = client
        .delete(format!("{}/invoices/{}", srv.base_url, invoice_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/invoices/{}", srv.base_url, invoice_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_invoices_with_none_is_an_empty_list() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(format!("{}/invoices", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let list: serde_json::Value = res.json().await.unwrap();
    assert!(list["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn invoice_referencing_a_missing_product_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/invoices", srv.base_url))
        .json(&json!({
            "client_ci": "1723456789",
            "client_name": "Juan Perez",
            "client_address": "Quito",
            "details": [
                { "product_id": uuid::Uuid::now_v7().to_string(), "total_price": 0.5 }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");

    // The invoice was not half-created.
    let res = client
        .get(format!("{}/invoices", srv.base_url))
        .send()
        .await
        .unwrap();
    let list: serde_json::Value = res.json().await.unwrap();
    assert!(list["items"].as_array().unwrap().is_empty());
}
