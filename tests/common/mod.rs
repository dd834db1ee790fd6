use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use kitchenpos_rs::handlers::create_api_router;
use kitchenpos_rs::repositories::InMemoryDatabase;
use kitchenpos_rs::services::{
    MenuGroupService, MenuService, OrderService, ProductService, TableGroupService, TableService,
};

/// A full application router wired to in-memory repositories, driven
/// directly through tower without binding a socket.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let db = InMemoryDatabase::new();

        let order_repository = Arc::new(db.order_repository());
        let order_table_repository = Arc::new(db.order_table_repository());
        let table_group_repository = Arc::new(db.table_group_repository());
        let menu_repository = Arc::new(db.menu_repository());
        let menu_group_repository = Arc::new(db.menu_group_repository());
        let product_repository = Arc::new(db.product_repository());

        let order_service = Arc::new(OrderService::new(
            menu_repository.clone(),
            order_repository.clone(),
            order_table_repository.clone(),
        ));
        let table_service = Arc::new(TableService::new(
            order_repository.clone(),
            order_table_repository.clone(),
        ));
        let table_group_service = Arc::new(TableGroupService::new(
            order_repository,
            order_table_repository,
            table_group_repository,
        ));
        let menu_service = Arc::new(MenuService::new(
            menu_repository,
            menu_group_repository.clone(),
            product_repository.clone(),
        ));
        let menu_group_service = Arc::new(MenuGroupService::new(menu_group_repository));
        let product_service = Arc::new(ProductService::new(product_repository));

        let router = create_api_router(
            order_service,
            table_service,
            table_group_service,
            menu_service,
            menu_group_service,
            product_service,
        );

        Self { router }
    }

    pub async fn get(&self, path: &str) -> (StatusCode, serde_json::Value) {
        self.request("GET", path, None).await
    }

    pub async fn post(&self, path: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        self.request("POST", path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        self.request("PUT", path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> (StatusCode, serde_json::Value) {
        self.request("DELETE", path, None).await
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");

        let request = match body {
            Some(json) => builder
                .body(Body::from(json.to_string()))
                .expect("Failed to build request"),
            None => builder.body(Body::empty()).expect("Failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Failed to parse response body")
        };

        (status, json)
    }
}
