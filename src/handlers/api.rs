use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::models::{
    ChangeEmptyRequest, ChangeNumberOfGuestsRequest, ChangeOrderStatusRequest,
    CreateMenuGroupRequest, CreateMenuRequest, CreateOrderRequest, CreateProductRequest,
    CreateTableGroupRequest, CreateTableRequest, Menu, MenuGroup, Order, OrderTable, Product,
    ServiceError, TableGroupResponse,
};
use crate::services::{
    MenuGroupService, MenuService, OrderService, ProductService, TableGroupService, TableService,
};

/// Shared application state containing all services
#[derive(Clone)]
pub struct ApiState {
    pub order_service: Arc<OrderService>,
    pub table_service: Arc<TableService>,
    pub table_group_service: Arc<TableGroupService>,
    pub menu_service: Arc<MenuService>,
    pub menu_group_service: Arc<MenuGroupService>,
    pub product_service: Arc<ProductService>,
}

/// Create API router with all endpoints
pub fn create_api_router(
    order_service: Arc<OrderService>,
    table_service: Arc<TableService>,
    table_group_service: Arc<TableGroupService>,
    menu_service: Arc<MenuService>,
    menu_group_service: Arc<MenuGroupService>,
    product_service: Arc<ProductService>,
) -> Router {
    let state = ApiState {
        order_service,
        table_service,
        table_group_service,
        menu_service,
        menu_group_service,
        product_service,
    };

    Router::new()
        // Order endpoints
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/:order_id/order-status", put(change_order_status))
        // Table endpoints
        .route("/api/tables", get(list_tables).post(create_table))
        .route("/api/tables/:order_table_id/empty", put(change_empty))
        .route(
            "/api/tables/:order_table_id/number-of-guests",
            put(change_number_of_guests),
        )
        // Table group endpoints
        .route("/api/table-groups", post(create_table_group))
        .route("/api/table-groups/:table_group_id", delete(ungroup_tables))
        // Catalog endpoints
        .route("/api/menus", get(list_menus).post(create_menu))
        .route("/api/menu-groups", get(list_menu_groups).post(create_menu_group))
        .route("/api/products", get(list_products).post(create_product))
        .with_state(state)
}

// =============================================================================
// ORDER ENDPOINTS
// =============================================================================

/// Create a new order for an occupied table
#[instrument(skip(state, request))]
pub async fn create_order(
    State(state): State<ApiState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), (StatusCode, Json<Value>)> {
    info!("Creating order for table: {}", request.order_table_id);

    match state.order_service.create(request).await {
        Ok(order) => {
            info!("Successfully created order with ID: {}", order.id);
            Ok((StatusCode::CREATED, Json(order)))
        }
        Err(err) => {
            error!("Failed to create order: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// List all orders
#[instrument(skip(state))]
pub async fn list_orders(
    State(state): State<ApiState>,
) -> Result<Json<Vec<Order>>, (StatusCode, Json<Value>)> {
    info!("Listing orders");

    match state.order_service.list().await {
        Ok(orders) => {
            info!("Successfully listed {} orders", orders.len());
            Ok(Json(orders))
        }
        Err(err) => {
            error!("Failed to list orders: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Change an order's status
#[instrument(skip(state, request))]
pub async fn change_order_status(
    State(state): State<ApiState>,
    Path(order_id): Path<Uuid>,
    Json(request): Json<ChangeOrderStatusRequest>,
) -> Result<Json<Order>, (StatusCode, Json<Value>)> {
    info!("Changing status of order: {}", order_id);

    match state
        .order_service
        .change_order_status(order_id, request.order_status)
        .await
    {
        Ok(order) => {
            info!("Successfully changed order status to {}", order.order_status);
            Ok(Json(order))
        }
        Err(err) => {
            error!("Failed to change status of order {}: {}", order_id, err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// TABLE ENDPOINTS
// =============================================================================

/// Register a new order table
#[instrument(skip(state, request))]
pub async fn create_table(
    State(state): State<ApiState>,
    Json(request): Json<CreateTableRequest>,
) -> Result<(StatusCode, Json<OrderTable>), (StatusCode, Json<Value>)> {
    info!("Creating order table");

    match state
        .table_service
        .create(request.number_of_guests, request.empty)
        .await
    {
        Ok(table) => {
            info!("Successfully created table with ID: {}", table.id);
            Ok((StatusCode::CREATED, Json(table)))
        }
        Err(err) => {
            error!("Failed to create table: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// List all order tables
#[instrument(skip(state))]
pub async fn list_tables(
    State(state): State<ApiState>,
) -> Result<Json<Vec<OrderTable>>, (StatusCode, Json<Value>)> {
    info!("Listing tables");

    match state.table_service.list().await {
        Ok(tables) => {
            info!("Successfully listed {} tables", tables.len());
            Ok(Json(tables))
        }
        Err(err) => {
            error!("Failed to list tables: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Toggle a table's empty flag
#[instrument(skip(state, request))]
pub async fn change_empty(
    State(state): State<ApiState>,
    Path(order_table_id): Path<Uuid>,
    Json(request): Json<ChangeEmptyRequest>,
) -> Result<Json<OrderTable>, (StatusCode, Json<Value>)> {
    info!("Changing empty flag of table: {}", order_table_id);

    match state
        .table_service
        .change_empty(order_table_id, request.empty)
        .await
    {
        Ok(table) => {
            info!("Successfully changed table empty flag");
            Ok(Json(table))
        }
        Err(err) => {
            error!("Failed to change empty flag of table {}: {}", order_table_id, err);
            Err(service_error_to_response(err))
        }
    }
}

/// Change a table's guest count
#[instrument(skip(state, request))]
pub async fn change_number_of_guests(
    State(state): State<ApiState>,
    Path(order_table_id): Path<Uuid>,
    Json(request): Json<ChangeNumberOfGuestsRequest>,
) -> Result<Json<OrderTable>, (StatusCode, Json<Value>)> {
    info!("Changing guest count of table: {}", order_table_id);

    match state
        .table_service
        .change_number_of_guests(order_table_id, request.number_of_guests)
        .await
    {
        Ok(table) => {
            info!("Successfully changed guest count");
            Ok(Json(table))
        }
        Err(err) => {
            error!("Failed to change guest count of table {}: {}", order_table_id, err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// TABLE GROUP ENDPOINTS
// =============================================================================

/// Group tables for combined billing
#[instrument(skip(state, request))]
pub async fn create_table_group(
    State(state): State<ApiState>,
    Json(request): Json<CreateTableGroupRequest>,
) -> Result<(StatusCode, Json<TableGroupResponse>), (StatusCode, Json<Value>)> {
    info!("Creating table group of {} tables", request.order_table_ids.len());

    match state
        .table_group_service
        .create(&request.order_table_ids)
        .await
    {
        Ok(group) => {
            info!("Successfully created table group with ID: {}", group.id);
            Ok((StatusCode::CREATED, Json(group)))
        }
        Err(err) => {
            error!("Failed to create table group: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Dissolve a table group
#[instrument(skip(state))]
pub async fn ungroup_tables(
    State(state): State<ApiState>,
    Path(table_group_id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    info!("Ungrouping table group: {}", table_group_id);

    match state.table_group_service.ungroup(table_group_id).await {
        Ok(()) => {
            info!("Successfully ungrouped table group");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(err) => {
            error!("Failed to ungroup table group {}: {}", table_group_id, err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// CATALOG ENDPOINTS
// =============================================================================

/// Create a new menu
#[instrument(skip(state, request))]
pub async fn create_menu(
    State(state): State<ApiState>,
    Json(request): Json<CreateMenuRequest>,
) -> Result<(StatusCode, Json<Menu>), (StatusCode, Json<Value>)> {
    info!("Creating menu: {}", request.name);

    match state.menu_service.create(request).await {
        Ok(menu) => {
            info!("Successfully created menu with ID: {}", menu.id);
            Ok((StatusCode::CREATED, Json(menu)))
        }
        Err(err) => {
            error!("Failed to create menu: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// List all menus
#[instrument(skip(state))]
pub async fn list_menus(
    State(state): State<ApiState>,
) -> Result<Json<Vec<Menu>>, (StatusCode, Json<Value>)> {
    info!("Listing menus");

    match state.menu_service.list().await {
        Ok(menus) => Ok(Json(menus)),
        Err(err) => {
            error!("Failed to list menus: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Create a new menu group
#[instrument(skip(state, request))]
pub async fn create_menu_group(
    State(state): State<ApiState>,
    Json(request): Json<CreateMenuGroupRequest>,
) -> Result<(StatusCode, Json<MenuGroup>), (StatusCode, Json<Value>)> {
    info!("Creating menu group: {}", request.name);

    match state.menu_group_service.create(request.name).await {
        Ok(group) => {
            info!("Successfully created menu group with ID: {}", group.id);
            Ok((StatusCode::CREATED, Json(group)))
        }
        Err(err) => {
            error!("Failed to create menu group: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// List all menu groups
#[instrument(skip(state))]
pub async fn list_menu_groups(
    State(state): State<ApiState>,
) -> Result<Json<Vec<MenuGroup>>, (StatusCode, Json<Value>)> {
    info!("Listing menu groups");

    match state.menu_group_service.list().await {
        Ok(groups) => Ok(Json(groups)),
        Err(err) => {
            error!("Failed to list menu groups: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Create a new product
#[instrument(skip(state, request))]
pub async fn create_product(
    State(state): State<ApiState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), (StatusCode, Json<Value>)> {
    info!("Creating product: {}", request.name);

    match state
        .product_service
        .create(request.name, request.price)
        .await
    {
        Ok(product) => {
            info!("Successfully created product with ID: {}", product.id);
            Ok((StatusCode::CREATED, Json(product)))
        }
        Err(err) => {
            error!("Failed to create product: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// List all products
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<ApiState>,
) -> Result<Json<Vec<Product>>, (StatusCode, Json<Value>)> {
    info!("Listing products");

    match state.product_service.list().await {
        Ok(products) => Ok(Json(products)),
        Err(err) => {
            error!("Failed to list products: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Convert ServiceError to HTTP response
fn service_error_to_response(err: ServiceError) -> (StatusCode, Json<Value>) {
    let (status, message) = match err {
        ServiceError::OrderNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::TableNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::ValidationError { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        ServiceError::Repository { source } => match source {
            crate::models::RepositoryError::NotFound => {
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }
            crate::models::RepositoryError::ConnectionFailed => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Database connection failed".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        },
    };

    (
        status,
        Json(json!({
            "error": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_maps_to_400() {
        let (status, _) =
            service_error_to_response(ServiceError::validation("order line items must not be empty"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_errors_map_to_404() {
        let (status, _) = service_error_to_response(ServiceError::OrderNotFound {
            id: Uuid::new_v4(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = service_error_to_response(ServiceError::TableNotFound {
            id: Uuid::new_v4(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_repository_error_maps_to_5xx() {
        let (status, body) = service_error_to_response(ServiceError::Repository {
            source: crate::models::RepositoryError::ConnectionFailed,
        });
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.0.get("timestamp").is_some());
    }
}
