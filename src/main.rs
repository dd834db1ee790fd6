use anyhow::Context;
use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kitchenpos_rs::{
    handlers::{create_api_router, health_check},
    repositories::{
        PostgresMenuGroupRepository, PostgresMenuRepository, PostgresOrderRepository,
        PostgresOrderTableRepository, PostgresProductRepository, PostgresTableGroupRepository,
    },
    services::{
        MenuGroupService, MenuService, OrderService, ProductService, TableGroupService,
        TableService,
    },
    Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!("Configuration loaded successfully");

    info!("Starting kitchenpos-rs service");

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    info!("Database pool initialized");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;
    info!("Migrations applied");

    // Repositories
    let order_repository = Arc::new(PostgresOrderRepository::new(pool.clone()));
    let order_table_repository = Arc::new(PostgresOrderTableRepository::new(pool.clone()));
    let table_group_repository = Arc::new(PostgresTableGroupRepository::new(pool.clone()));
    let menu_repository = Arc::new(PostgresMenuRepository::new(pool.clone()));
    let menu_group_repository = Arc::new(PostgresMenuGroupRepository::new(pool.clone()));
    let product_repository = Arc::new(PostgresProductRepository::new(pool.clone()));
    info!("Repositories initialized");

    // Services
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
    info!("Services initialized");

    let app = create_app(
        order_service,
        table_service,
        table_group_service,
        menu_service,
        menu_group_service,
        product_service,
    );

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install CTRL+C signal handler: {}", e);
        }
        info!("Shutdown signal received");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn create_app(
    order_service: Arc<OrderService>,
    table_service: Arc<TableService>,
    table_group_service: Arc<TableGroupService>,
    menu_service: Arc<MenuService>,
    menu_group_service: Arc<MenuGroupService>,
    product_service: Arc<ProductService>,
) -> Router {
    Router::new()
        .route("/health/status", get(health_check))
        .merge(create_api_router(
            order_service,
            table_service,
            table_group_service,
            menu_service,
            menu_group_service,
            product_service,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kitchenpos_rs=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
