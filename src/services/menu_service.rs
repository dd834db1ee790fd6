use std::sync::Arc;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::models::{CreateMenuRequest, Menu, ServiceError, ServiceResult};
use crate::repositories::{MenuGroupRepository, MenuRepository, ProductRepository};

/// Service managing menus and their product components.
pub struct MenuService {
    menu_repository: Arc<dyn MenuRepository>,
    menu_group_repository: Arc<dyn MenuGroupRepository>,
    product_repository: Arc<dyn ProductRepository>,
}

impl MenuService {
    pub fn new(
        menu_repository: Arc<dyn MenuRepository>,
        menu_group_repository: Arc<dyn MenuGroupRepository>,
        product_repository: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            menu_repository,
            menu_group_repository,
            product_repository,
        }
    }

    /// Create a menu. The price must not be negative, must not exceed the
    /// summed component prices, the menu group must exist, and every
    /// referenced product must exist.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&self, request: CreateMenuRequest) -> ServiceResult<Menu> {
        info!("Creating menu");

        if request.price < Decimal::ZERO {
            return Err(ServiceError::validation("menu price must not be negative"));
        }

        if !self
            .menu_group_repository
            .exists(request.menu_group_id)
            .await?
        {
            return Err(ServiceError::validation(format!(
                "menu group {} does not exist",
                request.menu_group_id
            )));
        }

        let mut components_total = Decimal::ZERO;
        for menu_product in &request.menu_products {
            let product = self
                .product_repository
                .find_by_id(menu_product.product_id)
                .await?
                .ok_or_else(|| {
                    ServiceError::validation(format!(
                        "product {} does not exist",
                        menu_product.product_id
                    ))
                })?;
            components_total += product.price * Decimal::from(menu_product.quantity);
        }

        if request.price > components_total {
            return Err(ServiceError::validation(
                "menu price must not exceed the sum of its product prices",
            ));
        }

        let mut menu = Menu::new(request.name, request.price, request.menu_group_id);
        menu.menu_products = menu.menu_products_from(&request.menu_products);

        let saved = self.menu_repository.save(menu).await?;

        info!("Menu created");
        Ok(saved)
    }

    /// List all menus with their product components.
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<Menu>> {
        Ok(self.menu_repository.find_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MenuProductRequest, Product};
    use crate::services::tests::{
        MockTestMenuGroupRepository, MockTestMenuRepository, MockTestProductRepository,
    };
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn service(
        menu_repo: MockTestMenuRepository,
        group_repo: MockTestMenuGroupRepository,
        product_repo: MockTestProductRepository,
    ) -> MenuService {
        MenuService::new(
            Arc::new(menu_repo),
            Arc::new(group_repo),
            Arc::new(product_repo),
        )
    }

    fn request(price: Decimal, menu_group_id: Uuid, product_id: Uuid) -> CreateMenuRequest {
        CreateMenuRequest {
            name: "Fried chicken set".to_string(),
            price,
            menu_group_id,
            menu_products: vec![MenuProductRequest {
                product_id,
                quantity: 2,
            }],
        }
    }

    #[tokio::test]
    async fn test_create_with_negative_price_fails() {
        let service = service(
            MockTestMenuRepository::new(),
            MockTestMenuGroupRepository::new(),
            MockTestProductRepository::new(),
        );

        let result = service
            .create(request(dec!(-1), Uuid::new_v4(), Uuid::new_v4()))
            .await;
        assert!(matches!(
            result.unwrap_err(),
            ServiceError::ValidationError { .. }
        ));
    }

    #[tokio::test]
    async fn test_create_with_missing_menu_group_fails() {
        let mut group_repo = MockTestMenuGroupRepository::new();
        group_repo.expect_exists().times(1).returning(|_| Ok(false));

        let service = service(
            MockTestMenuRepository::new(),
            group_repo,
            MockTestProductRepository::new(),
        );

        let result = service
            .create(request(dec!(100), Uuid::new_v4(), Uuid::new_v4()))
            .await;
        assert!(matches!(
            result.unwrap_err(),
            ServiceError::ValidationError { .. }
        ));
    }

    #[tokio::test]
    async fn test_create_with_missing_product_fails() {
        let mut group_repo = MockTestMenuGroupRepository::new();
        group_repo.expect_exists().times(1).returning(|_| Ok(true));

        let mut product_repo = MockTestProductRepository::new();
        product_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(MockTestMenuRepository::new(), group_repo, product_repo);

        let result = service
            .create(request(dec!(100), Uuid::new_v4(), Uuid::new_v4()))
            .await;
        assert!(matches!(
            result.unwrap_err(),
            ServiceError::ValidationError { .. }
        ));
    }

    #[tokio::test]
    async fn test_create_with_price_above_components_fails() {
        let mut group_repo = MockTestMenuGroupRepository::new();
        group_repo.expect_exists().times(1).returning(|_| Ok(true));

        // 2 x 16000 = 32000, a 33000 menu overshoots it.
        let mut product_repo = MockTestProductRepository::new();
        product_repo.expect_find_by_id().times(1).returning(|id| {
            Ok(Some(Product {
                id,
                name: "Fried chicken".to_string(),
                price: dec!(16000),
            }))
        });

        let service = service(MockTestMenuRepository::new(), group_repo, product_repo);

        let result = service
            .create(request(dec!(33000), Uuid::new_v4(), Uuid::new_v4()))
            .await;
        assert!(matches!(
            result.unwrap_err(),
            ServiceError::ValidationError { .. }
        ));
    }

    #[tokio::test]
    async fn test_create_success_assigns_component_sequence() {
        let mut group_repo = MockTestMenuGroupRepository::new();
        group_repo.expect_exists().times(1).returning(|_| Ok(true));

        let mut product_repo = MockTestProductRepository::new();
        product_repo.expect_find_by_id().times(1).returning(|id| {
            Ok(Some(Product {
                id,
                name: "Fried chicken".to_string(),
                price: dec!(16000),
            }))
        });

        let mut menu_repo = MockTestMenuRepository::new();
        menu_repo
            .expect_save()
            .times(1)
            .returning(|menu: Menu| Ok(menu));

        let service = service(menu_repo, group_repo, product_repo);

        let menu = service
            .create(request(dec!(30000), Uuid::new_v4(), Uuid::new_v4()))
            .await
            .unwrap();
        assert_eq!(menu.price, dec!(30000));
        assert_eq!(menu.menu_products.len(), 1);
        assert_eq!(menu.menu_products[0].seq, 1);
        assert_eq!(menu.menu_products[0].menu_id, menu.id);
    }

    #[tokio::test]
    async fn test_list_returns_all_menus() {
        let mut menu_repo = MockTestMenuRepository::new();
        menu_repo
            .expect_find_all()
            .times(1)
            .returning(|| Ok(vec![Menu::new("Combo".to_string(), dec!(10000), Uuid::new_v4())]));

        let service = service(
            menu_repo,
            MockTestMenuGroupRepository::new(),
            MockTestProductRepository::new(),
        );

        let menus = service.list().await.unwrap();
        assert_eq!(menus.len(), 1);
    }
}
