use std::sync::Arc;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::models::{Product, ServiceError, ServiceResult};
use crate::repositories::ProductRepository;

/// Service managing the product catalog.
pub struct ProductService {
    product_repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(product_repository: Arc<dyn ProductRepository>) -> Self {
        Self { product_repository }
    }

    /// Register a product. The price must not be negative.
    #[instrument(skip(self), fields(name = %name))]
    pub async fn create(&self, name: String, price: Decimal) -> ServiceResult<Product> {
        info!("Creating product");

        if price < Decimal::ZERO {
            return Err(ServiceError::validation(
                "product price must not be negative",
            ));
        }

        let product = self.product_repository.save(Product::new(name, price)).await?;

        info!("Product created");
        Ok(product)
    }

    /// List all products.
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.product_repository.find_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tests::MockTestProductRepository;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_create_with_negative_price_fails() {
        let service = ProductService::new(Arc::new(MockTestProductRepository::new()));

        let result = service.create("Cola".to_string(), dec!(-1)).await;
        assert!(matches!(
            result.unwrap_err(),
            ServiceError::ValidationError { .. }
        ));
    }

    #[tokio::test]
    async fn test_create_with_zero_price_succeeds() {
        let mut repo = MockTestProductRepository::new();
        repo.expect_save()
            .times(1)
            .returning(|product: Product| Ok(product));

        let service = ProductService::new(Arc::new(repo));

        let product = service.create("Water".to_string(), dec!(0)).await.unwrap();
        assert_eq!(product.name, "Water");
        assert_eq!(product.price, dec!(0));
    }

    #[tokio::test]
    async fn test_list_returns_all_products() {
        let mut repo = MockTestProductRepository::new();
        repo.expect_find_all().times(1).returning(|| {
            Ok(vec![
                Product::new("Cola".to_string(), dec!(1000)),
                Product::new("Fried chicken".to_string(), dec!(16000)),
            ])
        });

        let service = ProductService::new(Arc::new(repo));

        let products = service.list().await.unwrap();
        assert_eq!(products.len(), 2);
    }
}
