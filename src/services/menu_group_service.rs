use std::sync::Arc;
use tracing::{info, instrument};

use crate::models::{MenuGroup, ServiceResult};
use crate::repositories::MenuGroupRepository;

/// Service managing menu groups.
pub struct MenuGroupService {
    menu_group_repository: Arc<dyn MenuGroupRepository>,
}

impl MenuGroupService {
    pub fn new(menu_group_repository: Arc<dyn MenuGroupRepository>) -> Self {
        Self {
            menu_group_repository,
        }
    }

    #[instrument(skip(self), fields(name = %name))]
    pub async fn create(&self, name: String) -> ServiceResult<MenuGroup> {
        info!("Creating menu group");

        let group = self.menu_group_repository.save(MenuGroup::new(name)).await?;

        info!("Menu group created");
        Ok(group)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<MenuGroup>> {
        Ok(self.menu_group_repository.find_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tests::MockTestMenuGroupRepository;

    #[tokio::test]
    async fn test_create_menu_group() {
        let mut repo = MockTestMenuGroupRepository::new();
        repo.expect_save()
            .times(1)
            .returning(|group: MenuGroup| Ok(group));

        let service = MenuGroupService::new(Arc::new(repo));

        let group = service.create("Set menus".to_string()).await.unwrap();
        assert_eq!(group.name, "Set menus");
    }

    #[tokio::test]
    async fn test_list_returns_all_groups() {
        let mut repo = MockTestMenuGroupRepository::new();
        repo.expect_find_all()
            .times(1)
            .returning(|| Ok(vec![MenuGroup::new("Seasonal".to_string())]));

        let service = MenuGroupService::new(Arc::new(repo));

        let groups = service.list().await.unwrap();
        assert_eq!(groups.len(), 1);
    }
}
