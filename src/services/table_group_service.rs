use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{
    OrderStatus, ServiceError, ServiceResult, TableGroup, TableGroupResponse,
};
use crate::repositories::{OrderRepository, OrderTableRepository, TableGroupRepository};

/// Service orchestrating table grouping and ungrouping.
pub struct TableGroupService {
    order_repository: Arc<dyn OrderRepository>,
    order_table_repository: Arc<dyn OrderTableRepository>,
    table_group_repository: Arc<dyn TableGroupRepository>,
}

impl TableGroupService {
    pub fn new(
        order_repository: Arc<dyn OrderRepository>,
        order_table_repository: Arc<dyn OrderTableRepository>,
        table_group_repository: Arc<dyn TableGroupRepository>,
    ) -> Self {
        Self {
            order_repository,
            order_table_repository,
            table_group_repository,
        }
    }

    /// Group at least two empty, un-grouped tables. Every member comes out
    /// occupied and owned by the new group.
    #[instrument(skip(self, order_table_ids), fields(tables = order_table_ids.len()))]
    pub async fn create(&self, order_table_ids: &[Uuid]) -> ServiceResult<TableGroupResponse> {
        info!("Creating table group");

        if order_table_ids.len() < 2 {
            return Err(ServiceError::validation(
                "a table group needs at least 2 tables",
            ));
        }

        let tables = self
            .order_table_repository
            .find_all_by_ids(order_table_ids)
            .await?;

        // Unresolved ids (and duplicates in the request) deflate the count.
        if tables.len() != order_table_ids.len() {
            return Err(ServiceError::validation(
                "every grouped table must exist",
            ));
        }

        for table in &tables {
            if !table.empty || table.has_table_group() {
                return Err(ServiceError::validation(format!(
                    "table {} is not eligible for grouping",
                    table.id
                )));
            }
        }

        let group = TableGroup::new();
        let members = self
            .table_group_repository
            .create(group.clone(), order_table_ids)
            .await?;

        info!("Table group created with {} members", members.len());
        Ok(TableGroupResponse {
            id: group.id,
            created_date: group.created_date,
            order_tables: members,
        })
    }

    /// Dissolve a group, clearing membership on every member table. The
    /// empty flag is left unchanged. Blocked while any member still has an
    /// order in COOKING or MEAL.
    #[instrument(skip(self), fields(table_group_id = %table_group_id))]
    pub async fn ungroup(&self, table_group_id: Uuid) -> ServiceResult<()> {
        info!("Ungrouping table group");

        let members = self
            .order_table_repository
            .find_all_by_table_group(table_group_id)
            .await?;

        let member_ids: Vec<Uuid> = members.iter().map(|t| t.id).collect();
        if self
            .order_repository
            .exists_by_tables_and_status_in(&member_ids, &OrderStatus::ACTIVE)
            .await?
        {
            return Err(ServiceError::validation(format!(
                "table group {} has a member with an active order",
                table_group_id
            )));
        }

        self.table_group_repository.ungroup(table_group_id).await?;

        info!("Table group dissolved");
        Ok(())
    }
}
