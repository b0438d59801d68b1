use tracing::{debug, instrument};
use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::domain::{DiningTable, TableCreate, TableId, TablePatch, TableQuery};
use crate::table_actor::TableError;

impl From<FrameworkError> for TableError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => TableError::NotFound(id),
            FrameworkError::Rejected(reason) => TableError::ValidationError(reason),
            other => TableError::ActorCommunicationError(other.to_string()),
        }
    }
}

/// Client for the dining-table repository.
#[derive(Clone)]
pub struct TableClient {
    inner: ResourceClient<DiningTable>,
}

impl_basic_client!(TableClient, DiningTable, TableError, table);

impl TableClient {
    #[instrument(skip(self, table), fields(table_name = %table.name, capacity = table.capacity))]
    pub async fn create_table(&self, table: TableCreate) -> Result<TableId, TableError> {
        debug!("Sending request");
        self.inner.create(table).await.map_err(TableError::from)
    }

    #[instrument(skip(self))]
    pub async fn set_table_active(&self, id: TableId, is_active: bool) -> Result<DiningTable, TableError> {
        debug!("Sending request");
        let patch = TablePatch { is_active: Some(is_active), ..TablePatch::default() };
        self.inner.update(id, patch).await.map_err(TableError::from)
    }

    /// Active tables seating at least `min_capacity` guests, ordered by name.
    #[instrument(skip(self))]
    pub async fn list_active_tables(&self, min_capacity: u32) -> Result<Vec<DiningTable>, TableError> {
        debug!("Sending request");
        let mut tables = self
            .inner
            .list(TableQuery::seating(min_capacity))
            .await
            .map_err(TableError::from)?;
        tables.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(tables)
    }
}
