use tracing::{debug, instrument};
use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::domain::{FixedMenuOffering, MenuId, OfferingCreate};
use crate::menu_actor::MenuError;

impl From<FrameworkError> for MenuError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => MenuError::NotFound(id),
            FrameworkError::Rejected(reason) => MenuError::ValidationError(reason),
            other => MenuError::ActorCommunicationError(other.to_string()),
        }
    }
}

/// Client for the fixed-menu catalog.
#[derive(Clone)]
pub struct MenuClient {
    inner: ResourceClient<FixedMenuOffering>,
}

impl_basic_client!(MenuClient, FixedMenuOffering, MenuError, offering);

impl MenuClient {
    #[instrument(skip(self, offering), fields(menu_name = %offering.name))]
    pub async fn create_offering(&self, offering: OfferingCreate) -> Result<MenuId, MenuError> {
        debug!("Sending request");
        self.inner.create(offering).await.map_err(MenuError::from)
    }

    /// Every catalog offering, ordered by name.
    #[instrument(skip(self))]
    pub async fn list_fixed_menu_offerings(&self) -> Result<Vec<FixedMenuOffering>, MenuError> {
        debug!("Sending request");
        let mut offerings = self.inner.list(()).await.map_err(MenuError::from)?;
        offerings.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(offerings)
    }
}
