use tracing::{info, instrument, warn};

use crate::api::{ApiError, AssetStatusPatch, DashboardApi};
use crate::filter::{project, DeliverableFilters};
use crate::model::{AssetStatus, Deliverable, RecordId};
use crate::mutation::{merge_local, Selection};
use crate::pages::Collection;

#[derive(Debug, Clone, Default)]
pub struct DeliverablesPage {
    deliverables: Collection<Deliverable>,
    pub filters: DeliverableFilters,
    selection: Selection<Deliverable>,
}

impl DeliverablesPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Deliverable] {
        self.deliverables.records()
    }

    pub fn is_loading(&self) -> bool {
        self.deliverables.is_loading()
    }

    #[instrument(skip_all)]
    pub async fn refresh(&mut self, api: &dyn DashboardApi) -> Result<(), ApiError> {
        self.deliverables.start_loading();
        let result = api.fetch_deliverables().await;
        self.deliverables.finish("deliverables", result)?;
        self.selection.reconcile(self.deliverables.records());
        Ok(())
    }

    pub fn reset_filters(&mut self) {
        self.filters = DeliverableFilters::default();
    }

    pub fn visible(&self) -> Vec<Deliverable> {
        project(self.deliverables.records(), &self.filters)
    }

    pub fn select(&mut self, id: RecordId) -> bool {
        self.selection.select(self.deliverables.records(), id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected(&self) -> Option<&Deliverable> {
        self.selection.get()
    }

    /// Change one asset's status, merge the confirmed value locally, then
    /// refetch the table.
    #[instrument(skip(self, api))]
    pub async fn set_status(
        &mut self,
        api: &dyn DashboardApi,
        id: RecordId,
        status: AssetStatus,
    ) -> Result<Option<Deliverable>, ApiError> {
        let patch = AssetStatusPatch::new(status);
        let echoed = match api.patch_asset_status(id, &patch).await {
            Ok(echoed) => echoed,
            Err(err) => {
                warn!(id, error = %err, "asset status update failed");
                return Err(err);
            }
        };
        let effective = echoed.or(&patch);
        let updated = merge_local(
            self.deliverables.records_mut(),
            &mut self.selection,
            id,
            &effective,
        );
        info!(id, status = ?effective.status, "asset status updated");
        let _ = self.refresh(api).await;
        Ok(updated)
    }
}
