use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiError, DashboardApi, SubmissionPatch};
use crate::calendar::{self, group_by_day, MonthGrid};
use crate::filter::{project, CalendarFilters};
use crate::model::{RecordId, Submission, SubmissionStatus};
use crate::mutation::{merge_local, Selection};
use crate::pages::Collection;

/// Release calendar: one month of submissions at a time.
#[derive(Debug, Clone)]
pub struct CalendarPage {
    grid: MonthGrid,
    submissions: Collection<Submission>,
    pub filters: CalendarFilters,
    selection: Selection<Submission>,
}

impl CalendarPage {
    pub fn new(grid: MonthGrid) -> Self {
        Self {
            grid,
            submissions: Collection::default(),
            filters: CalendarFilters::default(),
            selection: Selection::default(),
        }
    }

    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub fn records(&self) -> &[Submission] {
        self.submissions.records()
    }

    pub fn is_loading(&self) -> bool {
        self.submissions.is_loading()
    }

    #[instrument(skip_all, fields(year = self.grid.year(), month = self.grid.month()))]
    pub async fn refresh(&mut self, api: &dyn DashboardApi) -> Result<(), ApiError> {
        self.submissions.start_loading();
        let result = api.fetch_calendar(self.grid.year(), self.grid.month()).await;
        self.submissions.finish("calendar", result)?;
        self.selection.reconcile(self.submissions.records());
        Ok(())
    }

    /// Switch the displayed month and fetch it. The backend scopes by month,
    /// so the previous month's records are dropped first.
    pub async fn goto_month(
        &mut self,
        api: &dyn DashboardApi,
        grid: MonthGrid,
    ) -> Result<(), ApiError> {
        if grid != self.grid {
            self.grid = grid;
            self.submissions.clear();
            self.selection.clear();
        }
        self.refresh(api).await
    }

    /// Move one month forward. At the last representable month the page
    /// stays put and nothing is fetched.
    pub async fn next_month(&mut self, api: &dyn DashboardApi) -> Result<(), ApiError> {
        let Some(next) = self.grid.next() else {
            warn!(year = self.grid.year(), "no month after the current one");
            return Ok(());
        };
        self.goto_month(api, next).await
    }

    pub async fn previous_month(&mut self, api: &dyn DashboardApi) -> Result<(), ApiError> {
        let Some(previous) = self.grid.previous() else {
            warn!(year = self.grid.year(), "no month before the current one");
            return Ok(());
        };
        self.goto_month(api, previous).await
    }

    pub fn reset_filters(&mut self) {
        self.filters = CalendarFilters::default();
    }

    /// Filtered view, in fetch order.
    pub fn visible(&self) -> Vec<Submission> {
        project(self.submissions.records(), &self.filters)
    }

    /// Filtered view bucketed by release day for every day of the month.
    pub fn buckets(&self) -> BTreeMap<String, Vec<Submission>> {
        group_by_day(&self.visible(), self.grid.days())
    }

    pub fn select(&mut self, id: RecordId) -> bool {
        self.selection.select(self.submissions.records(), id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected(&self) -> Option<&Submission> {
        self.selection.get()
    }

    pub async fn set_status(
        &mut self,
        api: &dyn DashboardApi,
        id: RecordId,
        status: SubmissionStatus,
    ) -> Result<Option<Submission>, ApiError> {
        self.apply_patch(api, id, SubmissionPatch::status(status))
            .await
    }

    pub async fn reschedule(
        &mut self,
        api: &dyn DashboardApi,
        id: RecordId,
        date: NaiveDate,
    ) -> Result<Option<Submission>, ApiError> {
        self.apply_patch(api, id, SubmissionPatch::release_date(calendar::iso_day(&date)))
            .await
    }

    /// Send `patch` for one submission. On success the echoed fields (or the
    /// sent ones) are merged locally and the month is refetched; a failed
    /// refetch is only logged. On failure nothing local changes. An empty
    /// patch is not sent; the local record is returned as is.
    #[instrument(skip(self, api))]
    pub async fn apply_patch(
        &mut self,
        api: &dyn DashboardApi,
        id: RecordId,
        patch: SubmissionPatch,
    ) -> Result<Option<Submission>, ApiError> {
        if patch.is_empty() {
            debug!(id, "empty submission patch, nothing sent");
            return Ok(self.submissions.records().iter().find(|s| s.id == id).cloned());
        }
        let echoed = match api.patch_submission(id, &patch).await {
            Ok(echoed) => echoed,
            Err(err) => {
                warn!(id, error = %err, "submission update failed");
                return Err(err);
            }
        };
        let effective = echoed.or(&patch);
        let updated = merge_local(
            self.submissions.records_mut(),
            &mut self.selection,
            id,
            &effective,
        );
        info!(id, ?effective, "submission updated");
        // Refetch errors are already logged by the collection.
        let _ = self.refresh(api).await;
        Ok(updated)
    }
}
