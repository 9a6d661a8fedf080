//! Page-level state objects.
//!
//! Each page owns its raw collection, its filter state and its selection.
//! Derived views (`visible`, calendar buckets) are recomputed from those on
//! every call and never stored.

pub mod calendar;
pub mod deliverables;
pub mod publishing;

pub use calendar::CalendarPage;
pub use deliverables::DeliverablesPage;
pub use publishing::PublishingPage;

use tracing::{debug, warn};

use crate::api::ApiError;

/// A fetched collection plus its loading flag.
#[derive(Debug, Clone)]
pub struct Collection<R> {
    records: Vec<R>,
    loading: bool,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            loading: false,
        }
    }
}

impl<R> Collection<R> {
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [R] {
        &mut self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn start_loading(&mut self) {
        self.loading = true;
    }

    /// Store a fetch result. On failure the previous records are kept (empty
    /// on a first load) and the error is handed back for the caller to log or
    /// show.
    pub fn finish(
        &mut self,
        what: &'static str,
        result: Result<Vec<R>, ApiError>,
    ) -> Result<(), ApiError> {
        self.loading = false;
        match result {
            Ok(records) => {
                debug!(what, count = records.len(), "collection loaded");
                self.records = records;
                Ok(())
            }
            Err(err) => {
                warn!(what, error = %err, "failed to load collection");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn failed_load_keeps_previous_records() {
        let mut collection = Collection::default();
        collection.start_loading();
        assert!(collection.is_loading());
        collection.finish("numbers", Ok(vec![1, 2, 3])).unwrap();
        assert!(!collection.is_loading());

        collection.start_loading();
        let err = collection
            .finish(
                "numbers",
                Err(ApiError::Status {
                    status: StatusCode::BAD_GATEWAY,
                    detail: None,
                }),
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { .. }));
        assert!(!collection.is_loading());
        assert_eq!(collection.records(), &[1, 2, 3]);
    }
}
