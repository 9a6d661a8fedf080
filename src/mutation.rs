//! Single-record selection and local merge of confirmed partial updates.
use crate::api::{AssetStatusPatch, SubmissionPatch};
use crate::model::{Deliverable, Identified, RecordId, Submission};

/// A partial update that knows how to write itself onto a record.
pub trait Merge<R> {
    fn merge_into(&self, record: &mut R);
}

impl Merge<Submission> for SubmissionPatch {
    fn merge_into(&self, record: &mut Submission) {
        if let Some(status) = &self.status {
            record.status = status.clone();
        }
        if let Some(date) = &self.release_date {
            record.release_date = Some(date.clone());
        }
    }
}

impl Merge<Deliverable> for AssetStatusPatch {
    fn merge_into(&self, record: &mut Deliverable) {
        if let Some(status) = &self.status {
            record.status = status.clone();
        }
    }
}

/// At most one record picked for detail/edit. Holds a snapshot, not a
/// reference into the collection, so a refetch never invalidates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<R> {
    current: Option<R>,
}

impl<R> Default for Selection<R> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<R: Identified + Clone> Selection<R> {
    /// Select the record with `id` from `records`, replacing any previous
    /// selection. Returns false (and clears) when no such record exists.
    pub fn select(&mut self, records: &[R], id: RecordId) -> bool {
        self.current = records.iter().find(|r| r.id() == id).cloned();
        self.current.is_some()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn get(&self) -> Option<&R> {
        self.current.as_ref()
    }

    pub fn id(&self) -> Option<RecordId> {
        self.current.as_ref().map(|r| r.id())
    }

    /// Replace the snapshot with the freshly fetched copy of the same record.
    /// Keeps the old snapshot when the record is no longer in `records`.
    pub fn reconcile(&mut self, records: &[R]) {
        if let Some(id) = self.id() {
            if let Some(fresh) = records.iter().find(|r| r.id() == id) {
                self.current = Some(fresh.clone());
            }
        }
    }
}

/// Write a confirmed patch onto the selected record (when it is `id`) and on
/// the matching entry of the collection. Returns the updated record if one
/// was found in either place.
pub fn merge_local<R, P>(
    records: &mut [R],
    selection: &mut Selection<R>,
    id: RecordId,
    patch: &P,
) -> Option<R>
where
    R: Identified + Clone,
    P: Merge<R>,
{
    let mut updated = None;
    if let Some(record) = records.iter_mut().find(|r| r.id() == id) {
        patch.merge_into(record);
        updated = Some(record.clone());
    }
    if let Some(selected) = selection.current.as_mut().filter(|r| r.id() == id) {
        patch.merge_into(selected);
        updated = Some(selected.clone());
    }
    updated
}
