//! Client-side filter projection.
//!
//! A page holds a typed filter struct; [`project`] keeps the records that
//! satisfy every active dimension, in their original order.
use std::str::FromStr;

use crate::model::{
    AssetStatus, ContentType, Deliverable, DeliverableType, Platform, PublishingTask, RecordId,
    Submission, SubmissionStatus, TaskStatus,
};

/// One filter dimension: either unconstrained or pinned to a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::All
    }
}

impl<T: PartialEq> Filter<T> {
    pub fn is_active(&self) -> bool {
        matches!(self, Filter::Only(_))
    }

    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == value,
        }
    }

    /// Like [`Filter::accepts`] for optional fields: an absent field never
    /// satisfies an active filter.
    pub fn accepts_opt(&self, value: Option<&T>) -> bool {
        match (self, value) {
            (Filter::All, _) => true,
            (Filter::Only(wanted), Some(value)) => wanted == value,
            (Filter::Only(_), None) => false,
        }
    }
}

impl<T> From<Option<T>> for Filter<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Filter::All, Filter::Only)
    }
}

impl<T: FromStr> FromStr for Filter<T> {
    type Err = T::Err;

    /// `"all"` (any case) and the empty string mean no constraint.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Filter::All);
        }
        trimmed.parse().map(Filter::Only)
    }
}

/// Case-insensitive substring search over a set of text fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Search {
    needle: String,
}

impl Search {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.trim().to_lowercase(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.needle.is_empty()
    }

    /// Passes when inactive, or when any of `fields` contains the query.
    pub fn matches_any<'a, I>(&self, fields: I) -> bool
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        if !self.is_active() {
            return true;
        }
        fields
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

/// A filter state that can decide whether one record is visible.
pub trait Predicate<R> {
    fn matches(&self, record: &R) -> bool;

    /// True when no dimension constrains the view.
    fn is_unconstrained(&self) -> bool;
}

/// Keep the records satisfying every active predicate, preserving order.
pub fn project<R, F>(records: &[R], filters: &F) -> Vec<R>
where
    R: Clone,
    F: Predicate<R>,
{
    if filters.is_unconstrained() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| filters.matches(record))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CalendarFilters {
    pub content_type: Filter<ContentType>,
    pub status: Filter<SubmissionStatus>,
    pub search: Search,
}

impl Predicate<Submission> for CalendarFilters {
    fn matches(&self, record: &Submission) -> bool {
        self.content_type.accepts(&record.content_type)
            && self.status.accepts(&record.status)
            && self.search.matches_any([
                Some(record.episode_title.as_str()),
                record.client_name.as_deref(),
            ])
    }

    fn is_unconstrained(&self) -> bool {
        !self.content_type.is_active() && !self.status.is_active() && !self.search.is_active()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeliverableFilters {
    pub deliverable_type: Filter<DeliverableType>,
    pub status: Filter<AssetStatus>,
    pub content_type: Filter<ContentType>,
    pub search: Search,
}

impl Predicate<Deliverable> for DeliverableFilters {
    fn matches(&self, record: &Deliverable) -> bool {
        self.deliverable_type.accepts(&record.deliverable_type)
            && self.status.accepts(&record.status)
            && self.content_type.accepts_opt(record.content_type.as_ref())
            && self.search.matches_any([
                Some(record.name.as_str()),
                record.episode_title.as_deref(),
            ])
    }

    fn is_unconstrained(&self) -> bool {
        !self.deliverable_type.is_active()
            && !self.status.is_active()
            && !self.content_type.is_active()
            && !self.search.is_active()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PublishingFilters {
    pub status: Filter<TaskStatus>,
    pub platform: Filter<Platform>,
    pub client_id: Filter<RecordId>,
    pub search: Search,
}

impl Predicate<PublishingTask> for PublishingFilters {
    fn matches(&self, record: &PublishingTask) -> bool {
        self.status.accepts(&record.status)
            && self.platform.accepts(&record.platform)
            && self.client_id.accepts_opt(record.client_id.as_ref())
            && self.search.matches_any([
                Some(record.episode_title.as_str()),
                record.client_name.as_deref(),
            ])
    }

    fn is_unconstrained(&self) -> bool {
        !self.status.is_active()
            && !self.platform.is_active()
            && !self.client_id.is_active()
            && !self.search.is_active()
    }
}
