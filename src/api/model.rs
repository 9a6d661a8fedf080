use serde::{Deserialize, Serialize};

use crate::model::{AssetStatus, Submission, SubmissionStatus};

#[derive(Deserialize, Debug)]
pub struct CalendarResponse {
    #[serde(default)]
    pub submissions: Vec<Submission>,
}

/// Body of `PATCH /api/submissions/{id}`; also used to read the echoed fields.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SubmissionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl SubmissionPatch {
    pub fn status(status: SubmissionStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn release_date(date: impl Into<String>) -> Self {
        Self {
            release_date: Some(date.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.release_date.is_none()
    }

    /// Field-wise: keep `self`'s values, fill gaps from `fallback`.
    pub fn or(self, fallback: &Self) -> Self {
        Self {
            status: self.status.or_else(|| fallback.status.clone()),
            release_date: self.release_date.or_else(|| fallback.release_date.clone()),
        }
    }
}

/// Body of `PATCH /api/assets/{id}/status`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetStatusPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AssetStatus>,
}

impl AssetStatusPatch {
    pub fn new(status: AssetStatus) -> Self {
        Self {
            status: Some(status),
        }
    }

    pub fn or(self, fallback: &Self) -> Self {
        Self {
            status: self.status.or_else(|| fallback.status.clone()),
        }
    }
}
