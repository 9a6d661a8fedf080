use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Backend identifier shared by every record type.
pub type RecordId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value:?} (expected one of {expected})")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
    /// Comma-separated canonical spellings.
    pub expected: String,
}

/// Upper-case the input and fold spaces/hyphens into underscores so that
/// `"In Progress"`, `"in-progress"` and `"IN_PROGRESS"` compare equal.
fn canonical(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// Declares a closed vocabulary used by a classification field.
///
/// Parsing user input (`FromStr`) is strict; decoding backend JSON keeps
/// unrecognised values in `Other` so one unexpected label does not fail a
/// whole collection.
macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Other(raw) => raw.as_str(),
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match canonical(s).as_str() {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(UnknownValue {
                        kind: $kind,
                        value: s.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map($name::as_str)
                            .collect::<Vec<_>>()
                            .join(", "),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(raw.parse().unwrap_or($name::Other(raw)))
            }
        }
    };
}

vocabulary!(
    /// Kind of media a submission or deliverable carries.
    ContentType, "content type" {
        Audio => "AUDIO",
        Video => "VIDEO",
        Clip => "CLIP",
        Short => "SHORT",
    }
);

vocabulary!(
    /// Production stage of an episode submission.
    SubmissionStatus, "submission status" {
        Draft => "DRAFT",
        Submitted => "SUBMITTED",
        InProgress => "IN_PROGRESS",
        Review => "REVIEW",
        Final => "FINAL",
        Published => "PUBLISHED",
    }
);

vocabulary!(
    DeliverableType, "deliverable type" {
        Video => "VIDEO",
        Audio => "AUDIO",
        Thumbnail => "THUMBNAIL",
        Transcript => "TRANSCRIPT",
        ShowNotes => "SHOW_NOTES",
        Clip => "CLIP",
    }
);

vocabulary!(
    /// Status of a produced asset (the backend stores deliverables as assets).
    AssetStatus, "asset status" {
        Pending => "PENDING",
        InProgress => "IN_PROGRESS",
        Ready => "READY",
        Approved => "APPROVED",
        Delivered => "DELIVERED",
    }
);

vocabulary!(
    Platform, "platform" {
        Youtube => "YOUTUBE",
        Spotify => "SPOTIFY",
        ApplePodcasts => "APPLE_PODCASTS",
        Instagram => "INSTAGRAM",
        Tiktok => "TIKTOK",
        Linkedin => "LINKEDIN",
    }
);

vocabulary!(
    TaskStatus, "task status" {
        Pending => "PENDING",
        Scheduled => "SCHEDULED",
        Published => "PUBLISHED",
        Failed => "FAILED",
    }
);

vocabulary!(
    Role, "role" {
        Admin => "ADMIN",
        Client => "CLIENT",
        Editor => "EDITOR",
    }
);

/// Records that carry a stable backend identifier.
pub trait Identified {
    fn id(&self) -> RecordId;
}

/// An episode submission as shown on the release calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: RecordId,
    pub episode_title: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_id: Option<RecordId>,
    pub content_type: ContentType,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub platform: Option<Platform>,
    /// `YYYY-MM-DD` or a full timestamp; compared verbatim against grid days.
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deliverable {
    pub id: RecordId,
    pub name: String,
    pub deliverable_type: DeliverableType,
    pub status: AssetStatus,
    #[serde(default)]
    pub content_type: Option<ContentType>,
    #[serde(default)]
    pub episode_title: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishingTask {
    pub id: RecordId,
    pub episode_title: String,
    pub platform: Platform,
    pub status: TaskStatus,
    #[serde(default)]
    pub client_id: Option<RecordId>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub published_url: Option<String>,
}

/// Aggregate counters shown above the publishing table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublishingStats {
    pub total: u64,
    pub pending: u64,
    pub scheduled: u64,
    pub published: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub id: RecordId,
    pub name: String,
}

impl Identified for Submission {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Identified for Deliverable {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Identified for PublishingTask {
    fn id(&self) -> RecordId {
        self.id
    }
}
