use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure body returned by the activities service on non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl DetailBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
    #[error("Activity not found")]
    ActivityNotFound,
    #[error("Student already signed up for this activity")]
    AlreadySignedUp,
    #[error("Student not signed up for this activity")]
    NotSignedUp,
    #[error("Activity is full")]
    ActivityFull,
}

impl ApiFailure {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiFailure::ActivityNotFound => 404,
            ApiFailure::AlreadySignedUp | ApiFailure::NotSignedUp | ApiFailure::ActivityFull => {
                400
            }
        }
    }
}

impl From<ApiFailure> for DetailBody {
    fn from(value: ApiFailure) -> Self {
        DetailBody::new(value.to_string())
    }
}

/// A path segment that URL normalisation would collapse (`.` or `..`), so the
/// request would reach a different resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' cannot be used as a path segment")]
pub struct InvalidPathSegment(pub String);
