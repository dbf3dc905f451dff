use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::InvalidPathSegment;

/// Success body of the mutation endpoints. Unregister may omit `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

pub fn activities_route() -> &'static str {
    "/activities"
}

pub fn signup_route() -> &'static str {
    "/activities/:activity_name/signup"
}

pub fn participants_route() -> &'static str {
    "/activities/:activity_name/participants"
}

pub fn activities_url(base: &Url) -> Url {
    let mut url = base.clone();
    push_segments(&mut url, &["activities"]);
    url
}

/// `POST /activities/{name}/signup?email={email}` with both parts percent-encoded.
pub fn signup_url(
    base: &Url,
    activity_name: &str,
    email: &str,
) -> Result<Url, InvalidPathSegment> {
    let mut url = base.clone();
    push_segments(&mut url, &["activities", checked_segment(activity_name)?, "signup"]);
    url.query_pairs_mut().clear().append_pair("email", email);
    Ok(url)
}

/// `DELETE /activities/{name}/participants?email={email}` with both parts percent-encoded.
pub fn participants_url(
    base: &Url,
    activity_name: &str,
    email: &str,
) -> Result<Url, InvalidPathSegment> {
    let mut url = base.clone();
    push_segments(&mut url, &["activities", checked_segment(activity_name)?, "participants"]);
    url.query_pairs_mut().clear().append_pair("email", email);
    Ok(url)
}

fn checked_segment(segment: &str) -> Result<&str, InvalidPathSegment> {
    if matches!(segment, "." | "..") {
        return Err(InvalidPathSegment(segment.to_string()));
    }
    Ok(segment)
}

fn push_segments(url: &mut Url, segments: &[&str]) {
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
