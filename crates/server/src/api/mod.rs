use shared::{domain::ActivitySnapshot, error::ApiFailure, protocol::MessageBody};
use tracing::info;

use crate::store::ActivityStore;

#[derive(Clone)]
pub struct ApiContext {
    pub store: ActivityStore,
}

pub async fn list_activities(ctx: &ApiContext) -> ActivitySnapshot {
    ctx.store.snapshot().await
}

pub async fn signup(
    ctx: &ApiContext,
    activity_name: &str,
    email: &str,
) -> Result<MessageBody, ApiFailure> {
    ctx.store
        .with_activity(activity_name, |details| {
            if details.has_participant(email) {
                return Err(ApiFailure::AlreadySignedUp);
            }
            if details.is_full() {
                return Err(ApiFailure::ActivityFull);
            }
            details.participants.push(email.to_string());
            Ok(())
        })
        .await
        .ok_or(ApiFailure::ActivityNotFound)??;

    info!(activity = activity_name, email, "participant signed up");
    Ok(MessageBody::new(format!(
        "Signed up {email} for {activity_name}"
    )))
}

pub async fn unregister(
    ctx: &ApiContext,
    activity_name: &str,
    email: &str,
) -> Result<MessageBody, ApiFailure> {
    ctx.store
        .with_activity(activity_name, |details| {
            let before = details.participants.len();
            details.participants.retain(|p| p != email);
            if details.participants.len() == before {
                Err(ApiFailure::NotSignedUp)
            } else {
                Ok(())
            }
        })
        .await
        .ok_or(ApiFailure::ActivityNotFound)??;

    info!(activity = activity_name, email, "participant unregistered");
    Ok(MessageBody::new(format!(
        "Unregistered {email} from {activity_name}"
    )))
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
