//! User actions: signup through the form, unregister through row controls.
//!
//! Both actions follow `idle -> submitting -> idle`. The submitting state is a
//! [`BusyGuard`] on the control that started the action, so it is released on
//! success, server rejection and transport failure alike. A successful action
//! never edits the roster from its own data; it asks the [`Fetcher`] for the
//! authoritative snapshot instead.

use std::sync::Arc;

use shared::{error::DetailBody, protocol::MessageBody};
use tracing::{error, info, warn};

use crate::{
    banner::{BannerKind, MessageBanner},
    busy::BusyGuard,
    config::ClientTimings,
    dom::{NodeId, Selector, SharedDocument},
    error::{ActionError, TransportError},
    fetcher::Fetcher,
    page::HostPage,
    render::{DATA_ACTIVITY, DATA_EMAIL, PARTICIPANT_DELETE_CLASS},
    transport::{ActivitiesTransport, HttpReply},
};

pub const SELECT_ACTIVITY_MESSAGE: &str = "Please select an activity.";
pub const SIGNUP_BUSY_LABEL: &str = "Signing up...";
pub const SIGNUP_REJECTED_MESSAGE: &str = "An error occurred";
pub const SIGNUP_FAILED_MESSAGE: &str = "Failed to sign up. Please try again.";
pub const UNREGISTER_BUSY_LABEL: &str = "...";
pub const UNREGISTER_REJECTED_MESSAGE: &str = "Failed to unregister";
pub const UNREGISTER_FAILED_MESSAGE: &str = "Failed to unregister. Please try again.";

#[derive(Debug)]
pub enum ActionOutcome {
    /// Nothing to do: the target was not a removal control, or the control
    /// was already busy.
    Ignored,
    Succeeded { message: String },
    Failed(ActionError),
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Succeeded { .. })
    }
}

#[derive(Clone)]
pub struct ActionDispatcher {
    transport: Arc<dyn ActivitiesTransport>,
    doc: SharedDocument,
    page: HostPage,
    fetcher: Fetcher,
    banner: MessageBanner,
    timings: ClientTimings,
}

impl ActionDispatcher {
    pub fn new(
        transport: Arc<dyn ActivitiesTransport>,
        doc: SharedDocument,
        page: HostPage,
        fetcher: Fetcher,
        timings: ClientTimings,
    ) -> Self {
        let banner = MessageBanner::new(doc.clone(), page.message);
        Self {
            transport,
            doc,
            page,
            fetcher,
            banner,
            timings,
        }
    }

    pub fn banner(&self) -> &MessageBanner {
        &self.banner
    }

    /// Handles a submit of the signup form using its current field values.
    pub async fn submit_signup(&self) -> ActionOutcome {
        let (activity, email) = {
            let doc = self.doc.lock();
            (self.page.selected_activity(&doc), self.page.email(&doc))
        };

        if activity.is_empty() {
            self.banner.show(
                SELECT_ACTIVITY_MESSAGE,
                BannerKind::Error,
                self.timings.validation_banner,
            );
            return ActionOutcome::Failed(ActionError::Validation(
                SELECT_ACTIVITY_MESSAGE.to_string(),
            ));
        }

        let Some(_busy) = BusyGuard::acquire(&self.doc, self.page.submit_button, SIGNUP_BUSY_LABEL)
        else {
            return ActionOutcome::Ignored;
        };

        let result = self.transport.post_signup(&activity, &email).await;
        match result.and_then(|reply| signup_result(&reply)) {
            Ok(Ok(message)) => {
                info!(%activity, %email, "signed up participant");
                self.page.reset_form(&mut self.doc.lock());
                self.refresh_after_mutation().await;
                self.banner
                    .show(&message, BannerKind::Success, self.timings.outcome_banner);
                ActionOutcome::Succeeded { message }
            }
            Ok(Err((status, detail))) => {
                warn!(%activity, %email, status, detail = ?detail, "signup rejected");
                let message = detail.as_deref().unwrap_or(SIGNUP_REJECTED_MESSAGE);
                self.banner
                    .show(message, BannerKind::Error, self.timings.outcome_banner);
                ActionOutcome::Failed(ActionError::ServerRejection { status, detail })
            }
            Err(err) => {
                error!(%activity, %email, error = %err, "error signing up");
                self.banner.show(
                    SIGNUP_FAILED_MESSAGE,
                    BannerKind::Error,
                    self.timings.outcome_banner,
                );
                ActionOutcome::Failed(ActionError::Transport(err))
            }
        }
    }

    /// Delegated click handler for the activities container.
    ///
    /// `target` may be any node; it is resolved to the nearest removal
    /// control and ignored when there is none.
    pub async fn click(&self, target: NodeId) -> ActionOutcome {
        let Some((control, activity, email)) = self.resolve_delete_control(target) else {
            return ActionOutcome::Ignored;
        };
        self.unregister(control, &activity, &email).await
    }

    async fn unregister(&self, control: NodeId, activity: &str, email: &str) -> ActionOutcome {
        let Some(_busy) = BusyGuard::acquire(&self.doc, control, UNREGISTER_BUSY_LABEL) else {
            return ActionOutcome::Ignored;
        };

        let result = self.transport.delete_participant(activity, email).await;
        match result {
            Ok(reply) if reply.is_success() => {
                let message = reply
                    .json::<MessageBody>()
                    .ok()
                    .and_then(|body| body.message)
                    .unwrap_or_else(|| format!("Unregistered {email} from {activity}"));
                info!(%activity, %email, "unregistered participant");
                {
                    let mut doc = self.doc.lock();
                    if let Some(row) = doc.closest(control, &Selector::parse("li")) {
                        doc.remove(row);
                    }
                }
                self.banner
                    .show(&message, BannerKind::Success, self.timings.outcome_banner);
                self.refresh_after_mutation().await;
                ActionOutcome::Succeeded { message }
            }
            Ok(reply) => {
                let detail = detail_of(&reply);
                warn!(%activity, %email, status = reply.status, detail = ?detail, "unregister rejected");
                let message = detail.as_deref().unwrap_or(UNREGISTER_REJECTED_MESSAGE);
                self.banner
                    .show(message, BannerKind::Error, self.timings.outcome_banner);
                ActionOutcome::Failed(ActionError::ServerRejection {
                    status: reply.status,
                    detail,
                })
            }
            Err(err) => {
                error!(%activity, %email, error = %err, "error unregistering");
                self.banner.show(
                    UNREGISTER_FAILED_MESSAGE,
                    BannerKind::Error,
                    self.timings.outcome_banner,
                );
                ActionOutcome::Failed(ActionError::Transport(err))
            }
        }
    }

    fn resolve_delete_control(&self, target: NodeId) -> Option<(NodeId, String, String)> {
        let doc = self.doc.lock();
        let control = doc.closest(target, &Selector::Class(PARTICIPANT_DELETE_CLASS.into()))?;
        if !doc.is_inclusive_ancestor(self.page.activities_list, control) {
            return None;
        }
        let element = doc.get(control)?;
        let activity = element.data(DATA_ACTIVITY).filter(|v| !v.is_empty())?;
        let email = element.data(DATA_EMAIL).filter(|v| !v.is_empty())?;
        Some((control, activity.to_string(), email.to_string()))
    }

    /// The mutation already succeeded, so a failed refresh only affects the
    /// roster (which now shows the failure notice), not the action's outcome.
    async fn refresh_after_mutation(&self) {
        if let Err(err) = self.fetcher.fetch_activities().await {
            warn!(error = %err, "refresh after successful action failed");
        }
    }
}

/// Splits a signup reply into the confirmation message or the rejection.
/// A 2xx body that is not the expected JSON counts as a transport failure.
fn signup_result(
    reply: &HttpReply,
) -> Result<Result<String, (u16, Option<String>)>, TransportError> {
    if reply.is_success() {
        let body = reply.json::<MessageBody>()?;
        Ok(Ok(body.message.unwrap_or_default()))
    } else {
        Ok(Err((reply.status, detail_of(reply))))
    }
}

fn detail_of(reply: &HttpReply) -> Option<String> {
    reply
        .json::<DetailBody>()
        .ok()
        .and_then(|body| body.detail)
        .filter(|detail| !detail.is_empty())
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
