//! Activity roster client: keeps a rendered roster in sync with the
//! activities service, which stays the only source of truth.
//!
//! The [`Fetcher`] pulls snapshots and renders them, the
//! [`ActionDispatcher`] turns user actions into requests and asks the fetcher
//! for a refresh after every success, and the retained [`dom::Document`] is
//! the only cache.

use std::{sync::Arc, time::Duration};

use shared::domain::ActivitySnapshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub mod banner;
pub mod busy;
pub mod config;
pub mod dispatcher;
pub mod dom;
pub mod error;
pub mod fetcher;
pub mod initials;
pub mod page;
pub mod render;
pub mod transport;

pub use config::ClientTimings;
pub use dispatcher::{ActionDispatcher, ActionOutcome};
pub use dom::{Document, NodeId, SharedDocument};
pub use error::{ActionError, FetchError, TransportError};
pub use fetcher::Fetcher;
pub use page::{HostPage, PageError};
pub use transport::{ActivitiesTransport, HttpActivitiesTransport, HttpReply, MissingTransport};

use dom::Selector;
use render::{DATA_ACTIVITY, DATA_EMAIL, PARTICIPANT_DELETE_CLASS};

/// A mounted roster page wired to one activities service.
#[derive(Clone)]
pub struct RosterApp {
    doc: SharedDocument,
    page: HostPage,
    fetcher: Fetcher,
    dispatcher: ActionDispatcher,
}

impl RosterApp {
    /// Mounts a fresh page and wires the core to `transport`.
    pub fn new(
        transport: Arc<dyn ActivitiesTransport>,
        timings: ClientTimings,
    ) -> Result<Self, PageError> {
        let mut doc = Document::new();
        let page = HostPage::mount(&mut doc)?;
        Ok(Self::attach(SharedDocument::new(doc), page, transport, timings))
    }

    /// Wires the core into an already-mounted page.
    pub fn attach(
        doc: SharedDocument,
        page: HostPage,
        transport: Arc<dyn ActivitiesTransport>,
        timings: ClientTimings,
    ) -> Self {
        let fetcher = Fetcher::new(Arc::clone(&transport), doc.clone(), page);
        let dispatcher =
            ActionDispatcher::new(transport, doc.clone(), page, fetcher.clone(), timings);
        Self {
            doc,
            page,
            fetcher,
            dispatcher,
        }
    }

    pub fn connect(server_url: &str, timings: ClientTimings) -> anyhow::Result<Self> {
        let transport = HttpActivitiesTransport::new(server_url)?;
        Ok(Self::new(Arc::new(transport), timings)?)
    }

    pub fn document(&self) -> &SharedDocument {
        &self.doc
    }

    pub fn page(&self) -> HostPage {
        self.page
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    /// Initial paint.
    pub async fn load(&self) -> Result<ActivitySnapshot, FetchError> {
        let snapshot = self.fetcher.fetch_activities().await?;
        info!(activities = snapshot.len(), "roster loaded");
        Ok(snapshot)
    }

    pub fn fill_signup(&self, activity: &str, email: &str) {
        self.page.fill_signup(&mut self.doc.lock(), activity, email);
    }

    pub async fn signup(&self, activity: &str, email: &str) -> ActionOutcome {
        self.fill_signup(activity, email);
        self.dispatcher.submit_signup().await
    }

    /// Finds the removal control currently rendered for `(activity, email)`.
    pub fn find_delete_control(&self, activity: &str, email: &str) -> Option<NodeId> {
        let doc = self.doc.lock();
        let controls = doc.find_all(
            self.page.activities_list,
            &Selector::Class(PARTICIPANT_DELETE_CLASS.into()),
        );
        controls.into_iter().find(|node| {
            doc.get(*node).is_some_and(|button| {
                button.data(DATA_ACTIVITY) == Some(activity)
                    && button.data(DATA_EMAIL) == Some(email)
            })
        })
    }

    /// Clicks the rendered removal control for `(activity, email)`, if any.
    pub async fn unregister(&self, activity: &str, email: &str) -> ActionOutcome {
        match self.find_delete_control(activity, email) {
            Some(control) => self.dispatcher.click(control).await,
            None => ActionOutcome::Ignored,
        }
    }

    /// Periodically re-pulls the snapshot. Failures are rendered and logged by
    /// the fetcher and never stop the loop. A zero interval disables refresh
    /// and returns `None`.
    pub fn spawn_background_refresh(&self, every: Duration) -> Option<JoinHandle<()>> {
        if every.is_zero() {
            debug!("background refresh disabled");
            return None;
        }
        let fetcher = self.fetcher.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                debug!("background refresh");
                let _ = fetcher.fetch_activities().await;
            }
        }))
    }

    pub fn message(&self) -> Option<String> {
        self.dispatcher.banner().visible_text()
    }

    /// Text outline of the roster container.
    pub fn roster_outline(&self) -> String {
        self.doc.lock().outline(self.page.activities_list)
    }
}

#[cfg(test)]
#[path = "tests/stub_server.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
