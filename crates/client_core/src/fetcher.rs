//! Sole producer of rendered roster state.

use std::sync::Arc;

use shared::domain::ActivitySnapshot;
use tracing::{debug, error};

use crate::{
    dom::SharedDocument,
    error::FetchError,
    page::HostPage,
    render::{render, render_failure},
    transport::ActivitiesTransport,
};

#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn ActivitiesTransport>,
    doc: SharedDocument,
    page: HostPage,
}

impl Fetcher {
    pub fn new(
        transport: Arc<dyn ActivitiesTransport>,
        doc: SharedDocument,
        page: HostPage,
    ) -> Self {
        Self {
            transport,
            doc,
            page,
        }
    }

    /// Pulls a fresh snapshot and renders it before returning.
    ///
    /// On failure the roster is replaced with the failure notice, the error is
    /// logged, and the error is handed back to the caller. Overlapping calls
    /// are not coalesced: whichever render lands last wins.
    pub async fn fetch_activities(&self) -> Result<ActivitySnapshot, FetchError> {
        debug!("fetching activities snapshot");
        match self.pull().await {
            Ok(snapshot) => {
                render(&mut self.doc.lock(), &self.page, &snapshot);
                debug!(activities = snapshot.len(), "rendered activities snapshot");
                Ok(snapshot)
            }
            Err(err) => {
                render_failure(&mut self.doc.lock(), &self.page);
                error!(error = %err, "error fetching activities");
                Err(err)
            }
        }
    }

    async fn pull(&self) -> Result<ActivitySnapshot, FetchError> {
        let reply = self.transport.get_activities().await?;
        if !reply.is_success() {
            return Err(FetchError::Status(reply.status));
        }
        Ok(reply.json::<ActivitySnapshot>()?)
    }
}
