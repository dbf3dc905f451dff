//! Transient message area shared by every user action.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use crate::dom::{NodeId, SharedDocument};

const HIDDEN_CLASS: &str = "hidden";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

impl BannerKind {
    fn class_name(self) -> &'static str {
        match self {
            BannerKind::Success => "message success",
            BannerKind::Error => "message error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MessageBanner {
    doc: SharedDocument,
    node: NodeId,
    shown: Arc<AtomicU64>,
}

impl MessageBanner {
    pub fn new(doc: SharedDocument, node: NodeId) -> Self {
        Self {
            doc,
            node,
            shown: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Shows `text` immediately and hides it after `hide_after`, unless a
    /// newer message has replaced it by then. Must be called on a Tokio runtime.
    pub fn show(&self, text: &str, kind: BannerKind, hide_after: Duration) {
        let generation = self.shown.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(element) = self.doc.lock().get_mut(self.node) {
            element.set_text(text);
            element.set_class_name(kind.class_name());
        }

        let banner = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(hide_after).await;
            if banner.shown.load(Ordering::SeqCst) == generation {
                banner.hide();
            }
        });
    }

    pub fn hide(&self) {
        if let Some(element) = self.doc.lock().get_mut(self.node) {
            element.add_class(HIDDEN_CLASS);
        }
    }

    /// Current text when visible.
    pub fn visible_text(&self) -> Option<String> {
        let doc = self.doc.lock();
        let element = doc.get(self.node)?;
        (!element.has_class(HIDDEN_CLASS)).then(|| element.text().to_string())
    }

    pub fn kind(&self) -> Option<BannerKind> {
        let doc = self.doc.lock();
        let element = doc.get(self.node)?;
        if element.has_class("success") {
            Some(BannerKind::Success)
        } else if element.has_class("error") {
            Some(BannerKind::Error)
        } else {
            None
        }
    }
}
