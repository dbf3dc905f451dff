//! Scoped busy state for actionable controls.

use crate::dom::{NodeId, SharedDocument};

/// Holds a control disabled with an in-progress label until dropped.
///
/// Dropping restores the label captured at acquisition and re-enables the
/// control, on every exit path. A control replaced by a rebuild in the
/// meantime is left alone.
#[derive(Debug)]
pub struct BusyGuard {
    doc: SharedDocument,
    control: NodeId,
    idle_label: String,
}

impl BusyGuard {
    /// Returns `None` when the control is gone or already busy.
    pub fn acquire(doc: &SharedDocument, control: NodeId, busy_label: &str) -> Option<Self> {
        let mut locked = doc.lock();
        let element = locked.get_mut(control)?;
        if element.is_disabled() {
            return None;
        }
        let idle_label = element.text().to_string();
        element.set_disabled(true);
        element.set_text(busy_label);
        Some(Self {
            doc: doc.clone(),
            control,
            idle_label,
        })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if let Some(element) = self.doc.lock().get_mut(self.control) {
            element.set_disabled(false);
            element.set_text(std::mem::take(&mut self.idle_label));
        }
    }
}
