//! Snapshot-to-tree rendering. Every call rebuilds the roster wholesale.

use shared::domain::{ActivityDetails, ActivitySnapshot};

use crate::{
    dom::{Document, Element, NodeId},
    initials::initials,
    page::{reset_select, HostPage},
};

pub const PARTICIPANTS_HEADING: &str = "Participants";
pub const NO_PARTICIPANTS_TEXT: &str = "No participants yet";
pub const LOAD_FAILURE_TEXT: &str = "Failed to load activities. Please try again later.";
pub const DELETE_LABEL: &str = "✕";
pub const DELETE_TITLE: &str = "Unregister participant";

pub const ACTIVITY_CARD_CLASS: &str = "activity-card";
pub const PARTICIPANT_ROW_CLASS: &str = "participant-row";
pub const PARTICIPANT_DELETE_CLASS: &str = "participant-delete";
pub const PARTICIPANTS_EMPTY_CLASS: &str = "participants-empty";

pub const DATA_ACTIVITY: &str = "activity";
pub const DATA_EMAIL: &str = "email";

/// One rendered participant line, tagged for later unregister dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRow {
    pub initials: String,
    pub email: String,
    pub activity_name: String,
}

impl ParticipantRow {
    pub fn new(activity_name: &str, email: &str) -> Self {
        Self {
            initials: initials(email),
            email: email.to_string(),
            activity_name: activity_name.to_string(),
        }
    }
}

pub fn participant_rows(activity_name: &str, details: &ActivityDetails) -> Vec<ParticipantRow> {
    details
        .participants
        .iter()
        .map(|email| ParticipantRow::new(activity_name, email))
        .collect()
}

pub fn availability_text(details: &ActivityDetails) -> String {
    format!("Availability: {} spots left", details.spots_left())
}

/// Replaces the roster and the activity options with the contents of `snapshot`.
pub fn render(doc: &mut Document, page: &HostPage, snapshot: &ActivitySnapshot) {
    doc.clear_children(page.activities_list);
    reset_select(doc, page.activity_select);

    for (name, details) in snapshot {
        let card = doc.append_new(page.activities_list, "div");
        set(doc, card, |element| element.add_class(ACTIVITY_CARD_CLASS));

        text_child(doc, card, "h4", name);
        text_child(doc, card, "p", &details.description);
        text_child(doc, card, "p", &format!("Schedule: {}", details.schedule));
        text_child(doc, card, "p", &availability_text(details));
        render_participants(doc, card, &participant_rows(name, details));

        let option = doc.append_new(page.activity_select, "option");
        set(doc, option, |element| {
            element.set_value(name.as_str());
            element.set_text(name.as_str());
        });
    }
}

/// Swaps the roster for the static load-failure notice.
pub fn render_failure(doc: &mut Document, page: &HostPage) {
    doc.clear_children(page.activities_list);
    text_child(doc, page.activities_list, "p", LOAD_FAILURE_TEXT);
}

fn render_participants(doc: &mut Document, card: NodeId, rows: &[ParticipantRow]) {
    let section = doc.append_new(card, "div");
    set(doc, section, |element| element.add_class("participants-section"));
    text_child(doc, section, "h5", PARTICIPANTS_HEADING);

    if rows.is_empty() {
        let empty = text_child(doc, section, "div", NO_PARTICIPANTS_TEXT);
        set(doc, empty, |element| element.add_class(PARTICIPANTS_EMPTY_CLASS));
        return;
    }

    let list = doc.append_new(section, "ul");
    set(doc, list, |element| element.add_class("participants-list"));
    for row in rows {
        let item = doc.append_new(list, "li");
        set(doc, item, |element| element.add_class(PARTICIPANT_ROW_CLASS));

        let avatar = text_child(doc, item, "span", &row.initials);
        set(doc, avatar, |element| element.add_class("participant-avatar"));
        let email = text_child(doc, item, "span", &row.email);
        set(doc, email, |element| element.add_class("participant-email"));

        let delete = text_child(doc, item, "button", DELETE_LABEL);
        set(doc, delete, |element| {
            element.add_class(PARTICIPANT_DELETE_CLASS);
            element.set_attr("title", DELETE_TITLE);
            element.set_attr("aria-label", DELETE_TITLE);
            element.set_data(DATA_ACTIVITY, row.activity_name.as_str());
            element.set_data(DATA_EMAIL, row.email.as_str());
        });
    }
}

fn text_child(doc: &mut Document, parent: NodeId, tag: &str, text: &str) -> NodeId {
    let node = doc.append_new(parent, tag);
    set(doc, node, |element| element.set_text(text));
    node
}

fn set(doc: &mut Document, node: NodeId, f: impl FnOnce(&mut Element)) {
    if let Some(element) = doc.get_mut(node) {
        f(element);
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
