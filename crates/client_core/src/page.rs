//! Fixed host-page skeleton the roster core populates.

use thiserror::Error;

use crate::dom::{Document, NodeId, Selector};

pub const ACTIVITIES_LIST_ID: &str = "activities-list";
pub const ACTIVITY_SELECT_ID: &str = "activity";
pub const SIGNUP_FORM_ID: &str = "signup-form";
pub const EMAIL_INPUT_ID: &str = "email";
pub const MESSAGE_ID: &str = "message";

pub const SELECT_PLACEHOLDER: &str = "-- Select an activity --";
pub const SUBMIT_LABEL: &str = "Sign Up";
const LOADING_TEXT: &str = "Loading activities...";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("host page is missing element #{0}")]
    MissingElement(&'static str),
    #[error("signup form has no submit button")]
    MissingSubmitButton,
}

/// Handles to the elements the core expects the host page to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostPage {
    pub activities_list: NodeId,
    pub activity_select: NodeId,
    pub signup_form: NodeId,
    pub email_input: NodeId,
    pub submit_button: NodeId,
    pub message: NodeId,
}

impl HostPage {
    /// Builds the static page skeleton under the document root.
    pub fn mount(doc: &mut Document) -> Result<Self, PageError> {
        let root = doc.root();

        let activities = doc.append_new(root, "section");
        let list = doc.append_new(activities, "div");
        if let Some(element) = doc.get_mut(list) {
            element.set_id(ACTIVITIES_LIST_ID);
        }
        let loading = doc.append_new(list, "p");
        if let Some(element) = doc.get_mut(loading) {
            element.set_text(LOADING_TEXT);
        }

        let form = doc.append_new(root, "form");
        if let Some(element) = doc.get_mut(form) {
            element.set_id(SIGNUP_FORM_ID);
        }
        let email = doc.append_new(form, "input");
        if let Some(element) = doc.get_mut(email) {
            element.set_id(EMAIL_INPUT_ID);
            element.set_attr("type", "email");
            element.set_attr("required", "");
        }
        let select = doc.append_new(form, "select");
        if let Some(element) = doc.get_mut(select) {
            element.set_id(ACTIVITY_SELECT_ID);
        }
        reset_select(doc, select);
        let button = doc.append_new(form, "button");
        if let Some(element) = doc.get_mut(button) {
            element.set_attr("type", "submit");
            element.set_text(SUBMIT_LABEL);
        }

        let message = doc.append_new(root, "div");
        if let Some(element) = doc.get_mut(message) {
            element.set_id(MESSAGE_ID);
            element.set_class_name("message hidden");
        }

        Self::attach(doc)
    }

    /// Resolves the fixed element ids of an already-built page.
    pub fn attach(doc: &Document) -> Result<Self, PageError> {
        let by_id = |id: &'static str| doc.get_element_by_id(id).ok_or(PageError::MissingElement(id));
        let signup_form = by_id(SIGNUP_FORM_ID)?;
        let submit_button = doc
            .find_all(signup_form, &Selector::parse("button"))
            .into_iter()
            .find(|node| {
                doc.get(*node)
                    .is_some_and(|element| element.attr("type") == Some("submit"))
            })
            .ok_or(PageError::MissingSubmitButton)?;

        Ok(Self {
            activities_list: by_id(ACTIVITIES_LIST_ID)?,
            activity_select: by_id(ACTIVITY_SELECT_ID)?,
            signup_form,
            email_input: by_id(EMAIL_INPUT_ID)?,
            submit_button,
            message: by_id(MESSAGE_ID)?,
        })
    }

    pub fn email(&self, doc: &Document) -> String {
        doc.get(self.email_input)
            .map(|element| element.value().trim().to_string())
            .unwrap_or_default()
    }

    pub fn selected_activity(&self, doc: &Document) -> String {
        doc.get(self.activity_select)
            .map(|element| element.value().to_string())
            .unwrap_or_default()
    }

    /// Types `email` and picks `activity`. Like a real select, picking a
    /// value with no matching option leaves the selection empty.
    pub fn fill_signup(&self, doc: &mut Document, activity: &str, email: &str) {
        if let Some(element) = doc.get_mut(self.email_input) {
            element.set_value(email);
        }
        let has_option = doc
            .find_all(self.activity_select, &Selector::parse("option"))
            .into_iter()
            .any(|node| doc.get(node).is_some_and(|option| option.value() == activity));
        if let Some(element) = doc.get_mut(self.activity_select) {
            element.set_value(if has_option { activity } else { "" });
        }
    }

    pub fn reset_form(&self, doc: &mut Document) {
        if let Some(element) = doc.get_mut(self.email_input) {
            element.set_value("");
        }
        if let Some(element) = doc.get_mut(self.activity_select) {
            element.set_value("");
        }
    }

    /// Option values currently offered by the activity selector, placeholder excluded.
    pub fn activity_options(&self, doc: &Document) -> Vec<String> {
        doc.find_all(self.activity_select, &Selector::parse("option"))
            .into_iter()
            .filter_map(|node| doc.get(node))
            .map(|option| option.value().to_string())
            .filter(|value| !value.is_empty())
            .collect()
    }
}

/// Leaves `select` holding only the empty placeholder option.
pub(crate) fn reset_select(doc: &mut Document, select: NodeId) {
    doc.clear_children(select);
    let placeholder = doc.append_new(select, "option");
    if let Some(element) = doc.get_mut(placeholder) {
        element.set_value("");
        element.set_text(SELECT_PLACEHOLDER);
    }
    if let Some(element) = doc.get_mut(select) {
        element.set_value("");
    }
}
