use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::json;
use tokio::sync::Semaphore;

use super::*;
use crate::{
    page::SUBMIT_LABEL,
    render::{render, DELETE_LABEL, LOAD_FAILURE_TEXT},
    test_support::{chess_and_basketball, spawn_stub_server, StubServer},
    transport::MissingTransport,
    RosterApp,
};

async fn loaded_app() -> (RosterApp, StubServer) {
    let (url, stub) = spawn_stub_server(chess_and_basketball()).await;
    let app = RosterApp::connect(&url, ClientTimings::default()).expect("app");
    app.load().await.expect("initial load");
    (app, stub)
}

fn submit_button_state(app: &RosterApp) -> (bool, String) {
    let doc = app.document().lock();
    let button = doc.get(app.page().submit_button).expect("submit button");
    (button.is_disabled(), button.text().to_string())
}

fn form_values(app: &RosterApp) -> (String, String) {
    let doc = app.document().lock();
    (
        app.page().selected_activity(&doc),
        app.page().email(&doc),
    )
}

fn roster_text(app: &RosterApp) -> String {
    let doc = app.document().lock();
    doc.text_content(app.page().activities_list)
}

/// Serves a fixed snapshot; every unregister waits for a permit and then fails
/// or succeeds as configured.
struct GatedTransport {
    snapshot: shared::domain::ActivitySnapshot,
    permits: Arc<Semaphore>,
    delete_fails: bool,
}

#[async_trait]
impl ActivitiesTransport for GatedTransport {
    async fn get_activities(&self) -> Result<HttpReply, TransportError> {
        Ok(HttpReply::new(
            200,
            serde_json::to_vec(&self.snapshot).expect("snapshot json"),
        ))
    }

    async fn post_signup(
        &self,
        _activity: &str,
        _email: &str,
    ) -> Result<HttpReply, TransportError> {
        Err(TransportError::Unavailable("signup not served".into()))
    }

    async fn delete_participant(
        &self,
        activity: &str,
        email: &str,
    ) -> Result<HttpReply, TransportError> {
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| TransportError::Unavailable("gate closed".into()))?;
        permit.forget();
        if self.delete_fails {
            return Err(TransportError::Unavailable("connection reset".into()));
        }
        Ok(HttpReply::new(
            200,
            json!({ "message": format!("Unregistered {email} from {activity}") }).to_string(),
        ))
    }
}

fn gated_app(delete_fails: bool) -> (RosterApp, Arc<Semaphore>) {
    let permits = Arc::new(Semaphore::new(0));
    let transport = GatedTransport {
        snapshot: chess_and_basketball(),
        permits: Arc::clone(&permits),
        delete_fails,
    };
    let app = RosterApp::new(Arc::new(transport), ClientTimings::default()).expect("app");
    (app, permits)
}

async fn wait_until(mut check: impl FnMut() -> bool) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn signup_success_clears_form_and_refreshes() {
    let (app, stub) = loaded_app().await;
    stub.reply_to_signup(StatusCode::OK, json!({ "message": "Signed up" }))
        .await;
    stub.add_participant("Chess Club", "a@b.com").await;

    let outcome = app.signup("Chess Club", "a@b.com").await;

    assert!(matches!(&outcome, ActionOutcome::Succeeded { message } if message == "Signed up"));
    assert_eq!(form_values(&app), (String::new(), String::new()));
    assert_eq!(app.message().as_deref(), Some("Signed up"));
    assert_eq!(
        app.dispatcher().banner().kind(),
        Some(crate::banner::BannerKind::Success)
    );
    assert_eq!(stub.methods().await, vec!["GET", "POST", "GET"]);
    assert_eq!(submit_button_state(&app), (false, SUBMIT_LABEL.to_string()));
    assert!(app.find_delete_control("Chess Club", "a@b.com").is_some());
}

#[tokio::test]
async fn signup_sends_activity_and_email_decoded_by_server() {
    let (app, stub) = loaded_app().await;

    let outcome = app.signup("Chess Club", "first+tag@b.com").await;

    assert!(outcome.is_success());
    let post = stub
        .requests()
        .await
        .into_iter()
        .find(|r| r.method == "POST")
        .expect("post recorded");
    assert_eq!(post.activity.as_deref(), Some("Chess Club"));
    assert_eq!(post.email.as_deref(), Some("first+tag@b.com"));
    assert!(roster_text(&app).contains("first+tag@b.com"));
}

#[tokio::test]
async fn signup_rejection_shows_detail_and_keeps_form() {
    let (app, stub) = loaded_app().await;
    stub.reply_to_signup(StatusCode::BAD_REQUEST, json!({ "detail": "Activity full" }))
        .await;

    let outcome = app.signup("Chess Club", "a@b.com").await;

    assert!(matches!(
        outcome,
        ActionOutcome::Failed(ActionError::ServerRejection { status: 400, .. })
    ));
    assert_eq!(app.message().as_deref(), Some("Activity full"));
    assert_eq!(
        form_values(&app),
        ("Chess Club".to_string(), "a@b.com".to_string())
    );
    assert_eq!(stub.methods().await, vec!["GET", "POST"]);
    assert_eq!(submit_button_state(&app), (false, SUBMIT_LABEL.to_string()));
}

#[tokio::test]
async fn signup_rejection_without_detail_uses_generic_message() {
    let (app, stub) = loaded_app().await;
    stub.reply_to_signup(StatusCode::INTERNAL_SERVER_ERROR, json!({}))
        .await;

    app.signup("Chess Club", "a@b.com").await;

    assert_eq!(app.message().as_deref(), Some(SIGNUP_REJECTED_MESSAGE));
}

#[tokio::test]
async fn missing_activity_never_reaches_server() {
    let (app, stub) = loaded_app().await;
    app.fill_signup("", "a@b.com");

    let outcome = app.dispatcher().submit_signup().await;

    assert!(matches!(outcome, ActionOutcome::Failed(ActionError::Validation(_))));
    assert_eq!(app.message().as_deref(), Some(SELECT_ACTIVITY_MESSAGE));
    assert_eq!(stub.methods().await, vec!["GET"]);
    assert_eq!(submit_button_state(&app), (false, SUBMIT_LABEL.to_string()));
}

#[tokio::test(start_paused = true)]
async fn missing_activity_message_shows_synchronously_and_hides_after_three_seconds() {
    let app = RosterApp::new(Arc::new(MissingTransport), ClientTimings::default()).expect("app");

    let dispatcher = app.dispatcher().clone();
    let submit = dispatcher.submit_signup();
    tokio::pin!(submit);
    let outcome = futures::poll!(submit.as_mut());
    assert!(matches!(
        outcome,
        std::task::Poll::Ready(ActionOutcome::Failed(ActionError::Validation(_)))
    ));
    assert_eq!(app.message().as_deref(), Some(SELECT_ACTIVITY_MESSAGE));

    tokio::time::sleep(Duration::from_millis(2_900)).await;
    assert!(app.message().is_some());
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(app.message(), None);
}

#[tokio::test]
async fn signup_transport_failure_keeps_form_and_restores_button() {
    let app = RosterApp::new(Arc::new(MissingTransport), ClientTimings::default()).expect("app");
    render(
        &mut app.document().lock(),
        &app.page(),
        &chess_and_basketball(),
    );

    let outcome = app.signup("Chess Club", "a@b.com").await;

    assert!(matches!(outcome, ActionOutcome::Failed(ActionError::Transport(_))));
    assert_eq!(app.message().as_deref(), Some(SIGNUP_FAILED_MESSAGE));
    assert_eq!(
        form_values(&app),
        ("Chess Club".to_string(), "a@b.com".to_string())
    );
    assert_eq!(submit_button_state(&app), (false, SUBMIT_LABEL.to_string()));
}

#[tokio::test]
async fn busy_submit_control_ignores_second_submission() {
    let (app, stub) = loaded_app().await;
    app.fill_signup("Chess Club", "a@b.com");
    let _busy = BusyGuard::acquire(app.document(), app.page().submit_button, SIGNUP_BUSY_LABEL)
        .expect("busy");

    let outcome = app.dispatcher().submit_signup().await;

    assert!(matches!(outcome, ActionOutcome::Ignored));
    assert_eq!(stub.methods().await, vec!["GET"]);
}

#[tokio::test]
async fn refresh_failure_after_signup_keeps_success_banner() {
    let (app, stub) = loaded_app().await;
    stub.set_activities_status(StatusCode::INTERNAL_SERVER_ERROR)
        .await;

    let outcome = app.signup("Chess Club", "a@b.com").await;

    assert!(outcome.is_success());
    assert_eq!(
        app.message().as_deref(),
        Some("Signed up a@b.com for Chess Club")
    );
    assert_eq!(roster_text(&app), LOAD_FAILURE_TEXT);
}

#[tokio::test]
async fn unregister_removes_row_immediately_then_refreshes() {
    let (app, stub) = loaded_app().await;
    let control = app
        .find_delete_control("Chess Club", "michael@mergington.edu")
        .expect("control");
    stub.hold_refresh().await;

    let dispatcher = app.dispatcher().clone();
    let click = tokio::spawn(async move { dispatcher.click(control).await });

    let requests = stub.clone();
    for _ in 0..200 {
        if requests.methods().await == vec!["GET", "DELETE", "GET"] {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(stub.methods().await, vec!["GET", "DELETE", "GET"]);
    assert!(!app.document().lock().contains(control));
    assert!(!roster_text(&app).contains("michael@mergington.edu"));
    assert_eq!(
        app.message().as_deref(),
        Some("Unregistered michael@mergington.edu from Chess Club")
    );

    stub.release_refresh().await;
    let outcome = click.await.expect("join");
    assert!(outcome.is_success());
    assert!(app
        .find_delete_control("Chess Club", "michael@mergington.edu")
        .is_none());
    assert!(app
        .find_delete_control("Chess Club", "daniel@mergington.edu")
        .is_some());
}

#[tokio::test]
async fn unregister_success_without_message_uses_fallback_text() {
    let (app, stub) = loaded_app().await;
    stub.reply_to_unregister(StatusCode::OK, json!({})).await;

    let outcome = app.unregister("Chess Club", "daniel@mergington.edu").await;

    assert!(matches!(
        &outcome,
        ActionOutcome::Succeeded { message }
            if message == "Unregistered daniel@mergington.edu from Chess Club"
    ));
}

#[tokio::test]
async fn unregister_rejection_leaves_row_and_restores_control() {
    let (app, stub) = loaded_app().await;
    stub.reply_to_unregister(
        StatusCode::BAD_REQUEST,
        json!({ "detail": "Student not signed up for this activity" }),
    )
    .await;
    let control = app
        .find_delete_control("Chess Club", "daniel@mergington.edu")
        .expect("control");

    let outcome = app.dispatcher().click(control).await;

    assert!(matches!(
        outcome,
        ActionOutcome::Failed(ActionError::ServerRejection { status: 400, .. })
    ));
    assert_eq!(
        app.message().as_deref(),
        Some("Student not signed up for this activity")
    );
    let doc = app.document().lock();
    let button = doc.get(control).expect("row still rendered");
    assert!(!button.is_disabled());
    assert_eq!(button.text(), DELETE_LABEL);
    drop(doc);
    assert_eq!(stub.methods().await, vec!["GET", "DELETE"]);
}

#[tokio::test]
async fn unregister_transport_failure_keeps_row() {
    let (app, permits) = gated_app(true);
    app.load().await.expect("load");
    permits.add_permits(1);
    let control = app
        .find_delete_control("Chess Club", "michael@mergington.edu")
        .expect("control");

    let outcome = app.dispatcher().click(control).await;

    assert!(matches!(outcome, ActionOutcome::Failed(ActionError::Transport(_))));
    assert_eq!(app.message().as_deref(), Some(UNREGISTER_FAILED_MESSAGE));
    assert!(app.document().lock().get(control).is_some_and(|b| !b.is_disabled()));
}

#[tokio::test]
async fn concurrent_unregisters_keep_independent_busy_state() {
    let (app, permits) = gated_app(false);
    app.load().await.expect("load");
    let first = app
        .find_delete_control("Chess Club", "michael@mergington.edu")
        .expect("first");
    let second = app
        .find_delete_control("Chess Club", "daniel@mergington.edu")
        .expect("second");

    let d1 = app.dispatcher().clone();
    let d2 = app.dispatcher().clone();
    let t1 = tokio::spawn(async move { d1.click(first).await });
    let t2 = tokio::spawn(async move { d2.click(second).await });

    let doc = app.document().clone();
    wait_until(|| {
        let doc = doc.lock();
        [first, second].iter().all(|control| {
            doc.get(*control)
                .is_some_and(|b| b.is_disabled() && b.text() == UNREGISTER_BUSY_LABEL)
        })
    })
    .await;

    // a second click on an in-flight control is a no-op
    assert!(matches!(
        app.dispatcher().click(first).await,
        ActionOutcome::Ignored
    ));

    permits.add_permits(2);
    assert!(t1.await.expect("join").is_success());
    assert!(t2.await.expect("join").is_success());
}

#[tokio::test]
async fn clicks_outside_removal_controls_are_ignored() {
    let (app, stub) = loaded_app().await;
    let (heading, avatar) = {
        let doc = app.document().lock();
        let heading = doc
            .find_first(app.page().activities_list, &Selector::parse("h4"))
            .expect("heading");
        let avatar = doc
            .find_first(app.page().activities_list, &Selector::parse(".participant-avatar"))
            .expect("avatar");
        (heading, avatar)
    };

    assert!(matches!(app.dispatcher().click(heading).await, ActionOutcome::Ignored));
    assert!(matches!(app.dispatcher().click(avatar).await, ActionOutcome::Ignored));
    assert!(matches!(
        app.dispatcher().click(app.page().submit_button).await,
        ActionOutcome::Ignored
    ));
    assert_eq!(stub.methods().await, vec!["GET"]);
}

#[tokio::test]
async fn control_missing_tags_is_ignored() {
    let (app, stub) = loaded_app().await;
    let control = app
        .find_delete_control("Chess Club", "daniel@mergington.edu")
        .expect("control");
    if let Some(button) = app.document().lock().get_mut(control) {
        button.set_data(DATA_EMAIL, "");
    }

    assert!(matches!(app.dispatcher().click(control).await, ActionOutcome::Ignored));
    assert_eq!(stub.methods().await, vec!["GET"]);
}

#[tokio::test]
async fn dot_segment_activity_is_never_sent() {
    let mut snapshot = chess_and_basketball();
    let mut dotted = snapshot["Chess Club"].clone();
    dotted.participants.clear();
    snapshot.insert("..".to_string(), dotted);
    let (url, stub) = spawn_stub_server(snapshot).await;
    let app = RosterApp::connect(&url, ClientTimings::default()).expect("app");
    app.load().await.expect("initial load");

    let outcome = app.signup("..", "new@mergington.edu").await;

    assert!(matches!(
        outcome,
        ActionOutcome::Failed(ActionError::Transport(TransportError::InvalidPath(_)))
    ));
    assert_eq!(app.message().as_deref(), Some(SIGNUP_FAILED_MESSAGE));
    assert_eq!(stub.methods().await, vec!["GET"]);
    assert_eq!(submit_button_state(&app), (false, SUBMIT_LABEL.to_string()));
}
