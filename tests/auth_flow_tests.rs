//! End-to-end sign-in tests against a mock identity provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use post_manager_client::auth::{HttpIdentityProvider, IdentityProvider, Navigator, SignInForm};
use post_manager_client::{AuthError, AuthOutcome, SessionProvider};

#[derive(Default)]
struct RecordingNavigator {
    pushes: Mutex<Vec<String>>,
    refreshes: AtomicUsize,
}

impl Navigator for RecordingNavigator {
    fn push(&self, route: &str) {
        self.pushes.lock().unwrap().push(route.to_string());
    }

    fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}

fn session_json(email: &str) -> String {
    serde_json::json!({ "user": { "id": "u-1", "email": email } }).to_string()
}

fn sign_in_form(
    server: &mockito::Server,
) -> (SignInForm, Arc<SessionProvider>, Arc<RecordingNavigator>) {
    let provider: Arc<dyn IdentityProvider> = Arc::new(HttpIdentityProvider::new(
        reqwest::Client::new(),
        server.url(),
    ));
    let sessions = Arc::new(SessionProvider::new(provider.clone()));
    let navigator = Arc::new(RecordingNavigator::default());
    let mut form = SignInForm::new(provider, sessions.clone(), navigator.clone());
    form.set_email("demo@example.com");
    form.set_password("demo123");
    (form, sessions, navigator)
}

#[tokio::test]
async fn successful_sign_in_confirms_the_session_and_navigates() {
    let mut server = mockito::Server::new_async().await;
    let login = server
        .mock("POST", "/api/auth/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":true}"#)
        .create_async()
        .await;
    let session = server
        .mock("GET", "/api/auth/session")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(session_json("demo@example.com"))
        .create_async()
        .await;

    let (mut form, sessions, navigator) = sign_in_form(&server);
    let outcome = form.authenticate().await.expect("sign-in succeeds");

    match outcome {
        AuthOutcome::SignedIn(s) => assert_eq!(s.user.email, "demo@example.com"),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(*navigator.pushes.lock().unwrap(), vec!["/".to_string()]);
    assert!(sessions.current().is_some());

    login.assert_async().await;
    session.assert_async().await;
}

#[tokio::test]
async fn credential_rejection_shows_the_fixed_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/auth/login")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"CredentialsSignin"}"#)
        .create_async()
        .await;

    let (mut form, sessions, navigator) = sign_in_form(&server);
    let result = form.authenticate().await;

    assert!(matches!(result, Err(AuthError::Rejected)));
    assert_eq!(form.banner(), Some("Incorrect email or password"));
    assert!(navigator.pushes.lock().unwrap().is_empty());
    assert!(sessions.current().is_none());
}

#[tokio::test]
async fn an_empty_session_object_reads_as_unauthenticated() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/auth/session")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let provider = HttpIdentityProvider::new(reqwest::Client::new(), server.url());
    let session = provider.get_session().await.expect("fetch succeeds");
    assert!(session.is_none());
}

#[tokio::test]
async fn a_null_session_reads_as_unauthenticated() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/auth/session")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("null")
        .create_async()
        .await;

    let provider = HttpIdentityProvider::new(reqwest::Client::new(), server.url());
    let session = provider.get_session().await.expect("fetch succeeds");
    assert!(session.is_none());
}

#[tokio::test]
async fn signing_out_clears_the_shared_session() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/auth/session")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(session_json("demo@example.com"))
        .create_async()
        .await;
    let signout = server
        .mock("POST", "/api/auth/signout")
        .with_status(200)
        .create_async()
        .await;

    let provider = Arc::new(HttpIdentityProvider::new(
        reqwest::Client::new(),
        server.url(),
    ));
    let sessions = SessionProvider::new(provider);

    sessions.refresh().await.expect("refresh succeeds");
    assert!(sessions.current().is_some());

    sessions.sign_out().await.expect("sign-out succeeds");
    assert!(sessions.current().is_none());

    signout.assert_async().await;
}
