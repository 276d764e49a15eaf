use std::rc::Rc;

use leptos::*;

use crate::{
    api::{ApiClient, ApiError, OtpRequestResult, OtpVerifyResult, Supervisor},
    utils::storage::{self, SessionStore, StorageError, SESSION_KEY, USER_KEY},
};

pub const OTP_LENGTH: usize = 6;
pub const RESEND_COOLDOWN_SECS: u32 = 60;

const MSG_ID_REQUIRED: &str = "Supervisor ID is required";
const MSG_SEND_FAILED: &str = "Failed to send OTP. Please try again.";
const MSG_SEND_NETWORK: &str = "Network error. Please check your connection and try again.";
const MSG_RESEND_FAILED: &str = "Failed to resend OTP";
const MSG_RESEND_NETWORK: &str = "Network error occurred";
const MSG_RESENT: &str = "New OTP sent successfully";
const MSG_CHALLENGE_EXPIRED: &str = "Session expired. Please go back and try again.";
const MSG_OTP_INCOMPLETE: &str = "Please enter a complete 6-digit OTP";
pub(crate) const MSG_CHALLENGE_MISSING: &str = "Session information is missing. Please go back and try again.";
const MSG_OTP_INVALID: &str = "Invalid OTP. Please try again.";
const MSG_VERIFY_NETWORK: &str = "Network error occurred. Please try again.";
const MSG_PERSIST_FAILED: &str = "Could not save your session on this device. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unauthenticated,
    AwaitingOtp,
    Authenticated,
}

/// Bearer token and the profile it was issued for. Held together so one can
/// never exist without the other.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: Supervisor,
}

/// Ephemeral state between sending an OTP and verifying it. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    pub supervisor_id: String,
    pub temp_token: String,
    pub digits: String,
    pub resend_countdown: u32,
}

impl OtpChallenge {
    pub fn new(supervisor_id: impl Into<String>, temp_token: impl Into<String>) -> Self {
        Self {
            supervisor_id: supervisor_id.into(),
            temp_token: temp_token.into(),
            digits: String::new(),
            resend_countdown: RESEND_COOLDOWN_SECS,
        }
    }

    pub fn can_resend(&self) -> bool {
        self.resend_countdown == 0
    }

    pub fn is_complete(&self) -> bool {
        is_valid_otp_code(&self.digits)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub session: Option<Session>,
    pub challenge: Option<OtpChallenge>,
    pub pending: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        if self.session.is_some() {
            SessionPhase::Authenticated
        } else if self.challenge.is_some() {
            SessionPhase::AwaitingOtp
        } else {
            SessionPhase::Unauthenticated
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user(&self) -> Option<&Supervisor> {
        self.session.as_ref().map(|s| &s.user)
    }
}

/// Keeps digits only and caps the length at [`OTP_LENGTH`].
pub fn sanitize_otp_input(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(OTP_LENGTH)
        .collect()
}

pub fn is_valid_otp_code(code: &str) -> bool {
    code.len() == OTP_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

/// Owns the sign-in lifecycle. Cheap to clone; every clone drives the same
/// reactive [`SessionState`].
#[derive(Clone)]
pub struct SessionManager {
    api: Rc<ApiClient>,
    store: Rc<dyn SessionStore>,
    state: RwSignal<SessionState>,
}

impl SessionManager {
    pub fn new(api: Rc<ApiClient>, store: Rc<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            state: create_rw_signal(SessionState::default()),
        }
    }

    pub fn api(&self) -> Rc<ApiClient> {
        Rc::clone(&self.api)
    }

    pub fn state(&self) -> RwSignal<SessionState> {
        self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.with(SessionState::phase)
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.get_untracked()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.state
            .try_with_untracked(|s| s.session.clone())
            .flatten()
    }

    // A request can outlive the view that started it; a disposed signal makes
    // this a no-op instead of a panic.
    fn apply(&self, f: impl FnOnce(&mut SessionState)) {
        if self.state.try_update(f).is_none() {
            log::debug!("session state disposed; dropping update");
        }
    }

    fn fail(&self, error: ApiError) -> ApiError {
        let message = error.error.clone();
        self.apply(|s| {
            s.pending = false;
            s.notice = None;
            s.error = Some(message);
        });
        error
    }

    fn begin(&self) {
        self.apply(|s| {
            s.pending = true;
            s.error = None;
            s.notice = None;
        });
    }

    /// Reads the persisted blob once at startup. Only a complete, well-formed
    /// token+profile pair signs the user in; anything partial is wiped.
    pub fn restore(&self) -> SessionPhase {
        match read_persisted(self.store.as_ref()) {
            Ok(Some(session)) => {
                log::info!("restored session for supervisor {}", session.user.id);
                self.apply(|s| {
                    *s = SessionState {
                        session: Some(session),
                        ..SessionState::default()
                    }
                });
            }
            Ok(None) => {
                clear_persisted(self.store.as_ref());
                self.apply(|s| *s = SessionState::default());
            }
            Err(err) => {
                log::warn!("could not read persisted session: {}", err);
                clear_persisted(self.store.as_ref());
                self.apply(|s| *s = SessionState::default());
            }
        }
        self.state.with_untracked(SessionState::phase)
    }

    pub async fn request_otp(&self, supervisor_id: &str) -> Result<(), ApiError> {
        let supervisor_id = supervisor_id.trim().to_string();
        if supervisor_id.is_empty() {
            return Err(self.fail(ApiError::validation(MSG_ID_REQUIRED)));
        }

        self.begin();
        match self.api.request_otp(&supervisor_id).await {
            Ok(OtpRequestResult::Sent { temp_token, .. }) => {
                log::info!("OTP sent for supervisor {}", supervisor_id);
                self.apply(|s| {
                    s.pending = false;
                    s.challenge = Some(OtpChallenge::new(supervisor_id, temp_token));
                });
                Ok(())
            }
            Ok(OtpRequestResult::Rejected { message }) => Err(self.fail(ApiError::rejected(
                message.unwrap_or_else(|| MSG_SEND_FAILED.into()),
            ))),
            Err(err) => {
                log::warn!("OTP request failed: {}", err);
                Err(self.fail(ApiError::request_failed(MSG_SEND_NETWORK).with_details(
                    serde_json::json!({ "cause": err.error, "code": err.code }),
                )))
            }
        }
    }

    /// Sends a fresh OTP for the pending challenge and restarts the cooldown.
    pub async fn resend_otp(&self, supervisor_id: &str) -> Result<(), ApiError> {
        let supervisor_id = supervisor_id.trim().to_string();
        let has_challenge = self.state.with_untracked(|s| s.challenge.is_some());
        if supervisor_id.is_empty() || !has_challenge {
            return Err(self.fail(ApiError::validation(MSG_CHALLENGE_EXPIRED)));
        }

        self.begin();
        match self.api.request_otp(&supervisor_id).await {
            Ok(OtpRequestResult::Sent { temp_token, .. }) => {
                self.apply(|s| {
                    s.pending = false;
                    if let Some(challenge) = s.challenge.as_mut() {
                        challenge.temp_token = temp_token;
                        challenge.resend_countdown = RESEND_COOLDOWN_SECS;
                    }
                    s.notice = Some(MSG_RESENT.into());
                });
                Ok(())
            }
            Ok(OtpRequestResult::Rejected { message }) => Err(self.fail(ApiError::rejected(
                message.unwrap_or_else(|| MSG_RESEND_FAILED.into()),
            ))),
            Err(err) => {
                log::warn!("OTP resend failed: {}", err);
                Err(self.fail(ApiError::request_failed(MSG_RESEND_NETWORK)))
            }
        }
    }

    pub async fn verify_otp(
        &self,
        supervisor_id: &str,
        code: &str,
        temp_token: &str,
    ) -> Result<(), ApiError> {
        if !is_valid_otp_code(code) {
            return Err(self.fail(ApiError::validation(MSG_OTP_INCOMPLETE)));
        }
        let supervisor_id = supervisor_id.trim();
        if supervisor_id.is_empty() || temp_token.is_empty() {
            return Err(self.fail(ApiError::validation(MSG_CHALLENGE_MISSING)));
        }

        self.begin();
        match self.api.verify_otp(supervisor_id, code, temp_token).await {
            Ok(OtpVerifyResult::Verified {
                access_token,
                supervisor,
            }) => {
                let session = Session {
                    token: access_token,
                    user: supervisor,
                };
                if let Err(err) = persist(self.store.as_ref(), &session) {
                    log::warn!("could not persist session: {}", err);
                    clear_persisted(self.store.as_ref());
                    return Err(self.fail(ApiError::storage(MSG_PERSIST_FAILED)));
                }
                log::info!("signed in as supervisor {}", session.user.id);
                self.apply(|s| {
                    *s = SessionState {
                        session: Some(session),
                        ..SessionState::default()
                    }
                });
                Ok(())
            }
            Ok(OtpVerifyResult::Rejected { message }) => Err(self.fail(ApiError::rejected(
                message.unwrap_or_else(|| MSG_OTP_INVALID.into()),
            ))),
            Err(err) => {
                log::warn!("OTP verification failed: {}", err);
                Err(self.fail(ApiError::request_failed(MSG_VERIFY_NETWORK)))
            }
        }
    }

    /// Verifies the digits entered against the pending challenge.
    pub async fn verify_challenge(&self) -> Result<(), ApiError> {
        let Some(challenge) = self.state.with_untracked(|s| s.challenge.clone()) else {
            return Err(self.fail(ApiError::validation(MSG_CHALLENGE_MISSING)));
        };
        self.verify_otp(
            &challenge.supervisor_id,
            &challenge.digits,
            &challenge.temp_token,
        )
        .await
    }

    pub fn set_otp_digits(&self, raw: &str) {
        let digits = sanitize_otp_input(raw);
        self.apply(|s| {
            if let Some(challenge) = s.challenge.as_mut() {
                challenge.digits = digits;
            }
        });
    }

    /// One second of resend cooldown has elapsed.
    pub fn tick_countdown(&self) {
        self.apply(|s| {
            if let Some(challenge) = s.challenge.as_mut() {
                challenge.resend_countdown = challenge.resend_countdown.saturating_sub(1);
            }
        });
    }

    /// Leaving the OTP screen discards the challenge.
    pub fn cancel_otp(&self) {
        self.apply(|s| {
            s.challenge = None;
            s.pending = false;
            s.error = None;
            s.notice = None;
        });
    }

    pub fn sign_out(&self) {
        clear_persisted(self.store.as_ref());
        self.apply(|s| *s = SessionState::default());
        log::info!("signed out");
    }
}

fn read_persisted(store: &dyn SessionStore) -> Result<Option<Session>, StorageError> {
    let token = store.get_item(SESSION_KEY)?;
    let user = store.get_item(USER_KEY)?;
    let (Some(token), Some(raw_user)) = (token, user) else {
        return Ok(None);
    };
    if token.is_empty() {
        return Ok(None);
    }
    match serde_json::from_str::<Supervisor>(&raw_user) {
        Ok(user) if user.id.trim().is_empty() => {
            log::warn!("persisted profile has no supervisor id");
            Ok(None)
        }
        Ok(user) => Ok(Some(Session { token, user })),
        Err(e) => {
            log::warn!("persisted profile is malformed: {}", e);
            Ok(None)
        }
    }
}

fn persist(store: &dyn SessionStore, session: &Session) -> Result<(), StorageError> {
    let user = serde_json::to_string(&session.user)
        .map_err(|_| StorageError::Write(USER_KEY.to_string()))?;
    store.set_item(SESSION_KEY, &session.token)?;
    store.set_item(USER_KEY, &user)
}

fn clear_persisted(store: &dyn SessionStore) {
    for key in [SESSION_KEY, USER_KEY] {
        if let Err(err) = store.remove_item(key) {
            log::warn!("{}", err);
        }
    }
}

pub fn use_session() -> SessionManager {
    match use_context::<SessionManager>() {
        Some(manager) => manager,
        None => {
            let api = use_context::<ApiClient>().unwrap_or_default();
            let manager = SessionManager::new(Rc::new(api), storage::default_store());
            provide_context(manager.clone());
            manager
        }
    }
}

#[component]
pub fn SessionProvider(children: Children) -> impl IntoView {
    let api = use_context::<ApiClient>().unwrap_or_default();
    let manager = SessionManager::new(Rc::new(api), storage::default_store());
    manager.restore();
    provide_context(manager);
    view! { <>{children()}</> }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::supervisor;

    #[test]
    fn sanitize_strips_non_digits_and_truncates() {
        assert_eq!(sanitize_otp_input("12a-34 5678"), "123456");
        assert_eq!(sanitize_otp_input("９１2"), "2");
        assert_eq!(sanitize_otp_input(""), "");
    }

    #[test]
    fn otp_code_must_be_exactly_six_ascii_digits() {
        assert!(is_valid_otp_code("123456"));
        assert!(!is_valid_otp_code("12345"));
        assert!(!is_valid_otp_code("1234567"));
        assert!(!is_valid_otp_code("12345a"));
        assert!(!is_valid_otp_code(" 12345"));
    }

    #[test]
    fn phase_follows_session_then_challenge() {
        let mut state = SessionState::default();
        assert_eq!(state.phase(), SessionPhase::Unauthenticated);
        state.challenge = Some(OtpChallenge::new("SUP1", "abc"));
        assert_eq!(state.phase(), SessionPhase::AwaitingOtp);
        state.session = Some(Session {
            token: "tok".into(),
            user: supervisor(),
        });
        assert_eq!(state.phase(), SessionPhase::Authenticated);
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::helpers::{session_manager, supervisor};
    use crate::test_support::ssr::with_runtime;
    use crate::utils::storage::MemoryStore;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn restore_with_both_keys_authenticates() {
        with_runtime(|| {
            let store = MemoryStore::new();
            store.set_item(SESSION_KEY, "tok").unwrap();
            store
                .set_item(USER_KEY, &serde_json::to_string(&supervisor()).unwrap())
                .unwrap();
            let manager = session_manager("http://unused.invalid", &store);

            assert_eq!(manager.restore(), SessionPhase::Authenticated);
            let session = manager.current_session().unwrap();
            assert_eq!(session.token, "tok");
            assert_eq!(session.user, supervisor());
        });
    }

    #[test]
    fn restore_with_one_key_stays_signed_out_and_wipes_leftovers() {
        with_runtime(|| {
            let store = MemoryStore::new();
            store.set_item(SESSION_KEY, "tok").unwrap();
            let manager = session_manager("http://unused.invalid", &store);

            assert_eq!(manager.restore(), SessionPhase::Unauthenticated);
            assert!(manager.current_session().is_none());
            assert!(store.is_empty());
        });
    }

    #[test]
    fn restore_with_malformed_profile_stays_signed_out() {
        with_runtime(|| {
            let store = MemoryStore::new();
            store.set_item(SESSION_KEY, "tok").unwrap();
            store.set_item(USER_KEY, "{not json").unwrap();
            let manager = session_manager("http://unused.invalid", &store);

            assert_eq!(manager.restore(), SessionPhase::Unauthenticated);
            assert!(!store.contains(SESSION_KEY));
        });
    }

    #[test]
    fn restore_with_profile_missing_id_stays_signed_out() {
        with_runtime(|| {
            let store = MemoryStore::new();
            store.set_item(SESSION_KEY, "tok").unwrap();
            store.set_item(USER_KEY, r#"{"name":"A","zone":"Z"}"#).unwrap();
            let manager = session_manager("http://unused.invalid", &store);

            assert_eq!(manager.restore(), SessionPhase::Unauthenticated);
            assert!(store.is_empty());
        });
    }

    #[test]
    fn otp_digits_and_countdown_only_touch_an_open_challenge() {
        with_runtime(|| {
            let store = MemoryStore::new();
            let manager = session_manager("http://unused.invalid", &store);
            manager.set_otp_digits("123");
            manager.tick_countdown();
            assert!(manager.snapshot().challenge.is_none());

            manager
                .state()
                .update(|s| s.challenge = Some(OtpChallenge::new("SUP1", "abc")));
            manager.set_otp_digits("12x3456789");
            manager.tick_countdown();
            let challenge = manager.snapshot().challenge.unwrap();
            assert_eq!(challenge.digits, "123456");
            assert!(challenge.is_complete());
            assert_eq!(challenge.resend_countdown, RESEND_COOLDOWN_SECS - 1);
            assert!(!challenge.can_resend());

            manager.cancel_otp();
            assert_eq!(manager.phase(), SessionPhase::Unauthenticated);
        });
    }

    #[test]
    fn countdown_saturates_at_zero() {
        with_runtime(|| {
            let store = MemoryStore::new();
            let manager = session_manager("http://unused.invalid", &store);
            manager.state().update(|s| {
                let mut challenge = OtpChallenge::new("SUP1", "abc");
                challenge.resend_countdown = 1;
                s.challenge = Some(challenge);
            });
            manager.tick_countdown();
            manager.tick_countdown();
            assert!(manager.snapshot().challenge.unwrap().can_resend());
        });
    }

    #[test]
    fn sign_out_clears_everything_from_any_phase() {
        with_runtime(|| {
            let store = MemoryStore::new();
            store.set_item(SESSION_KEY, "tok").unwrap();
            store
                .set_item(USER_KEY, &serde_json::to_string(&supervisor()).unwrap())
                .unwrap();
            let manager = session_manager("http://unused.invalid", &store);
            manager.restore();
            manager.state().update(|s| {
                s.challenge = Some(OtpChallenge::new("SUP1", "abc"));
                s.error = Some("stale".into());
            });

            manager.sign_out();

            assert!(store.is_empty());
            assert_eq!(manager.snapshot(), SessionState::default());

            manager.sign_out();
            assert_eq!(manager.phase(), SessionPhase::Unauthenticated);
        });
    }

    fn mock_otp_flow(server: &MockServer) {
        server.mock(|when, then| {
            when.method(POST)
                .path("/api")
                .query_param("type", "OTP_GENERATION");
            then.status(200)
                .json_body(json!({ "success": true, "tempToken": "abc" }));
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/api")
                .query_param("type", "OTP_VALIDATION")
                .json_body(json!({
                    "reqType": "OTP_VALIDATION",
                    "supervisorId": "SUP1",
                    "otp": "123456",
                    "tempToken": "abc"
                }));
            then.status(200).json_body(json!({
                "success": true,
                "accessToken": "tok",
                "supervisor": { "id": "SUP1", "name": "A", "zone": "Z" }
            }));
        });
    }

    #[tokio::test]
    async fn otp_flow_signs_in_and_persists_session() {
        let server = MockServer::start_async().await;
        mock_otp_flow(&server);
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let manager = session_manager(&server.url("/api"), &store);

        manager.request_otp("SUP1").await.unwrap();
        assert_eq!(manager.phase(), SessionPhase::AwaitingOtp);
        let challenge = manager.snapshot().challenge.unwrap();
        assert_eq!(challenge.temp_token, "abc");
        assert_eq!(challenge.resend_countdown, RESEND_COOLDOWN_SECS);
        assert!(!store.contains(SESSION_KEY));

        manager.verify_otp("SUP1", "123456", "abc").await.unwrap();
        assert_eq!(manager.phase(), SessionPhase::Authenticated);
        let state = manager.snapshot();
        assert!(state.challenge.is_none());
        assert!(!state.pending);
        assert_eq!(state.user().unwrap().zone, "Z");
        assert_eq!(store.get_item(SESSION_KEY).unwrap().as_deref(), Some("tok"));
        let persisted: Supervisor =
            serde_json::from_str(&store.get_item(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted.id, "SUP1");
        runtime.dispose();
    }

    #[tokio::test]
    async fn verify_challenge_uses_entered_digits() {
        let server = MockServer::start_async().await;
        mock_otp_flow(&server);
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let manager = session_manager(&server.url("/api"), &store);

        manager.request_otp("SUP1").await.unwrap();
        manager.set_otp_digits("123456");
        manager.verify_challenge().await.unwrap();
        assert_eq!(manager.phase(), SessionPhase::Authenticated);
        runtime.dispose();
    }

    #[tokio::test]
    async fn rejected_otp_request_surfaces_server_message() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api");
            then.status(200)
                .json_body(json!({ "success": false, "message": "Invalid ID" }));
        });
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let manager = session_manager(&server.url("/api"), &store);

        let err = manager.request_otp("SUP1").await.unwrap_err();
        assert_eq!(err.error, "Invalid ID");
        assert_eq!(manager.phase(), SessionPhase::Unauthenticated);
        assert_eq!(manager.snapshot().error.as_deref(), Some("Invalid ID"));
        assert!(!manager.snapshot().pending);
        runtime.dispose();
    }

    #[tokio::test]
    async fn rejected_otp_request_without_message_uses_default() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api");
            then.status(200).json_body(json!({ "success": false }));
        });
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let manager = session_manager(&server.url("/api"), &store);

        let err = manager.request_otp("SUP1").await.unwrap_err();
        assert_eq!(err.error, MSG_SEND_FAILED);
        runtime.dispose();
    }

    #[tokio::test]
    async fn empty_supervisor_id_never_reaches_the_network() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api");
            then.status(200).json_body(json!({ "success": true, "tempToken": "abc" }));
        });
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let manager = session_manager(&server.url("/api"), &store);

        let err = manager.request_otp("   ").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.error, MSG_ID_REQUIRED);
        assert_eq!(mock.hits(), 0);
        runtime.dispose();
    }

    #[tokio::test]
    async fn malformed_codes_are_rejected_before_any_request() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api");
            then.status(200).json_body(json!({ "success": true }));
        });
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let manager = session_manager(&server.url("/api"), &store);

        for code in ["", "12345", "1234567", "12a456", "12 456"] {
            let err = manager.verify_otp("SUP1", code, "abc").await.unwrap_err();
            assert!(err.is_validation(), "code {:?} should fail validation", code);
            assert_eq!(err.error, MSG_OTP_INCOMPLETE);
        }
        let err = manager.verify_otp("SUP1", "123456", "").await.unwrap_err();
        assert_eq!(err.error, MSG_CHALLENGE_MISSING);

        assert_eq!(mock.hits(), 0);
        runtime.dispose();
    }

    #[tokio::test]
    async fn rejected_verification_keeps_challenge_and_digits() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST)
                .path("/api")
                .query_param("type", "OTP_GENERATION");
            then.status(200)
                .json_body(json!({ "success": true, "tempToken": "abc" }));
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/api")
                .query_param("type", "OTP_VALIDATION");
            then.status(200).json_body(json!({ "success": false }));
        });
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let manager = session_manager(&server.url("/api"), &store);

        manager.request_otp("SUP1").await.unwrap();
        manager.set_otp_digits("654321");
        let err = manager.verify_challenge().await.unwrap_err();

        assert_eq!(err.error, MSG_OTP_INVALID);
        assert_eq!(manager.phase(), SessionPhase::AwaitingOtp);
        assert_eq!(manager.snapshot().challenge.unwrap().digits, "654321");
        assert!(store.is_empty());
        runtime.dispose();
    }

    #[tokio::test]
    async fn rejected_verification_with_partial_profile_shows_server_message() {
        let server = MockServer::start_async().await;
        mock_generation(&server, "abc");
        server.mock(|when, then| {
            when.method(POST)
                .path("/api")
                .query_param("type", "OTP_VALIDATION");
            then.status(200).json_body(json!({
                "success": false,
                "message": "Invalid OTP entered",
                "supervisor": { "name": "A" }
            }));
        });
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let manager = session_manager(&server.url("/api"), &store);

        manager.request_otp("SUP1").await.unwrap();
        let err = manager.verify_otp("SUP1", "123456", "abc").await.unwrap_err();

        assert_eq!(err.error, "Invalid OTP entered");
        assert_eq!(err.code, "REJECTED");
        assert_eq!(manager.phase(), SessionPhase::AwaitingOtp);
        assert!(store.is_empty());
        runtime.dispose();
    }

    fn mock_generation(server: &MockServer, temp_token: &str) {
        server.mock(|when, then| {
            when.method(POST)
                .path("/api")
                .query_param("type", "OTP_GENERATION");
            then.status(200)
                .json_body(json!({ "success": true, "tempToken": temp_token }));
        });
    }

    fn open_challenge(manager: &SessionManager, countdown: u32) {
        manager.state().update(|s| {
            let mut challenge = OtpChallenge::new("SUP1", "old");
            challenge.resend_countdown = countdown;
            challenge.digits = "12".into();
            s.challenge = Some(challenge);
        });
    }

    async fn assert_failed_resend_keeps_challenge(server_url: &str, expected: &str) {
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let manager = session_manager(server_url, &store);
        open_challenge(&manager, 0);
        let before = manager.snapshot().challenge;

        let err = manager.resend_otp("SUP1").await.unwrap_err();

        assert_eq!(err.error, expected);
        let state = manager.snapshot();
        assert_eq!(state.phase(), SessionPhase::AwaitingOtp);
        assert_eq!(state.challenge, before);
        assert_eq!(state.error.as_deref(), Some(expected));
        assert!(state.notice.is_none());
        assert!(!state.pending);
        runtime.dispose();
    }

    #[tokio::test]
    async fn rejected_resend_without_message_uses_default_and_keeps_challenge() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api");
            then.status(200).json_body(json!({ "success": false }));
        });
        assert_failed_resend_keeps_challenge(&server.url("/api"), MSG_RESEND_FAILED).await;
    }

    #[tokio::test]
    async fn rejected_resend_surfaces_server_message_and_keeps_challenge() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api");
            then.status(200)
                .json_body(json!({ "success": false, "message": "Too many attempts" }));
        });
        assert_failed_resend_keeps_challenge(&server.url("/api"), "Too many attempts").await;
    }

    #[tokio::test]
    async fn resend_transport_failure_keeps_challenge() {
        assert_failed_resend_keeps_challenge("http://127.0.0.1:9/api", MSG_RESEND_NETWORK).await;
    }

    #[tokio::test]
    async fn resend_replaces_token_and_restarts_countdown() {
        let server = MockServer::start_async().await;
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let manager = session_manager(&server.url("/api"), &store);
        manager.state().update(|s| {
            let mut challenge = OtpChallenge::new("SUP1", "old");
            challenge.resend_countdown = 0;
            challenge.digits = "12".into();
            s.challenge = Some(challenge);
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/api")
                .query_param("type", "OTP_GENERATION");
            then.status(200)
                .json_body(json!({ "success": true, "tempToken": "new" }));
        });

        manager.resend_otp("SUP1").await.unwrap();

        let state = manager.snapshot();
        assert_eq!(state.phase(), SessionPhase::AwaitingOtp);
        let challenge = state.challenge.unwrap();
        assert_eq!(challenge.temp_token, "new");
        assert_eq!(challenge.resend_countdown, RESEND_COOLDOWN_SECS);
        assert_eq!(state.notice.as_deref(), Some(MSG_RESENT));
        runtime.dispose();
    }

    #[tokio::test]
    async fn resend_without_challenge_is_expired() {
        let server = MockServer::start_async().await;
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let manager = session_manager(&server.url("/api"), &store);

        let err = manager.resend_otp("SUP1").await.unwrap_err();
        assert_eq!(err.error, MSG_CHALLENGE_EXPIRED);
        runtime.dispose();
    }

    #[tokio::test]
    async fn transport_failures_map_to_network_messages() {
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let manager = session_manager("http://127.0.0.1:9/api", &store);

        let err = manager.request_otp("SUP1").await.unwrap_err();
        assert_eq!(err.error, MSG_SEND_NETWORK);
        assert_eq!(err.code, "REQUEST_FAILED");

        let err = manager.verify_otp("SUP1", "123456", "abc").await.unwrap_err();
        assert_eq!(err.error, MSG_VERIFY_NETWORK);
        assert_eq!(manager.phase(), SessionPhase::Unauthenticated);
        runtime.dispose();
    }

    #[tokio::test]
    async fn unparseable_response_is_a_network_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api");
            then.status(200).body("<b>Fatal error</b>");
        });
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let manager = session_manager(&server.url("/api"), &store);

        let err = manager.request_otp("SUP1").await.unwrap_err();
        assert_eq!(err.error, MSG_SEND_NETWORK);
        runtime.dispose();
    }

    #[tokio::test]
    async fn failed_persist_rolls_back_and_stays_awaiting_otp() {
        let server = MockServer::start_async().await;
        mock_otp_flow(&server);
        let runtime = create_runtime();
        let store = MemoryStore::read_only();
        let manager = session_manager(&server.url("/api"), &store);

        manager.request_otp("SUP1").await.unwrap();
        let err = manager.verify_otp("SUP1", "123456", "abc").await.unwrap_err();

        assert_eq!(err.code, "STORAGE_ERROR");
        assert_eq!(manager.phase(), SessionPhase::AwaitingOtp);
        assert!(store.is_empty());
        runtime.dispose();
    }

    #[tokio::test]
    async fn updates_after_dispose_are_dropped() {
        let server = MockServer::start_async().await;
        mock_otp_flow(&server);
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let manager = session_manager(&server.url("/api"), &store);
        runtime.dispose();

        assert!(manager.request_otp("SUP1").await.is_ok());
    }
}
