use crate::api::ApiError;
use crate::state::session::{use_session, OtpChallenge, SessionManager};
use leptos::*;

#[derive(Clone)]
pub struct OtpViewModel {
    session: SessionManager,
    pub challenge: Signal<Option<OtpChallenge>>,
    pub error: Signal<Option<String>>,
    pub notice: Signal<Option<String>>,
    pub verify_action: Action<(), Result<(), ApiError>>,
    pub resend_action: Action<(), Result<(), ApiError>>,
}

impl OtpViewModel {
    pub fn digits(&self) -> Signal<String> {
        let challenge = self.challenge;
        Signal::derive(move || challenge.with(|c| c.as_ref().map(|c| c.digits.clone()).unwrap_or_default()))
    }

    pub fn countdown(&self) -> Signal<u32> {
        let challenge = self.challenge;
        Signal::derive(move || challenge.with(|c| c.as_ref().map(|c| c.resend_countdown).unwrap_or(0)))
    }

    pub fn pending(&self) -> Signal<bool> {
        let verifying = self.verify_action.pending();
        let resending = self.resend_action.pending();
        Signal::derive(move || verifying.get() || resending.get())
    }

    pub fn on_input(&self, raw: &str) {
        self.session.set_otp_digits(raw);
    }

    pub fn verify(&self) {
        if self.pending().get_untracked() {
            return;
        }
        self.verify_action.dispatch(());
    }

    pub fn resend(&self) {
        let ready = self
            .challenge
            .with_untracked(|c| c.as_ref().is_some_and(OtpChallenge::can_resend));
        if !ready || self.pending().get_untracked() {
            return;
        }
        self.resend_action.dispatch(());
    }

    pub fn back(&self) {
        self.session.cancel_otp();
    }
}

pub fn use_otp_view_model() -> OtpViewModel {
    let session = use_session();
    let state = session.state();
    let challenge = Signal::derive(move || state.with(|s| s.challenge.clone()));
    let error = Signal::derive(move || state.with(|s| s.error.clone()));
    let notice = Signal::derive(move || state.with(|s| s.notice.clone()));

    let verify_session = session.clone();
    let verify_action = create_action(move |_: &()| {
        let session = verify_session.clone();
        async move { session.verify_challenge().await }
    });

    let resend_session = session.clone();
    let resend_action = create_action(move |_: &()| {
        let session = resend_session.clone();
        async move {
            let supervisor_id = session
                .snapshot()
                .challenge
                .map(|c| c.supervisor_id)
                .unwrap_or_default();
            session.resend_otp(&supervisor_id).await
        }
    });

    start_countdown(session.clone());

    OtpViewModel {
        session,
        challenge,
        error,
        notice,
        verify_action,
        resend_action,
    }
}

/// Ticks the resend cooldown once a second for as long as the view lives.
#[cfg(target_arch = "wasm32")]
fn start_countdown(session: SessionManager) {
    let interval = gloo_timers::callback::Interval::new(1_000, move || session.tick_countdown());
    on_cleanup(move || drop(interval));
}

#[cfg(not(target_arch = "wasm32"))]
fn start_countdown(_session: SessionManager) {}
