use crate::api::ApiError;
use crate::state::session::{use_session, SessionPhase};
use leptos::*;

#[derive(Clone)]
pub struct LoginViewModel {
    pub supervisor_id: RwSignal<String>,
    pub error: Signal<Option<String>>,
    pub request_action: Action<String, Result<(), ApiError>>,
}

impl LoginViewModel {
    pub fn pending(&self) -> Signal<bool> {
        self.request_action.pending().into()
    }

    pub fn submit(&self) {
        if self.request_action.pending().get_untracked() {
            return;
        }
        self.request_action
            .dispatch(self.supervisor_id.get_untracked());
    }
}

pub fn use_login_view_model() -> LoginViewModel {
    let session = use_session();
    // Landing here with an open challenge means the user backed out of it.
    if session.snapshot().phase() == SessionPhase::AwaitingOtp {
        session.cancel_otp();
    }

    let supervisor_id = create_rw_signal(String::new());
    let state = session.state();
    let error = Signal::derive(move || state.with(|s| s.error.clone()));

    let request_action = create_action(move |id: &String| {
        let session = session.clone();
        let id = id.clone();
        async move { session.request_otp(&id).await }
    });

    LoginViewModel {
        supervisor_id,
        error,
        request_action,
    }
}
