use crate::{
    components::layout::{AuthLayout, ErrorMessage},
    pages::otp::{components::form::OtpForm, utils, view_model::use_otp_view_model},
    router::{LOGIN_ROUTE, MAIN_ROUTE},
    state::session::MSG_CHALLENGE_MISSING,
};
use leptos::{ev::SubmitEvent, Callback, *};
use leptos_router::{use_navigate, NavigateOptions};

#[component]
pub fn OtpPanel() -> impl IntoView {
    let vm = use_otp_view_model();
    let verify_action = vm.verify_action;
    let challenge = vm.challenge;

    let navigate = use_navigate();
    {
        let navigate = navigate.clone();
        create_effect(move |_| {
            if let Some(Ok(())) = verify_action.value().get() {
                navigate(
                    MAIN_ROUTE,
                    NavigateOptions {
                        replace: true,
                        ..Default::default()
                    },
                );
            }
        });
    }

    let on_input = {
        let vm = vm.clone();
        Callback::new(move |raw: String| vm.on_input(&raw))
    };
    let on_submit = {
        let vm = vm.clone();
        Callback::new(move |ev: SubmitEvent| {
            ev.prevent_default();
            vm.verify();
        })
    };
    let on_resend = {
        let vm = vm.clone();
        Callback::new(move |_| vm.resend())
    };
    let on_back = {
        let vm = vm.clone();
        Callback::new(move |_| {
            vm.back();
            navigate(LOGIN_ROUTE, Default::default());
        })
    };

    let subtitle = challenge.with_untracked(|c| {
        c.as_ref()
            .map(|c| utils::destination_hint(&c.supervisor_id))
            .unwrap_or_default()
    });

    view! {
        <AuthLayout title="Enter OTP" subtitle=subtitle>
            <Show
                when=move || challenge.with(Option::is_some)
                fallback=move || view! {
                    <div class="space-y-4">
                        <ErrorMessage message=MSG_CHALLENGE_MISSING.to_string() />
                        <button
                            type="button"
                            class="w-full text-sm text-fg-muted hover:text-fg"
                            on:click=move |_| on_back.call(())
                        >
                            "← Back to Login"
                        </button>
                    </div>
                }
            >
                <OtpForm
                    digits=vm.digits()
                    countdown=vm.countdown()
                    error=vm.error
                    notice=vm.notice
                    pending=vm.pending()
                    on_input=on_input
                    on_submit=on_submit
                    on_resend=on_resend
                    on_back=on_back
                />
            </Show>
        </AuthLayout>
    }
}
