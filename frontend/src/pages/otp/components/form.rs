use crate::{
    components::layout::{ErrorMessage, SuccessMessage},
    pages::otp::utils,
    state::session::OTP_LENGTH,
};
use leptos::{ev::SubmitEvent, *};

#[component]
pub fn OtpForm(
    digits: Signal<String>,
    countdown: Signal<u32>,
    error: Signal<Option<String>>,
    notice: Signal<Option<String>>,
    pending: Signal<bool>,
    on_input: Callback<String>,
    on_submit: Callback<SubmitEvent>,
    on_resend: Callback<()>,
    on_back: Callback<()>,
) -> impl IntoView {
    view! {
        <form class="space-y-6" on:submit=move |ev| on_submit.call(ev)>
            <input
                id="otp"
                name="otp"
                type="text"
                inputmode="numeric"
                autocomplete="one-time-code"
                maxlength=OTP_LENGTH
                class="block w-full px-3 py-3 border border-border rounded-md text-center text-2xl tracking-[0.5em] text-fg focus:outline-none focus:ring-action-primary-bg"
                placeholder="Enter OTP"
                prop:value=move || digits.get()
                disabled=move || pending.get()
                on:input=move |ev| on_input.call(event_target_value(&ev))
            />
            {move || error.get().map(|message| view! { <ErrorMessage message=message /> })}
            {move || notice.get().map(|message| view! { <SuccessMessage message=message /> })}
            <button
                type="submit"
                class="w-full flex justify-center py-2 px-4 rounded-md text-sm font-semibold bg-action-primary-bg text-action-primary-text hover:bg-action-primary-bg-hover disabled:opacity-50"
                disabled=move || !utils::can_submit(&digits.get(), pending.get())
            >
                {move || if pending.get() { "Verifying..." } else { "Verify OTP" }}
            </button>
            <div class="text-center text-sm">
                <Show
                    when=move || { countdown.get() > 0 }
                    fallback=move || view! {
                        <button
                            type="button"
                            class="font-medium text-action-primary-bg hover:underline disabled:opacity-50"
                            disabled=move || pending.get()
                            on:click=move |_| on_resend.call(())
                        >
                            "Resend OTP"
                        </button>
                    }
                >
                    <span class="text-fg-muted">{move || utils::countdown_label(countdown.get())}</span>
                </Show>
            </div>
            <button
                type="button"
                class="w-full text-sm text-fg-muted hover:text-fg"
                on:click=move |_| on_back.call(())
            >
                "← Back to Login"
            </button>
        </form>
    }
}
