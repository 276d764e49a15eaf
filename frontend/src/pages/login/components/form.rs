use crate::components::layout::ErrorMessage;
use leptos::{ev::SubmitEvent, *};

#[component]
pub fn LoginForm(
    supervisor_id: RwSignal<String>,
    error: Signal<Option<String>>,
    pending: Signal<bool>,
    on_submit: Callback<SubmitEvent>,
) -> impl IntoView {
    view! {
        <form class="space-y-6" on:submit=move |ev| on_submit.call(ev)>
            <div>
                <label for="supervisor_id" class="block text-sm font-medium text-fg">"Supervisor ID"</label>
                <input
                    id="supervisor_id"
                    name="supervisor_id"
                    type="text"
                    autocomplete="username"
                    autocapitalize="none"
                    class="mt-1 appearance-none relative block w-full px-3 py-2 border border-border rounded-md text-fg focus:outline-none focus:ring-action-primary-bg sm:text-sm"
                    placeholder="Enter your supervisor ID"
                    prop:value=move || supervisor_id.get()
                    disabled=move || pending.get()
                    on:input=move |ev| supervisor_id.set(event_target_value(&ev))
                />
            </div>
            {move || error.get().map(|message| view! { <ErrorMessage message=message /> })}
            <button
                type="submit"
                class="w-full flex justify-center py-2 px-4 rounded-md text-sm font-semibold bg-action-primary-bg text-action-primary-text hover:bg-action-primary-bg-hover disabled:opacity-50"
                disabled=move || pending.get() || supervisor_id.with(|id| id.trim().is_empty())
            >
                {move || if pending.get() { "Sending OTP..." } else { "Send OTP" }}
            </button>
        </form>
    }
}
