use leptos::ev::KeyboardEvent;
use leptos::*;

/// Modal yes/no prompt. Escape and a click on the backdrop both cancel.
#[component]
pub fn ConfirmDialog(
    is_open: Signal<bool>,
    title: &'static str,
    message: &'static str,
    confirm_label: &'static str,
    on_confirm: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <Show when=move || is_open.get()>
            <div class="fixed inset-0 z-[70] flex items-center justify-center p-4">
                <div
                    class="absolute inset-0 bg-overlay-backdrop"
                    aria-hidden="true"
                    on:click=move |_| on_cancel.call(())
                ></div>
                <div
                    class="relative z-[71] w-full max-w-sm rounded-lg bg-surface-elevated shadow-xl border border-border p-6"
                    role="dialog"
                    aria-modal="true"
                    aria-labelledby="confirm-dialog-title"
                    tabindex="-1"
                    on:keydown=move |ev: KeyboardEvent| {
                        if ev.key() == "Escape" {
                            ev.prevent_default();
                            on_cancel.call(());
                        }
                    }
                >
                    <h2 id="confirm-dialog-title" class="text-lg font-semibold text-fg">{title}</h2>
                    <p class="mt-2 text-sm text-fg-muted">{message}</p>
                    <div class="mt-6 flex justify-end gap-2">
                        <button
                            type="button"
                            class="rounded-md px-4 py-2 text-sm font-medium bg-surface-muted text-fg hover:bg-surface-elevated"
                            on:click=move |_| on_cancel.call(())
                        >
                            "Cancel"
                        </button>
                        <button
                            type="button"
                            class="rounded-md px-4 py-2 text-sm font-semibold bg-action-danger-bg text-action-danger-text hover:bg-action-danger-bg-hover"
                            on:click=move |_| on_confirm.call(())
                        >
                            {confirm_label}
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
