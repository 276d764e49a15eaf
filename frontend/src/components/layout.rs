use crate::{
    components::confirm_dialog::ConfirmDialog,
    router::LOGIN_ROUTE,
    state::session::use_session,
};
use leptos::*;
use leptos_router::{use_navigate, NavigateOptions};

#[component]
pub fn Header() -> impl IntoView {
    let session = use_session();
    let state = session.state();
    let (confirm_open, set_confirm_open) = create_signal(false);
    let name = move || {
        state.with(|s| {
            s.user()
                .map(|u| u.name.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Supervisor".into())
        })
    };

    let navigate = use_navigate();
    let on_confirm = Callback::new(move |_| {
        set_confirm_open.set(false);
        session.sign_out();
        navigate(
            LOGIN_ROUTE,
            NavigateOptions {
                replace: true,
                ..Default::default()
            },
        );
    });
    let on_cancel = Callback::new(move |_| set_confirm_open.set(false));

    view! {
        <header class="bg-surface-elevated shadow-sm border-b border-border">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <div>
                        <h1 class="text-xl font-semibold text-fg">{move || format!("Welcome, {}", name())}</h1>
                        <p class="text-sm text-fg-muted">"Supervisor Dashboard"</p>
                    </div>
                    <button
                        on:click=move |_| set_confirm_open.set(true)
                        class="text-fg-muted hover:text-fg px-3 py-2 rounded-md text-sm font-medium hover:bg-action-ghost-bg-hover"
                    >
                        "Logout"
                    </button>
                </div>
            </div>
            <ConfirmDialog
                is_open=confirm_open.into()
                title="Logout"
                message="Are you sure you want to logout?"
                confirm_label="Logout"
                on_confirm=on_confirm
                on_cancel=on_cancel
            />
        </header>
    }
}

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-surface">
            <Header/>
            <main class="max-w-7xl mx-auto py-6 sm:px-6 lg:px-8">
                {children()}
            </main>
        </div>
    }
}

/// Centered card used by the sign-in screens.
#[component]
pub fn AuthLayout(
    #[prop(into)] title: String,
    #[prop(into)] subtitle: String,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="min-h-screen flex items-center justify-center bg-surface px-4">
            <div class="w-full max-w-md rounded-lg bg-surface-elevated shadow-xl border border-border p-8 space-y-6">
                <div class="text-center">
                    <h1 class="text-2xl font-bold text-fg">{title}</h1>
                    <p class="mt-2 text-sm text-fg-muted">{subtitle}</p>
                </div>
                {children()}
            </div>
        </div>
    }
}

#[component]
pub fn LoadingSpinner() -> impl IntoView {
    view! {
        <div class="flex justify-center items-center p-8">
            <div class="animate-spin rounded-full h-8 w-8 border-b-2 border-action-primary-bg"></div>
        </div>
    }
}

#[component]
pub fn ErrorMessage(message: String) -> impl IntoView {
    view! {
        <div class="bg-status-error-bg border border-status-error-border text-status-error-text px-4 py-3 rounded mb-4" role="alert">
            <p class="text-sm">{message}</p>
        </div>
    }
}

#[component]
pub fn SuccessMessage(message: String) -> impl IntoView {
    view! {
        <div class="bg-status-success-bg border border-status-success-border text-status-success-text px-4 py-3 rounded mb-4" role="status">
            <p class="text-sm">{message}</p>
        </div>
    }
}
