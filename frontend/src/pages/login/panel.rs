use crate::{
    components::layout::AuthLayout,
    pages::login::{components::form::LoginForm, view_model::use_login_view_model},
    router::OTP_ROUTE,
};
use leptos::{ev::SubmitEvent, Callback, *};
use leptos_router::use_navigate;

#[component]
pub fn LoginPanel() -> impl IntoView {
    let vm = use_login_view_model();
    let request_action = vm.request_action;

    let navigate = use_navigate();
    create_effect(move |_| {
        if let Some(Ok(())) = request_action.value().get() {
            navigate(OTP_ROUTE, Default::default());
        }
    });

    let handle_submit = {
        let vm = vm.clone();
        Callback::new(move |ev: SubmitEvent| {
            ev.prevent_default();
            vm.submit();
        })
    };

    view! {
        <AuthLayout title="Supervisor Login" subtitle="Enter your credentials to continue">
            <LoginForm
                supervisor_id=vm.supervisor_id
                error=vm.error
                pending=vm.pending()
                on_submit=handle_submit
            />
        </AuthLayout>
    }
}
