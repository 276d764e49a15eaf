use crate::{
    components::layout::LoadingSpinner,
    router::route_policy,
    state::session::{use_session, SessionPhase},
};
use leptos::*;
use leptos_router::{use_location, use_navigate, NavigateOptions};

/// Applies [`route_policy`] whenever the session phase or the location
/// changes, and withholds the routed view until the pair is allowed.
#[component]
pub fn RouteGuard(children: ChildrenFn) -> impl IntoView {
    let session = use_session();
    let state = session.state();
    let pathname = use_location().pathname;
    let phase = create_memo(move |_| state.with(|s| s.phase()));
    let redirect = create_memo(move |_| route_policy(phase.get(), &pathname.get()));

    let navigate = use_navigate();
    create_effect(move |_| {
        if let Some(target) = redirect.get() {
            log::debug!("redirecting to {}", target);
            navigate(
                target,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    view! {
        <Show
            when=move || should_render(redirect.get())
            fallback=|| view! { <LoadingSpinner /> }
        >
            {children()}
        </Show>
    }
}

fn should_render(redirect: Option<&'static str>) -> bool {
    redirect.is_none()
}

/// Whether `phase` may see the protected area at all.
pub fn can_view_protected(phase: SessionPhase) -> bool {
    phase == SessionPhase::Authenticated
}
