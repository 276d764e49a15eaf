use leptos::*;
use leptos_router::*;

use crate::{
    api::ApiClient,
    components::guard::RouteGuard,
    pages::{dashboard::DashboardPage, login::LoginPage, otp::OtpPage},
    state::session::{SessionPhase, SessionProvider},
};

pub const LOGIN_ROUTE: &str = "/login";
pub const OTP_ROUTE: &str = "/otp";
pub const MAIN_ROUTE: &str = "/dashboard";

pub const ROUTE_PATHS: &[&str] = &["/", LOGIN_ROUTE, OTP_ROUTE, MAIN_ROUTE];

/// Screens reachable while signed out.
pub const AUTH_ROUTE_PATHS: &[&str] = &[LOGIN_ROUTE, OTP_ROUTE];

pub fn is_auth_route(path: &str) -> bool {
    AUTH_ROUTE_PATHS.contains(&normalize(path))
}

/// Where a visitor in `phase` asking for `path` must be sent instead, or
/// `None` when the path may render as is.
pub fn route_policy(phase: SessionPhase, path: &str) -> Option<&'static str> {
    let path = normalize(path);
    let on_auth_route = is_auth_route(path);
    match phase {
        SessionPhase::Authenticated if on_auth_route => Some(MAIN_ROUTE),
        SessionPhase::Authenticated => None,
        SessionPhase::Unauthenticated | SessionPhase::AwaitingOtp if on_auth_route => None,
        SessionPhase::Unauthenticated | SessionPhase::AwaitingOtp => Some(LOGIN_ROUTE),
    }
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

pub fn mount_app() {
    mount_to_body(app_root);
}

pub fn app_root() -> impl IntoView {
    provide_context(ApiClient::new());
    view! {
        <SessionProvider>
            <Router>
                <RouteGuard>
                    <Routes>
                        <Route path="/" view=DashboardPage/>
                        <Route path=LOGIN_ROUTE view=LoginPage/>
                        <Route path=OTP_ROUTE view=OtpPage/>
                        <Route path=MAIN_ROUTE view=DashboardPage/>
                    </Routes>
                </RouteGuard>
            </Router>
        </SessionProvider>
    }
}
