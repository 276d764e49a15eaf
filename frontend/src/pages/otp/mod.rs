use leptos::*;

mod components;
mod panel;
pub mod utils;
pub mod view_model;

pub use panel::OtpPanel;

#[component]
pub fn OtpPage() -> impl IntoView {
    view! { <OtpPanel /> }
}
