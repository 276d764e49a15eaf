use crate::{
    api::{ReaderSummary, Supervisor},
    pages::dashboard::utils::{assigned_or_default, avatar_initial, total_label},
};
use leptos::*;

#[component]
pub fn ProfileCard(
    user: Signal<Option<Supervisor>>,
    summary: Signal<Option<ReaderSummary>>,
    record_count: Signal<usize>,
) -> impl IntoView {
    view! {
        <div class="bg-surface-elevated shadow rounded-lg p-6 flex items-center gap-4">
            <div class="h-12 w-12 rounded-full bg-action-primary-bg text-action-primary-text flex items-center justify-center text-lg font-bold">
                {move || user.with(|u| avatar_initial(u.as_ref()))}
            </div>
            <div class="flex-1 text-sm text-fg-muted space-y-0.5">
                <p class="text-base font-semibold text-fg">
                    {move || user.with(|u| u.as_ref().map(|u| u.name.clone()).filter(|n| !n.is_empty()).unwrap_or_else(|| "Supervisor".into()))}
                </p>
                <p>{move || format!("ID: {}", user.with(|u| u.as_ref().map(|u| u.id.clone()).unwrap_or_default()))}</p>
                <p>{move || format!("Zone: {}", user.with(|u| assigned_or_default(u.as_ref().map(|u| u.zone.as_str()))))}</p>
                <p>{move || format!("DISCOM: {}", user.with(|u| assigned_or_default(u.as_ref().and_then(|u| u.discom.as_deref()))))}</p>
            </div>
            <div class="text-center">
                <p class="text-xs font-bold uppercase tracking-widest text-fg-muted">"Total"</p>
                <p class="mt-1 text-3xl font-extrabold text-fg">
                    {move || summary.with(|s| total_label(s.as_ref(), record_count.get()))}
                </p>
            </div>
        </div>
    }
}
