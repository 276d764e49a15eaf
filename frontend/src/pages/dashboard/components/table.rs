use crate::{
    api::MeterReader,
    pages::dashboard::utils::{
        completion_label, name_label, or_na, page_label, pending_count, range_label, short_id,
    },
};
use leptos::*;

#[component]
pub fn SearchBox(query: Signal<String>, on_input: Callback<String>) -> impl IntoView {
    view! {
        <input
            type="search"
            class="w-full sm:w-72 px-3 py-2 border border-border rounded-md text-sm text-fg focus:outline-none focus:ring-action-primary-bg"
            placeholder="Search meter readers..."
            prop:value=move || query.get()
            on:input=move |ev| on_input.call(event_target_value(&ev))
        />
    }
}

#[component]
pub fn ReadersTable(rows: Signal<Vec<MeterReader>>) -> impl IntoView {
    view! {
        <div class="overflow-x-auto">
            <table class="min-w-full divide-y divide-border text-sm">
                <thead class="bg-surface-muted">
                    <tr>
                        {["ID", "Name", "Mobile", "Emp Code", "Agency", "Division", "Pending", "Completion"]
                            .into_iter()
                            .map(|label| view! {
                                <th class="px-4 py-2 text-left text-xs font-semibold uppercase tracking-wider text-fg-muted">{label}</th>
                            })
                            .collect_view()}
                    </tr>
                </thead>
                <tbody class="divide-y divide-border">
                    {move || rows.get().into_iter().enumerate().map(|(i, reader)| {
                        let pending = pending_count(&reader);
                        let row_class = if i % 2 == 0 { "bg-surface-elevated" } else { "bg-surface-muted" };
                        let pending_class = if pending > 0 { "font-bold text-status-warning-text" } else { "font-bold text-status-success-text" };
                        view! {
                            <tr class=row_class>
                                <td class="px-4 py-2 font-mono" title=reader.id.clone()>{short_id(&reader.id)}</td>
                                <td class="px-4 py-2 font-semibold text-fg">{name_label(&reader.name)}</td>
                                <td class="px-4 py-2">{or_na(&reader.mobile)}</td>
                                <td class="px-4 py-2">{or_na(&reader.employee_code)}</td>
                                <td class="px-4 py-2">{or_na(&reader.agency)}</td>
                                <td class="px-4 py-2">{or_na(&reader.division_code)}</td>
                                <td class=format!("px-4 py-2 {}", pending_class)>{pending}</td>
                                <td class="px-4 py-2 text-action-primary-bg">{completion_label(&reader)}</td>
                            </tr>
                        }
                    }).collect_view()}
                </tbody>
            </table>
        </div>
    }
}

#[component]
pub fn Pagination(
    current_page: Signal<usize>,
    total_pages: Signal<usize>,
    has_prev: Signal<bool>,
    has_next: Signal<bool>,
    bounds: Signal<(usize, usize)>,
    total_items: Signal<usize>,
    on_page: Callback<i64>,
) -> impl IntoView {
    let prev = move |_: ev::MouseEvent| on_page.call(current_page.get_untracked() as i64 - 1);
    let next = move |_: ev::MouseEvent| on_page.call(current_page.get_untracked() as i64 + 1);
    view! {
        <div class="flex items-center justify-between px-4 py-3 text-sm text-fg-muted">
            <span>{move || {
                let (start, end) = bounds.get();
                range_label(start, end, total_items.get())
            }}</span>
            <div class="flex items-center gap-2">
                <button
                    type="button"
                    class="px-3 py-1 rounded-md border border-border disabled:opacity-50"
                    disabled=move || !has_prev.get()
                    on:click=prev
                >
                    "Previous"
                </button>
                <span>{move || page_label(current_page.get(), total_pages.get())}</span>
                <button
                    type="button"
                    class="px-3 py-1 rounded-md border border-border disabled:opacity-50"
                    disabled=move || !has_next.get()
                    on:click=next
                >
                    "Next"
                </button>
            </div>
        </div>
    }
}
