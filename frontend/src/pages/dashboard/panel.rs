use crate::{
    components::{
        empty_state::EmptyState,
        layout::{ErrorMessage, Layout, LoadingSpinner},
    },
    pages::dashboard::{
        components::{Pagination, ProfileCard, ReadersTable, SearchBox},
        view_model::{use_dashboard_view_model, DashboardViewModel},
    },
    state::session::use_session,
};
use leptos::*;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let vm = use_dashboard_view_model();
    view! {
        <Layout>
            <DashboardBody vm=vm />
        </Layout>
    }
}

#[component]
fn DashboardBody(vm: DashboardViewModel) -> impl IntoView {
    let state = vm.state;
    let session_state = use_session().state();
    let user = Signal::derive(move || session_state.with(|s| s.user().cloned()));
    let summary = Signal::derive(move || state.summary.get());
    let record_count = Signal::derive(move || state.table.with(|t| t.records().len()));
    let rows = Signal::derive(move || state.table.with(|t| t.page_data().into_iter().cloned().collect()));
    let current_page = Signal::derive(move || state.table.with(|t| t.current_page()));
    let total_pages = Signal::derive(move || state.table.with(|t| t.total_pages()));
    let has_prev = Signal::derive(move || state.table.with(|t| t.has_prev()));
    let has_next = Signal::derive(move || state.table.with(|t| t.has_next()));
    let bounds = Signal::derive(move || state.table.with(|t| t.page_bounds()));
    let filtered_len = Signal::derive(move || state.table.with(|t| t.filtered_len()));
    let has_data = move || state.table.with(|t| t.has_data());

    let on_query = Callback::new(move |query: String| vm.set_query(query));
    let on_page = Callback::new(move |page: i64| vm.go_to_page(page));
    let on_retry = Callback::new(move |_| vm.retry());

    view! {
        <div class="space-y-6 px-4 sm:px-0">
            <ProfileCard user=user summary=summary record_count=record_count />
            <div class="bg-surface-elevated shadow rounded-lg">
                <div class="flex flex-col gap-3 sm:flex-row sm:items-center sm:justify-between px-4 py-4 border-b border-border">
                    <h2 class="text-lg font-semibold text-fg">"Meter Readers Details"</h2>
                    <div class="flex items-center gap-2">
                        <SearchBox query=vm.query() on_input=on_query />
                        <button
                            type="button"
                            class="px-3 py-2 rounded-md text-sm font-medium border border-border hover:bg-action-ghost-bg-hover disabled:opacity-50"
                            disabled=move || state.busy()
                            on:click=move |_| vm.refresh()
                        >
                            {move || if state.refreshing.get() { "Refreshing..." } else { "Refresh" }}
                        </button>
                    </div>
                </div>
                {move || {
                    if state.loading.get() {
                        view! {
                            <div class="py-8 text-center text-sm text-fg-muted">
                                <LoadingSpinner />
                                <span>"Loading meter readers..."</span>
                            </div>
                        }.into_view()
                    } else if !has_data() {
                        match state.error.get() {
                            Some(err) => view! {
                                <div class="p-4">
                                    <EmptyState
                                        title="Error Loading Data"
                                        description=err
                                        action=("Retry".to_string(), on_retry)
                                    />
                                </div>
                            }.into_view(),
                            None => view! {
                                <div class="p-4">
                                    <EmptyState
                                        title="No Meter Readers Found"
                                        description="No meter readers are assigned to this supervisor"
                                    />
                                </div>
                            }.into_view(),
                        }
                    } else {
                        view! {
                            <div>
                                {move || state.error.get().map(|message| view! {
                                    <div class="px-4 pt-4"><ErrorMessage message=message /></div>
                                })}
                                {move || if filtered_len.get() == 0 {
                                    view! {
                                        <div class="p-4">
                                            <EmptyState
                                                title="No matching meter readers"
                                                description="Try a different search term"
                                            />
                                        </div>
                                    }.into_view()
                                } else {
                                    view! {
                                        <ReadersTable rows=rows />
                                        <Pagination
                                            current_page=current_page
                                            total_pages=total_pages
                                            has_prev=has_prev
                                            has_next=has_next
                                            bounds=bounds
                                            total_items=filtered_len
                                            on_page=on_page
                                        />
                                    }.into_view()
                                }}
                            </div>
                        }.into_view()
                    }
                }}
            </div>
        </div>
    }
}
