use crate::{
    api::{ApiError, MeterReader, ReaderSummary},
    components::guard::can_view_protected,
    config,
    pages::dashboard::repository::ReadersRepository,
    state::{
        session::{use_session, SessionManager},
        table::TableState,
    },
};
use leptos::*;

const MSG_NO_SESSION: &str = "User session not found. Please login again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Initial,
    Refresh,
}

/// Reactive holders for the readers screen. The initial load and a refresh
/// are tracked separately so the table can stay visible while refreshing.
#[derive(Clone, Copy)]
pub struct ReadersState {
    pub table: RwSignal<TableState<MeterReader>>,
    pub summary: RwSignal<Option<ReaderSummary>>,
    pub loading: RwSignal<bool>,
    pub refreshing: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
}

impl ReadersState {
    pub fn new(page_size: usize) -> Self {
        Self {
            table: create_rw_signal(TableState::new(page_size)),
            summary: create_rw_signal(None),
            loading: create_rw_signal(false),
            refreshing: create_rw_signal(false),
            error: create_rw_signal(None),
        }
    }

    pub fn busy(&self) -> bool {
        self.loading.get() || self.refreshing.get()
    }

    fn flag(&self, mode: FetchMode) -> RwSignal<bool> {
        match mode {
            FetchMode::Initial => self.loading,
            FetchMode::Refresh => self.refreshing,
        }
    }
}

/// Fetches the supervisor's readers into `state`. Without a session the user
/// is signed out instead. Writes into disposed signals are dropped.
pub async fn load_readers(
    mode: FetchMode,
    state: ReadersState,
    session: &SessionManager,
    repo: &ReadersRepository,
) -> Result<(), ApiError> {
    let Some(current) = session.current_session() else {
        log::warn!("meter reader fetch without a session; signing out");
        state.error.try_set(Some(MSG_NO_SESSION.to_string()));
        session.sign_out();
        return Err(ApiError::validation(MSG_NO_SESSION));
    };

    let flag = state.flag(mode);
    flag.try_set(true);
    state.error.try_set(None);

    let result = repo.fetch(&current).await;

    let outcome = match result {
        Ok(snapshot) => {
            state
                .table
                .try_update(|table| table.replace_records(snapshot.readers));
            state.summary.try_set(snapshot.summary);
            Ok(())
        }
        Err(err) => {
            state.error.try_set(Some(err.error.clone()));
            Err(err)
        }
    };
    flag.try_set(false);
    outcome
}

#[derive(Clone, Copy)]
pub struct DashboardViewModel {
    pub state: ReadersState,
    pub load_action: Action<FetchMode, Result<(), ApiError>>,
}

impl DashboardViewModel {
    pub fn new() -> Self {
        let session = use_session();
        let repo = ReadersRepository::new_with_client(session.api());
        let state = ReadersState::new(config::current().page_size());

        let action_session = session.clone();
        let load_action = create_action(move |mode: &FetchMode| {
            let session = action_session.clone();
            let repo = repo.clone();
            let mode = *mode;
            async move { load_readers(mode, state, &session, &repo).await }
        });

        if can_view_protected(session.snapshot().phase()) {
            load_action.dispatch(FetchMode::Initial);
        }

        Self { state, load_action }
    }

    pub fn query(&self) -> Signal<String> {
        let table = self.state.table;
        Signal::derive(move || table.with(|t| t.query().to_string()))
    }

    pub fn set_query(&self, query: String) {
        self.state.table.update(|t| t.set_query(query));
    }

    pub fn go_to_page(&self, page: i64) {
        self.state.table.update(|t| {
            t.go_to_page(page);
        });
    }

    /// Ignored while a load or refresh is already running.
    pub fn refresh(&self) {
        if self.state.loading.get_untracked() || self.state.refreshing.get_untracked() {
            return;
        }
        self.load_action.dispatch(FetchMode::Refresh);
    }

    pub fn retry(&self) {
        if self.state.loading.get_untracked() {
            return;
        }
        self.load_action.dispatch(FetchMode::Initial);
    }
}

pub fn use_dashboard_view_model() -> DashboardViewModel {
    match use_context::<DashboardViewModel>() {
        Some(vm) => vm,
        None => {
            let vm = DashboardViewModel::new();
            provide_context(vm);
            vm
        }
    }
}
