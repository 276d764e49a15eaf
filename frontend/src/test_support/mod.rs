#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod ssr;

#[cfg(test)]
pub mod helpers {
    use std::rc::Rc;

    use crate::api::{ApiClient, MeterReader, Supervisor};
    use crate::state::session::{Session, SessionManager};
    use crate::utils::storage::{MemoryStore, SessionStore};
    use leptos::*;

    pub fn supervisor() -> Supervisor {
        Supervisor {
            id: "SUP1".into(),
            name: "A".into(),
            zone: "Z".into(),
            mobile: None,
            discom: None,
        }
    }

    pub fn session() -> Session {
        Session {
            token: "tok".into(),
            user: supervisor(),
        }
    }

    pub fn meter_reader(id: &str, name: &str) -> MeterReader {
        MeterReader {
            id: id.into(),
            name: name.into(),
            mobile: String::new(),
            email: String::new(),
            employee_code: String::new(),
            agency: String::new(),
            division_code: String::new(),
            discom: String::new(),
            pending_readings: None,
            total_assigned: None,
            completion_rate: None,
            status: None,
        }
    }

    /// A manager talking to `base_url` and persisting into a clone of `store`.
    pub fn session_manager(base_url: &str, store: &MemoryStore) -> SessionManager {
        let store: Rc<dyn SessionStore> = Rc::new(store.clone());
        SessionManager::new(Rc::new(ApiClient::new_with_base_url(base_url)), store)
    }

    /// Same as [`session_manager`], already signed in and shared via context.
    pub fn provide_signed_in(base_url: &str, store: &MemoryStore) -> SessionManager {
        let manager = session_manager(base_url, store);
        manager.state().update(|s| s.session = Some(session()));
        provide_context(manager.clone());
        manager
    }
}
