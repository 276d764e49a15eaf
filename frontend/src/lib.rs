pub mod api;
mod components;
pub mod config;
mod pages;
pub mod router;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_support;

/// Entry point: installs the panic hook and logger, then mounts the app once
/// runtime config has loaded.
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Starting Supervisor Frontend (wasm)");

    leptos::spawn_local(boot(router::mount_app));
}

/// Resolves runtime config before anything reads `config::current()`.
/// window.__SUPERVISOR_ENV wins over ./config.json; both are optional.
async fn boot(mount: impl FnOnce()) {
    config::init().await;
    mount();
}
