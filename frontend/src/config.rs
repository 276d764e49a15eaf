use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const DEFAULT_API_ENDPOINT: &str = "http://65.2.50.195/dev/coral/do_superviser1.php";
pub const DEFAULT_PAGE_SIZE: usize = 25;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub api_endpoint: Option<String>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl RuntimeConfig {
    /// Fills unset fields from `fallback`; values already set win.
    pub fn or(self, fallback: RuntimeConfig) -> RuntimeConfig {
        RuntimeConfig {
            api_endpoint: self.api_endpoint.or(fallback.api_endpoint),
            page_size: self.page_size.or(fallback.page_size),
        }
    }

    pub fn api_endpoint(&self) -> String {
        self.api_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_ENDPOINT)
            .to_string()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

static RUNTIME_CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

pub fn parse_page_size(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|size| *size > 0)
}

#[cfg(target_arch = "wasm32")]
fn snapshot_from_globals() -> RuntimeConfig {
    // Optional global object: window.__SUPERVISOR_ENV = { API_ENDPOINT: "...", PAGE_SIZE: 25 }
    let Some(w) = web_sys::window() else {
        return RuntimeConfig::default();
    };
    let Ok(any) = js_sys::Reflect::get(&w, &"__SUPERVISOR_ENV".into()) else {
        return RuntimeConfig::default();
    };
    if any.is_undefined() || any.is_null() {
        return RuntimeConfig::default();
    }
    let obj = js_sys::Object::from(any);
    let read = |upper: &str, lower: &str| {
        js_sys::Reflect::get(&obj, &upper.into())
            .ok()
            .filter(|v| !v.is_undefined() && !v.is_null())
            .or_else(|| js_sys::Reflect::get(&obj, &lower.into()).ok())
            .filter(|v| !v.is_undefined() && !v.is_null())
    };
    RuntimeConfig {
        api_endpoint: read("API_ENDPOINT", "api_endpoint").and_then(|v| v.as_string()),
        page_size: read("PAGE_SIZE", "page_size").and_then(|v| {
            v.as_f64()
                .filter(|n| *n >= 1.0)
                .map(|n| n as usize)
                .or_else(|| v.as_string().and_then(|s| parse_page_size(&s)))
        }),
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_runtime_config() -> RuntimeConfig {
    let origin = web_sys::window().and_then(|w| w.location().origin().ok());
    let Some(origin) = origin else {
        return RuntimeConfig::default();
    };
    let resp = match reqwest::Client::new()
        .get(format!("{}/config.json", origin))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => resp,
        _ => return RuntimeConfig::default(),
    };
    resp.json::<RuntimeConfig>().await.unwrap_or_else(|e| {
        log::warn!("config.json is not valid: {}", e);
        RuntimeConfig::default()
    })
}

#[cfg(target_arch = "wasm32")]
async fn resolve() -> RuntimeConfig {
    let globals = snapshot_from_globals();
    if globals.api_endpoint.is_some() && globals.page_size.is_some() {
        return globals;
    }
    globals.or(fetch_runtime_config().await)
}

#[cfg(not(target_arch = "wasm32"))]
async fn resolve() -> RuntimeConfig {
    RuntimeConfig {
        api_endpoint: std::env::var("SUPERVISOR_API_ENDPOINT").ok(),
        page_size: std::env::var("SUPERVISOR_PAGE_SIZE")
            .ok()
            .and_then(|raw| parse_page_size(&raw)),
    }
}

pub async fn load() -> RuntimeConfig {
    if let Some(cached) = RUNTIME_CONFIG.get() {
        return cached.clone();
    }
    let resolved = resolve().await;
    RUNTIME_CONFIG.get_or_init(|| resolved).clone()
}

/// Config resolved so far; defaults until `load` has completed once.
pub fn current() -> RuntimeConfig {
    RUNTIME_CONFIG.get().cloned().unwrap_or_default()
}

pub async fn await_api_endpoint() -> String {
    load().await.api_endpoint()
}

pub async fn init() {
    let cfg = load().await;
    log::info!(
        "Runtime config initialized (endpoint {}, page size {})",
        cfg.api_endpoint(),
        cfg.page_size()
    );
}
