//! Startup configuration from URL query parameters
//!
//! `?config=<url>` fetches a TOML config, `?model=<url>` overrides the model
//! path. Both are optional; a bad config falls back to defaults.

use isle_core::IsleConfig;
use wasm_bindgen::JsCast;

/// Read a query parameter from the page URL
fn query_param(name: &str) -> Option<String> {
    let window = web_sys::window()?;
    let href = window.location().href().ok()?;
    let url = web_sys::Url::new(&href).ok()?;
    url.search_params().get(name).filter(|v| !v.is_empty())
}

pub async fn resolve_config() -> IsleConfig {
    let mut config = match query_param("config") {
        Some(url) => {
            tracing::info!("Loading config from URL parameter: {}", url);
            match fetch_text(&url).await {
                Ok(text) => IsleConfig::from_toml_str(&text).unwrap_or_else(|e| {
                    tracing::warn!("Invalid config at {}: {}, using defaults", url, e);
                    IsleConfig::default()
                }),
                Err(e) => {
                    tracing::warn!("Failed to fetch config {}: {}, using defaults", url, e);
                    IsleConfig::default()
                }
            }
        }
        None => IsleConfig::default(),
    };

    if let Some(model) = query_param("model") {
        tracing::info!("Using model from URL parameter: {}", model);
        config.scene.model_path = model;
    }

    config
}

/// Fetch text content from URL
async fn fetch_text(url: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or("No window")?;

    let resp = wasm_bindgen_futures::JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| format!("Fetch failed: {:?}", e))?;

    let resp: web_sys::Response = resp.dyn_into().map_err(|_| "Response cast failed")?;

    if !resp.ok() {
        return Err(format!("HTTP {}: {}", resp.status(), resp.status_text()));
    }

    let text = wasm_bindgen_futures::JsFuture::from(resp.text().map_err(|_| "Failed to get text")?)
        .await
        .map_err(|e| format!("Text extraction failed: {:?}", e))?;

    text.as_string().ok_or_else(|| "Not a string".to_string())
}
