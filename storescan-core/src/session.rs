use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_API_ROOT: &str = "https://store.playstation.com/valkyrie-api";
pub const DEFAULT_SESSION_ENDPOINT: &str =
    "https://store.playstation.com/kamaji/api/valkyrie_storefront/00_09_000/user/session";

/// Where the out-of-band handshake goes. Overridable so tests can point at
/// a mock server.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub session_endpoint: String,
    pub api_root: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_endpoint: DEFAULT_SESSION_ENDPOINT.to_string(),
            api_root: DEFAULT_API_ROOT.to_string(),
        }
    }
}

/// Authenticated context for one run: the catalog base URL template and the
/// root storefront to start the walk from. Read-only for the traversal; the
/// cookies themselves live in the shared HTTP client.
#[derive(Debug, Clone)]
pub struct Session {
    pub base_url: String,
    pub root_storefront: String,
}

#[derive(Deserialize)]
struct HandshakeResponse {
    data: HandshakeData,
}

#[derive(Deserialize)]
struct HandshakeData {
    #[serde(rename = "sessionUrl")]
    session_url: String,
}

#[derive(Deserialize)]
struct StoresResponse {
    data: StoresData,
}

#[derive(Deserialize)]
struct StoresData {
    base_url: String,
}

/// The one client shared between bootstrap and traversal. The cookie store
/// is what carries the session obtained by the handshake into every
/// subsequent catalog request.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent("storescan/0.2 (https://github.com/mworks-dev/storescan)")
        .cookie_store(true)
        .timeout(Duration::from_secs(30))
        .build()
        .context("failed to build HTTP client")
}

/// Perform the session handshake and resolve the root storefront for the
/// given region. Any failure here is fatal: the traversal never starts
/// without a session.
pub async fn bootstrap(
    client: &Client,
    config: &SessionConfig,
    language: &str,
    country: &str,
) -> Result<Session> {
    let handshake: HandshakeResponse = client
        .post(&config.session_endpoint)
        .form(&[
            ("country_code", country.to_uppercase()),
            ("language_code", language.to_string()),
        ])
        .send()
        .await
        .context("session handshake request failed")?
        .error_for_status()
        .context("session handshake was rejected")?
        .json()
        .await
        .context("session handshake returned an unexpected body")?;

    // The session URL comes back slash-terminated; the stores endpoint
    // hangs directly off it.
    let stores_url = format!("{}user/stores", handshake.data.session_url);
    let stores_url =
        Url::parse(&stores_url).context("session handshake returned an invalid session URL")?;
    debug!("stores endpoint: {stores_url}");

    let stores: StoresResponse = client
        .get(stores_url)
        .send()
        .await
        .context("stores lookup request failed")?
        .error_for_status()
        .context("stores lookup was rejected")?
        .json()
        .await
        .context("stores lookup returned an unexpected body")?;

    let root_storefront = stores
        .data
        .base_url
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();
    if root_storefront.is_empty() {
        bail!(
            "stores response carried no storefront id: `{}`",
            stores.data.base_url
        );
    }
    info!("resolved root storefront {root_storefront}");

    Ok(Session {
        base_url: format!("{}/{}/{}/999", config.api_root, language, country),
        root_storefront,
    })
}
