//! Server Configuration
//!
//! Environment-driven, with compiled defaults that match the production
//! deployment. Anything unset or unparsable falls back with a warning.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

/// The production market-data pool the `/api/data` proxy fronts.
const DEFAULT_UPSTREAM_URL: &str = "https://app.geckoterminal.com/api/p1/solana/pools/2jRNkMgrNLEtNDfRrhhD6LicSkKkUgCd2MtfFTqDcNdZ?include=dex,dex.network.explorers,dex_link_services,network_link_services,pairs,token_link_services,tokens.token_security_metric,tokens.tags,pool_locked_liquidities&base_token=0&time_frame=24h";

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Port to bind on.
    pub port: u16,
    /// Upstream market-data URL the proxy forwards to.
    pub upstream_url: String,
    /// Directory listed by `/api/memes`.
    pub memes_dir: PathBuf,
    /// Static asset tree served as the router fallback.
    pub public_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from the environment.
    #[must_use]
    pub fn load() -> Self {
        Self {
            port: try_load("MUNKY_PORT", "3000"),
            upstream_url: env::var("MUNKY_UPSTREAM_URL")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.to_string()),
            memes_dir: PathBuf::from(
                env::var("MUNKY_MEMES_DIR").unwrap_or_else(|_| "public/memes".to_string()),
            ),
            public_dir: PathBuf::from(
                env::var("MUNKY_PUBLIC_DIR").unwrap_or_else(|_| "public".to_string()),
            ),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse().unwrap_or_else(|err| {
        warn!("Invalid value for {key} ({err}), using default {default}");
        default
            .parse()
            .unwrap_or_else(|err| panic!("default for {key} must parse: {err}"))
    })
}
