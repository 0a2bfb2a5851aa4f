//! Scan a Dropbox account for playable audio files.
//!
//! Credentials come from the OS keychain (stored there by the host's
//! authorization flow) or, for quick experiments, from the environment:
//!
//! ```bash
//! DROPBOX_APP_KEY=... DROPBOX_APP_SECRET=... \
//! DROPBOX_ACCESS_TOKEN=... DROPBOX_ACCESS_TOKEN_SECRET=... \
//! cargo run --example scan
//! ```

use bridge_desktop::{KeyringSecureStore, ReqwestHttpClient};
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::tags::{TagReader, TrackTags};
use core_auth::{CredentialStore, Credentials, RequestSigner};
use provider_dropbox::{DropboxConfig, DropboxService};
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Tag reader stand-in: a real host wires its own extraction service here.
struct LoggingTagReader;

#[async_trait::async_trait]
impl TagReader for LoggingTagReader {
    async fn read_cloud_file(
        &self,
        url: &str,
        filename: &str,
        size_bytes: u64,
        mime_type: &str,
    ) -> BridgeResult<TrackTags> {
        info!(
            filename = filename,
            size_bytes = size_bytes,
            mime_type = mime_type,
            url = url,
            "Would read tags"
        );
        Ok(TrackTags::default())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,provider_dropbox=debug")),
        )
        .init();

    let app_key = env::var("DROPBOX_APP_KEY").unwrap_or_else(|_| "app_key".to_string());
    let app_secret = env::var("DROPBOX_APP_SECRET").unwrap_or_else(|_| "app_secret".to_string());

    let credentials = match load_credentials().await {
        Some(credentials) => credentials,
        None => {
            eprintln!("No credentials found in the keychain or the environment");
            std::process::exit(1);
        }
    };

    let config = DropboxConfig::new(
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(LoggingTagReader),
        RequestSigner::new(app_key, app_secret),
    )
    .with_credentials(credentials);

    let service = Arc::new(DropboxService::new(config));

    service.connect().await.expect("credentials were present");
    service.wait_until_idle().await;

    let stats = service.stats();
    info!(
        directories = stats.directories_listed,
        audio_files = stats.audio_files_found,
        skipped = stats.entries_skipped,
        listing_failures = stats.listing_failures,
        resolution_failures = stats.resolution_failures,
        "Scan finished"
    );
}

/// Environment variables win over the keychain, for experimentation.
async fn load_credentials() -> Option<Credentials> {
    if let (Ok(token), Ok(secret)) = (
        env::var("DROPBOX_ACCESS_TOKEN"),
        env::var("DROPBOX_ACCESS_TOKEN_SECRET"),
    ) {
        return Some(Credentials::new(token, secret, "env"));
    }

    let store = CredentialStore::new(Arc::new(KeyringSecureStore::new()));
    store.load().await.ok().flatten()
}
