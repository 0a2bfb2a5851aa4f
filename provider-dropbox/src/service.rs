//! Dropbox service: traversal and content resolution
//!
//! Implements the discovery pipeline: walk the remote tree, filter for
//! playable audio, resolve each hit to a time-limited URL and hand it to the
//! host's tag reader. Also serves the playback layer's just-in-time URL
//! requests.

use std::sync::Arc;

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use bridge_traits::tags::TagReader;
use core_auth::{Credentials, RequestSigner};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, instrument, trace};

use crate::error::{DropboxError, Result};
use crate::events::ServiceEvent;
use crate::mime::is_supported_audio;
use crate::stats::{ScanStats, StatsSnapshot};
use crate::types::{FolderListing, MediaLink, MetadataEntry, ResolvedContent};

/// Dropbox v1 metadata endpoint (directory listings)
const METADATA_ENDPOINT: &str = "https://api.dropbox.com/1/metadata/dropbox/";

/// Dropbox v1 media endpoint (time-limited direct links)
const MEDIA_ENDPOINT: &str = "https://api.dropbox.com/1/media/dropbox/";

/// Capacity of the service event channel
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Everything a [`DropboxService`] needs, passed explicitly — the service
/// holds no ambient/global state.
pub struct DropboxConfig {
    /// HTTP transport
    pub http_client: Arc<dyn HttpClient>,
    /// Host tag-extraction service
    pub tag_reader: Arc<dyn TagReader>,
    /// Request signer carrying the application key pair
    pub signer: RequestSigner,
    /// Credentials loaded at startup, if any
    pub credentials: Option<Credentials>,
}

impl DropboxConfig {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        tag_reader: Arc<dyn TagReader>,
        signer: RequestSigner,
    ) -> Self {
        Self {
            http_client,
            tag_reader,
            signer,
            credentials: None,
        }
    }

    /// Provide credentials loaded from the credential store
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

/// Dropbox adapter service.
///
/// # Traversal model
///
/// [`connect`](Self::connect) starts a listing of the account root. Every
/// subdirectory fans out its own listing task and every matching file fans
/// out its own resolution task; nothing joins them. A failed request
/// abandons exactly that branch — logged and counted, never propagated.
/// Completion is implicit: the scan is done when the in-flight gauge reaches
/// zero ([`wait_until_idle`](Self::wait_until_idle)).
///
/// Credentials are copied into the `Authorization` header when a request is
/// issued; a re-authentication while requests are in flight affects only
/// requests issued afterwards.
///
/// Methods that fan out tasks take `self: &Arc<Self>`, since the spawned
/// tasks keep the service alive.
pub struct DropboxService {
    http_client: Arc<dyn HttpClient>,
    tag_reader: Arc<dyn TagReader>,
    signer: RequestSigner,
    credentials: RwLock<Option<Credentials>>,
    events: broadcast::Sender<ServiceEvent>,
    stats: Arc<ScanStats>,
}

impl DropboxService {
    /// Create a new service from an explicit configuration
    pub fn new(config: DropboxConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            http_client: config.http_client,
            tag_reader: config.tag_reader,
            signer: config.signer,
            credentials: RwLock::new(config.credentials),
            events,
            stats: Arc::new(ScanStats::default()),
        }
    }

    /// Subscribe to service events
    pub fn subscribe(&self) -> broadcast::Receiver<ServiceEvent> {
        self.events.subscribe()
    }

    /// Whether an access token is present
    pub async fn has_credentials(&self) -> bool {
        self.credentials
            .read()
            .await
            .as_ref()
            .is_some_and(Credentials::is_complete)
    }

    /// Account name of the authenticated user, for display
    pub async fn account_name(&self) -> Option<String> {
        self.credentials
            .read()
            .await
            .as_ref()
            .map(|c| c.account_name.clone())
    }

    /// Current scan statistics
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Wait until no listing or resolution tasks are in flight.
    ///
    /// The traversal itself never joins its tasks; this is the observation
    /// point for hosts (and tests) that want to know a scan has quiesced.
    pub async fn wait_until_idle(&self) {
        self.stats.wait_until_idle().await;
    }

    /// Start scanning the account.
    ///
    /// With credentials present this spawns the root listing and returns
    /// immediately; discovery progress is visible through [`Self::stats`].
    /// Without credentials it performs no network requests, emits a single
    /// [`ServiceEvent::AuthorizationRequired`] and returns
    /// [`DropboxError::NotAuthenticated`] so the host can prompt the user.
    pub async fn connect(self: &Arc<Self>) -> Result<()> {
        if self.has_credentials().await {
            info!("Starting Dropbox scan");
            self.spawn_list_directory(String::new());
            Ok(())
        } else {
            self.events.send(ServiceEvent::AuthorizationRequired).ok();
            Err(DropboxError::NotAuthenticated)
        }
    }

    /// Accept credentials from a completed authorization flow and start
    /// scanning.
    ///
    /// Requests already in flight keep the credentials they were issued
    /// with.
    pub async fn set_credentials(self: &Arc<Self>, credentials: Credentials) {
        info!(account = %credentials.account_name, "Dropbox account connected");
        *self.credentials.write().await = Some(credentials);
        self.events.send(ServiceEvent::Connected).ok();
        self.spawn_list_directory(String::new());
    }

    /// Resolve a previously discovered path to a playable URL, on demand.
    ///
    /// Used by the playback layer at play-time. Suspends only the calling
    /// task until this request's response arrives; every other completion
    /// keeps being serviced by the runtime, so concurrent callers each get
    /// their own URL and cannot starve the traversal.
    pub async fn resolve_stream_url(&self, path: &str) -> Result<String> {
        let link = self.fetch_media_link(path).await?;
        Ok(link.url)
    }

    /// Build the authorization header from a copy of the current
    /// credentials.
    async fn authorization_header(&self) -> Result<String> {
        let credentials = self
            .credentials
            .read()
            .await
            .clone()
            .ok_or(DropboxError::NotAuthenticated)?;
        Ok(self.signer.authorization_header(&credentials)?)
    }

    /// Fan out one directory listing.
    fn spawn_list_directory(self: &Arc<Self>, path: String) {
        let service = Arc::clone(self);
        let guard = self.stats.operation_started();
        tokio::spawn(async move {
            let _guard = guard;
            match service.fetch_listing(&path).await {
                Ok(listing) => service.process_listing(listing),
                Err(e) => {
                    // One bad listing truncates its branch only; siblings
                    // and the rest of the scan continue.
                    service.stats.record_listing_failure();
                    debug!(path = %path, error = %e, "Directory listing abandoned");
                }
            }
        });
    }

    /// Classify every entry of a listing and fan out the follow-up work.
    fn process_listing(self: &Arc<Self>, listing: FolderListing) {
        self.stats.record_directory_listed();
        for entry in listing.contents {
            if entry.is_dir {
                // No visited-path guard: Dropbox paths form a proper tree.
                // A provider that aliased paths would recurse unboundedly
                // here.
                self.spawn_list_directory(entry.path);
            } else if is_supported_audio(&entry.mime_type) {
                debug!(path = %entry.path, mime_type = %entry.mime_type, "Found audio file");
                self.stats.record_audio_file_found();
                self.spawn_resolve_content(entry);
            } else {
                trace!(path = %entry.path, mime_type = %entry.mime_type, "Skipping entry");
                self.stats.record_entry_skipped();
            }
        }
    }

    /// Fan out the resolution of one discovered file.
    ///
    /// The task owns `entry`, so the filename, size and MIME type are still
    /// on hand when the media reply arrives — the reply itself carries only
    /// the URL.
    fn spawn_resolve_content(self: &Arc<Self>, entry: MetadataEntry) {
        let service = Arc::clone(self);
        let guard = self.stats.operation_started();
        tokio::spawn(async move {
            let _guard = guard;
            match service.fetch_media_link(&entry.path).await {
                Ok(link) => {
                    let resolved = ResolvedContent::from_entry(&entry, link.url);
                    service.dispatch_tags(resolved).await;
                }
                Err(e) => {
                    service.stats.record_resolution_failure();
                    debug!(path = %entry.path, error = %e, "Content resolution abandoned");
                }
            }
        });
    }

    /// Authenticated GET of one directory listing.
    #[instrument(skip(self), fields(path = %path))]
    async fn fetch_listing(&self, path: &str) -> Result<FolderListing> {
        let header = self.authorization_header().await?;
        let request =
            HttpRequest::new(HttpMethod::Get, endpoint_url(METADATA_ENDPOINT, path))
                .authorization(header);

        let response = self.http_client.execute(request).await?;
        if !response.is_success() {
            return Err(DropboxError::Api {
                status: response.status,
                message: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        serde_json::from_slice(&response.body)
            .map_err(|e| DropboxError::MalformedResponse(format!("metadata response: {}", e)))
    }

    /// Authenticated empty-bodied POST for one media link.
    #[instrument(skip(self), fields(path = %path))]
    async fn fetch_media_link(&self, path: &str) -> Result<MediaLink> {
        let header = self.authorization_header().await?;
        let request = HttpRequest::new(HttpMethod::Post, endpoint_url(MEDIA_ENDPOINT, path))
            .authorization(header);

        let response = self.http_client.execute(request).await?;
        if !response.is_success() {
            return Err(DropboxError::Api {
                status: response.status,
                message: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        serde_json::from_slice(&response.body)
            .map_err(|e| DropboxError::MalformedResponse(format!("media response: {}", e)))
    }

    /// Forward a resolved file to the host tag reader and log the outcome.
    ///
    /// Leaf sink: the result never feeds back into the traversal.
    async fn dispatch_tags(&self, resolved: ResolvedContent) {
        self.stats.record_track_dispatched();
        let outcome = self
            .tag_reader
            .read_cloud_file(
                &resolved.url,
                &resolved.filename,
                resolved.size_bytes,
                &resolved.mime_type,
            )
            .await;

        match outcome {
            Ok(tags) => {
                self.stats.record_tags_read();
                debug!(
                    filename = %resolved.filename,
                    size_bytes = resolved.size_bytes,
                    mime_type = %resolved.mime_type,
                    ?tags,
                    "Read tags for remote file"
                );
            }
            Err(e) => {
                self.stats.record_tag_failure();
                debug!(filename = %resolved.filename, error = %e, "Tag read failed");
            }
        }
    }
}

/// Join an API endpoint with a remote path, percent-encoding each segment.
fn endpoint_url(endpoint: &str, path: &str) -> String {
    let encoded = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("{}{}", endpoint, encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::http::HttpResponse;
    use bridge_traits::tags::TrackTags;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;
    use tokio::sync::broadcast::error::TryRecvError;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    mock! {
        TagReader {}

        #[async_trait]
        impl TagReader for TagReader {
            async fn read_cloud_file(
                &self,
                url: &str,
                filename: &str,
                size_bytes: u64,
                mime_type: &str,
            ) -> BridgeResult<TrackTags>;
        }
    }

    fn json_response(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: Bytes::from(body.as_bytes().to_vec()),
        }
    }

    fn credentials() -> Credentials {
        Credentials::new("token", "token_secret", "alice")
    }

    fn service(http: MockHttpClient, tags: MockTagReader) -> Arc<DropboxService> {
        let config = DropboxConfig::new(
            Arc::new(http),
            Arc::new(tags),
            RequestSigner::new("app_key", "app_secret"),
        )
        .with_credentials(credentials());
        Arc::new(DropboxService::new(config))
    }

    #[test]
    fn test_endpoint_url_root() {
        assert_eq!(endpoint_url(METADATA_ENDPOINT, ""), METADATA_ENDPOINT);
    }

    #[test]
    fn test_endpoint_url_encodes_segments() {
        assert_eq!(
            endpoint_url(MEDIA_ENDPOINT, "/My Music/a b.mp3"),
            "https://api.dropbox.com/1/media/dropbox/My%20Music/a%20b.mp3"
        );
    }

    #[tokio::test]
    async fn test_connect_without_credentials() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(0);

        let config = DropboxConfig::new(
            Arc::new(http),
            Arc::new(MockTagReader::new()),
            RequestSigner::new("app_key", "app_secret"),
        );
        let service = Arc::new(DropboxService::new(config));
        let mut events = service.subscribe();

        let result = service.connect().await;
        assert!(matches!(result, Err(DropboxError::NotAuthenticated)));

        // Exactly one signal
        assert!(matches!(
            events.try_recv(),
            Ok(ServiceEvent::AuthorizationRequired)
        ));
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_resolve_stream_url() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|req| {
                req.method == HttpMethod::Post
                    && req.url == "https://api.dropbox.com/1/media/dropbox/music/a.mp3"
                    && req.headers["Authorization"].starts_with("OAuth ")
            })
            .times(1)
            .returning(|_| Ok(json_response(r#"{"url": "https://dl.example.com/a.mp3"}"#)));

        let service = service(http, MockTagReader::new());
        let url = service.resolve_stream_url("/music/a.mp3").await.unwrap();
        assert_eq!(url, "https://dl.example.com/a.mp3");
    }

    #[tokio::test]
    async fn test_resolve_stream_url_api_error() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 401,
                headers: HashMap::new(),
                body: Bytes::from_static(b"Invalid OAuth request"),
            })
        });

        let service = service(http, MockTagReader::new());
        let result = service.resolve_stream_url("/music/a.mp3").await;
        assert!(matches!(result, Err(DropboxError::Api { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_malformed_listing_is_contained() {
        let mut http = MockHttpClient::new();
        // No "contents" key at all
        http.expect_execute()
            .times(1)
            .returning(|_| Ok(json_response(r#"{"error": "not what you expected"}"#)));

        let mut tags = MockTagReader::new();
        tags.expect_read_cloud_file().times(0);

        let service = service(http, tags);
        service.connect().await.unwrap();
        service.wait_until_idle().await;

        let stats = service.stats();
        assert_eq!(stats.listing_failures, 1);
        assert_eq!(stats.directories_listed, 0);
        assert_eq!(stats.tracks_dispatched, 0);
    }

    #[tokio::test]
    async fn test_mime_filter_drives_resolution() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|req| req.method == HttpMethod::Get)
            .times(1)
            .returning(|_| {
                Ok(json_response(
                    r#"{"contents": [
                        {"path": "/a.mp3", "is_dir": false, "mime_type": "audio/mpeg", "bytes": 1000},
                        {"path": "/b.ogg", "is_dir": false, "mime_type": "audio/ogg", "bytes": 2000},
                        {"path": "/notes.txt", "is_dir": false, "mime_type": "text/plain", "bytes": 10}
                    ]}"#,
                ))
            });
        http.expect_execute()
            .withf(|req| req.method == HttpMethod::Post)
            .times(2)
            .returning(|req| {
                assert!(req.url.starts_with("https://api.dropbox.com/1/media/dropbox/"));
                Ok(json_response(r#"{"url": "https://dl.example.com/x"}"#))
            });

        let mut tags = MockTagReader::new();
        tags.expect_read_cloud_file()
            .times(2)
            .returning(|_, _, _, _| Ok(TrackTags::default()));

        let service = service(http, tags);
        service.connect().await.unwrap();
        service.wait_until_idle().await;

        let stats = service.stats();
        assert_eq!(stats.audio_files_found, 2);
        assert_eq!(stats.entries_skipped, 1);
        assert_eq!(stats.tracks_dispatched, 2);
        assert_eq!(stats.tags_read, 2);
    }

    #[tokio::test]
    async fn test_set_credentials_starts_scan() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|req| req.url == METADATA_ENDPOINT)
            .times(1)
            .returning(|_| Ok(json_response(r#"{"contents": []}"#)));

        let config = DropboxConfig::new(
            Arc::new(http),
            Arc::new(MockTagReader::new()),
            RequestSigner::new("app_key", "app_secret"),
        );
        let service = Arc::new(DropboxService::new(config));
        let mut events = service.subscribe();

        service.set_credentials(credentials()).await;
        service.wait_until_idle().await;

        assert!(matches!(events.try_recv(), Ok(ServiceEvent::Connected)));
        assert_eq!(service.stats().directories_listed, 1);
        assert_eq!(service.account_name().await.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_tag_failure_is_logged_not_propagated() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|req| req.method == HttpMethod::Get)
            .times(1)
            .returning(|_| {
                Ok(json_response(
                    r#"{"contents": [
                        {"path": "/a.mp3", "is_dir": false, "mime_type": "audio/mpeg", "bytes": 1000}
                    ]}"#,
                ))
            });
        http.expect_execute()
            .withf(|req| req.method == HttpMethod::Post)
            .times(1)
            .returning(|_| Ok(json_response(r#"{"url": "https://dl.example.com/a.mp3"}"#)));

        let mut tags = MockTagReader::new();
        tags.expect_read_cloud_file()
            .times(1)
            .returning(|_, _, _, _| {
                Err(bridge_traits::BridgeError::OperationFailed(
                    "unreadable stream".to_string(),
                ))
            });

        let service = service(http, tags);
        service.connect().await.unwrap();
        service.wait_until_idle().await;

        let stats = service.stats();
        assert_eq!(stats.tracks_dispatched, 1);
        assert_eq!(stats.tag_failures, 1);
        assert_eq!(stats.tags_read, 0);
    }
}
