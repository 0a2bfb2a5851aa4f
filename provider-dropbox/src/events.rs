//! Service events for the host UI

/// Events the service broadcasts to the host application.
///
/// Delivered over a `tokio::sync::broadcast` channel obtained from
/// [`DropboxService::subscribe`](crate::service::DropboxService::subscribe).
/// Slow subscribers may observe lag; events carry no payload that cannot be
/// re-derived from the service, so missing one is recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceEvent {
    /// Credentials were accepted and a scan is starting
    Connected,
    /// No credentials are present; the host should run interactive
    /// authorization and hand the result to `set_credentials`
    AuthorizationRequired,
}
