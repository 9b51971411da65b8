//! Byte acquisition for bundles and realtime payloads: HTTP with strict
//! timeouts and body caps, or a local file read. Both paths terminate in a
//! plain byte buffer.

use std::{
    collections::HashMap, error::Error, fmt, path::Path, sync::OnceLock,
    time::Duration,
};

use futures::StreamExt;
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;

/// Hard cap on a static bundle body.
pub const STATIC_BODY_LIMIT: u64 = 200 * 1024 * 1024;

/// Hard cap on a single realtime payload body.
pub const REALTIME_BODY_LIMIT: u64 = 25 * 1024 * 1024;

#[derive(Debug)]
pub enum FetchError {
    /// Network-level failure; retried on the next tick.
    Transient(Box<dyn Error + Send + Sync>),
    Status(StatusCode),
    BodyTooLarge { limit: u64 },
    Cancelled,
}

impl FetchError {
    fn transient<E: Error + Send + Sync + 'static>(why: E) -> Self {
        Self::Transient(Box::new(why))
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient(why) => write!(f, "fetch failed: {}", why),
            Self::Status(status) => write!(f, "unexpected status {}", status),
            Self::BodyTooLarge { limit } => {
                write!(f, "body exceeds the {} byte limit", limit)
            }
            Self::Cancelled => write!(f, "fetch cancelled"),
        }
    }
}

impl Error for FetchError {}

/// Process-wide client for static bundle downloads. Bundles are large and
/// rare, so the overall deadline is generous.
pub fn static_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(5 * 60))
            .connect_timeout(Duration::from_secs(10))
            .read_timeout(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .expect("default static http client")
    })
}

/// Process-wide client for realtime polls; every request is bounded to ten
/// seconds. Client state is immutable after construction, so sharing one
/// across all feed tasks is safe.
pub fn realtime_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .expect("default realtime http client")
    })
}

/// GETs `url` with the given headers, streaming the body up to `limit`
/// bytes. Reading `limit + 1` is what detects oversized bodies, so the cap
/// is exact rather than probabilistic.
pub async fn fetch_bytes(
    client: &reqwest::Client,
    url: &str,
    headers: &HashMap<String, String>,
    limit: u64,
    cancel: &CancellationToken,
) -> Result<Vec<u8>, FetchError> {
    let mut request = client.get(url);
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }

    let response = tokio::select! {
        _ = cancel.cancelled() => return Err(FetchError::Cancelled),
        response = request.send() => response.map_err(FetchError::transient)?,
    };
    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    let mut body: Vec<u8> = Vec::new();
    let mut stream = response.bytes_stream();
    loop {
        let chunk = tokio::select! {
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            chunk = stream.next() => chunk,
        };
        match chunk {
            Some(Ok(chunk)) => {
                body.extend_from_slice(&chunk);
                if body.len() as u64 > limit {
                    return Err(FetchError::BodyTooLarge { limit });
                }
            }
            Some(Err(why)) => return Err(FetchError::transient(why)),
            None => break,
        }
    }
    Ok(body)
}

/// Whether a configured source names a remote bundle rather than a local
/// file.
pub fn is_remote_source(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Acquires the static bundle: remote sources go through the capped HTTP
/// path with the configured auth header, local sources are read whole.
pub async fn acquire_static_bundle(
    source: &str,
    headers: &HashMap<String, String>,
    cancel: &CancellationToken,
) -> Result<Vec<u8>, FetchError> {
    if is_remote_source(source) {
        fetch_bytes(static_client(), source, headers, STATIC_BODY_LIMIT, cancel)
            .await
    } else {
        tokio::select! {
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            bytes = tokio::fs::read(Path::new(source)) => {
                bytes.map_err(FetchError::transient)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_sources_are_recognized_by_scheme() {
        assert!(is_remote_source("https://example.com/gtfs.zip"));
        assert!(is_remote_source("http://example.com/gtfs.zip"));
        assert!(!is_remote_source("/var/data/gtfs.zip"));
        assert!(!is_remote_source("relative/gtfs.zip"));
    }

    #[tokio::test]
    async fn local_bundle_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.zip");
        tokio::fs::write(&path, b"zip bytes").await.unwrap();

        let bytes = acquire_static_bundle(
            path.to_str().unwrap(),
            &HashMap::new(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(bytes, b"zip bytes");
    }

    #[tokio::test]
    async fn missing_local_bundle_is_transient() {
        let result = acquire_static_bundle(
            "/definitely/not/here.zip",
            &HashMap::new(),
            &CancellationToken::new(),
        )
        .await;
        assert!(matches!(result, Err(FetchError::Transient(_))));
    }

    #[tokio::test]
    async fn cancelled_token_aborts_before_io() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = fetch_bytes(
            realtime_client(),
            "http://192.0.2.1/feed.pb",
            &HashMap::new(),
            REALTIME_BODY_LIMIT,
            &cancel,
        )
        .await;
        assert!(matches!(result, Err(FetchError::Cancelled)));
    }
}
