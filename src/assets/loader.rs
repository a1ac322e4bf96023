use crate::{MapError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::time::Duration;

/// Shared async HTTP client for map assets
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent(concat!("campusmap/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(60))
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("falling back to default http client: {}", e);
            reqwest::Client::new()
        })
});

/// A fully downloaded image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub url: String,
    pub bytes: Vec<u8>,
}

/// Fetches images; completion of `load` is the image-loaded notification
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<ImageData>;
}

/// Loads images over HTTP, resolving relative paths against a base URL
#[derive(Debug, Clone, Default)]
pub struct HttpImageLoader {
    base_url: Option<String>,
}

impl HttpImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
        }
    }

    /// Absolute URL for an asset path
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        match &self.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => path.to_string(),
        }
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, url: &str) -> Result<ImageData> {
        let resolved = self.resolve(url);
        log::debug!("fetching {}", resolved);

        let response = HTTP_CLIENT.get(&resolved).send().await?;
        if !response.status().is_success() {
            return Err(MapError::ImageLoad(format!(
                "{} returned {}",
                resolved,
                response.status()
            )));
        }
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(MapError::ImageLoad(format!("{} is empty", resolved)));
        }

        Ok(ImageData {
            url: url.to_string(),
            bytes: bytes.to_vec(),
        })
    }
}
