//! # Animal Image Module
//!
//! Fetches random animal pictures from the public cat and dog image-search
//! APIs. [`HttpImageFetcher`] performs a single request per source and
//! [`AnimalImageProvider`] walks the fallback chain:
//!
//! 1. cat API (when a cat is preferred)
//! 2. dog API
//! 3. a textual apology
//!
//! Neither type ever returns an error to its caller. Fetch problems are
//! [`FetchResult::Failure`] values and the provider always yields an
//! [`AnimalReply`].

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::config::ImageSource;
use crate::localization::LocalizationManager;

/// Outcome of one fetch attempt against one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Success(String),
    Failure(String),
}

/// A reply produced by the fallback chain
///
/// `image_url` is present only when one of the sources produced a usable URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalReply {
    pub image_url: Option<String>,
    pub caption: String,
}

/// Retrieves one image URL from an image source
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, source: &ImageSource) -> FetchResult;
}

/// One element of the image-search response array
#[derive(Debug, Deserialize)]
struct ImageRecord {
    url: Option<String>,
}

/// [`ImageFetcher`] backed by a shared `reqwest` client
#[derive(Debug, Clone, Default)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn request_url(&self, source: &ImageSource) -> Result<String, String> {
        let response = self
            .client
            .get(&source.endpoint)
            .timeout(source.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    format!("request timed out after {:?}", source.timeout)
                } else {
                    format!("request failed: {e}")
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("unexpected status {status}"));
        }

        let records = response
            .json::<Vec<ImageRecord>>()
            .await
            .map_err(|e| format!("malformed response body: {e}"))?;

        records
            .into_iter()
            .next()
            .and_then(|record| record.url)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| "response carries no image url".to_string())
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, source: &ImageSource) -> FetchResult {
        debug!(source = %source.label, endpoint = %source.endpoint, "Requesting image");

        match self.request_url(source).await {
            Ok(url) => {
                debug!(source = %source.label, url = %url, "Image source answered");
                FetchResult::Success(url)
            }
            Err(reason) => {
                warn!(source = %source.label, reason = %reason, "Image fetch failed");
                FetchResult::Failure(reason)
            }
        }
    }
}

/// Walks the cat → dog → apology fallback chain
pub struct AnimalImageProvider {
    fetcher: Arc<dyn ImageFetcher>,
    cat_source: ImageSource,
    dog_source: ImageSource,
    messages: Arc<LocalizationManager>,
}

impl AnimalImageProvider {
    pub fn new(
        fetcher: Arc<dyn ImageFetcher>,
        cat_source: ImageSource,
        dog_source: ImageSource,
        messages: Arc<LocalizationManager>,
    ) -> Self {
        Self {
            fetcher,
            cat_source,
            dog_source,
            messages,
        }
    }

    /// Fetch an animal picture, preferring a cat
    pub async fn get_random_image(&self) -> AnimalReply {
        self.get_image(true).await
    }

    /// Fetch an animal picture
    ///
    /// With `prefer_cat` the cat source is tried first; the dog source is only
    /// contacted when the cat source fails. A panic anywhere in the chain is
    /// caught and reported as a generic apology.
    pub async fn get_image(&self, prefer_cat: bool) -> AnimalReply {
        match AssertUnwindSafe(self.run_chain(prefer_cat)).catch_unwind().await {
            Ok(reply) => reply,
            Err(panic) => {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(prefer_cat, panic = %detail, "Unexpected failure while fetching animal image");
                AnimalReply {
                    image_url: None,
                    caption: self.messages.t("caption-unexpected-error"),
                }
            }
        }
    }

    async fn run_chain(&self, prefer_cat: bool) -> AnimalReply {
        if prefer_cat {
            if let FetchResult::Success(url) = self.fetcher.fetch(&self.cat_source).await {
                info!(source = %self.cat_source.label, "Cat image found");
                return AnimalReply {
                    image_url: Some(url),
                    caption: self.messages.t("caption-cat"),
                };
            }
        }

        if let FetchResult::Success(url) = self.fetcher.fetch(&self.dog_source).await {
            info!(source = %self.dog_source.label, "Dog image found instead of a cat");
            return AnimalReply {
                image_url: Some(url),
                caption: self.messages.t("caption-dog-fallback"),
            };
        }

        error!("Neither cat nor dog image could be fetched");
        AnimalReply {
            image_url: None,
            caption: self.messages.t("caption-no-animals"),
        }
    }
}
