//! Progressive base image: a small image is shown first and the full one
//! replaces it once downloaded. Initial rendering never waits on the full
//! resolution asset.

use crate::{assets::loader::ImageLoader, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadStage {
    Pending,
    LowResolution,
    HighResolution,
}

#[derive(Debug, Clone)]
pub struct ProgressiveImage {
    low_url: String,
    high_url: String,
    stage: LoadStage,
}

impl ProgressiveImage {
    pub fn new(low_url: impl Into<String>, high_url: impl Into<String>) -> Self {
        Self {
            low_url: low_url.into(),
            high_url: high_url.into(),
            stage: LoadStage::Pending,
        }
    }

    pub fn stage(&self) -> LoadStage {
        self.stage
    }

    /// URL to fetch next, `None` once the full image is in
    pub fn next_url(&self) -> Option<&str> {
        match self.stage {
            LoadStage::Pending => Some(&self.low_url),
            LoadStage::LowResolution => Some(&self.high_url),
            LoadStage::HighResolution => None,
        }
    }

    /// URL of the best image loaded so far
    pub fn current_url(&self) -> Option<&str> {
        match self.stage {
            LoadStage::Pending => None,
            LoadStage::LowResolution => Some(&self.low_url),
            LoadStage::HighResolution => Some(&self.high_url),
        }
    }

    /// Records that `stage` finished loading. Stages never go backwards;
    /// returns whether this advanced the image.
    pub fn complete(&mut self, stage: LoadStage) -> bool {
        if stage <= self.stage {
            return false;
        }
        self.stage = stage;
        true
    }

    /// Fetches the next stage with `loader` and reports which stage arrived.
    /// The caller records it with `complete` once the image is displayed.
    pub async fn fetch_next(&self, loader: &dyn ImageLoader) -> Result<Option<LoadStage>> {
        let (url, stage) = match self.stage {
            LoadStage::Pending => (&self.low_url, LoadStage::LowResolution),
            LoadStage::LowResolution => (&self.high_url, LoadStage::HighResolution),
            LoadStage::HighResolution => return Ok(None),
        };

        let image = loader.load(url).await?;
        log::info!("loaded {} ({} bytes)", image.url, image.bytes.len());
        Ok(Some(stage))
    }
}
