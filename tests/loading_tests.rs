mod common;

use async_trait::async_trait;
use campusmap::{
    assets::ImageData, DrawCommand, ImageLoader, LoadStage, MapError, MapEvent, RenderContext,
    Result,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

/// Records requested URLs and fails any URL it was told to
#[derive(Default)]
struct FakeLoader {
    requested: Mutex<Vec<String>>,
    failing: Option<String>,
}

impl FakeLoader {
    fn failing(url: &str) -> Self {
        Self {
            failing: Some(url.to_string()),
            ..Self::default()
        }
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageLoader for FakeLoader {
    async fn load(&self, url: &str) -> Result<ImageData> {
        self.requested.lock().unwrap().push(url.to_string());
        if self.failing.as_deref() == Some(url) {
            return Err(MapError::ImageLoad(format!("{} unreachable", url)));
        }
        Ok(ImageData {
            url: url.to_string(),
            bytes: vec![0xff, 0xd8, 0xff],
        })
    }
}

fn base_image_url(map: &mut campusmap::CampusMap) -> String {
    let mut ctx = RenderContext::new();
    map.render(&mut ctx).unwrap();
    ctx.commands()
        .iter()
        .find_map(|c| match c {
            DrawCommand::Image { url, .. } => Some(url.clone()),
            _ => None,
        })
        .unwrap()
}

/// Integration tests for the progressive base image
#[cfg(test)]
mod loading_tests {
    use super::*;
    use common::*;

    #[tokio::test]
    async fn test_low_then_full_resolution() {
        let (mut map, _) = campus_map();
        let loaded = Arc::new(AtomicUsize::new(0));
        let high = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&loaded);
        map.on("loaded", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&high);
        map.on("highresloaded", move |event| {
            assert!(matches!(event, MapEvent::HighResolutionLoaded));
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(map.load_stage(), LoadStage::Pending);
        assert_eq!(base_image_url(&mut map), "assets/map-min.jpg");

        let loader = FakeLoader::default();
        map.load_base_images(&loader).await.unwrap();

        assert_eq!(
            loader.requested(),
            vec!["assets/map-min.jpg", "assets/map.jpg"]
        );
        assert_eq!(map.load_stage(), LoadStage::HighResolution);
        assert_eq!(loaded.load(Ordering::SeqCst), 1);
        assert_eq!(high.load(Ordering::SeqCst), 1);
        assert_eq!(base_image_url(&mut map), "assets/map.jpg");

        // nothing left to fetch
        map.load_base_images(&loader).await.unwrap();
        assert_eq!(loader.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_full_resolution_keeps_low() {
        let loaded = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loaded);
        let mut map = campusmap::CampusMap::builder(config())
            .with_locations(locations())
            .with_document(document())
            .on_loaded(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        let loader = FakeLoader::failing("assets/map.jpg");
        let result = map.load_base_images(&loader).await;

        assert!(matches!(result, Err(MapError::ImageLoad(_))));
        assert_eq!(loaded.load(Ordering::SeqCst), 1);
        assert_eq!(map.load_stage(), LoadStage::LowResolution);
        assert_eq!(base_image_url(&mut map), "assets/map-min.jpg");
    }

    #[test]
    fn test_full_resolution_first_still_reports_loaded() {
        let (mut map, _) = campus_map();
        let loaded = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loaded);
        map.on("loaded", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        map.image_loaded(LoadStage::HighResolution).unwrap();
        map.image_loaded(LoadStage::LowResolution).unwrap();

        assert_eq!(loaded.load(Ordering::SeqCst), 1);
        assert_eq!(map.load_stage(), LoadStage::HighResolution);
        assert_eq!(base_image_url(&mut map), "assets/map.jpg");
    }

    #[test]
    fn test_image_loaded_is_idempotent() {
        let (mut map, _) = campus_map();
        let loaded = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loaded);
        map.on("loaded", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        map.image_loaded(LoadStage::LowResolution).unwrap();
        map.image_loaded(LoadStage::LowResolution).unwrap();
        assert_eq!(loaded.load(Ordering::SeqCst), 1);

        map.image_loaded(LoadStage::HighResolution).unwrap();
        map.image_loaded(LoadStage::LowResolution).unwrap();
        assert_eq!(map.load_stage(), LoadStage::HighResolution);
        assert_eq!(loaded.load(Ordering::SeqCst), 1);
        assert_eq!(base_image_url(&mut map), "assets/map.jpg");
    }
}
