//! The campus map controller.
//!
//! `CampusMap` owns the engine map, the location data and the GPS tracker and
//! mediates everything the user sees: marker selection on click, cursor
//! feedback, residence filtering, the progressive base image and following
//! the user's position.

use crate::{
    assets::{loader::ImageLoader, progressive::LoadStage, progressive::ProgressiveImage},
    core::{
        builder::CampusMapBuilder,
        config::{InteractionOptions, MapConfig},
        constants::{BASE_IMAGE_LAYER_ID, LOCATIONS_LAYER_ID},
        geo::{image_to_map, PixelPoint, Point},
        map::Map,
        viewport::Viewport,
    },
    data::locations::{Location, LocationSet},
    geolocation::{
        tracker::{Fix, GpsTracker, StartOutcome, TrackingState},
        watch::{Geolocation, Position},
    },
    input::{InputEvent, MapEvent},
    layers::{
        base::LayerTrait,
        image::{ImageLayer, ImageSource},
        overlay::Overlay,
        style::{MarkerStyler, VisibilityFlag},
        vector::VectorLayer,
    },
    platform::{Cursor, Document},
    rendering::context::RenderContext,
    MapError, Result,
};
use std::{sync::Arc, time::Duration};

/// Mutable view flags shared by the event handlers
struct ControllerState {
    tracker: GpsTracker,
    /// Read by the marker styler on every render
    residences: VisibilityFlag,
}

pub struct CampusMap {
    map: Map,
    config: MapConfig,
    locations: LocationSet,
    document: Box<dyn Document>,
    geolocation: Option<Box<dyn Geolocation>>,
    interaction: InteractionOptions,
    base_image: ProgressiveImage,
    state: ControllerState,
}

impl CampusMap {
    /// Start building a campus map for `config`
    pub fn builder(config: MapConfig) -> CampusMapBuilder {
        CampusMapBuilder::new(config)
    }

    pub(crate) fn from_builder(builder: CampusMapBuilder) -> Result<Self> {
        let CampusMapBuilder {
            config,
            locations,
            document,
            geolocation,
            view,
            interaction,
            gps_bounds,
            model,
            position_options,
            residences_visible,
            listeners,
        } = builder;

        let document =
            document.ok_or_else(|| MapError::ElementNotFound(config.map_id.clone()))?;
        if !document.has_element(&config.map_id) {
            return Err(MapError::ElementNotFound(config.map_id.clone()));
        }
        for id in [&config.marker_id, &config.user_marker_id] {
            if !document.has_element(id) {
                log::warn!("marker element {} not found", id);
            }
        }

        let viewport = Viewport::new(&view);
        let extent = viewport.projection_extent().clone();
        let mut map = Map::new(config.map_id.clone(), viewport);

        // the low resolution image shows first, the full one is swapped in
        // once downloaded
        let base = ImageLayer::new(BASE_IMAGE_LAYER_ID.to_string()).with_source(
            ImageSource::new(config.map_min_path.clone(), extent)
                .with_attributions(config.attributions.clone()),
        );
        map.add_layer(Box::new(base))?;

        let residences = VisibilityFlag::new(residences_visible);
        let styler = MarkerStyler::new(config.markers_base.clone(), residences.clone());
        let mut markers = VectorLayer::new(
            LOCATIONS_LAYER_ID.to_string(),
            "Locations".to_string(),
            Box::new(styler),
        );
        markers.set_z_index(1);
        markers.load_locations(&locations)?;
        map.add_layer(Box::new(markers))?;

        for (event_type, callback) in listeners {
            map.on(&event_type, callback);
        }

        let base_image = ProgressiveImage::new(config.map_min_path.clone(), config.map_path.clone());
        let tracker = GpsTracker::new(model, gps_bounds).with_options(position_options);

        log::info!(
            "campus map ready on #{} with {} locations",
            config.map_id,
            locations.len()
        );

        Ok(Self {
            map,
            config,
            locations,
            document,
            geolocation,
            interaction,
            base_image,
            state: ControllerState {
                tracker,
                residences,
            },
        })
    }

    /// Register a listener for map events of `event_type`
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.map.on(event_type, callback);
    }

    /// Notified whenever following starts or stops
    pub fn on_following_change<F>(&mut self, callback: F)
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.map.on("followingchange", move |event| {
            if let MapEvent::FollowingChanged { following } = event {
                callback(*following);
            }
        });
    }

    /// Dispatches one pointer event from the host
    pub fn handle_input(&mut self, event: InputEvent) -> Result<()> {
        match event {
            InputEvent::Click { position } => {
                self.handle_click(position)?;
            }
            InputEvent::PointerMove { position } => {
                self.handle_pointer_move(position)?;
            }
            InputEvent::Drag { delta } => self.handle_drag(delta),
            InputEvent::Resize { size } => self.map.viewport_mut().set_size(size),
        }
        self.map.process_events();
        Ok(())
    }

    /// Selects the first location within the click tolerance of `pixel`, or
    /// clears the selection when there is none
    fn handle_click(&mut self, pixel: Point) -> Result<Option<Arc<Location>>> {
        let extent = self
            .map
            .viewport()
            .extent_around_pixel(pixel, self.interaction.click_tolerance_px);
        let hit = self
            .map
            .layer::<VectorLayer>(LOCATIONS_LAYER_ID)
            .and_then(|layer| layer.features_in_extent(&extent).into_iter().next());

        match &hit {
            Some(location) => {
                log::debug!("click at {:?} selected {}", pixel, location.id);
                self.move_to_location(location)?;
            }
            None => {
                log::debug!("click at {:?} cleared the selection", pixel);
                let offscreen = self.interaction.offscreen_marker;
                self.move_marker(offscreen.x, offscreen.y, false, None)?;
            }
        }

        self.map.emit(MapEvent::LocationSelected {
            location: hit.clone(),
        });
        Ok(hit)
    }

    /// Shows the pointer cursor over a rendered marker, the move cursor
    /// elsewhere
    fn handle_pointer_move(&mut self, pixel: Point) -> Result<Cursor> {
        let cursor = if self
            .map
            .has_feature_at_pixel(pixel, self.interaction.hit_radius_px)
        {
            Cursor::Pointer
        } else {
            Cursor::Move
        };

        if self.document.has_element(&self.config.map_id) {
            self.document.set_cursor(&self.config.map_id, cursor)?;
        }
        Ok(cursor)
    }

    /// Manual panning overrides GPS following until tracking is restarted
    fn handle_drag(&mut self, delta: Point) {
        let viewport = self.map.viewport_mut();
        viewport.cancel_animations();
        viewport.pan(delta);

        if self.state.tracker.set_following(false) {
            log::debug!("drag stopped following the user");
            self.map.emit(MapEvent::FollowingChanged { following: false });
        }
    }

    /// Places a marker element at image pixel `(x, y)`, by default the
    /// selection marker. With `center`, the view animates to the marker and
    /// to the selection zoom.
    pub fn move_marker(
        &mut self,
        x: f64,
        y: f64,
        center: bool,
        marker_id: Option<&str>,
    ) -> Result<()> {
        let element_id = marker_id.unwrap_or(&self.config.marker_id).to_string();
        if !self.document.has_element(&element_id) {
            log::warn!("overlay element {} not found", element_id);
        }

        let position = image_to_map(x, y);
        self.map.place_overlay(Overlay::new(element_id, position));

        if center {
            let viewport = self.map.viewport_mut();
            viewport.animate_center(position);
            viewport.animate_zoom(self.interaction.selection_zoom);
        }
        Ok(())
    }

    /// Moves the selection marker to a location and centers on it
    pub fn move_to_location(&mut self, location: &Location) -> Result<()> {
        self.move_marker(location.pixel_x, location.pixel_y, true, None)
    }

    /// Shows or hides residence markers. Only styling changes.
    pub fn set_residences_visible(&mut self, visible: bool) {
        self.state.residences.set(visible);
        if let Some(layer) = self.map.layer_mut::<VectorLayer>(LOCATIONS_LAYER_ID) {
            layer.changed();
        }
    }

    pub fn residences_visible(&self) -> bool {
        self.state.residences.get()
    }

    /// Whether the host offers geolocation
    pub fn has_geolocation(&self) -> bool {
        self.geolocation
            .as_ref()
            .map(|g| g.is_available())
            .unwrap_or(false)
    }

    /// Starts following the user's position. On a host without geolocation
    /// this emits `GeolocationUnavailable` and changes nothing else.
    pub fn start_gps(&mut self) -> Result<StartOutcome> {
        let was_following = self.state.tracker.is_following();
        let outcome = self.state.tracker.start(self.geolocation.as_deref())?;

        match outcome {
            StartOutcome::Unsupported => self.map.emit(MapEvent::GeolocationUnavailable),
            StartOutcome::Started => log::info!("gps tracking started"),
            StartOutcome::Recentered(Some(pixel)) => self.move_user_marker(pixel, true)?,
            StartOutcome::Recentered(None) => {}
        }

        if !was_following && self.state.tracker.is_following() {
            self.map.emit(MapEvent::FollowingChanged { following: true });
        }
        self.map.process_events();
        Ok(outcome)
    }

    /// `start_gps`, calling `on_unsupported` when the host has no geolocation
    pub fn start_gps_or<F>(&mut self, on_unsupported: F) -> Result<StartOutcome>
    where
        F: FnOnce(),
    {
        let outcome = self.start_gps()?;
        if outcome == StartOutcome::Unsupported {
            on_unsupported();
        }
        Ok(outcome)
    }

    /// Cancels the position watch and stops following. The user marker stays
    /// at the last known position.
    pub fn stop_gps(&mut self) -> bool {
        let stopped = self.state.tracker.stop();
        if self.state.tracker.set_following(false) {
            self.map.emit(MapEvent::FollowingChanged { following: false });
        }
        self.map.process_events();
        stopped
    }

    /// Feeds one reading through the tracker. Implausible readings are
    /// dropped and yield `None`.
    pub fn handle_position(&mut self, position: &Position) -> Result<Option<Fix>> {
        let Some(fix) = self.state.tracker.accept(position) else {
            return Ok(None);
        };
        self.apply_fix(fix)?;
        self.map.process_events();
        Ok(Some(fix))
    }

    /// Applies every reading delivered since the last poll
    pub fn poll_gps(&mut self) -> Result<usize> {
        let fixes = self.state.tracker.poll();
        for fix in &fixes {
            self.apply_fix(*fix)?;
        }
        self.map.process_events();
        Ok(fixes.len())
    }

    /// Waits for the next plausible reading of the watch and applies it.
    /// `None` once no watch is running.
    pub async fn next_gps_fix(&mut self) -> Result<Option<Fix>> {
        while let Some(position) = self.state.tracker.next_reading().await {
            if let Some(fix) = self.handle_position(&position)? {
                return Ok(Some(fix));
            }
        }
        Ok(None)
    }

    fn apply_fix(&mut self, fix: Fix) -> Result<()> {
        self.move_user_marker(fix.pixel, fix.recenter)?;
        self.map.emit(MapEvent::PositionChanged { pixel: fix.pixel });
        Ok(())
    }

    fn move_user_marker(&mut self, pixel: PixelPoint, center: bool) -> Result<()> {
        let user_marker = self.config.user_marker_id.clone();
        self.move_marker(pixel.x as f64, pixel.y as f64, center, Some(&user_marker))
    }

    pub fn is_following(&self) -> bool {
        self.state.tracker.is_following()
    }

    pub fn tracking_state(&self) -> TrackingState {
        self.state.tracker.state()
    }

    /// Last accepted GPS reading in image pixels
    pub fn last_known_position(&self) -> Option<PixelPoint> {
        self.state.tracker.last_known()
    }

    /// Records that a base image stage finished loading. The first stage past
    /// `Pending` fires `Loaded`, even when the full image arrives first; the
    /// full stage swaps the image source.
    pub fn image_loaded(&mut self, stage: LoadStage) -> Result<()> {
        let previous = self.base_image.stage();
        if !self.base_image.complete(stage) {
            return Ok(());
        }

        if previous == LoadStage::Pending {
            self.map.emit(MapEvent::Loaded);
        }
        if stage == LoadStage::HighResolution {
            let extent = self
                .map
                .layer::<ImageLayer>(BASE_IMAGE_LAYER_ID)
                .and_then(|layer| layer.source())
                .map(|source| source.extent.clone())
                .unwrap_or_else(|| self.map.viewport().projection_extent().clone());
            let source = ImageSource::new(self.config.map_path.clone(), extent)
                .with_attributions(self.config.attributions.clone());
            self.map
                .layer_mut::<ImageLayer>(BASE_IMAGE_LAYER_ID)
                .ok_or_else(|| MapError::Layer(BASE_IMAGE_LAYER_ID.to_string()))?
                .set_source(source);
            log::info!("switched to the full resolution map");
            self.map.emit(MapEvent::HighResolutionLoaded);
        }
        self.map.process_events();
        Ok(())
    }

    /// Downloads the low then the full resolution base image, applying each
    /// as it arrives. A failed full resolution download leaves the low
    /// resolution image in place.
    pub async fn load_base_images(&mut self, loader: &dyn ImageLoader) -> Result<()> {
        while let Some(stage) = self.base_image.fetch_next(loader).await? {
            self.image_loaded(stage)?;
        }
        Ok(())
    }

    pub fn load_stage(&self) -> LoadStage {
        self.base_image.stage()
    }

    /// Advances view animations by `delta`
    pub fn advance(&mut self, delta: Duration) -> bool {
        self.map.update(delta)
    }

    /// Per-frame update: applies pending GPS readings and advances view
    /// animations by the elapsed wall time
    pub fn tick(&mut self) -> Result<bool> {
        let fixes = self.poll_gps()?;
        Ok(self.map.tick() || fixes > 0)
    }

    pub fn render(&mut self, context: &mut RenderContext) -> Result<()> {
        self.map.render(context)
    }

    /// Position of a marker element in map coordinates
    pub fn marker_position(&self, element_id: &str) -> Option<Point> {
        self.map.overlay(element_id).map(|o| o.position())
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }

    pub fn viewport(&self) -> &Viewport {
        self.map.viewport()
    }

    pub fn locations(&self) -> &LocationSet {
        &self.locations
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryDocument;
    use std::sync::Mutex;

    fn config() -> MapConfig {
        MapConfig::from_json(
            r#"{"mapPath": "map.jpg", "mapMinPath": "map-min.jpg", "markersBase": "/m/",
                "map_id": "map", "marker_id": "marker", "user_marker_id": "user-marker"}"#,
        )
        .unwrap()
    }

    fn campus_map(document: MemoryDocument) -> CampusMap {
        let locations = LocationSet::from_json(
            r#"[{"id": "mb", "name": "Main Building", "group_id": 1,
                 "pixel_x": 2715, "pixel_y": 1787.5}]"#,
        )
        .unwrap();
        CampusMap::builder(config())
            .with_locations(locations)
            .with_document(document)
            .build()
            .unwrap()
    }

    #[test]
    fn test_pointer_move_sets_cursor() {
        let document = MemoryDocument::with_elements(["map", "marker", "user-marker"]);
        let mut map = campus_map(document.clone());

        map.handle_input(InputEvent::PointerMove {
            position: Point::new(400.0, 300.0),
        })
        .unwrap();
        assert_eq!(document.cursor("map"), Some(Cursor::Pointer));

        map.handle_input(InputEvent::PointerMove {
            position: Point::new(20.0, 20.0),
        })
        .unwrap();
        assert_eq!(document.cursor("map"), Some(Cursor::Move));
    }

    #[test]
    fn test_move_marker_flips_y() {
        let document = MemoryDocument::with_elements(["map", "marker", "user-marker"]);
        let mut map = campus_map(document);

        map.move_marker(120.0, 575.0, false, None).unwrap();
        assert_eq!(map.marker_position("marker"), Some(Point::new(120.0, 3000.0)));
        assert!(!map.viewport().is_animating());

        map.move_marker(120.0, 575.0, true, Some("user-marker")).unwrap();
        assert_eq!(
            map.marker_position("user-marker"),
            Some(Point::new(120.0, 3000.0))
        );
        assert_eq!(map.viewport().animations().len(), 2);
    }

    #[test]
    fn test_residence_toggle_only_restyles() {
        let document = MemoryDocument::with_elements(["map", "marker", "user-marker"]);
        let mut map = campus_map(document);
        let center = map.viewport().center();
        let revision = map.map().revision();

        map.set_residences_visible(true);
        assert!(map.residences_visible());
        assert!(map.map().revision() > revision);
        assert_eq!(map.viewport().center(), center);
        assert!(!map.viewport().is_animating());
    }

    #[test]
    fn test_gps_unsupported_without_geolocation() {
        let document = MemoryDocument::with_elements(["map", "marker", "user-marker"]);
        let mut map = campus_map(document);
        let called = Arc::new(Mutex::new(false));

        let flag = Arc::clone(&called);
        let outcome = map
            .start_gps_or(move || *flag.lock().unwrap() = true)
            .unwrap();
        assert_eq!(outcome, StartOutcome::Unsupported);
        assert!(*called.lock().unwrap());
        assert!(!map.is_following());
        assert_eq!(map.tracking_state(), TrackingState::Unstarted);
    }
}
