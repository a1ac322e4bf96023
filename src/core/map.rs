use crate::{
    core::{bounds::Bounds, geo::Point, viewport::Viewport},
    data::locations::Location,
    input::{EventManager, MapEvent},
    layers::{
        base::LayerTrait,
        manager::LayerManager,
        overlay::{Overlay, OverlayManager},
        vector::VectorLayer,
    },
    rendering::context::RenderContext,
    Result,
};
use std::{sync::Arc, time::Duration};

/// The map engine: a view, its layers and overlays, bound to one element of
/// the host document
pub struct Map {
    pub viewport: Viewport,
    target: String,
    layer_manager: LayerManager,
    overlays: OverlayManager,
    event_manager: EventManager,
    last_frame_time: Option<instant::Instant>,
    frame_count: u64,
}

impl Map {
    pub fn new(target: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            viewport,
            target: target.into(),
            layer_manager: LayerManager::new(),
            overlays: OverlayManager::new(),
            event_manager: EventManager::new(),
            last_frame_time: None,
            frame_count: 0,
        }
    }

    /// Id of the document element the map renders into
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        self.layer_manager.add_layer(layer)
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        self.layer_manager.remove_layer(layer_id)
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layer_manager.get_layer(layer_id)
    }

    /// A layer as its concrete type
    pub fn layer<T: 'static>(&self, layer_id: &str) -> Option<&T> {
        self.layer_manager.get_typed(layer_id)
    }

    pub fn layer_mut<T: 'static>(&mut self, layer_id: &str) -> Option<&mut T> {
        self.layer_manager.get_typed_mut(layer_id)
    }

    pub fn list_layers(&self) -> Vec<String> {
        self.layer_manager.list_layers()
    }

    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.event_manager.on(event_type, callback);
    }

    pub fn emit(&mut self, event: MapEvent) {
        self.event_manager.emit(event);
    }

    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.event_manager.process_events()
    }

    /// Map coordinate under a screen pixel
    pub fn coordinate_from_pixel(&self, pixel: Point) -> Point {
        self.viewport.coordinate_from_pixel(pixel)
    }

    pub fn pixel_from_coordinate(&self, coordinate: Point) -> Point {
        self.viewport.pixel_from_coordinate(coordinate)
    }

    fn vector_layers(&self) -> impl Iterator<Item = &VectorLayer> {
        self.layer_manager
            .list_layers()
            .into_iter()
            .filter_map(move |id| self.layer_manager.get_typed::<VectorLayer>(&id))
    }

    /// Features intersecting a map extent, layer by layer in render order and
    /// in load order within a layer
    pub fn features_in_extent(&self, extent: &Bounds) -> Vec<Arc<Location>> {
        self.vector_layers()
            .flat_map(|layer| layer.features_in_extent(extent))
            .collect()
    }

    /// The rendered feature under a screen pixel, topmost layer first
    pub fn feature_at_pixel(&self, pixel: Point, hit_radius: f64) -> Option<Arc<Location>> {
        let layers: Vec<_> = self
            .vector_layers()
            .filter(|layer| layer.is_visible())
            .collect();
        layers
            .into_iter()
            .rev()
            .find_map(|layer| layer.feature_at_pixel(&self.viewport, pixel, hit_radius))
    }

    pub fn has_feature_at_pixel(&self, pixel: Point, hit_radius: f64) -> bool {
        self.feature_at_pixel(pixel, hit_radius).is_some()
    }

    /// Places an overlay, replacing any overlay bound to the same element
    pub fn place_overlay(&mut self, overlay: Overlay) {
        log::debug!(
            "overlay {} at ({:.1}, {:.1})",
            overlay.element_id(),
            overlay.position().x,
            overlay.position().y
        );
        self.overlays.place(overlay);
    }

    pub fn overlay(&self, element_id: &str) -> Option<&Overlay> {
        self.overlays.get(element_id)
    }

    /// Advances view animations by `delta`, returning whether the view moved
    pub fn update(&mut self, delta: Duration) -> bool {
        self.viewport.update(delta)
    }

    /// Advances view animations by the wall time since the previous tick
    pub fn tick(&mut self) -> bool {
        let now = instant::Instant::now();
        let delta = self
            .last_frame_time
            .map(|last| now.duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_frame_time = Some(now);
        self.update(delta)
    }

    /// Renders all layers then overlays into `context`
    pub fn render(&mut self, context: &mut RenderContext) -> Result<()> {
        context.begin_frame()?;
        self.layer_manager.render(context, &self.viewport)?;
        self.overlays.render(context, &self.viewport);
        context.end_frame();
        self.frame_count += 1;
        Ok(())
    }

    /// Changes whenever layer content or styling changes
    pub fn revision(&self) -> u64 {
        self.layer_manager.revision()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }
}
