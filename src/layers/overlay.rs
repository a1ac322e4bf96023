use crate::{
    core::{geo::Point, viewport::Viewport},
    prelude::HashMap,
    rendering::context::{DrawCommand, RenderContext},
};

/// A document element pinned to a map coordinate. The element is anchored
/// at its bottom center.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    element_id: String,
    position: Point,
}

impl Overlay {
    pub fn new(element_id: impl Into<String>, position: Point) -> Self {
        Self {
            element_id: element_id.into(),
            position,
        }
    }

    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// Position in map coordinates
    pub fn position(&self) -> Point {
        self.position
    }

    /// Screen position of the element anchor
    pub fn screen_position(&self, viewport: &Viewport) -> Point {
        viewport.pixel_from_coordinate(self.position)
    }
}

/// Overlays keyed by element: placing an element again moves it
#[derive(Debug, Default)]
pub struct OverlayManager {
    overlays: HashMap<String, Overlay>,
    order: Vec<String>,
}

impl OverlayManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the overlay, replacing any overlay bound to the same element
    pub fn place(&mut self, overlay: Overlay) {
        let id = overlay.element_id.clone();
        if self.overlays.insert(id.clone(), overlay).is_none() {
            self.order.push(id);
        }
    }

    pub fn get(&self, element_id: &str) -> Option<&Overlay> {
        self.overlays.get(element_id)
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn render(&self, context: &mut RenderContext, viewport: &Viewport) {
        for id in &self.order {
            if let Some(overlay) = self.overlays.get(id) {
                context.push(DrawCommand::Overlay {
                    element_id: overlay.element_id.clone(),
                    position: overlay.screen_position(viewport),
                });
            }
        }
    }
}
