use crate::{
    core::{bounds::Bounds, geo::Point, viewport::Viewport},
    data::locations::{Location, LocationSet},
    layers::{
        base::{LayerProperties, LayerTrait, LayerType},
        style::{MarkerStyle, StyleFunction},
    },
    spatial::index::{SpatialIndex, SpatialItem},
    Result,
};

use crate::rendering::context::{DrawCommand, RenderContext};

use std::sync::Arc;

/// Point features for locations, styled per frame by a style function
pub struct VectorLayer {
    /// Base layer properties
    properties: LayerProperties,
    /// Features keyed by location id, in map coordinates
    index: SpatialIndex<Arc<Location>>,
    style: Box<dyn StyleFunction>,
    revision: u64,
}

impl VectorLayer {
    /// Create a new vector layer
    pub fn new(id: String, name: String, style: Box<dyn StyleFunction>) -> Self {
        let properties = LayerProperties::new(id, name, LayerType::Vector);

        Self {
            properties,
            index: SpatialIndex::new(),
            style,
            revision: 0,
        }
    }

    /// Add a point feature for the location at its map position
    pub fn add_location(&mut self, location: Arc<Location>) -> Result<()> {
        let item = SpatialItem::from_point(
            location.id.clone(),
            location.map_position(),
            Arc::clone(&location),
        );
        self.index.insert(item)?;
        self.revision += 1;
        Ok(())
    }

    /// Adds every top-level location of the set, in load order. Nested
    /// locations have no marker of their own.
    pub fn load_locations(&mut self, locations: &LocationSet) -> Result<usize> {
        let mut added = 0;
        for location in locations.top_level() {
            self.add_location(Arc::clone(location))?;
            added += 1;
        }
        log::info!("loaded {} of {} locations as markers", added, locations.len());
        Ok(added)
    }

    /// Marks the layer dirty so the next frame re-evaluates every style
    pub fn changed(&mut self) {
        self.revision += 1;
    }

    /// Style of a location's marker at a zoom
    pub fn style_for(&self, location: &Location, zoom: f64) -> MarkerStyle {
        self.style.style(location, zoom)
    }

    /// Locations whose marker lies in `extent`, in load order. Styling plays
    /// no part here: hidden markers are included.
    pub fn features_in_extent(&self, extent: &Bounds) -> Vec<Arc<Location>> {
        self.index
            .query(extent)
            .into_iter()
            .map(|item| Arc::clone(&item.data))
            .collect()
    }

    /// The drawn marker nearest to a screen pixel, within `hit_radius` screen
    /// pixels
    pub fn feature_at_pixel(
        &self,
        viewport: &Viewport,
        pixel: Point,
        hit_radius: f64,
    ) -> Option<Arc<Location>> {
        let coordinate = viewport.coordinate_from_pixel(pixel);
        let radius = hit_radius * viewport.resolution();
        let zoom = viewport.zoom();

        self.index
            .query_radius(&coordinate, radius)
            .into_iter()
            .find(|item| self.style.style(&item.data, zoom).is_drawn())
            .map(|item| Arc::clone(&item.data))
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Location>> {
        self.index.get(id).map(|item| &item.data)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl LayerTrait for VectorLayer {
    crate::impl_layer_trait!(VectorLayer, properties);

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        let zoom = viewport.zoom();
        let visible = viewport.extent();

        for item in self.index.query(&visible) {
            let style = self.style.style(&item.data, zoom);
            if !style.is_drawn() {
                continue;
            }

            let position = viewport.pixel_from_coordinate(item.bounds.center());
            if let Some(icon) = style.icon() {
                context.push(DrawCommand::Icon {
                    position,
                    style: icon.clone(),
                });
            }
            if let Some(text) = style.text() {
                context.push(DrawCommand::Text {
                    position,
                    style: text.clone(),
                });
            }
        }
        Ok(())
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}
