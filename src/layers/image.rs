use crate::{
    core::{bounds::Bounds, viewport::Viewport},
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::context::{DrawCommand, RenderContext},
    Result,
};

/// A static image stretched over a map extent
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSource {
    pub url: String,
    pub attributions: String,
    pub extent: Bounds,
}

impl ImageSource {
    pub fn new(url: impl Into<String>, extent: Bounds) -> Self {
        Self {
            url: url.into(),
            attributions: String::new(),
            extent,
        }
    }

    pub fn with_attributions(mut self, attributions: impl Into<String>) -> Self {
        self.attributions = attributions.into();
        self
    }
}

/// Layer showing a single static image. The source can be swapped at any
/// time, which is how the low resolution base map gives way to the full one.
pub struct ImageLayer {
    properties: LayerProperties,
    source: Option<ImageSource>,
    revision: u64,
}

impl ImageLayer {
    pub fn new(id: String) -> Self {
        let properties = LayerProperties::new(id, "Image Layer".to_string(), LayerType::Image);
        Self {
            properties,
            source: None,
            revision: 0,
        }
    }

    pub fn with_source(mut self, source: ImageSource) -> Self {
        self.set_source(source);
        self
    }

    pub fn source(&self) -> Option<&ImageSource> {
        self.source.as_ref()
    }

    pub fn set_source(&mut self, source: ImageSource) {
        log::debug!("layer {} now shows {}", self.properties.id, source.url);
        self.source = Some(source);
        self.revision += 1;
    }
}

impl LayerTrait for ImageLayer {
    crate::impl_layer_trait!(ImageLayer, properties);

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        let Some(source) = &self.source else {
            return Ok(());
        };
        if !source.extent.intersects(&viewport.extent()) {
            return Ok(());
        }

        let rect = Bounds::from_corners(
            viewport.pixel_from_coordinate(source.extent.min),
            viewport.pixel_from_coordinate(source.extent.max),
        );
        context.push(DrawCommand::Image {
            url: source.url.clone(),
            attributions: source.attributions.clone(),
            rect,
            opacity: self.properties.opacity,
        });
        Ok(())
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;

    #[test]
    fn test_render_without_source_is_empty() {
        let mut layer = ImageLayer::new("base".to_string());
        let mut ctx = RenderContext::new();
        ctx.begin_frame().unwrap();
        layer.render(&mut ctx, &Viewport::default()).unwrap();
        assert!(ctx.commands().is_empty());
    }

    #[test]
    fn test_render_covers_extent() {
        let viewport = Viewport::default();
        let extent = viewport.projection_extent().clone();
        let mut layer = ImageLayer::new("base".to_string())
            .with_source(ImageSource::new("map-min.jpg", extent.clone()).with_attributions("IITB"));
        layer.set_opacity(1.5);

        let mut ctx = RenderContext::new();
        ctx.begin_frame().unwrap();
        layer.render(&mut ctx, &viewport).unwrap();

        match &ctx.commands()[0] {
            DrawCommand::Image {
                url,
                attributions,
                rect,
                opacity,
            } => {
                assert_eq!(url, "map-min.jpg");
                assert_eq!(attributions, "IITB");
                assert_eq!(*opacity, 1.0);
                let scale = 1.0 / viewport.resolution();
                assert!((rect.width() - extent.width() * scale).abs() < 1e-6);
                assert!(rect.center().distance_to(&Point::new(400.0, 300.0)) < 1e-6);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_swap_source_bumps_revision() {
        let mut layer = ImageLayer::new("base".to_string());
        let extent = Bounds::from_coords(0.0, 0.0, 5430.0, 3575.0);
        layer.set_source(ImageSource::new("min.jpg", extent.clone()));
        layer.set_source(ImageSource::new("full.jpg", extent));
        assert_eq!(layer.revision(), 2);
        assert_eq!(layer.source().unwrap().url, "full.jpg");
    }
}
