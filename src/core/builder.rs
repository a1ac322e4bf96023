//! Campus map builder for fluent configuration
//!
//! Collects the configuration, the location data and the host collaborators
//! (document, geolocation) and assembles a `CampusMap` from them.

use crate::{
    controller::CampusMap,
    core::{
        config::{GpsBounds, InteractionOptions, MapConfig, ViewOptions},
        geo::Point,
    },
    data::locations::{Location, LocationSet},
    geolocation::{
        model::CoordinateModel,
        watch::{Geolocation, PositionOptions},
    },
    input::{EventCallback, MapEvent},
    platform::Document,
    Result,
};

/// Builder for creating and configuring `CampusMap` instances
pub struct CampusMapBuilder {
    pub(crate) config: MapConfig,
    pub(crate) locations: LocationSet,
    pub(crate) document: Option<Box<dyn Document>>,
    pub(crate) geolocation: Option<Box<dyn Geolocation>>,
    pub(crate) view: ViewOptions,
    pub(crate) interaction: InteractionOptions,
    pub(crate) gps_bounds: GpsBounds,
    pub(crate) model: CoordinateModel,
    pub(crate) position_options: PositionOptions,
    pub(crate) residences_visible: bool,
    /// Listeners registered before the map exists, by event type
    pub(crate) listeners: Vec<(String, EventCallback)>,
}

impl CampusMapBuilder {
    /// Create a new builder for `config` with default view and interaction
    /// settings
    pub fn new(config: MapConfig) -> Self {
        Self {
            config,
            locations: LocationSet::default(),
            document: None,
            geolocation: None,
            view: ViewOptions::default(),
            interaction: InteractionOptions::default(),
            gps_bounds: GpsBounds::default(),
            model: CoordinateModel::campus(),
            position_options: PositionOptions::default(),
            residences_visible: false,
            listeners: Vec::new(),
        }
    }

    /// Set the locations shown as markers
    pub fn with_locations(mut self, locations: LocationSet) -> Self {
        self.locations = locations;
        self
    }

    /// Set the host document the map mounts into
    pub fn with_document(mut self, document: impl Document + 'static) -> Self {
        self.document = Some(Box::new(document));
        self
    }

    /// Set the geolocation capability. Without one, GPS tracking reports
    /// itself unsupported.
    pub fn with_geolocation(mut self, geolocation: impl Geolocation + 'static) -> Self {
        self.geolocation = Some(Box::new(geolocation));
        self
    }

    pub fn with_view_options(mut self, view: ViewOptions) -> Self {
        self.view = view;
        self
    }

    /// Set the screen size of the map element
    pub fn with_size(mut self, size: Point) -> Self {
        self.view.size = size;
        self
    }

    pub fn with_interaction(mut self, interaction: InteractionOptions) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn with_gps_bounds(mut self, bounds: GpsBounds) -> Self {
        self.gps_bounds = bounds;
        self
    }

    pub fn with_coordinate_model(mut self, model: CoordinateModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_position_options(mut self, options: PositionOptions) -> Self {
        self.position_options = options;
        self
    }

    /// Whether residence markers start out visible
    pub fn with_residences_visible(mut self, visible: bool) -> Self {
        self.residences_visible = visible;
        self
    }

    /// Register a raw event listener
    pub fn on<F>(mut self, event_type: &str, callback: F) -> Self
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .push((event_type.to_string(), Box::new(callback)));
        self
    }

    /// Called on every click with the selected location, or `None` when the
    /// click cleared the selection
    pub fn on_select<F>(self, callback: F) -> Self
    where
        F: Fn(Option<&Location>) + Send + Sync + 'static,
    {
        self.on("select", move |event| {
            if let MapEvent::LocationSelected { location } = event {
                callback(location.as_deref());
            }
        })
    }

    /// Called once the low resolution base image is showing
    pub fn on_loaded<F>(self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on("loaded", move |_| callback())
    }

    /// Called whenever the view starts or stops following the GPS position
    pub fn on_following_change<F>(self, callback: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.on("followingchange", move |event| {
            if let MapEvent::FollowingChanged { following } = event {
                callback(*following);
            }
        })
    }

    /// Called when GPS tracking is requested but unsupported
    pub fn on_gps_unsupported<F>(self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on("geolocationunavailable", move |_| callback())
    }

    /// Build the map. Fails when the document has no element for the map
    /// target.
    pub fn build(self) -> Result<CampusMap> {
        CampusMap::from_builder(self)
    }
}
