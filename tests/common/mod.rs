#![allow(dead_code)]

use campusmap::{
    geolocation::AxisModel, CampusMap, ChannelGeolocation, CoordinateModel, LatLng, LocationSet,
    MapConfig, MemoryDocument,
};
use std::sync::{Arc, Mutex};

pub const LOCATIONS: &str = r#"[
    {"id": "lhc", "name": "Lecture Hall Complex", "short_name": "LHC",
     "description": "Lecture halls", "parent": null, "group_id": 1,
     "pixel_x": 2715, "pixel_y": 1787.5, "lat": 19.1310, "lng": 72.9160},
    {"id": "lhc-101", "name": "LH 101", "short_name": "0",
     "parent": "lhc", "parent_relation": "inside", "group_id": 1,
     "pixel_x": 2715, "pixel_y": 1787.5},
    {"id": "h1", "name": "Hostel 1", "short_name": "H1", "parent": null, "group_id": 3,
     "pixel_x": "2745", "pixel_y": "1787.5"},
    {"id": "gate", "name": "Main Gate", "short_name": "0", "parent": null, "group_id": 2,
     "pixel_x": 1000, "pixel_y": 1000}
]"#;

pub fn config() -> MapConfig {
    MapConfig::from_json(
        r#"{
            "mapPath": "assets/map.jpg",
            "mapMinPath": "assets/map-min.jpg",
            "markersBase": "/assets/map/",
            "attributions": "Campus cartography",
            "map_id": "map",
            "marker_id": "marker",
            "user_marker_id": "user-marker"
        }"#,
    )
    .unwrap()
}

pub fn document() -> MemoryDocument {
    MemoryDocument::with_elements(["map", "marker", "user-marker"])
}

pub fn locations() -> LocationSet {
    LocationSet::from_json(LOCATIONS).unwrap()
}

/// A model that maps latitude to pixel x and longitude to pixel y, so tests
/// can aim readings at exact pixels
pub fn identity_model() -> CoordinateModel {
    let mut x_weights = [0.0; 9];
    x_weights[1] = 1.0;
    let mut y_weights = [0.0; 9];
    y_weights[2] = 1.0;
    CoordinateModel {
        origin: LatLng::new(0.0, 0.0),
        scale: 1.0,
        x_axis: AxisModel {
            base: 0.0,
            weights: x_weights,
        },
        y_axis: AxisModel {
            base: 0.0,
            weights: y_weights,
        },
    }
}

/// Ids passed to the selection callback, `None` for cleared selections
pub type Selections = Arc<Mutex<Vec<Option<String>>>>;

pub fn campus_map() -> (CampusMap, Selections) {
    let selections: Selections = Arc::default();
    let sink = Arc::clone(&selections);
    let map = CampusMap::builder(config())
        .with_locations(locations())
        .with_document(document())
        .on_select(move |location| {
            sink.lock()
                .unwrap()
                .push(location.map(|l| l.id.clone()));
        })
        .build()
        .unwrap();
    (map, selections)
}

pub fn tracked_map() -> (CampusMap, ChannelGeolocation) {
    let geolocation = ChannelGeolocation::new();
    let map = CampusMap::builder(config())
        .with_locations(locations())
        .with_document(document())
        .with_geolocation(geolocation.clone())
        .with_coordinate_model(identity_model())
        .build()
        .unwrap();
    (map, geolocation)
}
