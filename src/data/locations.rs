use crate::{
    core::{
        constants::{NO_SHORT_NAME, RESIDENCE_GROUP},
        geo::{image_to_map, Point},
    },
    prelude::HashMap,
    Result,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// A point of interest on the campus map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    /// Abbreviation; `"0"` is used by the data source to mean "none"
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Set for locations nested inside another; those are not drawn as markers
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub parent_relation: Option<String>,
    /// Classifier driving icon color and residence filtering
    pub group_id: i32,
    /// Position in image pixels, y counted from the top edge
    #[serde(deserialize_with = "number_or_string")]
    pub pixel_x: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub pixel_y: f64,
    #[serde(default, deserialize_with = "number_or_string")]
    pub lat: f64,
    #[serde(default, deserialize_with = "number_or_string")]
    pub lng: f64,
    #[serde(default)]
    pub reusable: bool,
}

impl Location {
    /// Whether this location lives inside a parent location
    pub fn is_nested(&self) -> bool {
        self.parent.is_some()
    }

    pub fn is_residence(&self) -> bool {
        self.group_id == RESIDENCE_GROUP
    }

    /// Text shown next to the marker: the short name when there is a real one
    pub fn label(&self) -> &str {
        match self.short_name.as_deref() {
            Some(short) if short != NO_SHORT_NAME => short,
            _ => &self.name,
        }
    }

    /// Position in engine map coordinates
    pub fn map_position(&self) -> Point {
        image_to_map(self.pixel_x, self.pixel_y)
    }
}

/// Some data exports quote coordinates; accept both forms.
fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// All locations known to the map, in load order, indexed by id
#[derive(Debug, Clone, Default)]
pub struct LocationSet {
    locations: Vec<Arc<Location>>,
    by_id: HashMap<String, usize>,
}

impl LocationSet {
    pub fn new(locations: Vec<Location>) -> Self {
        let mut set = Self::default();
        for location in locations {
            set.insert(location);
        }
        set
    }

    /// Parses a JSON array of locations
    pub fn from_json(json: &str) -> Result<Self> {
        let locations: Vec<Location> = serde_json::from_str(json)?;
        Ok(Self::new(locations))
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let locations: Vec<Location> = serde_json::from_reader(reader)?;
        Ok(Self::new(locations))
    }

    fn insert(&mut self, location: Location) {
        if self.by_id.contains_key(&location.id) {
            log::warn!("duplicate location id {}, keeping the first", location.id);
            return;
        }
        self.by_id.insert(location.id.clone(), self.locations.len());
        self.locations.push(Arc::new(location));
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Location>> {
        self.by_id.get(id).map(|&index| &self.locations[index])
    }

    /// Locations drawn as markers: those without a parent
    pub fn top_level(&self) -> impl Iterator<Item = &Arc<Location>> {
        self.locations.iter().filter(|l| !l.is_nested())
    }

    /// Locations nested inside `parent_id`
    pub fn children_of<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a Arc<Location>> {
        self.locations
            .iter()
            .filter(move |l| l.parent.as_deref() == Some(parent_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Location>> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
