//! Marker styling.
//!
//! A marker's look depends on its location and on the current zoom, so it is
//! recomputed on every frame. The result is a closed descriptor: nothing at
//! all, an empty style, an icon, a label, or both.

use crate::{
    core::constants::{ICON_MIN_ZOOM, LABEL_FONT_SCALE, LABEL_MIN_ZOOM},
    data::locations::Location,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Marker dot colors, picked by group classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconColor {
    Blue,
    Green,
    Yellow,
    Gray,
}

impl IconColor {
    pub fn for_group(group_id: i32) -> Self {
        match group_id {
            1 | 4 | 12 => IconColor::Blue,
            3 => IconColor::Green,
            2 => IconColor::Yellow,
            _ => IconColor::Gray,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IconColor::Blue => "blue",
            IconColor::Green => "green",
            IconColor::Yellow => "yellow",
            IconColor::Gray => "gray",
        }
    }
}

impl std::fmt::Display for IconColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconStyle {
    pub src: String,
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub text: String,
    pub font_size: f64,
    /// CSS font shorthand, e.g. `12px Roboto`
    pub font: String,
    pub offset_y: f64,
    pub padding: [f64; 4],
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

/// Style of one marker at one zoom
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerStyle {
    /// The feature is not styled at all
    Hidden,
    /// Styled, but neither icon nor label applies at this zoom
    Empty,
    Icon(IconStyle),
    Text(TextStyle),
    IconAndText(IconStyle, TextStyle),
}

impl MarkerStyle {
    pub fn from_parts(icon: Option<IconStyle>, text: Option<TextStyle>) -> Self {
        match (icon, text) {
            (None, None) => MarkerStyle::Empty,
            (Some(icon), None) => MarkerStyle::Icon(icon),
            (None, Some(text)) => MarkerStyle::Text(text),
            (Some(icon), Some(text)) => MarkerStyle::IconAndText(icon, text),
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, MarkerStyle::Hidden)
    }

    /// Whether anything is painted for the marker
    pub fn is_drawn(&self) -> bool {
        self.icon().is_some() || self.text().is_some()
    }

    pub fn icon(&self) -> Option<&IconStyle> {
        match self {
            MarkerStyle::Icon(icon) | MarkerStyle::IconAndText(icon, _) => Some(icon),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&TextStyle> {
        match self {
            MarkerStyle::Text(text) | MarkerStyle::IconAndText(_, text) => Some(text),
            _ => None,
        }
    }
}

/// Computes the style of a location's marker at a zoom level
pub trait StyleFunction: Send + Sync {
    fn style(&self, location: &Location, zoom: f64) -> MarkerStyle;
}

impl<F> StyleFunction for F
where
    F: Fn(&Location, f64) -> MarkerStyle + Send + Sync,
{
    fn style(&self, location: &Location, zoom: f64) -> MarkerStyle {
        self(location, zoom)
    }
}

/// Shared on/off switch, read by the styler at render time
#[derive(Debug, Clone, Default)]
pub struct VisibilityFlag(Arc<AtomicBool>);

impl VisibilityFlag {
    pub fn new(visible: bool) -> Self {
        Self(Arc::new(AtomicBool::new(visible)))
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, visible: bool) {
        self.0.store(visible, Ordering::Relaxed);
    }
}

/// Campus marker style: colored dots from zoom 3, labels from zoom 4, and
/// residences only while the residence switch is on.
pub fn select_marker_style(
    location: &Location,
    zoom: f64,
    residences_visible: bool,
    markers_base: &str,
) -> MarkerStyle {
    if location.is_residence() && !residences_visible {
        return MarkerStyle::Hidden;
    }

    let icon = (zoom >= ICON_MIN_ZOOM).then(|| IconStyle {
        src: format!(
            "{}marker_dot_{}.png",
            markers_base,
            IconColor::for_group(location.group_id)
        ),
        scale: 0.2,
    });

    let text = (zoom >= LABEL_MIN_ZOOM).then(|| {
        let font_size = zoom * LABEL_FONT_SCALE;
        TextStyle {
            text: location.label().to_string(),
            font_size,
            font: format!("{}px Roboto", font_size),
            offset_y: 20.0,
            padding: [20.0; 4],
            fill: "#ffffff".to_string(),
            stroke: "#444".to_string(),
            stroke_width: 3.0,
        }
    });

    MarkerStyle::from_parts(icon, text)
}

/// The campus marker styler bound to its asset base and residence switch
#[derive(Debug, Clone)]
pub struct MarkerStyler {
    markers_base: String,
    residences: VisibilityFlag,
}

impl MarkerStyler {
    pub fn new(markers_base: impl Into<String>, residences: VisibilityFlag) -> Self {
        Self {
            markers_base: markers_base.into(),
            residences,
        }
    }
}

impl StyleFunction for MarkerStyler {
    fn style(&self, location: &Location, zoom: f64) -> MarkerStyle {
        select_marker_style(location, zoom, self.residences.get(), &self.markers_base)
    }
}
