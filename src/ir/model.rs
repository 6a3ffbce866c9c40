//! Core page model for the panink intermediate representation.
//!
//! This module defines the canonical format-agnostic representation of a
//! captured handwritten page. All format-specific readers convert to this
//! IR, and all writers convert from it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A heterogeneous metadata value.
///
/// Source formats carry scalar metadata of mixed types (strings, integers,
/// booleans, decimals); this enum preserves them without stringification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Bool(value)
    }
}

impl From<i32> for MetaValue {
    fn from(value: i32) -> Self {
        MetaValue::Int(value as i64)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        MetaValue::Int(value)
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        MetaValue::Float(value)
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Str(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Str(value)
    }
}

impl MetaValue {
    /// Returns the integer value, if this is an integer.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            MetaValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string value, if this is a string.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Str(value) => Some(value),
            _ => None,
        }
    }
}

/// A string-keyed scalar metadata map.
pub type Metadata = BTreeMap<String, MetaValue>;

/// The pen event a sample point belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DotKind {
    Down,
    #[default]
    Move,
    Up,
}

impl DotKind {
    /// Parses a dot kind case-insensitively, as used by the interchange
    /// JSON schema.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("down") {
            Some(DotKind::Down)
        } else if raw.eq_ignore_ascii_case("move") {
            Some(DotKind::Move)
        } else if raw.eq_ignore_ascii_case("up") {
            Some(DotKind::Up)
        } else {
            None
        }
    }
}

/// An advisory capture-quality classification detected after decoding.
///
/// At most one classification is recorded per page; it never makes a
/// decode fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaptureError {
    /// Two strokes' dot bounding boxes intersect.
    StrokeOverlap,
    /// A dot lies outside the full page rectangle.
    OutOfBounds,
    /// A dot lies inside the page but outside the content rectangle.
    MarginNotRespected,
}

/// One timestamped sample point within a stroke.
///
/// Coordinates are canonical millimeters. They are optional because one
/// legacy source format records dots whose position the device failed to
/// resolve; an absent coordinate is distinct from a legitimate zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dot {
    /// X coordinate in millimeters, when the device resolved it.
    pub x: Option<f64>,

    /// Y coordinate in millimeters, when the device resolved it.
    pub y: Option<f64>,

    /// Device-epoch-relative timestamp in milliseconds.
    pub timestamp: i64,

    /// Pen pressure in [0.0, 1.0], when the device reports it.
    pub pressure: Option<f64>,

    /// The pen event this sample belongs to.
    pub kind: DotKind,

    /// Format-specific extra attributes.
    pub metadata: Metadata,
}

impl Dot {
    /// Creates a located dot with the given coordinates and timestamp.
    pub fn new(x: f64, y: f64, timestamp: i64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            timestamp,
            ..Self::default()
        }
    }

    /// Sets the pressure for this dot.
    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }

    /// Sets the pen event kind for this dot.
    pub fn with_kind(mut self, kind: DotKind) -> Self {
        self.kind = kind;
        self
    }
}

/// An ordered run of dots between a pen-down and a pen-up event.
///
/// Dot insertion order is temporal order; timestamps are non-decreasing
/// within a stroke.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stroke {
    /// Capture start time in milliseconds.
    pub start_time: i64,

    /// Capture end time in milliseconds (>= start_time).
    pub end_time: i64,

    /// The stroke's sample points, in temporal order.
    pub dots: Vec<Dot>,

    /// Format-specific extra attributes (e.g. pen color, thickness).
    pub metadata: Metadata,
}

impl Stroke {
    /// Creates a stroke spanning the given time interval.
    pub fn new(start_time: i64, end_time: i64) -> Self {
        Self {
            start_time,
            end_time,
            ..Self::default()
        }
    }

    /// Appends a dot to the stroke.
    pub fn add_dot(&mut self, dot: Dot) {
        self.dots.push(dot);
    }

    /// Appends a dot, consuming and returning the stroke.
    pub fn with_dot(mut self, dot: Dot) -> Self {
        self.dots.push(dot);
        self
    }

    /// Adds a metadata entry to the stroke.
    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        self.metadata.insert(key.into(), value.into());
    }
}

/// The canonical representation of one captured sheet.
///
/// This is the central data structure that all format conversions work
/// through: readers parse into it, the analyzer and normalizer rewrite it
/// in place, and writers render from it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    /// Page width in millimeters.
    pub width: f64,

    /// Page height in millimeters.
    pub height: f64,

    /// Left margin in millimeters.
    pub margin_left: f64,

    /// Top margin in millimeters.
    pub margin_top: f64,

    /// Right margin in millimeters.
    pub margin_right: f64,

    /// Bottom margin in millimeters.
    pub margin_bottom: f64,

    /// The page's strokes, in capture order.
    pub strokes: Vec<Stroke>,

    /// Page metadata (canonical keys plus format-specific extras).
    pub metadata: Metadata,

    /// Capture-quality classification, when the analyzer detected one.
    pub capture_error: Option<CaptureError>,
}

impl Page {
    /// Creates an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stroke to the page.
    pub fn add_stroke(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// Adds a metadata entry to the page.
    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Returns the content rectangle (page rectangle minus margins) as
    /// `(xmin, ymin, xmax, ymax)`.
    pub fn content_rect(&self) -> (f64, f64, f64, f64) {
        (
            self.margin_left,
            self.margin_top,
            self.width - self.margin_right,
            self.height - self.margin_bottom,
        )
    }

    /// Iterates over every dot of every stroke, in document order.
    pub fn dots(&self) -> impl Iterator<Item = &Dot> {
        self.strokes.iter().flat_map(|stroke| stroke.dots.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_construction() {
        let mut page = Page::new();
        page.width = 210.0;
        page.height = 297.0;
        page.add_metadata("id", "neo");
        page.add_metadata("pageNo", 7);

        let mut stroke = Stroke::new(100, 140);
        stroke.add_dot(Dot::new(10.0, 20.0, 100).with_pressure(0.5));
        stroke.add_dot(Dot::new(11.0, 21.0, 140));
        page.add_stroke(stroke);

        assert_eq!(page.strokes.len(), 1);
        assert_eq!(page.dots().count(), 2);
        assert_eq!(page.metadata.get("id"), Some(&MetaValue::from("neo")));
        assert_eq!(page.metadata.get("pageNo"), Some(&MetaValue::Int(7)));
    }

    #[test]
    fn content_rect_subtracts_margins() {
        let page = Page {
            width: 100.0,
            height: 200.0,
            margin_left: 5.0,
            margin_top: 10.0,
            margin_right: 15.0,
            margin_bottom: 20.0,
            ..Page::default()
        };

        assert_eq!(page.content_rect(), (5.0, 10.0, 85.0, 180.0));
    }

    #[test]
    fn dot_kind_parses_case_insensitively() {
        assert_eq!(DotKind::parse("down"), Some(DotKind::Down));
        assert_eq!(DotKind::parse("DOWN"), Some(DotKind::Down));
        assert_eq!(DotKind::parse("Move"), Some(DotKind::Move));
        assert_eq!(DotKind::parse("uP"), Some(DotKind::Up));
        assert_eq!(DotKind::parse("hover"), None);
    }

    #[test]
    fn meta_value_conversions() {
        assert_eq!(MetaValue::from(5i64).as_int(), Some(5));
        assert_eq!(MetaValue::from("abc").as_str(), Some("abc"));
        assert_eq!(MetaValue::from(true), MetaValue::Bool(true));
        assert_eq!(MetaValue::from(2.5), MetaValue::Float(2.5));
    }
}
