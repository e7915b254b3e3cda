// 🗺️ Map Assembly
// Collects styled entries and writes one self-contained Leaflet page

use crate::config::{DEFAULT_LOCATION, DEFAULT_ZOOM};
use crate::entry::Entry;
use crate::error::ReportError;
use crate::render::{Color, Shape, Style, ICON_PREFIX};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const LEAFLET_VERSION: &str = "1.9.4";
const AWESOME_MARKERS_VERSION: &str = "2.0.2";
const FONT_AWESOME_VERSION: &str = "4.7.0";

const PAGE_TEMPLATE: &str = include_str!("map.html");

// ============================================================================
// OPTIONS
// ============================================================================

/// Location - Map center as (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl FromStr for Location {
    type Err = ReportError;

    /// Parses `"lat,lon"`, spaces around either number allowed
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReportError::InvalidLocation(s.to_string());
        let (lat, lon) = s.split_once(',').ok_or_else(invalid)?;
        let lat = lat.trim().parse::<f64>().map_err(|_| invalid())?;
        let lon = lon.trim().parse::<f64>().map_err(|_| invalid())?;
        if !lat.is_finite() || !lon.is_finite() {
            return Err(invalid());
        }
        Ok(Location { lat, lon })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    pub center: Location,
    pub zoom: u8,
}

impl Default for MapOptions {
    fn default() -> Self {
        MapOptions {
            // Compile-time constant, always parses
            center: DEFAULT_LOCATION.parse().unwrap_or(Location {
                lat: 51.4545,
                lon: -2.5879,
            }),
            zoom: DEFAULT_ZOOM,
        }
    }
}

// ============================================================================
// TILE LAYERS
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TileLayer {
    pub name: &'static str,
    pub url: &'static str,
    pub attribution: &'static str,
    pub max_zoom: u8,
}

/// Base layers offered in the layer switcher; the first is shown on open
pub const TILE_LAYERS: [TileLayer; 2] = [
    TileLayer {
        name: "OpenStreetMap",
        url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
        attribution: "&copy; <a href='https://www.openstreetmap.org/copyright'>OpenStreetMap</a> contributors",
        max_zoom: 19,
    },
    TileLayer {
        name: "Terrain",
        url: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
        attribution: "Map data &copy; <a href='https://www.openstreetmap.org/copyright'>OpenStreetMap</a> contributors, SRTM | Style &copy; <a href='https://opentopomap.org'>OpenTopoMap</a>",
        max_zoom: 17,
    },
];

// ============================================================================
// MAP ELEMENTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Marker,
    Circle,
}

/// MapElement - One drawable, as embedded in the page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapElement {
    pub kind: ElementKind,
    /// Coordinates in data-file column order
    pub location: [f64; 2],
    pub color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
    pub prefix: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    pub popup: String,
}

impl MapElement {
    pub fn new(entry: &Entry, style: &Style) -> Self {
        let (kind, radius) = match style.shape {
            Shape::Point => (ElementKind::Marker, None),
            Shape::Area { radius } => (ElementKind::Circle, Some(radius)),
        };

        MapElement {
            kind,
            location: [entry.longitude(), entry.latitude()],
            color: style.color,
            icon: style.icon,
            prefix: ICON_PREFIX,
            radius,
            popup: style.popup.clone(),
        }
    }
}

// ============================================================================
// MAP
// ============================================================================

pub struct Map {
    options: MapOptions,
    elements: Vec<MapElement>,
}

impl Map {
    pub fn new(options: MapOptions) -> Self {
        Map {
            options,
            elements: Vec::new(),
        }
    }

    /// Draw one entry
    pub fn add(&mut self, entry: &Entry, style: &Style) {
        tracing::debug!(line = entry.line(), kind = ?style.shape, color = %style.color, "adding report");
        self.elements.push(MapElement::new(entry, style));
    }

    /// Number of entries drawn so far
    pub fn rendered(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[MapElement] {
        &self.elements
    }

    /// Render the full HTML page
    pub fn to_html(&self) -> Result<String, ReportError> {
        let html = PAGE_TEMPLATE
            .replace("{{LEAFLET_VERSION}}", LEAFLET_VERSION)
            .replace("{{MARKERS_VERSION}}", AWESOME_MARKERS_VERSION)
            .replace("{{FONT_AWESOME_VERSION}}", FONT_AWESOME_VERSION)
            .replace("{{CENTER_LAT}}", &self.options.center.lat.to_string())
            .replace("{{CENTER_LON}}", &self.options.center.lon.to_string())
            .replace("{{ZOOM}}", &self.options.zoom.to_string())
            .replace("{{TILE_LAYERS}}", &script_json(&TILE_LAYERS)?)
            // Last, so nothing inside the report data is taken for a placeholder
            .replace("{{ELEMENTS}}", &script_json(&self.elements)?);
        Ok(html)
    }

    /// Write the page to `path`
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        let html = self.to_html()?;
        fs::write(path, html).map_err(|e| ReportError::io(path, e))?;
        tracing::info!(path = %path.display(), rendered = self.rendered(), "map saved");
        Ok(())
    }
}

/// JSON safe to inline in a <script> block
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ReportError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryType;
    use crate::render::{style, RenderConfig};
    use chrono::NaiveDate;

    fn entry(accurate: bool, entry_type: EntryType) -> Entry {
        Entry::new(
            2,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            -2.58,
            51.45,
            accurate,
            entry_type,
        )
        .with_link("http://x")
    }

    #[test]
    fn test_location_parse() {
        let loc: Location = "51.4545, -2.5879".parse().unwrap();
        assert_eq!(loc, Location { lat: 51.4545, lon: -2.5879 });

        assert!("51.4545".parse::<Location>().is_err());
        assert!("north,south".parse::<Location>().is_err());
    }

    #[test]
    fn test_default_options_center_on_bristol() {
        let options = MapOptions::default();
        assert_eq!(options.center, Location { lat: 51.4545, lon: -2.5879 });
        assert_eq!(options.zoom, 12);
    }

    #[test]
    fn test_add_counts_rendered() {
        let mut map = Map::new(MapOptions::default());
        let config = RenderConfig::default();

        let a = entry(true, EntryType::Stolen);
        let b = entry(false, EntryType::Found);
        map.add(&a, &style(&a, &config));
        map.add(&b, &style(&b, &config));

        assert_eq!(map.rendered(), 2);
        assert_eq!(map.elements()[0].kind, ElementKind::Marker);
        assert_eq!(map.elements()[0].location, [-2.58, 51.45]);
        assert_eq!(map.elements()[1].kind, ElementKind::Circle);
        assert_eq!(map.elements()[1].radius, Some(1000.0));
        assert_eq!(map.elements()[1].icon, None);
    }

    #[test]
    fn test_element_json_shape() {
        let e = entry(true, EntryType::Stolen);
        let element = MapElement::new(&e, &style(&e, &RenderConfig::default()));
        let json = serde_json::to_value(&element).unwrap();

        assert_eq!(json["kind"], "marker");
        assert_eq!(json["color"], "red");
        assert_eq!(json["icon"], "exclamation-circle");
        assert_eq!(json["prefix"], "fa");
        assert!(json.get("radius").is_none());
    }

    #[test]
    fn test_html_contains_layers_and_elements() {
        let mut map = Map::new(MapOptions {
            center: Location { lat: 10.0, lon: 20.0 },
            zoom: 9,
        });
        let e = entry(true, EntryType::Stolen);
        map.add(&e, &style(&e, &RenderConfig::default()));

        let html = map.to_html().unwrap();
        assert!(html.contains("center: [10, 20], zoom: 9"));
        assert!(html.contains("\"name\":\"OpenStreetMap\""));
        assert!(html.contains("\"name\":\"Terrain\""));
        assert!(html.contains("L.control.layers"));
        assert!(html.contains("\"icon\":\"exclamation-circle\""));
        assert!(html.contains("<a href='http://x'>Link<\\/a>"));
    }

    #[test]
    fn test_script_json_cannot_close_script_tag() {
        let json = script_json(&["</script><b>"]).unwrap();
        assert!(!json.contains("</script>"));
    }

    #[test]
    fn test_encode_failure_is_an_error() {
        struct Unencodable;

        impl Serialize for Unencodable {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("cannot encode"))
            }
        }

        assert!(matches!(script_json(&Unencodable), Err(ReportError::Encode(_))));
    }

    #[test]
    fn test_template_placeholders_all_filled() {
        let html = Map::new(MapOptions::default()).to_html().unwrap();
        assert!(!html.contains("{{"));
        assert!(html.contains("leaflet@1.9.4"));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.html");
        let map = Map::new(MapOptions::default());

        map.save(&path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_save_to_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("map.html");
        let map = Map::new(MapOptions::default());

        assert!(matches!(map.save(&path), Err(ReportError::Io { .. })));
    }
}
