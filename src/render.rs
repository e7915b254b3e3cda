// 🎨 Render Policy
// Entry → visual style. Pure; drawing is the map's job.

use crate::config::DEFAULT_CIRCLE_SIZE;
use crate::entry::{Entry, EntryType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Font Awesome, the icon set the markers draw from
pub const ICON_PREFIX: &str = "fa";

pub const POPUP_DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// STYLE TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Orange,
    Blue,
    Black,
}

impl Color {
    pub fn name(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Orange => "orange",
            Color::Blue => "blue",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Shape {
    /// Marker pinned at the reported coordinates
    Point,
    /// Filled circle for reports whose location is approximate
    Area { radius: f64 },
}

/// Style - How one entry is drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Style {
    pub shape: Shape,
    pub color: Color,
    /// Only set for point markers
    pub icon: Option<&'static str>,
    pub popup: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Radius of area shapes, in metres
    pub circle_radius: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            circle_radius: DEFAULT_CIRCLE_SIZE,
        }
    }
}

// ============================================================================
// CLASSIFICATION TABLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub color: Color,
    pub icon: Option<&'static str>,
}

/// Indexed by `EntryType::index()`, in `EntryType::ALL` order
pub const CLASSIFICATIONS: [Classification; 5] = [
    // Unknown
    Classification {
        color: Color::Black,
        icon: None,
    },
    // Stolen
    Classification {
        color: Color::Red,
        icon: Some("exclamation-circle"),
    },
    // Found
    Classification {
        color: Color::Green,
        icon: Some("bell"),
    },
    // Sighting
    Classification {
        color: Color::Blue,
        icon: Some("binoculars"),
    },
    // Burnt
    Classification {
        color: Color::Orange,
        icon: Some("fire"),
    },
];

pub fn classification(entry_type: EntryType) -> Classification {
    CLASSIFICATIONS[entry_type.index()]
}

// ============================================================================
// STYLING
// ============================================================================

/// Pick shape, color, icon and popup for an entry
pub fn style(entry: &Entry, config: &RenderConfig) -> Style {
    let Classification { color, icon } = classification(entry.entry_type());

    let (shape, icon) = if entry.accurate() {
        (Shape::Point, icon)
    } else {
        (
            Shape::Area {
                radius: config.circle_radius,
            },
            None,
        )
    };

    Style {
        shape,
        color,
        icon,
        popup: popup_text(entry),
    }
}

/// Date, a newline, then a link anchor (or nothing)
pub fn popup_text(entry: &Entry) -> String {
    let link = entry
        .link()
        .map(|url| format!("<a href='{}'>Link</a>", escape_attr(url)))
        .unwrap_or_default();

    format!("{}\n{}", entry.date().format(POPUP_DATE_FORMAT), link)
}

fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// TESTS
// ============================================================================
