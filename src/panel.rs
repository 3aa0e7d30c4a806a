//! Panels and hotspots.
//!
//! A `Panel` is one full-screen view: a background image plus an ordered list
//! of rectangular hotspots, each pointing at another panel. Panels are
//! immutable once built; see `graph` for how they are assembled and validated.

use std::borrow::Borrow;
use std::fmt;

use kurbo::{Point, Rect};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Stable identity of a panel, e.g. `"main"` or `"ivory_zoom"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct PanelId(String);

impl PanelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PanelId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for PanelId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Opaque reference to an image asset. Resolved by the host relative to its
/// asset root; the navigation core never looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// Hotspot
// ---------------------------------------------------------------------------

/// A tappable region of a panel that leads to `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub id: String,
    /// Canvas-space rectangle. `x0`/`y0` inclusive, `x1`/`y1` exclusive.
    pub rect: Rect,
    pub target: PanelId,
    /// Bitmap drawn at the rectangle's origin, if any.
    pub icon: Option<AssetRef>,
}

impl Hotspot {
    pub fn new(id: impl Into<String>, rect: Rect, target: impl Into<PanelId>) -> Self {
        Self {
            id: id.into(),
            rect,
            target: target.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(AssetRef::new(icon));
        self
    }

    /// Half-open containment: a point on the right or bottom edge belongs to
    /// the neighbouring hotspot, never to both.
    pub fn contains(&self, point: Point) -> bool {
        // kurbo's `Rect::contains` is already half-open, but it assumes a
        // normalized rect.
        self.rect.abs().contains(point)
    }
}

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

/// One full-screen view.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub id: PanelId,
    pub background: AssetRef,
    pub hotspots: Vec<Hotspot>,
}

impl Panel {
    pub fn new(id: impl Into<PanelId>, background: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            background: AssetRef::new(background),
            hotspots: Vec::new(),
        }
    }

    pub fn with_hotspot(mut self, hotspot: Hotspot) -> Self {
        self.hotspots.push(hotspot);
        self
    }

    /// Return the first hotspot, in declared order, containing `point`.
    pub fn hit_test(&self, point: Point) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.contains(point))
    }

    /// Ids of every panel this one links to, in hotspot order.
    pub fn targets(&self) -> impl Iterator<Item = &PanelId> {
        self.hotspots.iter().map(|h| &h.target)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
