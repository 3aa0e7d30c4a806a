//! Panel graph: declarative description plus the validated, immutable form.
//!
//! `GraphSpec` is plain data (deserializable from the kiosk TOML file or built
//! from a table such as `shelf::exhibit`). `PanelGraph::build` is the single
//! generic builder that turns it into panels and checks that every edge
//! resolves. After that the graph is read-only.

use std::collections::{HashMap, HashSet};

use kurbo::Rect;
use tracing::debug;

use crate::error::GraphIntegrityError;
use crate::panel::{AssetRef, Hotspot, Panel, PanelId};

// ---------------------------------------------------------------------------
// Declarative description
// ---------------------------------------------------------------------------

/// Whole-graph description.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct GraphSpec {
    pub home: PanelId,
    #[serde(default, rename = "panel")]
    pub panels: Vec<PanelSpec>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PanelSpec {
    pub id: PanelId,
    pub background: AssetRef,
    #[serde(default, rename = "hotspot")]
    pub hotspots: Vec<HotspotSpec>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct HotspotSpec {
    pub id: String,
    pub rect: RectSpec,
    pub target: PanelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<AssetRef>,
}

/// Origin + size, the way hotspot bitmaps are placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct RectSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectSpec {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

impl From<Rect> for RectSpec {
    fn from(r: Rect) -> Self {
        Self::new(r.x0, r.y0, r.width(), r.height())
    }
}

impl From<&Panel> for PanelSpec {
    fn from(panel: &Panel) -> Self {
        Self {
            id: panel.id.clone(),
            background: panel.background.clone(),
            hotspots: panel
                .hotspots
                .iter()
                .map(|h| HotspotSpec {
                    id: h.id.clone(),
                    rect: h.rect.into(),
                    target: h.target.clone(),
                    icon: h.icon.clone(),
                })
                .collect(),
        }
    }
}

impl PanelSpec {
    fn into_panel(self) -> Panel {
        Panel {
            id: self.id,
            background: self.background,
            hotspots: self
                .hotspots
                .into_iter()
                .map(|h| Hotspot {
                    id: h.id,
                    rect: h.rect.to_rect(),
                    target: h.target,
                    icon: h.icon,
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validated graph
// ---------------------------------------------------------------------------

/// Immutable, validated panel graph. Every hotspot target and the home id are
/// guaranteed to resolve.
#[derive(Debug, Clone)]
pub struct PanelGraph {
    panels: Vec<Panel>,
    index: HashMap<PanelId, usize>,
    home: PanelId,
}

impl PanelGraph {
    /// Build from a declarative description.
    pub fn build(spec: GraphSpec) -> Result<Self, GraphIntegrityError> {
        let panels = spec.panels.into_iter().map(PanelSpec::into_panel);
        Self::new(panels, spec.home)
    }

    /// Validate already-constructed panels.
    pub fn new(
        panels: impl IntoIterator<Item = Panel>,
        home: impl Into<PanelId>,
    ) -> Result<Self, GraphIntegrityError> {
        let home = home.into();
        let panels: Vec<Panel> = panels.into_iter().collect();

        let mut index = HashMap::with_capacity(panels.len());
        for (i, panel) in panels.iter().enumerate() {
            if index.insert(panel.id.clone(), i).is_some() {
                return Err(GraphIntegrityError::DuplicatePanel {
                    id: panel.id.clone(),
                });
            }
        }

        if !index.contains_key(&home) {
            return Err(GraphIntegrityError::UnknownHome { home });
        }

        for panel in &panels {
            let mut seen = HashSet::with_capacity(panel.hotspots.len());
            for hotspot in &panel.hotspots {
                if !seen.insert(hotspot.id.as_str()) {
                    return Err(GraphIntegrityError::DuplicateHotspot {
                        panel: panel.id.clone(),
                        hotspot: hotspot.id.clone(),
                    });
                }
                if hotspot.rect.abs().is_zero_area() {
                    return Err(GraphIntegrityError::EmptyHotspot {
                        panel: panel.id.clone(),
                        hotspot: hotspot.id.clone(),
                    });
                }
                if !index.contains_key(&hotspot.target) {
                    return Err(GraphIntegrityError::UnknownTarget {
                        panel: panel.id.clone(),
                        hotspot: hotspot.id.clone(),
                        target: hotspot.target.clone(),
                    });
                }
            }
        }

        debug!(target: "graph", panels = panels.len(), home = %home, "Panel graph validated");

        Ok(Self { panels, index, home })
    }

    pub fn home(&self) -> &PanelId {
        &self.home
    }

    pub fn home_panel(&self) -> &Panel {
        // `new` rejects graphs whose home is missing.
        &self.panels[self.index[&self.home]]
    }

    pub fn get(&self, id: &str) -> Option<&Panel> {
        self.index.get(id).map(|&i| &self.panels[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Panels in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter()
    }

    /// Every distinct image the host has to load: backgrounds and icons.
    pub fn assets(&self) -> Vec<&AssetRef> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for panel in &self.panels {
            let icons = panel.hotspots.iter().filter_map(|h| h.icon.as_ref());
            for asset in std::iter::once(&panel.background).chain(icons) {
                if seen.insert(asset) {
                    out.push(asset);
                }
            }
        }
        out
    }

    /// Back to the declarative form, e.g. for `--dump-config`.
    pub fn to_spec(&self) -> GraphSpec {
        GraphSpec {
            home: self.home.clone(),
            panels: self.panels.iter().map(PanelSpec::from).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
