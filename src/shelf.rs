//! The built-in shelf exhibit.
//!
//! Layout of the label-viewer installation expressed as data:
//!
//! ```text
//! main ──(16 objects)──▶ detail panels
//!
//! duiker_hoof → eggshell → glass_teeth → leather → metal → glass → ivory
//!     ↑                                                              │
//!     └─ snail_shell ← seeds ← … ← birch_bark ← wood ◀───────────────┘
//!
//! each detail: zoom → <name>_zoom, next → ring successor, home → main
//! each zoom:   return → detail
//! ivory:       walrus → ivory2 (off-ring), ivory2.next → wood
//! ```
//!
//! Everything goes through `PanelGraph::build`; there is no per-object code.

use crate::graph::{GraphSpec, HotspotSpec, PanelSpec, RectSpec};
use crate::panel::{AssetRef, PanelId};

pub const HOME: &str = "main";

/// Objects on the shelf overview, with the canvas position of their bitmap.
pub const SHELF_OBJECTS: [(&str, (f64, f64)); 16] = [
    ("glass", (936.0, 290.0)),
    ("paper", (935.0, 665.0)),
    ("seeds", (720.0, 895.0)),
    ("snail_shell", (936.0, 766.0)),
    ("silver_turquoise", (737.0, 770.0)),
    ("birch_bark", (800.0, 530.0)),
    ("ceramic", (935.0, 530.0)),
    ("eggshell", (936.0, 50.0)),
    ("duiker_hoof", (430.0, 50.0)),
    ("glass_teeth", (430.0, 290.0)),
    ("jade", (470.0, 810.0)),
    ("leather", (690.0, 300.0)),
    ("wood", (670.0, 530.0)),
    ("metal", (690.0, 420.0)),
    ("stone", (540.0, 770.0)),
    ("ivory", (435.0, 530.0)),
];

/// Detail panels in "next" order. The last one wraps to the first.
pub const RING: [&str; 16] = [
    "duiker_hoof",
    "eggshell",
    "glass_teeth",
    "leather",
    "metal",
    "glass",
    "ivory",
    "wood",
    "birch_bark",
    "ceramic",
    "paper",
    "jade",
    "stone",
    "silver_turquoise",
    "seeds",
    "snail_shell",
];

const SHELF_OBJECT_SIZE: (f64, f64) = (120.0, 100.0);
const BUTTON_SIZE: (f64, f64) = (150.0, 100.0);

const ZOOM_BUTTON: (f64, f64) = (50.0, 950.0);
const NEXT_BUTTON: (f64, f64) = (250.0, 950.0);
const HOME_BUTTON: (f64, f64) = (450.0, 950.0);
const RETURN_BUTTON: (f64, f64) = (50.0, 950.0);

const WALRUS_IMAGE: (f64, f64) = (868.0, 629.0);
const WALRUS_SIZE: (f64, f64) = (300.0, 200.0);

/// The complete exhibit graph, rooted at `main`.
pub fn exhibit() -> GraphSpec {
    let mut panels = Vec::with_capacity(2 + RING.len() * 2 + 2);

    panels.push(PanelSpec {
        id: HOME.into(),
        background: AssetRef::new("shelf/background.png"),
        hotspots: SHELF_OBJECTS
            .iter()
            .map(|&(name, pos)| {
                hotspot(name, pos, SHELF_OBJECT_SIZE, name, format!("shelf/{name}.png"))
            })
            .collect(),
    });

    for (i, &name) in RING.iter().enumerate() {
        let next = RING[(i + 1) % RING.len()];
        if name == "ivory" {
            let mut ivory = detail_panel(name, "ivory1/background.png", next);
            ivory.hotspots.insert(
                0,
                hotspot("walrus", WALRUS_IMAGE, WALRUS_SIZE, "ivory2", "ivory1/walrus.png".into()),
            );
            panels.push(ivory);
            panels.push(zoom_panel(name, "ivory1/ivory.png"));

            panels.push(detail_panel("ivory2", "ivory2/background.png", next));
            panels.push(zoom_panel("ivory2", "ivory2/ivory2.png"));
        } else {
            panels.push(detail_panel(name, &format!("{name}/background.png"), next));
            panels.push(zoom_panel(name, &format!("{name}/{name}.png")));
        }
    }

    GraphSpec {
        home: HOME.into(),
        panels,
    }
}

/// Id of the zoom panel paired with a detail panel.
pub fn zoom_id(detail: &str) -> PanelId {
    PanelId::new(format!("{detail}_zoom"))
}

fn detail_panel(name: &str, background: &str, next: &str) -> PanelSpec {
    PanelSpec {
        id: name.into(),
        background: AssetRef::new(background),
        hotspots: vec![
            hotspot("zoom", ZOOM_BUTTON, BUTTON_SIZE, zoom_id(name).as_str(), "buttons/zoom.png".into()),
            hotspot("next", NEXT_BUTTON, BUTTON_SIZE, next, "buttons/next.png".into()),
            hotspot("home", HOME_BUTTON, BUTTON_SIZE, HOME, "buttons/home.png".into()),
        ],
    }
}

fn zoom_panel(source: &str, image: &str) -> PanelSpec {
    PanelSpec {
        id: zoom_id(source),
        background: AssetRef::new(image),
        hotspots: vec![hotspot(
            "return",
            RETURN_BUTTON,
            BUTTON_SIZE,
            source,
            "buttons/return.png".into(),
        )],
    }
}

fn hotspot(id: &str, (x, y): (f64, f64), (w, h): (f64, f64), target: &str, icon: String) -> HotspotSpec {
    HotspotSpec {
        id: id.to_string(),
        rect: RectSpec::new(x, y, w, h),
        target: target.into(),
        icon: Some(AssetRef::new(icon)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PanelGraph;

    #[test]
    fn exhibit_validates() {
        let graph = PanelGraph::build(exhibit()).expect("exhibit graph is valid");
        // main + 16 detail + 16 zoom + ivory2 + ivory2_zoom
        assert_eq!(graph.len(), 35);
        assert_eq!(graph.home().as_str(), HOME);
    }

    #[test]
    fn home_links_every_object() {
        let graph = PanelGraph::build(exhibit()).unwrap();
        let home = graph.home_panel();
        assert_eq!(home.hotspots.len(), 16);
        for name in RING {
            assert!(home.targets().any(|t| t.as_str() == name), "{name} missing from shelf");
        }
    }

    #[test]
    fn ivory_uses_source_asset_folder() {
        let graph = PanelGraph::build(exhibit()).unwrap();
        let ivory = graph.get("ivory").unwrap();
        assert_eq!(ivory.background.as_str(), "ivory1/background.png");
        assert_eq!(ivory.hotspots[0].id, "walrus");
        assert_eq!(ivory.hotspots[0].target.as_str(), "ivory2");
        assert_eq!(graph.get("ivory_zoom").unwrap().background.as_str(), "ivory1/ivory.png");
    }

    #[test]
    fn zoom_id_suffix() {
        assert_eq!(zoom_id("jade").as_str(), "jade_zoom");
    }
}
