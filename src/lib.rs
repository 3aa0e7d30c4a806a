//! label-viewer: navigation core for a full-screen museum label kiosk.
//!
//! A fixed graph of full-screen image panels (shelf overview, object details,
//! zoomed images) with rectangular hotspots that lead from one panel to
//! another. The `Navigator` tracks the one visible panel and returns home
//! after a period of inactivity. Drawing and input capture belong to the
//! host; see `host::KioskHost` and the `label-viewer` binary.

pub mod clock;
pub mod config;
pub mod error;
pub mod graph;
pub mod host;
pub mod logging;
pub mod navigator;
pub mod panel;
pub mod shelf;
pub mod state_machine;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{GraphIntegrityError, UnknownPanelError};
pub use graph::{GraphSpec, PanelGraph};
pub use host::{KioskHost, PumpOutcome, pump};
pub use navigator::{
    DEFAULT_IDLE_TIMEOUT, MAX_IDLE_TIMEOUT, MIN_IDLE_TIMEOUT, Navigator, Notification,
};
pub use panel::{AssetRef, Hotspot, Panel, PanelId};
