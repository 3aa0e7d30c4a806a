//! Error types for the navigation core.
//!
//! Both kinds mean the panel graph is misconfigured. Neither is transient, so
//! callers propagate them to whoever assembled the graph instead of retrying.

use thiserror::Error;

use crate::panel::PanelId;

/// The panel graph failed validation. A navigator is never built from a graph
/// that produces one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphIntegrityError {
    #[error("home panel `{home}` is not declared")]
    UnknownHome { home: PanelId },

    #[error("hotspot `{hotspot}` on panel `{panel}` targets undeclared panel `{target}`")]
    UnknownTarget {
        panel: PanelId,
        hotspot: String,
        target: PanelId,
    },

    #[error("panel `{id}` is declared more than once")]
    DuplicatePanel { id: PanelId },

    #[error("panel `{panel}` declares hotspot `{hotspot}` more than once")]
    DuplicateHotspot { panel: PanelId, hotspot: String },

    #[error("hotspot `{hotspot}` on panel `{panel}` has an empty rectangle")]
    EmptyHotspot { panel: PanelId, hotspot: String },
}

/// A transition was requested to a panel the graph does not contain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown panel `{0}`")]
pub struct UnknownPanelError(pub PanelId);
