//! Bridge between the navigator and whatever draws the panels.
//!
//! The navigator never touches a window. After each drive call the host runs
//! `pump`, which drains the notification queue and turns it into calls on
//! `KioskHost`.

use tracing::debug;

use crate::navigator::{Navigator, Notification};
use crate::panel::Panel;

/// Capabilities a host runtime provides to the kiosk.
pub trait KioskHost {
    /// Stop showing `from` and show `to` (background plus hotspot icons).
    fn show_panel(&mut self, from: &Panel, to: &Panel);

    /// Hide the pointer cursor over the kiosk surface.
    fn hide_cursor(&mut self);

    /// End the full-screen session.
    fn exit(&mut self);
}

/// Result of one `pump`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PumpOutcome {
    pub panel_changes: usize,
    pub exit_requested: bool,
}

/// Forward every pending notification to `host`, in order.
pub fn pump(navigator: &Navigator, host: &mut impl KioskHost) -> PumpOutcome {
    let graph = navigator.graph();
    let mut outcome = PumpOutcome::default();

    for notification in navigator.notifications() {
        match notification {
            Notification::PanelChanged { from, to } => {
                // Both ids come from the validated graph.
                if let (Some(from), Some(to)) = (graph.get(from.as_str()), graph.get(to.as_str())) {
                    host.show_panel(from, to);
                    host.hide_cursor();
                    outcome.panel_changes += 1;
                }
            }
            Notification::ExitRequested => {
                host.exit();
                outcome.exit_requested = true;
            }
        }
    }

    if outcome != PumpOutcome::default() {
        debug!(target: "host", ?outcome, "Notifications delivered");
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::graph::PanelGraph;
    use crate::panel::Hotspot;
    use kurbo::{Point, Rect};
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingHost {
        shown: Vec<(String, String)>,
        cursor_hides: usize,
        exits: usize,
    }

    impl KioskHost for RecordingHost {
        fn show_panel(&mut self, from: &Panel, to: &Panel) {
            self.shown.push((from.id.to_string(), to.id.to_string()));
        }

        fn hide_cursor(&mut self) {
            self.cursor_hides += 1;
        }

        fn exit(&mut self) {
            self.exits += 1;
        }
    }

    fn navigator() -> Navigator {
        let graph = PanelGraph::new(
            [
                Panel::new("home", "home.png")
                    .with_hotspot(Hotspot::new("go", Rect::new(0.0, 0.0, 10.0, 10.0), "away")),
                Panel::new("away", "away.png")
                    .with_hotspot(Hotspot::new("back", Rect::new(0.0, 0.0, 10.0, 10.0), "home")),
            ],
            "home",
        )
        .unwrap();
        Navigator::with_clock(graph, Duration::from_secs(60), ManualClock::new())
    }

    #[test]
    fn pump_forwards_in_order() {
        let mut nav = navigator();
        let mut host = RecordingHost::default();

        nav.handle_pointer_event(Point::new(1.0, 1.0));
        nav.handle_pointer_event(Point::new(1.0, 1.0));
        nav.request_exit();

        let outcome = pump(&nav, &mut host);
        assert_eq!(
            outcome,
            PumpOutcome {
                panel_changes: 2,
                exit_requested: true
            }
        );
        assert_eq!(
            host.shown,
            [
                ("home".to_string(), "away".to_string()),
                ("away".to_string(), "home".to_string())
            ]
        );
        assert_eq!(host.cursor_hides, 2);
        assert_eq!(host.exits, 1);
    }

    #[test]
    fn pump_with_nothing_pending() {
        let nav = navigator();
        let mut host = RecordingHost::default();
        assert_eq!(pump(&nav, &mut host), PumpOutcome::default());
        assert!(host.shown.is_empty());
        // Queue is drained: a second pump after one event sees it once.
        let mut nav = nav;
        nav.request_exit();
        assert!(pump(&nav, &mut host).exit_requested);
        assert!(!pump(&nav, &mut host).exit_requested);
    }
}
