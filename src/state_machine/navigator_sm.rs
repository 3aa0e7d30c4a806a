//! Panel navigation state machine.
//!
//! Hierarchy:
//! ```text
//! Kiosk (superstate)            [ExitRequested]
//!   ├── Home                    idle tick: extend deadline
//!   └── Away { panel }          idle tick: → Home
//!
//! Pointer hit / Goto from either leaf → Home or Away { target }
//! ```
//!
//! Every transition, including a self-loop, resets the idle deadline and
//! emits `PanelChanged`.

use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use kurbo::Point;
use statig::prelude::*;
use tracing::{debug, info, warn};

use crate::graph::PanelGraph;
use crate::navigator::Notification;
use crate::panel::PanelId;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events dispatched to the navigation state machine.
#[derive(Debug, Clone)]
pub enum NavEvent {
    /// A tap or click at a canvas position.
    Pointer { point: Point, at: Instant },
    /// Explicit transition. The target has already been checked against the
    /// graph by the caller.
    Goto { target: PanelId, at: Instant },
    /// Host clock tick.
    Tick(Instant),
    /// Escape / cancel from the host.
    Exit,
}

// ---------------------------------------------------------------------------
// Shared storage
// ---------------------------------------------------------------------------

/// Shared storage for the navigation state machine.
///
/// - `graph`: immutable, validated panel graph
/// - `idle_deadline`: reset on every transition
/// - `last_hit`: hotspot id matched by the most recent pointer event
/// - `notify_tx`: outbound notifications for the host
pub struct NavigatorMachine {
    pub graph: PanelGraph,
    pub idle_timeout: Duration,
    pub idle_deadline: Instant,
    pub last_hit: Option<String>,
    notify_tx: Sender<Notification>,
}

impl NavigatorMachine {
    pub fn new(
        graph: PanelGraph,
        idle_timeout: Duration,
        now: Instant,
        notify_tx: Sender<Notification>,
    ) -> Self {
        let mut machine = Self {
            graph,
            idle_timeout,
            idle_deadline: now,
            last_hit: None,
            notify_tx,
        };
        machine.idle_deadline = machine.deadline_after(now);
        machine
    }

    /// `at + idle_timeout`, pinned to `at` if that is past what `Instant` can
    /// represent.
    pub fn deadline_after(&self, at: Instant) -> Instant {
        at.checked_add(self.idle_timeout).unwrap_or_else(|| {
            warn!(target: "navigator", timeout_secs = self.idle_timeout.as_secs(), "Idle deadline overflows; expiring now");
            at
        })
    }

    /// Panel id a state stands for.
    pub fn panel_of<'a>(&'a self, state: &'a State) -> &'a PanelId {
        match state {
            State::Home {} => self.graph.home(),
            State::Away { panel } => panel,
        }
    }

    fn emit(&self, notification: Notification) {
        // The receiver lives in the same `Navigator` as this machine.
        let _ = self.notify_tx.send(notification);
    }

    fn on_pointer(&mut self, here: &PanelId, point: Point, at: Instant) -> Outcome<State> {
        let hit = self
            .graph
            .get(here.as_str())
            .and_then(|panel| panel.hit_test(point))
            .map(|hotspot| (hotspot.id.clone(), hotspot.target.clone()));

        match hit {
            Some((hotspot, target)) => {
                debug!(target: "navigator", panel = %here, hotspot = %hotspot, "Hotspot hit");
                self.last_hit = Some(hotspot);
                self.enter(here, &target, at)
            }
            None => {
                self.last_hit = None;
                debug!(target: "navigator", panel = %here, x = point.x, y = point.y, "Tap missed every hotspot");
                Handled
            }
        }
    }

    fn enter(&mut self, from: &PanelId, to: &PanelId, at: Instant) -> Outcome<State> {
        self.idle_deadline = self.deadline_after(at);
        info!(target: "navigator", from = %from, to = %to, "Panel changed");
        self.emit(Notification::PanelChanged {
            from: from.clone(),
            to: to.clone(),
        });

        if to == self.graph.home() {
            Transition(State::home())
        } else {
            Transition(State::away(to.clone()))
        }
    }
}

// ---------------------------------------------------------------------------
// State machine implementation
// ---------------------------------------------------------------------------

#[state_machine(
    initial = "State::home()",
    state(derive(Debug, Clone, PartialEq))
)]
impl NavigatorMachine {
    /// Parent of both leaves. Exit requests are handled the same everywhere.
    #[superstate]
    fn kiosk(&mut self, event: &NavEvent) -> Outcome<State> {
        match event {
            NavEvent::Exit => {
                info!(target: "navigator", "Exit requested");
                self.emit(Notification::ExitRequested);
                Handled
            }
            _ => Handled,
        }
    }

    /// Showing the home panel.
    #[state(superstate = "kiosk")]
    fn home(&mut self, event: &NavEvent) -> Outcome<State> {
        let here = self.graph.home().clone();
        match event {
            NavEvent::Pointer { point, at } => self.on_pointer(&here, *point, *at),
            NavEvent::Goto { target, at } => self.enter(&here, target, *at),
            NavEvent::Tick(now) => {
                if *now >= self.idle_deadline {
                    // Already home: push the deadline out so it cannot fire
                    // again on every subsequent tick.
                    self.idle_deadline = self.deadline_after(*now);
                    debug!(target: "navigator", "Idle timeout while home; deadline extended");
                }
                Handled
            }
            NavEvent::Exit => Super,
        }
    }

    /// Showing any panel other than home.
    #[state(superstate = "kiosk")]
    fn away(&mut self, event: &NavEvent, panel: &PanelId) -> Outcome<State> {
        match event {
            NavEvent::Pointer { point, at } => self.on_pointer(panel, *point, *at),
            NavEvent::Goto { target, at } => self.enter(panel, target, *at),
            NavEvent::Tick(now) if *now >= self.idle_deadline => {
                info!(target: "navigator", panel = %panel, "Idle timeout, returning home");
                let home = self.graph.home().clone();
                self.enter(panel, &home, *now)
            }
            NavEvent::Tick(_) => Handled,
            NavEvent::Exit => Super,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::Panel;
    use std::sync::mpsc;

    fn machine(idle_timeout: Duration, now: Instant) -> NavigatorMachine {
        let graph = PanelGraph::new([Panel::new("home", "home.png")], "home").unwrap();
        let (tx, _rx) = mpsc::channel();
        NavigatorMachine::new(graph, idle_timeout, now, tx)
    }

    #[test]
    fn deadline_overflow_pins_to_now() {
        let now = Instant::now();
        let m = machine(Duration::MAX, now);
        assert_eq!(m.idle_deadline, now);
        assert_eq!(m.deadline_after(now), now);
    }

    #[test]
    fn deadline_in_range_adds_timeout() {
        let now = Instant::now();
        let m = machine(Duration::from_secs(5), now);
        assert_eq!(m.idle_deadline, now + Duration::from_secs(5));
        assert!(m.last_hit.is_none());
    }
}
