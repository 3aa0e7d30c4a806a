//! The navigator: single source of truth for which panel is on screen.
//!
//! Wraps the `navigator_sm` state machine with the inbound drive calls the
//! host uses (`handle_pointer_event`, `tick`, `request_exit`,
//! `transition_to`) and the outbound notification queue the host drains after
//! each call.
//!
//! # Usage
//!
//! ```rust
//! use std::time::Duration;
//! use kurbo::Point;
//! use label_viewer::{Navigator, Notification, shelf};
//!
//! let mut nav = Navigator::build(shelf::exhibit(), Duration::from_secs(600)).unwrap();
//! nav.handle_pointer_event(Point::new(440.0, 60.0)); // duiker hoof on the shelf
//! assert_eq!(nav.current_id().as_str(), "duiker_hoof");
//! assert!(matches!(
//!     nav.notifications().next(),
//!     Some(Notification::PanelChanged { .. })
//! ));
//! ```

use std::fmt;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use kurbo::Point;
use statig::prelude::*;
use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{GraphIntegrityError, UnknownPanelError};
use crate::graph::{GraphSpec, PanelGraph};
use crate::panel::{Panel, PanelId};
use crate::state_machine::navigator_sm::{NavEvent, NavigatorMachine};

/// Quiet period after which the navigator returns home.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Shortest idle timeout the navigator runs with.
pub const MIN_IDLE_TIMEOUT: Duration = Duration::from_secs(1);

/// Longest idle timeout the navigator runs with (one week).
pub const MAX_IDLE_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Outbound notifications, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Hide `from`'s visuals and show `to`'s. `from == to` on self-transitions.
    PanelChanged { from: PanelId, to: PanelId },
    /// End the full-screen session.
    ExitRequested,
}

pub struct Navigator {
    machine: StateMachine<NavigatorMachine>,
    clock: Box<dyn Clock>,
    notifications: Receiver<Notification>,
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("current", self.current_id())
            .field("home", self.home_id())
            .field("idle_deadline", &self.idle_deadline())
            .finish_non_exhaustive()
    }
}

impl Navigator {
    /// Validate `spec` and start on its home panel.
    pub fn build(spec: GraphSpec, idle_timeout: Duration) -> Result<Self, GraphIntegrityError> {
        Ok(Self::new(PanelGraph::build(spec)?, idle_timeout))
    }

    /// Validate `panels` and start on `home`.
    pub fn from_panels(
        panels: impl IntoIterator<Item = Panel>,
        home: impl Into<PanelId>,
        idle_timeout: Duration,
    ) -> Result<Self, GraphIntegrityError> {
        Ok(Self::new(PanelGraph::new(panels, home)?, idle_timeout))
    }

    pub fn new(graph: PanelGraph, idle_timeout: Duration) -> Self {
        Self::with_clock(graph, idle_timeout, SystemClock)
    }

    /// Start on the graph's home panel. `idle_timeout` is clamped to
    /// `MIN_IDLE_TIMEOUT..=MAX_IDLE_TIMEOUT`.
    pub fn with_clock(graph: PanelGraph, idle_timeout: Duration, clock: impl Clock + 'static) -> Self {
        let clamped = idle_timeout.clamp(MIN_IDLE_TIMEOUT, MAX_IDLE_TIMEOUT);
        if clamped != idle_timeout {
            warn!(
                target: "navigator",
                requested_ms = idle_timeout.as_millis() as u64,
                used_secs = clamped.as_secs(),
                "Idle timeout out of range, clamped"
            );
        }
        let idle_timeout = clamped;
        let (tx, rx) = mpsc::channel();
        let now = clock.now();
        info!(
            target: "navigator",
            home = %graph.home(),
            panels = graph.len(),
            idle_timeout_secs = idle_timeout.as_secs(),
            "Navigator started"
        );
        let machine = NavigatorMachine::new(graph, idle_timeout, now, tx).state_machine();
        Self {
            machine,
            clock: Box::new(clock),
            notifications: rx,
        }
    }

    // ------------------------------------------------------------------
    // Inbound drive calls
    // ------------------------------------------------------------------

    /// Deliver a tap at a canvas position. Returns whether it hit a hotspot
    /// (and therefore caused a transition).
    pub fn handle_pointer_event(&mut self, point: Point) -> bool {
        let at = self.clock.now();
        self.machine.handle(&NavEvent::Pointer { point, at });
        self.machine.inner().last_hit.is_some()
    }

    /// Go to `target`, resetting the idle deadline. Legal when `target` is
    /// already current.
    pub fn transition_to(&mut self, target: &str) -> Result<(), UnknownPanelError> {
        let Some(panel) = self.graph().get(target) else {
            return Err(UnknownPanelError(PanelId::new(target)));
        };
        let target = panel.id.clone();
        let at = self.clock.now();
        self.machine.handle(&NavEvent::Goto { target, at });
        Ok(())
    }

    /// Host clock tick. Returns home if the idle deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        self.machine.handle(&NavEvent::Tick(now));
    }

    /// Ask the host to end the session. Navigation state is untouched.
    pub fn request_exit(&mut self) {
        self.machine.handle(&NavEvent::Exit);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn current_id(&self) -> &PanelId {
        self.machine.inner().panel_of(self.machine.state())
    }

    pub fn current_panel(&self) -> &Panel {
        let graph = self.graph();
        // The machine only ever enters panels that exist in the graph.
        graph.get(self.current_id().as_str()).unwrap_or_else(|| graph.home_panel())
    }

    pub fn home_id(&self) -> &PanelId {
        self.graph().home()
    }

    pub fn is_home(&self) -> bool {
        self.current_id() == self.home_id()
    }

    pub fn graph(&self) -> &PanelGraph {
        &self.machine.inner().graph
    }

    pub fn idle_timeout(&self) -> Duration {
        self.machine.inner().idle_timeout
    }

    pub fn idle_deadline(&self) -> Instant {
        self.machine.inner().idle_deadline
    }

    /// How long the host may sleep before the next tick matters.
    pub fn time_until_idle(&self, now: Instant) -> Duration {
        self.idle_deadline().saturating_duration_since(now)
    }

    /// Drain pending notifications without blocking.
    pub fn notifications(&self) -> impl Iterator<Item = Notification> + '_ {
        self.notifications.try_iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
