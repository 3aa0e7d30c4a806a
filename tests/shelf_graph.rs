//! The built-in shelf exhibit, walked the way a visitor would.
//!
//! Tested in this file:
//! - every shelf object opens its detail panel
//! - `next` cycles the 16-object ring back to the start
//! - zoom panels return to the detail panel they came from
//! - the ivory walrus detour (`ivory → ivory2 → wood`)

use std::time::Duration;

use kurbo::Point;
use label_viewer::shelf::{self, RING, SHELF_OBJECTS};
use label_viewer::{Clock, ManualClock, Navigator, PanelGraph};

fn navigator() -> (Navigator, ManualClock) {
    let clock = ManualClock::new();
    let graph = PanelGraph::build(shelf::exhibit()).expect("exhibit graph is valid");
    (
        Navigator::with_clock(graph, Duration::from_secs(600), clock.clone()),
        clock,
    )
}

/// Centre of the hotspot `id` on the current panel.
fn centre_of(nav: &Navigator, id: &str) -> Point {
    let hotspot = nav
        .current_panel()
        .hotspots
        .iter()
        .find(|h| h.id == id)
        .unwrap_or_else(|| panic!("no hotspot `{id}` on `{}`", nav.current_id()));
    hotspot.rect.center()
}

fn tap(nav: &mut Navigator, id: &str) {
    let point = centre_of(nav, id);
    assert!(nav.handle_pointer_event(point), "tap on `{id}` missed");
}

#[test]
fn shelf_object_top_left_corner_opens_it() {
    // Object hotspots overlap slightly on the shelf, so tap the inclusive
    // top-left corner, which only the object itself covers first.
    for (name, (x, y)) in SHELF_OBJECTS {
        let (mut nav, _clock) = navigator();
        nav.handle_pointer_event(Point::new(x, y));
        assert_eq!(nav.current_id().as_str(), name);
    }
}

#[test]
fn next_cycles_through_ring() {
    let (mut nav, _clock) = navigator();
    nav.transition_to(RING[0]).unwrap();

    for expected in RING.iter().cycle().skip(1).take(RING.len()) {
        tap(&mut nav, "next");
        assert_eq!(nav.current_id().as_str(), *expected);
    }
    assert_eq!(nav.current_id().as_str(), "duiker_hoof");
}

#[test]
fn zoom_and_return_for_every_detail() {
    let (mut nav, _clock) = navigator();
    for name in RING.iter().copied().chain(["ivory2"]) {
        nav.transition_to(name).unwrap();
        tap(&mut nav, "zoom");
        assert_eq!(nav.current_id(), &shelf::zoom_id(name));
        tap(&mut nav, "return");
        assert_eq!(nav.current_id().as_str(), name);
    }
}

#[test]
fn home_button_from_every_detail() {
    let (mut nav, _clock) = navigator();
    for name in RING {
        nav.transition_to(name).unwrap();
        tap(&mut nav, "home");
        assert!(nav.is_home(), "home from {name}");
    }
}

#[test]
fn ivory_walrus_detour() {
    let (mut nav, _clock) = navigator();
    nav.transition_to("ivory").unwrap();
    tap(&mut nav, "walrus");
    assert_eq!(nav.current_id().as_str(), "ivory2");
    tap(&mut nav, "next");
    assert_eq!(nav.current_id().as_str(), "wood");
}

#[test]
fn idle_from_zoom_goes_to_shelf() {
    let (mut nav, clock) = navigator();
    nav.transition_to("jade_zoom").unwrap();
    clock.advance(Duration::from_secs(600));
    nav.tick(clock.now());
    assert_eq!(nav.current_id().as_str(), shelf::HOME);
}
