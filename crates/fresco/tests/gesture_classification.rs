//! End-to-end gesture classification through the surface controller:
//! host events in, handler invocations out, time driven by `advance`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use fresco::prelude::*;

const MS: Duration = Duration::from_millis(1);

type Log = Arc<Mutex<Vec<String>>>;

/// A 300x100 surface split into three 100-wide elements, with handlers
/// that record every invocation.
fn recording_surface(mutate: impl FnOnce(&mut SurfaceConfig)) -> (ControlSurface, Log) {
    let mut config = SurfaceConfig {
        elements: 3,
        width: 300.0,
        height: 100.0,
        double_click_window: 250 * MS,
        drag_window: 25 * MS,
        ..Default::default()
    };
    mutate(&mut config);

    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let handlers = Handlers::new()
        .on_click({
            let log = Arc::clone(&log);
            move |ctx, sample| {
                log.lock().unwrap().push(format!(
                    "click:{}:{:.2},{:.2}",
                    ctx.element_index(),
                    sample.pos.x,
                    sample.pos.y
                ));
            }
        })
        .on_double_click({
            let log = Arc::clone(&log);
            move |ctx, _sample| {
                log.lock()
                    .unwrap()
                    .push(format!("dblclick:{}", ctx.element_index()));
            }
        })
        .on_drag({
            let log = Arc::clone(&log);
            move |ctx, _sample, drag| {
                log.lock().unwrap().push(format!(
                    "drag:{}:{},{}",
                    ctx.element_index(),
                    drag.delta.x,
                    drag.delta.y
                ));
            }
        });

    let surface = ControlSurface::new(config, [("level", ParamDef::number(0.0))], handlers)
        .expect("construction");
    (surface, log)
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[test]
fn press_release_becomes_one_click_after_the_window() {
    let (mut surface, log) = recording_surface(|_| {});

    surface.dispatch(HostEvent::Press(PointerSample::at(50.0, 50.0)));
    surface.advance(10 * MS);
    surface.dispatch(HostEvent::Release(PointerSample::at(50.0, 50.0)));

    // Nothing fires inside the double-click window.
    surface.advance(249 * MS);
    assert!(entries(&log).is_empty());

    // Then exactly one click, in element-local coordinates.
    surface.advance(MS);
    assert_eq!(entries(&log), vec!["click:0:0.50,0.50"]);

    // And nothing else, ever.
    surface.advance(2000 * MS);
    assert_eq!(entries(&log).len(), 1);
}

#[test]
fn second_press_inside_window_becomes_one_double_click() {
    let (mut surface, log) = recording_surface(|_| {});

    surface.dispatch(HostEvent::Press(PointerSample::at(150.0, 50.0)));
    surface.advance(10 * MS);
    surface.dispatch(HostEvent::Release(PointerSample::at(150.0, 50.0)));
    surface.advance(100 * MS);
    surface.dispatch(HostEvent::Press(PointerSample::at(150.0, 50.0)));

    assert_eq!(entries(&log), vec!["dblclick:1"]);

    // The buffered single click was cancelled.
    surface.advance(2000 * MS);
    assert_eq!(entries(&log), vec!["dblclick:1"]);
}

#[test]
fn held_press_becomes_a_drag_sequence() {
    let (mut surface, log) = recording_surface(|_| {});

    surface.dispatch(HostEvent::Press(PointerSample::at(50.0, 50.0)));
    surface.advance(25 * MS); // drag window expires while held

    surface.dispatch(HostEvent::Move(PointerSample::at(60.0, 50.0)));
    surface.dispatch(HostEvent::Move(PointerSample::at(60.0, 58.0)));
    surface.dispatch(HostEvent::Release(PointerSample::at(60.0, 58.0)));

    assert_eq!(entries(&log), vec!["drag:0:10,0", "drag:0:0,8"]);

    // No click sneaks in after the drag.
    surface.advance(2000 * MS);
    assert_eq!(entries(&log).len(), 2);
}

#[test]
fn pinned_drag_stays_on_the_start_element() {
    let (mut surface, log) = recording_surface(|_| {});

    surface.dispatch(HostEvent::Press(PointerSample::at(50.0, 50.0)));
    surface.advance(25 * MS);
    // Pointer crosses into element 1; single-element mode keeps element 0.
    surface.dispatch(HostEvent::Move(PointerSample::at(150.0, 50.0)));

    assert_eq!(entries(&log), vec!["drag:0:100,0"]);
}

#[test]
fn multi_element_drag_retargets_across_boundaries() {
    let (mut surface, log) = recording_surface(|c| c.multi_element_drag = true);

    surface.dispatch(HostEvent::Press(PointerSample::at(50.0, 50.0)));
    surface.advance(25 * MS);
    surface.dispatch(HostEvent::Move(PointerSample::at(150.0, 50.0)));
    surface.dispatch(HostEvent::Move(PointerSample::at(250.0, 50.0)));

    assert_eq!(entries(&log), vec!["drag:1:100,0", "drag:2:100,0"]);
}

#[test]
fn multi_element_drag_ends_when_the_pointer_leaves_all_regions() {
    let (mut surface, log) = recording_surface(|c| c.multi_element_drag = true);

    surface.dispatch(HostEvent::Press(PointerSample::at(50.0, 50.0)));
    surface.advance(25 * MS);
    surface.dispatch(HostEvent::Move(PointerSample::at(400.0, 50.0)));
    // Drag ended; further motion is inert.
    surface.dispatch(HostEvent::Move(PointerSample::at(250.0, 50.0)));
    surface.dispatch(HostEvent::Release(PointerSample::at(250.0, 50.0)));
    surface.advance(2000 * MS);

    assert!(entries(&log).is_empty());
}

#[test]
fn press_outside_all_regions_is_suppressed() {
    let (mut surface, log) = recording_surface(|_| {});

    surface.dispatch(HostEvent::Press(PointerSample::at(400.0, 50.0)));
    surface.dispatch(HostEvent::Release(PointerSample::at(400.0, 50.0)));
    surface.advance(2000 * MS);

    assert!(entries(&log).is_empty());
}

#[test]
fn zero_drag_window_makes_every_press_a_drag() {
    let (mut surface, log) = recording_surface(|c| c.drag_window = Duration::ZERO);

    surface.dispatch(HostEvent::Press(PointerSample::at(50.0, 50.0)));
    surface.dispatch(HostEvent::Move(PointerSample::at(55.0, 50.0)));
    surface.dispatch(HostEvent::Release(PointerSample::at(55.0, 50.0)));
    surface.advance(2000 * MS);

    assert_eq!(entries(&log), vec!["drag:0:5,0"]);
}

#[test]
fn zero_double_click_window_classifies_on_release() {
    let (mut surface, log) = recording_surface(|c| c.double_click_window = Duration::ZERO);

    surface.dispatch(HostEvent::Press(PointerSample::at(50.0, 50.0)));
    surface.dispatch(HostEvent::Release(PointerSample::at(50.0, 50.0)));

    // Click arrives synchronously, with no timer involved.
    assert_eq!(entries(&log), vec!["click:0:0.50,0.50"]);
    assert_eq!(surface.time_until_next_timer(), None);
}

#[test]
fn two_well_separated_clicks_stay_two_clicks() {
    let (mut surface, log) = recording_surface(|_| {});

    for _ in 0..2 {
        surface.dispatch(HostEvent::Press(PointerSample::at(250.0, 50.0)));
        surface.dispatch(HostEvent::Release(PointerSample::at(250.0, 50.0)));
        surface.advance(250 * MS);
    }

    assert_eq!(entries(&log), vec!["click:2:0.50,0.50", "click:2:0.50,0.50"]);
}

#[test]
fn idle_events_route_directly_to_handlers() {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let handlers = Handlers::new()
        .on_idle({
            let log = Arc::clone(&log);
            move |ctx, _| log.lock().unwrap().push(format!("idle:{}", ctx.element_index()))
        })
        .on_idle_out({
            let log = Arc::clone(&log);
            move |ctx, _| {
                log.lock()
                    .unwrap()
                    .push(format!("idleout:{}", ctx.element_index()))
            }
        });

    let mut surface = ControlSurface::new(
        SurfaceConfig {
            elements: 2,
            width: 200.0,
            height: 100.0,
            ..Default::default()
        },
        [("level", ParamDef::number(0.0))],
        handlers,
    )
    .unwrap();

    surface.dispatch(HostEvent::IdleEnter(PointerSample::at(150.0, 50.0)));
    surface.dispatch(HostEvent::IdleExit(PointerSample::at(150.0, 50.0)));
    assert_eq!(entries(&log), vec!["idle:1", "idleout:1"]);
}
