//! The drawing callback and its element context: region transforms,
//! color resolution, parameter metadata, and writes made mid-draw.

use std::sync::{Arc, Mutex};

use fresco::prelude::*;

struct Theme;

impl ColorResolver for Theme {
    fn resolve(&self, id: &str) -> Rgba {
        match id {
            "selection" => Rgba::new(0.1, 0.6, 0.9, 1.0),
            _ => Rgba::BLACK,
        }
    }
}

#[test]
fn draw_callback_sees_each_element_with_its_transform() {
    let drawn: Arc<Mutex<Vec<(usize, Point, Point)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&drawn);

    let handlers = Handlers::new().draw(move |ctx| {
        let center = ctx.to_surface(Point::new(0.5, 0.5));
        let radius = ctx.scale_scalar(0.25);
        sink.lock().unwrap().push((ctx.element_index(), center, radius));
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

    surface.paint();

    let drawn = drawn.lock().unwrap();
    assert_eq!(drawn.len(), 2);
    assert_eq!(drawn[0], (0, Point::new(50.0, 50.0), Point::new(25.0, 25.0)));
    assert_eq!(drawn[1], (1, Point::new(150.0, 50.0), Point::new(25.0, 25.0)));
}

#[test]
fn scale_vector_respects_the_axis_flag() {
    let scaled: Arc<Mutex<Vec<Point>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&scaled);

    let handlers = Handlers::new().draw(move |ctx| {
        let v = Point::new(0.5, 0.5);
        sink.lock().unwrap().push(ctx.scale_vector(v, AxisScale::X));
        sink.lock().unwrap().push(ctx.scale_vector(v, AxisScale::Y));
        sink.lock().unwrap().push(ctx.scale_vector(v, AxisScale::Both));
    });

    let mut surface = ControlSurface::new(
        SurfaceConfig {
            elements: 1,
            width: 200.0,
            height: 80.0,
            ..Default::default()
        },
        [("level", ParamDef::number(0.0))],
        handlers,
    )
    .unwrap();

    surface.paint();
    assert_eq!(
        *scaled.lock().unwrap(),
        vec![
            Point::new(100.0, 0.5),
            Point::new(0.5, 40.0),
            Point::new(100.0, 40.0),
        ]
    );
}

#[test]
fn param_info_exposes_the_declared_enumeration() {
    let seen: Arc<Mutex<Vec<ParamValue>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    // The double-click handler cycles the enum the way the original
    // example controls do: read the declaration, pick the next member.
    let handlers = Handlers::new().on_double_click(move |ctx, _| {
        let info = ctx.param_info("shape").unwrap();
        let choices = info.choices.unwrap();
        let current = ctx.param("shape").unwrap();
        let at = choices.iter().position(|c| *c == current).unwrap();
        let next = choices[(at + 1) % choices.len()].clone();
        sink.lock().unwrap().push(next.clone());
        ctx.set_param("shape", next).unwrap();
    });

    let mut surface = ControlSurface::new(
        SurfaceConfig::default(),
        [(
            "shape",
            ParamDef::text("circle").with_choices([
                "circle".into(),
                "square".into(),
                "triangle".into(),
            ]),
        )],
        handlers,
    )
    .unwrap();

    // Two quick presses make a double-click.
    surface.dispatch(HostEvent::Press(PointerSample::at(50.0, 50.0)));
    surface.dispatch(HostEvent::Release(PointerSample::at(50.0, 50.0)));
    surface.dispatch(HostEvent::Press(PointerSample::at(50.0, 50.0)));

    assert_eq!(*seen.lock().unwrap(), vec![ParamValue::Text("square".into())]);
    assert_eq!(
        surface.get_parameter(0, "shape").unwrap(),
        ParamValue::Text("square".into())
    );
}

#[test]
fn writes_during_draw_still_echo_and_coalesce() {
    let handlers = Handlers::new().draw(|ctx| {
        // A draw callback is allowed to correct state it finds stale.
        ctx.set_param("level", 10.0).unwrap();
    });

    let mut surface = ControlSurface::new(
        SurfaceConfig {
            redraw_delay: std::time::Duration::ZERO,
            ..Default::default()
        },
        [("level", ParamDef::number(0.0).with_echo())],
        handlers,
    )
    .unwrap();

    let echoes: Arc<Mutex<Vec<EchoEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&echoes);
    surface.echoed().connect(move |e| sink.lock().unwrap().push(e.clone()));

    surface.paint();
    let echoes = echoes.lock().unwrap();
    assert_eq!(echoes.len(), 1);
    assert_eq!(echoes[0].name, "level");
    assert_eq!(echoes[0].value, ParamValue::Number(10.0));
}

#[test]
fn registered_colors_resolve_through_the_injected_theme() {
    let mut surface = ControlSurface::new(
        SurfaceConfig::default(),
        [("level", ParamDef::number(0.0))],
        Handlers::new(),
    )
    .unwrap();
    surface.set_color_resolver(Theme);
    surface.register_color("on", DynamicColor::from_id("selection"));
    surface.register_color("off", DynamicColor::from_rgba([0.2, 0.2, 0.2, 1.0]));

    assert_eq!(surface.color("on").unwrap(), Rgba::new(0.1, 0.6, 0.9, 1.0));
    assert_eq!(surface.color("off").unwrap(), Rgba::new(0.2, 0.2, 0.2, 1.0));
}
