//! The surface controller.
//!
//! [`ControlSurface`] is the arena that owns everything: the validated
//! parameter set, one [`Element`] per region, the [`Layout`], the
//! [`GestureClassifier`], the timer service, and the outward-facing
//! signals. The host feeds it [`HostEvent`]s and advances its clock; the
//! surface feeds classified gestures to the author's handlers, runs the
//! parameter pipeline, and emits echo/redraw/warning notifications.
//!
//! Construction is the fatal-error boundary: a cyclic or dangling parameter
//! dependency fails [`ControlSurface::new`]. Numeric configuration is never
//! fatal - invalid values fall back to defaults.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use fresco_core::logging::targets;
use fresco_core::{Signal, TimerId, TimerService};

use crate::color::{ColorResolver, ColorSource, DynamicColor, NoTheme, Rgba};
use crate::element::{Element, ElementCtx, SetReport};
use crate::error::{Error, Result};
use crate::events::{DragInfo, Gesture, HostEvent, PointerSample};
use crate::geometry::Point;
use crate::gesture::{GestureClassifier, GestureConfig};
use crate::layout::{Layout, PartitionMode, Region};
use crate::param::{ParamDef, ParamSet, ParamValue, ValidationWarning};

/// Declarative surface configuration.
///
/// All values are validated at construction; anything invalid (a zero
/// element count, a non-positive surface extent) is ignored in favor of the
/// default rather than failing. Zero timing windows mean "classify
/// immediately, synchronously".
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// How the surface divides among elements.
    pub mode: PartitionMode,
    /// Number of elements (and regions). Must be at least 1.
    pub elements: usize,
    /// Initial surface width, replaced by the first resize event.
    pub width: f32,
    /// Initial surface height, replaced by the first resize event.
    pub height: f32,
    /// Double-click window. Zero classifies clicks on release.
    pub double_click_window: Duration,
    /// Drag-initiation window. Zero makes every press a drag.
    pub drag_window: Duration,
    /// Retarget drags to the element under the pointer at each move,
    /// instead of pinning the drag-start element.
    pub multi_element_drag: bool,
    /// Sink index tagged onto every echo notification.
    pub echo_outlet: usize,
    /// Redraw coalescing delay. Zero emits redraw requests immediately.
    pub redraw_delay: Duration,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            mode: PartitionMode::Horizontal,
            elements: 1,
            width: 100.0,
            height: 100.0,
            double_click_window: Duration::from_millis(500),
            drag_window: Duration::from_millis(25),
            multi_element_drag: false,
            echo_outlet: 1,
            redraw_delay: Duration::from_millis(20),
        }
    }
}

impl SurfaceConfig {
    /// Replace invalid values with defaults.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.elements == 0 {
            self.elements = defaults.elements;
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            self.width = defaults.width;
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            self.height = defaults.height;
        }
        self
    }
}

/// A parameter-change notification bound for the host sink.
#[derive(Debug, Clone, PartialEq)]
pub struct EchoEvent {
    /// The configured echo-sink index.
    pub outlet: usize,
    /// Element the change happened on.
    pub element: usize,
    /// Parameter name.
    pub name: String,
    /// The new coerced value.
    pub value: ParamValue,
}

/// Handler invoked with an element context and a local-space sample.
pub type InteractionHandler = Box<dyn FnMut(&ElementCtx<'_>, PointerSample) + Send>;
/// Handler invoked per drag move with localized drag geometry.
pub type DragHandler = Box<dyn FnMut(&ElementCtx<'_>, PointerSample, DragInfo) + Send>;
/// Handler invoked when the surface resizes.
pub type ResizeHandler = Box<dyn FnMut(f32, f32) + Send>;
/// Drawing callback, invoked once per element on `paint`.
pub type DrawHandler = Box<dyn FnMut(&ElementCtx<'_>) + Send>;

/// The author's callbacks. Every slot is optional; the types are the whole
/// "handler shape" contract - there is nothing left to validate at runtime.
#[derive(Default)]
pub struct Handlers {
    on_click: Option<InteractionHandler>,
    on_double_click: Option<InteractionHandler>,
    on_drag: Option<DragHandler>,
    on_resize: Option<ResizeHandler>,
    on_idle: Option<InteractionHandler>,
    on_idle_out: Option<InteractionHandler>,
    draw: Option<DrawHandler>,
}

impl Handlers {
    /// No handlers; attach with the builder methods below.
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoked for a classified single click.
    pub fn on_click<F>(mut self, f: F) -> Self
    where
        F: FnMut(&ElementCtx<'_>, PointerSample) + Send + 'static,
    {
        self.on_click = Some(Box::new(f));
        self
    }

    /// Invoked for a classified double-click.
    pub fn on_double_click<F>(mut self, f: F) -> Self
    where
        F: FnMut(&ElementCtx<'_>, PointerSample) + Send + 'static,
    {
        self.on_double_click = Some(Box::new(f));
        self
    }

    /// Invoked for every drag move.
    pub fn on_drag<F>(mut self, f: F) -> Self
    where
        F: FnMut(&ElementCtx<'_>, PointerSample, DragInfo) + Send + 'static,
    {
        self.on_drag = Some(Box::new(f));
        self
    }

    /// Invoked after the surface resizes, with the new extent.
    pub fn on_resize<F>(mut self, f: F) -> Self
    where
        F: FnMut(f32, f32) + Send + 'static,
    {
        self.on_resize = Some(Box::new(f));
        self
    }

    /// Invoked when the pointer comes to rest over an element.
    pub fn on_idle<F>(mut self, f: F) -> Self
    where
        F: FnMut(&ElementCtx<'_>, PointerSample) + Send + 'static,
    {
        self.on_idle = Some(Box::new(f));
        self
    }

    /// Invoked when the pointer leaves after idling.
    pub fn on_idle_out<F>(mut self, f: F) -> Self
    where
        F: FnMut(&ElementCtx<'_>, PointerSample) + Send + 'static,
    {
        self.on_idle_out = Some(Box::new(f));
        self
    }

    /// The drawing callback, invoked once per element on
    /// [`ControlSurface::paint`].
    pub fn draw<F>(mut self, f: F) -> Self
    where
        F: FnMut(&ElementCtx<'_>) + Send + 'static,
    {
        self.draw = Some(Box::new(f));
        self
    }
}

/// The controller owning one surface's elements, layout, and gestures.
pub struct ControlSurface {
    config: SurfaceConfig,
    set: ParamSet,
    elements: Vec<Element>,
    layout: Layout,
    timers: Arc<TimerService>,
    classifier: GestureClassifier,
    handlers: Handlers,
    colors: HashMap<String, DynamicColor>,
    resolver: Box<dyn ColorResolver + Send + Sync>,
    active: bool,
    redraw_timer: Option<TimerId>,
    echoed: Signal<EchoEvent>,
    redraw_requested: Signal<()>,
    warning: Signal<ValidationWarning>,
}

impl ControlSurface {
    /// Build a surface from configuration, parameter declarations, and
    /// handlers.
    ///
    /// Fails on a cyclic dependency or a dependency naming an undeclared
    /// parameter; numeric configuration problems never fail construction.
    pub fn new(
        config: SurfaceConfig,
        params: impl IntoIterator<Item = (impl Into<String>, ParamDef)>,
        handlers: Handlers,
    ) -> Result<Self> {
        let config = config.sanitized();
        let set = ParamSet::build(params)?;

        let elements = (0..config.elements).map(|i| Element::new(i, &set)).collect();
        let layout = Layout::new(config.mode, config.elements, config.width, config.height);

        let timers = Arc::new(TimerService::new());
        let classifier = GestureClassifier::new(
            GestureConfig {
                double_click_window: config.double_click_window,
                drag_window: config.drag_window,
                multi_element_drag: config.multi_element_drag,
            },
            Arc::clone(&timers),
        );

        tracing::debug!(
            target: targets::SURFACE,
            elements = config.elements,
            parameters = set.len(),
            "surface constructed"
        );

        Ok(Self {
            config,
            set,
            elements,
            layout,
            timers,
            classifier,
            handlers,
            colors: HashMap::new(),
            resolver: Box::new(NoTheme),
            active: true,
            redraw_timer: None,
            echoed: Signal::new(),
            redraw_requested: Signal::new(),
            warning: Signal::new(),
        })
    }

    /// Inject the host's color resolver.
    pub fn set_color_resolver(&mut self, resolver: impl ColorResolver + Send + Sync + 'static) {
        self.resolver = Box::new(resolver);
    }

    /// The active configuration (after sanitization).
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Number of elements on the surface.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// The current layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Hit-test a surface point to an element index.
    pub fn hit_test(&self, p: Point) -> Option<usize> {
        self.layout.hit_test(p)
    }

    /// Region by element index.
    pub fn region(&self, index: usize) -> Result<Region> {
        self.layout.region(index).copied()
    }

    /// Echo notifications: `(outlet, element, parameter, value)` per
    /// changed echo-flagged parameter.
    pub fn echoed(&self) -> &Signal<EchoEvent> {
        &self.echoed
    }

    /// Coalesced redraw requests (no payload).
    pub fn redraw_requested(&self) -> &Signal<()> {
        &self.redraw_requested
    }

    /// Validation warnings from the parameter pipeline.
    pub fn warnings(&self) -> &Signal<ValidationWarning> {
        &self.warning
    }

    /// Whether the surface is active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate or deactivate the surface.
    ///
    /// An inactive surface suppresses redraw emission and renders its
    /// registered colors in greyscale.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        for color in self.colors.values_mut() {
            color.set_greyscale(!active);
        }
    }

    // ------------------------------------------------------------------
    // Parameters
    // ------------------------------------------------------------------

    /// Set a parameter.
    ///
    /// `selector` 0 broadcasts to every element; `n` addresses element
    /// `n - 1`. Returns whether any element's value actually changed.
    pub fn set_parameter(
        &mut self,
        selector: usize,
        name: &str,
        value: impl Into<ParamValue>,
    ) -> Result<bool> {
        if !self.set.contains(name) {
            return Err(Error::UnknownParameter(name.to_string()));
        }
        let value = value.into();

        let mut reports = Vec::new();
        if selector == 0 {
            for element in &self.elements {
                reports.push(element.set_parameter(&self.set, name, value.clone())?);
            }
        } else {
            let element = self
                .elements
                .get(selector - 1)
                .ok_or_else(|| Error::element_out_of_range(selector, self.elements.len()))?;
            reports.push(element.set_parameter(&self.set, name, value)?);
        }
        Ok(self.process_reports(reports))
    }

    /// Current value of a parameter on element `element` (0-based).
    pub fn get_parameter(&self, element: usize, name: &str) -> Result<ParamValue> {
        self.elements
            .get(element)
            .ok_or_else(|| Error::element_out_of_range(element, self.elements.len()))?
            .get_parameter(name)
    }

    /// The declaration behind a parameter.
    pub fn parameter_info(&self, name: &str) -> Result<&ParamDef> {
        self.set
            .definition(name)
            .ok_or_else(|| Error::UnknownParameter(name.to_string()))
    }

    /// Grow or shrink the element set, repartitioning the surface.
    pub fn set_element_count(&mut self, count: usize) {
        let count = count.max(1);
        while self.elements.len() < count {
            self.elements.push(Element::new(self.elements.len(), &self.set));
        }
        self.elements.truncate(count);
        self.layout.set_count(count);
        self.request_redraw();
    }

    // ------------------------------------------------------------------
    // Colors
    // ------------------------------------------------------------------

    /// Register a named color.
    pub fn register_color(&mut self, name: impl Into<String>, mut color: DynamicColor) {
        color.set_greyscale(!self.active);
        self.colors.insert(name.into(), color);
    }

    /// Resolve a registered color to channels.
    pub fn color(&self, name: &str) -> Result<Rgba> {
        self.colors
            .get(name)
            .map(|c| c.resolve(self.resolver.as_ref()))
            .ok_or_else(|| Error::UnknownColor(name.to_string()))
    }

    /// Repoint a registered color at a new id or literal, returning the
    /// resolved channels.
    pub fn set_color(&mut self, name: &str, source: ColorSource) -> Result<Rgba> {
        let color = self
            .colors
            .get_mut(name)
            .ok_or_else(|| Error::UnknownColor(name.to_string()))?;
        color.set_source(source);
        Ok(color.resolve(self.resolver.as_ref()))
    }

    // ------------------------------------------------------------------
    // Events and time
    // ------------------------------------------------------------------

    /// Dispatch one host event.
    ///
    /// Pointer events are hit-tested, classified, and routed to handlers;
    /// resize repartitions the surface. Everything runs synchronously to
    /// completion before this returns.
    pub fn dispatch(&mut self, event: HostEvent) {
        match event {
            HostEvent::Press(sample) => {
                let target = self.layout.hit_test(sample.pos);
                let gestures = self.classifier.on_press(sample, target);
                self.route_gestures(gestures);
            }
            HostEvent::Move(sample) => {
                let target = self.layout.hit_test(sample.pos);
                let gestures = self.classifier.on_move(sample, target);
                self.route_gestures(gestures);
            }
            HostEvent::Release(sample) => {
                let target = self.layout.hit_test(sample.pos);
                let gestures = self.classifier.on_release(sample, target);
                self.route_gestures(gestures);
            }
            HostEvent::IdleEnter(sample) => {
                if let Some(target) = self.layout.hit_test(sample.pos) {
                    self.invoke_interaction(InteractionKind::Idle, target, sample);
                }
            }
            HostEvent::IdleExit(sample) => {
                if let Some(target) = self.layout.hit_test(sample.pos) {
                    self.invoke_interaction(InteractionKind::IdleOut, target, sample);
                }
            }
            HostEvent::Resize { width, height } => {
                self.layout.set_surface_size(width, height);
                if let Some(handler) = self.handlers.on_resize.as_mut() {
                    handler(width, height);
                }
                self.request_redraw();
            }
        }
    }

    /// Advance the logical clock, firing due timers.
    ///
    /// Expired gesture windows classify and route their gestures; an
    /// expired redraw window emits the pending redraw request.
    pub fn advance(&mut self, elapsed: Duration) {
        for id in self.timers.advance(elapsed) {
            if self.redraw_timer == Some(id) {
                self.redraw_timer = None;
                self.emit_redraw();
            } else {
                let gestures = self.classifier.on_timer(id);
                self.route_gestures(gestures);
            }
        }
    }

    /// Logical time until the next pending timer, for host scheduling.
    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.timers.time_until_next()
    }

    /// Invoke the drawing callback once per element.
    ///
    /// The toolkit issues no drawing primitives itself; the callback asks
    /// the context for regions, colors, and scales and draws through the
    /// host.
    pub fn paint(&mut self) {
        for index in 0..self.elements.len() {
            let Some(handler) = self.handlers.draw.as_mut() else {
                return;
            };
            let ctx = ElementCtx::new(&self.elements[index], &self.set, &self.layout);
            handler(&ctx);
            let reports = ctx.take_reports();
            self.process_reports(reports);
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn route_gestures(&mut self, gestures: Vec<Gesture>) {
        for gesture in gestures {
            match gesture {
                Gesture::Click { target, sample } => {
                    self.invoke_interaction(InteractionKind::Click, target, sample);
                }
                Gesture::DoubleClick { target, sample } => {
                    self.invoke_interaction(InteractionKind::DoubleClick, target, sample);
                }
                Gesture::DragMove {
                    target,
                    sample,
                    drag,
                } => {
                    self.invoke_drag(target, sample, drag);
                }
                // Drag boundaries are classifier bookkeeping; authors see
                // the per-move stream.
                Gesture::DragStart { .. } | Gesture::DragEnd { .. } => {}
            }
        }
    }

    fn invoke_interaction(&mut self, kind: InteractionKind, target: usize, sample: PointerSample) {
        let handler = match kind {
            InteractionKind::Click => self.handlers.on_click.as_mut(),
            InteractionKind::DoubleClick => self.handlers.on_double_click.as_mut(),
            InteractionKind::Idle => self.handlers.on_idle.as_mut(),
            InteractionKind::IdleOut => self.handlers.on_idle_out.as_mut(),
        };
        let Some(handler) = handler else { return };
        let Some(element) = self.elements.get(target) else {
            return;
        };

        let ctx = ElementCtx::new(element, &self.set, &self.layout);
        let local = ctx.to_local(sample);
        handler(&ctx, local);
        let reports = ctx.take_reports();
        self.process_reports(reports);
    }

    fn invoke_drag(&mut self, target: usize, sample: PointerSample, drag: DragInfo) {
        let Some(handler) = self.handlers.on_drag.as_mut() else {
            return;
        };
        let Some(element) = self.elements.get(target) else {
            return;
        };

        let ctx = ElementCtx::new(element, &self.set, &self.layout);
        let local = ctx.to_local(sample);
        // Positions localize; deltas stay in surface units.
        let local_drag = DragInfo {
            start: ctx.to_local(PointerSample {
                pos: drag.start,
                modifiers: sample.modifiers,
            })
            .pos,
            last: ctx.to_local(PointerSample {
                pos: drag.last,
                modifiers: sample.modifiers,
            })
            .pos,
            delta: drag.delta,
            total: drag.total,
        };
        handler(&ctx, local, local_drag);
        let reports = ctx.take_reports();
        self.process_reports(reports);
    }

    /// Turn set reports into signals: warnings always, echoes per
    /// echo-flagged change, and at most one redraw request per batch.
    fn process_reports(&mut self, reports: Vec<SetReport>) -> bool {
        let mut any_changed = false;
        for report in reports {
            for warning in report.warnings {
                self.warning.emit(warning);
            }
            for change in report.changes {
                any_changed = true;
                if change.echo {
                    self.echoed.emit(EchoEvent {
                        outlet: self.config.echo_outlet,
                        element: change.element,
                        name: change.name,
                        value: change.value,
                    });
                }
            }
        }
        if any_changed {
            self.request_redraw();
        }
        any_changed
    }

    /// Coalesce redraw requests through the single pending-redraw timer.
    fn request_redraw(&mut self) {
        if self.config.redraw_delay.is_zero() {
            self.emit_redraw();
            return;
        }
        if let Some(id) = self.redraw_timer.take() {
            self.timers.cancel(id);
        }
        if self.active {
            self.redraw_timer = Some(self.timers.schedule(self.config.redraw_delay));
        }
    }

    fn emit_redraw(&self) {
        if self.active {
            self.redraw_requested.emit(());
        }
    }
}

/// Which optional interaction handler a gesture routes to.
#[derive(Debug, Clone, Copy)]
enum InteractionKind {
    Click,
    DoubleClick,
    Idle,
    IdleOut,
}

static_assertions::assert_impl_all!(ControlSurface: Send);
