//! Fresco - a widget-authoring toolkit for host-embedded control surfaces.
//!
//! Fresco targets interactive graphical controls that live inside an
//! external visual-programming runtime: the host owns the window, the
//! drawing canvas, and the clock; the author declares typed parameters,
//! interaction callbacks, and a drawing callback; Fresco supplies the
//! machinery in between:
//!
//! - **Gesture classification** - raw press/move/release events become
//!   exactly one of click, double-click, or drag, via two timer-driven
//!   windows ([`gesture`]).
//! - **Parameter pipeline** - every set runs coercion, enum validation,
//!   range clamping, and derivation, then fans out to dependent parameters
//!   in dependency order ([`param`]).
//! - **Layout** - the surface partitions into one region per element, with
//!   hit-testing and local/surface coordinate mapping ([`layout`]).
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use fresco::prelude::*;
//!
//! let params = [
//!     ("level", ParamDef::number(25.0).with_range(0.0, 100.0).with_echo()),
//!     ("filled", ParamDef::boolean(false)),
//! ];
//!
//! let handlers = Handlers::new().on_click(|ctx, _sample| {
//!     let filled = ctx.param("filled").unwrap().truthy();
//!     ctx.set_param("filled", !filled).unwrap();
//! });
//!
//! let mut surface = ControlSurface::new(SurfaceConfig::default(), params, handlers)?;
//!
//! // The host delivers events and drives the clock.
//! surface.dispatch(HostEvent::Press(PointerSample::at(50.0, 50.0)));
//! surface.dispatch(HostEvent::Release(PointerSample::at(50.0, 50.0)));
//! surface.advance(Duration::from_millis(500)); // double-click window runs out
//!
//! assert_eq!(surface.get_parameter(0, "filled")?, ParamValue::Bool(true));
//! # Ok::<(), fresco::Error>(())
//! ```

pub mod color;
pub mod element;
mod error;
pub mod events;
pub mod geometry;
pub mod gesture;
pub mod layout;
pub mod param;
pub mod prelude;
pub mod surface;

pub use color::{ColorResolver, ColorSource, DynamicColor, Rgba};
pub use element::{Element, ElementCtx, ParamChange, SetReport};
pub use error::{Error, Result};
pub use events::{DragInfo, Gesture, HostEvent, KeyboardModifiers, PointerSample};
pub use gesture::{GestureClassifier, GestureConfig};
pub use layout::{AxisScale, Layout, PartitionMode, Region};
pub use param::{
    DependencyGraph, ParamDef, ParamKind, ParamSet, ParamSnapshot, ParamValue, ValidationWarning,
};
pub use surface::{ControlSurface, EchoEvent, Handlers, SurfaceConfig};

pub use fresco_core::*;
