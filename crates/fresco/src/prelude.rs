//! Prelude module for Fresco.
//!
//! Re-exports the types most surface definitions touch:
//!
//! ```
//! use fresco::prelude::*;
//! ```

pub use crate::color::{ColorResolver, DynamicColor, Rgba};
pub use crate::element::ElementCtx;
pub use crate::error::{Error, Result};
pub use crate::events::{DragInfo, HostEvent, KeyboardModifiers, PointerSample};
pub use crate::geometry::{Point, Rect, Size};
pub use crate::layout::{AxisScale, PartitionMode};
pub use crate::param::{ParamDef, ParamKind, ParamValue, ValidationWarning};
pub use crate::surface::{ControlSurface, EchoEvent, Handlers, SurfaceConfig};

pub use fresco_core::{Property, Signal, TimerService};
