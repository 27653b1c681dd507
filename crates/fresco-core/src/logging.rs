//! Logging facilities for Fresco.
//!
//! Fresco uses the `tracing` crate for instrumentation. The library never
//! installs a subscriber; to see logs, install one in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! The constants below name the per-subsystem targets so hosts can filter
//! with `tracing` directives (e.g. `fresco::gesture=trace`).

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "fresco_core";
    /// Timer service target.
    pub const TIMER: &str = "fresco_core::timer";
    /// Signal system target.
    pub const SIGNAL: &str = "fresco_core::signal";
    /// Parameter pipeline target.
    pub const PARAM: &str = "fresco::param";
    /// Gesture classifier target.
    pub const GESTURE: &str = "fresco::gesture";
    /// Layout engine target.
    pub const LAYOUT: &str = "fresco::layout";
    /// Surface controller target.
    pub const SURFACE: &str = "fresco::surface";
}
