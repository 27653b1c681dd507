//! Error types for the Fresco toolkit.
//!
//! The taxonomy distinguishes three severities:
//!
//! - **Configuration errors** are fatal at construction: a circular
//!   parameter dependency or a dependency on an undeclared parameter makes
//!   [`ControlSurface::new`](crate::surface::ControlSurface::new) fail.
//! - **Usage errors** are returned to the immediate caller: addressing an
//!   undeclared parameter, color, element, or region.
//! - **Validation problems** (out-of-enum values) are *not* errors: the
//!   parameter falls back to its default and a
//!   [`ValidationWarning`](crate::param::ValidationWarning) is surfaced on
//!   the warning signal instead.

/// Result type alias for Fresco operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the Fresco toolkit.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A parameter is reachable from itself through its dependencies.
    #[error("circular parameter dependency: {path}")]
    CircularDependency {
        /// The cycle, rendered as `a -> b -> a`.
        path: String,
    },

    /// A declared dependency names a parameter that does not exist.
    #[error("parameter '{parameter}' depends on undeclared parameter '{dependency}'")]
    UnknownDependency {
        parameter: String,
        dependency: String,
    },

    /// A get/set addressed a parameter that was never declared.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// A get/set addressed a color that was never registered.
    #[error("unknown color '{0}'")]
    UnknownColor(String),

    /// An element selector addressed past the end of the element set.
    #[error("element selector {selector} out of range (surface has {count} elements)")]
    ElementOutOfRange { selector: usize, count: usize },

    /// A region index addressed past the end of the layout.
    #[error("region index {index} out of range ({count} regions)")]
    RegionOutOfRange { index: usize, count: usize },
}

impl Error {
    /// Create a circular-dependency error from the cycle path.
    pub fn circular(path: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let path: Vec<String> = path.into_iter().map(Into::into).collect();
        Self::CircularDependency {
            path: path.join(" -> "),
        }
    }

    /// Create an unknown-dependency error.
    pub fn unknown_dependency(
        parameter: impl Into<String>,
        dependency: impl Into<String>,
    ) -> Self {
        Self::UnknownDependency {
            parameter: parameter.into(),
            dependency: dependency.into(),
        }
    }

    /// Create an element-out-of-range error.
    pub fn element_out_of_range(selector: usize, count: usize) -> Self {
        Self::ElementOutOfRange { selector, count }
    }

    /// Create a region-out-of-range error.
    pub fn region_out_of_range(index: usize, count: usize) -> Self {
        Self::RegionOutOfRange { index, count }
    }
}
