//! Typed, interdependent parameters.
//!
//! Authors declare parameters as [`ParamDef`]s; a [`ParamSet`] validates the
//! declarations into a [`DependencyGraph`] (failing fast on cycles), and
//! each element instantiates one [`Parameter`] per declaration. Values move
//! exclusively through the pipeline in [`parameter`] - coercion, enum
//! resolution, range clamp, derivation - and changes fan out to dependents
//! in the graph's processing order.

pub mod definition;
pub mod graph;
pub mod parameter;
pub mod value;

pub use definition::{DeriveFn, ParamDef, ParamSnapshot};
pub use graph::DependencyGraph;
pub use parameter::{Parameter, SetOutcome, ValidationWarning};
pub use value::{ParamKind, ParamValue};

use crate::error::Result;

/// A validated parameter declaration set.
///
/// Built once, shared by every element on the surface. Construction is the
/// fatal-error boundary: cycles and unknown dependencies are rejected here,
/// before any element exists.
#[derive(Debug, Clone)]
pub struct ParamSet {
    decls: Vec<(String, ParamDef)>,
    graph: DependencyGraph,
}

impl ParamSet {
    /// Validate declarations and build the dependency graph.
    pub fn build(
        decls: impl IntoIterator<Item = (impl Into<String>, ParamDef)>,
    ) -> Result<Self> {
        let decls: Vec<(String, ParamDef)> = decls
            .into_iter()
            .map(|(name, def)| (name.into(), def))
            .collect();
        let graph = DependencyGraph::build(
            decls
                .iter()
                .map(|(name, def)| (name.clone(), def.depends_on.clone())),
        )?;
        Ok(Self { decls, graph })
    }

    /// The dependency graph over these declarations.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Declaration by name.
    pub fn definition(&self, name: &str) -> Option<&ParamDef> {
        self.decls
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, def)| def)
    }

    /// Whether `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.graph.contains(name)
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_build_validates_dependencies() {
        let err = ParamSet::build([(
            "orphan",
            ParamDef::number(0.0).depending_on(["missing"]),
        )])
        .unwrap_err();
        assert!(matches!(err, Error::UnknownDependency { .. }));
    }

    #[test]
    fn test_build_rejects_cycles_with_no_partial_set() {
        let result = ParamSet::build([
            ("a", ParamDef::number(0.0).depending_on(["b"])),
            ("b", ParamDef::number(0.0).depending_on(["a"])),
        ]);
        assert!(matches!(result, Err(Error::CircularDependency { .. })));
    }

    #[test]
    fn test_definition_lookup() {
        let set = ParamSet::build([("level", ParamDef::number(25.0))]).unwrap();
        assert!(set.contains("level"));
        assert!(set.definition("level").is_some());
        assert!(set.definition("ghost").is_none());
    }
}
