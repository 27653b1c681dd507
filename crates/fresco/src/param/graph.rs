//! Parameter dependency graph.
//!
//! Built once per parameter-set declaration and immutable afterwards. The
//! graph answers two questions the value pipeline needs: in what order do
//! parameters process (dependencies strictly before dependents), and which
//! parameters must recompute when a given one changes.
//!
//! Construction fails fatally on a dependency cycle - reported with the
//! full cycle path - or on a dependency naming an undeclared parameter.

use std::collections::HashMap;

use crate::error::{Error, Result};
use fresco_core::logging::targets;

/// Direct and transitive dependency relations over a parameter set.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Parameter names in declaration order.
    names: Vec<String>,
    /// Name -> declaration index.
    index: HashMap<String, usize>,
    /// Direct dependencies per parameter (declaration indices).
    dependencies: Vec<Vec<usize>>,
    /// Direct dependents per parameter (declaration indices).
    dependents: Vec<Vec<usize>>,
    /// Topological processing order (declaration indices).
    order: Vec<usize>,
    /// Declaration index -> position in `order`.
    rank: Vec<usize>,
}

/// DFS node state during cycle detection.
#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl DependencyGraph {
    /// Build the graph from `(name, dependencies)` declarations.
    ///
    /// Declaration order is significant: parameters with no ordering
    /// constraint between them process first-declared-first.
    pub fn build<S, D>(declarations: impl IntoIterator<Item = (S, Vec<D>)>) -> Result<Self>
    where
        S: Into<String>,
        D: Into<String>,
    {
        let declarations: Vec<(String, Vec<String>)> = declarations
            .into_iter()
            .map(|(name, deps)| (name.into(), deps.into_iter().map(Into::into).collect()))
            .collect();

        let names: Vec<String> = declarations.iter().map(|(n, _)| n.clone()).collect();
        let index: HashMap<String, usize> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();

        let mut dependencies = vec![Vec::new(); names.len()];
        let mut dependents = vec![Vec::new(); names.len()];
        for (i, (name, deps)) in declarations.iter().enumerate() {
            for dep in deps {
                let Some(&j) = index.get(dep) else {
                    return Err(Error::unknown_dependency(name.clone(), dep.clone()));
                };
                dependencies[i].push(j);
                dependents[j].push(i);
            }
        }

        let order = topological_order(&names, &dependencies)?;
        let mut rank = vec![0; names.len()];
        for (pos, &i) in order.iter().enumerate() {
            rank[i] = pos;
        }

        tracing::debug!(
            target: targets::PARAM,
            parameters = names.len(),
            "dependency graph built"
        );

        Ok(Self {
            names,
            index,
            dependencies,
            dependents,
            order,
            rank,
        })
    }

    /// Whether `name` is a declared parameter.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Parameter names in processing order (dependencies first).
    pub fn processing_order(&self) -> Vec<&str> {
        self.order.iter().map(|&i| self.names[i].as_str()).collect()
    }

    /// Position of `name` in the processing order.
    pub fn position(&self, name: &str) -> Result<usize> {
        let &i = self
            .index
            .get(name)
            .ok_or_else(|| Error::UnknownParameter(name.to_string()))?;
        Ok(self.rank[i])
    }

    /// Whether `name` declares any dependencies.
    pub fn has_dependencies(&self, name: &str) -> Result<bool> {
        let &i = self
            .index
            .get(name)
            .ok_or_else(|| Error::UnknownParameter(name.to_string()))?;
        Ok(!self.dependencies[i].is_empty())
    }

    /// All direct and transitive dependents of `name`.
    pub fn all_dependents(&self, name: &str) -> Result<Vec<&str>> {
        let &start = self
            .index
            .get(name)
            .ok_or_else(|| Error::UnknownParameter(name.to_string()))?;

        let mut seen = vec![false; self.names.len()];
        let mut stack = vec![start];
        let mut found = Vec::new();
        while let Some(i) = stack.pop() {
            for &dep in &self.dependents[i] {
                if !seen[dep] {
                    seen[dep] = true;
                    found.push(dep);
                    stack.push(dep);
                }
            }
        }
        found.sort_by_key(|&i| self.rank[i]);
        Ok(found.into_iter().map(|i| self.names[i].as_str()).collect())
    }

    /// The recomputation schedule after an external set of `name`:
    /// `{name} ∪ all_dependents(name)`, in processing order.
    pub fn parameters_to_process(&self, name: &str) -> Result<Vec<&str>> {
        let &start = self
            .index
            .get(name)
            .ok_or_else(|| Error::UnknownParameter(name.to_string()))?;

        let mut members = vec![start];
        let mut seen = vec![false; self.names.len()];
        seen[start] = true;
        let mut stack = vec![start];
        while let Some(i) = stack.pop() {
            for &dep in &self.dependents[i] {
                if !seen[dep] {
                    seen[dep] = true;
                    members.push(dep);
                    stack.push(dep);
                }
            }
        }
        members.sort_by_key(|&i| self.rank[i]);
        Ok(members.into_iter().map(|i| self.names[i].as_str()).collect())
    }
}

/// Depth-first topological sort, visiting roots in declaration order so
/// unconstrained parameters keep their declared relative order. Detects
/// cycles and reports the offending path.
fn topological_order(names: &[String], dependencies: &[Vec<usize>]) -> Result<Vec<usize>> {
    let mut marks = vec![Mark::Unvisited; names.len()];
    let mut order = Vec::with_capacity(names.len());
    let mut path: Vec<usize> = Vec::new();

    fn visit(
        i: usize,
        names: &[String],
        dependencies: &[Vec<usize>],
        marks: &mut [Mark],
        order: &mut Vec<usize>,
        path: &mut Vec<usize>,
    ) -> Result<()> {
        match marks[i] {
            Mark::Done => return Ok(()),
            Mark::InProgress => {
                // Back edge: the cycle is the path suffix from the first
                // occurrence of `i`, closed back on itself.
                let from = path.iter().position(|&p| p == i).unwrap_or(0);
                let cycle = path[from..]
                    .iter()
                    .chain(std::iter::once(&i))
                    .map(|&p| names[p].clone());
                return Err(Error::circular(cycle));
            }
            Mark::Unvisited => {}
        }

        marks[i] = Mark::InProgress;
        path.push(i);
        for &dep in &dependencies[i] {
            visit(dep, names, dependencies, marks, order, path)?;
        }
        path.pop();
        marks[i] = Mark::Done;
        order.push(i);
        Ok(())
    }

    for i in 0..names.len() {
        visit(i, names, dependencies, &mut marks, &mut order, &mut path)?;
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_order_respects_dependencies() {
        let graph = DependencyGraph::build([
            ("grand", vec!["boss", "sub"]),
            ("sub", vec!["boss"]),
            ("boss", vec![]),
        ])
        .unwrap();

        let order = graph.processing_order();
        let pos = |n: &str| order.iter().position(|&p| p == n).unwrap();
        assert!(pos("boss") < pos("sub"));
        assert!(pos("sub") < pos("grand"));
    }

    #[test]
    fn test_unconstrained_parameters_keep_declaration_order() {
        let graph = DependencyGraph::build([
            ("c", Vec::<&str>::new()),
            ("a", vec![]),
            ("b", vec![]),
        ])
        .unwrap();
        assert_eq!(graph.processing_order(), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_cycle_fails_construction() {
        let err = DependencyGraph::build([("a", vec!["b"]), ("b", vec!["a"])]).unwrap_err();
        match err {
            Error::CircularDependency { path } => {
                assert!(path.contains("a") && path.contains("b"), "path: {path}");
            }
            other => panic!("expected cycle error, got {other}"),
        }
    }

    #[test]
    fn test_self_cycle_fails_construction() {
        let err = DependencyGraph::build([("a", vec!["a"])]).unwrap_err();
        assert!(matches!(err, Error::CircularDependency { .. }));
    }

    #[test]
    fn test_unknown_dependency_fails_construction() {
        let err = DependencyGraph::build([("a", vec!["ghost"])]).unwrap_err();
        assert!(matches!(err, Error::UnknownDependency { .. }));
    }

    #[test]
    fn test_all_dependents_is_transitive() {
        let graph = DependencyGraph::build([
            ("boss", Vec::<&str>::new()),
            ("sub", vec!["boss"]),
            ("grand", vec!["sub"]),
            ("loner", vec![]),
        ])
        .unwrap();

        assert_eq!(graph.all_dependents("boss").unwrap(), vec!["sub", "grand"]);
        assert!(graph.all_dependents("loner").unwrap().is_empty());
    }

    #[test]
    fn test_parameters_to_process_includes_self_in_order() {
        let graph = DependencyGraph::build([
            ("boss", Vec::<&str>::new()),
            ("sub", vec!["boss"]),
            ("grand", vec!["boss", "sub"]),
        ])
        .unwrap();

        assert_eq!(
            graph.parameters_to_process("boss").unwrap(),
            vec!["boss", "sub", "grand"]
        );
        assert_eq!(graph.parameters_to_process("sub").unwrap(), vec!["sub", "grand"]);
        assert_eq!(graph.parameters_to_process("grand").unwrap(), vec!["grand"]);
    }

    #[test]
    fn test_unknown_queries_are_usage_errors() {
        let graph = DependencyGraph::build([("a", Vec::<String>::new())]).unwrap();
        assert!(matches!(
            graph.all_dependents("ghost"),
            Err(Error::UnknownParameter(_))
        ));
        assert!(matches!(
            graph.parameters_to_process("ghost"),
            Err(Error::UnknownParameter(_))
        ));
    }
}
