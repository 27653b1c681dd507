//! Parameter declarations.
//!
//! A [`ParamDef`] is the author's declaration of one parameter: its kind,
//! default, constraints, dependencies, and an optional derivation function.
//! Declarations are plain data built with `with_*` methods; nothing is
//! validated here - the dependency graph build and the value pipeline do
//! that when a surface is constructed.

use std::fmt;
use std::sync::Arc;

use super::value::{ParamKind, ParamValue};

/// A derivation function: `(coerced new value, sibling snapshot) -> final`.
///
/// Derivations are pure; everything they may read arrives through the two
/// arguments. The snapshot exposes the *current* values of the other
/// parameters on the same element - dependencies are guaranteed to have
/// been recomputed first by the processing order.
pub type DeriveFn = Arc<dyn Fn(&ParamValue, &ParamSnapshot) -> ParamValue + Send + Sync>;

/// Read-only view of sibling parameter values, passed to derivations.
#[derive(Debug, Clone, Default)]
pub struct ParamSnapshot {
    values: Vec<(String, ParamValue)>,
}

impl ParamSnapshot {
    /// Build a snapshot from `(name, value)` pairs.
    pub fn new(values: Vec<(String, ParamValue)>) -> Self {
        Self { values }
    }

    /// Current value of a sibling parameter.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Numeric reading of a sibling parameter, defaulting to 0.
    pub fn number(&self, name: &str) -> f64 {
        self.get(name).and_then(ParamValue::as_number).unwrap_or(0.0)
    }

    /// Iterate over all `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }
}

/// Declaration of a single parameter.
#[derive(Clone)]
pub struct ParamDef {
    /// Declared kind; drives coercion.
    pub kind: ParamKind,
    /// Default value, also the fallback for failed enum resolution.
    pub default: ParamValue,
    /// Lower clamp bound (numeric kinds).
    pub min: Option<f64>,
    /// Upper clamp bound (numeric kinds).
    pub max: Option<f64>,
    /// Enumeration of admissible values, if constrained.
    pub choices: Option<Vec<ParamValue>>,
    /// Whether incoming values address `choices` by index rather than value.
    pub by_index: bool,
    /// Whether changes are echoed to the host sink.
    pub echo: bool,
    /// Names of parameters this one derives from.
    pub depends_on: Vec<String>,
    /// Optional derivation, run as the final pipeline step.
    pub derive: Option<DeriveFn>,
}

impl ParamDef {
    /// A numeric parameter.
    pub fn number(default: f64) -> Self {
        Self::with_kind(ParamKind::Number, ParamValue::Number(default))
    }

    /// A boolean parameter.
    pub fn boolean(default: bool) -> Self {
        Self::with_kind(ParamKind::Bool, ParamValue::Bool(default))
    }

    /// A text parameter.
    pub fn text(default: impl Into<String>) -> Self {
        Self::with_kind(ParamKind::Text, ParamValue::Text(default.into()))
    }

    /// An array parameter.
    pub fn array(default: impl IntoIterator<Item = ParamValue>) -> Self {
        Self::with_kind(
            ParamKind::Array,
            ParamValue::Array(default.into_iter().collect()),
        )
    }

    /// A dictionary-blob parameter with an empty default.
    pub fn dict() -> Self {
        Self::with_kind(ParamKind::Dict, ParamValue::Dict(serde_json::Map::new()))
    }

    /// An opaque parameter; values pass through coercion untouched.
    pub fn opaque(default: ParamValue) -> Self {
        Self::with_kind(ParamKind::Opaque, default)
    }

    fn with_kind(kind: ParamKind, default: ParamValue) -> Self {
        Self {
            kind,
            default,
            min: None,
            max: None,
            choices: None,
            by_index: false,
            echo: false,
            depends_on: Vec::new(),
            derive: None,
        }
    }

    /// Clamp to `min..=max`. Bounds are independently optional via
    /// [`with_min`](Self::with_min)/[`with_max`](Self::with_max).
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Clamp from below only.
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Clamp from above only.
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Constrain to an enumeration of admissible values.
    pub fn with_choices(mut self, choices: impl IntoIterator<Item = ParamValue>) -> Self {
        self.choices = Some(choices.into_iter().collect());
        self
    }

    /// Address the enumeration by index instead of by value.
    pub fn addressed_by_index(mut self) -> Self {
        self.by_index = true;
        self
    }

    /// Echo changed values to the host sink.
    pub fn with_echo(mut self) -> Self {
        self.echo = true;
        self
    }

    /// Declare dependencies on other parameters by name.
    pub fn depending_on(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.depends_on = names.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a derivation function.
    pub fn derived<F>(mut self, f: F) -> Self
    where
        F: Fn(&ParamValue, &ParamSnapshot) -> ParamValue + Send + Sync + 'static,
    {
        self.derive = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for ParamDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamDef")
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("choices", &self.choices)
            .field("by_index", &self.by_index)
            .field("echo", &self.echo)
            .field("depends_on", &self.depends_on)
            .field("derive", &self.derive.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let def = ParamDef::number(25.0)
            .with_range(0.0, 100.0)
            .with_echo()
            .depending_on(["gain"]);

        assert_eq!(def.kind, ParamKind::Number);
        assert_eq!(def.default, ParamValue::Number(25.0));
        assert_eq!((def.min, def.max), (Some(0.0), Some(100.0)));
        assert!(def.echo);
        assert_eq!(def.depends_on, vec!["gain".to_string()]);
    }

    #[test]
    fn test_snapshot_lookup() {
        let snap = ParamSnapshot::new(vec![
            ("gain".into(), ParamValue::Number(0.5)),
            ("mode".into(), ParamValue::Text("fine".into())),
        ]);
        assert_eq!(snap.number("gain"), 0.5);
        assert_eq!(snap.number("missing"), 0.0);
        assert_eq!(snap.get("mode").and_then(ParamValue::as_text), Some("fine"));
    }
}
