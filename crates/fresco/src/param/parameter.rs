//! A single parameter and its value pipeline.
//!
//! Every set runs the same fixed pipeline, in this order and no other:
//!
//! 1. **Coercion** onto the declared kind ([`ParamValue::coerce`]).
//! 2. **Enum resolution** - an unmatched value or out-of-range index falls
//!    back to the default and produces a [`ValidationWarning`].
//! 3. **Range clamp** - numeric kinds only, bounds independently optional.
//! 4. **Derivation** - the author's pure function; its return value is
//!    final. The pipeline does not re-run on the derived result.
//!
//! The current value is only ever written by this pipeline. Each parameter
//! also remembers the raw value of its last external set: when a dependency
//! changes, the parameter re-enters the full pipeline with that stored raw
//! trigger, so clamping and enum resolution apply to recomputation too.

use fresco_core::Property;
use fresco_core::logging::targets;

use super::definition::{ParamDef, ParamSnapshot};
use super::value::{ParamKind, ParamValue};

/// A recoverable validation problem: the value fell back to the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The offending parameter.
    pub parameter: String,
    /// Human-readable description of what was rejected.
    pub message: String,
}

/// Result of one trip through the pipeline.
#[derive(Debug, Default)]
pub struct SetOutcome {
    /// Whether the coerced value differs from the previous one.
    pub changed: bool,
    /// Validation warnings produced by enum resolution.
    pub warnings: Vec<ValidationWarning>,
}

/// One declared parameter with its current coerced value.
#[derive(Debug)]
pub struct Parameter {
    name: String,
    def: ParamDef,
    value: Property<ParamValue>,
    /// Raw trigger of the last external set; recomputation replays it.
    last_raw: Property<ParamValue>,
}

impl Parameter {
    /// Create the parameter with its declared default as current value.
    ///
    /// The default is *not* piped here - construction order across a
    /// parameter set matters for derivations, so the owning element pushes
    /// defaults through [`initialize`](Self::initialize) in processing
    /// order instead.
    pub fn new(name: impl Into<String>, def: ParamDef) -> Self {
        let default = def.default.clone();
        Self {
            name: name.into(),
            def,
            value: Property::new(default.clone()),
            last_raw: Property::new(default),
        }
    }

    /// The parameter's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declaration this parameter was built from.
    pub fn definition(&self) -> &ParamDef {
        &self.def
    }

    /// Whether changed values are echoed to the host sink.
    pub fn echoes(&self) -> bool {
        self.def.echo
    }

    /// Current coerced value.
    pub fn get(&self) -> ParamValue {
        self.value.get()
    }

    /// Raw trigger of the last external set.
    pub fn last_raw(&self) -> ParamValue {
        self.last_raw.get()
    }

    /// Run the default through the pipeline at construction time.
    ///
    /// No change detection: whatever the pipeline yields becomes the
    /// initial value, silently.
    pub fn initialize(&self, siblings: &ParamSnapshot) {
        let (value, _) = self.run_pipeline(self.def.default.clone(), siblings);
        self.value.set_silent(value);
    }

    /// External set: store the raw trigger and run the pipeline.
    pub fn set(&self, raw: ParamValue, siblings: &ParamSnapshot) -> SetOutcome {
        self.last_raw.set_silent(raw.clone());
        self.apply(raw, siblings)
    }

    /// Dependency-driven recomputation: replay the stored raw trigger.
    pub fn recompute(&self, siblings: &ParamSnapshot) -> SetOutcome {
        self.apply(self.last_raw.get(), siblings)
    }

    fn apply(&self, raw: ParamValue, siblings: &ParamSnapshot) -> SetOutcome {
        let (value, warnings) = self.run_pipeline(raw, siblings);
        let changed = self.value.set(value);
        SetOutcome { changed, warnings }
    }

    /// The pipeline proper: coerce, resolve enum, clamp, derive.
    fn run_pipeline(
        &self,
        raw: ParamValue,
        siblings: &ParamSnapshot,
    ) -> (ParamValue, Vec<ValidationWarning>) {
        let mut warnings = Vec::new();

        let mut value = raw.coerce(self.def.kind);
        value = self.resolve_enum(value, &mut warnings);
        value = self.clamp(value);

        if let Some(derive) = &self.def.derive {
            value = derive(&value, siblings);
        }

        (value, warnings)
    }

    fn resolve_enum(&self, value: ParamValue, warnings: &mut Vec<ValidationWarning>) -> ParamValue {
        let Some(choices) = &self.def.choices else {
            return value;
        };

        if self.def.by_index {
            match value.as_index() {
                Some(i) if i < choices.len() => choices[i].clone(),
                _ => self.enum_fallback(&value, warnings),
            }
        } else if choices.contains(&value) {
            value
        } else {
            self.enum_fallback(&value, warnings)
        }
    }

    fn enum_fallback(
        &self,
        rejected: &ParamValue,
        warnings: &mut Vec<ValidationWarning>,
    ) -> ParamValue {
        let message = format!(
            "value {:?} is not in the enumeration for parameter '{}'; using default {:?}",
            rejected, self.name, self.def.default
        );
        tracing::warn!(target: targets::PARAM, parameter = %self.name, "{message}");
        warnings.push(ValidationWarning {
            parameter: self.name.clone(),
            message,
        });
        self.def.default.clone()
    }

    fn clamp(&self, value: ParamValue) -> ParamValue {
        if self.def.kind != ParamKind::Number {
            return value;
        }
        let ParamValue::Number(mut n) = value else {
            return value;
        };
        if let Some(min) = self.def.min {
            n = n.max(min);
        }
        if let Some(max) = self.def.max {
            n = n.min(max);
        }
        ParamValue::Number(n)
    }
}
