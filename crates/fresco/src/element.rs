//! Per-element parameter sets and handler contexts.
//!
//! An element is the addressing unit: one region of the surface, one
//! instance of every declared parameter. Elements hold their index into the
//! surface's arena - never a reference back to the surface - and report the
//! outcome of a set (changes, echoes, warnings) upward as plain data for
//! the surface to turn into signals.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::events::PointerSample;
use crate::geometry::{Point, Rect};
use crate::layout::{AxisScale, Layout};
use crate::param::{ParamDef, ParamSet, ParamSnapshot, ParamValue, Parameter, ValidationWarning};

/// One observed parameter change, reported upward after a set.
#[derive(Debug, Clone)]
pub struct ParamChange {
    /// Element the change happened on.
    pub element: usize,
    /// Parameter name.
    pub name: String,
    /// The new coerced value.
    pub value: ParamValue,
    /// Whether this parameter's declaration requests echo.
    pub echo: bool,
}

/// Everything one external set did: changes in processing order, plus any
/// validation warnings the pipeline produced along the way.
#[derive(Debug, Clone, Default)]
pub struct SetReport {
    pub changes: Vec<ParamChange>,
    pub warnings: Vec<ValidationWarning>,
}

impl SetReport {
    /// Whether anything actually changed.
    pub fn any_changed(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: SetReport) {
        self.changes.extend(other.changes);
        self.warnings.extend(other.warnings);
    }
}

/// One element: an addressable region with its own parameter values.
#[derive(Debug)]
pub struct Element {
    index: usize,
    /// Parameters in processing order (dependencies first).
    params: Vec<Parameter>,
    by_name: HashMap<String, usize>,
}

impl Element {
    /// Instantiate the declared parameters for element `index`.
    ///
    /// Parameters are created and initialized in processing order, so a
    /// derivation sees its dependencies' piped defaults, never raw ones.
    pub fn new(index: usize, set: &ParamSet) -> Self {
        let mut params = Vec::with_capacity(set.len());
        let mut by_name = HashMap::with_capacity(set.len());

        for name in set.graph().processing_order() {
            let def = set
                .definition(name)
                .expect("processing order only yields declared names")
                .clone();
            by_name.insert(name.to_string(), params.len());
            params.push(Parameter::new(name, def));
        }

        let element = Self {
            index,
            params,
            by_name,
        };
        for param in &element.params {
            param.initialize(&element.snapshot());
        }
        element
    }

    /// This element's index in the surface arena.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current coerced value of a parameter.
    pub fn get_parameter(&self, name: &str) -> Result<ParamValue> {
        self.param(name).map(Parameter::get)
    }

    /// The declaration behind a parameter.
    pub fn definition(&self, name: &str) -> Result<&ParamDef> {
        self.param(name).map(Parameter::definition)
    }

    /// Set a parameter and run the recomputation schedule over its
    /// dependents.
    ///
    /// If the parameter's own coerced value does not change, dependents are
    /// left alone and the report comes back empty of changes - warnings may
    /// still be present.
    pub fn set_parameter(
        &self,
        set: &ParamSet,
        name: &str,
        raw: ParamValue,
    ) -> Result<SetReport> {
        let param = self.param(name)?;
        let mut report = SetReport::default();

        let outcome = param.set(raw, &self.snapshot());
        report.warnings.extend(outcome.warnings);
        if !outcome.changed {
            return Ok(report);
        }
        report.changes.push(self.change_record(param));

        // The schedule covers {name} ∪ transitive dependents in processing
        // order; skip the head, it was just processed.
        let schedule = set.graph().parameters_to_process(name)?;
        for dep_name in schedule.into_iter().skip(1) {
            let dep = self.param(dep_name)?;
            let outcome = dep.recompute(&self.snapshot());
            report.warnings.extend(outcome.warnings);
            if outcome.changed {
                report.changes.push(self.change_record(dep));
            }
        }
        Ok(report)
    }

    /// Snapshot of all current values, for derivation functions.
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot::new(
            self.params
                .iter()
                .map(|p| (p.name().to_string(), p.get()))
                .collect(),
        )
    }

    fn change_record(&self, param: &Parameter) -> ParamChange {
        ParamChange {
            element: self.index,
            name: param.name().to_string(),
            value: param.get(),
            echo: param.echoes(),
        }
    }

    fn param(&self, name: &str) -> Result<&Parameter> {
        self.by_name
            .get(name)
            .map(|&i| &self.params[i])
            .ok_or_else(|| Error::UnknownParameter(name.to_string()))
    }
}

/// The context handed to interaction and draw callbacks.
///
/// Exposes exactly what an author needs: this element's parameters, its
/// declaration metadata, and the region transform. Parameter writes are
/// recorded and drained by the surface after the callback returns, so echo
/// and redraw behave the same no matter who performed the set.
pub struct ElementCtx<'a> {
    element: &'a Element,
    set: &'a ParamSet,
    layout: &'a Layout,
    reports: RefCell<Vec<SetReport>>,
}

impl<'a> ElementCtx<'a> {
    pub(crate) fn new(element: &'a Element, set: &'a ParamSet, layout: &'a Layout) -> Self {
        Self {
            element,
            set,
            layout,
            reports: RefCell::new(Vec::new()),
        }
    }

    /// Index of the element this context addresses.
    pub fn element_index(&self) -> usize {
        self.element.index()
    }

    /// Current value of a parameter on this element.
    pub fn param(&self, name: &str) -> Result<ParamValue> {
        self.element.get_parameter(name)
    }

    /// Set a parameter on this element.
    ///
    /// Returns whether the value actually changed. Side effects (echo,
    /// redraw, dependent recomputation) are handled by the surface.
    pub fn set_param(&self, name: &str, value: impl Into<ParamValue>) -> Result<bool> {
        let report = self.element.set_parameter(self.set, name, value.into())?;
        let changed = report.any_changed();
        self.reports.borrow_mut().push(report);
        Ok(changed)
    }

    /// The declaration behind a parameter (e.g. to read its enumeration).
    pub fn param_info(&self, name: &str) -> Result<ParamDef> {
        self.element.definition(name).cloned()
    }

    /// This element's region rectangle in surface coordinates.
    pub fn region(&self) -> Rect {
        self.layout
            .region(self.element.index())
            .map(|r| r.rect)
            .unwrap_or(Rect::ZERO)
    }

    /// Map a normalized local point to surface coordinates.
    pub fn to_surface(&self, local: Point) -> Point {
        self.layout
            .to_surface(self.element.index(), local)
            .unwrap_or(local)
    }

    /// Scale a normalized vector by this element's extent.
    pub fn scale_vector(&self, v: Point, axis: AxisScale) -> Point {
        self.layout
            .scale_vector(self.element.index(), v, axis)
            .unwrap_or(v)
    }

    /// Scale a normalized magnitude by this element's width and height.
    pub fn scale_scalar(&self, magnitude: f32) -> Point {
        self.layout
            .scale_scalar(self.element.index(), magnitude)
            .unwrap_or(Point::new(magnitude, magnitude))
    }

    /// Map a surface-coordinate sample into this element's local space.
    pub fn to_local(&self, sample: PointerSample) -> PointerSample {
        let pos = self
            .layout
            .to_local(self.element.index(), sample.pos)
            .unwrap_or(sample.pos);
        PointerSample {
            pos,
            modifiers: sample.modifiers,
        }
    }

    pub(crate) fn take_reports(self) -> Vec<SetReport> {
        self.reports.into_inner()
    }
}
