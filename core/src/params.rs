//! Call arguments and their conversion into wire-level query parameters.
//!
//! `Args` holds what the caller supplied, unset values included. `build_params`
//! checks it against a descriptor's schema and produces the ordered
//! `(name, value)` pairs that get signed and sent.

use crate::error::{ApiError, ParamProblem};
use crate::registry::{Descriptor, ParamKind};

/// Separator for list-valued parameters.
pub const LIST_SEPARATOR: &str = ";";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Int(i64),
    Bool(bool),
    Str(String),
    List(Vec<String>),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Bool(_) => ParamKind::Bool,
            ParamValue::Str(_) => ParamKind::Str,
            ParamValue::List(_) => ParamKind::List,
        }
    }

    /// Wire form, or `None` for a value that counts as absent (an empty list).
    pub fn render(&self) -> Option<String> {
        match self {
            ParamValue::Int(n) => Some(n.to_string()),
            ParamValue::Bool(true) => Some("True".to_string()),
            ParamValue::Bool(false) => Some("False".to_string()),
            ParamValue::Str(s) => Some(s.clone()),
            ParamValue::List(items) if items.is_empty() => None,
            ParamValue::List(items) => Some(items.join(LIST_SEPARATOR)),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::List(value)
    }
}

impl<S: AsRef<str>> From<&[S]> for ParamValue {
    fn from(value: &[S]) -> Self {
        ParamValue::List(value.iter().map(|s| s.as_ref().to_string()).collect())
    }
}

/// Arguments for one call, keyed by parameter name.
///
/// Setting a name twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    entries: Vec<(String, Option<ParamValue>)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.set_opt(name, Some(value))
    }

    /// Record `name` even when `value` is `None`; unset values are dropped at build time.
    pub fn set_opt<V: Into<ParamValue>>(mut self, name: &str, value: Option<V>) -> Self {
        let value = value.map(Into::into);
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

/// Validate `args` against `descriptor` and render the wire parameters.
///
/// Output follows the schema's declaration order. Unset values and empty
/// lists are omitted; every problem found is reported at once.
pub fn build_params(
    descriptor: &Descriptor,
    args: &Args,
) -> Result<Vec<(String, String)>, ApiError> {
    let mut problems: Vec<ParamProblem> = args
        .names()
        .filter(|name| descriptor.param(name).is_none())
        .map(|name| ParamProblem::Unknown(name.to_string()))
        .collect();

    let mut params = Vec::with_capacity(descriptor.params.len());
    for spec in descriptor.params {
        let rendered = match args.get(spec.name) {
            Some(value) if value.kind() != spec.kind => {
                problems.push(ParamProblem::WrongKind {
                    name: spec.name,
                    expected: spec.kind,
                });
                continue;
            }
            Some(value) => value.render(),
            None => None,
        };
        match rendered {
            Some(text) => params.push((spec.name.to_string(), text)),
            None if spec.required => problems.push(ParamProblem::Missing(spec.name)),
            None => {}
        }
    }

    if problems.is_empty() {
        Ok(params)
    } else {
        Err(ApiError::ParameterValidation {
            method: descriptor.name,
            problems,
        })
    }
}
