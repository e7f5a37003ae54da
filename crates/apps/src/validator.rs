// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job-input validation and command synthesis.

use crate::descriptor::{OptionKind, ValueType};
use crate::registry::{AppDescriptor, AppRegistry};
use serde_json::Value;
use thiserror::Error;

/// Rejections carry the exact human-readable diagnostic returned to the
/// submitting client.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("App {0} not known or supported")]
    UnknownApp(String),

    #[error("Empty job inputs given!")]
    EmptyInputs,

    #[error("Given job inputs data is not a dictionary!")]
    NotAMap,

    #[error("Mandatory option {0} not present!")]
    MissingMandatory(String),

    #[error("Option {0} not known or supported for this app!")]
    UnknownOption(String),

    #[error("Option {option} expects a {expected} value type and not a {got}!")]
    WrongValueType {
        option: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("Option {option} value {value} outside allowed range [{min},{max}]!")]
    OutOfRange {
        option: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Option {option} value {value} not among allowed values!")]
    ValueNotAllowed { option: String, value: String },

    #[error("Transformed value for option {0} is empty, failed validation!")]
    EmptyTransform(String),
}

/// Parallelism hints derived from the validated inputs, consumed by the
/// scheduler adapters instead of re-parsing the argument vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeHints {
    /// OpenMP threads per process.
    pub nthreads: u32,
    /// MPI processes.
    pub nproc: u32,
}

impl Default for RuntimeHints {
    fn default() -> Self {
        Self { nthreads: 1, nproc: 1 }
    }
}

/// Output of a successful validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCommand {
    pub command: String,
    pub args: Vec<String>,
    pub hints: RuntimeHints,
}

impl ValidatedCommand {
    /// Arguments joined into a single shell-style string.
    pub fn arg_string(&self) -> String {
        self.args.join(" ")
    }
}

impl AppRegistry {
    /// Validate `inputs` against the named application's catalog and
    /// synthesize the command line. `data_path` is the already-resolved
    /// server-local path of the input file.
    pub fn validate(
        &self,
        app: &str,
        inputs: &Value,
        data_path: &str,
    ) -> Result<ValidatedCommand, ValidationError> {
        let descriptor = self
            .get(app)
            .ok_or_else(|| ValidationError::UnknownApp(app.to_string()))?;
        descriptor.validate(inputs, data_path, self.max_cores)
    }
}

impl AppDescriptor {
    /// See [`AppRegistry::validate`].
    pub fn validate(
        &self,
        inputs: &Value,
        data_path: &str,
        max_cores: u32,
    ) -> Result<ValidatedCommand, ValidationError> {
        let map = inputs.as_object().ok_or(ValidationError::NotAMap)?;
        if map.is_empty() {
            return Err(ValidationError::EmptyInputs);
        }

        // Every submitted key must have a descriptor.
        for key in map.keys() {
            if !self.options.contains_key(key.as_str()) {
                return Err(ValidationError::UnknownOption(key.clone()));
            }
        }

        // Every mandatory descriptor must be present.
        for (name, option) in &self.options {
            if option.mandatory && !map.contains_key(*name) {
                return Err(ValidationError::MissingMandatory(name.to_string()));
            }
        }

        // Emit in catalog order so the argument vector is deterministic.
        let mut args = self.prelude.clone();
        for (name, option) in &self.options {
            let Some(value) = map.get(*name) else { continue };
            match &option.kind {
                OptionKind::Flag => args.push(format!("--{}", name)),
                OptionKind::Value { value_type, min, max, .. } => {
                    let rendered = check_value(name, *value_type, value, *min, *max)?;
                    let rendered = self.transform(name, &rendered)?;
                    args.push(format!("--{}={}", name, rendered));
                }
                OptionKind::Enum { allowed_values, .. } => {
                    let label = value.as_str().ok_or_else(|| ValidationError::WrongValueType {
                        option: name.to_string(),
                        expected: ValueType::Str.as_str(),
                        got: json_type_name(value),
                    })?;
                    if !allowed_values.contains(&label) {
                        return Err(ValidationError::ValueNotAllowed {
                            option: name.to_string(),
                            value: label.to_string(),
                        });
                    }
                    let rendered = self.transform(name, label)?;
                    args.push(format!("--{}={}", name, rendered));
                }
            }
        }

        // The fixed data-input argument, exactly once.
        args.push(format!("--{}={}", self.data_input_flag, data_path));

        let hints = runtime_hints(map, max_cores);
        Ok(ValidatedCommand { command: self.command.clone(), args, hints })
    }

    fn transform(&self, name: &str, value: &str) -> Result<String, ValidationError> {
        match self.transformers.get(name) {
            None => Ok(value.to_string()),
            Some(f) => match f(value) {
                Some(out) if !out.is_empty() => Ok(out),
                _ => Err(ValidationError::EmptyTransform(name.to_string())),
            },
        }
    }
}

/// Exact type check plus inclusive bounds, returning the rendered value.
fn check_value(
    name: &str,
    value_type: ValueType,
    value: &Value,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<String, ValidationError> {
    let wrong_type = |got: &Value| ValidationError::WrongValueType {
        option: name.to_string(),
        expected: value_type.as_str(),
        got: json_type_name(got),
    };

    let (numeric, rendered) = match value_type {
        ValueType::Int => {
            let v = value.as_i64().ok_or_else(|| wrong_type(value))?;
            (Some(v as f64), v.to_string())
        }
        ValueType::Float => {
            if !value.is_f64() {
                return Err(wrong_type(value));
            }
            let v = value.as_f64().ok_or_else(|| wrong_type(value))?;
            (Some(v), format_float(v))
        }
        ValueType::Str => {
            let s = value.as_str().ok_or_else(|| wrong_type(value))?;
            (None, s.to_string())
        }
    };

    if let Some(v) = numeric {
        let lo = min.unwrap_or(f64::NEG_INFINITY);
        let hi = max.unwrap_or(f64::INFINITY);
        if v < lo || v > hi {
            return Err(ValidationError::OutOfRange {
                option: name.to_string(),
                value: v,
                min: lo,
                max: hi,
            });
        }
    }

    Ok(rendered)
}

/// Render a float the way the option scripts expect: whole numbers keep a
/// trailing `.0` (`5.0`, not `5`).
fn format_float(v: f64) -> String {
    if v.fract() == 0.0 && v.is_finite() {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

/// Derive parallelism hints from the validated inputs. Non-positive values
/// collapse to 1; anything above `max_cores` is clamped down to it.
fn runtime_hints(map: &serde_json::Map<String, Value>, max_cores: u32) -> RuntimeHints {
    let read = |key: &str| -> u32 {
        let v = map.get(key).and_then(Value::as_i64).unwrap_or(1);
        if v <= 0 {
            1
        } else {
            (v as u64).min(max_cores as u64) as u32
        }
    };
    RuntimeHints { nthreads: read("nthreads"), nproc: read("nproc") }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
