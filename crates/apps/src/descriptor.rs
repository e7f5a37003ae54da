// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed option descriptors.

use serde_json::{json, Value};

/// Scalar type a value option accepts. Matching is exact: an integer is not
/// accepted where a float is declared, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Int,
    Float,
    Str,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Str => "str",
        }
    }
}

/// Shape of one option: a bare flag, a typed value with optional inclusive
/// bounds, or an enumerated string.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionKind {
    Flag,
    Value {
        value_type: ValueType,
        min: Option<f64>,
        max: Option<f64>,
        default: Option<Value>,
    },
    Enum {
        allowed_values: &'static [&'static str],
        default: &'static str,
    },
}

/// One entry of an application's option catalog. Used only during
/// validation and for the describe endpoint; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDescriptor {
    pub name: &'static str,
    pub mandatory: bool,
    pub kind: OptionKind,
    pub category: &'static str,
    pub subcategory: Option<&'static str>,
    pub advanced: bool,
    pub description: &'static str,
}

impl OptionDescriptor {
    /// Whether this option carries a value on the command line.
    pub fn value_required(&self) -> bool {
        !matches!(self.kind, OptionKind::Flag)
    }

    /// Declared type name for describe output.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            OptionKind::Flag => "none",
            OptionKind::Value { value_type, .. } => value_type.as_str(),
            OptionKind::Enum { .. } => "str",
        }
    }

    /// JSON description of this option for the describe endpoint.
    pub fn to_json(&self) -> Value {
        let mut obj = json!({
            "mandatory": self.mandatory,
            "type": self.type_name(),
            "description": self.description,
            "category": self.category,
            "advanced": self.advanced,
        });
        if let Some(sub) = self.subcategory {
            obj["subcategory"] = json!(sub);
        }
        match &self.kind {
            OptionKind::Flag => {}
            OptionKind::Value { min, max, default, .. } => {
                if let Some(min) = min {
                    obj["min"] = json!(min);
                }
                if let Some(max) = max {
                    obj["max"] = json!(max);
                }
                if let Some(default) = default {
                    obj["default"] = default.clone();
                }
            }
            OptionKind::Enum { allowed_values, default } => {
                obj["allowed_values"] = json!(allowed_values);
                obj["default"] = json!(default);
            }
        }
        obj
    }

    // -- chainable construction helpers used by the catalogs --

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn advanced(mut self) -> Self {
        self.advanced = true;
        self
    }

    pub fn sub(mut self, subcategory: &'static str) -> Self {
        self.subcategory = Some(subcategory);
        self
    }

    /// Inclusive numeric bounds (value options only).
    pub fn range(mut self, lo: f64, hi: f64) -> Self {
        if let OptionKind::Value { ref mut min, ref mut max, .. } = self.kind {
            *min = Some(lo);
            *max = Some(hi);
        }
        self
    }

    pub fn default_int(mut self, v: i64) -> Self {
        if let OptionKind::Value { ref mut default, .. } = self.kind {
            *default = Some(json!(v));
        }
        self
    }

    pub fn default_float(mut self, v: f64) -> Self {
        if let OptionKind::Value { ref mut default, .. } = self.kind {
            *default = Some(json!(v));
        }
        self
    }

    pub fn default_str(mut self, v: &'static str) -> Self {
        if let OptionKind::Value { ref mut default, .. } = self.kind {
            *default = Some(json!(v));
        }
        self
    }
}

/// A bare command-line flag (`--name`).
pub fn flag(
    name: &'static str,
    category: &'static str,
    description: &'static str,
) -> OptionDescriptor {
    OptionDescriptor {
        name,
        mandatory: false,
        kind: OptionKind::Flag,
        category,
        subcategory: None,
        advanced: false,
        description,
    }
}

fn value(
    name: &'static str,
    value_type: ValueType,
    category: &'static str,
    description: &'static str,
) -> OptionDescriptor {
    OptionDescriptor {
        name,
        mandatory: false,
        kind: OptionKind::Value { value_type, min: None, max: None, default: None },
        category,
        subcategory: None,
        advanced: false,
        description,
    }
}

/// An integer-valued option (`--name=<int>`).
pub fn int(
    name: &'static str,
    category: &'static str,
    description: &'static str,
) -> OptionDescriptor {
    value(name, ValueType::Int, category, description)
}

/// A float-valued option (`--name=<float>`).
pub fn float(
    name: &'static str,
    category: &'static str,
    description: &'static str,
) -> OptionDescriptor {
    value(name, ValueType::Float, category, description)
}

/// A free-form string option (`--name=<str>`).
pub fn text(
    name: &'static str,
    category: &'static str,
    description: &'static str,
) -> OptionDescriptor {
    value(name, ValueType::Str, category, description)
}

/// An enumerated string option restricted to `allowed_values`.
pub fn enumeration(
    name: &'static str,
    category: &'static str,
    description: &'static str,
    allowed_values: &'static [&'static str],
    default: &'static str,
) -> OptionDescriptor {
    OptionDescriptor {
        name,
        mandatory: false,
        kind: OptionKind::Enum { allowed_values, default },
        category,
        subcategory: None,
        advanced: false,
        description,
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
