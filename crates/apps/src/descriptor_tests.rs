// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn flag_describe_has_type_none() {
    let d = flag("save-fits", "OUTPUT", "Save maps in FITS format");
    let json = d.to_json();
    assert_eq!(json["type"], "none");
    assert_eq!(json["mandatory"], false);
    assert_eq!(json["category"], "OUTPUT");
    assert!(json.get("min").is_none());
}

#[test]
fn value_describe_carries_bounds_and_default() {
    let d = float("seedthr", "COMPACT-SOURCES", "Seed threshold")
        .range(0.0, 10_000.0)
        .default_float(5.0);
    let json = d.to_json();
    assert_eq!(json["type"], "float");
    assert_eq!(json["min"], 0.0);
    assert_eq!(json["max"], 10_000.0);
    assert_eq!(json["default"], 5.0);
}

#[test]
fn enum_describe_lists_allowed_values() {
    let d = enumeration("regionwcs", "OUTPUT", "WCS format", &["J2000", "B1950"], "J2000");
    let json = d.to_json();
    assert_eq!(json["allowed_values"], serde_json::json!(["J2000", "B1950"]));
    assert_eq!(json["default"], "J2000");
    assert_eq!(json["type"], "str");
}

#[test]
fn subcategory_and_advanced_markers() {
    let d = int("minboundingbox", "COMPACT-SOURCES", "Min bounding box")
        .sub("SELECTION")
        .advanced();
    let json = d.to_json();
    assert_eq!(json["subcategory"], "SELECTION");
    assert_eq!(json["advanced"], true);
}

#[test]
fn mandatory_marker() {
    let d = text("name", "RUN", "A name").mandatory();
    assert!(d.mandatory);
    assert!(d.value_required());
}
