// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sfrest_core::Config;

fn registry() -> AppRegistry {
    AppRegistry::from_config(&Config::default())
}

#[test]
fn standard_registry_lists_all_apps() {
    let reg = registry();
    assert_eq!(
        reg.app_names(),
        vec!["caesar", "mrcnn", "aegean", "cutex", "cnn_classifier"]
    );
    assert_eq!(
        reg.app_names_json(),
        serde_json::json!({ "apps": ["caesar", "mrcnn", "aegean", "cutex", "cnn_classifier"] })
    );
}

#[test]
fn describe_unknown_app_is_none() {
    assert!(registry().describe("sextractor").is_none());
}

#[test]
fn caesar_describe_contains_key_options() {
    let reg = registry();
    let schema = reg.describe("caesar").unwrap();
    let obj = schema.as_object().unwrap();
    assert!(obj.contains_key("seedthr"));
    assert!(obj.contains_key("mergethr"));
    assert!(obj.contains_key("regionwcs"));
    assert_eq!(obj["seedthr"]["type"], "float");
    assert_eq!(obj["regionwcs"]["allowed_values"][0], "J2000");
}

#[test]
fn catalog_order_is_stable() {
    let reg = registry();
    let caesar = reg.get("caesar").unwrap();
    let first: Vec<&str> = caesar.options.keys().take(3).copied().collect();
    assert_eq!(first, vec!["save-fits", "save-inputmap", "save-bkgmap"]);
}

#[test]
fn mrcnn_prelude_carries_weights() {
    let reg = registry();
    let mrcnn = reg.get("mrcnn").unwrap();
    assert_eq!(mrcnn.prelude[0], "--runmode=detect");
    assert!(mrcnn.prelude[1].starts_with("--weights="));
    assert_eq!(mrcnn.data_input_flag, "image");
    assert!(!mrcnn.batch_support);
}

#[test]
fn caesar_supports_batch_processing() {
    let reg = registry();
    assert!(reg.get("caesar").unwrap().batch_support);
}
