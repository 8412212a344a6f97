//! Property presence checks over CRD schema property maps.

use std::collections::BTreeMap;

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::JSONSchemaProps;

pub type SchemaPropertySet = BTreeMap<String, JSONSchemaProps>;

/// Outcome of checking one property set against the properties it is expected to declare.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyCheck {
    pub missing: Vec<String>,
}

impl PropertyCheck {
    pub fn all_present(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Checks that every key of `expected` is also a key of `actual`.
///
/// Only key presence matters: a property declared with a different type or
/// format than expected still counts as found.
pub fn check_properties(actual: &SchemaPropertySet, expected: &SchemaPropertySet) -> PropertyCheck {
    check_properties_with(actual, expected, |_, _| {})
}

/// Same as [`check_properties`], calling `on_property` with each expected
/// property name and whether it was found.
pub fn check_properties_with<F>(
    actual: &SchemaPropertySet,
    expected: &SchemaPropertySet,
    mut on_property: F,
) -> PropertyCheck
where
    F: FnMut(&str, bool),
{
    let mut missing = Vec::new();
    for name in expected.keys() {
        let found = actual.contains_key(name);
        on_property(name, found);
        if !found {
            missing.push(name.clone());
        }
    }
    PropertyCheck { missing }
}

pub fn property(type_: &str, format: Option<&str>) -> JSONSchemaProps {
    JSONSchemaProps {
        type_: Some(type_.to_string()),
        format: format.map(str::to_string),
        ..Default::default()
    }
}
