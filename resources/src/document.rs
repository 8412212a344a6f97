//! Conversion from external YAML/JSON into typed CRDs.
//!
//! Documents are first read into a generic [`serde_json::Value`] tree and then
//! converted, so callers that already hold an untyped object can enter at
//! [`from_value`].

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;

pub fn parse_yaml(yaml: &str) -> Result<CustomResourceDefinition> {
    let value: Value = serde_yaml::from_str(yaml)?;
    from_value(value)
}

pub fn from_value(value: Value) -> Result<CustomResourceDefinition> {
    let crd: CustomResourceDefinition = serde_json::from_value(value)?;
    debug!(
        name = crd.metadata.name.as_deref().unwrap_or("<unknown>"),
        "Converted document to typed CRD"
    );
    Ok(crd)
}

/// Parses every document of a `---` separated YAML stream.
///
/// Empty documents are skipped. A document that fails to convert does not
/// prevent the following ones from being returned, but a YAML syntax error
/// ends the stream with that error as the last item.
pub fn parse_yaml_stream(yaml: &str) -> Vec<Result<CustomResourceDefinition>> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(yaml) {
        match Value::deserialize(document) {
            Ok(Value::Null) => {}
            Ok(value) => documents.push(from_value(value)),
            Err(err) => {
                documents.push(Err(err.into()));
                break;
            }
        }
    }
    documents
}
