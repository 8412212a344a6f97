use std::path::Path;

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::CustomResourceExt;
use serde::{Deserialize, Serialize};

use crate::error::{CheckError, Result};
use crate::evaluate::{Section, schema_for_version};
use crate::schema::{SchemaPropertySet, property};

pub const DEFAULT_TARGET_VERSION: &str = "v1";

/// Every field is optional in the serialized form and falls back to the
/// built-in expectations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckConfig {
    pub target_version: String,
    pub expected_spec_properties: SchemaPropertySet,
    pub expected_status_properties: SchemaPropertySet,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            target_version: DEFAULT_TARGET_VERSION.to_string(),
            expected_spec_properties: default_spec_properties(),
            expected_status_properties: default_status_properties(),
        }
    }
}

fn default_spec_properties() -> SchemaPropertySet {
    SchemaPropertySet::from([
        ("foo".to_string(), property("string", None)),
        ("bar".to_string(), property("integer", Some("int64"))),
    ])
}

fn default_status_properties() -> SchemaPropertySet {
    SchemaPropertySet::from([
        ("message".to_string(), property("string", None)),
        ("ready".to_string(), property("boolean", None)),
    ])
}

impl CheckConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| CheckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    pub fn expected(&self, section: Section) -> &SchemaPropertySet {
        match section {
            Section::Spec => &self.expected_spec_properties,
            Section::Status => &self.expected_status_properties,
        }
    }

    /// Returns `None` if the version, its schema, or either section is absent.
    pub fn from_crd(crd: &CustomResourceDefinition, version: &str) -> Option<Self> {
        let schema = schema_for_version(crd, version)?;
        let sections = schema.properties.as_ref()?;
        let section_properties = |section: Section| {
            sections
                .get(section.key())
                .map(|props| props.properties.clone().unwrap_or_default())
        };

        Some(Self {
            target_version: version.to_string(),
            expected_spec_properties: section_properties(Section::Spec)?,
            expected_status_properties: section_properties(Section::Status)?,
        })
    }

    pub fn for_resource<K: CustomResourceExt>() -> Option<Self> {
        Self::from_crd(&K::crd(), &K::api_resource().version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_builtin_expectations() {
        let config = CheckConfig::default();

        assert_eq!(config.target_version, "v1");
        let bar = &config.expected_spec_properties["bar"];
        assert_eq!(bar.type_.as_deref(), Some("integer"));
        assert_eq!(bar.format.as_deref(), Some("int64"));
        assert!(config.expected_spec_properties.contains_key("foo"));
        assert!(config.expected_status_properties.contains_key("message"));
        assert!(config.expected_status_properties.contains_key("ready"));
    }

    #[test]
    fn yaml_overrides_only_named_fields() {
        let config = CheckConfig::from_yaml(
            r#"
targetVersion: v2
expectedStatusProperties:
  phase:
    type: string
"#,
        )
        .unwrap();

        assert_eq!(config.target_version, "v2");
        assert_eq!(
            config.expected_spec_properties,
            CheckConfig::default().expected_spec_properties
        );
        assert_eq!(
            config.expected_status_properties.keys().collect::<Vec<_>>(),
            vec!["phase"]
        );
    }

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(CheckConfig::from_yaml("{}").unwrap(), CheckConfig::default());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = CheckConfig::load("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, CheckError::Io { .. }));
    }

    #[test]
    fn from_crd_requires_the_requested_version() {
        let crd = crate::document::parse_yaml(crate::samples::UP_TO_DATE_CRD).unwrap();

        assert!(CheckConfig::from_crd(&crd, "v2").is_none());
        let config = CheckConfig::from_crd(&crd, "v1").unwrap();
        assert_eq!(
            config.expected_spec_properties.keys().collect::<Vec<_>>(),
            vec!["bar", "foo"]
        );
    }
}
