use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod document;
pub mod error;
pub mod evaluate;
pub mod samples;
pub mod schema;

pub use config::CheckConfig;
pub use error::{CheckError, Result};
pub use evaluate::{CheckObserver, Checker, Section, Silent, TracingObserver, Verdict};
pub use schema::{PropertyCheck, SchemaPropertySet, check_properties, check_properties_with};

/// The custom resource whose schema a cluster's installed CRD is expected to match.
#[derive(CustomResource, Debug, Serialize, Deserialize, Default, Clone, JsonSchema)]
#[kube(
    group = "example.com",
    version = "v1",
    kind = "MyCustomResource",
    namespaced,
    status = "MyCustomResourceStatus"
)]
pub struct MyCustomResourceSpec {
    pub foo: String,
    pub bar: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema, Default)]
pub struct MyCustomResourceStatus {
    pub message: String,
    pub ready: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::CustomResourceExt;

    #[test]
    fn generated_crd_is_up_to_date_with_builtin_expectations() {
        let crd = MyCustomResource::crd();
        let verdict = Checker::default().evaluate(&crd, &mut Silent);
        assert_eq!(verdict, Verdict::UpToDate);
    }

    #[test]
    fn derived_config_covers_builtin_property_names() {
        let derived = CheckConfig::for_resource::<MyCustomResource>()
            .expect("generated CRD has spec and status schemas");
        let builtin = CheckConfig::default();

        assert_eq!(derived.target_version, builtin.target_version);
        assert!(
            derived
                .expected_spec_properties
                .keys()
                .eq(builtin.expected_spec_properties.keys())
        );
        assert!(
            derived
                .expected_status_properties
                .keys()
                .eq(builtin.expected_status_properties.keys())
        );
    }

    #[test]
    fn crd_name_matches_generated_manifest_file() {
        assert_eq!(MyCustomResource::crd_name(), "mycustomresources.example.com");
    }
}
