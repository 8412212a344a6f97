use std::fmt;

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::{
    CustomResourceDefinition, JSONSchemaProps,
};
use tracing::{info, instrument, warn};

use crate::config::CheckConfig;
use crate::document;
use crate::schema::{SchemaPropertySet, check_properties_with};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Spec,
    Status,
}

impl Section {
    pub fn key(self) -> &'static str {
        match self {
            Section::Spec => "spec",
            Section::Status => "status",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    UpToDate,
    OutOfDate {
        missing_spec: Vec<String>,
        missing_status: Vec<String>,
    },
    Unparseable {
        reason: String,
    },
    SectionMissing(Section),
    VersionNotFound,
}

impl Verdict {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Verdict::UpToDate)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::UpToDate => f.write_str("schema is up-to-date"),
            Verdict::OutOfDate {
                missing_spec,
                missing_status,
            } => {
                f.write_str("schema is out-of-date")?;
                if !missing_spec.is_empty() {
                    write!(f, "; spec is missing [{}]", missing_spec.join(", "))?;
                }
                if !missing_status.is_empty() {
                    write!(f, "; status is missing [{}]", missing_status.join(", "))?;
                }
                Ok(())
            }
            Verdict::Unparseable { reason } => write!(f, "document could not be parsed: {reason}"),
            Verdict::SectionMissing(section) => write!(f, "schema is missing the '{section}' property"),
            Verdict::VersionNotFound => f.write_str("target version schema not found"),
        }
    }
}

/// Receives the audit trail of a check as it runs.
pub trait CheckObserver {
    fn section_started(&mut self, _section: Section) {}

    fn property(&mut self, _section: Section, _name: &str, _found: bool) {}

    fn section_missing(&mut self, _section: Section) {}

    fn version_not_found(&mut self, _version: &str) {}

    fn verdict(&mut self, _document: &str, _verdict: &Verdict) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl CheckObserver for Silent {}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CheckObserver for TracingObserver {
    fn section_started(&mut self, section: Section) {
        info!("Checking if CRD {section} schema is up-to-date");
    }

    fn property(&mut self, section: Section, name: &str, found: bool) {
        if found {
            info!(%section, "OK: Property '{name}' found in CRD schema");
        } else {
            warn!(%section, "FAIL: Expected property '{name}' not found in CRD schema");
        }
    }

    fn section_missing(&mut self, section: Section) {
        warn!("CRD schema is missing '{section}' property");
    }

    fn version_not_found(&mut self, version: &str) {
        warn!("Could not find {version} schema in the CRD");
    }

    fn verdict(&mut self, document: &str, verdict: &Verdict) {
        if verdict.is_up_to_date() {
            info!(document, "Conclusion: {verdict}");
        } else {
            warn!(document, "Conclusion: {verdict}");
        }
    }
}

/// A version without a schema is indistinguishable from an absent version.
pub(crate) fn schema_for_version<'a>(
    crd: &'a CustomResourceDefinition,
    version: &str,
) -> Option<&'a JSONSchemaProps> {
    crd.spec
        .versions
        .iter()
        .find(|v| v.name == version)?
        .schema
        .as_ref()?
        .open_api_v3_schema
        .as_ref()
}

#[derive(Debug, Clone, Default)]
pub struct Checker {
    config: CheckConfig,
}

impl Checker {
    pub fn new(config: CheckConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// A missing `spec` section ends the check before `status` is looked at.
    pub fn evaluate<O>(&self, crd: &CustomResourceDefinition, observer: &mut O) -> Verdict
    where
        O: CheckObserver + ?Sized,
    {
        let version = self.config.target_version.as_str();
        let Some(schema) = schema_for_version(crd, version) else {
            observer.version_not_found(version);
            return Verdict::VersionNotFound;
        };

        let missing_spec = match self.check_section(schema, Section::Spec, observer) {
            Some(missing) => missing,
            None => return Verdict::SectionMissing(Section::Spec),
        };
        let missing_status = match self.check_section(schema, Section::Status, observer) {
            Some(missing) => missing,
            None => return Verdict::SectionMissing(Section::Status),
        };

        if missing_spec.is_empty() && missing_status.is_empty() {
            Verdict::UpToDate
        } else {
            Verdict::OutOfDate {
                missing_spec,
                missing_status,
            }
        }
    }

    fn check_section<O>(
        &self,
        schema: &JSONSchemaProps,
        section: Section,
        observer: &mut O,
    ) -> Option<Vec<String>>
    where
        O: CheckObserver + ?Sized,
    {
        observer.section_started(section);
        let Some(section_schema) = schema
            .properties
            .as_ref()
            .and_then(|props| props.get(section.key()))
        else {
            observer.section_missing(section);
            return None;
        };

        let empty = SchemaPropertySet::new();
        let actual = section_schema.properties.as_ref().unwrap_or(&empty);
        let check = check_properties_with(actual, self.config.expected(section), |name, found| {
            observer.property(section, name, found)
        });
        Some(check.missing)
    }

    /// A document that cannot be parsed yields [`Verdict::Unparseable`].
    #[instrument(skip(self, yaml, observer))]
    pub fn check_yaml<O>(&self, name: &str, yaml: &str, observer: &mut O) -> Verdict
    where
        O: CheckObserver + ?Sized,
    {
        let verdict = match document::parse_yaml(yaml) {
            Ok(crd) => self.evaluate(&crd, observer),
            Err(err) => Verdict::Unparseable {
                reason: err.to_string(),
            },
        };
        observer.verdict(name, &verdict);
        verdict
    }
}
