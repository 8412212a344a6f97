use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use kube::CustomResourceExt;
use resources::{CheckConfig, CheckObserver, Checker, MyCustomResource, TracingObserver, Verdict};
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

mod results;

#[derive(Parser)]
#[command(
    name = "crd-check",
    version,
    about = "Checks whether installed CRD schemas declare the properties a controller expects"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check CRD documents; the built-in samples are checked when no file is given.
    Check(CheckArgs),
    /// Print the generated CRD of the reference custom resource.
    Crd,
    /// Write the greeting to stdout and to timestamped files.
    Hello {
        #[arg(long, default_value = "results")]
        dir: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
struct CheckArgs {
    files: Vec<PathBuf>,

    /// YAML file overriding the target version or expected property tables.
    #[arg(long, conflicts_with_all = ["reference", "from_resource"])]
    config: Option<PathBuf>,

    /// Take the expected properties from this up-to-date CRD.
    #[arg(long, conflicts_with = "from_resource")]
    reference: Option<PathBuf>,

    /// Take the expected properties from the CRD generated for MyCustomResource.
    #[arg(long)]
    from_resource: bool,

    #[arg(long)]
    target_version: Option<String>,

    /// Exit with status 1 unless every document is up-to-date.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    checked: usize,
    not_up_to_date: usize,
}

impl Summary {
    fn record(&mut self, up_to_date: bool) {
        self.checked += 1;
        if !up_to_date {
            self.not_up_to_date += 1;
        }
    }

    fn passes(&self, strict: bool) -> bool {
        !strict || self.not_up_to_date == 0
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Check(args) => match check(&args, &mut TracingObserver) {
            Ok(summary) if summary.passes(args.strict) => ExitCode::SUCCESS,
            Ok(_) => ExitCode::FAILURE,
            Err(err) => {
                error!("{err:#}");
                ExitCode::FAILURE
            }
        },
        Commands::Crd => match serde_yaml::to_string(&MyCustomResource::crd()) {
            Ok(yaml) => {
                print!("{yaml}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!("Failed to serialize CRD: {err}");
                ExitCode::FAILURE
            }
        },
        Commands::Hello { dir } => {
            match results::write_results(&dir, chrono::Local::now(), &mut std::io::stdout()) {
                Ok(_) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("{err:#}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn load_config(args: &CheckArgs) -> Result<CheckConfig> {
    let version = args.target_version.as_deref();
    let mut config = if let Some(path) = &args.config {
        CheckConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?
    } else if let Some(path) = &args.reference {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference CRD {}", path.display()))?;
        let crd = resources::document::parse_yaml(&yaml)
            .with_context(|| format!("Failed to parse reference CRD {}", path.display()))?;
        let version = version.unwrap_or(resources::config::DEFAULT_TARGET_VERSION);
        CheckConfig::from_crd(&crd, version).ok_or_else(|| {
            anyhow!(
                "Reference CRD {} has no {version} schema with spec and status",
                path.display()
            )
        })?
    } else if args.from_resource {
        CheckConfig::for_resource::<MyCustomResource>()
            .ok_or_else(|| anyhow!("Generated CRD has no spec and status schema"))?
    } else {
        CheckConfig::default()
    };
    if let Some(version) = version {
        config.target_version = version.to_string();
    }
    Ok(config)
}

fn check(args: &CheckArgs, observer: &mut impl CheckObserver) -> Result<Summary> {
    let checker = Checker::new(load_config(args)?);
    let mut summary = Summary::default();

    info!("Starting mock controller to check CRD definitions");
    if args.files.is_empty() {
        for (name, yaml) in resources::samples::builtin() {
            info!("===== Running Check for: {name} =====");
            summary.record(checker.check_yaml(name, yaml, observer).is_up_to_date());
        }
    } else {
        for path in &args.files {
            check_file(&checker, path, observer, &mut summary);
        }
    }
    Ok(summary)
}

/// Checks every document in `path`. An unreadable file counts as one document
/// that is not up-to-date.
#[instrument(skip(checker, observer, summary))]
fn check_file(
    checker: &Checker,
    path: &Path,
    observer: &mut impl CheckObserver,
    summary: &mut Summary,
) {
    let yaml = match std::fs::read_to_string(path) {
        Ok(yaml) => yaml,
        Err(err) => {
            error!("Failed to read {}: {err}", path.display());
            summary.record(false);
            return;
        }
    };

    for (index, document) in resources::document::parse_yaml_stream(&yaml)
        .into_iter()
        .enumerate()
    {
        let fallback = format!("{}#{index}", path.display());
        let (name, verdict) = match document {
            Ok(crd) => {
                let name = crd.metadata.name.clone().unwrap_or(fallback);
                info!("===== Running Check for: {name} =====");
                (name, checker.evaluate(&crd, observer))
            }
            Err(err) => (
                fallback,
                Verdict::Unparseable {
                    reason: err.to_string(),
                },
            ),
        };
        observer.verdict(&name, &verdict);
        summary.record(verdict.is_up_to_date());
    }
}
