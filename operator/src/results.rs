use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::{info, instrument};

pub const LINES: [&str; 2] = ["Hello, World!", "Results written by crd-check."];

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug)]
pub struct ResultFiles {
    pub output: PathBuf,
    pub error: PathBuf,
}

/// Writes [`LINES`] to `out` and to a timestamped output file in `dir`, next
/// to an empty error file with the same timestamp.
#[instrument(skip(out))]
pub fn write_results(
    dir: &Path,
    timestamp: DateTime<Local>,
    out: &mut impl Write,
) -> Result<ResultFiles> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create results directory {}", dir.display()))?;

    let stamp = timestamp.format(TIMESTAMP_FORMAT);
    let files = ResultFiles {
        output: dir.join(format!("output_{stamp}.txt")),
        error: dir.join(format!("error_{stamp}.txt")),
    };

    let mut output = fs::File::create(&files.output)
        .with_context(|| format!("Failed to create output file {}", files.output.display()))?;
    fs::File::create(&files.error)
        .with_context(|| format!("Failed to create error file {}", files.error.display()))?;

    for line in LINES {
        writeln!(out, "{line}").context("Failed to write to stdout")?;
        writeln!(output, "{line}")
            .with_context(|| format!("Failed to write {}", files.output.display()))?;
    }

    info!(output = %files.output.display(), "Results written");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn writes_output_and_empty_error_file() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("results");
        let timestamp = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let mut stdout = Vec::new();

        let files = write_results(&results, timestamp, &mut stdout).unwrap();

        assert_eq!(files.output, results.join("output_20240309_140507.txt"));
        assert_eq!(files.error, results.join("error_20240309_140507.txt"));
        let expected = "Hello, World!\nResults written by crd-check.\n";
        assert_eq!(fs::read_to_string(&files.output).unwrap(), expected);
        assert_eq!(String::from_utf8(stdout).unwrap(), expected);
        assert_eq!(fs::read_to_string(&files.error).unwrap(), "");
    }

    #[test]
    fn fails_when_directory_cannot_be_created() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("results");
        fs::write(&blocker, "not a directory").unwrap();

        let err = write_results(&blocker, Local::now(), &mut Vec::new()).unwrap_err();

        assert!(err.to_string().contains("Failed to create results directory"));
    }
}
