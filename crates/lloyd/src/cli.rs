//! The `lloyd` command line: argument validation, input loading and result printing.
//!
//! Failures are reported on stdout as one of three fixed messages, with exit code 1.

use crate::numeric::parse_whole_number;
use crate::{Error, KMeansConfig, VectorSet, cluster_with, write_centroids};
use clap::Parser;
use clap::error::ErrorKind;
use snafu::prelude::*;
use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CLUSTER_COUNT_MESSAGE: &str = "Incorrect number of clusters!";
pub const ITERATION_COUNT_MESSAGE: &str = "Incorrect maximum iteration!";
pub const GENERIC_MESSAGE: &str = "An Error Has Occurred";

const MIN_K: u64 = 1;
const MIN_ITER: u64 = 1;
/// Exclusive upper bound for the iteration argument.
pub const MAX_ITER_LIMIT: u64 = 1000;

#[derive(Debug, Parser)]
#[command(
    name = "lloyd",
    version,
    about = "Cluster comma-separated vectors with k-means and print the centroids"
)]
pub struct Args {
    /// Number of clusters, at least 1 and less than the number of vectors
    #[arg(allow_hyphen_values = true)]
    pub k: String,

    /// Maximum number of iterations, in [1, 1000)
    #[arg(allow_hyphen_values = true)]
    pub max_iter: Option<String>,

    /// Input file with one vector per line; reads stdin when absent
    pub input: Option<PathBuf>,
}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum CliError {
    #[snafu(display("invalid number of clusters: {arg:?}"))]
    InvalidClusterCount { arg: String },

    #[snafu(display("invalid maximum iteration: {arg:?}"))]
    InvalidIterationCount { arg: String },

    #[snafu(display("invalid arguments"))]
    Usage { source: clap::Error },

    #[snafu(display("failed to read {path}"))]
    ReadInput { source: io::Error, path: String },

    #[snafu(display("failed to write output"))]
    WriteOutput { source: io::Error },

    #[snafu(display("clustering failed"))]
    Clustering { source: Error },
}

impl CliError {
    /// The fixed text shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            CliError::InvalidClusterCount { .. }
            | CliError::Clustering {
                source: Error::InvalidClusterCount { .. },
            } => CLUSTER_COUNT_MESSAGE,
            CliError::InvalidIterationCount { .. }
            | CliError::Clustering {
                source: Error::InvalidIterationCount { .. },
            } => ITERATION_COUNT_MESSAGE,
            _ => GENERIC_MESSAGE,
        }
    }
}

fn parse_cluster_count(arg: &str) -> Result<usize, CliError> {
    parse_whole_number(arg)
        .filter(|&k| k >= MIN_K)
        .and_then(|k| usize::try_from(k).ok())
        .context(InvalidClusterCountSnafu { arg })
}

fn parse_iteration_count(arg: &str) -> Result<usize, CliError> {
    parse_whole_number(arg)
        .filter(|&n| (MIN_ITER..MAX_ITER_LIMIT).contains(&n))
        .and_then(|n| usize::try_from(n).ok())
        .context(InvalidIterationCountSnafu { arg })
}

fn read_input(path: Option<&Path>, mut stdin: impl Read) -> Result<String, CliError> {
    match path {
        Some(path) => std::fs::read_to_string(path).context(ReadInputSnafu {
            path: path.display().to_string(),
        }),
        None => {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context(ReadInputSnafu { path: "<stdin>" })?;
            Ok(text)
        }
    }
}

/// Parse `args` (including the program name), cluster the input and print the centroids.
pub fn run<I, T>(args: I, stdin: impl Read, stdout: &mut impl Write) -> Result<(), CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match Args::try_parse_from(args) {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            write!(stdout, "{}", e.render()).context(WriteOutputSnafu)?;
            return Ok(());
        }
        Err(e) => return Err(e).context(UsageSnafu),
    };

    let k = parse_cluster_count(&args.k)?;
    let max_iter = match &args.max_iter {
        Some(arg) => parse_iteration_count(arg)?,
        None => crate::DEFAULT_MAX_ITER,
    };

    let text = read_input(args.input.as_deref(), stdin)?;
    let vectors = VectorSet::parse(&text).context(ClusteringSnafu)?;
    debug!(
        n = vectors.len(),
        dim = vectors.dim(),
        k,
        max_iter,
        "loaded vectors"
    );

    let config = KMeansConfig::new(k).with_max_iter(max_iter);
    let clustering = cluster_with(&vectors, &config).context(ClusteringSnafu)?;

    write_centroids(stdout, &clustering.centroids).context(WriteOutputSnafu)
}

/// [`run`], with failures turned into the user-facing message and an exit code.
pub fn main_with<I, T>(args: I, stdin: impl Read, stdout: &mut impl Write) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match run(args, stdin, stdout) {
        Ok(()) => 0,
        Err(e) => {
            debug!(error = %snafu::Report::from_error(&e), "run failed");
            // Nothing more can be reported if stdout itself is gone
            let _ = writeln!(stdout, "{}", e.user_message());
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run_with(args: &[&str], input: &str) -> (u8, String) {
        let mut out = Vec::new();
        let argv = std::iter::once("lloyd").chain(args.iter().copied());
        let code = main_with(argv, input.as_bytes(), &mut out);
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn clusters_stdin() {
        let (code, out) = run_with(&["2", "10"], "0,0\n10,0\n0,1\n10,1\n");
        assert_eq!(code, 0);
        assert_eq!(out, "0.0000,0.5000\n10.0000,0.5000\n");
    }

    #[test]
    fn seeds_follow_input_order() {
        let (code, out) = run_with(&["2", "10"], "0,0\n0,1\n10,0\n10,1\n");
        assert_eq!(code, 0);
        assert_eq!(out, "5.0000,0.0000\n5.0000,1.0000\n");
    }

    #[test]
    fn default_iterations() {
        let (code, out) = run_with(&["1"], "1,2\n3,4\n");
        assert_eq!(code, 0);
        assert_eq!(out, "2.0000,3.0000\n");
    }

    #[test]
    fn reads_file_argument() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "0\n10\n\n0\n10\n").unwrap();
        let path = file.path().to_str().unwrap();

        let (code, out) = run_with(&["2", "100", path], "ignored,stdin\n");
        assert_eq!(code, 0);
        assert_eq!(out, "0.0000\n10.0000\n");
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");

        let (code, out) = run_with(&["2", "100", path.to_str().unwrap()], "");
        assert_eq!(code, 1);
        assert_eq!(out, "An Error Has Occurred\n");
    }

    #[test]
    fn malformed_input() {
        let (code, out) = run_with(&["1"], "1,a\n2,3\n");
        assert_eq!(code, 1);
        assert_eq!(out, "An Error Has Occurred\n");
    }

    #[test]
    fn empty_input() {
        let (code, out) = run_with(&["1"], "\n\n");
        assert_eq!(code, 1);
        assert_eq!(out, "An Error Has Occurred\n");
    }

    #[test]
    fn dimension_mismatch() {
        let (code, out) = run_with(&["1"], "1,2\n3\n");
        assert_eq!(code, 1);
        assert_eq!(out, "An Error Has Occurred\n");
    }

    #[test]
    fn empty_cluster() {
        let (code, out) = run_with(&["2"], "0\n0\n5\n");
        assert_eq!(code, 1);
        assert_eq!(out, "An Error Has Occurred\n");
    }

    #[test]
    fn invalid_cluster_count() {
        for k in ["0", "-1", "2.5", "abc", "nan", "inf", ""] {
            let (code, out) = run_with(&[k], "1\n2\n3\n");
            assert_eq!(code, 1, "k = {k:?}");
            assert_eq!(out, "Incorrect number of clusters!\n", "k = {k:?}");
        }
    }

    #[test]
    fn hyphenated_cluster_count() {
        // Reaches argument validation instead of being read as an unknown flag
        for k in ["-inf", "-nan", "-x", "-abc", "-1e999"] {
            let (code, out) = run_with(&[k], "1\n2\n3\n");
            assert_eq!(code, 1, "k = {k:?}");
            assert_eq!(out, "Incorrect number of clusters!\n", "k = {k:?}");
        }
    }

    #[test]
    fn cluster_count_not_below_vector_count() {
        let (code, out) = run_with(&["3"], "1\n2\n3\n");
        assert_eq!(code, 1);
        assert_eq!(out, "Incorrect number of clusters!\n");

        let (code, _) = run_with(&["2"], "1\n2\n3\n");
        assert_eq!(code, 0);
    }

    #[test]
    fn float_form_integers() {
        let (code, out) = run_with(&["1.0", "5.0"], "1\n3\n");
        assert_eq!(code, 0);
        assert_eq!(out, "2.0000\n");
    }

    #[test]
    fn invalid_iteration_count() {
        for it in ["0", "1000", "2.5", "x", "-3", "inf"] {
            let (code, out) = run_with(&["1", it], "1\n2\n3\n");
            assert_eq!(code, 1, "max_iter = {it:?}");
            assert_eq!(out, "Incorrect maximum iteration!\n", "max_iter = {it:?}");
        }
    }

    #[test]
    fn hyphenated_iteration_count() {
        for it in ["-abc", "-inf", "-x", "-1"] {
            let (code, out) = run_with(&["1", it], "1\n2\n3\n");
            assert_eq!(code, 1, "max_iter = {it:?}");
            assert_eq!(out, "Incorrect maximum iteration!\n", "max_iter = {it:?}");
        }
    }

    #[test]
    fn iteration_count_bounds() {
        for it in ["1", "999"] {
            let (code, _) = run_with(&["1", it], "1\n2\n3\n");
            assert_eq!(code, 0, "max_iter = {it:?}");
        }
    }

    #[test]
    fn cluster_count_checked_before_input() {
        // Argument errors win even when the input is broken
        let (_, out) = run_with(&["0"], "not,numbers\n");
        assert_eq!(out, "Incorrect number of clusters!\n");
    }

    #[test]
    fn usage_errors() {
        let (code, out) = run_with(&[], "1\n2\n");
        assert_eq!(code, 1);
        assert_eq!(out, "An Error Has Occurred\n");

        let (code, out) = run_with(&["1", "2", "in.txt", "extra"], "1\n2\n");
        assert_eq!(code, 1);
        assert_eq!(out, "An Error Has Occurred\n");
    }

    #[test]
    fn help() {
        let (code, out) = run_with(&["--help"], "");
        assert_eq!(code, 0);
        assert!(out.contains("Number of clusters"));

        let (code, out) = run_with(&["-h"], "");
        assert_eq!(code, 0);
        assert!(out.contains("Number of clusters"));
    }

    #[test]
    fn identical_runs_identical_output() {
        let input = "1,1\n9,9\n1.2,0.8\n8.5,9.1\n0.9,1.3\n9.4,8.8\n";
        assert_eq!(run_with(&["2"], input), run_with(&["2"], input));
    }

    #[test]
    fn user_messages() {
        let err = CliError::Clustering {
            source: Error::EmptyInput,
        };
        assert_eq!(err.user_message(), GENERIC_MESSAGE);

        let err = CliError::Clustering {
            source: Error::InvalidClusterCount { k: 4, n: 4 },
        };
        assert_eq!(err.user_message(), CLUSTER_COUNT_MESSAGE);

        let err = CliError::Clustering {
            source: Error::InvalidIterationCount { max_iter: 0 },
        };
        assert_eq!(err.user_message(), ITERATION_COUNT_MESSAGE);
    }
}
