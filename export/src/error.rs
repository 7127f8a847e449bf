//! Error taxonomy for the export engine.
//!
//! Three levels, mirroring the propagation policy: a [`DescribeError`] is one
//! option failing, an [`AggregateError`] is a command node failing as a unit
//! because at least one of its options did, and a broken child subtree is
//! carried separately by the walker rather than aborting the parent. All
//! operations are pure in-memory reads, so nothing here is retried.

use thiserror::Error;

use cmdtree_core::FlagError;

/// Failure to describe a single option.
#[derive(Debug, Error)]
pub enum DescribeError {
    /// No value accessor is registered for the raw type tag. Permanent; the
    /// unmatched tag is surfaced for diagnosis.
    #[error("no value accessor registered for type '{0}'")]
    UnsupportedType(String),
    /// A registered accessor failed against the option's value.
    #[error("reading value of option '{option}' failed: {source}")]
    Extraction {
        option: String,
        #[source]
        source: FlagError,
    },
}

/// One failed option within an [`AggregateError`].
#[derive(Debug)]
pub struct OptionFailure {
    /// Name of the option that failed to describe.
    pub option: String,
    /// Why it failed.
    pub cause: DescribeError,
}

/// One or more options on a single command failed to describe.
///
/// The command's node is discarded as a unit; nothing partial is kept.
#[derive(Debug, Error)]
#[error("command '{command}': {} option(s) could not be described", failures.len())]
pub struct AggregateError {
    /// Name of the failing command.
    pub command: String,
    /// Every failing option, in declaration order.
    pub failures: Vec<OptionFailure>,
}

impl AggregateError {
    /// Multi-line rendering listing each failing option and its cause.
    pub fn detail(&self) -> String {
        let mut out = self.to_string();
        for failure in &self.failures {
            out.push_str(&format!("\n  {}: {}", failure.option, failure.cause));
        }
        out
    }
}
