//! Command-line arguments for the contact desk.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::{Parser, Subcommand};

use crate::model::submission::DEFAULT_SUBMIT_DELAY;
use crate::model::validation::FormKind;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory holding the saved draft.
    #[clap(long, default_value = ".contact")]
    pub store_dir: String,

    /// Which form variant to validate.
    #[clap(long, value_enum, default_value_t = FormKind::Detailed)]
    pub kind: FormKind,

    /// Action to perform.
    #[command(subcommand)]
    pub command: Action,
}

/// Contact desk actions.
#[derive(Debug, Subcommand)]
pub enum Action {
    /// Print the saved draft and any validation errors.
    Show,
    /// Set one or more fields (`field=value`) and save the draft.
    Set {
        /// Assignments such as `name=Asha` or `propertyType="Luxury Villa"`.
        #[arg(required = true)]
        assignments: Vec<String>,
    },
    /// Read `field=value` lines from stdin, autosaving as you type.
    Edit,
    /// Validate and submit the draft.
    Submit {
        /// Simulated network latency in milliseconds.
        #[clap(long, default_value_t = DEFAULT_SUBMIT_DELAY.as_millis() as u64)]
        delay_ms: u64,
        /// Share of submissions that fail, 0.0 to 1.0.
        #[clap(long, default_value_t = 0.0)]
        failure_rate: f64,
    },
    /// Remove the saved draft.
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn submit_defaults_to_simulated_latency() {
        let args = Args::try_parse_from(["contact_form", "submit"]).unwrap();
        assert_eq!(args.kind, FormKind::Detailed);
        match args.command {
            Action::Submit {
                delay_ms,
                failure_rate,
            } => {
                assert_eq!(Duration::from_millis(delay_ms), DEFAULT_SUBMIT_DELAY);
                assert_eq!(failure_rate, 0.0);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }
}
