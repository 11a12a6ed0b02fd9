//! Command-line interface definitions.
//!
//! Defines all CLI arguments using clap.

use clap::Parser;
use std::path::PathBuf;

/// A really simple static site generator
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the project manifest (project.yaml)
    pub project_path: PathBuf,

    /// Output directory
    #[arg(short, long)]
    pub output: PathBuf,

    /// Wipe the output directory before building
    #[arg(short, long)]
    pub force: bool,

    /// Wipe the output directory before building (same as --force)
    #[arg(short = 'c', long = "clean-build")]
    pub clean_build: bool,

    /// Rebuild whenever a file under the project directory changes
    #[arg(short, long)]
    pub watch: bool,
}

impl Cli {
    /// Clean mode is active for --force, --clean-build, and the first
    /// build in watch mode.
    pub const fn is_clean_build(&self) -> bool {
        self.force || self.clean_build || self.watch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_invocation() {
        let cli = Cli::try_parse_from(["anvil", "site", "-o", "out"]).unwrap();
        assert_eq!(cli.project_path, PathBuf::from("site"));
        assert_eq!(cli.output, PathBuf::from("out"));
        assert!(!cli.is_clean_build());
    }

    #[test]
    fn output_is_required() {
        assert!(Cli::try_parse_from(["anvil", "site"]).is_err());
    }

    #[test]
    fn force_and_clean_build_are_synonyms() {
        let force = Cli::try_parse_from(["anvil", "site", "-o", "out", "--force"]).unwrap();
        let clean = Cli::try_parse_from(["anvil", "site", "-o", "out", "--clean-build"]).unwrap();
        assert!(force.is_clean_build());
        assert!(clean.is_clean_build());
    }

    #[test]
    fn short_flags_accepted() {
        let cli = Cli::try_parse_from(["anvil", "site", "-o", "out", "-f", "-c", "-w"]).unwrap();
        assert!(cli.force);
        assert!(cli.clean_build);
        assert!(cli.watch);
    }

    #[test]
    fn watch_implies_clean_first_build() {
        let cli = Cli::try_parse_from(["anvil", "site", "-o", "out", "--watch"]).unwrap();
        assert!(cli.watch);
        assert!(cli.is_clean_build());
    }
}
