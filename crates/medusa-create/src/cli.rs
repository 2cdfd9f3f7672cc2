//! CLI argument parsing with clap

use clap::Parser;

/// Create a new Medusa project
#[derive(Parser, Debug)]
#[command(name = "create-medusa-app")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Starter template repository URL
    #[arg(long)]
    pub repo_url: Option<String>,

    /// Branch of the starter template to clone
    #[arg(long)]
    pub branch: Option<String>,

    /// Seed the database with demo data after setup
    #[arg(long)]
    pub seed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_asserts() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["create-medusa-app"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(!cli.seed);
        assert!(cli.repo_url.is_none());
        assert!(cli.branch.is_none());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "create-medusa-app",
            "--seed",
            "--repo-url",
            "https://github.com/acme/starter",
            "-vv",
        ]);
        assert!(cli.seed);
        assert_eq!(
            cli.repo_url.as_deref(),
            Some("https://github.com/acme/starter")
        );
        assert_eq!(cli.verbose, 2);
    }
}
