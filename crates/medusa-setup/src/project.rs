//! Project preparation steps
//!
//! Runs inside the freshly cloned project directory: write the database
//! settings to `.env`, install dependencies (yarn with an npm fallback), run
//! migrations, create the admin user, and optionally seed demo data. Failure
//! at any step aborts the run; nothing is rolled back, the directory is left
//! on disk for inspection.

use std::fs::OpenOptions;
use std::io::Write;

use camino::Utf8Path;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::process;
use crate::types::AdminAccount;

/// Conventional location of the demo seed data inside the starter project
pub const SEED_FILE: &str = "data/seed.json";

/// Framework CLI invocation prefix, run through npx
const MEDUSA_CLI: [&str; 2] = ["-y", "@medusajs/medusa-cli@latest"];

/// A package-manager install invocation
#[derive(Debug, Clone)]
pub struct InstallCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl InstallCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Options controlling dependency installation
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Preferred package manager, tried first
    pub primary: InstallCommand,
    /// Fallback invoked once if the primary fails for a non-tolerated reason
    pub fallback: InstallCommand,
    /// Treat npm's ERESOLVE dependency-resolution conflict as non-fatal
    pub tolerate_resolution_conflicts: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            primary: InstallCommand::new("yarn", &[]),
            fallback: InstallCommand::new("npm", &["install"]),
            tolerate_resolution_conflicts: true,
        }
    }
}

/// How an installation attempt concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// A package manager completed successfully
    Installed,
    /// The install exited non-zero with a resolution conflict the caller
    /// opted to tolerate
    ToleratedConflict,
}

/// Append the database settings to the project's `.env` file
///
/// The file is created if the starter did not ship one; a missing project
/// directory is an IO error.
pub fn write_env(directory: &Utf8Path, connection_string: &str) -> Result<()> {
    let env_path = directory.join(".env");
    debug!("Appending database settings to {}", env_path);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&env_path)?;

    writeln!(file, "DATABASE_TYPE=postgres")?;
    writeln!(file, "DATABASE_URL={connection_string}")?;

    Ok(())
}

/// Install project dependencies with a package-manager fallback
///
/// The primary command runs first (skipped straight to the fallback when its
/// binary is not on PATH). A failure inside the tolerated conflict class ends
/// the step successfully; any other failure triggers the fallback exactly
/// once. A fallback failure outside the tolerated class is fatal.
pub async fn install_dependencies(
    directory: &Utf8Path,
    options: &InstallOptions,
    cancel: &CancellationToken,
) -> Result<InstallOutcome> {
    let primary_result = if which::which(&options.primary.program).is_ok() {
        run_install(&options.primary, directory, cancel).await
    } else {
        Err(Error::command_not_found(&options.primary.program))
    };

    let primary_err = match primary_result {
        Ok(()) => return Ok(InstallOutcome::Installed),
        Err(Error::Cancelled) => return Err(Error::Cancelled),
        Err(e) if is_tolerated_conflict(&e, options.tolerate_resolution_conflicts) => {
            warn!("Tolerating dependency resolution conflict from primary installer");
            return Ok(InstallOutcome::ToleratedConflict);
        }
        Err(e) => e,
    };

    info!(
        "{} failed ({}), falling back to {}",
        options.primary.program, primary_err, options.fallback.program
    );

    match run_install(&options.fallback, directory, cancel).await {
        Ok(()) => Ok(InstallOutcome::Installed),
        Err(Error::Cancelled) => Err(Error::Cancelled),
        Err(e) if is_tolerated_conflict(&e, options.tolerate_resolution_conflicts) => {
            warn!("Tolerating dependency resolution conflict from fallback installer");
            Ok(InstallOutcome::ToleratedConflict)
        }
        Err(e) => Err(Error::install_failed(e.to_string())),
    }
}

async fn run_install(
    command: &InstallCommand,
    directory: &Utf8Path,
    cancel: &CancellationToken,
) -> Result<()> {
    let args: Vec<&str> = command.args.iter().map(String::as_str).collect();
    process::run(&command.program, &args, Some(directory), cancel).await?;
    Ok(())
}

/// Whether a failed install falls into the tolerated conflict class
///
/// npm reports dependency-resolution conflicts with an ERESOLVE marker on
/// stderr; that class is known to be non-fatal for the starter project.
fn is_tolerated_conflict(error: &Error, tolerate: bool) -> bool {
    if !tolerate {
        return false;
    }
    matches!(error, Error::ProcessFailed { message, .. } if message.contains("ERESOLVE"))
}

/// Run the framework's database migrations
pub async fn run_migrations(directory: &Utf8Path, cancel: &CancellationToken) -> Result<()> {
    medusa_cli(directory, &["migrations", "run"], cancel).await
}

/// Create the admin user through the framework CLI
pub async fn create_admin_user(
    directory: &Utf8Path,
    admin: &AdminAccount,
    cancel: &CancellationToken,
) -> Result<()> {
    medusa_cli(
        directory,
        &["user", "-e", &admin.email, "-p", &admin.password],
        cancel,
    )
    .await
}

/// How the seeding step concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Demo data was seeded
    Seeded,
    /// No seed file at the conventional path; step skipped
    SkippedMissingFile,
}

/// Seed the database with the starter's demo data, if present
///
/// A missing seed file is a soft skip, not an error.
pub async fn seed_database(
    directory: &Utf8Path,
    cancel: &CancellationToken,
) -> Result<SeedOutcome> {
    if !directory.join(SEED_FILE).exists() {
        warn!("Seed file not found at {}, skipping seeding", SEED_FILE);
        return Ok(SeedOutcome::SkippedMissingFile);
    }

    medusa_cli(
        directory,
        &["seed", &format!("--seed-file={SEED_FILE}")],
        cancel,
    )
    .await?;

    Ok(SeedOutcome::Seeded)
}

/// Run a Medusa CLI subcommand through npx inside the project directory
async fn medusa_cli(
    directory: &Utf8Path,
    subcommand: &[&str],
    cancel: &CancellationToken,
) -> Result<()> {
    let mut args = MEDUSA_CLI.to_vec();
    args.extend_from_slice(subcommand);
    process::run("npx", &args, Some(directory), cancel).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_tolerated_conflict() {
        let conflict = Error::process_failed("npm", "ERESOLVE unable to resolve dependency tree");
        let other = Error::process_failed("npm", "network timeout");

        assert!(is_tolerated_conflict(&conflict, true));
        assert!(!is_tolerated_conflict(&conflict, false));
        assert!(!is_tolerated_conflict(&other, true));
        assert!(!is_tolerated_conflict(&Error::Cancelled, true));
    }

    #[test]
    fn test_default_install_options() {
        let options = InstallOptions::default();
        assert_eq!(options.primary.program, "yarn");
        assert_eq!(options.fallback.program, "npm");
        assert_eq!(options.fallback.args, vec!["install"]);
        assert!(options.tolerate_resolution_conflicts);
    }
}
