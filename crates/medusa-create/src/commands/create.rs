//! The create flow: prompts, database provisioning, starter clone, project
//! preparation, and server launch
//!
//! Steps run strictly in sequence. One cancellation token, cancelled by a
//! ctrl-c watcher, reaches every child process, the facts ticker, and the
//! health poller, so an interrupt stops whatever is currently in flight.

use anyhow::Result;
use camino::Utf8PathBuf;
use indicatif::ProgressBar;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use medusa_setup::db::{self, DatabaseCredentials};
use medusa_setup::facts::FactsTicker;
use medusa_setup::git::{self, CloneOptions};
use medusa_setup::project::{self, InstallOptions, InstallOutcome, SeedOutcome};
use medusa_setup::server;
use medusa_setup::{DatabaseMode, Error};

use crate::cli::Cli;
use crate::output;
use crate::prompts;

pub async fn run(args: Cli) -> Result<()> {
    output::header("Create a new Medusa project");

    let config = prompts::project_config()?;

    // Single interrupt signal fanned out to every cancellable step
    let cancel = CancellationToken::new();
    spawn_interrupt_watcher(cancel.clone());

    // Try the default credentials first; re-prompt and retry exactly once
    // before giving up.
    let mut credentials = DatabaseCredentials::default();
    let mut client = match config.database {
        DatabaseMode::Local => match db::connect(&credentials).await {
            Ok(client) => client,
            Err(e) => {
                debug!("Default credentials rejected: {}", e);
                output::info("Couldn't log into PostgreSQL with the default credentials.");
                credentials = prompts::database_credentials()?;
                db::connect(&credentials).await?
            }
        },
    };

    output::info(
        "Create an admin user to access the admin dashboard after the setup is complete.",
    );
    let admin = prompts::admin_account(args.seed)?;

    let spinner = output::spinner("Setting up project...");
    // Fatal errors propagate with `?`; the guard clears the steady tick so
    // the error message isn't printed over a live spinner line.
    let _spinner_guard = SpinnerGuard(spinner.clone());

    // Clone the starter template
    spinner.set_message("Cloning starter template...");
    let mut clone_options = CloneOptions::default();
    if let Some(repo_url) = args.repo_url {
        clone_options.repo_url = repo_url;
        clone_options.branch = args.branch;
    } else if args.branch.is_some() {
        clone_options.branch = args.branch;
    }
    let directory = Utf8PathBuf::from(config.name.as_str());
    git::clone_starter(&directory, &clone_options, &cancel).await?;
    spinner.suspend(|| output::success("Created project directory"));

    // Provision the database
    spinner.set_message("Creating database...");
    let db_name = db::generate_database_name();
    db::create_database(&mut client, &db_name).await?;
    let connection_string = db::format_connection_string(
        &credentials.username,
        &credentials.password,
        &credentials.host,
        &db_name,
    );
    spinner.suspend(|| output::success(&format!("Database {db_name} created")));

    // Prepare the project
    spinner.set_message("Preparing project...");
    project::write_env(&directory, &connection_string)?;

    spinner.set_message("Installing dependencies...");
    let ticker = FactsTicker::spawn(spinner.clone(), &cancel);
    let install =
        project::install_dependencies(&directory, &InstallOptions::default(), &cancel).await;
    ticker.stop().await;
    match install? {
        InstallOutcome::Installed => {
            spinner.suspend(|| output::success("Installed dependencies"));
        }
        InstallOutcome::ToleratedConflict => {
            spinner.suspend(|| {
                output::warning("Installed dependencies with a tolerated resolution conflict");
            });
        }
    }

    spinner.set_message("Running migrations...");
    project::run_migrations(&directory, &cancel).await?;
    spinner.suspend(|| output::success("Ran migrations"));

    spinner.set_message("Creating an admin user...");
    project::create_admin_user(&directory, &admin, &cancel).await?;
    spinner.suspend(|| output::success("Created admin user"));

    if args.seed {
        spinner.set_message("Seeding database with demo data...");
        match project::seed_database(&directory, &cancel).await? {
            SeedOutcome::Seeded => {
                spinner.suspend(|| output::success("Seeded database with demo data"));
            }
            SeedOutcome::SkippedMissingFile => {
                spinner.suspend(|| {
                    output::warning(
                        "Seed file was not found in the project. Skipping seeding...",
                    );
                });
            }
        }
    }

    db::close(client).await?;
    spinner.finish_and_clear();
    output::success("Project prepared");

    // Launch the dev server and hand off to the browser
    output::info("Starting Medusa...");
    let mut server_process = server::start_server(&directory)?;

    if server::wait_for_health(server::HEALTH_URL, server::HEALTH_TIMEOUT, &cancel).await {
        output::success(&format!("Your Medusa server is ready at {}", server::ADMIN_URL));
        server::open_admin_dashboard();
    } else if !cancel.is_cancelled() {
        output::warning(&format!(
            "The server hasn't reported healthy at {} yet. It may still be starting up.",
            server::HEALTH_URL
        ));
    }

    // Stay attached so server output keeps streaming; ctrl-c tears the
    // server down.
    let exit_status = tokio::select! {
        status = server_process.wait() => Some(status?),
        _ = cancel.cancelled() => None,
    };

    if exit_status.is_none() {
        debug!("Interrupt received, stopping server");
        let _ = server_process.kill().await;
        output::info("Shutting down Medusa...");
    }

    shutdown_result(exit_status)
}

/// Map the dev server's end state to the run result
///
/// An interrupt at this point arrives after setup already succeeded, so it
/// is a clean shutdown rather than a failure.
fn shutdown_result(exit_status: Option<std::process::ExitStatus>) -> Result<()> {
    match exit_status {
        Some(status) if !status.success() => Err(Error::process_failed(
            "medusa develop",
            format!("exited with {status}"),
        )
        .into()),
        _ => Ok(()),
    }
}

/// Clears the spinner on every exit path
struct SpinnerGuard(ProgressBar);

impl Drop for SpinnerGuard {
    fn drop(&mut self) {
        self.0.finish_and_clear();
    }
}

/// Cancel the shared token on the first ctrl-c
fn spawn_interrupt_watcher(cancel: CancellationToken) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            return;
        }
        cancel.cancel();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exit_status(code: i32) -> std::process::ExitStatus {
        std::process::Command::new("sh")
            .args(["-c", &format!("exit {code}")])
            .status()
            .unwrap()
    }

    #[test]
    fn test_shutdown_result_interrupt_is_clean() {
        // Ctrl-c while attached to a healthy server: setup already
        // succeeded, so the run must not report a failure.
        assert!(shutdown_result(None).is_ok());
    }

    #[test]
    fn test_shutdown_result_maps_exit_codes() {
        assert!(shutdown_result(Some(exit_status(0))).is_ok());

        let err = shutdown_result(Some(exit_status(7))).unwrap_err();
        assert!(err.to_string().contains("medusa develop"));
    }

    #[test]
    fn test_spinner_guard_clears_on_drop() {
        let spinner = ProgressBar::hidden();
        {
            let _guard = SpinnerGuard(spinner.clone());
        }
        assert!(spinner.is_finished());
    }
}
