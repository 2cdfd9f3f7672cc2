//! Interactive prompt flows
//!
//! Validation failures are handled inline by dialoguer (the user is simply
//! re-prompted); nothing in this module propagates a validation error.

use anyhow::Result;
use dialoguer::{Input, Password, Select};

use medusa_setup::db::DatabaseCredentials;
use medusa_setup::types::{is_valid_email, slugify};
use medusa_setup::{AdminAccount, DatabaseMode, ProjectConfig};

use crate::output;

/// Default project name offered at the prompt
const DEFAULT_PROJECT_NAME: &str = "my-medusa-store";

/// Default admin email offered when not seeding demo data
const DEFAULT_ADMIN_EMAIL: &str = "admin@medusa-test.com";

/// Ask for the project name and database mode
pub fn project_config() -> Result<ProjectConfig> {
    let name: String = Input::new()
        .with_prompt("What's the name of your project?")
        .default(DEFAULT_PROJECT_NAME.to_string())
        .validate_with(|input: &String| validate_project_name(input))
        .interact_text()?;

    let database = database_mode()?;

    Ok(ProjectConfig {
        name: slugify(&name),
        database,
    })
}

/// Ask whether to use a local or remote database
///
/// Remote provisioning isn't available yet; picking it re-prompts.
fn database_mode() -> Result<DatabaseMode> {
    loop {
        let selection = Select::new()
            .with_prompt("Do you want to use a local or remote database?")
            .items(&[
                "Local (requires PostgreSQL to be installed)",
                "Set up remote PostgreSQL (coming soon)",
            ])
            .default(0)
            .interact()?;

        match selection {
            0 => return Ok(DatabaseMode::Local),
            _ => output::info("Remote database setup isn't available yet."),
        }
    }
}

/// Ask for explicit PostgreSQL credentials after the default login failed
pub fn database_credentials() -> Result<DatabaseCredentials> {
    let username: String = Input::new()
        .with_prompt("Enter your Postgres username")
        .default("postgres".to_string())
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Err("Please enter a username")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let password = Password::new()
        .with_prompt("Enter your Postgres password")
        .allow_empty_password(true)
        .interact()?;

    Ok(DatabaseCredentials {
        username,
        password,
        ..DatabaseCredentials::default()
    })
}

/// Ask for the admin account created after migrations
pub fn admin_account(seeding: bool) -> Result<AdminAccount> {
    let mut email_prompt = Input::new()
        .with_prompt("Enter your admin email")
        .validate_with(|input: &String| validate_admin_email(input));

    // The demo seed ships its own admin user, so only offer the default
    // address for plain setups.
    if !seeding {
        email_prompt = email_prompt.default(DEFAULT_ADMIN_EMAIL.to_string());
    }

    let email: String = email_prompt.interact_text()?;

    let password = Password::new()
        .with_prompt("Enter your admin password")
        .interact()?;

    Ok(AdminAccount { email, password })
}

/// Validate a project name: non-empty after slugification and not colliding
/// with an existing directory
fn validate_project_name(input: &str) -> Result<(), &'static str> {
    validate_project_name_in(std::path::Path::new("."), input)
}

fn validate_project_name_in(base: &std::path::Path, input: &str) -> Result<(), &'static str> {
    let slug = slugify(input);

    if slug.is_empty() {
        return Err("Please enter a project name");
    }

    if base.join(&slug).is_dir() {
        return Err(
            "A directory already exists with the same name. Please enter a different project name.",
        );
    }

    Ok(())
}

/// Validate an admin email address
fn validate_admin_email(input: &str) -> Result<(), &'static str> {
    if is_valid_email(input) {
        Ok(())
    } else {
        Err("Please enter a valid email")
    }
}
