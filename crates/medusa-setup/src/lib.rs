//! # medusa-setup
//!
//! Setup library for the `create-medusa-app` CLI providing:
//! - Cancellable external-process execution
//! - Starter-template cloning
//! - Local PostgreSQL provisioning
//! - Project preparation (dependencies, migrations, admin user, seeding)
//! - Dev-server launch and readiness polling
//!
//! Every long-running operation takes a [`tokio_util::sync::CancellationToken`]
//! so a single interrupt can stop in-flight child processes and timers.
//!
//! # Examples
//!
//! ## Clone the starter template
//!
//! ```no_run
//! use medusa_setup::git::{clone_starter, CloneOptions};
//! use camino::Utf8Path;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = CloneOptions::default();
//! let token = CancellationToken::new();
//! clone_starter(Utf8Path::new("my-medusa-store"), &options, &token).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Provision a database
//!
//! ```no_run
//! use medusa_setup::db::{self, DatabaseCredentials};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = DatabaseCredentials::default();
//! let mut client = db::connect(&credentials).await?;
//! let name = db::generate_database_name();
//! db::create_database(&mut client, &name).await?;
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod error;
pub mod facts;
pub mod git;
pub mod process;
pub mod project;
pub mod server;
pub mod types;

pub use error::{Error, Result};
pub use types::{AdminAccount, DatabaseMode, ProjectConfig};
