//! Apply schema migrations and create the initial administrator account.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use landing_backend::domain::ports::{AdminRepository, CredentialHasher};
use landing_backend::domain::{NewAdmin, SUPER_ADMIN_ROLE};
use landing_backend::logging::init_logging;
use landing_backend::outbound::persistence::{DbPool, DieselAdminRepository, run_pending_migrations};
use landing_backend::outbound::security::Argon2CredentialHasher;
use landing_backend::settings::{AdminSeedSettings, DatabaseSettings, LoggingSettings};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};

const BINARY_NAME: &str = "seed-admin";

/// `seed-admin` command arguments; everything else comes from the environment.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seed-admin",
    about = "Apply schema migrations and create the initial administrator",
    version
)]
struct CliArgs {
    /// Leave the schema untouched and only create the account.
    #[arg(long)]
    skip_migrations: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(CliArgs::parse()))
}

async fn async_main(cli: CliArgs) -> Result<()> {
    let args = [OsString::from(BINARY_NAME)];
    let logging = LoggingSettings::load_from_iter(args.clone())
        .map_err(|err| eyre!("load logging settings: {err}"))?;
    init_logging(&logging).wrap_err("install log subscriber")?;

    let database = DatabaseSettings::load_from_iter(args.clone())
        .map_err(|err| eyre!("load database settings: {err}"))?;
    let seed = AdminSeedSettings::load_from_iter(args)
        .map_err(|err| eyre!("load admin settings: {err}"))?;

    let database_url = database.database_url()?;
    if cli.skip_migrations {
        info!("skipping schema migrations");
    } else {
        let applied = run_pending_migrations(database_url.as_str())
            .await
            .wrap_err("apply migrations")?;
        info!(applied, "database schema is current");
    }

    let pool = DbPool::new(database.pool_config()?)
        .await
        .wrap_err("create database pool")?;
    let password_hash = Argon2CredentialHasher::new()
        .hash(seed.password())
        .wrap_err("hash admin password")?;
    let admin = NewAdmin {
        username: seed.username().to_owned(),
        email: seed.email().to_owned(),
        password_hash,
        role: SUPER_ADMIN_ROLE.to_owned(),
    };

    let created = DieselAdminRepository::new(pool)
        .create_if_absent(&admin)
        .await
        .wrap_err("create admin account")?;
    if created {
        info!(username = %admin.username, email = %admin.email, "admin account created");
    } else {
        info!(username = %admin.username, "admin account already exists");
    }
    if seed.uses_default_password() {
        warn!("ADMIN_PASSWORD is not set; change the default password after first login");
    }
    Ok(())
}
