//! Database migration tool: `migration up` applies pending migrations,
//! `migration down` reverts the last one.

extern crate wavesexchange_log as log;

use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../database/migrations");

fn main() -> anyhow::Result<()> {
    let pg_config = database::config::Config::load()?;
    let action = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());

    log::info!("Connecting to postgres database: {:?}", pg_config);
    let mut conn = PgConnection::establish(&pg_config.database_url())?;

    match action.as_str() {
        "up" => {
            let applied = conn
                .run_pending_migrations(MIGRATIONS)
                .map_err(|e| anyhow::anyhow!(e))?;
            log::info!("Applied {} migration(s)", applied.len());
        }
        "down" => {
            let reverted = conn
                .revert_last_migration(MIGRATIONS)
                .map_err(|e| anyhow::anyhow!(e))?;
            log::info!("Reverted migration {}", reverted);
        }
        other => anyhow::bail!("Unknown action '{}', expected 'up' or 'down'", other),
    }

    Ok(())
}
