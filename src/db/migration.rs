use crate::{Error, Result};
use include_dir::{include_dir, Dir};
use rusqlite::Connection;
use tracing::{info, warn};

static MIGRATIONS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/migrations");

/// Embedded `<version>.sql` file, versions start at 1 and have no gaps
struct Migration {
    version: i64,
    sql: String,
}

pub fn run(conn: &mut Connection) -> Result<()> {
    apply(&embedded()?, conn)
}

fn embedded() -> Result<Vec<Migration>> {
    let mut res = vec![];
    for version in 1.. {
        let Some(file) = MIGRATIONS_DIR.get_file(format!("{version}.sql")) else {
            break;
        };
        let sql = file
            .contents_utf8()
            .ok_or_else(|| Error::Generic(format!("Migration {version}.sql is not UTF-8")))?;
        res.push(Migration {
            version,
            sql: sql.into(),
        });
    }
    Ok(res)
}

fn schema_version(conn: &Connection) -> Result<i64> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(Into::into)
}

fn apply(migrations: &[Migration], conn: &mut Connection) -> Result<()> {
    let current = schema_version(conn)?;
    for migration in migrations.iter().filter(|it| it.version > current) {
        warn!(version = migration.version, "Applying migration");
        let tx = conn.transaction()?;
        tx.execute_batch(&migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
        tx.commit()?;
    }
    info!(
        schema_version = schema_version(conn)?,
        "Zone database is up to date"
    );
    Ok(())
}
