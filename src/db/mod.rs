pub mod conf;
pub mod delivery_zone;
pub mod migration;
pub mod restaurant_location;

use crate::{service::filesystem::data_dir_file_path, Result};
use deadpool_sqlite::{Config, Hook, HookError, Pool, Runtime};
use rusqlite::Connection;

const DB_FILE_NAME: &str = "zones.db";

pub fn open_connection() -> Result<Connection> {
    let conn = Connection::open(data_dir_file_path(DB_FILE_NAME)?)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(conn)
}

pub fn pool() -> Result<Pool> {
    let pool_size = std::thread::available_parallelism()
        .map(|n| n.get() * 2)
        .unwrap_or(8);
    Config::new(data_dir_file_path(DB_FILE_NAME)?)
        .builder(Runtime::Tokio1)?
        .max_size(pool_size)
        .post_create(Hook::Fn(Box::new(|conn, _| {
            let conn = conn
                .lock()
                .map_err(|_| HookError::Message("connection mutex is poisoned".into()))?;
            conn.pragma_update(None, "journal_mode", "WAL")
                .map_err(HookError::Backend)?;
            conn.pragma_update(None, "synchronous", "NORMAL")
                .map_err(HookError::Backend)?;
            Ok(())
        })))
        .build()
        .map_err(Into::into)
}
