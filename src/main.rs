pub use error::Error;
mod db;
mod error;
mod model;
mod rest;
mod rpc;
mod server;
mod service;
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[actix_web::main]
async fn main() -> Result<()> {
    init_logging();

    let mut conn = db::open_connection()?;
    db::migration::run(&mut conn)?;

    let args: Vec<String> = env::args().collect();

    let command = match args.get(1) {
        Some(some) => some,
        None => Err(Error::CLI("No actions passed".into()))?,
    };

    match command.as_str() {
        "server" => server::run().await?,
        // Migrations are applied on every start
        "migrate" => {}
        "set-geocoder" => set_geocoder(&args[2..], &conn)?,
        first_arg => Err(Error::CLI(format!("Unknown command: {first_arg}")))?,
    }

    Ok(())
}

fn set_geocoder(args: &[String], conn: &rusqlite::Connection) -> Result<()> {
    let [url, country_codes, user_agent] = args else {
        return Err(Error::CLI(
            "Usage: set-geocoder <url> <country_codes> <user_agent>".into(),
        ));
    };
    let conf = db::conf::blocking_queries::set_geocoder(url, country_codes, user_agent, conn)?;
    info!(
        url = %conf.geocoder_url,
        country_codes = %conf.geocoder_country_codes,
        "Updated geocoder",
    );
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cfg!(debug_assertions) {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt()
            .json()
            .without_time()
            .with_env_filter(filter)
            .init();
    }
}
