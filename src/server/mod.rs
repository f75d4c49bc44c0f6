use crate::rest::v1::{coverage, zones};
use crate::rpc;
use crate::service::drawing_session::DrawingSessions;
use crate::service::geocoder::Nominatim;
use crate::{db, error, Result};
use actix_web::dev::Service;
use actix_web::web::scope;
use actix_web::web::QueryConfig;
use actix_web::{
    middleware::{Compress, NormalizePath},
    web::Data,
    App, HttpServer,
};
use futures_util::future::FutureExt;
use std::env;
use time::OffsetDateTime;
use tracing::info;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

pub async fn run() -> Result<()> {
    // All the worker threads are sharing a single connection pool
    let pool = db::pool()?;
    let conf = db::conf::queries::select(&pool).await?;
    let geocoder = Data::new(Nominatim::new(&conf)?);
    // Sessions live in memory and must be shared between workers
    let sessions = Data::new(DrawingSessions::default());
    let pool = Data::new(pool);

    let bind_addr = env::var("ZONES_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());
    info!(%bind_addr, geocoder_url = %conf.geocoder_url, "Starting server");

    HttpServer::new(move || {
        App::new()
            .wrap_fn(|req, srv| {
                let req_method = req.method().as_str().to_string();
                let req_path = req.path().to_string();
                let req_time = OffsetDateTime::now_utc();
                srv.call(req).map(move |res| {
                    if let Ok(res) = res.as_ref() {
                        let res_status = res.status().as_u16();
                        let res_time_sec = (OffsetDateTime::now_utc() - req_time).as_seconds_f64();
                        info!(req_method, req_path, res_status, res_time_sec);
                    }
                    res
                })
            })
            .wrap(NormalizePath::trim())
            .wrap(Compress::default())
            .app_data(pool.clone())
            .app_data(geocoder.clone())
            .app_data(sessions.clone())
            .app_data(QueryConfig::default().error_handler(error::query_error_handler))
            .service(
                scope("v1").service(
                    scope("restaurants")
                        .service(zones::get_overlays)
                        .service(zones::get)
                        .service(coverage::get),
                ),
            )
            .service(scope("rpc").service(rpc::handler::handle))
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
