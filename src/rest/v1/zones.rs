use crate::db::delivery_zone::schema::DeliveryZone;
use crate::model::{ZoneGeometry, ZoneKind};
use crate::rest::error::RestResult;
use crate::service;
use actix_web::get;
use actix_web::web::{Data, Json, Path, Query};
use deadpool_sqlite::Pool;
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Deserialize)]
pub struct GetArgs {
    include_inactive: Option<bool>,
}

#[derive(Serialize, Deserialize)]
pub struct GetItem {
    pub id: i64,
    pub restaurant_id: String,
    pub name: String,
    pub zone_type: ZoneKind,
    pub geometry: ZoneGeometry,
    pub delivery_fee: f64,
    pub minimum_order: f64,
    pub delivery_time_min: i64,
    pub delivery_time_max: i64,
    pub priority: i64,
    pub color: String,
    pub description: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<DeliveryZone> for GetItem {
    fn from(val: DeliveryZone) -> Self {
        GetItem {
            id: val.id,
            zone_type: val.zone_type(),
            restaurant_id: val.restaurant_id,
            name: val.name,
            geometry: val.geometry,
            delivery_fee: val.delivery_fee,
            minimum_order: val.minimum_order,
            delivery_time_min: val.delivery_time_min,
            delivery_time_max: val.delivery_time_max,
            priority: val.priority,
            color: val.color,
            description: val.description,
            is_active: val.is_active,
            created_at: val.created_at,
            updated_at: val.updated_at,
        }
    }
}

#[get("{restaurant_id}/zones")]
pub async fn get(
    restaurant_id: Path<String>,
    args: Query<GetArgs>,
    pool: Data<Pool>,
) -> RestResult<Vec<GetItem>> {
    let zones = service::delivery_zone::list_for_restaurant(
        &restaurant_id,
        args.include_inactive.unwrap_or(false),
        &pool,
    )
    .await?;
    Ok(Json(zones.into_iter().map(Into::into).collect()))
}

#[get("{restaurant_id}/zones/overlays")]
pub async fn get_overlays(
    restaurant_id: Path<String>,
    pool: Data<Pool>,
) -> RestResult<FeatureCollection> {
    let overlays = service::overlay::zone_overlays(&restaurant_id, &pool).await?;
    Ok(Json(overlays))
}

#[cfg(test)]
mod test {
    use crate::db::delivery_zone::schema::DeliveryZone;
    use crate::db::test::pool;
    use crate::error;
    use crate::service::delivery_zone;
    use crate::Result;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use actix_web::web::{Data, QueryConfig};
    use actix_web::{test, App};
    use geojson::FeatureCollection;

    #[test]
    async fn get_empty_array() -> Result<()> {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(pool()))
                .service(super::get),
        )
        .await;
        let req = TestRequest::get().uri("/r1/zones").to_request();
        let res: Vec<super::GetItem> = test::call_and_read_body_json(&app, req).await;
        assert!(res.is_empty());
        Ok(())
    }

    #[test]
    async fn get_include_inactive() -> Result<()> {
        let pool = pool();
        let zone = delivery_zone::create("r1", DeliveryZone::mock_draft(), &pool).await?;
        delivery_zone::set_active(zone.id, false, &pool).await?;
        let app = test::init_service(
            App::new()
                .app_data(Data::new(pool))
                .service(super::get),
        )
        .await;
        let req = TestRequest::get().uri("/r1/zones").to_request();
        let res: Vec<super::GetItem> = test::call_and_read_body_json(&app, req).await;
        assert!(res.is_empty());
        let req = TestRequest::get()
            .uri("/r1/zones?include_inactive=true")
            .to_request();
        let res: Vec<super::GetItem> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(1, res.len());
        assert_eq!(zone.id, res[0].id);
        assert!(!res[0].is_active);
        Ok(())
    }

    #[test]
    async fn get_invalid_args() -> Result<()> {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(pool()))
                .app_data(QueryConfig::default().error_handler(error::query_error_handler))
                .service(super::get),
        )
        .await;
        let req = TestRequest::get()
            .uri("/r1/zones?include_inactive=maybe")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::BAD_REQUEST, res.status());
        Ok(())
    }

    #[test]
    async fn get_overlays() -> Result<()> {
        let pool = pool();
        delivery_zone::create("r1", DeliveryZone::mock_draft(), &pool).await?;
        let app = test::init_service(
            App::new()
                .app_data(Data::new(pool))
                .service(super::get_overlays),
        )
        .await;
        let req = TestRequest::get().uri("/r1/zones/overlays").to_request();
        let res: FeatureCollection = test::call_and_read_body_json(&app, req).await;
        assert_eq!(1, res.features.len());
        Ok(())
    }
}
