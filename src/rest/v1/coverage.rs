use crate::model::LatLng;
use crate::rest::error::RestResult;
use crate::service::geofence::{self, ZoneMatch};
use actix_web::get;
use actix_web::web::{Data, Json, Path, Query};
use deadpool_sqlite::Pool;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct GetArgs {
    lat: f64,
    lon: f64,
}

#[derive(Serialize, Deserialize)]
pub struct GetItem {
    #[serde(flatten)]
    pub zone: ZoneMatch,
    pub estimated_time: String,
}

impl From<ZoneMatch> for GetItem {
    fn from(zone: ZoneMatch) -> Self {
        GetItem {
            estimated_time: zone.estimated_time(),
            zone,
        }
    }
}

/// Responds with `null` when no active zone covers the point
#[get("{restaurant_id}/coverage")]
pub async fn get(
    restaurant_id: Path<String>,
    args: Query<GetArgs>,
    pool: Data<Pool>,
) -> RestResult<Option<GetItem>> {
    let point = LatLng::new(args.lat, args.lon);
    let zone = geofence::resolve(point, &restaurant_id, &pool).await?;
    Ok(Json(zone.map(Into::into)))
}

#[cfg(test)]
mod test {
    use crate::db::delivery_zone::schema::DeliveryZone;
    use crate::db::test::pool;
    use crate::service::delivery_zone;
    use crate::Result;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use actix_web::web::Data;
    use actix_web::{test, App};

    #[test]
    async fn get_covered() -> Result<()> {
        let pool = pool();
        let zone = delivery_zone::create("r1", DeliveryZone::mock_draft(), &pool).await?;
        let app = test::init_service(
            App::new()
                .app_data(Data::new(pool))
                .service(super::get),
        )
        .await;
        let req = TestRequest::get()
            .uri("/r1/coverage?lat=38.73&lon=-9.14")
            .to_request();
        let res: Option<super::GetItem> = test::call_and_read_body_json(&app, req).await;
        let res = res.unwrap();
        assert_eq!(zone.id, res.zone.zone_id);
        assert_eq!(2.5, res.zone.delivery_fee);
        assert_eq!("30-60 min", res.estimated_time);
        Ok(())
    }

    #[test]
    async fn get_not_covered() -> Result<()> {
        let pool = pool();
        delivery_zone::create("r1", DeliveryZone::mock_draft(), &pool).await?;
        let app = test::init_service(
            App::new()
                .app_data(Data::new(pool))
                .service(super::get),
        )
        .await;
        let req = TestRequest::get()
            .uri("/r1/coverage?lat=41.15&lon=-8.61")
            .to_request();
        let res: Option<super::GetItem> = test::call_and_read_body_json(&app, req).await;
        assert!(res.is_none());
        Ok(())
    }

    #[test]
    async fn get_invalid_point() -> Result<()> {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(pool()))
                .service(super::get),
        )
        .await;
        let req = TestRequest::get()
            .uri("/r1/coverage?lat=91&lon=0")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::BAD_REQUEST, res.status());
        Ok(())
    }
}
