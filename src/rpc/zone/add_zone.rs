use crate::model::DeliveryZoneDraft;
use crate::rpc::model::RpcZone;
use crate::{service, Result};
use deadpool_sqlite::Pool;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub restaurant_id: String,
    #[serde(flatten)]
    pub zone: DeliveryZoneDraft,
}

pub async fn run(params: Params, pool: &Pool) -> Result<RpcZone> {
    service::delivery_zone::create(&params.restaurant_id, params.zone, pool)
        .await
        .map(Into::into)
}

#[cfg(test)]
mod test {
    use super::Params;
    use crate::db::test::pool;
    use crate::model::{LatLng, ZoneGeometry, ZoneKind};
    use crate::{Error, Result};
    use actix_web::test;
    use serde_json::json;

    #[test]
    async fn run() -> Result<()> {
        let params: Params = serde_json::from_value(json!({
            "restaurant_id": "r1",
            "name": "Centro",
            "geometry": {
                "type": "circle",
                "center": { "lat": 38.72, "lon": -9.14 },
                "radius_km": 2.0,
            },
            "delivery_fee": 2.5,
        }))?;
        let res = super::run(params, &pool()).await?;
        assert_eq!("Centro", res.name);
        assert_eq!(ZoneKind::Circle, res.zone_type);
        assert_eq!(
            ZoneGeometry::circle(LatLng::new(38.72, -9.14), 2.0),
            res.geometry
        );
        assert_eq!(0.0, res.minimum_order);
        assert_eq!(60, res.delivery_time_max);
        assert!(res.is_active);
        Ok(())
    }

    #[test]
    async fn run_open_polygon() -> Result<()> {
        let params: Params = serde_json::from_value(json!({
            "restaurant_id": "r1",
            "name": "Triangle",
            "geometry": {
                "type": "polygon",
                "ring": [
                    { "lat": 38.70, "lon": -9.16 },
                    { "lat": 38.70, "lon": -9.12 },
                    { "lat": 38.74, "lon": -9.14 },
                ],
            },
        }))?;
        let res = super::run(params, &pool()).await?;
        let ZoneGeometry::Polygon { ring } = res.geometry else {
            panic!("expected a polygon");
        };
        assert_eq!(4, ring.len());
        Ok(())
    }

    #[test]
    async fn run_without_name() -> Result<()> {
        let params: Params = serde_json::from_value(json!({
            "restaurant_id": "r1",
            "geometry": {
                "type": "circle",
                "center": { "lat": 38.72, "lon": -9.14 },
                "radius_km": 2.0,
            },
        }))?;
        let res = super::run(params, &pool()).await;
        assert!(matches!(res, Err(Error::Validation(_))));
        Ok(())
    }
}
