use crate::rpc::model::RpcRestaurantLocation;
use crate::service::geocoder::Geocoder;
use crate::{service, Result};
use deadpool_sqlite::Pool;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub restaurant_id: String,
    pub address: String,
}

pub async fn run(
    params: Params,
    geocoder: &impl Geocoder,
    pool: &Pool,
) -> Result<RpcRestaurantLocation> {
    service::location::locate_restaurant(&params.restaurant_id, &params.address, geocoder, pool)
        .await
        .map(Into::into)
}

#[cfg(test)]
mod test {
    use super::Params;
    use crate::db::test::pool;
    use crate::model::LatLng;
    use crate::service::geocoder::fake::FakeGeocoder;
    use crate::Result;
    use actix_web::test;

    #[test]
    async fn run() -> Result<()> {
        let geocoder = FakeGeocoder::new("Rua Augusta 1", LatLng::new(38.71, -9.14));
        let params = Params {
            restaurant_id: "r1".into(),
            address: "Rua Augusta 1".into(),
        };
        let res = super::run(params, &geocoder, &pool()).await?;
        assert_eq!(38.71, res.lat);
        assert_eq!(
            Some("Rua Augusta 1, Portugal".into()),
            res.formatted_address
        );
        Ok(())
    }
}
