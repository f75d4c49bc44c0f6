use super::schema::{self, Columns, RestaurantLocation};
use crate::model::LatLng;
use crate::Result;
use rusqlite::{params, Connection, OptionalExtension};

/// A manual move has no address, the previous one is dropped since it no
/// longer describes the point
pub fn upsert(
    restaurant_id: &str,
    coordinate: LatLng,
    formatted_address: Option<&str>,
    conn: &Connection,
) -> Result<RestaurantLocation> {
    let sql = format!(
        r#"
            INSERT INTO {table} ({restaurant_id}, {lat}, {lon}, {formatted_address})
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT ({restaurant_id}) DO UPDATE SET
                {lat} = excluded.{lat},
                {lon} = excluded.{lon},
                {formatted_address} = excluded.{formatted_address},
                {updated_at} = strftime('%Y-%m-%dT%H:%M:%fZ')
            RETURNING {projection}
        "#,
        table = schema::TABLE_NAME,
        restaurant_id = Columns::RestaurantId.as_str(),
        lat = Columns::Lat.as_str(),
        lon = Columns::Lon.as_str(),
        formatted_address = Columns::FormattedAddress.as_str(),
        updated_at = Columns::UpdatedAt.as_str(),
        projection = RestaurantLocation::projection(),
    );
    conn.query_row(
        &sql,
        params![
            restaurant_id,
            coordinate.lat,
            coordinate.lon,
            formatted_address
        ],
        RestaurantLocation::mapper(),
    )
    .map_err(Into::into)
}

pub fn select_by_restaurant_id(
    restaurant_id: &str,
    conn: &Connection,
) -> Result<Option<RestaurantLocation>> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            WHERE {restaurant_id} = ?1
        "#,
        projection = RestaurantLocation::projection(),
        table = schema::TABLE_NAME,
        restaurant_id = Columns::RestaurantId.as_str(),
    );
    conn.query_row(&sql, params![restaurant_id], RestaurantLocation::mapper())
        .optional()
        .map_err(Into::into)
}

#[cfg(test)]
mod test {
    use crate::db::test::conn;
    use crate::model::LatLng;
    use crate::Result;

    #[test]
    fn upsert() -> Result<()> {
        let conn = conn();
        let location = super::upsert(
            "r1",
            LatLng::new(38.72, -9.14),
            Some("Rua Augusta, Lisboa"),
            &conn,
        )?;
        assert_eq!(LatLng::new(38.72, -9.14), location.coordinate());
        assert_eq!(Some("Rua Augusta, Lisboa".into()), location.formatted_address);
        let moved = super::upsert("r1", LatLng::new(38.71, -9.13), None, &conn)?;
        assert_eq!(LatLng::new(38.71, -9.13), moved.coordinate());
        assert_eq!(None, moved.formatted_address);
        assert_eq!(location.created_at, moved.created_at);
        Ok(())
    }

    #[test]
    fn select_by_restaurant_id() -> Result<()> {
        let conn = conn();
        assert_eq!(None, super::select_by_restaurant_id("r1", &conn)?);
        super::upsert("r1", LatLng::new(38.72, -9.14), None, &conn)?;
        assert!(super::select_by_restaurant_id("r1", &conn)?.is_some());
        assert_eq!(None, super::select_by_restaurant_id("r2", &conn)?);
        Ok(())
    }
}
