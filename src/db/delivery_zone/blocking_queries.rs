use super::schema::{self, Columns, DeliveryZone};
use crate::model::{DeliveryZoneDraft, ZoneGeometry, ZonePatch};
use crate::{Error, Result};
use rusqlite::{named_params, params, Connection, OptionalExtension};

pub fn insert(
    restaurant_id: &str,
    draft: &DeliveryZoneDraft,
    conn: &Connection,
) -> Result<DeliveryZone> {
    let tx = conn.unchecked_transaction()?;
    ensure_unique(restaurant_id, draft, None, &tx)?;
    let sql = format!(
        r#"
            INSERT INTO {table} (
                {restaurant_id},
                {name},
                {zone_type},
                {center_lat},
                {center_lon},
                {radius_km},
                {polygon},
                {delivery_fee},
                {minimum_order},
                {delivery_time_min},
                {delivery_time_max},
                {priority},
                {color},
                {description}
            ) VALUES (
                :restaurant_id,
                :name,
                :zone_type,
                :center_lat,
                :center_lon,
                :radius_km,
                :polygon,
                :delivery_fee,
                :minimum_order,
                :delivery_time_min,
                :delivery_time_max,
                :priority,
                :color,
                :description
            )
            RETURNING {projection}
        "#,
        table = schema::TABLE_NAME,
        restaurant_id = Columns::RestaurantId.as_str(),
        name = Columns::Name.as_str(),
        zone_type = Columns::ZoneType.as_str(),
        center_lat = Columns::CenterLat.as_str(),
        center_lon = Columns::CenterLon.as_str(),
        radius_km = Columns::RadiusKm.as_str(),
        polygon = Columns::Polygon.as_str(),
        delivery_fee = Columns::DeliveryFee.as_str(),
        minimum_order = Columns::MinimumOrder.as_str(),
        delivery_time_min = Columns::DeliveryTimeMin.as_str(),
        delivery_time_max = Columns::DeliveryTimeMax.as_str(),
        priority = Columns::Priority.as_str(),
        color = Columns::Color.as_str(),
        description = Columns::Description.as_str(),
        projection = DeliveryZone::projection(),
    );
    let shape = ShapeColumns::new(&draft.geometry)?;
    let fields = &draft.fields;
    let zone = tx.query_row(
        &sql,
        named_params! {
            ":restaurant_id": restaurant_id,
            ":name": fields.name,
            ":zone_type": draft.geometry.kind().to_string(),
            ":center_lat": shape.center_lat,
            ":center_lon": shape.center_lon,
            ":radius_km": shape.radius_km,
            ":polygon": shape.polygon,
            ":delivery_fee": fields.delivery_fee,
            ":minimum_order": fields.minimum_order,
            ":delivery_time_min": fields.delivery_time_min,
            ":delivery_time_max": fields.delivery_time_max,
            ":priority": fields.priority,
            ":color": fields.color,
            ":description": fields.description,
        },
        DeliveryZone::mapper(),
    )?;
    tx.commit()?;
    Ok(zone)
}

pub fn select_by_id(id: i64, conn: &Connection) -> Result<Option<DeliveryZone>> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            WHERE {id} = ?1
        "#,
        projection = DeliveryZone::projection(),
        table = schema::TABLE_NAME,
        id = Columns::Id.as_str(),
    );
    conn.query_row(&sql, params![id], DeliveryZone::mapper())
        .optional()
        .map_err(Into::into)
}

pub fn select_by_restaurant_id(
    restaurant_id: &str,
    include_inactive: bool,
    conn: &Connection,
) -> Result<Vec<DeliveryZone>> {
    let include_inactive_sql = if include_inactive {
        "".into()
    } else {
        format!(
            "AND {is_active} = 1",
            is_active = Columns::IsActive.as_str()
        )
    };
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            WHERE {restaurant_id} = ?1
            {include_inactive_sql}
            ORDER BY {is_active} DESC, {name}, {id}
        "#,
        projection = DeliveryZone::projection(),
        table = schema::TABLE_NAME,
        restaurant_id = Columns::RestaurantId.as_str(),
        is_active = Columns::IsActive.as_str(),
        name = Columns::Name.as_str(),
        id = Columns::Id.as_str(),
    );
    conn.prepare(&sql)?
        .query_map(params![restaurant_id], DeliveryZone::mapper())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Into::into)
}

/// Returns [None] if there is no such zone, nothing is written in that case
pub fn patch(id: i64, patch: ZonePatch, conn: &Connection) -> Result<Option<DeliveryZone>> {
    let tx = conn.unchecked_transaction()?;
    let Some(zone) = select_by_id(id, &tx)? else {
        return Ok(None);
    };
    let draft = patch.apply(zone.draft())?;
    ensure_unique(&zone.restaurant_id, &draft, Some(id), &tx)?;
    let sql = format!(
        r#"
            UPDATE {table}
            SET
                {name} = :name,
                {center_lat} = :center_lat,
                {center_lon} = :center_lon,
                {radius_km} = :radius_km,
                {polygon} = :polygon,
                {delivery_fee} = :delivery_fee,
                {minimum_order} = :minimum_order,
                {delivery_time_min} = :delivery_time_min,
                {delivery_time_max} = :delivery_time_max,
                {priority} = :priority,
                {color} = :color,
                {description} = :description,
                {updated_at} = strftime('%Y-%m-%dT%H:%M:%fZ')
            WHERE {id} = :id
        "#,
        table = schema::TABLE_NAME,
        name = Columns::Name.as_str(),
        center_lat = Columns::CenterLat.as_str(),
        center_lon = Columns::CenterLon.as_str(),
        radius_km = Columns::RadiusKm.as_str(),
        polygon = Columns::Polygon.as_str(),
        delivery_fee = Columns::DeliveryFee.as_str(),
        minimum_order = Columns::MinimumOrder.as_str(),
        delivery_time_min = Columns::DeliveryTimeMin.as_str(),
        delivery_time_max = Columns::DeliveryTimeMax.as_str(),
        priority = Columns::Priority.as_str(),
        color = Columns::Color.as_str(),
        description = Columns::Description.as_str(),
        updated_at = Columns::UpdatedAt.as_str(),
        id = Columns::Id.as_str(),
    );
    let shape = ShapeColumns::new(&draft.geometry)?;
    let fields = &draft.fields;
    tx.execute(
        &sql,
        named_params! {
            ":id": id,
            ":name": fields.name,
            ":center_lat": shape.center_lat,
            ":center_lon": shape.center_lon,
            ":radius_km": shape.radius_km,
            ":polygon": shape.polygon,
            ":delivery_fee": fields.delivery_fee,
            ":minimum_order": fields.minimum_order,
            ":delivery_time_min": fields.delivery_time_min,
            ":delivery_time_max": fields.delivery_time_max,
            ":priority": fields.priority,
            ":color": fields.color,
            ":description": fields.description,
        },
    )?;
    let zone = select_by_id(id, &tx)?;
    tx.commit()?;
    Ok(zone)
}

/// Rejects a zone identical to another zone of the same restaurant
fn ensure_unique(
    restaurant_id: &str,
    draft: &DeliveryZoneDraft,
    except_id: Option<i64>,
    conn: &Connection,
) -> Result<()> {
    let duplicate = select_by_restaurant_id(restaurant_id, true, conn)?
        .into_iter()
        .filter(|it| Some(it.id) != except_id)
        .find(|it| it.draft() == *draft);
    match duplicate {
        Some(duplicate) => Err(Error::Conflict(format!(
            "Zone {} ({}) already has the same shape and settings",
            duplicate.id, duplicate.name,
        ))),
        None => Ok(()),
    }
}

pub fn set_active(id: i64, is_active: bool, conn: &Connection) -> Result<Option<DeliveryZone>> {
    let sql = format!(
        r#"
            UPDATE {table}
            SET {is_active} = ?2, {updated_at} = strftime('%Y-%m-%dT%H:%M:%fZ')
            WHERE {id} = ?1
        "#,
        table = schema::TABLE_NAME,
        is_active = Columns::IsActive.as_str(),
        updated_at = Columns::UpdatedAt.as_str(),
        id = Columns::Id.as_str(),
    );
    conn.execute(&sql, params![id, is_active])?;
    select_by_id(id, conn)
}

/// Returns false if there was nothing to delete
pub fn delete(id: i64, conn: &Connection) -> Result<bool> {
    let sql = format!(
        r#"
            DELETE FROM {table}
            WHERE {id} = ?1
        "#,
        table = schema::TABLE_NAME,
        id = Columns::Id.as_str(),
    );
    Ok(conn.execute(&sql, params![id])? > 0)
}

#[cfg(test)]
pub fn set_created_at(id: i64, created_at: &str, conn: &Connection) -> Result<()> {
    let sql = format!(
        r#"
            UPDATE {table}
            SET {created_at} = ?2
            WHERE {id} = ?1
        "#,
        table = schema::TABLE_NAME,
        created_at = Columns::CreatedAt.as_str(),
        id = Columns::Id.as_str(),
    );
    conn.execute(&sql, params![id, created_at])?;
    Ok(())
}

struct ShapeColumns {
    center_lat: Option<f64>,
    center_lon: Option<f64>,
    radius_km: Option<f64>,
    polygon: Option<String>,
}

impl ShapeColumns {
    fn new(geometry: &ZoneGeometry) -> Result<Self> {
        Ok(match geometry {
            ZoneGeometry::Circle(circle) => ShapeColumns {
                center_lat: Some(circle.center.lat),
                center_lon: Some(circle.center.lon),
                radius_km: Some(circle.radius_km),
                polygon: None,
            },
            ZoneGeometry::Polygon { ring } => ShapeColumns {
                center_lat: None,
                center_lon: None,
                radius_km: None,
                polygon: Some(schema::ring_to_geo_json(ring)?),
            },
        })
    }
}

#[cfg(test)]
mod test {
    use crate::db::delivery_zone::schema::DeliveryZone;
    use crate::db::test::conn;
    use crate::model::{LatLng, ZoneGeometry, ZonePatch};
    use crate::{Error, Result};

    fn polygon_draft() -> crate::model::DeliveryZoneDraft {
        let mut draft = DeliveryZone::mock_draft();
        draft.fields.name = "Baixa".into();
        draft.geometry = ZoneGeometry::polygon(vec![
            LatLng::new(38.70, -9.16),
            LatLng::new(38.70, -9.12),
            LatLng::new(38.74, -9.14),
        ]);
        draft
    }

    #[test]
    fn insert() -> Result<()> {
        let conn = conn();
        let draft = DeliveryZone::mock_draft();
        let zone = super::insert("r1", &draft, &conn)?;
        assert_eq!("r1", zone.restaurant_id);
        assert_eq!(draft, zone.draft());
        assert!(zone.is_active);
        assert_eq!(Some(zone.clone()), super::select_by_id(zone.id, &conn)?);
        Ok(())
    }

    #[test]
    fn insert_polygon() -> Result<()> {
        let conn = conn();
        let draft = polygon_draft();
        let zone = super::insert("r1", &draft, &conn)?;
        assert_eq!(draft.geometry, zone.geometry);
        Ok(())
    }

    #[test]
    fn insert_duplicate() -> Result<()> {
        let conn = conn();
        super::insert("r1", &DeliveryZone::mock_draft(), &conn)?;
        assert!(matches!(
            super::insert("r1", &DeliveryZone::mock_draft(), &conn),
            Err(Error::Conflict(_)),
        ));
        // Same zone for another restaurant is fine
        super::insert("r2", &DeliveryZone::mock_draft(), &conn)?;
        let mut draft = DeliveryZone::mock_draft();
        draft.fields.priority = 2;
        super::insert("r1", &draft, &conn)?;
        Ok(())
    }

    #[test]
    fn select_by_id_missing() -> Result<()> {
        assert_eq!(None, super::select_by_id(1, &conn())?);
        Ok(())
    }

    #[test]
    fn select_by_restaurant_id() -> Result<()> {
        let conn = conn();
        let mut draft = DeliveryZone::mock_draft();
        draft.fields.name = "b".into();
        let b = super::insert("r1", &draft, &conn)?;
        draft.fields.name = "c".into();
        let c = super::insert("r1", &draft, &conn)?;
        draft.fields.name = "a".into();
        let a = super::insert("r1", &draft, &conn)?;
        super::insert("r2", &draft, &conn)?;
        super::set_active(a.id, false, &conn)?;
        let ids: Vec<i64> = super::select_by_restaurant_id("r1", true, &conn)?
            .into_iter()
            .map(|it| it.id)
            .collect();
        assert_eq!(vec![b.id, c.id, a.id], ids);
        let ids: Vec<i64> = super::select_by_restaurant_id("r1", false, &conn)?
            .into_iter()
            .map(|it| it.id)
            .collect();
        assert_eq!(vec![b.id, c.id], ids);
        Ok(())
    }

    #[test]
    fn patch() -> Result<()> {
        let conn = conn();
        let zone = super::insert("r1", &DeliveryZone::mock_draft(), &conn)?;
        let patch = ZonePatch {
            name: Some("Centro Histórico".into()),
            delivery_fee: Some(3.0),
            ..ZonePatch::default()
        };
        let patched = super::patch(zone.id, patch, &conn)?.unwrap();
        assert_eq!("Centro Histórico", patched.name);
        assert_eq!(3.0, patched.delivery_fee);
        assert_eq!(zone.minimum_order, patched.minimum_order);
        assert_eq!(zone.created_at, patched.created_at);
        assert!(patched.updated_at >= zone.updated_at);
        Ok(())
    }

    #[test]
    fn patch_missing() -> Result<()> {
        assert_eq!(None, super::patch(1, ZonePatch::default(), &conn())?);
        Ok(())
    }

    #[test]
    fn patch_invalid_keeps_stored_zone() -> Result<()> {
        let conn = conn();
        let zone = super::insert("r1", &DeliveryZone::mock_draft(), &conn)?;
        let patch = ZonePatch {
            delivery_time_min: Some(90),
            ..ZonePatch::default()
        };
        assert!(matches!(
            super::patch(zone.id, patch, &conn),
            Err(Error::Validation(_)),
        ));
        assert_eq!(Some(zone.clone()), super::select_by_id(zone.id, &conn)?);
        Ok(())
    }

    #[test]
    fn patch_into_duplicate() -> Result<()> {
        let conn = conn();
        super::insert("r1", &DeliveryZone::mock_draft(), &conn)?;
        let mut draft = DeliveryZone::mock_draft();
        draft.fields.priority = 2;
        let zone = super::insert("r1", &draft, &conn)?;
        // Rewriting a zone with its own values is not a duplicate
        let same = ZonePatch {
            priority: Some(2),
            ..ZonePatch::default()
        };
        assert!(super::patch(zone.id, same, &conn)?.is_some());
        let copy = ZonePatch {
            priority: Some(1),
            ..ZonePatch::default()
        };
        assert!(matches!(
            super::patch(zone.id, copy, &conn),
            Err(Error::Conflict(_)),
        ));
        let stored = super::select_by_id(zone.id, &conn)?.unwrap();
        assert_eq!(2, stored.priority);
        Ok(())
    }

    #[test]
    fn set_active() -> Result<()> {
        let conn = conn();
        let zone = super::insert("r1", &DeliveryZone::mock_draft(), &conn)?;
        let zone = super::set_active(zone.id, false, &conn)?.unwrap();
        assert!(!zone.is_active);
        assert_eq!(DeliveryZone::mock_draft().geometry, zone.geometry);
        assert_eq!(None, super::set_active(zone.id + 1, true, &conn)?);
        Ok(())
    }

    #[test]
    fn delete() -> Result<()> {
        let conn = conn();
        let zone = super::insert("r1", &DeliveryZone::mock_draft(), &conn)?;
        assert!(super::delete(zone.id, &conn)?);
        assert!(!super::delete(zone.id, &conn)?);
        assert_eq!(None, super::select_by_id(zone.id, &conn)?);
        Ok(())
    }
}
