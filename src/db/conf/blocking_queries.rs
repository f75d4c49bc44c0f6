use super::schema::{self, Columns, Conf};
use crate::Result;
use rusqlite::{params, Connection};

pub fn select(conn: &Connection) -> Result<Conf> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
        "#,
        projection = Conf::projection(),
        table = schema::TABLE_NAME,
    );
    conn.prepare(&sql)?
        .query_row((), Conf::mapper())
        .map_err(Into::into)
}

pub fn set_geocoder(
    url: &str,
    country_codes: &str,
    user_agent: &str,
    conn: &Connection,
) -> Result<Conf> {
    let sql = format!(
        r#"
            UPDATE {table}
            SET {url} = ?1, {country_codes} = ?2, {user_agent} = ?3
        "#,
        table = schema::TABLE_NAME,
        url = Columns::GeocoderUrl.as_str(),
        country_codes = Columns::GeocoderCountryCodes.as_str(),
        user_agent = Columns::GeocoderUserAgent.as_str(),
    );
    conn.execute(&sql, params![url, country_codes, user_agent])?;
    select(conn)
}
