use rusqlite::Row;
use std::sync::OnceLock;

pub const TABLE_NAME: &str = "conf";

pub enum Columns {
    GeocoderUrl,
    GeocoderCountryCodes,
    GeocoderUserAgent,
}

impl Columns {
    pub fn as_str(&self) -> &'static str {
        match self {
            Columns::GeocoderUrl => "geocoder_url",
            Columns::GeocoderCountryCodes => "geocoder_country_codes",
            Columns::GeocoderUserAgent => "geocoder_user_agent",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Conf {
    pub geocoder_url: String,
    /// Comma separated ISO 3166-1 codes, empty means worldwide
    pub geocoder_country_codes: String,
    pub geocoder_user_agent: String,
}

impl Conf {
    pub fn projection() -> &'static str {
        static PROJECTION: OnceLock<String> = OnceLock::new();
        PROJECTION.get_or_init(|| {
            [
                Columns::GeocoderUrl,
                Columns::GeocoderCountryCodes,
                Columns::GeocoderUserAgent,
            ]
            .iter()
            .map(Columns::as_str)
            .collect::<Vec<_>>()
            .join(", ")
        })
    }

    pub const fn mapper() -> fn(&Row) -> rusqlite::Result<Self> {
        |row| {
            Ok(Self {
                geocoder_url: row.get(Columns::GeocoderUrl.as_str())?,
                geocoder_country_codes: row.get(Columns::GeocoderCountryCodes.as_str())?,
                geocoder_user_agent: row.get(Columns::GeocoderUserAgent.as_str())?,
            })
        }
    }

    #[cfg(test)]
    pub fn mock() -> Conf {
        Conf {
            geocoder_url: "http://127.0.0.1:1/search".into(),
            geocoder_country_codes: "pt".into(),
            geocoder_user_agent: "delivery-zones-api/test".into(),
        }
    }
}
