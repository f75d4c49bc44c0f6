//! Address lookup backed by an OpenStreetMap Nominatim instance.
//!
//! Public Nominatim servers allow about one request per second and require a
//! descriptive User-Agent. Callers are expected to geocode on operator action
//! only, never per order.

use crate::db::conf::schema::Conf;
use crate::model::LatLng;
use crate::{Error, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedAddress {
    pub coordinate: LatLng,
    pub formatted_address: String,
}

#[allow(async_fn_in_trait)]
pub trait Geocoder {
    /// Fails with [Error::GeocodeNotFound] when nothing matches and with
    /// [Error::GeocodeService] when the service can't answer
    async fn geocode(&self, address: &str) -> Result<GeocodedAddress>;
}

pub struct Nominatim {
    client: reqwest::Client,
    base_url: String,
    country_codes: String,
}

impl Nominatim {
    pub fn new(conf: &Conf) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(conf.geocoder_user_agent.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Nominatim {
            client,
            base_url: conf.geocoder_url.clone(),
            country_codes: conf.geocoder_country_codes.clone(),
        })
    }
}

impl Geocoder for Nominatim {
    async fn geocode(&self, address: &str) -> Result<GeocodedAddress> {
        let address = address.trim();
        if address.is_empty() {
            return Err(Error::Validation("address can't be empty".into()));
        }
        let mut query = vec![("q", address), ("format", "jsonv2"), ("limit", "1")];
        if !self.country_codes.is_empty() {
            query.push(("countrycodes", self.country_codes.as_str()));
        }
        let res = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Geocoder request failed");
                Error::GeocodeService(e.to_string())
            })?;
        info!(address, http_status_code = ?res.status(), "Got geocoder response");
        if res.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::GeocodeService("rate limit exceeded".into()));
        }
        if !res.status().is_success() {
            return Err(Error::GeocodeService(format!(
                "unexpected HTTP status {}",
                res.status()
            )));
        }
        let body: Value = res
            .json()
            .await
            .map_err(|e| Error::GeocodeService(format!("unreadable response: {e}")))?;
        parse_response(&body)?.ok_or_else(|| Error::GeocodeNotFound(address.into()))
    }
}

fn parse_response(body: &Value) -> Result<Option<GeocodedAddress>> {
    let results = body
        .as_array()
        .ok_or_else(|| Error::GeocodeService("response is not an array".into()))?;
    let Some(first) = results.first() else {
        return Ok(None);
    };
    let lat = coordinate_field(first, "lat")?;
    let lon = coordinate_field(first, "lon")?;
    let coordinate = LatLng::new(lat, lon);
    coordinate
        .validate()
        .map_err(|e| Error::GeocodeService(e.to_string()))?;
    let formatted_address = first["display_name"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    Ok(Some(GeocodedAddress {
        coordinate,
        formatted_address,
    }))
}

// Nominatim encodes coordinates as strings
fn coordinate_field(result: &Value, name: &str) -> Result<f64> {
    result[name]
        .as_str()
        .and_then(|it| it.parse::<f64>().ok())
        .or_else(|| result[name].as_f64())
        .ok_or_else(|| Error::GeocodeService(format!("missing {name} in response")))
}


#[cfg(test)]
pub mod fake {
    use super::{GeocodedAddress, Geocoder};
    use crate::model::LatLng;
    use crate::{Error, Result};

    /// Knows a single address, everything else is not found
    pub struct FakeGeocoder {
        pub address: String,
        pub result: GeocodedAddress,
    }

    impl FakeGeocoder {
        pub fn new(address: &str, coordinate: LatLng) -> Self {
            FakeGeocoder {
                address: address.into(),
                result: GeocodedAddress {
                    coordinate,
                    formatted_address: format!("{address}, Portugal"),
                },
            }
        }
    }

    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, address: &str) -> Result<GeocodedAddress> {
            if address == self.address {
                Ok(self.result.clone())
            } else {
                Err(Error::GeocodeNotFound(address.into()))
            }
        }
    }

    pub struct DownGeocoder;

    impl Geocoder for DownGeocoder {
        async fn geocode(&self, _address: &str) -> Result<GeocodedAddress> {
            Err(Error::GeocodeService("connection refused".into()))
        }
    }
}
