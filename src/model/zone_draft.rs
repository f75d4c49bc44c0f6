use super::ZoneGeometry;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const ZONE_COLORS: [&str; 8] = [
    "#3B82F6", "#10B981", "#EF4444", "#F59E0B", "#8B5CF6", "#EC4899", "#06B6D4", "#84CC16",
];

pub const DEFAULT_DELIVERY_TIME_MIN: i64 = 30;
pub const DEFAULT_DELIVERY_TIME_MAX: i64 = 60;
pub const DEFAULT_PRIORITY: i64 = 1;

/// Everything an operator can set on a zone apart from its shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneFields {
    pub name: String,
    pub description: String,
    pub delivery_fee: f64,
    pub minimum_order: f64,
    pub delivery_time_min: i64,
    pub delivery_time_max: i64,
    pub priority: i64,
    pub color: String,
}

impl Default for ZoneFields {
    fn default() -> Self {
        ZoneFields {
            name: String::new(),
            description: String::new(),
            delivery_fee: 0.0,
            minimum_order: 0.0,
            delivery_time_min: DEFAULT_DELIVERY_TIME_MIN,
            delivery_time_max: DEFAULT_DELIVERY_TIME_MAX,
            priority: DEFAULT_PRIORITY,
            color: ZONE_COLORS[0].into(),
        }
    }
}

impl ZoneFields {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("name can't be empty".into()));
        }
        validate_amount("delivery_fee", self.delivery_fee)?;
        validate_amount("minimum_order", self.minimum_order)?;
        if self.delivery_time_min < 0 || self.delivery_time_max < 0 {
            return Err(Error::Validation(
                "delivery time can't be negative".into(),
            ));
        }
        if self.delivery_time_min > self.delivery_time_max {
            return Err(Error::Validation(format!(
                "delivery_time_min ({}) is greater than delivery_time_max ({})",
                self.delivery_time_min, self.delivery_time_max,
            )));
        }
        if !is_hex_color(&self.color) {
            return Err(Error::Validation(format!(
                "color must look like #RRGGBB, got {}",
                self.color
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryZoneDraft {
    pub geometry: ZoneGeometry,
    #[serde(flatten)]
    pub fields: ZoneFields,
}

impl DeliveryZoneDraft {
    pub fn new(geometry: ZoneGeometry, fields: ZoneFields) -> Self {
        DeliveryZoneDraft { geometry, fields }
    }

    /// Closes polygon rings and checks every invariant a stored zone must hold
    pub fn normalized(self) -> Result<Self> {
        let draft = DeliveryZoneDraft {
            geometry: self.geometry.closed(),
            fields: ZoneFields {
                name: self.fields.name.trim().into(),
                ..self.fields
            },
        };
        draft.geometry.validate()?;
        draft.fields.validate()?;
        Ok(draft)
    }
}

/// Partial zone update, restaurant ownership and zone kind can't be patched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZonePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub geometry: Option<ZoneGeometry>,
    pub delivery_fee: Option<f64>,
    pub minimum_order: Option<f64>,
    pub delivery_time_min: Option<i64>,
    pub delivery_time_max: Option<i64>,
    pub priority: Option<i64>,
    pub color: Option<String>,
}

impl ZonePatch {
    /// Overlays the non-geometry fields, nothing is validated here
    pub fn apply_fields(&self, fields: ZoneFields) -> ZoneFields {
        ZoneFields {
            name: self.name.clone().unwrap_or(fields.name),
            description: self.description.clone().unwrap_or(fields.description),
            delivery_fee: self.delivery_fee.unwrap_or(fields.delivery_fee),
            minimum_order: self.minimum_order.unwrap_or(fields.minimum_order),
            delivery_time_min: self.delivery_time_min.unwrap_or(fields.delivery_time_min),
            delivery_time_max: self.delivery_time_max.unwrap_or(fields.delivery_time_max),
            priority: self.priority.unwrap_or(fields.priority),
            color: self.color.clone().unwrap_or(fields.color),
        }
    }

    pub fn apply(self, draft: DeliveryZoneDraft) -> Result<DeliveryZoneDraft> {
        let fields = self.apply_fields(draft.fields);
        let geometry = match self.geometry {
            Some(geometry) => {
                if geometry.kind() != draft.geometry.kind() {
                    return Err(Error::InvalidGeometry(format!(
                        "zone type can't change from {} to {}, delete the zone and draw a new one",
                        draft.geometry.kind(),
                        geometry.kind(),
                    )));
                }
                geometry
            }
            None => draft.geometry,
        };
        DeliveryZoneDraft { geometry, fields }.normalized()
    }
}

fn validate_amount(field: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::Validation(format!(
            "{field} must be a non-negative amount, got {amount}"
        )));
    }
    Ok(())
}

fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|it| it.is_ascii_hexdigit()),
        None => false,
    }
}
