pub mod lat_lng;
pub use lat_lng::LatLng;

pub mod zone_geometry;
pub use zone_geometry::ZoneGeometry;
pub use zone_geometry::ZoneKind;

pub mod zone_draft;
pub use zone_draft::DeliveryZoneDraft;
pub use zone_draft::ZoneFields;
pub use zone_draft::ZonePatch;
