pub mod delivery_zone;
pub mod drawing_session;
pub mod filesystem;
pub mod geocoder;
pub mod geofence;
pub mod geometry;
pub mod location;
pub mod overlay;
