pub mod drawing;
pub mod geofence;
pub mod handler;
pub mod location;
pub mod model;
pub mod zone;
