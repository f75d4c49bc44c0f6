pub mod add_zone;
pub mod get_zone;
pub mod get_zones;
pub mod remove_zone;
pub mod set_zone_active;
pub mod update_zone;
