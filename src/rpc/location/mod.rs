pub mod geocode_address;
pub mod get_restaurant_location;
pub mod locate_restaurant;
pub mod set_restaurant_location;
