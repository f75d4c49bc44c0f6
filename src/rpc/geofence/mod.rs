pub mod check_order_minimum;
pub mod get_delivery_options;
pub mod resolve_zone;
