pub mod coverage;
pub mod zones;
