pub mod aircraft;
pub mod airports;
pub mod seed;
pub mod status;
