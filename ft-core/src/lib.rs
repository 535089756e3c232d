pub mod annotation;
pub mod city;
pub mod date_range;
pub mod degree_days;
pub mod frost;
pub mod observation;
pub mod season;
#[cfg(feature = "api")]
pub mod weather;
