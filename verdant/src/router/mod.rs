pub mod average;
pub mod emissions;
pub mod forecast;

pub mod util;
