// bus module
pub mod bus;
pub use bus::*;

// config module
#[cfg(feature = "config")]
pub mod config;
