pub mod config;
pub mod logging;

pub mod delivery;
pub mod extension;
pub mod hostname;
pub mod session;
pub mod signal;
pub mod spool;
