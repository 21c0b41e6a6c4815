//! Application core: the controller service and its port boundary.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod snapshot;
