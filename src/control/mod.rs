//! Pure control logic, no hardware access.

pub mod relay;
