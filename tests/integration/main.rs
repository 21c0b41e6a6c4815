//! Integration test entry point. Host-only: the whole control core is
//! hardware-free, so these run on x86_64 with mock adapters.

mod controller_tests;
mod mock_hw;
mod web_boundary_tests;
