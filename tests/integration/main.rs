//! Integration test driver for `tests/integration/`.
//!
//! Each `mod` below maps to a file that exercises one subsystem through
//! the public API against the recording mocks in `mock_transport`.

mod joystick_tests;
mod mock_transport;
mod panel_service_tests;
mod relay_registry_tests;
