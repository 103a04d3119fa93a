//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the driver against the
//! simulated bridge. All tests run on the host with no real hardware.

mod driver_tests;
mod mock_hw;
