//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that drives the full scheduler against
//! the mock adapters in `mock_hw`.  All tests run on the host with no
//! real hardware required.

#![cfg(not(target_os = "espidf"))]

mod arbitration_tests;
mod mock_hw;
mod scheduler_tests;
