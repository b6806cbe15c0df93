//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises one layer of the LED
//! engine against the recording mock device. All tests run on the host with
//! no PWM hardware required.

mod mock_hw;
mod runner_tests;
