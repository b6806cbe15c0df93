//! Application core boundary.
//!
//! The LED engine talks to the outside world only through the **port traits**
//! defined in [`ports`], keeping the drivers fully testable without a real
//! PWM chip.

pub mod ports;
