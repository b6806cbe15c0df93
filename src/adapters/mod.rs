//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter     | Implements | Connects to                         |
//! |-------------|------------|-------------------------------------|
//! | `sysfs_pwm` | PwmDevice  | `/sys/class/pwm/pwmchipN`           |
//! | `pinmux`    | PinMux     | `/sys/kernel/debug/gpio_debug`      |
//! | `time`      | Delay      | `std::thread::sleep`                |

pub mod pinmux;
pub mod sysfs_pwm;
pub mod time;
