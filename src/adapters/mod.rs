//! Adapters: concrete implementations of the hexagonal port traits for
//! host simulation.
//!
//! | Adapter       | Implements           | Connects to                |
//! |---------------|----------------------|----------------------------|
//! | `log_display` | Display              | log output                 |
//! | `log_sink`    | DiagnosticsSink      | log output                 |
//! | `sim_audio`   | AudioEngine          | synthetic programme        |
//! | `sim_pins`    | InputPin / SetDutyCycle | in-memory pin levels    |
//! | `time`        | Clock                | `std::time::Instant`       |

pub mod log_display;
pub mod log_sink;
pub mod sim_audio;
pub mod sim_pins;
pub mod time;
