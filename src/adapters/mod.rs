//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements          | Connects to                 |
//! |----------------|---------------------|-----------------------------|
//! | `hardware`     | ActivityPort        | thermal subsystem, EN pins  |
//! |                | RailPort            | PSU enable pin, steppers    |
//! | `log_sink`     | EventSink           | `log` facade                |
//! | `time`         | Clock               | `std::time` (host)          |
//! | `config_file`  | ConfigPort          | JSON file on disk           |

pub mod config_file;
pub mod hardware;
pub mod log_sink;
pub mod time;
