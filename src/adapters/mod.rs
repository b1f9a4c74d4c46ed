//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements          | Connects to                 |
//! |---------------|---------------------|-----------------------------|
//! | `config_file` | ConfigPort          | JSON file on disk           |
//! | `log_sink`    | EventSink           | Console log output          |
//! | `sim`         | MotionPort          | Scripted accelerometer      |
//! |               | AudioPort           | Constant-level analyser     |
//! |               | LocationPort        | Fixed position + latency    |
//! |               | SpeechPort          | Log output                  |
//! | `time`        | —                   | `std::time::Instant`        |

pub mod config_file;
pub mod log_sink;
pub mod sim;
pub mod time;
