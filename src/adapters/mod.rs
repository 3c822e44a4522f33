//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to              |
//! |----------------|--------------------|--------------------------|
//! | `hardware`     | ActuatorPort       | Backlight GPIO, LEDC     |
//! | `log_sink`     | EventSink          | Serial log output        |
//! | `time`         | TimePort           | ESP32 system timer       |
//! | `view`         | RenderSurface      | Display frame buffer     |
//!
//! The encoder and the tick clocks implement their ports directly in
//! [`crate::drivers`].

pub mod hardware;
pub mod log_sink;
pub mod time;
pub mod view;
