//! Unified error type for the tea timer firmware.
//!
//! Every fallible startup step converts into [`Error`], so `main` can
//! propagate with `?` and report one uniform message.  All variants are
//! `Copy`.

use core::fmt;

use crate::config::ConfigError;
use crate::drivers::hw_init::HwInitError;

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(HwInitError),
    /// Configuration failed validation.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
