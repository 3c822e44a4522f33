//! GPIO / peripheral pin assignments for the dial board.
//!
//! Raw GPIO numbers for the drivers that talk to ESP-IDF directly.  The
//! backlight goes through esp-idf-hal and takes its typed pin from
//! `Peripherals` instead.

// ---------------------------------------------------------------------------
// Rotary encoder (PCNT quadrature)
// ---------------------------------------------------------------------------

/// Phase A: edge input of PCNT channel A, level input of channel B.
pub const ENCODER_A_GPIO: i32 = 41;
/// Phase B: edge input of PCNT channel B, level input of channel A.
pub const ENCODER_B_GPIO: i32 = 40;

// ---------------------------------------------------------------------------
// User input
// ---------------------------------------------------------------------------

/// Dial push button, active LOW with internal pull-up.
pub const BUTTON_GPIO: i32 = 42;

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Piezo buzzer, LEDC channel 1.
pub const BUZZER_GPIO: i32 = 3;
