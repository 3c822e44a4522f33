//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the orchestration for the tea timer: event
//! consumption, action dispatch, and the control loop.  All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod control_loop;
pub mod events;
pub mod ports;
pub mod service;
