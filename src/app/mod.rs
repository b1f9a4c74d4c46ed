//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the CrashGuard monitor:
//! the monitoring switch, trigger and countdown orchestration, and alert
//! dispatch.  All interaction with the platform happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real sensors.

pub mod commands;
pub mod dispatch;
pub mod events;
pub mod ports;
pub mod service;
