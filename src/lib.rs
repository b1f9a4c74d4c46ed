//! CrashGuard accident-detection monitor.
//!
//! Watches device motion and ambient sound, and on a crash-like spike or
//! loud noise runs a cancellable countdown that ends in an emergency alert
//! carrying the current position and a spoken announcement.
//!
//! The domain core ([`app`], [`fsm`], [`sensors`], [`scheduler`]) is pure
//! logic over port traits; [`adapters`] and [`runtime`] wire it to a host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod fsm;
pub mod runtime;
pub mod scheduler;
pub mod sensors;
