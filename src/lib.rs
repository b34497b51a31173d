//! Ride Pool - Shared-ride group lifecycle and payment verification.
//!
//! Users form groups that fill up and lock, a driver among them creates the
//! ride, and each rider's seat moves through a driver decision and a
//! payment cycle until the ride can be closed.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
