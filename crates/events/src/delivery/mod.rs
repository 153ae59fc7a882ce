//! Transports that carry push events to the upstream push service.

pub mod webhook;
