//! Host process for the push fan-out pipeline.
//!
//! Reads CMS insert-hook records as newline-delimited JSON, runs each
//! through the [`EventDispatcher`](pushsource_core::EventDispatcher) and
//! forwards the resulting push events to the upstream push service.

pub mod config;
pub mod error;
pub mod intake;
pub mod site;

pub use config::WorkerConfig;
pub use error::WorkerError;
pub use intake::{run, HookRecord, RunSummary};
pub use site::SharedSite;
