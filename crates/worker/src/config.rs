use std::path::PathBuf;

use pushsource_core::sanitizer::DEFAULT_MAX_CHARS;
use pushsource_core::EntityTypes;
use pushsource_events::bus::DEFAULT_CAPACITY;
use pushsource_events::PushServiceConfig;

use crate::error::WorkerError;

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Deployment-specific post/comment/section type names.
    pub entity_types: EntityTypes,
    /// Character limit for rendered message bodies.
    pub content_max_chars: usize,
    /// Broadcast buffer between dispatcher and forwarder.
    pub bus_capacity: usize,
    /// JSON snapshot seeding users, titles, terms and comments.
    pub snapshot_path: Option<PathBuf>,
    /// Upstream push service; `None` means log-only forwarding.
    pub push_service: Option<PushServiceConfig>,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default |
    /// |--------------------------|---------|
    /// | `PUSH_CONTENT_MAX_CHARS` | `250`   |
    /// | `PUSH_BUS_CAPACITY`      | `1024`  |
    /// | `SITE_SNAPSHOT_PATH`     | unset   |
    ///
    /// Entity type names come from [`EntityTypes::from_env`] and the push
    /// service from [`PushServiceConfig::from_env`].
    pub fn from_env() -> Result<Self, WorkerError> {
        let entity_types =
            EntityTypes::from_env().map_err(|e| WorkerError::Config(e.to_string()))?;

        let content_max_chars = parse_var("PUSH_CONTENT_MAX_CHARS", DEFAULT_MAX_CHARS)?;

        let bus_capacity = parse_var("PUSH_BUS_CAPACITY", DEFAULT_CAPACITY)?;
        if bus_capacity == 0 {
            return Err(WorkerError::Config(
                "PUSH_BUS_CAPACITY must be greater than zero".into(),
            ));
        }

        let snapshot_path = std::env::var("SITE_SNAPSHOT_PATH")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            entity_types,
            content_max_chars,
            bus_capacity,
            snapshot_path,
            push_service: PushServiceConfig::from_env(),
        })
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            entity_types: EntityTypes::default(),
            content_max_chars: DEFAULT_MAX_CHARS,
            bus_capacity: DEFAULT_CAPACITY,
            snapshot_path: None,
            push_service: None,
        }
    }
}

fn parse_var(name: &str, default: usize) -> Result<usize, WorkerError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| WorkerError::Config(format!("{name} must be a valid usize, got '{raw}'"))),
        Err(_) => Ok(default),
    }
}
