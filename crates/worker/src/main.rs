//! `pushsource-worker` -- CMS push fan-out host.
//!
//! Reads insert-hook records (NDJSON) from stdin, turns them into push
//! messages with subscription targets and forwards them to the push service.
//!
//! # Environment variables
//!
//! | Variable                 | Required | Default    | Description                          |
//! |--------------------------|----------|------------|--------------------------------------|
//! | `PUSH_SERVICE_URL`       | no       | --         | Push service endpoint; unset = log only |
//! | `PUSH_SERVICE_TOKEN`     | no       | --         | Bearer token for the push service    |
//! | `PUSH_POST_TYPE`         | no       | `post`     | Post type name                       |
//! | `PUSH_COMMENT_TYPE`      | no       | `comment`  | Comment type name                    |
//! | `PUSH_SECTION_TYPE`      | no       | `category` | Section taxonomy name                |
//! | `PUSH_CONTENT_MAX_CHARS` | no       | `250`      | Body truncation limit                |
//! | `PUSH_BUS_CAPACITY`      | no       | `1024`     | Event bus buffer                     |
//! | `SITE_SNAPSHOT_PATH`     | no       | --         | JSON snapshot of users/terms/comments |

use pushsource_worker::WorkerConfig;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pushsource_worker=info,pushsource_events=info,pushsource_core=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = WorkerConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    tracing::info!(
        post_type = %config.entity_types.post,
        comment_type = %config.entity_types.comment,
        section_type = %config.entity_types.section,
        "Starting pushsource-worker"
    );

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            on_signal.cancel();
        }
    });

    let input = BufReader::new(tokio::io::stdin());
    if let Err(e) = pushsource_worker::run(config, input, cancel).await {
        tracing::error!(error = %e, "Worker failed");
        std::process::exit(1);
    }
}
