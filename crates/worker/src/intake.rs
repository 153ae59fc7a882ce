//! NDJSON hook intake.
//!
//! Each input line is one hook invocation from the CMS:
//!
//! ```json
//! {"hook":"post_inserted","post":{"id":42,"author_id":7,"title":"Hello","body":"<p>Hi</p>","post_type":"post"},"updating":false}
//! {"hook":"comment_inserted","comment_id":100,"comment":{"id":100,"post_id":42,"approval":"1"}}
//! ```
//!
//! Context flags (`updating`, `autosave`, `revision`, `rest_originated`)
//! default to `false`. A `comment_inserted` record may carry the saved
//! comment; otherwise it must already be in the site snapshot.

use std::sync::Arc;

use pushsource_core::types::DbId;
use pushsource_core::{
    Collaborators, Comment, CoreError, DispatchOutcome, EventDispatcher, InsertContext,
    PlainTextSanitizer, Post,
};
use pushsource_events::forwarder::ForwarderStats;
use pushsource_events::{EventBus, PushForwarder, WebhookDelivery};
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;

use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::site::SharedSite;

// ---------------------------------------------------------------------------
// HookRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "hook", rename_all = "snake_case")]
pub enum HookRecord {
    PostInserted {
        post: Post,
        #[serde(flatten)]
        context: InsertContext,
    },
    CommentInserted {
        comment_id: DbId,
        #[serde(default)]
        comment: Option<Comment>,
        #[serde(flatten)]
        context: InsertContext,
    },
}

// ---------------------------------------------------------------------------
// RunSummary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Non-blank input lines read.
    pub received: u64,
    pub dispatched: u64,
    pub skipped: u64,
    /// Lines that failed to parse or dispatch.
    pub rejected: u64,
    pub forwarder: ForwarderStats,
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Process hook records from `input` until EOF or cancellation, then drain
/// the forwarder.
pub async fn run<R>(
    config: WorkerConfig,
    input: R,
    cancel: CancellationToken,
) -> Result<RunSummary, WorkerError>
where
    R: AsyncBufRead + Unpin,
{
    let site = Arc::new(match &config.snapshot_path {
        Some(path) => SharedSite::load(path).await?,
        None => SharedSite::default(),
    });

    let bus = Arc::new(EventBus::new(config.bus_capacity));
    let delivery = config.push_service.clone().map(WebhookDelivery::new);
    match &delivery {
        Some(d) => tracing::info!(url = d.url(), "Forwarding push events"),
        None => tracing::warn!("PUSH_SERVICE_URL not set, push events will only be logged"),
    }
    let forwarder = tokio::spawn(PushForwarder::new(delivery).run(bus.subscribe(), cancel.clone()));

    let collaborators = Collaborators {
        registry: Arc::new(config.entity_types.clone()),
        directory: site.clone(),
        taxonomy: site.clone(),
        sanitizer: Arc::new(PlainTextSanitizer::new(config.content_max_chars)),
        titles: site.clone(),
        comments: site.clone(),
    };
    let dispatcher = EventDispatcher::new(collaborators, bus.clone());

    let mut summary = RunSummary::default();
    let intake = read_records(&dispatcher, &site, input, &cancel, &mut summary).await;

    // Closing the bus lets the forwarder drain what is buffered and stop,
    // also when intake failed part-way.
    drop(dispatcher);
    drop(bus);
    summary.forwarder = forwarder.await?;
    intake?;

    tracing::info!(
        received = summary.received,
        dispatched = summary.dispatched,
        skipped = summary.skipped,
        rejected = summary.rejected,
        "Hook intake finished"
    );
    Ok(summary)
}

/// Read newline-terminated records until EOF or cancellation.
///
/// Only I/O failures end intake early; bad lines are counted and skipped.
async fn read_records<R>(
    dispatcher: &EventDispatcher,
    site: &SharedSite,
    mut input: R,
    cancel: &CancellationToken,
    summary: &mut RunSummary,
) -> Result<(), WorkerError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();

    loop {
        let read = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Intake cancelled");
                return Ok(());
            }
            read = input.read_until(b'\n', &mut buf) => read?,
        };
        if read == 0 {
            return Ok(());
        }

        let raw = std::mem::take(&mut buf);
        process_line(dispatcher, site, raw, summary);
    }
}

fn process_line(
    dispatcher: &EventDispatcher,
    site: &SharedSite,
    raw: Vec<u8>,
    summary: &mut RunSummary,
) {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return;
    }
    summary.received += 1;

    let line = match String::from_utf8(raw) {
        Ok(line) => line,
        Err(e) => {
            tracing::warn!(line = summary.received, error = %e, "Hook record is not valid UTF-8");
            summary.rejected += 1;
            return;
        }
    };

    let record: HookRecord = match serde_json::from_str(line.trim_end()) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(line = summary.received, error = %e, "Unparseable hook record");
            summary.rejected += 1;
            return;
        }
    };

    match handle_record(dispatcher, site, record) {
        Ok(DispatchOutcome::Delivered { .. }) => summary.dispatched += 1,
        Ok(DispatchOutcome::Skipped) => summary.skipped += 1,
        Err(e) => {
            tracing::error!(line = summary.received, error = %e, "Failed to dispatch hook record");
            summary.rejected += 1;
        }
    }
}

/// Apply a record to the site view, then hand it to the matching entry point.
fn handle_record(
    dispatcher: &EventDispatcher,
    site: &SharedSite,
    record: HookRecord,
) -> Result<DispatchOutcome, WorkerError> {
    let outcome = match record {
        HookRecord::PostInserted { post, context } => {
            site.record_post(&post);
            dispatcher.on_post_inserted(post, context)?
        }
        HookRecord::CommentInserted {
            comment_id,
            comment,
            context,
        } => {
            if let Some(comment) = comment {
                if comment.id != comment_id {
                    return Err(CoreError::Validation(format!(
                        "comment_inserted record id mismatch: {comment_id} vs {}",
                        comment.id
                    ))
                    .into());
                }
                site.record_comment(comment);
            }
            dispatcher.on_comment_inserted(comment_id, context)?
        }
    };
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_post_record_with_default_context() {
        let record: HookRecord = serde_json::from_str(
            r#"{"hook":"post_inserted","post":{"id":1,"post_type":"post"}}"#,
        )
        .unwrap();
        match record {
            HookRecord::PostInserted { post, context } => {
                assert_eq!(post.id, 1);
                assert_eq!(context, InsertContext::default());
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn parses_comment_record_with_flags() {
        let record: HookRecord = serde_json::from_str(
            r#"{"hook":"comment_inserted","comment_id":5,"rest_originated":true}"#,
        )
        .unwrap();
        assert_eq!(
            record,
            HookRecord::CommentInserted {
                comment_id: 5,
                comment: None,
                context: InsertContext {
                    rest_originated: true,
                    ..InsertContext::default()
                },
            }
        );
    }

    #[test]
    fn unknown_hook_fails_to_parse() {
        let result: Result<HookRecord, _> =
            serde_json::from_str(r#"{"hook":"user_registered","user_id":3}"#);
        assert!(result.is_err());
    }
}
