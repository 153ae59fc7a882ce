//! End-to-end fan-out scenarios through [`EventDispatcher`].
//!
//! Each test wires the dispatcher to an in-memory site and a recording sink
//! and checks the exact message and target list the sink receives.

use std::sync::Arc;

use pushsource_core::memory::RecordingSink;
use pushsource_core::{
    ApprovalState, Collaborators, Comment, DispatchOutcome, EntityTypeTag, EntityTypes,
    EventDispatcher, InMemorySite, InsertContext, Message, PlainTextSanitizer, Post, Target,
    ANONYMOUS_USERNAME,
};

fn dispatcher(site: InMemorySite) -> (EventDispatcher, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let collaborators = Collaborators::from_site(
        Arc::new(site),
        Arc::new(EntityTypes::default()),
        Arc::new(PlainTextSanitizer::default()),
    );
    (EventDispatcher::new(collaborators, sink.clone()), sink)
}

fn hello_post() -> Post {
    Post {
        id: 42,
        author_id: 7,
        title: "Hello".into(),
        body: "<p>Hi</p>".into(),
        post_type: "post".into(),
    }
}

fn section(term_id: i64) -> Target {
    Target::new(EntityTypeTag::new("category"), term_id)
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// Post 42 by Alice filed under sections 3 and 5 fans out to both, in order.
#[test]
fn post_fans_out_to_its_sections() {
    let site = InMemorySite::default()
        .with_user(7, "Alice")
        .with_terms("category", 42, vec![3, 5]);
    let (dispatcher, sink) = dispatcher(site);

    dispatcher
        .on_post_inserted(hello_post(), InsertContext::default())
        .unwrap();

    let deliveries = sink.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(
        deliveries[0].message,
        Message {
            id: 42,
            user_id: 7,
            username: "Alice".into(),
            title: Some("Hello".into()),
            content: "Hi".into(),
            section_title: None,
            post_title: None,
        }
    );
    assert_eq!(deliveries[0].targets, vec![section(3), section(5)]);
}

/// A failing section lookup still delivers the same message, with no targets.
#[test]
fn taxonomy_failure_keeps_message_and_drops_targets() {
    let healthy = InMemorySite::default()
        .with_user(7, "Alice")
        .with_terms("category", 42, vec![3, 5]);
    let broken = healthy.clone().with_unavailable_taxonomy("category");

    let (ok_dispatcher, ok_sink) = dispatcher(healthy);
    let (broken_dispatcher, broken_sink) = dispatcher(broken);

    ok_dispatcher
        .on_post_inserted(hello_post(), InsertContext::default())
        .unwrap();
    let outcome = broken_dispatcher
        .on_post_inserted(hello_post(), InsertContext::default())
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::Delivered { targets: 0 });
    let ok = &ok_sink.deliveries()[0];
    let broken = &broken_sink.deliveries()[0];
    assert_eq!(broken.message, ok.message);
    assert!(broken.targets.is_empty());
}

#[test]
fn anonymous_post_author() {
    let (dispatcher, sink) = dispatcher(InMemorySite::default().with_user(0, "Root"));
    let post = Post {
        author_id: 0,
        ..hello_post()
    };

    dispatcher
        .on_post_inserted(post, InsertContext::default())
        .unwrap();
    assert_eq!(sink.deliveries()[0].message.username, ANONYMOUS_USERNAME);
}

#[test]
fn autosaves_revisions_edits_and_rest_writes_are_skipped() {
    let (dispatcher, sink) = dispatcher(InMemorySite::default());
    let contexts = [
        InsertContext {
            updating: true,
            ..InsertContext::default()
        },
        InsertContext {
            autosave: true,
            ..InsertContext::default()
        },
        InsertContext {
            revision: true,
            ..InsertContext::default()
        },
        InsertContext {
            rest_originated: true,
            ..InsertContext::default()
        },
    ];

    for ctx in contexts {
        let outcome = dispatcher.on_post_inserted(hello_post(), ctx).unwrap();
        assert_eq!(outcome, DispatchOutcome::Skipped, "{ctx:?}");
    }
    assert!(sink.deliveries().is_empty());
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

fn comment(id: i64, parent_id: i64) -> Comment {
    Comment {
        id,
        user_id: 0,
        author_name: String::new(),
        parent_id,
        post_id: 42,
        body: "<em>First!</em>".into(),
        approval: ApprovalState::Approved,
    }
}

#[test]
fn thread_of_comments_fans_out_to_post_then_parent() {
    let site = InMemorySite::default()
        .with_post_title(42, "Hello")
        .with_comment(comment(100, 0))
        .with_comment(comment(101, 100));
    let (dispatcher, sink) = dispatcher(site);

    dispatcher
        .on_comment_inserted(100, InsertContext::default())
        .unwrap();
    dispatcher
        .on_comment_inserted(101, InsertContext::default())
        .unwrap();

    let deliveries = sink.deliveries();
    assert_eq!(
        deliveries[0].targets,
        vec![Target::new(EntityTypeTag::new("post"), 42)]
    );
    assert_eq!(
        deliveries[1].targets,
        vec![Target::new(EntityTypeTag::new("comment"), 100)]
    );
    for delivery in &deliveries {
        assert_eq!(delivery.message.username, ANONYMOUS_USERNAME);
        assert_eq!(delivery.message.content, "First!");
        assert_eq!(delivery.message.post_title.as_deref(), Some("Hello"));
        assert_eq!(delivery.object_type, EntityTypeTag::new("comment"));
    }
}

#[test]
fn spam_comment_is_skipped() {
    let spam = Comment {
        approval: ApprovalState::Spam,
        ..comment(100, 0)
    };
    let (dispatcher, sink) = dispatcher(InMemorySite::default().with_comment(spam));

    let outcome = dispatcher
        .on_comment_inserted(100, InsertContext::default())
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Skipped);
    assert!(sink.deliveries().is_empty());
}
