//! Integration tests for event fan-out from writes to live subscribers.

use std::sync::Arc;

use futures::StreamExt;
use raven::adapters::events::EventBus;
use raven::adapters::http::stream::{filtered_events, StreamFilter};
use raven::adapters::memory::{InMemoryBlobStorage, InMemoryMailStore};
use raven::application::{
    Notifier, SendChatMessageCommand, SendChatMessageHandler, SendMailCommand, SendMailHandler,
};
use raven::domain::foundation::{SessionId, UserId};
use raven::domain::mail::NewMail;
use raven::domain::notification::{Event, EventKind};
use raven::ports::{EventPublisher, EventSubscriber};

fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

fn event(n: u64) -> Event {
    Event::new(
        EventKind::Chat,
        SessionId::new("s1"),
        [user("bob")],
        serde_json::json!({ "n": n }),
    )
}

#[tokio::test]
async fn slow_subscriber_loses_events_without_holding_up_others() {
    let bus = EventBus::new(10);
    let mut fast = bus.subscribe_with_capacity(10);
    let mut slow = bus.subscribe_with_capacity(1);

    let mut dropped = 0;
    for n in 0..5 {
        dropped += bus.publish(event(n)).unwrap().dropped;
    }

    assert_eq!(dropped, 4);
    for n in 0..5 {
        assert_eq!(fast.try_receive().unwrap().data()["n"], n);
    }
    assert_eq!(slow.try_receive().unwrap().data()["n"], 0);
    assert!(slow.try_receive().is_none());
}

#[tokio::test]
async fn mail_and_chat_writes_reach_matching_streams() {
    let store = Arc::new(InMemoryMailStore::new());
    let blobs = Arc::new(InMemoryBlobStorage::new());
    let bus = Arc::new(EventBus::default());
    let notifier = Notifier::new(bus.clone());

    let mut bob_stream = Box::pin(filtered_events(
        bus.clone(),
        StreamFilter::new(SessionId::new("s1"), Some(user("bob"))),
    ));
    let mut everything = Box::pin(filtered_events(
        bus.clone(),
        StreamFilter::new(SessionId::new("s1"), None),
    ));

    SendMailHandler::new(store.clone(), blobs.clone(), notifier.clone())
        .handle(SendMailCommand {
            mail: NewMail {
                session_id: SessionId::new("s1"),
                sender_id: user("alice"),
                subject: "to carol".into(),
                content: String::new(),
                content_type: String::new(),
                to: vec![user("carol")],
                cc: vec![],
                bcc: vec![],
                parent_id: None,
            },
            files: vec![],
        })
        .await
        .unwrap();
    SendChatMessageHandler::new(store.clone(), blobs, notifier)
        .handle(SendChatMessageCommand {
            session_id: SessionId::new("s1"),
            sender_id: user("alice"),
            receiver_id: user("bob"),
            content: "hi bob".into(),
            files: vec![],
        })
        .await
        .unwrap();

    let first = everything.next().await.unwrap();
    let second = everything.next().await.unwrap();
    assert_eq!(first.kind(), EventKind::Mail);
    assert_eq!(second.kind(), EventKind::Chat);

    let for_bob = bob_stream.next().await.unwrap();
    assert_eq!(for_bob.kind(), EventKind::Chat);
    assert_eq!(for_bob.data()["content"], "hi bob");

    drop(bob_stream);
    drop(everything);
    assert_eq!(bus.subscriber_count(), 0);
}

#[tokio::test]
async fn concurrent_publishers_deliver_everything_to_roomy_subscriber() {
    let bus = Arc::new(EventBus::new(1000));
    let mut sub = bus.subscribe();

    let tasks: Vec<_> = (0..4)
        .map(|t| {
            let bus = bus.clone();
            tokio::spawn(async move {
                for n in 0..50 {
                    bus.publish(event(t * 100 + n)).unwrap();
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let mut received = 0;
    while sub.try_receive().is_some() {
        received += 1;
    }
    assert_eq!(received, 200);
}
