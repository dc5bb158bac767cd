//! In-process event bus with bounded per-subscriber queues.
//!
//! One `EventBus` is built at startup and shared as `Arc` with every
//! producer and every stream connection.
//!
//! # Delivery
//!
//! `publish` copies the registered senders under a read lock, releases the
//! lock, then offers the event to each queue with `try_send`. A full queue
//! loses the event for that subscriber only. A closed queue is pruned from
//! the registry. Publishing never waits on a subscriber.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::foundation::DomainError;
use crate::domain::notification::Event;
use crate::ports::{EventPublisher, EventSubscriber, PublishReport, Subscription, SubscriptionId};

/// Default queue length for each subscriber.
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 10;

type Registry = HashMap<SubscriptionId, mpsc::Sender<Arc<Event>>>;

/// Fan-out hub implementing both event ports.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(EventBus::new(10));
/// let mut sub = bus.subscribe();
///
/// bus.publish(event)?;
/// let received = sub.receive().await;
///
/// bus.unsubscribe(sub.id());
/// ```
pub struct EventBus {
    subscribers: RwLock<Registry>,
    next_id: AtomicU64,
    capacity: usize,
}

impl EventBus {
    /// Creates a bus whose subscribers get queues of `capacity` events.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            capacity: capacity.max(1),
        }
    }

    /// Queue length given to subscribers opened with [`EventSubscriber::subscribe`].
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Registers a subscriber with its own queue length.
    pub fn subscribe_with_capacity(&self, capacity: usize) -> Subscription {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let id = SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));

        let count = {
            let mut subscribers = self.write_registry();
            subscribers.insert(id, tx);
            subscribers.len()
        };

        tracing::debug!(subscription_id = %id, subscribers = count, "Subscriber registered");
        Subscription::new(id, rx)
    }

    fn read_registry(&self) -> std::sync::RwLockReadGuard<'_, Registry> {
        self.subscribers.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_registry(&self) -> std::sync::RwLockWriteGuard<'_, Registry> {
        self.subscribers.write().unwrap_or_else(|e| e.into_inner())
    }

    fn prune(&self, dead: &[SubscriptionId]) {
        if dead.is_empty() {
            return;
        }
        let mut subscribers = self.write_registry();
        for id in dead {
            // Only drop the entry if its receiver is still gone.
            if subscribers.get(id).is_some_and(|tx| tx.is_closed()) {
                subscribers.remove(id);
                tracing::debug!(subscription_id = %id, "Pruned closed subscriber");
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_CAPACITY)
    }
}

impl EventPublisher for EventBus {
    fn publish(&self, event: Event) -> Result<PublishReport, DomainError> {
        let event = Arc::new(event);

        // Copy senders so delivery happens without holding the lock
        let targets: Vec<(SubscriptionId, mpsc::Sender<Arc<Event>>)> = self
            .read_registry()
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        let mut report = PublishReport::default();
        let mut dead = Vec::new();

        for (id, tx) in targets {
            match tx.try_send(Arc::clone(&event)) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    report.dropped += 1;
                    tracing::debug!(
                        subscription_id = %id,
                        kind = %event.kind(),
                        session_id = %event.session_id(),
                        "Subscriber queue full, event dropped"
                    );
                }
                Err(TrySendError::Closed(_)) => {
                    report.closed += 1;
                    dead.push(id);
                }
            }
        }

        self.prune(&dead);
        Ok(report)
    }
}

impl EventSubscriber for EventBus {
    fn subscribe(&self) -> Subscription {
        self.subscribe_with_capacity(self.capacity)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.write_registry().remove(&id).is_some();
        if removed {
            tracing::debug!(subscription_id = %id, "Subscriber removed");
        }
        removed
    }

    fn subscriber_count(&self) -> usize {
        self.read_registry().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{SessionId, UserId};
    use crate::domain::notification::EventKind;
    use serde_json::json;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn mail_event(n: u64) -> Event {
        Event::new(
            EventKind::Mail,
            SessionId::new("s1"),
            vec![user("u1"), user("u2")],
            json!({ "n": n }),
        )
    }

    fn n_of(event: &Event) -> u64 {
        event.data()["n"].as_u64().unwrap()
    }

    #[test]
    fn publish_with_no_subscribers_is_ok() {
        let bus = EventBus::default();
        let report = bus.publish(mail_event(1)).unwrap();
        assert_eq!(report.attempted(), 0);
    }

    #[test]
    fn every_subscriber_receives_the_event() {
        let bus = EventBus::new(4);
        let mut subs: Vec<_> = (0..5).map(|_| bus.subscribe()).collect();

        let report = bus.publish(mail_event(1)).unwrap();

        assert_eq!(report.delivered, 5);
        for sub in subs.iter_mut() {
            let got = sub.try_receive().unwrap();
            assert_eq!(n_of(&got), 1);
        }
    }

    #[test]
    fn full_queue_drops_event_without_error() {
        let bus = EventBus::new(1);
        let mut slow = bus.subscribe();
        let mut fast = bus.subscribe();

        bus.publish(mail_event(1)).unwrap();
        assert_eq!(n_of(&fast.try_receive().unwrap()), 1);

        // slow still holds event 1
        let report = bus.publish(mail_event(2)).unwrap();
        assert_eq!(report.delivered, 1);
        assert_eq!(report.dropped, 1);

        assert_eq!(n_of(&fast.try_receive().unwrap()), 2);
        assert_eq!(n_of(&slow.try_receive().unwrap()), 1);
        assert!(slow.try_receive().is_none());
    }

    #[test]
    fn mixed_capacity_fan_out() {
        let bus = EventBus::default();
        let mut s_u1 = bus.subscribe_with_capacity(10);
        let mut s_u2 = bus.subscribe_with_capacity(1);

        let unrelated = Event::new(EventKind::Chat, SessionId::new("s9"), vec![], json!({}));
        bus.publish(unrelated).unwrap();
        s_u1.try_receive().unwrap();

        let report = bus.publish(mail_event(7)).unwrap();

        assert_eq!(report.delivered, 1);
        assert_eq!(report.dropped, 1);
        let got = s_u1.try_receive().unwrap();
        assert_eq!(got.kind(), EventKind::Mail);
        assert_eq!(got.targets(), &[user("u1"), user("u2")]);
        assert_eq!(s_u2.try_receive().unwrap().kind(), EventKind::Chat);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let bus = EventBus::default();
        let sub = bus.subscribe();
        let id = sub.id();

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert!(!bus.unsubscribe(SubscriptionId::new(9_999)));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn unsubscribe_closes_queue_after_draining() {
        let bus = EventBus::default();
        let mut sub = bus.subscribe();

        bus.publish(mail_event(1)).unwrap();
        bus.unsubscribe(sub.id());

        assert_eq!(n_of(&sub.receive().await.unwrap()), 1);
        assert!(sub.receive().await.is_none());
    }

    #[test]
    fn unsubscribed_queue_receives_nothing_further() {
        let bus = EventBus::default();
        let mut gone = bus.subscribe();
        let mut stays = bus.subscribe();
        bus.unsubscribe(gone.id());

        let report = bus.publish(mail_event(1)).unwrap();

        assert_eq!(report.delivered, 1);
        assert!(gone.try_receive().is_none());
        assert!(stays.try_receive().is_some());
    }

    #[test]
    fn dropped_receiver_is_pruned_on_publish() {
        let bus = EventBus::default();
        let sub = bus.subscribe();
        let _other = bus.subscribe();
        drop(sub);

        let report = bus.publish(mail_event(1)).unwrap();

        assert_eq!(report.closed, 1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn events_from_one_publisher_arrive_in_order() {
        let bus = EventBus::new(16);
        let mut sub = bus.subscribe();

        for n in 0..10 {
            bus.publish(mail_event(n)).unwrap();
        }

        let received: Vec<u64> = std::iter::from_fn(|| sub.try_receive())
            .map(|e| n_of(&e))
            .collect();
        assert_eq!(received, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn subscription_ids_are_unique() {
        let bus = EventBus::default();
        let a = bus.subscribe();
        let b = bus.subscribe();
        assert_ne!(a.id(), b.id());
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let bus = EventBus::new(0);
        assert_eq!(bus.capacity(), 1);
        let mut sub = bus.subscribe();
        bus.publish(mail_event(1)).unwrap();
        assert!(sub.try_receive().is_some());
    }

    #[tokio::test]
    async fn concurrent_publishers_reach_every_subscriber() {
        let bus = Arc::new(EventBus::new(64));
        let mut sub = bus.subscribe();

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let bus = Arc::clone(&bus);
                tokio::spawn(async move {
                    for n in 0..8 {
                        bus.publish(mail_event(t * 100 + n)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.await.unwrap();
        }

        let mut per_task: HashMap<u64, Vec<u64>> = HashMap::new();
        while let Some(e) = sub.try_receive() {
            let n = n_of(&e);
            per_task.entry(n / 100).or_default().push(n % 100);
        }
        assert_eq!(per_task.len(), 4);
        for seq in per_task.values() {
            assert_eq!(seq, &(0..8).collect::<Vec<_>>());
        }
    }
}
