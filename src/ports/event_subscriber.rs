//! EventSubscriber port - Interface for opening and closing live subscriptions.
//!
//! One subscription backs one connected client stream. The stream adapter
//! subscribes when the client connects, drains [`Subscription::receive`], and
//! unsubscribes when the client goes away.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::notification::Event;

/// Registry key for one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Receiving end of one subscriber queue.
///
/// The sending end lives in the subscriber registry. Once the registry drops
/// it (unsubscribe), `receive` drains what is buffered and then returns `None`.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    receiver: mpsc::Receiver<Arc<Event>>,
}

impl Subscription {
    pub fn new(id: SubscriptionId, receiver: mpsc::Receiver<Arc<Event>>) -> Self {
        Self { id, receiver }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Waits for the next event. `None` means the subscription was closed.
    pub async fn receive(&mut self) -> Option<Arc<Event>> {
        self.receiver.recv().await
    }

    /// Returns a buffered event without waiting.
    pub fn try_receive(&mut self) -> Option<Arc<Event>> {
        self.receiver.try_recv().ok()
    }
}

/// Port for managing live subscriptions.
pub trait EventSubscriber: Send + Sync {
    /// Registers a new bounded subscriber queue.
    fn subscribe(&self) -> Subscription;

    /// Removes a subscription and closes its queue.
    ///
    /// Idempotent: returns `false` if `id` was not registered (never
    /// subscribed, or already removed).
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Number of currently registered subscriptions.
    fn subscriber_count(&self) -> usize;
}
