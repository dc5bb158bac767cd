//! EventPublisher port - Interface for publishing live notifications.
//!
//! This port defines how producers hand events to the fan-out hub without
//! knowing how subscribers are tracked or how delivery is performed.

use crate::domain::foundation::DomainError;
use crate::domain::notification::Event;

/// Outcome of a single publish call.
///
/// Dropped deliveries are not errors: a subscriber whose queue is full simply
/// misses the event and re-reads authoritative state from the mail store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Subscribers that accepted the event.
    pub delivered: usize,
    /// Subscribers whose queue was full; the event was dropped for them.
    pub dropped: usize,
    /// Subscribers whose receiving side was already gone.
    pub closed: usize,
}

impl PublishReport {
    /// Number of subscribers the event was offered to.
    pub fn attempted(&self) -> usize {
        self.delivered + self.dropped + self.closed
    }
}

/// Port for publishing live notifications.
///
/// Implementations must:
/// - Never block on a slow subscriber
/// - Preserve the order of events published from one task to each subscriber
///
/// Publishing is synchronous: it runs inline on the caller's task.
pub trait EventPublisher: Send + Sync {
    /// Offer `event` to every current subscriber.
    fn publish(&self, event: Event) -> Result<PublishReport, DomainError>;
}
