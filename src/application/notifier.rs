//! Notifier - Turns completed mail and chat writes into live events.
//!
//! Handlers call this only after the record is durably stored. A publish
//! failure is logged and never undoes the write.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::domain::mail::{ChatMessage, Mail};
use crate::domain::notification::{Event, EventKind};
use crate::ports::{EventPublisher, PublishReport};

/// Builds events and hands them to the event bus.
#[derive(Clone)]
pub struct Notifier {
    publisher: Arc<dyn EventPublisher>,
}

impl Notifier {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self { publisher }
    }

    /// Publishes one event addressed to `targets` within `session_id`.
    pub fn notify(
        &self,
        kind: EventKind,
        session_id: SessionId,
        targets: impl IntoIterator<Item = UserId>,
        data: serde_json::Value,
    ) -> Result<PublishReport, DomainError> {
        let event = Event::new(kind, session_id, targets, data);
        let report = self.publisher.publish(event)?;

        if report.dropped > 0 {
            tracing::debug!(
                kind = %kind,
                delivered = report.delivered,
                dropped = report.dropped,
                "Live event missed slow subscribers"
            );
        }
        Ok(report)
    }

    /// Announces a stored mail to all of its recipients.
    pub fn mail_created(&self, mail: &Mail) -> Option<PublishReport> {
        self.log_failure(
            self.notify(
                EventKind::Mail,
                mail.session_id.clone(),
                mail.recipient_ids(),
                mail.notification_payload(),
            ),
            &mail.session_id,
        )
    }

    /// Announces a stored chat message to its receiver.
    pub fn chat_created(&self, message: &ChatMessage) -> Option<PublishReport> {
        self.log_failure(
            self.notify(
                EventKind::Chat,
                message.session_id.clone(),
                [message.receiver_id.clone()],
                message.notification_payload(),
            ),
            &message.session_id,
        )
    }

    fn log_failure(
        &self,
        result: Result<PublishReport, DomainError>,
        session_id: &SessionId,
    ) -> Option<PublishReport> {
        match result {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Failed to publish live event");
                None
            }
        }
    }
}
