use std::sync::Arc;

use crate::models::Lead;
use crate::notifier::LeadNotifier;

/// Fire-and-forget delivery of lead notifications.
///
/// `dispatch` spawns one tokio task per lead and drops its handle: the
/// task outlives the request that started it, nobody awaits or cancels it,
/// and its outcome is only visible in the logs. Each lead is attempted at
/// most once.
#[derive(Clone, Default)]
pub struct NotificationDispatcher {
    notifier: Option<Arc<dyn LeadNotifier>>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn LeadNotifier>) -> Self {
        Self {
            notifier: Some(notifier),
        }
    }

    /// Dispatcher for deployments without notification credentials.
    pub fn disabled() -> Self {
        Self { notifier: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.notifier.is_some()
    }

    /// Starts delivery in the background and returns immediately.
    pub fn dispatch(&self, lead: Lead) {
        let Some(notifier) = self.notifier.clone() else {
            tracing::debug!("Notifications disabled, skipping lead id={}", lead.id);
            return;
        };

        tokio::spawn(async move {
            match notifier.notify(&lead).await {
                Ok(()) => {
                    tracing::info!("📨 Lead notification sent for lead id={}", lead.id);
                }
                Err(e) => {
                    tracing::warn!("Lead notification dropped for lead id={}: {}", lead.id, e);
                }
            }
        });
    }
}
