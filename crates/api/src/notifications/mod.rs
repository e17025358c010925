//! Outbound notification delivery.
//!
//! [`Notifier`] is the capability the approval workflow consumes; the
//! production implementation is [`email::SmtpNotifier`]. Absence of a
//! notifier (`AppState::notifier == None`) means notifications are not
//! configured: submit-for-approval refuses to run, while approve/cancel
//! simply skip their courtesy emails.

pub mod email;

use async_trait::async_trait;
use orderdesk_core::error::CoreError;

/// Sends one plain-text message to one address.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), CoreError>;
}
