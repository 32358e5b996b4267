//! Best-effort delivery of alert events.
//!
//! The engine only *returns* events; this module is the single place that
//! talks to the notification channel. Delivery failure is logged and
//! swallowed: an alert counts as sent once attempted, and a failed send
//! never rolls back the state transition that produced it.

use driftwatch_core::alert::AlertEvent;
use tracing::{info, warn};

/// Outbound notification channel. Mail transport, throttling, and
/// recipient handling belong to the implementation.
pub trait Notifier {
  type Error: std::error::Error + Send + Sync + 'static;

  fn notify(
    &mut self,
    subject: &str,
    body: &str,
  ) -> Result<(), Self::Error>;
}

/// Render and deliver `events`; returns how many sends were attempted
/// without error.
pub fn dispatch<N: Notifier>(events: &[AlertEvent], notifier: &mut N) -> usize {
  let mut delivered = 0;
  for event in events {
    let subject = event.subject();
    match notifier.notify(&subject, &event.body()) {
      Ok(()) => {
        info!(buoy = %event.buoy_id(), condition = %event.condition(), "alert sent");
        delivered += 1;
      }
      Err(err) => {
        warn!(buoy = %event.buoy_id(), %err, "failed to send notification");
      }
    }
  }
  delivered
}
