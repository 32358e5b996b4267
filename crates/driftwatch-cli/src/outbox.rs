//! Filesystem stand-in for the notification channel.
//!
//! Alert delivery (the actual mail send) runs elsewhere; each rendered
//! message is dropped as a text file into an outbox directory the external
//! mailer drains.

use std::{fs, io, path::PathBuf};

use chrono::Utc;
use driftwatch_pipeline::Notifier;

pub struct OutboxNotifier {
  dir:       PathBuf,
  recipient: String,
  sequence:  usize,
}

impl OutboxNotifier {
  pub fn new(dir: PathBuf, recipient: String) -> io::Result<Self> {
    fs::create_dir_all(&dir)?;
    Ok(Self {
      dir,
      recipient,
      sequence: 0,
    })
  }
}

impl Notifier for OutboxNotifier {
  type Error = io::Error;

  fn notify(&mut self, subject: &str, body: &str) -> io::Result<()> {
    self.sequence += 1;
    let name = format!(
      "{}-{:03}.txt",
      Utc::now().format("%Y%m%d%H%M%S"),
      self.sequence
    );

    let mut message = String::new();
    if !self.recipient.is_empty() {
      message.push_str(&format!("To: {}\n", self.recipient));
    }
    message.push_str(&format!("Subject: {subject}\n\n{body}\n"));

    fs::write(self.dir.join(name), message)
  }
}
