use crate::email_message::EmailMessage;

use hg_core::User;

use log::{info, warn};
use tokio::sync::mpsc;

const QUEUE_CAPACITY: usize = 256;

/// Handle to the background email worker.
///
/// Delivery is strictly best-effort: `enqueue` never blocks the request
/// path, and a full queue drops the message with a warning. The worker
/// "sends" by structured log line; a real transport slots in behind it
/// without touching callers.
#[derive(Clone)]
pub struct Mailer {
    tx: mpsc::Sender<EmailMessage>,
}

impl Mailer {
    /// Spawn the worker and return the sending handle.
    pub fn spawn() -> Self {
        let (tx, mut rx) = mpsc::channel::<EmailMessage>(QUEUE_CAPACITY);

        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                info!(
                    "Email sent: to={} subject=\"{}\" ({} bytes)",
                    message.to,
                    message.subject,
                    message.body.len()
                );
            }
        });

        Self { tx }
    }

    /// Queue a message. Returns whether it was accepted.
    pub fn enqueue(&self, message: EmailMessage) -> bool {
        match self.tx.try_send(message) {
            Ok(()) => true,
            Err(e) => {
                warn!("Email queue full, dropping message: {}", e);
                false
            }
        }
    }

    pub fn send_verification_email(&self, user: &User, token: &str) -> bool {
        self.enqueue(EmailMessage {
            to: user.email.clone(),
            subject: "Verify your email address".to_string(),
            body: format!(
                "Hi {},\n\nPlease verify your email address using this token:\n\n{}\n\n\
                 The token expires in 24 hours.",
                display_name(user),
                token
            ),
        })
    }

    pub fn send_password_reset_email(&self, user: &User, token: &str) -> bool {
        self.enqueue(EmailMessage {
            to: user.email.clone(),
            subject: "Password reset requested".to_string(),
            body: format!(
                "Hi {},\n\nUse this token to reset your password:\n\n{}\n\n\
                 The token expires in 1 hour. If you did not request a reset, ignore this email.",
                display_name(user),
                token
            ),
        })
    }

    pub fn send_welcome_email(&self, user: &User) -> bool {
        self.enqueue(EmailMessage {
            to: user.email.clone(),
            subject: "Welcome!".to_string(),
            body: format!(
                "Hi {},\n\nYour account has been created. \
                 Please verify your email address to unlock all features.",
                display_name(user)
            ),
        })
    }

    /// Security event notification; `recipient` overrides the user's
    /// address (email-change notices go to the old address).
    pub fn send_security_notification(
        &self,
        user: &User,
        event: &str,
        details: &str,
        recipient: Option<&str>,
    ) -> bool {
        self.enqueue(EmailMessage {
            to: recipient.unwrap_or(&user.email).to_string(),
            subject: format!("Security alert: {}", event),
            body: format!(
                "Hi {},\n\nWe detected the following activity on your account:\n\n{}\n\n\
                 If this was not you, please change your password immediately.",
                display_name(user),
                details
            ),
        })
    }
}

fn display_name(user: &User) -> String {
    let full = format!("{} {}", user.first_name, user.last_name);
    let trimmed = full.trim();
    if trimmed.is_empty() {
        user.username.clone()
    } else {
        trimmed.to_string()
    }
}
