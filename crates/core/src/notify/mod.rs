pub mod error;
pub mod twilio;

use crate::domain::message::OutboundMessage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    /// Provider-assigned message identifier.
    pub sid: String,
    pub status: Option<String>,
}

#[async_trait::async_trait]
pub trait SmsSender: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn send(&self, message: &OutboundMessage) -> anyhow::Result<SentMessage>;
}

/// Stands in for the messaging provider on dry runs.
#[derive(Debug, Clone, Default)]
pub struct LogOnlySender;

#[async_trait::async_trait]
impl SmsSender for LogOnlySender {
    fn provider_name(&self) -> &'static str {
        "log_only"
    }

    async fn send(&self, message: &OutboundMessage) -> anyhow::Result<SentMessage> {
        tracing::info!(
            from = %message.from,
            to = %message.to,
            body = %message.body,
            "dry run: message not sent"
        );
        Ok(SentMessage {
            sid: "dry-run".to_string(),
            status: None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: Vec<SentMessage>,
    pub failed: usize,
}

impl DeliveryReport {
    pub fn attempted(&self) -> usize {
        self.sent.len() + self.failed
    }
}

/// Sends pre-formatted bodies from one fixed number to another.
pub struct Notifier<'a> {
    sender: &'a dyn SmsSender,
    from: String,
    to: String,
}

impl<'a> Notifier<'a> {
    pub fn new(sender: &'a dyn SmsSender, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            sender,
            from: from.into(),
            to: to.into(),
        }
    }

    /// One message per body, in order. A failed send is logged and the rest still go out.
    pub async fn send_all(&self, bodies: &[String]) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for (idx, body) in bodies.iter().enumerate() {
            let message = OutboundMessage {
                body: body.clone(),
                from: self.from.clone(),
                to: self.to.clone(),
            };

            match self.sender.send(&message).await {
                Ok(sent) => {
                    tracing::info!(
                        idx,
                        provider = self.sender.provider_name(),
                        sid = %sent.sid,
                        status = sent.status.as_deref().unwrap_or("-"),
                        "message sent"
                    );
                    report.sent.push(sent);
                }
                Err(err) => {
                    tracing::error!(
                        idx,
                        provider = self.sender.provider_name(),
                        error = %err,
                        "message send failed"
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }
}

impl std::fmt::Debug for Notifier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("provider", &self.sender.provider_name())
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}
