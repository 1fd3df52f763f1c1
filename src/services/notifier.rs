use crate::adapters::push::PushProvider;
use crate::domain::device::DeviceToken;
use crate::domain::notification::{DeliveryReport, NotificationContent, PushMessage};
use crate::storage::device_registry::DeviceRegistry;
use opentelemetry::{KeyValue, global, metrics::Counter};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Clone, Debug)]
struct Metrics {
    delivered: Counter<u64>,
    failed: Counter<u64>,
    evicted_tokens: Counter<u64>,
    batch_errors: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("push-relay");
        Self {
            delivered: meter
                .u64_counter("push_delivered_total")
                .with_description("Total number of push tickets accepted by the provider")
                .build(),
            failed: meter
                .u64_counter("push_failed_total")
                .with_description("Total number of push tickets rejected by the provider")
                .build(),
            evicted_tokens: meter
                .u64_counter("push_evicted_tokens_total")
                .with_description("Total number of malformed tokens removed from the registry")
                .build(),
            batch_errors: meter
                .u64_counter("push_batch_errors_total")
                .with_description("Total number of push batches that could not be submitted")
                .build(),
        }
    }
}

/// Fans a notification out to a set of device tokens through the push provider.
///
/// Delivery is at-most-once: a batch whose submission fails is logged and
/// dropped from the tally, never retried.
#[derive(Clone, Debug)]
pub struct Notifier {
    registry: Arc<DeviceRegistry>,
    provider: Arc<dyn PushProvider>,
    metrics: Metrics,
}

impl Notifier {
    pub fn new(registry: Arc<DeviceRegistry>, provider: Arc<dyn PushProvider>) -> Self {
        Self { registry, provider, metrics: Metrics::new() }
    }

    /// Sends `content` to every token in `targets`.
    ///
    /// Tokens the provider does not recognise are evicted from the registry (and
    /// from `owner`'s set, when given) and counted as neither delivered nor failed.
    #[tracing::instrument(level = "debug", skip_all, fields(targets = targets.len(), owner = owner.unwrap_or("")))]
    pub async fn send_batch(
        &self,
        targets: &BTreeSet<DeviceToken>,
        owner: Option<&str>,
        content: &NotificationContent,
        extra_data: Map<String, Value>,
    ) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        if targets.is_empty() {
            return report;
        }

        let mut data = extra_data;
        data.insert("timestamp".into(), Value::String(send_timestamp()));

        let mut messages = Vec::with_capacity(targets.len());
        for token in targets {
            if !self.provider.is_valid_token(token) {
                tracing::warn!(token = %token, "Invalid push token, evicting");
                self.registry.evict(token, owner);
                report.evicted += 1;
                continue;
            }
            messages.push(PushMessage::new(token.as_str(), content, data.clone()));
        }
        report.attempted = messages.len();
        if report.evicted > 0 {
            self.metrics.evicted_tokens.add(report.evicted as u64, &[]);
        }

        for chunk in messages.chunks(self.provider.max_batch_size().max(1)) {
            let tickets = match self.provider.send_batch(chunk).await {
                Ok(tickets) => tickets,
                Err(e) => {
                    tracing::error!(error = %e, batch_size = chunk.len(), "Failed to send push batch");
                    self.metrics.batch_errors.add(1, &[]);
                    continue;
                }
            };
            tracing::info!(batch_size = chunk.len(), "Sent push batch");

            for ticket in &tickets {
                if ticket.is_ok() {
                    report.delivered += 1;
                } else {
                    report.failed += 1;
                    tracing::error!(
                        reason = ticket.message.as_deref().unwrap_or("unknown error"),
                        details = ?ticket.details,
                        "Push ticket rejected"
                    );
                }
            }
        }

        self.metrics.delivered.add(report.delivered as u64, &[KeyValue::new("outcome", "ok")]);
        self.metrics.failed.add(report.failed as u64, &[KeyValue::new("outcome", "error")]);
        report
    }
}

fn send_timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&Rfc3339).unwrap_or_else(|_| now.unix_timestamp().to_string())
}
