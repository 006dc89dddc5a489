//! Warning and error sink.
//!
//! Messages are recorded in order and mirrored to `tracing`. Recurring
//! warnings are deduplicated by their text and accumulate statistics of an
//! attached value until [`Diagnostics::summary`] reports them.

use std::collections::BTreeMap;

use tracing::{error, info, warn};

use super::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Severe,
    Fatal,
    /// Continues the previous message.
    Continue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

/// Occurrence statistics of one recurring warning.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RecurringWarning {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub sum: f64,
}

impl RecurringWarning {
    fn record(&mut self, value: Option<f64>) {
        self.count += 1;
        if let Some(v) = value {
            self.min = Some(self.min.map_or(v, |m| m.min(v)));
            self.max = Some(self.max.map_or(v, |m| m.max(v)));
            self.sum += v;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<Message>,
    recurring: BTreeMap<String, RecurringWarning>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!("{text}");
        self.push(Severity::Warning, text);
    }

    pub fn severe(&mut self, text: impl Into<String>) {
        let text = text.into();
        error!("{text}");
        self.push(Severity::Severe, text);
    }

    /// Adds detail to the most recent message.
    pub fn continue_message(&mut self, text: impl Into<String>) {
        let text = text.into();
        match self.messages.last().map(|m| m.severity) {
            Some(Severity::Severe | Severity::Fatal) => error!("   ** ~~~ ** {text}"),
            _ => warn!("   ** ~~~ ** {text}"),
        }
        self.push(Severity::Continue, text);
    }

    /// Records a fatal message and returns the error the caller propagates.
    #[must_use]
    pub fn fatal(&mut self, text: impl Into<String>) -> SimError {
        let text = text.into();
        error!("{text}");
        self.push(Severity::Fatal, text.clone());
        SimError::Fatal { message: text }
    }

    /// Counts one occurrence of a recurring warning, with an optional value
    /// whose statistics are reported in the summary.
    pub fn recurring_warning(&mut self, text: impl Into<String>, value: Option<f64>) {
        self.recurring.entry(text.into()).or_default().record(value);
    }

    /// Number of times the recurring warning has been counted.
    #[must_use]
    pub fn recurring_count(&self, text: &str) -> usize {
        self.recurring.get(text).map_or(0, |r| r.count)
    }

    #[must_use]
    pub fn recurring(&self, text: &str) -> Option<&RecurringWarning> {
        self.recurring.get(text)
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.messages.iter().filter(|m| m.severity == severity).count()
    }

    /// Returns `true` if any recorded message contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.text.contains(needle))
    }

    /// Reports every recurring warning with its statistics.
    ///
    /// Returns the report lines in key order.
    pub fn summary(&self) -> Vec<String> {
        self.recurring
            .iter()
            .map(|(text, stats)| {
                let line = match (stats.min, stats.max) {
                    (Some(min), Some(max)) => format!(
                        "{text}  This error occurred {} total times; Max={max:.6}  Min={min:.6}  Sum={:.6}",
                        stats.count, stats.sum
                    ),
                    _ => format!("{text}  This error occurred {} total times;", stats.count),
                };
                info!("{line}");
                line
            })
            .collect()
    }

    fn push(&mut self, severity: Severity, text: String) {
        self.messages.push(Message { severity, text });
    }
}
