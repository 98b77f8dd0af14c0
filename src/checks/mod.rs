//! The downstream checks and their shared evaluation pipeline

mod downstream;

pub use downstream::{
    check_downstream_current, check_downstream_max, check_downstream_usage,
};

use crate::perfdata::PerformanceData;
use crate::severity::Severity;
use crate::thresholds::{AlertDirection, Threshold};

/// Outcome of one check run: the severity for the exit status, the human
/// readable message, and the performance data when a value was computed.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub severity: Severity,
    pub message: String,
    pub perfdata: Option<PerformanceData>,
}

impl CheckResult {
    /// Terminal failure path shared by every check: one clean UNKNOWN line,
    /// no performance data.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Unknown,
            message: message.into(),
            perfdata: None,
        }
    }

    /// The one line this run prints to stdout.
    pub fn status_line(&self) -> String {
        match &self.perfdata {
            Some(perfdata) => format!("{} - {} {perfdata}", self.severity, self.message),
            None => format!("{} - {}", self.severity, self.message),
        }
    }
}

/// Evaluate a computed value against the optional warning and critical
/// thresholds.
///
/// Warning is always checked before critical and the severity only ever
/// escalates within the pass, so a breached critical threshold cannot be
/// overwritten by the warning outcome. Every threshold that is set gets
/// recorded in the performance data whether it was breached or not.
pub fn evaluate_thresholds(
    value: f64,
    warning: &Option<Threshold>,
    critical: &Option<Threshold>,
    direction: AlertDirection,
    perfdata: &mut PerformanceData,
) -> Severity {
    let mut severity = Severity::Ok;

    if let Some(warning) = warning {
        perfdata.set_warning(warning);
        if warning.alerts(direction, value) {
            severity = severity.escalate(Severity::Warning);
        }
    }

    if let Some(critical) = critical {
        perfdata.set_critical(critical);
        if critical.alerts(direction, value) {
            severity = severity.escalate(Severity::Critical);
        }
    }

    severity
}
