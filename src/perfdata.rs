//! Performance data rendering in monitoring-plugin syntax
//!
//! One metric becomes one token of the form
//! `|label=value[unit][;warn][;crit][;min][;max]`, appended to the status
//! line for downstream collection by the monitoring system.

use std::fmt;

use crate::thresholds::Threshold;

#[derive(Debug, Clone)]
pub struct PerformanceData {
    label: String,
    value: f64,
    unit: String,
    warning: Option<Threshold>,
    critical: Option<Threshold>,
    minimum: Option<f64>,
    maximum: Option<f64>,
}

impl PerformanceData {
    pub fn new(label: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value,
            unit: unit.into(),
            warning: None,
            critical: None,
            minimum: None,
            maximum: None,
        }
    }

    pub fn set_warning(&mut self, threshold: &Threshold) {
        self.warning = Some(threshold.clone());
    }

    pub fn set_critical(&mut self, threshold: &Threshold) {
        self.critical = Some(threshold.clone());
    }

    pub fn set_minimum(&mut self, minimum: f64) {
        self.minimum = Some(minimum);
    }

    pub fn set_maximum(&mut self, maximum: f64) {
        self.maximum = Some(maximum);
    }

    pub fn render(&self) -> String {
        let mut out = format!("|{}={}{}", self.label, self.value, self.unit);

        if let Some(warning) = &self.warning {
            out.push(';');
            out.push_str(&warning.to_string());
        }
        if let Some(critical) = &self.critical {
            out.push(';');
            out.push_str(&critical.to_string());
        }
        if let Some(minimum) = self.minimum {
            out.push_str(&format!(";{minimum}"));
        }
        if let Some(maximum) = self.maximum {
            out.push_str(&format!(";{maximum}"));
        }

        out
    }
}

impl fmt::Display for PerformanceData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
