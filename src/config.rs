//! Parameters of a single probe run

use std::time::Duration;

use crate::thresholds::Threshold;

/// Everything one invocation needs to know. Built once from the command
/// line and immutable for the rest of the run.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub hostname: String,
    pub port: u16,
    pub username: String,
    pub password: String,

    /// Model group of the box; `"dsl"` (case-insensitive) selects the DSL
    /// specific service, everything else the common interface one.
    pub modelgroup: String,

    pub tls: bool,

    /// Bounds the whole await step of one remote call.
    pub timeout: Duration,

    /// Divisor applied to the raw maximum rate (kbit/s by default).
    pub divisor_max: f64,

    /// Divisor applied to the current rate after the bytes-to-bits
    /// conversion.
    pub divisor_current: f64,

    pub warning: Option<Threshold>,
    pub critical: Option<Threshold>,

    /// Verbose tracing of the SOAP exchange; does not change behavior.
    pub debug: bool,
}

impl ProbeConfig {
    pub fn link_kind(&self) -> LinkKind {
        LinkKind::from_modelgroup(&self.modelgroup)
    }
}

/// Link classification derived from the configured model group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Dsl,
    Other,
}

impl LinkKind {
    pub fn from_modelgroup(modelgroup: &str) -> Self {
        if modelgroup.eq_ignore_ascii_case("dsl") {
            LinkKind::Dsl
        } else {
            LinkKind::Other
        }
    }
}
