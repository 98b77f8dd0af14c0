//! Monitoring plugin for AVM FRITZ!Box internet links
//!
//! Queries the TR-064 control endpoint of the box over SOAP-over-HTTP,
//! derives downstream link statistics and reports them as a single
//! monitoring-plugin status line with performance data. Each invocation is
//! one stateless probe cycle.

pub mod checks;
pub mod config;
pub mod perfdata;
pub mod severity;
pub mod soap;
pub mod thresholds;

pub use checks::CheckResult;
pub use severity::Severity;
