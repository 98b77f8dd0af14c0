//! Downstream link checks: rated maximum, current usage, utilization
//!
//! All three share one pipeline: build the request, dispatch it onto its
//! own task, await the response channels under the configured timeout,
//! extract and parse the rate field, evaluate thresholds, render the
//! status line. Every failure along the way, transport and decode alike,
//! converges on a single recoverable UNKNOWN outcome.

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};
use tracing::{debug, instrument};

use crate::config::{LinkKind, ProbeConfig};
use crate::perfdata::PerformanceData;
use crate::soap::response::{CommonLinkProperties, DslInterfaceInfo, OnlineMonitor};
use crate::soap::{self, SoapRequest};
use crate::thresholds::AlertDirection;

use super::{CheckResult, evaluate_thresholds};

fn max_downstream_request(config: &ProbeConfig) -> SoapRequest {
    match config.link_kind() {
        LinkKind::Dsl => SoapRequest::new(
            config,
            "/upnp/control/wandslifconfig1",
            "WANDSLInterfaceConfig",
            "GetInfo",
        ),
        LinkKind::Other => SoapRequest::new(
            config,
            "/upnp/control/wancommonifconfig1",
            "WANCommonInterfaceConfig",
            "GetCommonLinkProperties",
        ),
    }
}

fn online_monitor_request(config: &ProbeConfig) -> SoapRequest {
    let mut request = SoapRequest::new(
        config,
        "/upnp/control/wancommonifconfig1",
        "WANCommonInterfaceConfig",
        "X_AVM-DE_GetOnlineMonitor",
    );
    request.push_variable("NewSyncGroupIndex", "0");
    request
}

fn extract_max_rate(kind: LinkKind, payload: &[u8]) -> Result<String> {
    match kind {
        LinkKind::Dsl => Ok(DslInterfaceInfo::from_payload(payload)?.downstream_curr_rate),
        LinkKind::Other => {
            Ok(CommonLinkProperties::from_payload(payload)?.layer1_downstream_max_bit_rate)
        }
    }
}

fn extract_current_bps(payload: &[u8]) -> Result<String> {
    let monitor = OnlineMonitor::from_payload(payload)?;
    let recent = monitor.most_recent_bps()?.to_string();
    Ok(recent)
}

/// One dispatch-await-decode round trip, shared by all three checks.
///
/// Exactly one call is in flight at a time; the cancellation signal is
/// owned here and handed to the awaiter so a timed-out task terminates
/// instead of running on unobserved.
async fn fetch_rate(
    config: &ProbeConfig,
    request: SoapRequest,
    extract: impl Fn(&[u8]) -> Result<String>,
) -> Result<f64> {
    let (resps, mut resp_rx) = mpsc::channel(1);
    let (errs, mut err_rx) = mpsc::channel(1);
    let (cancel, cancel_rx) = watch::channel(false);

    debug!("dispatching {}", request.soap_action());
    soap::spawn_soap_request(request, resps, errs, cancel_rx, config.debug);

    let mut payloads =
        soap::collect_soap_responses(&mut resp_rx, &mut err_rx, 1, config.timeout, &cancel)
            .await?;
    let payload = payloads.remove(0);

    let raw = extract(&payload)?;
    raw.parse::<f64>()
        .with_context(|| format!("`{raw}` is not a numeric rate"))
}

/// Maximum rated downstream of the link. Alerts when the capacity has
/// degraded *below* the threshold floor.
#[instrument(skip_all)]
pub async fn check_downstream_max(config: &ProbeConfig) -> CheckResult {
    let kind = config.link_kind();
    let rate = fetch_rate(config, max_downstream_request(config), |payload| {
        extract_max_rate(kind, payload)
    })
    .await;

    let downstream = match rate {
        Ok(rate) => rate / config.divisor_max,
        Err(e) => return CheckResult::unknown(format!("{e:#}")),
    };

    let mut perfdata = PerformanceData::new("downstream_max", downstream, "");
    let severity = evaluate_thresholds(
        downstream,
        &config.warning,
        &config.critical,
        AlertDirection::Below,
        &mut perfdata,
    );

    CheckResult {
        severity,
        message: format!("Max Downstream: {downstream:.2} Mbit/s"),
        perfdata: Some(perfdata),
    }
}

/// Instantaneous downstream rate from the online monitor. Alerts when the
/// load rises *above* the threshold ceiling.
#[instrument(skip_all)]
pub async fn check_downstream_current(config: &ProbeConfig) -> CheckResult {
    let rate = fetch_rate(config, online_monitor_request(config), extract_current_bps).await;

    // the box reports bytes per second
    let downstream = match rate {
        Ok(rate) => rate * 8.0 / config.divisor_current,
        Err(e) => return CheckResult::unknown(format!("{e:#}")),
    };

    let mut perfdata = PerformanceData::new("downstream_current", downstream, "");
    let severity = evaluate_thresholds(
        downstream,
        &config.warning,
        &config.critical,
        AlertDirection::Above,
        &mut perfdata,
    );

    CheckResult {
        severity,
        message: format!("Current Downstream: {downstream:.2} Mbit/s"),
        perfdata: Some(perfdata),
    }
}

/// Percentage of the rated maximum currently in use. The current rate is
/// fully fetched and decoded before the capacity call is dispatched, the
/// two calls are never in flight together.
#[instrument(skip_all)]
pub async fn check_downstream_usage(config: &ProbeConfig) -> CheckResult {
    let current =
        match fetch_rate(config, online_monitor_request(config), extract_current_bps).await {
            Ok(rate) => rate * 8.0 / config.divisor_current,
            Err(e) => return CheckResult::unknown(format!("{e:#}")),
        };

    let kind = config.link_kind();
    let max = match fetch_rate(config, max_downstream_request(config), |payload| {
        extract_max_rate(kind, payload)
    })
    .await
    {
        Ok(rate) => rate / config.divisor_max,
        Err(e) => return CheckResult::unknown(format!("{e:#}")),
    };

    // guard before the ratio, a zero maximum must not become NaN/inf
    if max == 0.0 {
        return CheckResult::unknown("Maximum Downstream is 0");
    }

    let usage = 100.0 / max * current;

    let mut perfdata = PerformanceData::new("downstream_usage", usage, "");
    perfdata.set_minimum(0.0);
    perfdata.set_maximum(100.0);

    let severity = evaluate_thresholds(
        usage,
        &config.warning,
        &config.critical,
        AlertDirection::Above,
        &mut perfdata,
    );

    CheckResult {
        severity,
        message: format!(
            "{usage:.2}% Downstream utilization ({current:.2} Mbit/s of {max:.2} Mbits)"
        ),
        perfdata: Some(perfdata),
    }
}
