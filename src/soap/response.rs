//! Decoded response shapes for the queried TR-064 actions
//!
//! The box answers with a SOAP envelope whose body carries flat, string
//! typed fields. Each shape extracts exactly the field its check needs;
//! parsing the numeric strings to floats stays with the consumer.

use anyhow::{Context, Result};
use regex::Regex;

/// Pull the text content of one named element out of the raw payload.
fn extract_field(payload: &[u8], field: &str) -> Result<String> {
    let body = std::str::from_utf8(payload).context("SOAP response is not valid UTF-8")?;

    // field names are fixed identifiers from the TR-064 schema
    let pattern = Regex::new(&format!(
        "<{field}(?:\\s[^>]*)?>([^<]*)</{field}>",
        field = regex::escape(field)
    ))
    .context("invalid field pattern")?;

    let captures = pattern
        .captures(body)
        .with_context(|| format!("field `{field}` missing from SOAP response"))?;

    Ok(captures[1].trim().to_string())
}

/// `WANDSLInterfaceConfig.GetInfo`: rate the DSL link currently syncs at.
#[derive(Debug, Clone)]
pub struct DslInterfaceInfo {
    pub downstream_curr_rate: String,
}

impl DslInterfaceInfo {
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            downstream_curr_rate: extract_field(payload, "NewDownstreamCurrRate")?,
        })
    }
}

/// `WANCommonInterfaceConfig.GetCommonLinkProperties`: rated layer-1
/// maximum of the common interface.
#[derive(Debug, Clone)]
pub struct CommonLinkProperties {
    pub layer1_downstream_max_bit_rate: String,
}

impl CommonLinkProperties {
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            layer1_downstream_max_bit_rate: extract_field(
                payload,
                "NewLayer1DownstreamMaxBitRate",
            )?,
        })
    }
}

/// `WANCommonInterfaceConfig.X_AVM-DE_GetOnlineMonitor`: downstream
/// byte-rate history, most recent sample first.
#[derive(Debug, Clone)]
pub struct OnlineMonitor {
    pub ds_current_bps: String,
}

impl OnlineMonitor {
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            ds_current_bps: extract_field(payload, "NewDS_CurrentBPS")?,
        })
    }

    /// First element of the comma separated history.
    pub fn most_recent_bps(&self) -> Result<&str> {
        self.ds_current_bps
            .split(',')
            .next()
            .filter(|sample| !sample.is_empty())
            .context("downstream history is empty")
    }
}
