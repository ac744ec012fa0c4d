//! Declarative policy configuration
//!
//! A [`PoliciesConfig`] describes which policy variant to use for each slot
//! and with which parameters. It is usually read from TOML:
//!
//! ```toml
//! [load_balancing]
//! kind = "dc_aware_round_robin"
//! local_dc = "eu-west"
//! used_hosts_per_remote_dc = 2
//!
//! [reconnection]
//! kind = "exponential"
//! base_delay_ms = 500
//! max_delay_ms = 60000
//!
//! [retry]
//! kind = "default"
//! log_decisions = true
//! ```
//!
//! Omitted sections fall back to the built-in defaults.

use std::sync::Arc;
use std::time::Duration;

use nodewise_common::{duration_millis, CommonError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PolicyResult;
use crate::load_balancing::{DcAwareRoundRobinPolicy, LoadBalancingPolicy, RoundRobinPolicy};
use crate::policies::Policies;
use crate::reconnection::{
    ConstantReconnectionPolicy, ExponentialReconnectionPolicy, ReconnectionPolicy,
    DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY,
};
use crate::retry::{
    DefaultRetryPolicy, DowngradingConsistencyRetryPolicy, FallthroughRetryPolicy,
    LoggingRetryPolicy, RetryPolicy,
};

/// Load balancing section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadBalancingConfig {
    #[default]
    RoundRobin,
    DcAwareRoundRobin {
        #[serde(default)]
        local_dc: Option<String>,
        #[serde(default)]
        used_hosts_per_remote_dc: usize,
        #[serde(default)]
        allow_remote_dcs_for_local_consistency: bool,
    },
}

impl LoadBalancingConfig {
    /// Build the policy, rejecting a blank `local_dc`
    ///
    /// Leave `local_dc` out to infer the local datacenter from the first
    /// labelled node instead.
    pub fn build(&self) -> PolicyResult<Arc<dyn LoadBalancingPolicy>> {
        Ok(match self {
            Self::RoundRobin => Arc::new(RoundRobinPolicy::new()),
            Self::DcAwareRoundRobin {
                local_dc,
                used_hosts_per_remote_dc,
                allow_remote_dcs_for_local_consistency,
            } => {
                let mut policy = DcAwareRoundRobinPolicy::new()
                    .with_used_hosts_per_remote_dc(*used_hosts_per_remote_dc)
                    .allow_remote_dcs_for_local_consistency(*allow_remote_dcs_for_local_consistency);
                if let Some(dc) = local_dc {
                    let dc = dc.trim();
                    if dc.is_empty() {
                        warn!("Rejected blank local datacenter");
                        return Err(CommonError::config("local_dc", "must not be blank").into());
                    }
                    policy = policy.with_local_dc(dc);
                }
                Arc::new(policy)
            }
        })
    }
}

fn default_base_delay() -> Duration {
    DEFAULT_BASE_DELAY
}

fn default_max_delay() -> Duration {
    DEFAULT_MAX_DELAY
}

/// Reconnection section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconnectionConfig {
    Exponential {
        #[serde(rename = "base_delay_ms", with = "duration_millis", default = "default_base_delay")]
        base_delay: Duration,
        #[serde(rename = "max_delay_ms", with = "duration_millis", default = "default_max_delay")]
        max_delay: Duration,
    },
    Constant {
        #[serde(rename = "delay_ms", with = "duration_millis")]
        delay: Duration,
    },
}

impl Default for ReconnectionConfig {
    fn default() -> Self {
        Self::Exponential { base_delay: DEFAULT_BASE_DELAY, max_delay: DEFAULT_MAX_DELAY }
    }
}

impl ReconnectionConfig {
    /// Build the policy, validating its delays
    pub fn build(&self) -> PolicyResult<Arc<dyn ReconnectionPolicy>> {
        Ok(match *self {
            Self::Exponential { base_delay, max_delay } => {
                Arc::new(ExponentialReconnectionPolicy::new(base_delay, max_delay)?)
            }
            Self::Constant { delay } => Arc::new(ConstantReconnectionPolicy::new(delay)?),
        })
    }
}

/// Which retry policy to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryKind {
    #[default]
    Default,
    DowngradingConsistency,
    Fallthrough,
}

/// Retry section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default)]
    pub kind: RetryKind,
    /// Wrap the policy so retries and ignores are logged
    #[serde(default)]
    pub log_decisions: bool,
}

impl RetryConfig {
    pub fn build(&self) -> Arc<dyn RetryPolicy> {
        match (self.kind, self.log_decisions) {
            (RetryKind::Default, false) => Arc::new(DefaultRetryPolicy::new()),
            (RetryKind::Default, true) => Arc::new(LoggingRetryPolicy::new(DefaultRetryPolicy::new())),
            (RetryKind::DowngradingConsistency, false) => {
                Arc::new(DowngradingConsistencyRetryPolicy::new())
            }
            (RetryKind::DowngradingConsistency, true) => {
                Arc::new(LoggingRetryPolicy::new(DowngradingConsistencyRetryPolicy::new()))
            }
            (RetryKind::Fallthrough, false) => Arc::new(FallthroughRetryPolicy::new()),
            (RetryKind::Fallthrough, true) => {
                Arc::new(LoggingRetryPolicy::new(FallthroughRetryPolicy::new()))
            }
        }
    }
}

/// Full policy configuration of a cluster client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoliciesConfig {
    #[serde(default)]
    pub load_balancing: LoadBalancingConfig,
    #[serde(default)]
    pub reconnection: ReconnectionConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl PoliciesConfig {
    /// Parse a TOML document
    pub fn from_toml_str(input: &str) -> PolicyResult<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Render as a TOML document
    pub fn to_toml_string(&self) -> PolicyResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Validate and instantiate every configured policy
    pub fn build(&self) -> PolicyResult<Policies> {
        let policies =
            Policies::new(self.load_balancing.build()?, self.reconnection.build()?, self.retry.build());
        debug!(
            load_balancing = ?self.load_balancing,
            reconnection = ?self.reconnection,
            retry = ?self.retry,
            "Built policies from configuration"
        );
        Ok(policies)
    }
}
