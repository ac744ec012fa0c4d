//! The policy bundle held by a cluster client
//!
//! [`Policies`] binds one load-balancing, one reconnection and one retry
//! policy for the lifetime of a client. It is immutable: to use different
//! policies, build a new bundle and a new client context.

use std::sync::Arc;

use tracing::debug;

use crate::error::{PolicyError, PolicyResult};
use crate::load_balancing::{LoadBalancingPolicy, RoundRobinPolicy};
use crate::reconnection::{ExponentialReconnectionPolicy, ReconnectionPolicy};
use crate::retry::{DefaultRetryPolicy, RetryPolicy};

/// Default load balancing: round-robin over all live nodes
pub fn default_load_balancing_policy() -> Arc<dyn LoadBalancingPolicy> {
    Arc::new(RoundRobinPolicy::new())
}

/// Default reconnection: exponential, 1 s base, 10 min ceiling
pub fn default_reconnection_policy() -> Arc<dyn ReconnectionPolicy> {
    Arc::new(ExponentialReconnectionPolicy::default())
}

/// Default retry: [`DefaultRetryPolicy`]
pub fn default_retry_policy() -> Arc<dyn RetryPolicy> {
    Arc::new(DefaultRetryPolicy::new())
}

/// Load-balancing, reconnection and retry policies of one cluster client
///
/// Cloning shares the same policy instances. Accessors hand back the exact
/// handles the bundle was built with.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use nodewise_core::{Policies, RoundRobinPolicy, LoadBalancingPolicy};
///
/// let lb: Arc<dyn LoadBalancingPolicy> = Arc::new(RoundRobinPolicy::new());
/// let policies = Policies::builder().load_balancing(Arc::clone(&lb)).build_with_defaults();
/// assert!(Arc::ptr_eq(policies.load_balancing_policy(), &lb));
/// ```
#[derive(Debug, Clone)]
pub struct Policies {
    load_balancing: Arc<dyn LoadBalancingPolicy>,
    reconnection: Arc<dyn ReconnectionPolicy>,
    retry: Arc<dyn RetryPolicy>,
}

impl Policies {
    pub fn new(
        load_balancing: Arc<dyn LoadBalancingPolicy>,
        reconnection: Arc<dyn ReconnectionPolicy>,
        retry: Arc<dyn RetryPolicy>,
    ) -> Self {
        Self { load_balancing, reconnection, retry }
    }

    pub fn builder() -> PoliciesBuilder {
        PoliciesBuilder::default()
    }

    /// Picks hosts for each operation
    pub fn load_balancing_policy(&self) -> &Arc<dyn LoadBalancingPolicy> {
        &self.load_balancing
    }

    /// Spaces out reconnection attempts to down nodes
    pub fn reconnection_policy(&self) -> &Arc<dyn ReconnectionPolicy> {
        &self.reconnection
    }

    /// Decides what to do after a failed attempt
    pub fn retry_policy(&self) -> &Arc<dyn RetryPolicy> {
        &self.retry
    }
}

impl Default for Policies {
    fn default() -> Self {
        Self::new(default_load_balancing_policy(), default_reconnection_policy(), default_retry_policy())
    }
}

/// Assembles a [`Policies`] bundle from optionally supplied policies
#[derive(Debug, Default)]
pub struct PoliciesBuilder {
    load_balancing: Option<Arc<dyn LoadBalancingPolicy>>,
    reconnection: Option<Arc<dyn ReconnectionPolicy>>,
    retry: Option<Arc<dyn RetryPolicy>>,
}

impl PoliciesBuilder {
    pub fn load_balancing(mut self, policy: Arc<dyn LoadBalancingPolicy>) -> Self {
        self.load_balancing = Some(policy);
        self
    }

    pub fn reconnection(mut self, policy: Arc<dyn ReconnectionPolicy>) -> Self {
        self.reconnection = Some(policy);
        self
    }

    pub fn retry(mut self, policy: Arc<dyn RetryPolicy>) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Build the bundle, failing if any policy was not supplied
    pub fn build(self) -> PolicyResult<Policies> {
        let load_balancing = self.load_balancing.ok_or_else(|| missing("load balancing"))?;
        let reconnection = self.reconnection.ok_or_else(|| missing("reconnection"))?;
        let retry = self.retry.ok_or_else(|| missing("retry"))?;
        Ok(Policies::new(load_balancing, reconnection, retry))
    }

    /// Build the bundle, filling unsupplied policies with the defaults
    pub fn build_with_defaults(self) -> Policies {
        Policies::new(
            self.load_balancing.unwrap_or_else(default_load_balancing_policy),
            self.reconnection.unwrap_or_else(default_reconnection_policy),
            self.retry.unwrap_or_else(default_retry_policy),
        )
    }
}

fn missing(policy: &'static str) -> PolicyError {
    debug!(policy, "Policy bundle is missing a policy");
    PolicyError::MissingPolicy { policy }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::reconnection::{ConstantReconnectionPolicy, ReconnectionSchedule};
    use crate::retry::FallthroughRetryPolicy;

    fn custom() -> (Arc<dyn LoadBalancingPolicy>, Arc<dyn ReconnectionPolicy>, Arc<dyn RetryPolicy>) {
        (
            Arc::new(RoundRobinPolicy::new()),
            Arc::new(ConstantReconnectionPolicy::new(Duration::from_secs(1)).unwrap()),
            Arc::new(FallthroughRetryPolicy::new()),
        )
    }

    /// Validates that accessors preserve identity.
    ///
    /// Assertions:
    /// - Confirms each accessor returns the exact instance supplied.
    /// - Confirms clones share the same instances.
    #[test]
    fn test_accessors_return_supplied_instances() {
        let (lb, reconnection, retry) = custom();
        let policies = Policies::new(Arc::clone(&lb), Arc::clone(&reconnection), Arc::clone(&retry));

        assert!(Arc::ptr_eq(policies.load_balancing_policy(), &lb));
        assert!(Arc::ptr_eq(policies.reconnection_policy(), &reconnection));
        assert!(Arc::ptr_eq(policies.retry_policy(), &retry));

        let cloned = policies.clone();
        assert!(Arc::ptr_eq(cloned.retry_policy(), policies.retry_policy()));
    }

    /// Validates builder rejection of absent policies.
    ///
    /// Assertions:
    /// - Ensures each missing policy is reported by name.
    /// - Confirms the message names the absent policy.
    #[test]
    fn test_builder_rejects_missing_policy() {
        let (lb, reconnection, retry) = custom();

        let err = Policies::builder().reconnection(Arc::clone(&reconnection)).retry(Arc::clone(&retry)).build();
        assert!(matches!(err, Err(PolicyError::MissingPolicy { policy: "load balancing" })));

        let err = Policies::builder().load_balancing(Arc::clone(&lb)).retry(Arc::clone(&retry)).build();
        assert!(matches!(err, Err(PolicyError::MissingPolicy { policy: "reconnection" })));

        let err = Policies::builder().load_balancing(lb).reconnection(reconnection).build().unwrap_err();
        assert!(matches!(err, PolicyError::MissingPolicy { policy: "retry" }));
        assert_eq!(err.to_string(), "Missing retry policy");
    }

    /// Validates a complete builder.
    ///
    /// Assertions:
    /// - Confirms a fully populated builder succeeds and keeps identity.
    #[test]
    fn test_builder_with_all_policies() {
        let (lb, reconnection, retry) = custom();
        let policies = Policies::builder()
            .load_balancing(Arc::clone(&lb))
            .reconnection(reconnection)
            .retry(retry)
            .build()
            .unwrap();
        assert!(Arc::ptr_eq(policies.load_balancing_policy(), &lb));
    }

    /// Validates the built-in defaults.
    ///
    /// Assertions:
    /// - Confirms the default reconnection schedule starts at one second.
    /// - Confirms the default retry policy retries an unavailable once.
    /// - Confirms the default load balancing yields an empty plan before
    ///   any node is known.
    #[test]
    fn test_defaults() {
        let policies = Policies::default();
        assert_eq!(policies.reconnection_policy().new_schedule().next_delay(), Duration::from_secs(1));
        assert!(policies.retry_policy().on_unavailable(crate::ConsistencyLevel::One, 1, 0, 0).is_retry());
        assert!(policies
            .load_balancing_policy()
            .new_query_plan(None, &crate::QueryHint::default())
            .is_empty());

        let filled = Policies::builder().build_with_defaults();
        assert_eq!(filled.reconnection_policy().new_schedule().next_delay(), Duration::from_secs(1));
    }

    /// Validates thread-safety bounds of the bundle.
    ///
    /// Assertions:
    /// - Confirms `Policies` is `Send + Sync`.
    #[test]
    fn test_bundle_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Policies>();
    }
}
