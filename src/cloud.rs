//! Cloud provider client seam and resource types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tags::TagSet;

/// Observed lifecycle state of a provider network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkState {
    #[default]
    Unknown,
    Pending,
    Available,
    Deleting,
    Deleted,
}

impl NetworkState {
    /// States that count as "found" for convergence purposes. Anything else
    /// is treated like an absent network and forces the create path.
    pub fn is_acceptable(self) -> bool {
        matches!(self, NetworkState::Pending | NetworkState::Available)
    }
}

/// A provider network as created or observed remotely.
///
/// Overwritten wholesale on every successful describe/create, never merged.
/// The in-memory representation lives only for one reconcile cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub id: String,
    pub cidr_block: String,
    pub state: NetworkState,
}

/// Lookup filter for describe calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkFilter {
    /// Explicit ID, used once an ID has been observed in the cycle.
    Id(String),
    /// Ownership-tag filter scoped to the cluster that created the resource.
    OwnedBy { cluster_name: String },
}

/// Creation request for a new network.
#[derive(Debug, Clone)]
pub struct NetworkRequest {
    pub cidr_block: String,
}

/// Remote provider operations consumed by the network service.
///
/// Implementations are expected to be safe for concurrent use; this crate
/// issues requests but performs no coordination between callers. Bounded
/// waits and cancellation are the implementation's responsibility.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Query networks matching the filter.
    async fn describe_networks(&self, filter: &NetworkFilter) -> Result<Vec<Network>>;

    /// Issue a creation request.
    async fn create_network(&self, req: &NetworkRequest) -> Result<Network>;

    /// Block until the network reports Available, or the provider gives up.
    async fn wait_until_available(&self, id: &str) -> Result<()>;

    /// Issue a deletion request. An absent network surfaces as a
    /// NotFound-class error; idempotency is the caller's concern.
    async fn delete_network(&self, id: &str) -> Result<()>;

    /// Attach a tag set to a resource in one call.
    async fn apply_tags(&self, resource_id: &str, tags: &TagSet) -> Result<()>;
}
