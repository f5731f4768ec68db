//! Cluster-level scope: the base unit-of-work handle shared by all
//! resource-kind services.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::cloud::{Network, NetworkClient};
use crate::error::Result;
use crate::store::{encode, ClusterProviderConfig, ClusterProviderStatus, ClusterRecord, StoreClient};

/// Input parameters for building a cluster scope.
pub struct ClusterScopeParams {
    pub client: Arc<dyn NetworkClient>,
    pub store: Option<Arc<dyn StoreClient>>,
    pub cluster: ClusterRecord,
}

/// Scope for one unit of work against a cluster's provider resources.
///
/// Holds the cloud and store handles plus the decoded provider config and
/// status. Kind-specific scopes compose it by reference instead of layering
/// specialized fields into a single type. Not shared across concurrent
/// reconcile cycles.
pub struct ClusterScope {
    pub client: Arc<dyn NetworkClient>,
    store: Option<Arc<dyn StoreClient>>,
    cluster: Mutex<ClusterRecord>,
    name: String,
    config: ClusterProviderConfig,
    status: Mutex<ClusterProviderStatus>,
}

impl ClusterScope {
    /// Build a scope, decoding the cluster's persisted provider payloads.
    /// Fails if either payload is malformed.
    pub fn new(params: ClusterScopeParams) -> Result<Self> {
        let config = params.cluster.decode_config()?;
        let status = params.cluster.decode_status()?;

        Ok(Self {
            client: params.client,
            store: params.store,
            name: params.cluster.name.clone(),
            cluster: Mutex::new(params.cluster),
            config,
            status: Mutex::new(status),
        })
    }

    /// Cluster name, used for resource naming and ownership filters.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decoded provider config; immutable input for the reconcile cycle.
    pub fn config(&self) -> &ClusterProviderConfig {
        &self.config
    }

    /// Snapshot of the in-memory network view.
    pub async fn network(&self) -> Network {
        self.status.lock().await.network.clone()
    }

    /// Replace the network view wholesale with an observed result. The ID,
    /// once set in a cycle, stays stable for the remainder of that cycle.
    pub async fn set_network(&self, network: Network) {
        self.status.lock().await.network = network;
    }

    /// Write the mutated provider status back to the store, best-effort.
    ///
    /// Persistence failures are logged, never propagated: a status write must
    /// not retroactively fail a successful resource mutation. Without a store
    /// client this only releases the scope.
    pub async fn close(&self) {
        let Some(store) = &self.store else {
            debug!("No store client, skipping status write for cluster {}", self.name);
            return;
        };

        let status = self.status.lock().await.clone();
        let mut cluster = self.cluster.lock().await;
        match encode(&status) {
            Ok(value) => {
                cluster.provider_status = value;
                cluster.updated_at = Utc::now().to_rfc3339();
            }
            Err(e) => {
                error!("Failed to encode provider status for cluster {}: {}", self.name, e);
                return;
            }
        }

        if let Err(e) = store.update_cluster_status(&cluster).await {
            error!("Failed to store provider status for cluster {}: {}", self.name, e);
        }
    }
}
