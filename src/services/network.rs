//! Network convergence: describe/create/delete against the provider, driving
//! the cluster network toward its desired state.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cloud::{Network, NetworkFilter, NetworkRequest, NetworkState};
use crate::error::{CloudError, Result};
use crate::scope::ClusterScope;
use crate::tags::{self, BuildParams, ResourceLifecycle, ROLE_COMMON};

/// CIDR used when the cluster config does not supply one.
pub const DEFAULT_NETWORK_CIDR: &str = "10.0.0.0/16";

/// Suffix of the provider-facing network name, after the cluster name.
const NETWORK_NAME_SUFFIX: &str = "vpc";

/// Convergence service for the cluster network.
///
/// The other resource kinds replicate this shape over their own client
/// operations. No locking across concurrent cycles: the ownership filter is
/// advisory, and a duplicate-creation race surfaces as a conflict on the
/// next describe pass instead of being prevented here.
pub struct NetworkService {
    scope: Arc<ClusterScope>,
}

impl NetworkService {
    pub fn new(scope: Arc<ClusterScope>) -> Self {
        Self { scope }
    }

    /// Drive the network toward the desired state and record the observed
    /// result in the scope's network view.
    pub async fn reconcile(&self) -> Result<()> {
        debug!("Reconciling network for cluster {}", self.scope.name());

        let network = match self.describe().await {
            Ok(network) => network,
            Err(e) if e.is_not_found() => self
                .create()
                .await
                .map_err(|e| e.with_context("failed to create new network"))?,
            Err(e) => return Err(e.with_context("failed to describe networks")),
        };

        debug!("Working on network {}", network.id);
        self.scope.set_network(network).await;
        Ok(())
    }

    /// Create the network, block until it is available, and tag it.
    ///
    /// When tagging fails the remote network is not rolled back; the error
    /// propagates and a later reconcile pass finds the untagged network only
    /// once it has an ID, so the leak is recovered by re-running reconcile.
    pub async fn create(&self) -> Result<Network> {
        // Prefer a CIDR already observed in the view, then the configured
        // desired CIDR, then the built-in default.
        let mut cidr_block = self.scope.network().await.cidr_block;
        if cidr_block.is_empty() {
            cidr_block = self.scope.config().network_cidr.clone();
        }
        if cidr_block.is_empty() {
            cidr_block = DEFAULT_NETWORK_CIDR.to_string();
        }

        let out = self
            .scope
            .client
            .create_network(&NetworkRequest { cidr_block })
            .await
            .map_err(|e| e.with_context("failed to create network"))?;

        self.scope
            .client
            .wait_until_available(&out.id)
            .await
            .map_err(|e| e.with_context(format!("failed to wait for network {}", out.id)))?;

        let name = format!("{}-{}", self.scope.name(), NETWORK_NAME_SUFFIX);
        tags::apply(
            self.scope.client.as_ref(),
            &out.id,
            &BuildParams {
                cluster_name: self.scope.name().to_string(),
                name,
                role: ROLE_COMMON.to_string(),
                lifecycle: ResourceLifecycle::Owned,
            },
        )
        .await
        .map_err(|e| e.with_context(format!("failed to tag network {}", out.id)))?;

        info!("Created new network {} with cidr {}", out.id, out.cidr_block);

        // The wait above has confirmed availability; the creation response
        // itself may still carry the initial pending state.
        Ok(Network {
            id: out.id,
            cidr_block: out.cidr_block,
            state: NetworkState::Available,
        })
    }

    /// Delete the network. An already-absent network is success.
    pub async fn delete(&self) -> Result<()> {
        let network = self.scope.network().await;

        match self.scope.client.delete_network(&network.id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                debug!("Network {} already deleted", network.id);
                return Ok(());
            }
            Err(e) => {
                return Err(e.with_context(format!("failed to delete network {}", network.id)))
            }
        }

        info!("Deleted network {}", network.id);
        Ok(())
    }

    /// Look up the network by explicit ID when one is known, else by the
    /// cluster ownership tag. Resolves to exactly one acceptable match:
    /// multiple matches are a conflict, never collapsed to the first one.
    pub async fn describe(&self) -> Result<Network> {
        let view = self.scope.network().await;

        let filter = if view.id.is_empty() {
            NetworkFilter::OwnedBy {
                cluster_name: self.scope.name().to_string(),
            }
        } else {
            NetworkFilter::Id(view.id.clone())
        };

        let out = match self.scope.client.describe_networks(&filter).await {
            Ok(out) => out,
            Err(e) if e.is_not_found() => return Err(e),
            Err(e) => return Err(e.with_context("failed to query provider for networks")),
        };

        let network = match out.as_slice() {
            [] => {
                return Err(CloudError::NotFound(format!(
                    "could not find network for cluster {}",
                    self.scope.name()
                )))
            }
            [network] => network.clone(),
            _ => {
                return Err(CloudError::Conflict(format!(
                    "found {} networks matching the supplied filters, expected one; \
                     clean up the duplicates",
                    out.len()
                )))
            }
        };

        // A network outside pending/available is treated as missing so the
        // create path runs again. Flagged for review: this can mask a network
        // stuck deleting instead of surfacing it.
        if !network.state.is_acceptable() {
            return Err(CloudError::NotFound(
                "could not find an available or pending network".to_string(),
            ));
        }

        Ok(network)
    }
}
