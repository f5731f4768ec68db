//! Machine-level scope composed over the cluster scope.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, error};

use super::cluster::{ClusterScope, ClusterScopeParams};
use crate::cloud::NetworkClient;
use crate::error::Result;
use crate::store::{
    encode, ClusterRecord, MachineProviderConfig, MachineProviderStatus, MachineRecord,
    StoreClient,
};

/// Input parameters for building a machine scope.
pub struct MachineScopeParams {
    pub client: Arc<dyn NetworkClient>,
    pub store: Option<Arc<dyn StoreClient>>,
    pub cluster: ClusterRecord,
    pub machine: MachineRecord,
}

/// Scope for one unit of work around a machine and its cluster.
///
/// Built once per actuator operation. Composes the shared cluster scope by
/// reference and adds the machine record plus its decoded provider payloads.
pub struct MachineScope {
    /// Shared base scope; cluster handles and the network view live here.
    pub scope: Arc<ClusterScope>,
    store: Option<Arc<dyn StoreClient>>,
    machine: Mutex<MachineRecord>,
    name: String,
    config: MachineProviderConfig,
    status: Mutex<MachineProviderStatus>,
}

impl MachineScope {
    /// Build a machine scope, decoding the machine's persisted provider
    /// payloads. Fails if either payload is malformed.
    pub fn new(params: MachineScopeParams) -> Result<Self> {
        let store = params.store.clone();
        let scope = ClusterScope::new(ClusterScopeParams {
            client: params.client,
            store: params.store,
            cluster: params.cluster,
        })?;

        let config = params.machine.decode_config()?;
        let status = params.machine.decode_status()?;

        Ok(Self {
            scope: Arc::new(scope),
            store,
            name: params.machine.name.clone(),
            machine: Mutex::new(params.machine),
            config,
            status: Mutex::new(status),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cluster_name(&self) -> &str {
        self.scope.name()
    }

    pub fn config(&self) -> &MachineProviderConfig {
        &self.config
    }

    /// Snapshot of the machine's provider status scratch area.
    pub async fn status(&self) -> MachineProviderStatus {
        self.status.lock().await.clone()
    }

    /// Replace the machine's provider status wholesale.
    pub async fn set_status(&self, status: MachineProviderStatus) {
        *self.status.lock().await = status;
    }

    /// Snapshot of the machine record as currently mutated.
    pub async fn machine(&self) -> MachineRecord {
        self.machine.lock().await.clone()
    }

    /// Persist the mutated machine record and its provider status, then
    /// close the inner cluster scope. Best-effort: every failure is logged,
    /// none is returned to the caller.
    ///
    /// The full-record update runs first; the status-only update is attempted
    /// afterwards because the object is known to exist by then.
    pub async fn close(&self) {
        self.persist().await;
        self.scope.close().await;
    }

    async fn persist(&self) {
        let Some(store) = &self.store else {
            debug!("No store client, skipping persistence for machine {}", self.name);
            return;
        };

        {
            let mut machine = self.machine.lock().await;
            machine.updated_at = Utc::now().to_rfc3339();
            if let Err(e) = store.update_machine(&machine).await {
                error!("Failed to update machine {}: {}", self.name, e);
            }
        }

        if let Err(e) = self.store_machine_status(store.as_ref()).await {
            error!("Failed to store provider status for machine {}: {}", self.name, e);
        }
    }

    async fn store_machine_status(&self, store: &dyn StoreClient) -> Result<()> {
        let status = self.status.lock().await.clone();
        let mut machine = self.machine.lock().await;
        machine.provider_status = encode(&status)?;
        store.update_machine_status(&machine).await
    }
}
