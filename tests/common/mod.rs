//! Shared test utilities for cirrus-actuator integration tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use cirrus_actuator::cloud::{Network, NetworkClient, NetworkFilter, NetworkRequest, NetworkState};
use cirrus_actuator::error::{CloudError, Result, CODE_NETWORK_NOT_FOUND};
use cirrus_actuator::store::{ClusterRecord, MachineRecord, StoreClient};
use cirrus_actuator::tags::TagSet;

/// Initialize tracing once for a test binary; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cirrus_actuator=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// In-memory cloud provider fake.
#[derive(Default)]
pub struct FakeProvider {
    pub networks: Mutex<Vec<Network>>,
    pub tags: Mutex<HashMap<String, TagSet>>,
    pub create_calls: Mutex<usize>,
}

impl FakeProvider {
    pub fn create_calls(&self) -> usize {
        *self.create_calls.lock().unwrap()
    }

    pub fn tags_for(&self, id: &str) -> Option<TagSet> {
        self.tags.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl NetworkClient for FakeProvider {
    async fn describe_networks(&self, filter: &NetworkFilter) -> Result<Vec<Network>> {
        let networks = self.networks.lock().unwrap();
        let tags = self.tags.lock().unwrap();
        Ok(networks
            .iter()
            .filter(|n| match filter {
                NetworkFilter::Id(id) => &n.id == id,
                NetworkFilter::OwnedBy { cluster_name } => tags
                    .get(&n.id)
                    .is_some_and(|t| &t.cluster_name == cluster_name),
            })
            .cloned()
            .collect())
    }

    async fn create_network(&self, req: &NetworkRequest) -> Result<Network> {
        *self.create_calls.lock().unwrap() += 1;
        let network = Network {
            id: format!("net-{}", Uuid::new_v4()),
            cidr_block: req.cidr_block.clone(),
            state: NetworkState::Pending,
        };
        self.networks.lock().unwrap().push(network.clone());
        Ok(network)
    }

    async fn wait_until_available(&self, id: &str) -> Result<()> {
        let mut networks = self.networks.lock().unwrap();
        match networks.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.state = NetworkState::Available;
                Ok(())
            }
            None => Err(CloudError::api(CODE_NETWORK_NOT_FOUND, "no such network")),
        }
    }

    async fn delete_network(&self, id: &str) -> Result<()> {
        let mut networks = self.networks.lock().unwrap();
        let before = networks.len();
        networks.retain(|n| n.id != id);
        if networks.len() == before {
            return Err(CloudError::api(CODE_NETWORK_NOT_FOUND, "no such network"));
        }
        Ok(())
    }

    async fn apply_tags(&self, resource_id: &str, tags: &TagSet) -> Result<()> {
        self.tags
            .lock()
            .unwrap()
            .insert(resource_id.to_string(), tags.clone());
        Ok(())
    }
}

/// In-memory store fake recording the last persisted records, with a
/// switchable status-write failure.
#[derive(Default)]
pub struct FakeStore {
    pub machines: Mutex<HashMap<String, MachineRecord>>,
    pub clusters: Mutex<HashMap<String, ClusterRecord>>,
    pub fail_status_updates: bool,
}

impl FakeStore {
    pub fn machine(&self, id: &str) -> Option<MachineRecord> {
        self.machines.lock().unwrap().get(id).cloned()
    }

    pub fn cluster(&self, id: &str) -> Option<ClusterRecord> {
        self.clusters.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl StoreClient for FakeStore {
    async fn update_machine(&self, machine: &MachineRecord) -> Result<()> {
        self.machines
            .lock()
            .unwrap()
            .insert(machine.id.clone(), machine.clone());
        Ok(())
    }

    async fn update_machine_status(&self, machine: &MachineRecord) -> Result<()> {
        if self.fail_status_updates {
            return Err(CloudError::transport("update machine status", "store offline"));
        }
        let mut machines = self.machines.lock().unwrap();
        if let Some(stored) = machines.get_mut(&machine.id) {
            stored.provider_status = machine.provider_status.clone();
        } else {
            machines.insert(machine.id.clone(), machine.clone());
        }
        Ok(())
    }

    async fn update_cluster_status(&self, cluster: &ClusterRecord) -> Result<()> {
        if self.fail_status_updates {
            return Err(CloudError::transport("update cluster status", "store offline"));
        }
        let mut clusters = self.clusters.lock().unwrap();
        if let Some(stored) = clusters.get_mut(&cluster.id) {
            stored.provider_status = cluster.provider_status.clone();
        } else {
            clusters.insert(cluster.id.clone(), cluster.clone());
        }
        Ok(())
    }
}
