//! Control-plane store records and the persistence seam.
//!
//! Machine and cluster records are owned by the external store; a scope
//! borrows read/write access to them for one unit of work. The provider
//! config and status fields are opaque encoded blobs: decoded once at scope
//! creation, re-encoded and written back at scope close.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cloud::Network;
use crate::error::Result;

/// Desired-state descriptor for a machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineRecord {
    pub id: String,
    pub name: String,
    /// Opaque encoded provider config; decoded once per scope.
    pub provider_config: Value,
    /// Opaque encoded provider status; round-tripped on scope close.
    pub provider_status: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl MachineRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: id.into(),
            name: name.into(),
            provider_config: Value::Null,
            provider_status: Value::Null,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn decode_config(&self) -> Result<MachineProviderConfig> {
        decode(&self.provider_config)
    }

    pub fn decode_status(&self) -> Result<MachineProviderStatus> {
        decode(&self.provider_status)
    }
}

/// Desired-state descriptor for a cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterRecord {
    pub id: String,
    pub name: String,
    pub provider_config: Value,
    pub provider_status: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl ClusterRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: id.into(),
            name: name.into(),
            provider_config: Value::Null,
            provider_status: Value::Null,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn decode_config(&self) -> Result<ClusterProviderConfig> {
        decode(&self.provider_config)
    }

    pub fn decode_status(&self) -> Result<ClusterProviderStatus> {
        decode(&self.provider_status)
    }
}

/// Decoded machine provider config; immutable input for the reconcile cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MachineProviderConfig {
    #[serde(default)]
    pub instance_type: String,
    #[serde(default)]
    pub image_id: Option<String>,
}

/// Decoded machine provider status; mutable scratch, written back on close.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineProviderStatus {
    #[serde(default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub instance_state: Option<String>,
}

/// Decoded cluster provider config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterProviderConfig {
    #[serde(default)]
    pub region: String,
    /// Desired network CIDR; empty means use the built-in default.
    #[serde(default)]
    pub network_cidr: String,
}

/// Decoded cluster provider status, holding the observed network view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterProviderStatus {
    #[serde(default)]
    pub network: Network,
}

fn decode<T>(value: &Value) -> Result<T>
where
    T: for<'de> Deserialize<'de> + Default,
{
    // Unset payload means a record that has never been reconciled.
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value.clone())?)
}

/// Encode a provider payload back into its opaque persisted form.
pub fn encode<T: Serialize>(payload: &T) -> Result<Value> {
    Ok(serde_json::to_value(payload)?)
}

/// Persistence operations for mutated records.
///
/// Implementations are assumed safe for concurrent use; the scope issues
/// requests but never coordinates between units of work.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Persist the full mutated machine record.
    async fn update_machine(&self, machine: &MachineRecord) -> Result<()>;

    /// Persist the machine's status field only.
    async fn update_machine_status(&self, machine: &MachineRecord) -> Result<()>;

    /// Persist the cluster's status field only.
    async fn update_cluster_status(&self, cluster: &ClusterRecord) -> Result<()>;
}
