//! Ownership and naming tags applied to provider resources after creation.
//!
//! The tag schema is string-keyed and stable across resource kinds: a display
//! name, a per-cluster ownership key whose value records the lifecycle, and a
//! role. The ownership key is what later describe calls filter on.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cloud::NetworkClient;
use crate::error::Result;

/// Wire key for the resource display name.
pub const TAG_NAME: &str = "Name";

/// Wire key for the resource role.
pub const TAG_ROLE: &str = "cirrus.io/role";

/// Prefix of the per-cluster ownership key; the cluster name completes it.
pub const TAG_CLUSTER_PREFIX: &str = "cirrus.io/cluster/";

/// Role value for infrastructure shared by all machines of a cluster.
pub const ROLE_COMMON: &str = "common";

/// Whether the cluster created the resource or merely references it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceLifecycle {
    Owned,
    Shared,
}

impl ResourceLifecycle {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceLifecycle::Owned => "owned",
            ResourceLifecycle::Shared => "shared",
        }
    }
}

/// Tag set attached atomically after resource creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    pub name: String,
    pub cluster_name: String,
    pub role: String,
    pub lifecycle: ResourceLifecycle,
}

impl TagSet {
    /// Ownership key identifying the cluster this resource belongs to.
    pub fn cluster_key(&self) -> String {
        format!("{}{}", TAG_CLUSTER_PREFIX, self.cluster_name)
    }

    /// String-keyed wire representation.
    pub fn to_wire(&self) -> HashMap<String, String> {
        let mut tags = HashMap::new();
        tags.insert(TAG_NAME.to_string(), self.name.clone());
        tags.insert(self.cluster_key(), self.lifecycle.as_str().to_string());
        tags.insert(TAG_ROLE.to_string(), self.role.clone());
        tags
    }
}

/// Inputs for building a tag set.
#[derive(Debug, Clone)]
pub struct BuildParams {
    pub cluster_name: String,
    pub name: String,
    pub role: String,
    pub lifecycle: ResourceLifecycle,
}

/// Build the tag set for a newly created resource.
pub fn build(params: &BuildParams) -> TagSet {
    TagSet {
        name: params.name.clone(),
        cluster_name: params.cluster_name.clone(),
        role: params.role.clone(),
        lifecycle: params.lifecycle,
    }
}

/// Build and apply tags to a resource through the cloud client.
pub async fn apply(
    client: &dyn NetworkClient,
    resource_id: &str,
    params: &BuildParams,
) -> Result<()> {
    let tags = build(params);
    client.apply_tags(resource_id, &tags).await
}
