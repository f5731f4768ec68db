//! cirrus-actuator: cloud resource convergence for the cirrus control plane.
//!
//! Drives a cloud provider's resources toward the desired state declared in
//! machine and cluster records, and writes observed results back to the
//! control-plane store. The unit of work is a scope: built per reconcile
//! invocation, closed (and persisted best-effort) when the work finishes.
//!
//! The outer control loop, provider SDK transport, and CLI wiring live
//! outside this crate; the [`cloud::NetworkClient`] and [`store::StoreClient`]
//! traits are the seams they plug into.

pub mod cloud;
pub mod error;
pub mod scope;
pub mod services;
pub mod store;
pub mod tags;

pub use cloud::{Network, NetworkClient, NetworkFilter, NetworkRequest, NetworkState};
pub use error::{CloudError, Result};
pub use scope::{
    with_cluster_scope, with_machine_scope, ClusterScope, ClusterScopeParams, MachineScope,
    MachineScopeParams,
};
pub use services::{NetworkService, DEFAULT_NETWORK_CIDR};
pub use store::{ClusterRecord, MachineRecord, StoreClient};
