//! Per-resource-kind convergence services.
//!
//! Each service follows the same pattern over its own client operations:
//! describe the remote resource, create it when absent, delete on teardown,
//! and record the observed result in the scope's resource view.

mod network;

pub use network::{NetworkService, DEFAULT_NETWORK_CIDR};
