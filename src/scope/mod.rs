//! Unit-of-work scopes binding decoded provider state to client handles.
//!
//! A scope is created per reconcile invocation and must be closed when the
//! work finishes: close writes observed state back to the store best-effort.
//! The `with_*` helpers guarantee close runs even when the body errors, the
//! way every call site is expected to obtain a scope.

mod cluster;
mod machine;

pub use cluster::{ClusterScope, ClusterScopeParams};
pub use machine::{MachineScope, MachineScopeParams};

use std::future::Future;
use std::sync::Arc;

use crate::error::Result;

/// Run `f` with a freshly built cluster scope, always closing it afterwards.
pub async fn with_cluster_scope<T, F, Fut>(params: ClusterScopeParams, f: F) -> Result<T>
where
    F: FnOnce(Arc<ClusterScope>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let scope = Arc::new(ClusterScope::new(params)?);
    let result = f(Arc::clone(&scope)).await;
    scope.close().await;
    result
}

/// Run `f` with a freshly built machine scope, always closing it afterwards.
pub async fn with_machine_scope<T, F, Fut>(params: MachineScopeParams, f: F) -> Result<T>
where
    F: FnOnce(Arc<MachineScope>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let scope = Arc::new(MachineScope::new(params)?);
    let result = f(Arc::clone(&scope)).await;
    scope.close().await;
    result
}
