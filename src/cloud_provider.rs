mod error;
mod utho;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{Node, Pod};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use crate::manager::Manager;
use crate::AppConfig;
use anyhow::Context;
pub use error::{Error, Result};
pub use utho::UthoCloudProvider;

pub const UTHO_PROVIDER_NAME: &str = "utho";

/// Scheme of `spec.providerID` on nodes backed by Utho workers.
pub const UTHO_PROVIDER_ID_PREFIX: &str = "utho://";

/// Label carrying the numeric worker id on every managed node.
pub const NODE_ID_LABEL: &str = "node_id";

pub const GPU_LABEL: &str = "utho.com/gpu-node";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Instance {
    /// Provider id in the form `utho://<worker id>`.
    pub id: String,
}

/// Node template used by scale-up simulations, together with the pods that
/// start on such a node by default.
#[derive(Clone, Debug)]
pub struct NodeInfo {
    pub node: Node,
    pub pods: Vec<Pod>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeGroupAutoscalingOptions {
    pub scale_down_utilization_threshold: f64,
    pub scale_down_gpu_utilization_threshold: f64,
    pub scale_down_unneeded_time: Duration,
    pub scale_down_unready_time: Duration,
    pub max_node_provision_time: Duration,
    pub zero_or_max_node_scaling: bool,
    pub ignore_daemon_sets_utilization: bool,
}

/// Cluster wide resource bounds, keyed by resource name (`cpu`, `memory`, ...).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ResourceLimiter {
    #[serde(default)]
    pub min: BTreeMap<String, i64>,
    #[serde(default)]
    pub max: BTreeMap<String, i64>,
}

impl ResourceLimiter {
    pub fn min(&self, resource: &str) -> i64 {
        self.min.get(resource).copied().unwrap_or(0)
    }

    pub fn max(&self, resource: &str) -> i64 {
        self.max.get(resource).copied().unwrap_or(i64::MAX)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GpuConfig {
    pub label: String,
    pub gpu_type: String,
    pub extended_resource_name: String,
}

pub trait PricingModel: Send + Sync {
    fn node_price(&self, node: &Node, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<f64>;
    fn pod_price(&self, pod: &Pod, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<f64>;
}

/// A set of nodes sharing capacity and labels, resized as a unit.
#[async_trait]
pub trait NodeGroup: Send + Sync + fmt::Debug {
    fn max_size(&self) -> i64;
    fn min_size(&self) -> i64;

    /// Desired size of the group. Registered nodes converge towards it.
    fn target_size(&self) -> Result<i64>;

    /// Grows the group by `delta` nodes and returns once the provider
    /// reports the new target.
    async fn increase_size(&mut self, delta: i64) -> Result<()>;
    async fn atomic_increase_size(&mut self, delta: i64) -> Result<()>;

    /// Deletes the given nodes, shrinking the target by one per node.
    async fn delete_nodes(&mut self, nodes: &[Node]) -> Result<()>;
    async fn force_delete_nodes(&mut self, nodes: &[Node]) -> Result<()>;

    /// Retracts unfulfilled scale-up requests. Never deletes existing nodes.
    async fn decrease_target_size(&mut self, delta: i64) -> Result<()>;

    fn id(&self) -> &str;
    fn debug(&self) -> String;
    fn nodes(&self) -> Result<Vec<Instance>>;
    fn template_node_info(&self) -> Result<NodeInfo>;
    fn exist(&self) -> bool;
    async fn create(&mut self) -> Result<Box<dyn NodeGroup>>;
    async fn delete(&mut self) -> Result<()>;
    fn autoprovisioned(&self) -> bool;
    fn get_options(
        &self,
        defaults: &NodeGroupAutoscalingOptions,
    ) -> Result<Option<NodeGroupAutoscalingOptions>>;
}

/// Surface through which the autoscaler drives a cloud.
#[async_trait]
pub trait CloudProvider: Send + Sync {
    fn name(&self) -> &str;
    fn node_groups(&self) -> Vec<&dyn NodeGroup>;
    fn node_group_mut(&mut self, id: &str) -> Option<&mut dyn NodeGroup>;

    /// Returns `Ok(None)` for nodes that are not managed by this provider.
    fn node_group_for_node(&self, node: &Node) -> Result<Option<&dyn NodeGroup>>;
    fn has_instance(&self, node: &Node) -> Result<bool>;
    fn pricing(&self) -> Result<&dyn PricingModel>;
    fn get_available_machine_types(&self) -> Result<Vec<String>>;
    fn new_node_group(
        &self,
        machine_type: &str,
        labels: &BTreeMap<String, String>,
    ) -> Result<Box<dyn NodeGroup>>;
    fn get_resource_limiter(&self) -> Result<&ResourceLimiter>;
    fn gpu_label(&self) -> &str;
    fn get_available_gpu_types(&self) -> BTreeSet<String>;
    fn get_node_gpu_config(&self, node: &Node) -> Option<GpuConfig>;
    fn cleanup(&mut self) -> Result<()>;
    async fn refresh(&mut self) -> Result<()>;
}

pub async fn build_from_config(config: AppConfig) -> anyhow::Result<UthoCloudProvider> {
    let file = File::open(&config.cloud_config).with_context(|| {
        format!(
            "Failed to open cloud config {}",
            config.cloud_config.display()
        )
    })?;

    let manager = Manager::from_reader(BufReader::new(file)).await?;
    let resource_limiter = config.resource_limits.clone().unwrap_or_default();

    Ok(UthoCloudProvider::new(manager, resource_limiter))
}
