use crate::cloud_provider::{
    CloudProvider, Error, GpuConfig, NodeGroup, PricingModel, ResourceLimiter, Result, GPU_LABEL,
    NODE_ID_LABEL, UTHO_PROVIDER_ID_PREFIX, UTHO_PROVIDER_NAME,
};
use crate::manager::Manager;
use crate::node_groups::to_provider_id;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

#[derive(Debug)]
pub struct UthoCloudProvider {
    manager: Manager,
    resource_limiter: ResourceLimiter,
}

impl UthoCloudProvider {
    pub fn new(manager: Manager, resource_limiter: ResourceLimiter) -> Self {
        Self {
            manager,
            resource_limiter,
        }
    }

    pub fn manager(&self) -> &Manager {
        &self.manager
    }
}

/// Worker id of `node`, from its provider id or else its `node_id` label.
fn node_worker_id(node: &Node) -> Option<String> {
    let provider_id = node
        .spec
        .as_ref()
        .and_then(|spec| spec.provider_id.as_deref())
        .filter(|v| !v.is_empty());

    match provider_id {
        Some(v) => Some(v.strip_prefix(UTHO_PROVIDER_ID_PREFIX).unwrap_or(v).to_owned()),
        None => node
            .metadata
            .labels
            .as_ref()
            .and_then(|labels| labels.get(NODE_ID_LABEL))
            .filter(|v| !v.is_empty())
            .cloned(),
    }
}

#[async_trait]
impl CloudProvider for UthoCloudProvider {
    fn name(&self) -> &str {
        UTHO_PROVIDER_NAME
    }

    fn node_groups(&self) -> Vec<&dyn NodeGroup> {
        self.manager
            .node_groups()
            .iter()
            .map(|ng| ng as &dyn NodeGroup)
            .collect()
    }

    fn node_group_mut(&mut self, id: &str) -> Option<&mut dyn NodeGroup> {
        self.manager
            .node_group_mut(id)
            .map(|ng| ng as &mut dyn NodeGroup)
    }

    #[tracing::instrument(
        name = "UthoCloudProvider::node_group_for_node",
        skip(self, node),
        fields(node = node.metadata.name.as_deref().unwrap_or_default())
    )]
    fn node_group_for_node(&self, node: &Node) -> Result<Option<&dyn NodeGroup>> {
        let worker_id = match node_worker_id(node) {
            Some(v) => v,
            None => {
                debug!("Node carries neither provider id nor node id label");
                return Ok(None);
            }
        };
        let instance_id = to_provider_id(&worker_id);

        for ng in self.manager.node_groups() {
            if ng.nodes()?.iter().any(|instance| instance.id == instance_id) {
                return Ok(Some(ng as &dyn NodeGroup));
            }
        }

        debug!(%instance_id, "Node is not part of any node group");
        Ok(None)
    }

    fn has_instance(&self, _node: &Node) -> Result<bool> {
        Err(Error::NotImplemented)
    }

    fn pricing(&self) -> Result<&dyn PricingModel> {
        Err(Error::NotImplemented)
    }

    fn get_available_machine_types(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }

    fn new_node_group(
        &self,
        _machine_type: &str,
        _labels: &BTreeMap<String, String>,
    ) -> Result<Box<dyn NodeGroup>> {
        Err(Error::NotImplemented)
    }

    fn get_resource_limiter(&self) -> Result<&ResourceLimiter> {
        Ok(&self.resource_limiter)
    }

    fn gpu_label(&self) -> &str {
        GPU_LABEL
    }

    fn get_available_gpu_types(&self) -> BTreeSet<String> {
        BTreeSet::new()
    }

    fn get_node_gpu_config(&self, _node: &Node) -> Option<GpuConfig> {
        None
    }

    fn cleanup(&mut self) -> Result<()> {
        Ok(())
    }

    #[tracing::instrument(name = "UthoCloudProvider::refresh", skip(self))]
    async fn refresh(&mut self) -> Result<()> {
        self.manager.refresh().await?;
        info!(
            node_groups = self.manager.node_groups().len(),
            "Refreshed node groups"
        );

        Ok(())
    }
}
