use crate::cloud_provider::{Error, NodeGroup, Result};
use crate::config::CloudConfig;
use crate::discovery::{discover_cluster_id, CLUSTER_ID_LABEL};
use crate::node_groups::UthoNodeGroup;
use crate::utho_cloud;
use crate::utho_cloud::kubernetes::NodePools;
use std::fmt;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Owns the provider client and the node groups of one cluster.
pub struct Manager {
    client: Arc<dyn NodePools>,
    cluster_id: String,
    node_groups: Vec<UthoNodeGroup>,
}

impl Manager {
    pub fn new(client: Arc<dyn NodePools>, cluster_id: String) -> Self {
        Self {
            client,
            cluster_id,
            node_groups: vec![],
        }
    }

    /// Builds a manager from the JSON cloud config.
    pub async fn from_reader(reader: impl Read) -> Result<Self> {
        let config = CloudConfig::from_reader(reader)?;

        Self::from_cloud_config(config).await
    }

    pub async fn from_cloud_config(config: CloudConfig) -> Result<Self> {
        if config.token.is_empty() {
            return Err(Error::MissingToken);
        }

        let cluster_id = if config.cluster_id.is_empty() {
            info!("No cluster id configured, reading it from node labels");
            discover_cluster_id(CLUSTER_ID_LABEL)
                .await
                .map_err(|reason| Error::ClusterIdUnresolved { reason })?
        } else {
            config.cluster_id
        };

        let mut builder = utho_cloud::Client::builder().api_token(config.token);
        if let Some(address) = config.api_url {
            builder = builder.address(address);
        }

        Ok(Self::new(Arc::new(builder.build()?), cluster_id))
    }

    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    pub fn node_groups(&self) -> &[UthoNodeGroup] {
        &self.node_groups
    }

    pub fn node_group(&self, id: &str) -> Option<&UthoNodeGroup> {
        self.node_groups.iter().find(|ng| ng.id() == id)
    }

    pub fn node_group_mut(&mut self, id: &str) -> Option<&mut UthoNodeGroup> {
        self.node_groups.iter_mut().find(|ng| ng.id() == id)
    }

    /// Rebuilds the node groups from the autoscaling pools of the cluster.
    ///
    /// The previous node groups are kept when the pools cannot be listed.
    #[tracing::instrument(name = "Manager::refresh", skip(self), fields(cluster_id = %self.cluster_id))]
    pub async fn refresh(&mut self) -> Result<()> {
        let node_pools = self.client.list_node_pools(&self.cluster_id).await?;
        let mut node_groups = Vec::with_capacity(node_pools.len());

        for node_pool in node_pools {
            debug!(
                node_pool = %node_pool.id,
                auto_scale = node_pool.auto_scale,
                min = node_pool.min_nodes,
                max = node_pool.max_nodes,
                "Found node pool"
            );

            if !node_pool.auto_scale {
                continue;
            }

            let cluster_id: u64 = match self.cluster_id.parse() {
                Ok(v) => v,
                Err(e) => {
                    error!(
                        node_pool = %node_pool.id,
                        "Skipping node pool, cluster id {:?} is not numeric: {}",
                        self.cluster_id,
                        e
                    );
                    continue;
                }
            };

            node_groups.push(UthoNodeGroup::new(
                cluster_id,
                Arc::clone(&self.client),
                node_pool,
            ));
        }

        if node_groups.is_empty() {
            info!("No node pool has autoscaling enabled, cluster-autoscaler disabled");
        } else {
            debug!(node_groups = node_groups.len(), "Refreshed node groups");
        }

        self.node_groups = node_groups;

        Ok(())
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("cluster_id", &self.cluster_id)
            .field("node_groups", &self.node_groups)
            .finish()
    }
}
