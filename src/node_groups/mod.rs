mod template;

use crate::cloud_provider::{
    Error, Instance, NodeGroup, NodeGroupAutoscalingOptions, NodeInfo, Result, NODE_ID_LABEL,
    UTHO_PROVIDER_ID_PREFIX,
};
use crate::utho_cloud::kubernetes::{DeleteNodeParams, NodePool, NodePools, UpdateNodePoolParams};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// Label the provider requires on target size decreases.
const UTHO_LABEL: &str = "utho.com";

/// Mirror of a single autoscaling node pool.
///
/// The cached pool count is soft state. It only changes after the provider
/// confirmed a resize or a node deletion.
pub struct UthoNodeGroup {
    id: String,
    cluster_id: u64,
    client: Arc<dyn NodePools>,
    node_pool: Option<NodePool>,
    min_size: i64,
    max_size: i64,
}

impl UthoNodeGroup {
    pub fn new(cluster_id: u64, client: Arc<dyn NodePools>, node_pool: NodePool) -> Self {
        Self {
            id: node_pool.id.clone(),
            cluster_id,
            client,
            min_size: node_pool.min_nodes,
            max_size: node_pool.max_nodes,
            node_pool: Some(node_pool),
        }
    }

    fn node_pool_mut(&mut self) -> Result<&mut NodePool> {
        self.node_pool.as_mut().ok_or(Error::NodePoolNotCreated)
    }

    fn count(&self) -> Result<i64> {
        self.node_pool
            .as_ref()
            .map(|np| np.count)
            .ok_or(Error::NodePoolNotCreated)
    }
}

impl fmt::Debug for UthoNodeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UthoNodeGroup")
            .field("id", &self.id)
            .field("cluster_id", &self.cluster_id)
            .field("min_size", &self.min_size)
            .field("max_size", &self.max_size)
            .field("node_pool", &self.node_pool)
            .finish()
    }
}

/// `utho://<worker id>`
pub fn to_provider_id(node_id: impl fmt::Display) -> String {
    format!("{}{}", UTHO_PROVIDER_ID_PREFIX, node_id)
}

#[async_trait]
impl NodeGroup for UthoNodeGroup {
    fn max_size(&self) -> i64 {
        self.max_size
    }

    fn min_size(&self) -> i64 {
        self.min_size
    }

    fn target_size(&self) -> Result<i64> {
        Ok(self.node_pool.as_ref().map_or(0, |np| np.count))
    }

    #[tracing::instrument(name = "UthoNodeGroup::increase_size", skip(self), fields(node_group = %self.id))]
    async fn increase_size(&mut self, delta: i64) -> Result<()> {
        if delta <= 0 {
            error!("Rejecting non-positive delta");
            return Err(Error::NonPositiveIncrease(delta));
        }

        let current = self.count()?;
        let target = match current.checked_add(delta) {
            Some(v) if v <= self.max_size => v,
            v => {
                let desired = v.unwrap_or(i64::MAX);
                error!(current, target_size = desired, max = self.max_size, "Size increase too large");
                return Err(Error::IncreaseTooLarge {
                    current,
                    desired,
                    max: self.max_size,
                });
            }
        };

        let params = UpdateNodePoolParams {
            cluster_id: self.cluster_id,
            node_pool_id: self.id.clone(),
            count: target.to_string(),
            ..Default::default()
        };

        debug!(target_size = target, "Updating node pool count");
        if let Err(e) = self.client.update_node_pool(&params).await {
            error!("Failed to update node pool: {}", e);
            return Err(e.into());
        }

        // The update response may still report the previous count.
        let node_pool = self
            .client
            .read_node_pool(self.cluster_id, &self.id)
            .await
            .map_err(|e| {
                error!("Failed to read node pool after update: {}", e);
                Error::ReadAfterUpdate {
                    id: self.id.clone(),
                    source: e,
                }
            })?;

        if node_pool.count != target {
            error!(target_size = target, observed = node_pool.count, "Node pool did not reach target");
            return Err(Error::IncreaseNotConfirmed {
                target,
                delta,
                current: node_pool.count,
            });
        }

        self.node_pool_mut()?.count = target;
        debug!(count = target, "Node pool count updated");

        Ok(())
    }

    async fn atomic_increase_size(&mut self, _delta: i64) -> Result<()> {
        Err(Error::NotImplemented)
    }

    #[tracing::instrument(name = "UthoNodeGroup::delete_nodes", skip(self, nodes), fields(node_group = %self.id, nodes = nodes.len()))]
    async fn delete_nodes(&mut self, nodes: &[Node]) -> Result<()> {
        self.count()?;

        for node in nodes {
            let name = node.metadata.name.clone().unwrap_or_default();
            let provider_id = node
                .spec
                .as_ref()
                .and_then(|spec| spec.provider_id.clone())
                .unwrap_or_default();

            // Nodes without the label are placeholders for workers that have
            // not registered yet and cannot be named to the provider.
            let node_id = match node
                .metadata
                .labels
                .as_ref()
                .and_then(|labels| labels.get(NODE_ID_LABEL))
            {
                Some(v) => v.clone(),
                None => {
                    debug!(node = %name, %provider_id, "Node is missing the node id label");
                    return Err(Error::MissingNodeIdLabel {
                        name,
                        provider_id,
                        node_pool: self.id.clone(),
                    });
                }
            };

            let params = DeleteNodeParams {
                cluster_id: self.cluster_id,
                pool_id: self.id.clone(),
                node_id,
            };

            debug!(node = %name, node_id = %params.node_id, "Deleting node");
            if let Err(e) = self.client.delete_node(&params).await {
                error!(node_id = %params.node_id, "Failed to delete node: {}", e);
                return Err(Error::DeleteNode {
                    cluster_id: self.cluster_id,
                    node_pool: params.pool_id,
                    node_id: params.node_id,
                    source: e,
                });
            }

            let node_pool = self.node_pool_mut()?;
            node_pool.count -= 1;
            debug!(count = node_pool.count, "Node deleted, count decremented");
        }

        Ok(())
    }

    async fn force_delete_nodes(&mut self, _nodes: &[Node]) -> Result<()> {
        Err(Error::NotImplemented)
    }

    #[tracing::instrument(name = "UthoNodeGroup::decrease_target_size", skip(self), fields(node_group = %self.id))]
    async fn decrease_target_size(&mut self, delta: i64) -> Result<()> {
        if delta >= 0 {
            error!("Rejecting non-negative delta");
            return Err(Error::NonNegativeDecrease(delta));
        }

        let current = self.count()?;
        let target = match current.checked_add(delta) {
            Some(v) if v >= self.min_size => v,
            v => {
                let desired = v.unwrap_or(i64::MIN);
                error!(current, target_size = desired, min = self.min_size, "Size decrease too small");
                return Err(Error::DecreaseTooSmall {
                    id: self.id.clone(),
                    current,
                    desired,
                    min: self.min_size,
                });
            }
        };

        // Decreases are rejected by the provider without label and size.
        let params = UpdateNodePoolParams {
            cluster_id: self.cluster_id,
            node_pool_id: self.id.clone(),
            count: target.to_string(),
            label: Some(UTHO_LABEL.to_owned()),
            size: Some(target.to_string()),
            ..Default::default()
        };

        debug!(target_size = target, "Updating node pool count");
        let updated = match self.client.update_node_pool(&params).await {
            Ok(v) => v,
            Err(e) => {
                error!("Failed to update node pool: {}", e);
                return Err(e.into());
            }
        };

        if updated.count != target {
            error!(target_size = target, observed = updated.count, "Node pool did not reach target");
            return Err(Error::DecreaseNotConfirmed {
                target,
                delta,
                current: updated.count,
            });
        }

        self.node_pool_mut()?.count = target;
        debug!(count = target, "Node pool count updated");

        Ok(())
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn debug(&self) -> String {
        format!(
            "node group ID: {} (min:{} max:{})",
            self.id, self.min_size, self.max_size
        )
    }

    fn nodes(&self) -> Result<Vec<Instance>> {
        let node_pool = match self.node_pool.as_ref() {
            Some(v) => v,
            None => {
                error!(node_group = %self.id, "Node pool is not created");
                return Err(Error::NodePoolNotCreated);
            }
        };

        let mut seen = HashSet::with_capacity(node_pool.workers.len());
        let instances = node_pool
            .workers
            .iter()
            .filter(|worker| {
                if worker.id <= 0 || !seen.insert(worker.id) {
                    debug!(node_group = %self.id, worker = worker.id, "Skipping invalid or duplicate worker id");
                    false
                } else {
                    true
                }
            })
            .map(|worker| Instance {
                id: to_provider_id(worker.id),
            })
            .collect();

        Ok(instances)
    }

    fn template_node_info(&self) -> Result<NodeInfo> {
        let node_pool = self
            .node_pool
            .as_ref()
            .ok_or_else(|| Error::NodePoolNotInitialised(self.id.clone()))?;

        template::build_node_info(&self.id, node_pool)
    }

    fn exist(&self) -> bool {
        self.node_pool.is_some()
    }

    async fn create(&mut self) -> Result<Box<dyn NodeGroup>> {
        Err(Error::NotImplemented)
    }

    async fn delete(&mut self) -> Result<()> {
        Err(Error::NotImplemented)
    }

    fn autoprovisioned(&self) -> bool {
        false
    }

    fn get_options(
        &self,
        _defaults: &NodeGroupAutoscalingOptions,
    ) -> Result<Option<NodeGroupAutoscalingOptions>> {
        Err(Error::NotImplemented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utho_cloud::error::Error as ApiError;
    use crate::utho_cloud::kubernetes::{
        DeleteResponse, MockNodePools, UpdateNodePoolResponse, Worker,
    };
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    fn pool(count: i64, min_nodes: i64, max_nodes: i64, worker_ids: &[i64]) -> NodePool {
        NodePool {
            id: "pool-123".into(),
            count,
            auto_scale: true,
            min_nodes,
            max_nodes,
            workers: worker_ids
                .iter()
                .map(|id| Worker {
                    id: *id,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn node_group(client: MockNodePools, node_pool: NodePool) -> UthoNodeGroup {
        UthoNodeGroup::new(1111, Arc::new(client), node_pool)
    }

    fn labelled_node(node_id: &str) -> Node {
        let mut labels = BTreeMap::new();
        labels.insert(NODE_ID_LABEL.to_owned(), node_id.to_owned());

        Node {
            metadata: ObjectMeta {
                name: Some(format!("worker-{}", node_id)),
                labels: Some(labels),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_debug() {
        let ng = node_group(MockNodePools::new(), pool(3, 1, 10, &[]));

        assert_eq!("node group ID: pool-123 (min:1 max:10)", ng.debug());
    }

    #[test]
    fn test_target_size() -> Result<()> {
        let ng = node_group(MockNodePools::new(), pool(5, 1, 10, &[]));
        assert_eq!(5, ng.target_size()?);

        let ng = node_group(MockNodePools::new(), pool(0, 0, 10, &[]));
        assert_eq!(0, ng.target_size()?);

        Ok(())
    }

    #[test]
    fn test_bounds_and_flags() {
        let ng = node_group(MockNodePools::new(), pool(2, 2, 5, &[]));

        assert_eq!(2, ng.min_size());
        assert_eq!(5, ng.max_size());
        assert_eq!("pool-123", ng.id());
        assert!(ng.exist());
        assert!(!ng.autoprovisioned());
    }

    #[tokio::test]
    async fn test_increase_size() -> Result<()> {
        let mut client = MockNodePools::new();
        client
            .expect_update_node_pool()
            .withf(|params| {
                params.cluster_id == 1111
                    && params.node_pool_id == "pool-123"
                    && params.count == "3"
                    && params.label.is_none()
                    && params.size.is_none()
            })
            .times(1)
            .returning(|_| {
                Ok(UpdateNodePoolResponse {
                    count: 3,
                    ..Default::default()
                })
            });
        client
            .expect_read_node_pool()
            .withf(|cluster_id, node_pool_id| *cluster_id == 1111 && node_pool_id == "pool-123")
            .times(1)
            .returning(|_, _| Ok(pool(3, 2, 3, &[])));

        let mut ng = node_group(client, pool(2, 2, 3, &[]));
        ng.increase_size(1).await?;

        assert_eq!(3, ng.target_size()?);

        Ok(())
    }

    #[tokio::test]
    async fn test_increase_size_rejects_non_positive_delta() -> Result<()> {
        let mut ng = node_group(MockNodePools::new(), pool(3, 1, 10, &[]));

        for delta in [-1, 0].iter() {
            let err = ng.increase_size(*delta).await.expect_err("delta must be rejected");
            assert_eq!(format!("delta must be positive, have: {}", delta), err.to_string());
        }
        assert_eq!(3, ng.target_size()?);

        Ok(())
    }

    #[tokio::test]
    async fn test_increase_size_above_maximum() -> Result<()> {
        let mut ng = node_group(MockNodePools::new(), pool(15, 1, 10, &[]));

        let err = ng.increase_size(10).await.expect_err("increase must be rejected");

        assert_eq!(
            "size increase is too large. current: 15 desired: 25 max: 10",
            err.to_string()
        );
        assert_eq!(15, ng.target_size()?);

        Ok(())
    }

    #[tokio::test]
    async fn test_increase_size_overflowing_delta() -> Result<()> {
        let mut client = MockNodePools::new();
        client.expect_update_node_pool().never();
        client.expect_read_node_pool().never();

        let mut ng = node_group(client, pool(2, 1, 5, &[]));
        let err = ng
            .increase_size(i64::MAX)
            .await
            .expect_err("overflowing increase must be rejected");

        assert!(matches!(
            err,
            Error::IncreaseTooLarge {
                current: 2,
                desired: i64::MAX,
                max: 5
            }
        ));
        assert_eq!(2, ng.target_size()?);

        Ok(())
    }

    #[tokio::test]
    async fn test_increase_size_update_failure() -> Result<()> {
        let mut client = MockNodePools::new();
        client.expect_update_node_pool().times(1).returning(|_| {
            Err(ApiError::Api {
                message: "API update failed".into(),
            })
        });
        client.expect_read_node_pool().never();

        let mut ng = node_group(client, pool(2, 1, 5, &[]));
        let err = ng.increase_size(1).await.expect_err("update failure must propagate");

        assert_eq!("API update failed", err.to_string());
        assert_eq!(2, ng.target_size()?);

        Ok(())
    }

    #[tokio::test]
    async fn test_increase_size_read_failure() -> Result<()> {
        let mut client = MockNodePools::new();
        client
            .expect_update_node_pool()
            .returning(|_| Ok(UpdateNodePoolResponse::default()));
        client
            .expect_read_node_pool()
            .times(1)
            .returning(|_, id| Err(ApiError::NodePoolNotFound(id.to_owned())));

        let mut ng = node_group(client, pool(2, 1, 5, &[]));
        let err = ng.increase_size(1).await.expect_err("read failure must propagate");

        assert_eq!(
            "failed to read node pool after update for node group pool-123: node pool pool-123 not found",
            err.to_string()
        );
        assert_eq!(2, ng.target_size()?);

        Ok(())
    }

    #[tokio::test]
    async fn test_increase_size_unconfirmed_count() -> Result<()> {
        let mut client = MockNodePools::new();
        client.expect_update_node_pool().times(1).returning(|_| {
            Ok(UpdateNodePoolResponse {
                count: 2,
                ..Default::default()
            })
        });
        client
            .expect_read_node_pool()
            .times(1)
            .returning(|_, _| Ok(pool(2, 1, 5, &[])));

        let mut ng = node_group(client, pool(2, 1, 5, &[]));
        let err = ng.increase_size(1).await.expect_err("count mismatch must fail");

        assert_eq!(
            "couldn't increase size to 3 (delta: 1). Current size is: 2",
            err.to_string()
        );
        assert_eq!(2, ng.target_size()?);

        Ok(())
    }

    #[tokio::test]
    async fn test_decrease_target_size() -> Result<()> {
        let mut client = MockNodePools::new();
        client
            .expect_update_node_pool()
            .withf(|params| {
                params.cluster_id == 1111
                    && params.node_pool_id == "pool-123"
                    && params.count == "4"
                    && params.label.as_deref() == Some("utho.com")
                    && params.size.as_deref() == Some("4")
            })
            .times(1)
            .returning(|_| {
                Ok(UpdateNodePoolResponse {
                    count: 4,
                    ..Default::default()
                })
            });
        client.expect_read_node_pool().never();

        let mut ng = node_group(client, pool(5, 2, 5, &[]));
        ng.decrease_target_size(-1).await?;

        assert_eq!(4, ng.target_size()?);

        Ok(())
    }

    #[tokio::test]
    async fn test_decrease_target_size_rejects_non_negative_delta() -> Result<()> {
        let mut ng = node_group(MockNodePools::new(), pool(5, 1, 10, &[]));

        for delta in [1, 0].iter() {
            let err = ng
                .decrease_target_size(*delta)
                .await
                .expect_err("delta must be rejected");
            assert_eq!(format!("delta must be negative, have: {}", delta), err.to_string());
        }
        assert_eq!(5, ng.target_size()?);

        Ok(())
    }

    #[tokio::test]
    async fn test_decrease_target_size_below_minimum() -> Result<()> {
        let mut ng = node_group(MockNodePools::new(), pool(3, 2, 5, &[]));

        let err = ng
            .decrease_target_size(-2)
            .await
            .expect_err("decrease must be rejected");

        assert!(err.to_string().contains(
            "node group pool-123: size decrease is too small. current size: 3, desired size: 1, minimum size: 2"
        ));
        assert_eq!(3, ng.target_size()?);

        Ok(())
    }

    #[tokio::test]
    async fn test_decrease_target_size_overflowing_delta() -> Result<()> {
        let mut client = MockNodePools::new();
        client.expect_update_node_pool().never();

        let mut ng = node_group(client, pool(-1, 0, 5, &[]));
        let err = ng
            .decrease_target_size(i64::MIN)
            .await
            .expect_err("overflowing decrease must be rejected");

        assert!(matches!(
            err,
            Error::DecreaseTooSmall {
                current: -1,
                desired: i64::MIN,
                min: 0,
                ..
            }
        ));
        assert_eq!(-1, ng.target_size()?);

        Ok(())
    }

    #[tokio::test]
    async fn test_decrease_target_size_unconfirmed_count() -> Result<()> {
        let mut client = MockNodePools::new();
        client.expect_update_node_pool().times(1).returning(|_| {
            Ok(UpdateNodePoolResponse {
                count: 5,
                ..Default::default()
            })
        });

        let mut ng = node_group(client, pool(5, 2, 5, &[]));
        let err = ng
            .decrease_target_size(-2)
            .await
            .expect_err("count mismatch must fail");

        assert_eq!(
            "couldn't decrease size to 3 (delta: -2). Current size is: 5",
            err.to_string()
        );
        assert_eq!(5, ng.target_size()?);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_nodes() -> Result<()> {
        let mut client = MockNodePools::new();
        client
            .expect_delete_node()
            .withf(|params| {
                params.cluster_id == 1111 && params.pool_id == "pool-123" && params.node_id == "123"
            })
            .times(1)
            .returning(|_| Ok(DeleteResponse::default()));

        let mut ng = node_group(client, pool(2, 1, 3, &[123]));
        ng.delete_nodes(&[labelled_node("123")]).await?;

        assert_eq!(1, ng.target_size()?);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_multiple_nodes() -> Result<()> {
        let mut client = MockNodePools::new();
        client
            .expect_delete_node()
            .withf(|params| params.node_id == "123" || params.node_id == "456")
            .times(2)
            .returning(|_| Ok(DeleteResponse::default()));

        let mut ng = node_group(client, pool(3, 1, 5, &[123, 456]));
        ng.delete_nodes(&[labelled_node("123"), labelled_node("456")])
            .await?;

        assert_eq!(1, ng.target_size()?);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_nodes_without_label() -> Result<()> {
        let mut client = MockNodePools::new();
        client.expect_delete_node().never();

        let placeholder = Node {
            metadata: ObjectMeta {
                name: Some("template-node-for-pool-123-upcoming-0".into()),
                labels: Some(BTreeMap::new()),
                ..Default::default()
            },
            ..Default::default()
        };

        let mut ng = node_group(client, pool(1, 0, 3, &[123]));
        let err = ng
            .delete_nodes(&[placeholder, labelled_node("123")])
            .await
            .expect_err("placeholder must be refused");

        assert!(err.to_string().contains("node ID label is missing"));
        assert!(err.to_string().contains("\"pool-123\""));
        assert_eq!(1, ng.target_size()?);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_nodes_aborts_on_failure() -> Result<()> {
        let mut calls = 0;
        let mut client = MockNodePools::new();
        client
            .expect_delete_node()
            .times(2)
            .returning(move |_| {
                calls += 1;
                if calls == 1 {
                    Ok(DeleteResponse::default())
                } else {
                    Err(ApiError::Api {
                        message: "delete error".into(),
                    })
                }
            });

        let mut ng = node_group(client, pool(3, 0, 5, &[123, 456, 789]));
        let err = ng
            .delete_nodes(&[
                labelled_node("123"),
                labelled_node("456"),
                labelled_node("789"),
            ])
            .await
            .expect_err("second deletion must fail");

        let message = err.to_string();
        assert!(message.contains("deleting node failed for cluster 1111"));
        assert!(message.contains("node pool \"pool-123\""));
        assert!(message.contains("node \"456\""));
        assert!(message.contains("delete error"));
        assert_eq!(2, ng.target_size()?);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_nodes_without_node_pool() {
        let mut client = MockNodePools::new();
        client.expect_delete_node().never();

        let mut ng = node_group(client, pool(1, 0, 3, &[123]));
        ng.node_pool = None;

        let err = ng
            .delete_nodes(&[labelled_node("123")])
            .await
            .expect_err("deleting from a missing node pool must fail");

        assert!(matches!(err, Error::NodePoolNotCreated));
    }

    #[test]
    fn test_nodes() -> Result<()> {
        let ng = node_group(MockNodePools::new(), pool(2, 1, 3, &[123, 456]));

        let expected = vec![
            Instance {
                id: "utho://123".into(),
            },
            Instance {
                id: "utho://456".into(),
            },
        ];
        assert_eq!(expected, ng.nodes()?);
        assert_eq!(ng.nodes()?, ng.nodes()?);

        Ok(())
    }

    #[test]
    fn test_nodes_skips_invalid_and_duplicate_workers() -> Result<()> {
        let ng = node_group(MockNodePools::new(), pool(2, 1, 3, &[0, 456, -1, 456, 123]));

        let ids: Vec<String> = ng.nodes()?.into_iter().map(|i| i.id).collect();

        assert_eq!(vec!["utho://456", "utho://123"], ids);

        Ok(())
    }

    #[test]
    fn test_nodes_without_node_pool() {
        let mut ng = node_group(MockNodePools::new(), pool(2, 1, 3, &[123]));
        ng.node_pool = None;

        let err = ng.nodes().expect_err("missing node pool must fail");

        assert_eq!("node pool instance is not created", err.to_string());
        assert!(!ng.exist());
    }

    #[test]
    fn test_template_node_info() -> Result<()> {
        let mut ng = node_group(MockNodePools::new(), pool(1, 1, 3, &[123]));

        let info = ng.template_node_info()?;
        let labels = info.node.metadata.labels.unwrap_or_default();
        assert_eq!(Some("123"), labels.get(NODE_ID_LABEL).map(String::as_str));

        ng.node_pool = None;
        let err = ng
            .template_node_info()
            .expect_err("template needs a node pool");
        assert_eq!("node pool not initialised for group pool-123", err.to_string());

        Ok(())
    }

    #[tokio::test]
    async fn test_unimplemented_operations() {
        let mut ng = node_group(MockNodePools::new(), pool(2, 1, 3, &[123]));

        assert!(matches!(
            ng.atomic_increase_size(1).await,
            Err(Error::NotImplemented)
        ));
        assert!(matches!(
            ng.force_delete_nodes(&[labelled_node("123")]).await,
            Err(Error::NotImplemented)
        ));
        assert!(matches!(ng.create().await, Err(Error::NotImplemented)));
        assert!(matches!(ng.delete().await, Err(Error::NotImplemented)));
        assert!(matches!(
            ng.get_options(&NodeGroupAutoscalingOptions::default()),
            Err(Error::NotImplemented)
        ));
        assert_eq!(2, ng.target_size().unwrap_or_default());
    }
}
