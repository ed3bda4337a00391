use anyhow::{anyhow, bail, Context, Result};
use k8s_openapi::api::core::v1::Node;
use kube::api::{Api, ListParams};
use kube::{Client, ResourceExt};
use std::convert::TryFrom;
use tracing::{debug, info};

/// Node label holding the Utho cluster id.
pub const CLUSTER_ID_LABEL: &str = "cluster_id";

/// Reads `label` from the nodes of the cluster this process runs in.
///
/// Uses the service account credentials mounted into the pod and lists the
/// nodes exactly once.
#[tracing::instrument(name = "discovery::discover_cluster_id")]
pub async fn discover_cluster_id(label: &str) -> Result<String> {
    let config =
        kube::Config::incluster().context("Failed to load in-cluster Kubernetes config")?;
    let client = Client::try_from(config).context("Failed to create Kubernetes client")?;

    let nodes: Api<Node> = Api::all(client);
    let nodes = nodes
        .list(&ListParams::default())
        .await
        .context("Failed to list cluster nodes")?;
    debug!(nodes = nodes.items.len(), "Listed cluster nodes");

    let value = label_from_nodes(&nodes.items, label)?;
    info!(%label, %value, "Discovered cluster id from node labels");

    Ok(value)
}

fn label_from_nodes(nodes: &[Node], label: &str) -> Result<String> {
    if nodes.is_empty() {
        bail!("no nodes found in the cluster");
    }

    nodes
        .iter()
        .find_map(|node| node.labels().get(label).filter(|v| !v.is_empty()).cloned())
        .ok_or_else(|| anyhow!("none of {} nodes carries the label {}", nodes.len(), label))
}
