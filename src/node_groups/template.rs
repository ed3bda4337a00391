use crate::cloud_provider::{Error, NodeInfo, Result, NODE_ID_LABEL};
use crate::utho_cloud::kubernetes::NodePool;
use chrono::Utc;
use k8s_openapi::api::core::v1::{
    Container, Node, NodeCondition, NodeSpec, NodeStatus, Pod, PodSpec,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};
use rand::Rng;
use std::collections::BTreeMap;

const MAX_PODS: i64 = 110;

/// Builds the node a new worker of `node_pool` would register as.
///
/// Resources are taken from the first worker of the pool, memory is reported
/// by the provider in MiB.
pub(super) fn build_node_info(id: &str, node_pool: &NodePool) -> Result<NodeInfo> {
    let worker = node_pool
        .workers
        .first()
        .ok_or_else(|| Error::NoTemplateWorker(id.to_owned()))?;

    let suffix: i64 = rand::thread_rng().gen_range(0..i64::MAX);
    let name = format!("{}-template-{}", id, suffix);

    let labels: BTreeMap<String, String> = vec![
        ("kubernetes.io/os", "linux".to_owned()),
        ("kubernetes.io/arch", "amd64".to_owned()),
        ("node.kubernetes.io/instance-type", node_pool.size.clone()),
        ("topology.kubernetes.io/zone", node_pool.ip.clone()),
        (NODE_ID_LABEL, worker.id.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v))
    .collect();

    let resources: BTreeMap<String, Quantity> = vec![
        ("cpu", worker.cpu),
        ("memory", worker.ram * 1024 * 1024),
        ("pods", MAX_PODS),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), Quantity(v.to_string())))
    .collect();

    let node = Node {
        metadata: ObjectMeta {
            name: Some(name.clone()),
            labels: Some(labels),
            ..Default::default()
        },
        spec: Some(NodeSpec::default()),
        status: Some(NodeStatus {
            capacity: Some(resources.clone()),
            allocatable: Some(resources),
            conditions: Some(vec![NodeCondition {
                type_: "Ready".into(),
                status: "True".into(),
                last_transition_time: Some(Time(Utc::now())),
                ..Default::default()
            }]),
            ..Default::default()
        }),
    };

    Ok(NodeInfo {
        node,
        pods: vec![kube_proxy_pod(id, &name)],
    })
}

fn kube_proxy_pod(id: &str, node_name: &str) -> Pod {
    let mut labels = BTreeMap::new();
    labels.insert("k8s-app".to_owned(), "kube-proxy".to_owned());

    Pod {
        metadata: ObjectMeta {
            name: Some(format!("kube-proxy-{}", id)),
            namespace: Some("kube-system".into()),
            labels: Some(labels),
            ..Default::default()
        },
        spec: Some(PodSpec {
            node_name: Some(node_name.to_owned()),
            priority_class_name: Some("system-node-critical".into()),
            containers: vec![Container {
                name: "kube-proxy".into(),
                ..Default::default()
            }],
            ..Default::default()
        }),
        ..Default::default()
    }
}
