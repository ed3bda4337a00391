use crate::utho_cloud;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not implemented")]
    NotImplemented,

    #[error("token is required in the cloud config")]
    MissingToken,
    #[error("cluster ID is neither configured nor discoverable from node labels: {reason:#}")]
    ClusterIdUnresolved { reason: anyhow::Error },
    #[error("Failed to parse cloud config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("delta must be positive, have: {0}")]
    NonPositiveIncrease(i64),
    #[error("delta must be negative, have: {0}")]
    NonNegativeDecrease(i64),
    #[error("size increase is too large. current: {current} desired: {desired} max: {max}")]
    IncreaseTooLarge { current: i64, desired: i64, max: i64 },
    #[error("node group {id}: size decrease is too small. current size: {current}, desired size: {desired}, minimum size: {min}")]
    DecreaseTooSmall {
        id: String,
        current: i64,
        desired: i64,
        min: i64,
    },
    #[error("cannot delete node {name:?} with provider ID {provider_id:?} on node pool {node_pool:?}: node ID label is missing")]
    MissingNodeIdLabel {
        name: String,
        provider_id: String,
        node_pool: String,
    },

    #[error(transparent)]
    Provider(#[from] utho_cloud::error::Error),
    #[error("failed to read node pool after update for node group {id}: {source}")]
    ReadAfterUpdate {
        id: String,
        source: utho_cloud::error::Error,
    },
    #[error("deleting node failed for cluster {cluster_id} node pool {node_pool:?} node {node_id:?}: {source}")]
    DeleteNode {
        cluster_id: u64,
        node_pool: String,
        node_id: String,
        source: utho_cloud::error::Error,
    },

    #[error("couldn't increase size to {target} (delta: {delta}). Current size is: {current}")]
    IncreaseNotConfirmed { target: i64, delta: i64, current: i64 },
    #[error("couldn't decrease size to {target} (delta: {delta}). Current size is: {current}")]
    DecreaseNotConfirmed { target: i64, delta: i64, current: i64 },

    #[error("node pool instance is not created")]
    NodePoolNotCreated,
    #[error("node pool not initialised for group {0}")]
    NodePoolNotInitialised(String),
    #[error("node pool {0} has no example worker to derive resources")]
    NoTemplateWorker(String),
}
