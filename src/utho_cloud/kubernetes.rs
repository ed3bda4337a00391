use super::Result;
use crate::utho_cloud::error::Error;
use crate::utho_cloud::request::{check_status, delete, get, post};
use crate::utho_cloud::Client;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[cfg(test)]
use mockall::automock;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NodePool {
    #[serde(default, deserialize_with = "loose::string")]
    pub id: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub size: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub ip: String,
    #[serde(default, deserialize_with = "loose::int")]
    pub count: i64,
    #[serde(default, deserialize_with = "loose::boolean")]
    pub auto_scale: bool,
    #[serde(rename = "min_size", default, deserialize_with = "loose::int")]
    pub min_nodes: i64,
    #[serde(rename = "max_size", default, deserialize_with = "loose::int")]
    pub max_nodes: i64,
    #[serde(default, deserialize_with = "loose::list")]
    pub workers: Vec<Worker>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Worker {
    #[serde(rename = "cloudid", default, deserialize_with = "loose::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "loose::string")]
    pub nodepool: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub hostname: String,
    /// Memory in MB.
    #[serde(default, deserialize_with = "loose::int")]
    pub ram: i64,
    #[serde(default, deserialize_with = "loose::int")]
    pub cpu: i64,
    #[serde(default, deserialize_with = "loose::int")]
    pub disksize: i64,
    #[serde(default, deserialize_with = "loose::string")]
    pub ip: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub status: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub app_status: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UpdateNodePoolParams {
    #[serde(skip)]
    pub cluster_id: u64,
    #[serde(skip)]
    pub node_pool_id: String,
    pub count: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<AutoscalePolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_nodes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_nodes: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AutoscalePolicy {
    pub adjust: i64,
    pub compare: String,
    pub cooldown: i64,
    pub period: String,
    pub name: String,
    #[serde(rename = "type")]
    pub policy_type: String,
    pub value: String,
    pub product: String,
    pub maxsize: String,
    pub minsize: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct UpdateNodePoolResponse {
    #[serde(default, deserialize_with = "loose::string")]
    pub id: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub size: String,
    #[serde(default, deserialize_with = "loose::int")]
    pub count: i64,
    #[serde(default, deserialize_with = "loose::boolean")]
    pub auto_scale: bool,
    #[serde(default, deserialize_with = "loose::int")]
    pub min_nodes: i64,
    #[serde(default, deserialize_with = "loose::int")]
    pub max_nodes: i64,
    #[serde(default, deserialize_with = "loose::list")]
    pub workers: Vec<Worker>,
    #[serde(default, deserialize_with = "loose::string")]
    pub status: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub message: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeleteNodeParams {
    pub cluster_id: u64,
    pub pool_id: String,
    pub node_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct DeleteResponse {
    #[serde(default, deserialize_with = "loose::string")]
    pub status: String,
    #[serde(default, deserialize_with = "loose::string")]
    pub message: String,
}

/// Node pool endpoints of the Utho Kubernetes API.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NodePools: Send + Sync {
    async fn read_node_pool(&self, cluster_id: u64, node_pool_id: &str) -> Result<NodePool>;
    async fn list_node_pools(&self, cluster_id: &str) -> Result<Vec<NodePool>>;
    async fn update_node_pool(
        &self,
        params: &UpdateNodePoolParams,
    ) -> Result<UpdateNodePoolResponse>;
    async fn delete_node(&self, params: &DeleteNodeParams) -> Result<DeleteResponse>;
}

#[async_trait]
impl NodePools for Client {
    #[tracing::instrument(name = "utho::read_node_pool", skip(self))]
    async fn read_node_pool(&self, cluster_id: u64, node_pool_id: &str) -> Result<NodePool> {
        let path = format!("kubernetes/{}", cluster_id);
        let mut json = get(&self.http_client, &self.config, &path).await?;

        select_node_pool(&mut json, node_pool_id)
    }

    #[tracing::instrument(name = "utho::list_node_pools", skip(self))]
    async fn list_node_pools(&self, cluster_id: &str) -> Result<Vec<NodePool>> {
        let path = format!("kubernetes/{}", cluster_id);
        let mut json = get(&self.http_client, &self.config, &path).await?;

        parse_node_pools(&mut json)
    }

    #[tracing::instrument(
        name = "utho::update_node_pool",
        skip(self, params),
        fields(cluster_id = params.cluster_id, node_pool_id = %params.node_pool_id, count = %params.count)
    )]
    async fn update_node_pool(
        &self,
        params: &UpdateNodePoolParams,
    ) -> Result<UpdateNodePoolResponse> {
        let path = format!(
            "kubernetes/{}/nodepool/{}/update",
            params.cluster_id, params.node_pool_id
        );

        post(&self.http_client, &self.config, &path, params).await
    }

    #[tracing::instrument(name = "utho::delete_node", skip(self))]
    async fn delete_node(&self, params: &DeleteNodeParams) -> Result<DeleteResponse> {
        let path = format!(
            "kubernetes/{}/nodepool/{}/{}/delete",
            params.cluster_id, params.pool_id, params.node_id
        );

        delete(&self.http_client, &self.config, &path).await
    }
}

/// Extracts the node pools of a cluster document, in document order.
///
/// The provider keys pools by id and sends an empty array instead of an
/// empty object when the cluster has none.
fn parse_node_pools(json: &mut Value) -> Result<Vec<NodePool>> {
    check_status(json)?;

    match json.pointer_mut("/nodepools").map(Value::take) {
        Some(Value::Object(pools)) => pools
            .into_iter()
            .map(|(id, pool)| {
                let mut pool: NodePool =
                    serde_json::from_value(pool).map_err(|e| Error::Deserialization {
                        source: e,
                        content: format!("/nodepools/{}", id),
                    })?;
                pool.id = id;

                Ok(pool)
            })
            .collect(),
        Some(Value::Array(pools)) => pools
            .into_iter()
            .map(|pool| {
                serde_json::from_value(pool).map_err(|e| Error::Deserialization {
                    source: e,
                    content: String::from("/nodepools"),
                })
            })
            .collect(),
        Some(Value::Null) | None => Ok(vec![]),
        Some(_) => Err(Error::MissingResponseValue(String::from("/nodepools"))),
    }
}

fn select_node_pool(json: &mut Value, node_pool_id: &str) -> Result<NodePool> {
    if cluster_id(json) == 0 {
        check_status(json)?;
        return Err(Error::ClusterNotFound);
    }

    parse_node_pools(json)?
        .into_iter()
        .find(|pool| pool.id == node_pool_id)
        .ok_or_else(|| Error::NodePoolNotFound(node_pool_id.to_owned()))
}

fn cluster_id(json: &Value) -> i64 {
    match json.pointer("/info/cluster/id") {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

/// Deserializers for the provider's loosely typed JSON, where numbers and
/// booleans frequently arrive as strings and absent values as `null`.
mod loose {
    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Int(i64),
        Float(f64),
        Bool(bool),
        Str(String),
        Null,
    }

    pub(super) fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Scalar::deserialize(deserializer)? {
            Scalar::Int(v) => Ok(v),
            Scalar::Float(v) => Ok(v as i64),
            Scalar::Bool(v) => Ok(v as i64),
            Scalar::Null => Ok(0),
            Scalar::Str(s) if s.trim().is_empty() => Ok(0),
            Scalar::Str(s) => s.trim().parse().map_err(D::Error::custom),
        }
    }

    pub(super) fn boolean<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Scalar::deserialize(deserializer)? {
            Scalar::Bool(v) => Ok(v),
            Scalar::Int(v) => Ok(v != 0),
            Scalar::Float(v) => Ok(v != 0.0),
            Scalar::Null => Ok(false),
            Scalar::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "" | "0" | "false" | "no" | "off" => Ok(false),
                other => Err(D::Error::custom(format!("invalid boolean {:?}", other))),
            },
        }
    }

    pub(super) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Scalar::deserialize(deserializer)? {
            Scalar::Str(s) => s,
            Scalar::Int(v) => v.to_string(),
            Scalar::Float(v) => v.to_string(),
            Scalar::Bool(v) => v.to_string(),
            Scalar::Null => String::new(),
        })
    }

    pub(super) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
    }
}
