use http::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Missing config key {0}")]
    MissingConfig(&'static str),
    #[error("Failed to generate url {url} caused by {source:?}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("Received bad response with status {status} and body {body:?}")]
    BadResponse { status: StatusCode, body: String },
    #[error("Failed to deserialize response at {content}: {source}")]
    Deserialization {
        content: String,
        source: serde_json::Error,
    },
    #[error("Missing response value {0}")]
    MissingResponseValue(String),
    #[error("{message}")]
    Api { message: String },
    #[error("cluster not found or not accessible")]
    ClusterNotFound,
    #[error("node pool {0} not found")]
    NodePoolNotFound(String),
}
