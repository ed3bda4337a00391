use crate::utho_cloud::{error::Error, Config, Result};
use http::header::ACCEPT;
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

pub(super) async fn get(http_client: &reqwest::Client, config: &Config, path: &str) -> Result<Value> {
    let url = gen_url(config, path)?;
    debug!(%url, "GET");

    let request_builder = http_client
        .get(url)
        .with_auth(config)
        .header(ACCEPT, "application/json");

    parse_response(request_builder.send().await?).await
}

pub(super) async fn post<T: Serialize, R: DeserializeOwned>(
    http_client: &reqwest::Client,
    config: &Config,
    path: &str,
    content: &T,
) -> Result<R> {
    let url = gen_url(config, path)?;
    debug!(%url, "POST");

    let request_builder = http_client
        .post(url)
        .with_auth(config)
        .header(ACCEPT, "application/json")
        .json(content);

    let mut json = parse_response(request_builder.send().await?).await?;
    parse_at_pointer(&mut json, "")
        .unwrap_or_else(|| Err(Error::MissingResponseValue(String::from("/"))))
}

pub(super) async fn delete<R: DeserializeOwned>(
    http_client: &reqwest::Client,
    config: &Config,
    path: &str,
) -> Result<R> {
    let url = gen_url(config, path)?;
    debug!(%url, "DELETE");

    let request_builder = http_client
        .delete(url)
        .with_auth(config)
        .header(ACCEPT, "application/json");

    let mut json = parse_response(request_builder.send().await?).await?;
    if json.is_null() {
        json = Value::Object(Default::default());
    }

    parse_at_pointer(&mut json, "")
        .unwrap_or_else(|| Err(Error::MissingResponseValue(String::from("/"))))
}

async fn parse_response(response: Response) -> Result<Value> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(Error::BadResponse { status, body });
    }

    let json = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            source: e,
            content: String::from("/"),
        })?
    };

    check_status(&json)?;

    Ok(json)
}

/// Accepts a response envelope whose `status` is `success` or absent.
pub(super) fn check_status(json: &Value) -> Result<()> {
    match json.pointer("/status").and_then(Value::as_str) {
        None | Some("") | Some("success") => Ok(()),
        Some(_) => Err(Error::Api {
            message: json
                .pointer("/message")
                .and_then(Value::as_str)
                .unwrap_or("request failed without message")
                .to_owned(),
        }),
    }
}

trait Authenticated {
    fn with_auth(self, config: &Config) -> Self;
}

impl Authenticated for RequestBuilder {
    fn with_auth(self, config: &Config) -> Self {
        self.bearer_auth(&config.api_token)
    }
}

fn gen_url(config: &Config, path: &str) -> Result<Url> {
    let url = format!("{}{}", config.address, path);
    Url::parse(&url).map_err(|e| Error::InvalidUrl {
        source: e,
        url: url.clone(),
    })
}

pub(super) fn parse_at_pointer<T: DeserializeOwned>(
    json: &mut Value,
    pointer: &str,
) -> Option<Result<T>> {
    json.pointer_mut(pointer).map(|json| {
        serde_json::from_value(json.take()).map_err(|e| Error::Deserialization {
            source: e,
            content: pointer.to_owned(),
        })
    })
}
