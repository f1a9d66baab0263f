//! Redis store over the Upstash REST protocol
//!
//! Every operation is one HTTP round trip: a JSON array holding the Redis
//! command and its arguments is POSTed to the database's REST URL with a
//! bearer token. The reply is `{"result": ...}` on success or
//! `{"error": "..."}` when Redis rejects the command.
//!
//! `SADD` is atomic on the server side, which is what gives the waitlist its
//! at-most-one-first-insert guarantee. Nothing here retries; failures surface
//! to the handler immediately.

use super::{MetadataFields, StoreError, StoreResult, WaitlistStore};
use async_trait::async_trait;
use reqwest::header;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Connection settings for an Upstash Redis database
#[derive(Debug, Clone)]
pub struct UpstashConfig {
    /// REST endpoint, e.g. `https://eu1-example-12345.upstash.io`
    pub url: String,
    /// REST token with write access
    pub token: SecretString,
    /// Per-request timeout
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct Reply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Waitlist store backed by Upstash Redis
pub struct UpstashStore {
    client: reqwest::Client,
    url: String,
    token: SecretString,
}

impl UpstashStore {
    pub fn new(config: UpstashConfig) -> StoreResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            token: config.token,
        })
    }

    async fn command(&self, args: &[&str]) -> StoreResult<Value> {
        debug!(command = args.first().copied().unwrap_or_default(), "upstash command");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.token.expose_secret())
            .json(args)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        decode_reply(status.as_u16(), &body)
    }
}

#[async_trait]
impl WaitlistStore for UpstashStore {
    async fn add_to_set(&self, set_key: &str, member: &str) -> StoreResult<bool> {
        let added = as_integer(self.command(&["SADD", set_key, member]).await?)?;
        Ok(added == 1)
    }

    async fn set_cardinality(&self, set_key: &str) -> StoreResult<u64> {
        let count = as_integer(self.command(&["SCARD", set_key]).await?)?;
        u64::try_from(count)
            .map_err(|_| StoreError::UnexpectedReply(format!("negative cardinality {}", count)))
    }

    async fn set_members(&self, set_key: &str) -> StoreResult<Vec<String>> {
        as_strings(self.command(&["SMEMBERS", set_key]).await?)
    }

    async fn write_metadata(&self, meta_key: &str, fields: &MetadataFields) -> StoreResult<()> {
        if fields.is_empty() {
            return Ok(());
        }

        let mut args = Vec::with_capacity(2 + fields.len() * 2);
        args.push("HSET");
        args.push(meta_key);
        for (field, value) in fields {
            args.push(field.as_str());
            args.push(value.as_str());
        }

        as_integer(self.command(&args).await?)?;
        Ok(())
    }
}

/// Turn a raw HTTP reply into the command result
fn decode_reply(status: u16, body: &str) -> StoreResult<Value> {
    let reply: Reply = match serde_json::from_str(body) {
        Ok(reply) => reply,
        Err(_) if !(200..300).contains(&status) => {
            return Err(StoreError::Status {
                status,
                body: body.to_string(),
            })
        }
        Err(e) => return Err(StoreError::UnexpectedReply(format!("invalid JSON: {}", e))),
    };

    if let Some(error) = reply.error {
        return Err(StoreError::Command(error));
    }

    if !(200..300).contains(&status) {
        return Err(StoreError::Status {
            status,
            body: body.to_string(),
        });
    }

    Ok(reply.result.unwrap_or(Value::Null))
}

fn as_integer(value: Value) -> StoreResult<i64> {
    value
        .as_i64()
        .ok_or_else(|| StoreError::UnexpectedReply(format!("expected integer, got {}", value)))
}

fn as_strings(value: Value) -> StoreResult<Vec<String>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(StoreError::UnexpectedReply(format!(
                    "expected string member, got {}",
                    other
                ))),
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(StoreError::UnexpectedReply(format!(
            "expected array, got {}",
            other
        ))),
    }
}
