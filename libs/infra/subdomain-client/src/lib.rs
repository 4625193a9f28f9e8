// [libs/infra/subdomain-client/src/lib.rs]
/*!
 * Subdomain-issuer RPC client (spec §4.3): `POST /subdomain` to pick a new
 * name, `DELETE /subdomain/{name}` to release it. Bearer-token auth; the
 * sentinel token `"no-use"` disables both calls at the call site rather than
 * never constructing the client, so the rest of the orchestrator doesn't
 * need to branch on whether subdomains are in use.
 */

pub mod errors;

use errors::ClientError;
use serde::Deserialize;
use std::time::Duration;
use tracing::{instrument, warn};

pub const NO_USE_TOKEN: &str = "no-use";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const RETRY_ATTEMPTS: usize = 5;
const RETRY_SLEEP: Duration = Duration::from_secs(2);

#[derive(Deserialize)]
struct PickResponse {
    subdomain_name: Option<String>,
}

pub struct SubdomainClient {
    http: reqwest::Client,
    api_server: String,
    disabled: bool,
}

impl SubdomainClient {
    pub fn new(api_server: impl Into<String>, api_token: impl Into<String>) -> Self {
        let api_token = api_token.into();
        let disabled = api_token == NO_USE_TOKEN;

        let mut headers = reqwest::header::HeaderMap::new();
        if !disabled {
            let value = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", api_token))
                .expect("bearer token must be a valid header value");
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        Self {
            http: reqwest::Client::builder()
                .default_headers(headers)
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("subdomain client must build"),
            api_server: api_server.into().trim_end_matches('/').to_string(),
            disabled,
        }
    }

    /// Acquires a new subdomain name. Returns `None` when the RPC is
    /// disabled by the "no-use" sentinel token.
    #[instrument(skip(self))]
    pub async fn pick(&self) -> Result<Option<String>, ClientError> {
        if self.disabled {
            return Ok(None);
        }

        let url = format!("{}/subdomain", self.api_server);
        let body: PickResponse = self
            .with_retries(|| self.http.post(&url))
            .await?
            .json()
            .await?;

        body.subdomain_name.filter(|s| !s.is_empty()).map(Some).ok_or(ClientError::EmptySubdomain)
    }

    /// Releases a subdomain name. No-op when disabled.
    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> Result<(), ClientError> {
        if self.disabled {
            return Ok(());
        }

        let url = format!("{}/subdomain/{}", self.api_server, name);
        self.with_retries(|| self.http.delete(&url)).await?;
        Ok(())
    }

    async fn with_retries(&self, build: impl Fn() -> reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let mut last_err = None;
        for attempt in 0..RETRY_ATTEMPTS {
            match build().send().await {
                Ok(resp) if resp.status().is_success() => return Ok(resp),
                Ok(resp) => {
                    let status = resp.status();
                    warn!(attempt, %status, "subdomain rpc rejected");
                    last_err = Some(ClientError::ServerRejection(status.to_string()));
                }
                Err(e) => {
                    warn!(attempt, error = %e, "subdomain rpc transport error");
                    last_err = Some(ClientError::Request(e));
                }
            }
            if attempt + 1 < RETRY_ATTEMPTS {
                tokio::time::sleep(RETRY_SLEEP).await;
            }
        }
        Err(last_err.expect("loop runs at least once"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_use_token_disables_client() {
        let client = SubdomainClient::new("https://example.invalid", NO_USE_TOKEN);
        assert!(client.disabled);
    }

    #[tokio::test]
    async fn disabled_pick_returns_none_without_network() {
        let client = SubdomainClient::new("https://example.invalid", NO_USE_TOKEN);
        assert_eq!(client.pick().await.unwrap(), None);
    }

    #[tokio::test]
    async fn disabled_delete_is_noop() {
        let client = SubdomainClient::new("https://example.invalid", NO_USE_TOKEN);
        assert!(client.delete("whatever").await.is_ok());
    }
}
