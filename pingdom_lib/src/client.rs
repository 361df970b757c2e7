//! HTTP client for the Pingdom REST API 2.0.

use crate::credentials::Credentials;
use crate::error::{error_message, ApiError, AuthError, Error};
use crate::options::{Resolution, ResultsOptions, TimeRange};
use crate::probe::ProbeServer;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use serde_json::Value;
use url::Url;

const API_BASE: &str = "https://api.pingdom.com/api/2.0";
const APP_KEY_HEADER: &str = "App-Key";

type Params = [(&'static str, String)];

/// Pingdom API client.
///
/// Holds the credential triple and nothing else that changes; every method
/// performs exactly one GET and returns the documented field of the body.
#[derive(Clone, Debug)]
pub struct Client {
    credentials: Credentials,
    api_base: String,
    user_agent: String,
    http: HttpClient,
}

impl Client {
    /// Create a new client for the given account.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        app_key: impl Into<String>,
    ) -> Self {
        Self::from_credentials(Credentials::new(username, password, app_key))
    }

    pub fn from_credentials(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_base: API_BASE.to_string(),
            user_agent: format!("pingdom-cli/{}", crate::VERSION),
            http: HttpClient::new(),
        }
    }

    /// Point the client at another API root (no trailing slash needed).
    pub fn with_base_url(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// List all checks (`GET /checks`).
    pub async fn list_checks(&self) -> Result<Vec<Value>, Error> {
        let res = self.get("checks", &[]).await?;
        take_array(res, &["checks"])
    }

    /// List all probe servers (`GET /probes`).
    pub async fn list_probes(&self) -> Result<Vec<ProbeServer>, Error> {
        let res = self.get("probes", &[]).await?;
        take_array(res, &["probes"])?
            .into_iter()
            .enumerate()
            .map(|(i, probe)| match probe {
                Value::Object(attributes) => Ok(ProbeServer::from(attributes)),
                _ => Err(Error::Shape(format!("`probes[{}]` is not an object", i))),
            })
            .collect()
    }

    /// Raw test results for a check (`GET /results/{checkId}`).
    pub async fn get_results(
        &self,
        check_id: u64,
        range: TimeRange,
        offset: u32,
        options: &ResultsOptions,
    ) -> Result<Vec<Value>, Error> {
        let probes = options
            .probes
            .as_ref()
            .map(|probes| ("probes", probes.join(",")));
        let params: Vec<(&'static str, String)> = [
            ("limit", options.limit.to_string()),
            ("from", range.from.to_string()),
            ("to", range.to.to_string()),
            ("offset", offset.to_string()),
        ]
        .into_iter()
        .chain(probes)
        .collect();
        let res = self.get(&format!("results/{}", check_id), &params).await?;
        take_array(res, &["results"])
    }

    /// Status changes for a check within a window (`GET /summary.outage/{checkId}`).
    pub async fn get_outage_results(
        &self,
        check_id: u64,
        range: TimeRange,
    ) -> Result<Vec<Value>, Error> {
        let params = [
            ("from", range.from.to_string()),
            ("to", range.to.to_string()),
        ];
        let res = self
            .get(&format!("summary.outage/{}", check_id), &params)
            .await?;
        take_array(res, &["summary", "states"])
    }

    /// Total up/down/unknown time for a check (`GET /summary.average/{checkId}`).
    pub async fn get_total_uptime(&self, check_id: u64, range: TimeRange) -> Result<Value, Error> {
        let params = [
            ("includeuptime", "true".to_string()),
            ("from", range.from.to_string()),
            ("to", range.to.to_string()),
        ];
        let res = self
            .get(&format!("summary.average/{}", check_id), &params)
            .await?;
        take(res, &["summary", "status"])
    }

    /// Response time and uptime per bucket (`GET /summary.performance/{checkId}`).
    pub async fn get_performance_summary(
        &self,
        check_id: u64,
        range: TimeRange,
        resolution: Resolution,
    ) -> Result<Vec<Value>, Error> {
        let params = [
            ("resolution", resolution.as_str().to_string()),
            ("includeuptime", "true".to_string()),
            ("from", range.from.to_string()),
            ("to", range.to.to_string()),
        ];
        let res = self
            .get(&format!("summary.performance/{}", check_id), &params)
            .await?;
        take_array(res, &["summary", resolution.summary_key()])
    }

    async fn get(&self, path: &str, params: &Params) -> Result<Value, Error> {
        let url = self.url(path, params)?;
        tracing::debug!(path, query = url.query().unwrap_or(""), "GET");
        let req = self.auth(self.http.get(url))?;
        self.send(req).await
    }

    fn url(&self, path: &str, params: &Params) -> Result<Url, Error> {
        let raw = format!("{}/{}", self.api_base, path);
        // parse_with_params leaves a dangling `?` when given no pairs
        let url = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        url.map_err(|e| Error::Other(format!("Invalid request URL {}: {}", raw, e)))
    }

    fn auth(&self, req: RequestBuilder) -> Result<RequestBuilder, Error> {
        let mut headers = HeaderMap::new();
        let mut app_key = HeaderValue::from_str(self.credentials.app_key()).map_err(|_| {
            Error::Other("Application key contains characters not allowed in a header".to_string())
        })?;
        app_key.set_sensitive(true);
        headers.insert(APP_KEY_HEADER, app_key);

        let token = base64::engine::general_purpose::STANDARD.encode(format!(
            "{}:{}",
            self.credentials.username(),
            self.credentials.password()
        ));
        let mut basic = HeaderValue::from_str(&format!("Basic {}", token))
            .map_err(|e| Error::Other(e.to_string()))?;
        basic.set_sensitive(true);
        headers.insert(AUTHORIZATION, basic);

        let user_agent =
            HeaderValue::from_str(&self.user_agent).map_err(|e| Error::Other(e.to_string()))?;
        headers.insert(USER_AGENT, user_agent);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(req.headers(headers))
    }

    async fn send(&self, req: RequestBuilder) -> Result<Value, Error> {
        let res = req.send().await?;
        let status = res.status();
        let body = res.text().await?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "response");
        let data = serde_json::from_str::<Value>(&body);
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Pingdom rejected the credentials");
            let message = error_message(data.as_ref().ok()).unwrap_or_else(|| {
                "Check your username, password and application key.".to_string()
            });
            return Err(Error::Auth(AuthError { message }));
        }
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Pingdom API request failed");
            return Err(Error::Api(ApiError::from_body(status.as_u16(), data.ok())));
        }
        Ok(data?)
    }
}

/// Walk `path` through nested objects and move the value out.
fn take(mut value: Value, path: &[&str]) -> Result<Value, Error> {
    for (i, key) in path.iter().enumerate() {
        value = match value {
            Value::Object(mut map) => map
                .remove(*key)
                .ok_or_else(|| Error::Shape(format!("missing `{}`", path[..=i].join("."))))?,
            _ if i == 0 => {
                return Err(Error::Shape("response body is not an object".to_string()))
            }
            _ => {
                return Err(Error::Shape(format!(
                    "`{}` is not an object",
                    path[..i].join(".")
                )))
            }
        };
    }
    Ok(value)
}

fn take_array(value: Value, path: &[&str]) -> Result<Vec<Value>, Error> {
    match take(value, path)? {
        Value::Array(items) => Ok(items),
        _ => Err(Error::Shape(format!("`{}` is not an array", path.join(".")))),
    }
}
