use reqwest::{header::HeaderValue, Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

use crate::{
    auth::Caller,
    config::Config,
    errors::{AppError, AppResult},
};

/// Handle on the hosted backend: the PostgREST row store under `/rest/v1`
/// and the identity service under `/auth/v1`.
#[derive(Clone)]
pub struct Database {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl Database {
    pub fn connect(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        log::info!("Remote store configured at {}", config.supabase_url);

        Ok(Self {
            client,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            api_key: config.supabase_anon_key.clone(),
        })
    }

    pub fn table(&self, name: &str) -> Table {
        Table {
            db: self.clone(),
            name: name.to_string(),
            caller: Caller::anonymous(),
        }
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Request carrying the project key. `bearer` replaces the key in the
    /// Authorization header when acting on behalf of a signed-in user.
    pub fn request(&self, method: Method, url: &str, bearer: Option<&str>) -> RequestBuilder {
        let key = self.api_key.expose_secret();
        self.client
            .request(method, url)
            .header("apikey", key)
            .bearer_auth(bearer.unwrap_or(key))
    }
}

/// One collection of the row store, addressed as a given caller.
#[derive(Clone)]
pub struct Table {
    db: Database,
    name: String,
    caller: Caller,
}

impl Table {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The same collection with requests authorized by `caller`'s access
    /// token, so row-level policies evaluate against that user.
    pub fn as_caller(&self, caller: &Caller) -> Table {
        Table {
            caller: caller.clone(),
            ..self.clone()
        }
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.db
            .request(method, &self.db.rest_url(&self.name), self.caller.access_token())
    }

    /// Inserts a row and returns once the store acknowledges it. The
    /// acknowledgment does not prove the row is readable afterwards.
    pub async fn insert<T: Serialize + ?Sized>(&self, row: &T) -> AppResult<()> {
        let response = self
            .request(Method::POST)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }

    pub async fn insert_returning<T, R>(&self, row: &T) -> AppResult<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        let rows: Vec<R> = check_status(response).await?.json().await?;
        rows.into_iter().next().ok_or_else(|| {
            AppError::DatabaseError(format!("Insert into '{}' returned no row", self.name))
        })
    }

    pub async fn find<R: DeserializeOwned>(&self, filter: &Filter) -> AppResult<Vec<R>> {
        let response = self
            .request(Method::GET)
            .query(&filter.params_with_select())
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }

    pub async fn find_one<R: DeserializeOwned>(&self, filter: &Filter) -> AppResult<Option<R>> {
        let rows: Vec<R> = self.find(&filter.clone().limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    pub async fn count(&self, filter: &Filter) -> AppResult<i64> {
        let response = self
            .request(Method::HEAD)
            .header("Prefer", "count=exact")
            .query(&filter.params())
            .send()
            .await?;
        let response = check_status(response).await?;
        response
            .headers()
            .get("content-range")
            .and_then(|v: &HeaderValue| v.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or_else(|| {
                AppError::DatabaseError(format!("Count on '{}' returned no Content-Range", self.name))
            })
    }

    /// Returns the number of rows the store reports as changed.
    pub async fn update<T: Serialize + ?Sized>(&self, filter: &Filter, patch: &T) -> AppResult<usize> {
        let response = self
            .request(Method::PATCH)
            .header("Prefer", "return=representation")
            .query(&filter.params())
            .json(patch)
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = check_status(response).await?.json().await?;
        Ok(rows.len())
    }

    pub async fn delete(&self, filter: &Filter) -> AppResult<usize> {
        let response = self
            .request(Method::DELETE)
            .header("Prefer", "return=representation")
            .query(&filter.params())
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = check_status(response).await?.json().await?;
        Ok(rows.len())
    }
}

/// PostgREST query-string builder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    params: Vec<(String, String)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.params.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn is_null(mut self, column: &str) -> Self {
        self.params.push((column.to_string(), "is.null".to_string()));
        self
    }

    pub fn eq_or_null(self, column: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self.is_null(column),
        }
    }

    pub fn in_list<S: AsRef<str>>(mut self, column: &str, values: &[S]) -> Self {
        let quoted: Vec<String> = values.iter().map(|v| quote_value(v.as_ref())).collect();
        self.params
            .push((column.to_string(), format!("in.({})", quoted.join(","))));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        let clause = format!("{}.{}", column, direction);
        match self.params.iter_mut().find(|(k, _)| k == "order") {
            Some((_, existing)) => {
                existing.push(',');
                existing.push_str(&clause);
            }
            None => self.params.push(("order".to_string(), clause)),
        }
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.params.retain(|(k, _)| k != "limit");
        self.params.push(("limit".to_string(), limit.to_string()));
        self
    }

    pub fn params(&self) -> Vec<(String, String)> {
        self.params.clone()
    }

    fn params_with_select(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(self.params.iter().cloned());
        params
    }
}

fn quote_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Parses the total from a `Content-Range` header such as `0-9/42` or `*/0`.
pub fn parse_content_range_total(header: &str) -> Option<i64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

async fn check_status(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read response body".to_string());

    Err(match status {
        StatusCode::NOT_FOUND => AppError::NotFound(body),
        StatusCode::CONFLICT => AppError::AlreadyExists(body),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Unauthorized(body),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => AppError::Timeout(body),
        _ => AppError::DatabaseError(format!("{}: {}", status, body)),
    })
}
