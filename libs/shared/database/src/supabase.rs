use reqwest::{
    Client,
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method, Response,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::error::DatabaseError;

pub type DbResult<T> = Result<T, DatabaseError>;

/// Error body shapes returned by PostgREST (`message`/`code`/`details`/`hint`)
/// and GoTrue (`msg`, `error_description`, `error`).
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
    code: Option<Value>,
    details: Option<String>,
    hint: Option<String>,
}

/// Session returned by the password grant.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
    pub user: Value,
}

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            api_key: config.database_key().to_string(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> DbResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", header_value(&self.api_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let bearer = auth_token.unwrap_or(&self.api_key);
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", bearer))?);

        Ok(headers)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> DbResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers(auth_token)?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);
            return Err(parse_error(status.as_u16(), &error_text));
        }

        Ok(response)
    }

    pub async fn request<T>(&self, method: Method, path: &str,
                            auth_token: Option<&str>, body: Option<Value>)
                            -> DbResult<T>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, auth_token, body, None).await
    }

    pub async fn request_with_headers<T>(&self, method: Method, path: &str,
                                         auth_token: Option<&str>, body: Option<Value>,
                                         headers: Option<HeaderMap>)
                                         -> DbResult<T>
    where T: DeserializeOwned {
        let response = self.send(method, path, auth_token, body, headers).await?;

        response.json::<T>().await
            .map_err(|e| DatabaseError::new(format!("Invalid response from database: {}", e)))
    }

    /// Sends a request whose response body is not needed.
    pub async fn execute(&self, method: Method, path: &str,
                         auth_token: Option<&str>, body: Option<Value>) -> DbResult<()> {
        self.send(method, path, auth_token, body, Some(prefer("return=minimal"))).await?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // PostgREST table helpers
    // ---------------------------------------------------------------------

    pub async fn select<T>(&self, table: &str, query: &str) -> DbResult<Vec<T>>
    where T: DeserializeOwned {
        let path = rest_path(table, query);
        self.request(Method::GET, &path, None, None).await
    }

    pub async fn select_one<T>(&self, table: &str, query: &str) -> DbResult<Option<T>>
    where T: DeserializeOwned {
        let query = if query.is_empty() { "limit=1".to_string() } else { format!("{}&limit=1", query) };
        let rows: Vec<T> = self.select(table, &query).await?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert<T>(&self, table: &str, row: Value) -> DbResult<T>
    where T: DeserializeOwned {
        let rows: Vec<T> = self.insert_many(table, row).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DatabaseError::new(format!("Insert into {} returned no rows", table)))
    }

    pub async fn insert_many<T>(&self, table: &str, rows: Value) -> DbResult<Vec<T>>
    where T: DeserializeOwned {
        let path = rest_path(table, "");
        self.request_with_headers(
            Method::POST,
            &path,
            None,
            Some(rows),
            Some(prefer("return=representation")),
        ).await
    }

    pub async fn update<T>(&self, table: &str, filter: &str, changes: Value) -> DbResult<Vec<T>>
    where T: DeserializeOwned {
        let path = rest_path(table, filter);
        self.request_with_headers(
            Method::PATCH,
            &path,
            None,
            Some(changes),
            Some(prefer("return=representation")),
        ).await
    }

    pub async fn delete(&self, table: &str, filter: &str) -> DbResult<()> {
        let path = rest_path(table, filter);
        self.execute(Method::DELETE, &path, None, None).await
    }

    /// Exact row count from the `Content-Range` header (`0-0/42`, `*/0`).
    pub async fn count(&self, table: &str, filter: &str) -> DbResult<i64> {
        let query = if filter.is_empty() {
            "select=id&limit=1".to_string()
        } else {
            format!("select=id&limit=1&{}", filter)
        };
        let path = rest_path(table, &query);

        let response = self.send(Method::GET, &path, None, None, Some(prefer("count=exact"))).await?;

        let range = response.headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        parse_content_range(&range)
            .ok_or_else(|| DatabaseError::new(format!("Missing row count for {}: '{}'", table, range)))
    }

    // ---------------------------------------------------------------------
    // GoTrue helpers
    // ---------------------------------------------------------------------

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> DbResult<AuthSession> {
        self.request(
            Method::POST,
            "/auth/v1/token?grant_type=password",
            None,
            Some(json!({ "email": email, "password": password })),
        ).await
    }

    pub async fn sign_out(&self, access_token: &str) -> DbResult<()> {
        self.execute(Method::POST, "/auth/v1/logout", Some(access_token), None).await
    }

    pub async fn get_auth_user(&self, access_token: &str) -> DbResult<Value> {
        self.request(Method::GET, "/auth/v1/user", Some(access_token), None).await
    }

    /// Creates a confirmed auth user; `app_metadata` carries the role.
    pub async fn admin_create_user(&self, email: &str, password: &str, role: &str) -> DbResult<Value> {
        self.request(
            Method::POST,
            "/auth/v1/admin/users",
            None,
            Some(json!({
                "email": email,
                "password": password,
                "email_confirm": true,
                "app_metadata": { "role": role },
                "user_metadata": { "role": role }
            })),
        ).await
    }

    pub async fn admin_delete_user(&self, user_id: &str) -> DbResult<()> {
        let path = format!("/auth/v1/admin/users/{}", user_id);
        self.execute(Method::DELETE, &path, None, None).await
    }
}

fn rest_path(table: &str, query: &str) -> String {
    if query.is_empty() {
        format!("/rest/v1/{}", table)
    } else {
        format!("/rest/v1/{}?{}", table, query)
    }
}

fn prefer(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static("prefer"), HeaderValue::from_static(value));
    headers
}

fn header_value(value: &str) -> DbResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| DatabaseError::new("Invalid characters in database credentials"))
}

fn transport_error(e: reqwest::Error) -> DatabaseError {
    let err = DatabaseError::new(format!("Request to database failed: {}", e));
    match e.status() {
        Some(status) => err.with_status(status.as_u16()),
        None => err,
    }
}

fn parse_error(status: u16, text: &str) -> DatabaseError {
    let body: ErrorBody = serde_json::from_str(text).unwrap_or_default();

    let message = body.message
        .or(body.msg)
        .or(body.error_description)
        .or(body.error)
        .unwrap_or_else(|| {
            if text.is_empty() { format!("Database request failed with status {}", status) } else { text.to_string() }
        });

    DatabaseError {
        message,
        status: Some(status),
        code: body.code.map(|c| match c {
            Value::String(s) => s,
            other => other.to_string(),
        }),
        details: body.details,
        hint: body.hint,
    }
}

fn parse_content_range(range: &str) -> Option<i64> {
    range.rsplit('/').next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_postgrest_error_body() {
        let err = parse_error(
            409,
            r#"{"code":"23505","details":"Key (email)=(a@b.c) already exists.","hint":null,"message":"duplicate key value violates unique constraint"}"#,
        );
        assert_eq!(err.status, Some(409));
        assert_eq!(err.code.as_deref(), Some("23505"));
        assert_eq!(err.message, "duplicate key value violates unique constraint");
        assert!(err.details.unwrap().contains("already exists"));
    }

    #[test]
    fn parses_gotrue_error_body() {
        let err = parse_error(400, r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#);
        assert_eq!(err.message, "Invalid login credentials");
        assert_eq!(err.status, Some(400));
    }

    #[test]
    fn falls_back_to_raw_text() {
        let err = parse_error(502, "Bad gateway");
        assert_eq!(err.message, "Bad gateway");
        let err = parse_error(500, "");
        assert!(err.message.contains("500"));
    }

    #[test]
    fn content_range_counts() {
        assert_eq!(parse_content_range("0-0/42"), Some(42));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range(""), None);
    }
}
