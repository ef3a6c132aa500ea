//! Remote dimension endpoints.
//!
//! Paths are templates; `#ID#` is replaced with the dimension id by the caller.
//! Every endpoint answers with a `{ data?, message? }` envelope, and `message` is
//! shown to the user as-is when present.

use log::{debug, error};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::config::AppConfig;
use crate::dimension::Dimension;
use crate::error::RemoteError;
use crate::grid::TablePayload;
use crate::time_dimension::TimeDimensionConfig;

pub const ID_PLACEHOLDER: &str = "#ID#";

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Endpoints {
    pub list: String,
    pub delete: String,
    pub rename: String,
    pub reload: String,
    pub save_configuration: String,
    pub time_dimension_create: String,
    pub time_dimension_update: String,
    pub export: String,
    pub gl_account_export: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            list: "/api/dimensions".to_string(),
            delete: "/api/dimensions/#ID#".to_string(),
            rename: "/api/dimensions/#ID#/rename".to_string(),
            reload: "/api/dimensions/#ID#/reload".to_string(),
            save_configuration: "/api/dimensions/#ID#/configuration".to_string(),
            time_dimension_create: "/api/time-dimensions".to_string(),
            time_dimension_update: "/api/time-dimensions/#ID#".to_string(),
            export: "/api/dimensions/#ID#/export".to_string(),
            gl_account_export: "/api/gl-account/export".to_string(),
        }
    }
}

/// Substitute the dimension id into an endpoint template.
pub fn fill_id(template: &str, id: &str) -> String {
    template.replace(ID_PLACEHOLDER, id)
}

/// Response envelope shared by all endpoints.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ApiReply<T> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiReply<T> {
    pub fn message(message: &str) -> Self {
        ApiReply {
            data: None,
            message: Some(message.to_string()),
        }
    }

    pub fn empty() -> Self {
        ApiReply {
            data: None,
            message: None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct ListQuery {
    pub page: usize,
    pub limit: usize,
    pub search: Option<String>,
}

/// One page of the dimension list plus the system GL account list sent alongside.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct DimensionPage {
    pub items: Vec<Dimension>,
    pub total: usize,
    pub gl_account: Vec<Dimension>,
}

/// Location of an exported file, ready for download.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ExportLink {
    pub url: String,
    pub message: Option<String>,
}

/// Parse `{ <entity>_table_info: { data, pagination: { total } }, gl_account }`.
pub fn parse_page(body: &Value, entity: &str) -> Result<DimensionPage, RemoteError> {
    let key = format!("{}_table_info", entity);
    let info = body
        .get(&key)
        .ok_or_else(|| RemoteError::Parse(format!("Missing {} in response", key)))?;

    let items: Vec<Dimension> = serde_json::from_value(
        info.get("data").cloned().unwrap_or(Value::Array(Vec::new())),
    )
    .map_err(|e| RemoteError::Parse(e.to_string()))?;

    let total = info["pagination"]["total"]
        .as_u64()
        .map(|n| n as usize)
        .unwrap_or(items.len());

    let gl_account: Vec<Dimension> = match body.get("gl_account") {
        Some(Value::Null) | None => Vec::new(),
        Some(list) => serde_json::from_value(list.clone())
            .map_err(|e| RemoteError::Parse(e.to_string()))?,
    };

    Ok(DimensionPage {
        items,
        total,
        gl_account,
    })
}

/// Pull the file URL out of an export reply. `data` may be the URL itself or an
/// object carrying it under `url`, `file_url` or `file`.
pub fn parse_export_link(body: &Value) -> Result<ExportLink, RemoteError> {
    let data = &body["data"];
    let url = data
        .as_str()
        .or_else(|| data["url"].as_str())
        .or_else(|| data["file_url"].as_str())
        .or_else(|| data["file"].as_str())
        .ok_or_else(|| RemoteError::Parse("Missing file URL in export response".into()))?;

    Ok(ExportLink {
        url: url.to_string(),
        message: body["message"].as_str().map(String::from),
    })
}

/// The remote calls made by the dimension views.
#[allow(async_fn_in_trait)]
pub trait DimensionApi {
    async fn list_dimensions(&self, query: &ListQuery) -> Result<DimensionPage, RemoteError>;

    async fn delete_dimension(&self, id: &str) -> Result<ApiReply<Value>, RemoteError>;

    async fn rename_dimension(&self, id: &str, name: &str) -> Result<ApiReply<Value>, RemoteError>;

    /// Re-import the dimension's members. The reply may carry the refreshed dimension.
    async fn reload_dimension(&self, id: &str) -> Result<ApiReply<Dimension>, RemoteError>;

    async fn export_dimension(&self, id: &str) -> Result<ExportLink, RemoteError>;

    async fn export_gl_account(&self) -> Result<ExportLink, RemoteError>;

    async fn save_configuration(
        &self,
        id: &str,
        payload: &TablePayload,
    ) -> Result<ApiReply<Value>, RemoteError>;

    /// Create when `id` is `None`, update otherwise.
    async fn save_time_dimension(
        &self,
        id: Option<&str>,
        config: &TimeDimensionConfig,
    ) -> Result<ApiReply<Value>, RemoteError>;
}

/// [`DimensionApi`] over HTTP.
#[derive(Clone)]
pub struct HttpDimensionApi {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    entity: String,
    endpoints: Endpoints,
}

impl HttpDimensionApi {
    pub fn new(config: &AppConfig) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("dimgrid/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Ok(HttpDimensionApi {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.auth_token.clone(),
            entity: config.entity.clone(),
            endpoints: config.endpoints.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, RemoteError> {
        let response = req.send().await.map_err(|e| {
            error!("request failed: {}", e);
            RemoteError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("server answered {}: {}", status.as_u16(), body);
            return Err(RemoteError::Http(status.as_u16(), body));
        }

        response.json::<T>().await.map_err(RemoteError::from)
    }
}

impl DimensionApi for HttpDimensionApi {
    async fn list_dimensions(&self, query: &ListQuery) -> Result<DimensionPage, RemoteError> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            params.push(("search", search.trim().to_string()));
        }
        debug!("listing dimensions page {} (limit {})", query.page, query.limit);

        let req = self.request(Method::GET, &self.endpoints.list).query(&params);
        let body: Value = self.send(req).await?;
        parse_page(&body, &self.entity)
    }

    async fn delete_dimension(&self, id: &str) -> Result<ApiReply<Value>, RemoteError> {
        let req = self.request(Method::DELETE, &fill_id(&self.endpoints.delete, id));
        self.send(req).await
    }

    async fn rename_dimension(&self, id: &str, name: &str) -> Result<ApiReply<Value>, RemoteError> {
        let req = self
            .request(Method::PUT, &fill_id(&self.endpoints.rename, id))
            .json(&serde_json::json!({ "name": name }));
        self.send(req).await
    }

    async fn reload_dimension(&self, id: &str) -> Result<ApiReply<Dimension>, RemoteError> {
        let req = self.request(Method::POST, &fill_id(&self.endpoints.reload, id));
        self.send(req).await
    }

    async fn export_dimension(&self, id: &str) -> Result<ExportLink, RemoteError> {
        let req = self.request(Method::GET, &fill_id(&self.endpoints.export, id));
        let body: Value = self.send(req).await?;
        parse_export_link(&body)
    }

    async fn export_gl_account(&self) -> Result<ExportLink, RemoteError> {
        let req = self.request(Method::GET, &self.endpoints.gl_account_export);
        let body: Value = self.send(req).await?;
        parse_export_link(&body)
    }

    async fn save_configuration(
        &self,
        id: &str,
        payload: &TablePayload,
    ) -> Result<ApiReply<Value>, RemoteError> {
        let req = self
            .request(Method::PUT, &fill_id(&self.endpoints.save_configuration, id))
            .json(payload);
        self.send(req).await
    }

    async fn save_time_dimension(
        &self,
        id: Option<&str>,
        config: &TimeDimensionConfig,
    ) -> Result<ApiReply<Value>, RemoteError> {
        let req = match id {
            Some(id) => self
                .request(Method::PUT, &fill_id(&self.endpoints.time_dimension_update, id)),
            None => self.request(Method::POST, &self.endpoints.time_dimension_create),
        };
        self.send(req.json(config)).await
    }
}
