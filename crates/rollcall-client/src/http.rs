//! reqwest-backed implementation of the API traits.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use rollcall_core::config::api::ApiConfig;
use rollcall_core::error::{AppError, ErrorKind};
use rollcall_core::result::AppResult;
use rollcall_core::types::{ActionId, StudentId};

use crate::api::{AttendanceApi, AuthApi, PromotionApi, StudentApi};
use crate::dto::{
    ApiErrorBody, BulkUploadResponse, LoginRequest, LoginResponse, MarkAllResponse,
    MarkMemberRequest, MarkMemberResponse, PresentMember, PromoteRequest, PromoteResponse,
    UndoResponse,
};

/// HTTP client for the attendance REST API.
///
/// Holds the bearer token obtained at login and attaches it to every
/// request.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build HTTP client: {e}"),
                    e,
                )
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(config.token.clone()),
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL of `path` with `action_id` appended as one escaped path segment.
    fn action_url(&self, path: &str, action_id: &ActionId) -> AppResult<Url> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| AppError::configuration(format!("Invalid API URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| {
                AppError::configuration(format!("API URL cannot carry a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .push(action_id.as_str());
        Ok(url)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let token = self.token.read().unwrap_or_else(|e| e.into_inner()).clone();
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> AppResult<Response> {
        let request = self.authorize(builder).build().map_err(|e| {
            AppError::with_source(ErrorKind::Internal, format!("Invalid request: {e}"), e)
        })?;
        let method = request.method().clone();
        let url = request.url().to_string();
        debug!(%method, %url, "Sending API request");

        let response = self.http.execute(request).await.map_err(|e| {
            warn!(%method, %url, error = %e, "API request failed");
            AppError::with_source(ErrorKind::Network, format!("Request to {url} failed: {e}"), e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: ApiErrorBody = response.json().await.unwrap_or_default();
        let message = body
            .message
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        warn!(%method, %url, status = status.as_u16(), message = %message, "API returned an error");
        Err(error_for_status(status, message))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<T> {
        let response = self.execute(builder).await?;
        response.json::<T>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Failed to decode API response: {e}"),
                e,
            )
        })
    }
}

/// Map a non-2xx status to an [`ErrorKind`].
pub fn error_for_status(status: StatusCode, message: impl Into<String>) -> AppError {
    let kind = match status {
        StatusCode::UNAUTHORIZED => ErrorKind::Authentication,
        StatusCode::FORBIDDEN => ErrorKind::Authorization,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
        _ => ErrorKind::ExternalService,
    };
    AppError::new(kind, message)
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        self.send(self.http.post(self.url("/auth/login")).json(request))
            .await
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    fn has_token(&self) -> bool {
        self.token.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }
}

#[async_trait]
impl AttendanceApi for ApiClient {
    async fn mark_member(
        &self,
        date: NaiveDate,
        request: &MarkMemberRequest,
    ) -> AppResult<MarkMemberResponse> {
        let url = self.url(&format!("/attendance/mark-member/{date}"));
        self.send(self.http.post(url).json(request)).await
    }

    async fn mark_all(&self, date: NaiveDate) -> AppResult<MarkAllResponse> {
        let url = self.url(&format!("/attendance/mark-all/{date}"));
        self.send(self.http.post(url)).await
    }

    async fn undo_member(&self, action_id: &ActionId) -> AppResult<UndoResponse> {
        let url = self.action_url("/attendance/individual/undo", action_id)?;
        self.send(self.http.post(url)).await
    }

    async fn undo_mark_all(&self, action_id: &ActionId) -> AppResult<UndoResponse> {
        let url = self.action_url("/attendance/mark-all/undo", action_id)?;
        self.send(self.http.post(url)).await
    }

    async fn unmark_member(&self, date: NaiveDate, student_id: StudentId) -> AppResult<()> {
        let url = self.url(&format!("/attendance/unmark-member/{date}/{student_id}"));
        self.execute(self.http.delete(url)).await?;
        Ok(())
    }

    async fn members_present(&self, date: NaiveDate) -> AppResult<Vec<PresentMember>> {
        let url = self.url(&format!("/attendance/members-present/{date}"));
        self.send(self.http.get(url)).await
    }
}

#[async_trait]
impl StudentApi for ApiClient {
    async fn bulk_upload(&self, file_name: &str, data: Bytes) -> AppResult<BulkUploadResponse> {
        let part = reqwest::multipart::Part::bytes(data.to_vec()).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        self.send(self.http.post(self.url("/bulk-upload/students")).multipart(form))
            .await
    }

    async fn undo_bulk_upload(&self, action_id: &ActionId) -> AppResult<UndoResponse> {
        let url = self.action_url("/bulk-upload/students/undo", action_id)?;
        self.send(self.http.post(url)).await
    }
}

#[async_trait]
impl PromotionApi for ApiClient {
    async fn promote(&self, request: &PromoteRequest) -> AppResult<PromoteResponse> {
        self.send(self.http.post(self.url("/admin/promote-students")).json(request))
            .await
    }

    async fn undo_promotion(&self, action_id: &ActionId) -> AppResult<UndoResponse> {
        let url = self.action_url("/admin/promotions/undo", action_id)?;
        self.send(self.http.post(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (StatusCode::UNAUTHORIZED, ErrorKind::Authentication),
            (StatusCode::FORBIDDEN, ErrorKind::Authorization),
            (StatusCode::NOT_FOUND, ErrorKind::NotFound),
            (StatusCode::BAD_REQUEST, ErrorKind::Validation),
            (StatusCode::UNPROCESSABLE_ENTITY, ErrorKind::Validation),
            (StatusCode::CONFLICT, ErrorKind::ExternalService),
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::ExternalService),
        ];
        for (status, kind) in cases {
            let err = error_for_status(status, "Already undone");
            assert_eq!(err.kind, kind, "{status}");
            assert_eq!(err.message, "Already undone");
        }
    }

    #[test]
    fn test_token_lifecycle() {
        let config = ApiConfig {
            base_url: "http://localhost:4000/".to_string(),
            ..ApiConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:4000");
        assert!(!client.has_token());

        client.set_token(Some("jwt".to_string()));
        assert!(client.has_token());
        client.set_token(None);
        assert!(!client.has_token());
    }

    #[test]
    fn test_action_id_is_one_escaped_segment() {
        let config = ApiConfig {
            base_url: "http://localhost:4000/api/".to_string(),
            ..ApiConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();

        let url = client
            .action_url("/attendance/individual/undo", &ActionId::new("act-7"))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:4000/api/attendance/individual/undo/act-7");

        let url = client
            .action_url("/admin/promotions/undo", &ActionId::new("../x?y#z"))
            .unwrap();
        assert_eq!(url.path(), "/api/admin/promotions/undo/..%2Fx%3Fy%23z");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
            token: None,
        };
        let client = ApiClient::new(&config).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let err = client.mark_all(date).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Network);
    }
}
