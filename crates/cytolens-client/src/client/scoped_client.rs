//! Scoped request client
//!
//! This module provides the HTTP client every other component calls through.
//! A client instance is bound to one hospital scope and one bearer
//! credential for its whole lifetime.

use std::collections::BTreeMap;

use reqwest::{Client as HttpClient, ClientBuilder, Method};
use url::Url;

use crate::api::{ApiService, CellTestApi};
use crate::error::{Error, Result};
use crate::session::SessionProvider;
use crate::types::{CellTest, ImageFile, ImageRecord, ProcessAck, ValidationError};
use crate::{TRACING_TARGET_CLIENT, client::ClientConfig, client::RequestScope};

/// HTTP client for the cell-test resource API.
///
/// Every outbound call is namespaced under the instance's hospital scope and
/// carries its bearer credential. Scope and credential are resolved once at
/// construction; callers needing a different scope construct a new instance.
///
/// # Examples
///
/// ```rust,ignore
/// use cytolens_client::{ClientConfig, RequestScope, ScopedClient};
///
/// let config = ClientConfig::builder()
///     .with_base_url("https://api.cytolens.dev/")?
///     .build()?;
/// let client = ScopedClient::from_session(config, &session)?;
/// let images = client.list_data_images("p1", "ct1").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ScopedClient {
    http: HttpClient,
    config: ClientConfig,
    scope: RequestScope,
}

impl ScopedClient {
    /// Create a new client with the given configuration and scope.
    ///
    /// A missing credential is allowed: the client still constructs so
    /// anonymous endpoints keep working, and authenticated endpoints surface
    /// the authorization error the server returns.
    pub fn new(config: ClientConfig, scope: RequestScope) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            base_url = %config.base_url,
            hospital = scope.hospital().unwrap_or("<none>"),
            authenticated = scope.is_authenticated(),
            "Creating scoped client"
        );

        let http = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            http,
            config,
            scope,
        })
    }

    /// Create a new client, resolving scope and credential from the session
    /// collaborator once.
    pub fn from_session(config: ClientConfig, session: &dyn SessionProvider) -> Result<Self> {
        Self::new(config, RequestScope::from_session(session))
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the request scope this client is bound to.
    pub fn scope(&self) -> &RequestScope {
        &self.scope
    }

    /// Converts this client into an [`ApiService`] for use by coordinators.
    pub fn into_service(self) -> ApiService {
        ApiService::new(self)
    }

    /// Rewrites a server-relative image locator to absolute form by
    /// prefixing the configured base endpoint.
    ///
    /// Locators that are already absolute are returned unchanged.
    pub fn absolute_url(&self, locator: &str) -> Result<Url> {
        if let Ok(url) = Url::parse(locator) {
            return Ok(url);
        }
        let url = self.config.base_url.join(locator.trim_start_matches('/'))?;
        Ok(url)
    }

    /// Prefixes a resource path with the hospital scope, when one is present.
    fn scoped_path(&self, path: &str) -> String {
        match self.scope.hospital() {
            Some(hospital) => format!("{}/{}", hospital, path),
            None => path.to_string(),
        }
    }

    /// Create a new request builder with base configuration.
    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder> {
        let url = self.config.base_url.join(&self.scoped_path(path))?;

        let mut request = self.http.request(method, url);
        if let Some(bearer) = self.scope.bearer() {
            request = request.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", bearer),
            );
        }

        Ok(request)
    }

    /// Handle an HTTP response expected to carry a JSON body.
    async fn handle_json<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(Error::Http);
        }
        Err(Self::error_from_body(
            status.as_u16(),
            &response.text().await.unwrap_or_default(),
        ))
    }

    /// Handle an HTTP response with no meaningful body.
    async fn handle_empty(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::error_from_body(
            status.as_u16(),
            &response.text().await.unwrap_or_default(),
        ))
    }

    /// Map a non-2xx response body to an error.
    ///
    /// Validation failures arrive as a field-to-message object; everything
    /// else is surfaced as an API error with the raw body as message.
    fn error_from_body(status: u16, body: &str) -> Error {
        if status == 400 || status == 422 {
            if let Ok(fields) = serde_json::from_str::<BTreeMap<String, String>>(body) {
                return Error::Validation(ValidationError { fields });
            }
            if let Ok(fields) = serde_json::from_str::<BTreeMap<String, Vec<String>>>(body) {
                let fields = fields
                    .into_iter()
                    .map(|(field, messages)| (field, messages.join("; ")))
                    .collect();
                return Error::Validation(ValidationError { fields });
            }
        }

        let message = if body.is_empty() {
            "Unknown error".to_string()
        } else {
            body.to_string()
        };
        Error::api(status, message)
    }
}

#[async_trait::async_trait]
impl CellTestApi for ScopedClient {
    async fn upload_data_images(
        &self,
        patient_id: &str,
        cell_test_id: &str,
        files: &[ImageFile],
    ) -> Result<Vec<ImageRecord>> {
        let path = format!(
            "patients/{}/cell_tests/{}/data_images",
            patient_id, cell_test_id
        );

        let mut form = reqwest::multipart::Form::new();
        for file in files {
            let part = reqwest::multipart::Part::bytes(file.bytes.to_vec())
                .file_name(file.file_name.clone())
                .mime_str(file.content_type.as_ref())
                .map_err(|e| {
                    Error::config(format!(
                        "Invalid content type '{}': {}",
                        file.content_type, e
                    ))
                })?;
            form = form.part("files", part);
        }

        let response = self
            .request(Method::POST, &path)?
            .multipart(form)
            .send()
            .await?;

        let mut records: Vec<ImageRecord> = self.handle_json(response).await?;
        for record in &mut records {
            record.image = self.absolute_url(&record.image)?.to_string();
        }

        Ok(records)
    }

    async fn list_data_images(
        &self,
        patient_id: &str,
        cell_test_id: &str,
    ) -> Result<Vec<ImageRecord>> {
        let path = format!(
            "patients/{}/cell_tests/{}/data_images",
            patient_id, cell_test_id
        );

        let response = self.request(Method::GET, &path)?.send().await?;

        let mut records: Vec<ImageRecord> = self.handle_json(response).await?;
        for record in &mut records {
            record.image = self.absolute_url(&record.image)?.to_string();
        }

        Ok(records)
    }

    async fn delete_data_image(
        &self,
        patient_id: &str,
        cell_test_id: &str,
        image_id: &str,
    ) -> Result<()> {
        let path = format!(
            "patients/{}/cell_tests/{}/data_images/{}",
            patient_id, cell_test_id, image_id
        );

        let response = self.request(Method::DELETE, &path)?.send().await?;
        self.handle_empty(response).await
    }

    async fn trigger_processing(&self, cell_test_id: &str) -> Result<ProcessAck> {
        let path = format!("process-cell-test/{}", cell_test_id);

        // Empty body; the server queues detection for the whole cell test.
        let response = self.request(Method::POST, &path)?.send().await?;
        self.handle_json(response).await
    }

    async fn list_cell_tests(&self, patient_id: &str) -> Result<Vec<CellTest>> {
        let path = format!("patients/{}/cell_tests", patient_id);

        let response = self.request(Method::GET, &path)?.send().await?;

        let mut tests: Vec<CellTest> = self.handle_json(response).await?;
        for test in &mut tests {
            for result in &mut test.results {
                for image in &mut result.result_images {
                    image.image = self.absolute_url(&image.image)?.to_string();
                }
            }
        }

        Ok(tests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoped() -> ScopedClient {
        let config = ClientConfig::builder()
            .with_base_url("https://api.test/")
            .expect("Valid URL")
            .build()
            .expect("Valid config");
        let scope = RequestScope::new(
            Some("mercy-general".to_string()),
            Some("token-1".to_string()),
        );
        ScopedClient::new(config, scope).expect("Valid client")
    }

    fn anonymous() -> ScopedClient {
        ScopedClient::new(ClientConfig::default(), RequestScope::anonymous())
            .expect("Valid client")
    }

    #[test]
    fn test_paths_namespaced_under_hospital_scope() {
        let client = scoped();
        let request = client
            .request(Method::GET, "patients/p1/cell_tests")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://api.test/mercy-general/patients/p1/cell_tests"
        );
    }

    #[test]
    fn test_unscoped_paths_without_hospital() {
        let client = anonymous();
        assert_eq!(client.scoped_path("patients/p1"), "patients/p1");
    }

    #[test]
    fn test_bearer_header_attached() {
        let client = scoped();
        let request = client
            .request(Method::POST, "process-cell-test/ct1")
            .unwrap()
            .build()
            .unwrap();

        let auth = request
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .unwrap();
        assert_eq!(auth, "Bearer token-1");
    }

    #[test]
    fn test_no_bearer_header_when_anonymous() {
        let client = anonymous();
        let request = client
            .request(Method::GET, "patients/p1/cell_tests")
            .unwrap()
            .build()
            .unwrap();

        assert!(
            request
                .headers()
                .get(reqwest::header::AUTHORIZATION)
                .is_none()
        );
    }

    #[test]
    fn test_absolute_url_prefixes_base_endpoint() {
        let client = scoped();
        assert_eq!(
            client.absolute_url("img/a1.png").unwrap().as_str(),
            "https://api.test/img/a1.png"
        );
        assert_eq!(
            client.absolute_url("/img/a1.png").unwrap().as_str(),
            "https://api.test/img/a1.png"
        );
    }

    #[test]
    fn test_absolute_url_passes_through_absolute_locators() {
        let client = scoped();
        assert_eq!(
            client
                .absolute_url("https://cdn.test/img/a1.png")
                .unwrap()
                .as_str(),
            "https://cdn.test/img/a1.png"
        );
    }

    #[test]
    fn test_error_from_validation_body() {
        let err = ScopedClient::error_from_body(422, r#"{"files":"no files selected"}"#);
        match err {
            Error::Validation(validation) => {
                assert_eq!(validation.field("files"), Some("no files selected"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_from_message_list_body() {
        let err = ScopedClient::error_from_body(400, r#"{"title":["required","too short"]}"#);
        match err {
            Error::Validation(validation) => {
                assert_eq!(validation.field("title"), Some("required; too short"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_from_opaque_body() {
        let err = ScopedClient::error_from_body(503, "upstream down");
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }
}
