//! HTTP client for the dairy backend.
//!
//! One generic set of operations (list, get, create, update) serves every
//! [`ApiResource`]. The session token is handed in explicitly; nothing is read
//! from ambient state. Calls are never retried and every request carries the
//! configured timeout.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::models::{ApiResource, CompanyDetails, UserRole};

/// Who the requests are made for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<UserRole>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            role: None,
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Master data (products, parties, company) is editable by admins and
    /// managers only. Without a known role the backend decides.
    pub fn can_manage_masters(&self) -> bool {
        self.role
            .as_ref()
            .map_or(true, UserRole::can_manage_masters)
    }
}

/// Responses arrive either bare or wrapped as `{ "data": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: Session,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let mut base_url = Url::parse(base_url.trim()).map_err(|e| {
            ServiceError::InvalidInput(format!("invalid API base URL '{}': {}", base_url, e))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ServiceError::InvalidInput(format!(
                "API base URL must be http(s), got '{}'",
                base_url
            )));
        }
        // Url::join drops the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::InternalError(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            session: Session::default(),
            timeout,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let client = Self::new(&config.api_base_url, config.request_timeout())?;
        Ok(match config.api_token() {
            Some(token) => client.with_session(Session::new(token)),
            None => client,
        })
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ServiceError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ServiceError::InvalidInput(format!("invalid route '{}': {}", path, e)))
    }

    fn record_url<T: ApiResource>(&self, id: &str) -> Result<Url, ServiceError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ServiceError::InvalidInput(format!(
                "{} id is required",
                T::NAME
            )));
        }
        let mut url = self.url(T::PATH)?;
        url.path_segments_mut()
            .map_err(|_| ServiceError::InvalidInput(format!("cannot address {}", T::NAME)))?
            .push(id);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn ensure_can_write<T: ApiResource>(&self) -> Result<(), ServiceError> {
        if T::MASTER_DATA && !self.session.can_manage_masters() {
            return Err(ServiceError::Forbidden(format!(
                "your role cannot modify {} records",
                T::NAME
            )));
        }
        Ok(())
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<R, ServiceError> {
        let response = self.authorize(request).send().await.map_err(|e| {
            if e.is_timeout() {
                ServiceError::Timeout(format!("{} after {:?}", what, self.timeout))
            } else {
                ServiceError::NetworkError(e)
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(ServiceError::NetworkError)?;
        if !status.is_success() {
            warn!(%status, "{} failed", what);
            return Err(ServiceError::from_status(status, &body));
        }

        debug!(%status, bytes = body.len(), "{} succeeded", what);
        serde_json::from_str::<Envelope<R>>(&body)
            .map(Envelope::into_inner)
            .map_err(|e| {
                ServiceError::SerializationError(format!("{}: unexpected response: {}", what, e))
            })
    }

    /// GET the whole collection.
    #[instrument(skip(self), fields(resource = T::NAME))]
    pub async fn list<T: ApiResource>(&self) -> Result<Vec<T>, ServiceError> {
        let url = self.url(T::PATH)?;
        let records: OneOrMany<T> = self
            .execute(self.client.get(url), &format!("list {}", T::NAME))
            .await?;
        Ok(match records {
            OneOrMany::Many(records) => records,
            OneOrMany::One(record) => vec![record],
        })
    }

    #[instrument(skip(self), fields(resource = T::NAME))]
    pub async fn get<T: ApiResource>(&self, id: &str) -> Result<T, ServiceError> {
        let url = self.record_url::<T>(id)?;
        self.execute(self.client.get(url), &format!("get {} {}", T::NAME, id))
            .await
    }

    /// POST a new record; the backend's copy (with its id) is returned.
    #[instrument(skip(self, record), fields(resource = T::NAME))]
    pub async fn create<T: ApiResource>(&self, record: &T) -> Result<T, ServiceError> {
        self.ensure_can_write::<T>()?;
        let url = self.url(T::PATH)?;
        self.execute(
            self.client.post(url).json(record),
            &format!("create {}", T::NAME),
        )
        .await
    }

    #[instrument(skip(self, record), fields(resource = T::NAME))]
    pub async fn update<T: ApiResource>(&self, id: &str, record: &T) -> Result<T, ServiceError> {
        self.ensure_can_write::<T>()?;
        let url = self.record_url::<T>(id)?;
        self.execute(
            self.client.patch(url).json(record),
            &format!("update {} {}", T::NAME, id),
        )
        .await
    }

    /// The backend keeps a single company record; the first one wins.
    #[instrument(skip(self))]
    pub async fn company_details(&self) -> Result<CompanyDetails, ServiceError> {
        self.list::<CompanyDetails>()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::NotFound("company details are not configured".to_string()))
    }
}
