use std::time::Duration;

use base64::prelude::{Engine, BASE64_STANDARD};
use tracing::{debug, trace};

use crate::{
    error::{BoxError, Error},
    ident::InvalidIdentifier,
    pack::{PackedRecord, Routing},
    Event,
};

pub const DEFAULT_BASE_URL: &str = "https://premium-api.boundary.com";
pub const API_VERSION: &str = "v1";

#[derive(Clone)]
pub struct Credentials {
    email: String,
    token: String,
}
impl Credentials {
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: token.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    fn basic_auth(&self) -> String {
        let encoded = BASE64_STANDARD.encode(format!("{}:{}", self.email, self.token));
        format!("Basic {encoded}")
    }
}
impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// One outbound POST, fully prepared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementRequest {
    pub url: String,
    pub authorization: String,
    pub body: String,
}

/// Performs the HTTP exchange. Timeouts and cancellation live here, not in the handler.
pub trait Transport {
    fn send(&self, request: &MeasurementRequest) -> Result<(), BoxError>;
}
impl Transport for ureq::Agent {
    /// Blocking I/O
    fn send(&self, request: &MeasurementRequest) -> Result<(), BoxError> {
        let _resp = self
            .post(&request.url)
            .set("Content-Type", "application/json")
            .set("Authorization", &request.authorization)
            .send_string(&request.body)?;
        Ok(())
    }
}

/// Holds the credentials and hands out [`Handler`]s, one per routing setup.
#[derive(Debug, Clone)]
pub struct Sender<T = ureq::Agent> {
    credentials: Credentials,
    base_url: String,
    transport: T,
}
impl Sender {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_transport(credentials, ureq::Agent::new())
    }

    /// Overall per-request timeout enforced by the agent.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.transport = ureq::AgentBuilder::new().timeout(timeout).build();
        self
    }
}
impl<T> Sender<T>
where
    T: Transport + Clone,
{
    pub fn with_transport(credentials: Credentials, transport: T) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            transport,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    pub fn url(&self) -> String {
        format!("{}/{API_VERSION}/measurements", self.base_url)
    }

    pub fn handler(&self, routing: Routing) -> Handler<T> {
        Handler {
            url: self.url(),
            authorization: self.credentials.basic_auth(),
            routing,
            transport: self.transport.clone(),
        }
    }
}

/// Packs event batches and posts each one as a single request.
#[derive(Clone)]
pub struct Handler<T = ureq::Agent> {
    url: String,
    authorization: String,
    routing: Routing,
    transport: T,
}
impl<T> Handler<T>
where
    T: Transport,
{
    pub fn routing(&self) -> &Routing {
        &self.routing
    }

    pub fn pack(&self, events: &[Event]) -> Result<Vec<PackedRecord>, InvalidIdentifier> {
        self.routing.pack(events)
    }

    /// Blocking I/O
    pub fn dispatch(&self, events: &[Event]) -> Result<(), Error> {
        let records = self.pack(events)?;
        if records.is_empty() {
            trace!(url = %self.url, "empty batch, nothing to send");
            return Ok(());
        }
        let request = MeasurementRequest {
            url: self.url.clone(),
            authorization: self.authorization.clone(),
            body: serde_json::to_string_pretty(&records)?,
        };
        debug!(url = %self.url, records = records.len(), "sending measurements");
        self.transport.send(&request).map_err(Error::Transport)
    }
}
impl<T> core::fmt::Debug for Handler<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Handler")
            .field("url", &self.url)
            .field("routing", &self.routing)
            .finish_non_exhaustive()
    }
}
