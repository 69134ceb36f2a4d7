//! Content-lake [`Database`] implementation.
//!
//! The content lake is a remote headless document store speaking JSON over
//! HTTP: one endpoint evaluates parameterized queries, another applies
//! batches of mutations (create / patch / delete). There are no
//! transactions; every mutation batch is applied atomically by the store,
//! but separate batches are not coordinated.

mod impls;
mod match_pattern;
pub mod patch;
pub mod query;

use derive_more::{Debug, Display, Error as StdError, From};
use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;
use serde_json::Value;
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use self::{match_pattern::MatchPattern, patch::Patch, query::Query};

/// Configuration of a [`ContentLake`] client.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the content lake API.
    pub endpoint: String,

    /// Dataset to address within the content lake.
    pub dataset: String,

    /// Bearer token authorizing writes.
    #[debug(skip)]
    pub token: SecretString,
}

/// Content-lake [`Database`] client.
#[derive(Clone, Debug)]
pub struct ContentLake {
    /// HTTP client of this [`ContentLake`].
    #[debug(skip)]
    http: reqwest::Client,

    /// [`Config`] of this [`ContentLake`].
    config: Config,
}

impl ContentLake {
    /// Creates a new [`ContentLake`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to create the underlying HTTP client.
    pub fn new(config: Config) -> Result<Self, Traced<database::Error>> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self { http, config })
    }

    /// Evaluates the provided [`Query`] and returns its raw result.
    ///
    /// # Errors
    ///
    /// If the query cannot be evaluated or the response is malformed.
    pub(crate) async fn fetch(
        &self,
        query: Query,
    ) -> Result<Value, Traced<database::Error>> {
        let (body, params) = query.build();
        let url = format!(
            "{}/data/query/{}",
            self.config.endpoint, self.config.dataset,
        );
        let response = self
            .http
            .post(url)
            .bearer_auth(self.config.token.expose_secret())
            .json(&serde_json::json!({
                "query": body,
                "params": params,
            }))
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        let status = response.status();
        if !status.is_success() {
            return Err(tracerr::new!(database::Error::ContentLake(
                Error::UnexpectedStatus(status),
            )));
        }

        /// Envelope of a query response.
        #[derive(Deserialize)]
        struct Envelope {
            /// Evaluated query result.
            result: Value,
        }

        response
            .json::<Envelope>()
            .await
            .map(|e| e.result)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }

    /// Applies the provided mutations as one batch.
    ///
    /// # Errors
    ///
    /// If the batch is rejected or the transport fails.
    pub(crate) async fn mutate(
        &self,
        mutations: Vec<Value>,
    ) -> Result<(), Traced<database::Error>> {
        let url = format!(
            "{}/data/mutate/{}",
            self.config.endpoint, self.config.dataset,
        );
        let response = self
            .http
            .post(url)
            .bearer_auth(self.config.token.expose_secret())
            .json(&serde_json::json!({ "mutations": mutations }))
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        let status = response.status();
        if !status.is_success() {
            return Err(tracerr::new!(database::Error::ContentLake(
                Error::UnexpectedStatus(status),
            )));
        }
        Ok(())
    }

    /// Applies a single create mutation.
    ///
    /// # Errors
    ///
    /// If the mutation is rejected or the transport fails.
    pub(crate) async fn create(
        &self,
        document: Value,
    ) -> Result<(), Traced<database::Error>> {
        self.mutate(vec![serde_json::json!({ "create": document })])
            .await
    }

    /// Applies a single delete mutation.
    ///
    /// # Errors
    ///
    /// If the mutation is rejected or the transport fails.
    pub(crate) async fn delete(
        &self,
        id: impl std::fmt::Display,
    ) -> Result<(), Traced<database::Error>> {
        self.mutate(vec![serde_json::json!({
            "delete": { "id": id.to_string() },
        })])
        .await
    }
}

/// Content-lake [`Error`].
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// HTTP transport error.
    #[display("HTTP transport failed: {_0}")]
    Http(reqwest::Error),

    /// Content lake responded with an unexpected status code.
    #[display("Unexpected response status: {_0}")]
    #[from(ignore)]
    UnexpectedStatus(#[error(not(source))] reqwest::StatusCode),

    /// Response document doesn't conform to the expected shape.
    #[display("Malformed response document: {_0}")]
    #[from(ignore)]
    Malformed(#[error(not(source))] String),
}
