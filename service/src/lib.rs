//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;
pub mod view;

use std::time::Duration;

use common::operations::{By, Start};
use derive_more::{Debug, Display, Error};

#[cfg(doc)]
use infra::Database;

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] encoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_encoding_key: jsonwebtoken::EncodingKey,

    /// [JWT] decoding key.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// Base URL the password reset links point at.
    pub password_reset_url: String,

    /// Lifetime of a password reset token.
    pub password_reset_lifetime: Duration,

    /// [`task::ReconcileOrders`] configuration.
    pub reconcile_orders: task::reconcile_orders::Config,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Ml> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// Mail collaborator of this [`Service`].
    mailer: Ml,
}

impl<Db, Ml> Service<Db, Ml> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(config: Config, database: Db, mailer: Ml) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<
                        task::ReconcileOrders<Self>,
                        task::reconcile_orders::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Service {
            config,
            database,
            mailer,
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn(async move {
            svc.execute(Start(By::new(svc.config().reconcile_orders)))
                .await
        });

        (this, bg)
    }

    /// Assembles a [`Service`] from its parts without starting any
    /// background tasks.
    #[cfg(test)]
    pub(crate) fn with_parts(config: Config, database: Db, mailer: Ml) -> Self {
        Self {
            config,
            database,
            mailer,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns the mail collaborator of this [`Service`].
    #[must_use]
    pub fn mailer(&self) -> &Ml {
        &self.mailer
    }
}

/// Shortcut for the error of starting a [`Task`].
type TaskStartError<Svc, T, Args> = <Svc as Task<Start<By<T, Args>>>>::Err;

/// Error of starting a [`Service`].
#[derive(Debug, Display, Error)]
pub enum StartupError<Svc>
where
    Svc: Task<
        Start<
            By<task::ReconcileOrders<Svc>, task::reconcile_orders::Config>,
        >,
    >,
{
    /// [`task::ReconcileOrders`] failed to start.
    ReconcileOrdersTask(
        TaskStartError<
            Svc,
            task::ReconcileOrders<Svc>,
            task::reconcile_orders::Config,
        >,
    ),
}
