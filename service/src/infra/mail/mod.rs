//! Mail-delivery implementations.
//!
//! Mail itself is an external collaborator: this service only posts
//! letters to a delivery API and never renders or queues them.

use common::operations::Perform;
use derive_more::{Debug, Display, Error as StdError, From};
#[cfg(feature = "lake")]
use secrecy::{ExposeSecret as _, SecretString};
#[cfg(feature = "lake")]
use tracerr::Traced;

use crate::domain::user;

/// Mail operation.
pub use common::Handler as Mailer;

/// Letter to be delivered to a [`User`].
///
/// [`User`]: crate::domain::User
#[derive(Clone, Debug)]
pub struct Letter {
    /// Recipient of this [`Letter`].
    pub to: user::Email,

    /// Subject line of this [`Letter`].
    pub subject: String,

    /// Plain-text body of this [`Letter`].
    pub body: String,
}

/// [`Mailer`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "lake")]
    /// HTTP transport error.
    #[display("HTTP transport failed: {_0}")]
    Http(reqwest::Error),

    #[cfg(feature = "lake")]
    /// Delivery API responded with an unexpected status code.
    #[display("Unexpected response status: {_0}")]
    #[from(ignore)]
    UnexpectedStatus(#[error(not(source))] reqwest::StatusCode),

    /// Delivery API cannot be reached.
    #[display("Mail delivery is unavailable")]
    Unavailable,
}

#[cfg(feature = "lake")]
/// Configuration of an [`HttpMailer`].
#[derive(Clone, Debug)]
pub struct Config {
    /// URL of the mail delivery API.
    pub endpoint: String,

    /// Bearer token authorizing deliveries.
    #[debug(skip)]
    pub token: SecretString,

    /// Sender address letters are delivered from.
    pub from: String,
}

#[cfg(feature = "lake")]
/// [`Mailer`] delivering letters through an external HTTP mail API.
#[derive(Clone, Debug)]
pub struct HttpMailer {
    /// HTTP client of this [`HttpMailer`].
    #[debug(skip)]
    http: reqwest::Client,

    /// [`Config`] of this [`HttpMailer`].
    config: Config,
}

#[cfg(feature = "lake")]
impl HttpMailer {
    /// Creates a new [`HttpMailer`] with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to create the underlying HTTP client.
    pub fn new(config: Config) -> Result<Self, Traced<Error>> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(tracerr::from_and_wrap!())?;
        Ok(Self { http, config })
    }
}

#[cfg(feature = "lake")]
impl Mailer<Perform<Letter>> for HttpMailer {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Perform(letter): Perform<Letter>,
    ) -> Result<Self::Ok, Self::Err> {
        let Letter { to, subject, body } = letter;

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(self.config.token.expose_secret())
            .json(&serde_json::json!({
                "from": self.config.from,
                "to": to.to_string(),
                "subject": subject,
                "body": body,
            }))
            .send()
            .await
            .map_err(tracerr::from_and_wrap!())?;

        let status = response.status();
        if !status.is_success() {
            return Err(tracerr::new!(Error::UnexpectedStatus(status)));
        }
        Ok(())
    }
}
