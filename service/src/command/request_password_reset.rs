//! [`Command`] for requesting a password reset link.

use common::{
    operations::{By, Perform, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::Email;
use crate::{
    domain::{
        user::{self, session},
        User,
    },
    infra::{database, mail, Database, Mailer},
    Service,
};

use super::Command;

/// [`Command`] for requesting a password reset link.
///
/// Signs a short-lived reset token and mails it to the [`User`]; the
/// password itself is only replaced by [`ResetPassword`] once the link is
/// followed.
///
/// [`ResetPassword`]: super::ResetPassword
#[derive(Clone, Debug, From)]
pub struct RequestPasswordReset {
    /// [`Email`] the reset link is requested for.
    pub email: user::Email,
}

impl<Db, Ml> Command<RequestPasswordReset> for Service<Db, Ml>
where
    Db: for<'l> Database<
        Select<By<Option<User>, &'l user::Email>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
    Ml: Mailer<Perform<mail::Letter>, Ok = (), Err = Traced<mail::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RequestPasswordReset,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RequestPasswordReset { email } = cmd;

        let user = self
            .database()
            .execute(Select(By::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists)
            .map_err(tracerr::wrap!())?;

        let expires_at =
            (DateTime::now() + self.config().password_reset_lifetime).coerce();
        let token = jsonwebtoken::encode::<session::PasswordReset>(
            &jsonwebtoken::Header::default(),
            &session::PasswordReset {
                user_id: user.id,
                expires_at,
            },
            &self.config().jwt_encoding_key,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        let link =
            format!("{}?token={token}", self.config().password_reset_url);
        self.mailer()
            .execute(Perform(mail::Letter {
                to: user.email,
                subject: "Password reset".to_owned(),
                body: format!(
                    "A password reset was requested for your account.\n\
                     Follow the link within an hour to pick a new \
                     password:\n{link}",
                ),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(())
    }
}

/// Error of [`RequestPasswordReset`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),

    /// Mail delivery error.
    #[display("Mail delivery failed: {_0}")]
    Mail(mail::Error),

    /// No [`User`] with the provided [`Email`] exists.
    #[display("No `User` with the provided email exists")]
    UserNotExists,
}

#[cfg(test)]
mod spec {
    use crate::{
        infra::database::mock::{service, Mock, MockMailer},
        Command as _,
    };

    use super::{super::CreateUser, ExecutionError, RequestPasswordReset};

    #[tokio::test]
    async fn mails_a_reset_link_to_an_existing_user() {
        let db = Mock::default();
        let mailer = MockMailer::default();
        let svc = service(db.clone(), mailer.clone());

        drop(
            svc.execute(CreateUser {
                name: "Amira".parse().unwrap(),
                email: "amira@example.com".parse().unwrap(),
                password: secrecy::SecretBox::init_with(|| {
                    "h0rses!".into()
                }),
                phone: None,
            })
            .await
            .unwrap(),
        );

        svc.execute(RequestPasswordReset {
            email: "amira@example.com".parse().unwrap(),
        })
        .await
        .unwrap();

        let letters = mailer.delivered().await;
        assert_eq!(letters.len(), 1);
        assert_eq!(letters[0].to.to_string(), "amira@example.com");
        assert!(letters[0].body.contains("token="));
    }

    #[tokio::test]
    async fn reports_an_unknown_email() {
        let svc = service(Mock::default(), MockMailer::default());

        let err = svc
            .execute(RequestPasswordReset {
                email: "nobody@example.com".parse().unwrap(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::UserNotExists));
    }
}
