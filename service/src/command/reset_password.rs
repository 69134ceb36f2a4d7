//! [`Command`] for resetting a [`User`] password by a mailed token.

use common::operations::{By, Patch, Select};
use derive_more::{Display, Error, From};
use jsonwebtoken::Validation;
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::Password;
use crate::{
    domain::{
        user::{self, session},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for resetting a [`User`] password by a mailed token.
#[derive(Debug)]
pub struct ResetPassword {
    /// Reset token from the mailed link.
    pub token: String,

    /// New [`Password`] to set.
    pub password: SecretBox<user::Password>,
}

impl<Db, Ml> Command<ResetPassword> for Service<Db, Ml>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Patch<user::PasswordChange>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ResetPassword,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ResetPassword { token, password } = cmd;

        let claims = jsonwebtoken::decode::<session::PasswordReset>(
            &token,
            &self.config().jwt_decoding_key,
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                tracerr::new!(E::TokenExpired)
            }
            _ => tracerr::new!(E::TokenInvalid),
        })?
        .claims;

        let user = self
            .database()
            .execute(Select(By::new(claims.user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(claims.user_id))
            .map_err(tracerr::wrap!())?;

        self.database()
            .execute(Patch(user::PasswordChange {
                user: user.id,
                hash: user::PasswordHash::new(password.expose_secret()),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`ResetPassword`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Reset token has expired.
    #[display("Password reset token has expired")]
    TokenExpired,

    /// Reset token is invalid.
    #[display("Password reset token is invalid")]
    TokenInvalid,

    /// [`User`] the token was issued for no longer exists.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use crate::{
        domain::user,
        infra::database::mock::{service, Mock, MockMailer},
        Command as _,
    };

    use super::{
        super::{CreateUser, ResetPassword},
        ExecutionError,
    };

    #[tokio::test]
    async fn replaces_the_stored_hash() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());

        let user = svc
            .execute(CreateUser {
                name: "Amira".parse().unwrap(),
                email: "amira@example.com".parse().unwrap(),
                password: SecretBox::init_with(|| "0ld-pass".into()),
                phone: None,
            })
            .await
            .unwrap();

        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &user::session::PasswordReset {
                user_id: user.id,
                expires_at: (common::DateTime::now()
                    + std::time::Duration::from_secs(3600))
                .coerce(),
            },
            &svc.config().jwt_encoding_key,
        )
        .unwrap();

        svc.execute(ResetPassword {
            token,
            password: SecretBox::init_with(|| "n3w-pass".into()),
        })
        .await
        .unwrap();

        let stored = db
            .with_store(|s| s.users.get(&user.id).cloned())
            .await
            .unwrap();
        assert_eq!(
            stored.password_hash,
            user::PasswordHash::new(&"n3w-pass".into()),
        );
    }

    #[tokio::test]
    async fn rejects_a_garbage_token() {
        let svc = service(Mock::default(), MockMailer::default());

        let err = svc
            .execute(ResetPassword {
                token: "not-a-jwt".to_owned(),
                password: SecretBox::init_with(|| "n3w-pass".into()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::TokenInvalid));
    }
}
