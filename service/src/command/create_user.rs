//! [`Command`] for creating a new [`User`].

use common::{
    operations::{By, Create, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{Email, Name, Password, Phone};
use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`User`].
#[derive(Clone, Debug)]
pub struct CreateUser {
    /// [`Name`] of a new [`User`].
    pub name: user::Name,

    /// [`Email`] of a new [`User`], doubling as the login credential.
    pub email: user::Email,

    /// [`Password`] of a new [`User`].
    pub password: SecretBox<user::Password>,

    /// [`Phone`] of a new [`User`].
    pub phone: Option<user::Phone>,
}

impl<Db, Ml> Command<CreateUser> for Service<Db, Ml>
where
    Db: for<'l> Database<
            Select<By<Option<User>, &'l user::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Create<User>, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUser {
            name,
            email,
            password,
            phone,
        } = cmd;

        let existing = self
            .database()
            .execute(Select(By::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::EmailOccupied(email)));
        }

        let user = User {
            id: user::Id::new(),
            name,
            email,
            phone,
            password_hash: user::PasswordHash::new(password.expose_secret()),
            kind: user::Kind::Regular,
            provider: None,
            wishlist: user::Wishlist::default(),
            created_at: DateTime::now().coerce(),
        };

        self.database()
            .execute(Create(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(user)
    }
}

/// Error of [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`user::Email`] is already occupied.
    #[display("`{_0}` email is occupied")]
    EmailOccupied(#[error(not(source))] user::Email),
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use crate::{
        domain::user,
        infra::database::mock::{service, Mock, MockMailer},
        Command as _,
    };

    use super::{CreateUser, ExecutionError};

    fn cmd(email: &str) -> CreateUser {
        CreateUser {
            name: "Amira".parse().unwrap(),
            email: email.parse().unwrap(),
            password: SecretBox::init_with(|| {
                user::Password::new("h0rses!").unwrap()
            }),
            phone: None,
        }
    }

    #[tokio::test]
    async fn persists_a_regular_user() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());

        let user = svc.execute(cmd("amira@example.com")).await.unwrap();

        let stored = db
            .with_store(|s| s.users.get(&user.id).cloned())
            .await
            .unwrap();
        assert_eq!(stored.kind, user::Kind::Regular);
        assert!(stored.wishlist.services.is_empty());
    }

    #[tokio::test]
    async fn rejects_an_occupied_email() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());

        drop(svc.execute(cmd("amira@example.com")).await.unwrap());
        let err = svc.execute(cmd("amira@example.com")).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::EmailOccupied(_)));
        assert_eq!(db.with_store(|s| s.users.len()).await, 1);
    }
}
