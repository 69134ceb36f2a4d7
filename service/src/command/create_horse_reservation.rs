//! [`Command`] for creating a [`HorseReservation`].

use common::{
    operations::{By, Create, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        horse,
        reservation::{self, horse as horse_reservation},
        user, Horse, HorseReservation,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a [`HorseReservation`].
///
/// Only horses listed for rent accept reservations.
#[derive(Clone, Copy, Debug)]
pub struct CreateHorseReservation {
    /// [`Horse`] being reserved.
    pub horse: horse::Id,

    /// [`User`] requesting the reservation.
    ///
    /// [`User`]: crate::domain::User
    pub user: user::Id,
}

impl<Db, Ml> Command<CreateHorseReservation> for Service<Db, Ml>
where
    Db: Database<
            Select<By<Option<Horse>, horse::Id>>,
            Ok = Option<Horse>,
            Err = Traced<database::Error>,
        > + Database<Create<HorseReservation>, Err = Traced<database::Error>>,
{
    type Ok = HorseReservation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateHorseReservation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateHorseReservation { horse, user } = cmd;

        let subject = self
            .database()
            .execute(Select(By::new(horse)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::HorseNotExists(horse))
            .map_err(tracerr::wrap!())?;
        if !subject.is_reservable() {
            return Err(tracerr::new!(E::NotListedForRent(horse)));
        }

        let reservation = HorseReservation {
            id: horse_reservation::Id::new(),
            horse,
            user,
            status: reservation::Status::Pending,
            payment: reservation::PaymentStatus::Pending,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Create(reservation.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(reservation)
    }
}

/// Error of [`CreateHorseReservation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Horse`] with the provided ID does not exist.
    #[display("`Horse(id: {_0})` does not exist")]
    HorseNotExists(#[error(not(source))] horse::Id),

    /// [`Horse`] is not listed for rent.
    #[display("`Horse(id: {_0})` is not listed for rent")]
    NotListedForRent(#[error(not(source))] horse::Id),
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{
        domain::{horse, user, Horse},
        infra::database::mock::{service, Mock, MockMailer},
        Command as _,
    };

    use super::{CreateHorseReservation, ExecutionError};

    async fn seed_horse(db: &Mock, purpose: horse::Purpose) -> horse::Id {
        let id = horse::Id::new();
        db.with_store(|s| {
            drop(s.horses.insert(
                id,
                Horse {
                    id,
                    owner: user::Id::new(),
                    name: "Najm".parse().unwrap(),
                    breed: "Arabian".parse().unwrap(),
                    images: Vec::new(),
                    purpose,
                    created_at: DateTime::now().coerce(),
                },
            ));
        })
        .await;
        id
    }

    #[tokio::test]
    async fn rentable_horse_accepts_a_reservation() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());
        let horse = seed_horse(&db, horse::Purpose::Rent).await;

        let reservation = svc
            .execute(CreateHorseReservation {
                horse,
                user: user::Id::new(),
            })
            .await
            .unwrap();

        assert!(db
            .with_store(|s| s.horse_reservations.contains_key(&reservation.id))
            .await);
    }

    #[tokio::test]
    async fn horse_listed_for_sale_is_not_reservable() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());
        let horse = seed_horse(&db, horse::Purpose::Sale).await;

        let err = svc
            .execute(CreateHorseReservation {
                horse,
                user: user::Id::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::NotListedForRent(_)
        ));
        assert!(db.with_store(|s| s.horse_reservations.is_empty()).await);
    }
}
