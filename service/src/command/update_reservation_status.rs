//! [`Command`] for transitioning a [`Reservation`] status.

use common::operations::{By, Patch, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{reservation, Reservation},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for transitioning a [`Reservation`] status.
///
/// Only legal transitions are applied; rejected and completed reservations
/// are terminal.
#[derive(Clone, Copy, Debug)]
pub struct UpdateReservationStatus {
    /// [`Reservation`] being transitioned.
    pub reservation: reservation::Id,

    /// [`Status`] to transition to.
    ///
    /// [`Status`]: reservation::Status
    pub status: reservation::Status,
}

impl<Db, Ml> Command<UpdateReservationStatus> for Service<Db, Ml>
where
    Db: Database<
            Select<By<Option<Reservation>, reservation::Id>>,
            Ok = Option<Reservation>,
            Err = Traced<database::Error>,
        > + Database<
            Patch<reservation::StatusChange>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = Reservation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateReservationStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateReservationStatus {
            reservation,
            status,
        } = cmd;

        let mut current = self
            .database()
            .execute(Select(By::new(reservation)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ReservationNotExists(reservation))
            .map_err(tracerr::wrap!())?;

        if !current.status.can_become(status) {
            return Err(tracerr::new!(E::IllegalTransition {
                from: current.status,
                to: status,
            }));
        }

        self.database()
            .execute(Patch(reservation::StatusChange {
                reservation,
                status,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        current.status = status;
        Ok(current)
    }
}

/// Error of [`UpdateReservationStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Requested transition is not legal.
    #[display("`Reservation` status cannot go from {from} to {to}")]
    IllegalTransition {
        /// Current status.
        from: reservation::Status,

        /// Requested status.
        to: reservation::Status,
    },

    /// [`Reservation`] with the provided ID does not exist.
    #[display("`Reservation(id: {_0})` does not exist")]
    ReservationNotExists(#[error(not(source))] reservation::Id),
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{
        domain::{reservation, user, Reservation},
        infra::database::mock::{service, Mock, MockMailer},
        Command as _,
    };

    use super::{ExecutionError, UpdateReservationStatus};

    async fn seed(db: &Mock, status: reservation::Status) -> reservation::Id {
        let id = reservation::Id::new();
        db.with_store(|s| {
            drop(s.reservations.insert(
                id,
                Reservation {
                    id,
                    service: None,
                    provider: None,
                    user: user::Id::new(),
                    status,
                    payment: reservation::PaymentStatus::Pending,
                    created_at: DateTime::now().coerce(),
                },
            ));
        })
        .await;
        id
    }

    #[tokio::test]
    async fn pending_reservation_can_be_approved() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());
        let id = seed(&db, reservation::Status::Pending).await;

        let updated = svc
            .execute(UpdateReservationStatus {
                reservation: id,
                status: reservation::Status::Approved,
            })
            .await
            .unwrap();

        assert_eq!(updated.status, reservation::Status::Approved);
        assert_eq!(
            db.with_store(|s| s.reservations[&id].status).await,
            reservation::Status::Approved,
        );
    }

    #[tokio::test]
    async fn rejected_reservation_is_terminal() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());
        let id = seed(&db, reservation::Status::Rejected).await;

        let err = svc
            .execute(UpdateReservationStatus {
                reservation: id,
                status: reservation::Status::Approved,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::IllegalTransition { .. }
        ));
    }
}
