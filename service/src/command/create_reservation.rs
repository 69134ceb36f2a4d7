//! [`Command`] for creating a [`Reservation`].

use common::{
    operations::{By, Create, Patch, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{listing, reservation, user, Reservation, ServiceListing},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a [`Reservation`].
///
/// The reservation is created in the pending status; a free-of-charge
/// service completes it right away with a follow-up patch. The two calls
/// are not transactional: a crash in between leaves a pending reservation
/// for the reconciliation pass.
#[derive(Clone, Copy, Debug)]
pub struct CreateReservation {
    /// [`ServiceListing`] being reserved.
    pub service: listing::Id,

    /// [`User`] requesting the reservation.
    ///
    /// [`User`]: crate::domain::User
    pub user: user::Id,
}

impl<Db, Ml> Command<CreateReservation> for Service<Db, Ml>
where
    Db: Database<
            Select<By<Option<ServiceListing>, listing::Id>>,
            Ok = Option<ServiceListing>,
            Err = Traced<database::Error>,
        > + Database<Create<Reservation>, Err = Traced<database::Error>>
        + Database<
            Patch<reservation::Complete>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = Reservation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateReservation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateReservation { service, user } = cmd;

        let listing = self
            .database()
            .execute(Select(By::new(service)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(ServiceListing::is_public)
            .ok_or(E::ListingNotExists(service))
            .map_err(tracerr::wrap!())?;

        let mut reservation = Reservation {
            id: reservation::Id::new(),
            service: Some(service),
            provider: listing.provider,
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

        if listing.price.money.is_free() {
            self.database()
                .execute(Patch(reservation::Complete {
                    reservation: reservation.id,
                }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            reservation.status = reservation::Status::Completed;
            reservation.payment = reservation::PaymentStatus::Paid;
        }

        Ok(reservation)
    }
}

/// Error of [`CreateReservation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`ServiceListing`] with the provided ID does not exist or is not
    /// public.
    #[display("`ServiceListing(id: {_0})` does not exist")]
    ListingNotExists(#[error(not(source))] listing::Id),
}

#[cfg(test)]
mod spec {
    use common::{Bilingual, DateTime, Money};
    use rust_decimal::Decimal;

    use crate::{
        domain::{listing, rating, reservation, user, ServiceListing},
        infra::database::mock::{service, Mock, MockMailer},
        Command as _,
    };

    use super::{CreateReservation, ExecutionError};

    async fn seed_listing(db: &Mock, price: i64) -> listing::Id {
        let id = listing::Id::new();
        db.with_store(|s| {
            drop(s.listings.insert(
                id,
                ServiceListing {
                    id,
                    name: Bilingual::new("Open day", "يوم مفتوح"),
                    description: Bilingual::default(),
                    price: listing::Price {
                        money: Money {
                            amount: Decimal::from(price),
                            currency: common::money::Currency::Sar,
                        },
                        unit: listing::Unit::PerService,
                    },
                    kind: listing::Kind::Competition,
                    approval: listing::Approval {
                        by_admin: true,
                        by_provider: true,
                    },
                    images: Vec::new(),
                    location: listing::Location {
                        country: "KSA".parse().unwrap(),
                        region: None,
                        city: "Riyadh".parse().unwrap(),
                    },
                    provider: None,
                    details: None,
                    rating: rating::Aggregate::default(),
                    created_at: DateTime::now().coerce(),
                },
            ));
        })
        .await;
        id
    }

    #[tokio::test]
    async fn free_service_completes_without_a_payment_step() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());
        let listing = seed_listing(&db, 0).await;

        let reservation = svc
            .execute(CreateReservation {
                service: listing,
                user: user::Id::new(),
            })
            .await
            .unwrap();

        let stored = db
            .with_store(|s| s.reservations[&reservation.id].clone())
            .await;
        assert_eq!(stored.status, reservation::Status::Completed);
        assert_eq!(stored.payment, reservation::PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn priced_service_stays_pending_until_paid() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());
        let listing = seed_listing(&db, 250).await;

        let reservation = svc
            .execute(CreateReservation {
                service: listing,
                user: user::Id::new(),
            })
            .await
            .unwrap();

        let stored = db
            .with_store(|s| s.reservations[&reservation.id].clone())
            .await;
        assert_eq!(stored.status, reservation::Status::Pending);
        assert_eq!(stored.payment, reservation::PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn unapproved_listing_is_not_reservable() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());
        let listing = seed_listing(&db, 100).await;
        db.with_store(|s| {
            s.listings.get_mut(&listing).unwrap().approval.by_admin = false;
        })
        .await;

        let err = svc
            .execute(CreateReservation {
                service: listing,
                user: user::Id::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::ListingNotExists(_)
        ));
    }
}
