//! [`Command`] for deleting a [`Provider`] and every inbound reference.

use std::collections::BTreeSet;

use common::operations::{By, Delete, Patch, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        join_request, listing, provider, refs, reservation, JoinRequest,
        Provider, Reservation, ServiceListing, User,
    },
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for deleting a [`Provider`].
///
/// The cascade follows the reference graph in [`refs::PROVIDER_INBOUND`] in
/// strict dependency order: abort on active reservations, detach user and
/// service references, strip foreign providers, delete join requests and
/// rejected reservations, delete owned services, sweep any leftover inbound
/// references, and only then delete the provider document itself.
///
/// Any failure surfaces as a structured [`ExecutionError`] carrying the
/// offending document's ID where one exists; nothing is thrown.
#[derive(Clone, Copy, Debug)]
pub struct DeleteProvider {
    /// [`Provider`] to delete.
    pub provider: provider::Id,
}

impl<Db, Ml> Command<DeleteProvider> for Service<Db, Ml>
where
    Db: Database<
            Select<By<Option<Provider>, provider::Id>>,
            Ok = Option<Provider>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Reservation>, provider::Id>>,
            Ok = Vec<Reservation>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<User>, provider::Id>>,
            Ok = Vec<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<ServiceListing>, provider::Id>>,
            Ok = Vec<ServiceListing>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<JoinRequest>, provider::Id>>,
            Ok = Vec<JoinRequest>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Provider>, read::provider::ForeignReferrers>>,
            Ok = Vec<Provider>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<refs::Inbound>, provider::Id>>,
            Ok = Vec<refs::Inbound>,
            Err = Traced<database::Error>,
        > + Database<
            Patch<crate::domain::user::DetachProvider>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Patch<listing::DetachProvider>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Patch<provider::StripForeignRefs>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Patch<refs::Strip>, Ok = (), Err = Traced<database::Error>>
        + Database<
            Delete<join_request::Id>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Delete<reservation::Id>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Delete<listing::Id>, Ok = (), Err = Traced<database::Error>>
        + Database<Delete<provider::Id>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteProvider,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteProvider { provider } = cmd;

        let doc = self
            .database()
            .execute(Select(By::<Option<Provider>, _>::new(provider)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProviderNotExists(provider))
            .map_err(tracerr::wrap!())?;

        // Abort before anything is touched: an active reservation pins the
        // whole provider.
        let reservations = self
            .database()
            .execute(Select(By::<Vec<Reservation>, _>::new(provider)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(active) =
            reservations.iter().find(|r| r.status.is_active())
        {
            return Err(tracerr::new!(E::ActiveReservation(active.id)));
        }

        let owned_listings = self
            .database()
            .execute(Select(By::<Vec<ServiceListing>, _>::new(provider)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let owned = doc
            .owned_services()
            .chain(owned_listings.iter().map(|l| l.id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();

        let requests = self
            .database()
            .execute(Select(By::<Vec<JoinRequest>, _>::new(provider)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let request_ids =
            requests.iter().map(|r| r.id).collect::<Vec<_>>();

        // Step 1: users lose their provider link.
        let users = self
            .database()
            .execute(Select(By::<Vec<User>, _>::new(provider)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        for user in users {
            self.database()
                .execute(Patch(crate::domain::user::DetachProvider {
                    user: user.id,
                }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        // Step 2: services lose their provider reference.
        for listing in &owned_listings {
            self.database()
                .execute(Patch(listing::DetachProvider {
                    listing: listing.id,
                }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        // Step 3: foreign providers lose references to the owned services
        // and pending requests.
        let foreign = self
            .database()
            .execute(Select(By::<Vec<Provider>, _>::new(
                read::provider::ForeignReferrers {
                    provider,
                    services: owned.clone(),
                    requests: request_ids.clone(),
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        for other in foreign {
            let unset_main = other
                .main_service
                .is_some_and(|m| owned.contains(&m));
            self.database()
                .execute(Patch(provider::StripForeignRefs {
                    provider: other.id,
                    unset_main,
                    services: owned.clone(),
                    requests: request_ids.clone(),
                }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        // Step 4: join requests involving the provider go away entirely.
        for request in request_ids {
            self.database()
                .execute(Delete(request))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        // Step 5: rejected reservations go away; completed ones stay as
        // history.
        for reservation in reservations
            .iter()
            .filter(|r| r.status == reservation::Status::Rejected)
        {
            self.database()
                .execute(Delete(reservation.id))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        // Step 6: owned services are deleted.
        for listing in owned {
            self.database()
                .execute(Delete(listing))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        // Step 7: sweep whatever still points at the provider and strip it.
        let leftovers = self
            .database()
            .execute(Select(By::<Vec<refs::Inbound>, _>::new(provider)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        for refs::Inbound { document, field } in leftovers {
            self.database()
                .execute(Patch(refs::Strip { document, field }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        // Step 8: the provider document itself.
        self.database()
            .execute(Delete(provider))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`DeleteProvider`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// A pending or approved [`Reservation`] still references the
    /// [`Provider`].
    #[display("`Reservation(id: {_0})` is still pending or approved")]
    ActiveReservation(#[error(not(source))] reservation::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Provider`] with the provided ID does not exist.
    #[display("`Provider(id: {_0})` does not exist")]
    ProviderNotExists(#[error(not(source))] provider::Id),
}

impl ExecutionError {
    /// Returns the ID of the referencing document that blocked the
    /// cascade, if one did.
    #[must_use]
    pub fn referencing_document_id(&self) -> Option<String> {
        match self {
            Self::ActiveReservation(id) => Some(id.to_string()),
            Self::Db(_) | Self::ProviderNotExists(_) => None,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{Bilingual, DateTime, Money};
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            join_request, listing, provider, rating, refs, reservation,
            user, JoinRequest, Provider, Reservation, ServiceListing, User,
        },
        infra::database::mock::{service, Mock, MockMailer},
        Command as _,
    };

    use super::{DeleteProvider, ExecutionError};

    /// Seeded world around one provider wired up through every edge of
    /// [`refs::PROVIDER_INBOUND`].
    struct World {
        provider: provider::Id,
        owner: user::Id,
        listing: listing::Id,
        foreign: provider::Id,
        reservation: reservation::Id,
    }

    async fn seed(db: &Mock, status: reservation::Status) -> World {
        let provider_id = provider::Id::new();
        let foreign_id = provider::Id::new();
        let owner_id = user::Id::new();
        let listing_id = listing::Id::new();
        let request_id = join_request::Id::new();
        let reservation_id = reservation::Id::new();

        db.with_store(|s| {
            drop(s.users.insert(
                owner_id,
                User {
                    id: owner_id,
                    name: "Amira".parse().unwrap(),
                    email: "amira@example.com".parse().unwrap(),
                    phone: None,
                    password_hash: user::PasswordHash::new(
                        &"h0rses!".into(),
                    ),
                    kind: user::Kind::Provider,
                    provider: Some(provider_id),
                    wishlist: user::Wishlist::default(),
                    created_at: DateTime::now().coerce(),
                },
            ));
            drop(s.listings.insert(
                listing_id,
                ServiceListing {
                    id: listing_id,
                    name: Bilingual::new("Box rental", "تأجير صناديق"),
                    description: Bilingual::default(),
                    price: listing::Price {
                        money: Money {
                            amount: Decimal::from(400),
                            currency: common::money::Currency::Sar,
                        },
                        unit: listing::Unit::PerMonth,
                    },
                    kind: listing::Kind::Stable,
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
                    provider: Some(provider_id),
                    details: None,
                    rating: rating::Aggregate::default(),
                    created_at: DateTime::now().coerce(),
                },
            ));
            drop(s.providers.insert(
                provider_id,
                Provider {
                    id: provider_id,
                    name: Bilingual::new("Desert farms", "مزارع الصحراء"),
                    user: owner_id,
                    main_service: Some(listing_id),
                    services: Vec::new(),
                    pending_requests: vec![request_id],
                    created_at: DateTime::now().coerce(),
                },
            ));
            drop(s.providers.insert(
                foreign_id,
                Provider {
                    id: foreign_id,
                    name: Bilingual::new("Oasis stables", "اسطبلات الواحة"),
                    user: user::Id::new(),
                    main_service: Some(listing_id),
                    services: vec![listing_id],
                    pending_requests: vec![request_id],
                    created_at: DateTime::now().coerce(),
                },
            ));
            drop(s.join_requests.insert(
                request_id,
                JoinRequest {
                    id: request_id,
                    requester: foreign_id,
                    receiver: provider_id,
                    service: listing_id,
                    created_at: DateTime::now().coerce(),
                },
            ));
            drop(s.reservations.insert(
                reservation_id,
                Reservation {
                    id: reservation_id,
                    service: Some(listing_id),
                    provider: Some(provider_id),
                    user: user::Id::new(),
                    status,
                    payment: reservation::PaymentStatus::Pending,
                    created_at: DateTime::now().coerce(),
                },
            ));
        })
        .await;

        World {
            provider: provider_id,
            owner: owner_id,
            listing: listing_id,
            foreign: foreign_id,
            reservation: reservation_id,
        }
    }

    #[tokio::test]
    async fn active_reservation_aborts_with_nothing_deleted() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());
        let world = seed(&db, reservation::Status::Pending).await;

        let err = svc
            .execute(DeleteProvider {
                provider: world.provider,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::ActiveReservation(_)
        ));
        assert_eq!(
            err.as_ref().referencing_document_id(),
            Some(world.reservation.to_string()),
        );

        db.with_store(|s| {
            assert!(s.providers.contains_key(&world.provider));
            assert!(s.listings.contains_key(&world.listing));
            assert_eq!(s.join_requests.len(), 1);
            assert_eq!(
                s.users[&world.owner].provider,
                Some(world.provider),
            );
        })
        .await;
    }

    #[tokio::test]
    async fn cascade_leaves_zero_dangling_references() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());
        let world = seed(&db, reservation::Status::Completed).await;

        svc.execute(DeleteProvider {
            provider: world.provider,
        })
        .await
        .unwrap();

        db.with_store(|s| {
            assert!(!s.providers.contains_key(&world.provider));
            assert!(!s.listings.contains_key(&world.listing));
            assert!(s.join_requests.is_empty());

            // Completed reservations survive as history, stripped of the
            // provider reference.
            let reservation = &s.reservations[&world.reservation];
            assert_eq!(reservation.status, reservation::Status::Completed);
            assert_eq!(reservation.provider, None);

            // Walk the same reference graph the cascade walks: no edge may
            // still resolve to the deleted provider or its listings.
            for edge in refs::PROVIDER_INBOUND {
                match (edge.from, edge.field) {
                    (refs::DocType::User, "provider") => {
                        assert!(s
                            .users
                            .values()
                            .all(|u| u.provider != Some(world.provider)));
                    }
                    (refs::DocType::ServiceListing, "providerRef") => {
                        assert!(s
                            .listings
                            .values()
                            .all(|l| l.provider != Some(world.provider)));
                    }
                    (refs::DocType::Reservation, "providerRef") => {
                        assert!(s
                            .reservations
                            .values()
                            .all(|r| r.provider != Some(world.provider)));
                    }
                    (refs::DocType::Provider, "mainServiceRef") => {
                        assert!(s
                            .providers
                            .values()
                            .all(|p| p.main_service != Some(world.listing)));
                    }
                    (refs::DocType::Provider, "servicesRef") => {
                        assert!(s
                            .providers
                            .values()
                            .all(|p| !p.services.contains(&world.listing)));
                    }
                    (refs::DocType::Provider, "pendingRequests") => {
                        assert!(s
                            .providers
                            .values()
                            .all(|p| p.pending_requests.is_empty()));
                    }
                    (refs::DocType::JoinRequest, _) => {
                        assert!(s.join_requests.values().all(|r| {
                            r.requester != world.provider
                                && r.receiver != world.provider
                        }));
                    }
                    (from, field) => {
                        panic!("unchecked graph edge: {from} {field}");
                    }
                }
            }

            // The foreign provider itself survives.
            assert!(s.providers.contains_key(&world.foreign));
        })
        .await;
    }

    #[tokio::test]
    async fn rejected_reservations_are_deleted_with_the_provider() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());
        let world = seed(&db, reservation::Status::Rejected).await;

        svc.execute(DeleteProvider {
            provider: world.provider,
        })
        .await
        .unwrap();

        assert!(db.with_store(|s| s.reservations.is_empty()).await);
    }
}
