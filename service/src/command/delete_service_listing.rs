//! [`Command`] for deleting a [`ServiceListing`].

use common::operations::{By, Delete, Patch, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{listing, provider, reservation, Reservation, ServiceListing},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`ServiceListing`].
///
/// Detaches the listing from its provider and from every reservation made
/// for it before the document itself is deleted, so no dangling references
/// survive.
#[derive(Clone, Copy, Debug)]
pub struct DeleteServiceListing {
    /// [`ServiceListing`] to delete.
    pub listing: listing::Id,
}

impl<Db, Ml> Command<DeleteServiceListing> for Service<Db, Ml>
where
    Db: Database<
            Select<By<Option<ServiceListing>, listing::Id>>,
            Ok = Option<ServiceListing>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<crate::domain::Provider>, provider::Id>>,
            Ok = Option<crate::domain::Provider>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Reservation>, listing::Id>>,
            Ok = Vec<Reservation>,
            Err = Traced<database::Error>,
        > + Database<
            Patch<provider::DetachService>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Patch<reservation::DetachService>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Delete<listing::Id>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteServiceListing,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteServiceListing { listing } = cmd;

        let doc = self
            .database()
            .execute(Select(By::<Option<ServiceListing>, _>::new(listing)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ListingNotExists(listing))
            .map_err(tracerr::wrap!())?;

        if let Some(owner) = doc.provider {
            let is_main = self
                .database()
                .execute(Select(By::<
                    Option<crate::domain::Provider>,
                    _,
                >::new(owner)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .is_some_and(|p| p.main_service == Some(listing));
            self.database()
                .execute(Patch(provider::DetachService {
                    provider: owner,
                    listing,
                    is_main,
                }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        let reservations = self
            .database()
            .execute(Select(By::<Vec<Reservation>, _>::new(listing)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        for reservation in reservations {
            self.database()
                .execute(Patch(reservation::DetachService {
                    reservation: reservation.id,
                }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        self.database()
            .execute(Delete(listing))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`DeleteServiceListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`ServiceListing`] with the provided ID does not exist.
    #[display("`ServiceListing(id: {_0})` does not exist")]
    ListingNotExists(#[error(not(source))] listing::Id),
}
