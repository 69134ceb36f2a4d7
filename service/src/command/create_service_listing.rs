//! [`Command`] for creating a [`ServiceListing`].

use common::{
    operations::{By, Create, Patch, Select},
    Bilingual, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{listing, provider, rating, Provider, ServiceListing},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a [`ServiceListing`] on behalf of a
/// [`Provider`].
///
/// A freshly created listing carries the provider's approval only; it stays
/// invisible to end users until an administrator approves it out-of-band.
/// The provider's first listing becomes its main service, later ones land
/// in the additional services collection.
#[derive(Clone, Debug)]
pub struct CreateServiceListing {
    /// [`Provider`] offering the listing.
    pub provider: provider::Id,

    /// Name of the listing in both locales.
    pub name: Bilingual,

    /// Description of the listing in both locales.
    pub description: Bilingual,

    /// [`Price`] of the listing.
    ///
    /// [`Price`]: listing::Price
    pub price: listing::Price,

    /// [`Kind`] of the listing.
    ///
    /// [`Kind`]: listing::Kind
    pub kind: listing::Kind,

    /// [`Image`]s of the listing.
    ///
    /// [`Image`]: listing::Image
    pub images: Vec<listing::Image>,

    /// [`Location`] of the listing.
    ///
    /// [`Location`]: listing::Location
    pub location: listing::Location,

    /// Kind-specific [`Details`] of the listing.
    ///
    /// [`Details`]: listing::Details
    pub details: Option<listing::Details>,
}

impl<Db, Ml> Command<CreateServiceListing> for Service<Db, Ml>
where
    Db: Database<
            Select<By<Option<Provider>, provider::Id>>,
            Ok = Option<Provider>,
            Err = Traced<database::Error>,
        > + Database<Create<ServiceListing>, Err = Traced<database::Error>>
        + Database<
            Patch<provider::SetMainService>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Patch<provider::AddService>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = ServiceListing;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateServiceListing,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateServiceListing {
            provider,
            name,
            description,
            price,
            kind,
            images,
            location,
            details,
        } = cmd;

        let owner = self
            .database()
            .execute(Select(By::new(provider)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProviderNotExists(provider))
            .map_err(tracerr::wrap!())?;

        let listing = ServiceListing {
            id: listing::Id::new(),
            name,
            description,
            price,
            kind,
            approval: listing::Approval {
                by_admin: false,
                by_provider: true,
            },
            images,
            location,
            provider: Some(provider),
            details,
            rating: rating::Aggregate::default(),
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Create(listing.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if owner.main_service.is_none() {
            self.database()
                .execute(Patch(provider::SetMainService {
                    provider,
                    listing: listing.id,
                }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        } else {
            self.database()
                .execute(Patch(provider::AddService {
                    provider,
                    listing: listing.id,
                }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        Ok(listing)
    }
}

/// Error of [`CreateServiceListing`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Provider`] with the provided ID does not exist.
    #[display("`Provider(id: {_0})` does not exist")]
    ProviderNotExists(#[error(not(source))] provider::Id),
}

#[cfg(test)]
mod spec {
    use common::{Bilingual, DateTime, Money};
    use rust_decimal::Decimal;

    use crate::{
        domain::{listing, provider, user, Provider},
        infra::database::mock::{service, Mock, MockMailer},
        Command as _,
    };

    use super::CreateServiceListing;

    async fn seed_provider(db: &Mock) -> provider::Id {
        let id = provider::Id::new();
        db.with_store(|s| {
            drop(s.providers.insert(
                id,
                Provider {
                    id,
                    name: Bilingual::new("Desert farms", "مزارع الصحراء"),
                    user: user::Id::new(),
                    main_service: None,
                    services: Vec::new(),
                    pending_requests: Vec::new(),
                    created_at: DateTime::now().coerce(),
                },
            ));
        })
        .await;
        id
    }

    fn cmd(provider: provider::Id) -> CreateServiceListing {
        CreateServiceListing {
            provider,
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
            images: Vec::new(),
            location: listing::Location {
                country: "KSA".parse().unwrap(),
                region: None,
                city: "Riyadh".parse().unwrap(),
            },
            details: None,
        }
    }

    #[tokio::test]
    async fn first_listing_becomes_the_main_service() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());
        let provider = seed_provider(&db).await;

        let first = svc.execute(cmd(provider)).await.unwrap();
        let second = svc.execute(cmd(provider)).await.unwrap();

        assert!(!first.is_public(), "awaits admin approval");
        let stored = db.with_store(|s| s.providers[&provider].clone()).await;
        assert_eq!(stored.main_service, Some(first.id));
        assert_eq!(stored.services, [second.id]);
    }
}
