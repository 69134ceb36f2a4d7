//! [`Command`] for toggling a [`Wishlist`] item.
//!
//! [`Wishlist`]: user::Wishlist

use common::operations::{By, Patch, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{listing, user, ServiceListing, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for toggling a [`Wishlist`] item.
///
/// Toggling the same (user, item) pair twice returns the wishlist to its
/// original membership state. The membership check runs against the current
/// document, while the write itself uses the store's keyed-array
/// operations, so two racing toggles cannot duplicate an entry.
///
/// [`Wishlist`]: user::Wishlist
#[derive(Clone, Copy, Debug)]
pub struct ToggleWishlist {
    /// ID of the [`User`] toggling the item.
    pub user_id: user::Id,

    /// [`Collection`] being toggled.
    ///
    /// [`Collection`]: user::Collection
    pub collection: user::Collection,

    /// Toggled item.
    pub item: listing::Id,
}

/// Outcome of a [`ToggleWishlist`] [`Command`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Output {
    /// Item has been added to the wishlist.
    Added,

    /// Item has been removed from the wishlist.
    Removed,
}

impl<Db, Ml> Command<ToggleWishlist> for Service<Db, Ml>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<ServiceListing>, listing::Id>>,
            Ok = Option<ServiceListing>,
            Err = Traced<database::Error>,
        > + Database<
            Patch<user::WishlistAdd>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Patch<user::WishlistRemove>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ToggleWishlist,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ToggleWishlist {
            user_id,
            collection,
            item,
        } = cmd;

        let user = self
            .database()
            .execute(Select(By::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(user_id))
            .map_err(tracerr::wrap!())?;

        drop(
            self.database()
                .execute(Select(By::new(item)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::ListingNotExists(item))
                .map_err(tracerr::wrap!())?,
        );

        if user.wishlist.contains(collection, item) {
            self.database()
                .execute(Patch(user::WishlistRemove {
                    user: user_id,
                    collection,
                    item,
                }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            Ok(Output::Removed)
        } else {
            self.database()
                .execute(Patch(user::WishlistAdd {
                    user: user_id,
                    collection,
                    item,
                }))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            Ok(Output::Added)
        }
    }
}

/// Error of [`ToggleWishlist`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`ServiceListing`] with the provided ID does not exist.
    #[display("`ServiceListing(id: {_0})` does not exist")]
    ListingNotExists(#[error(not(source))] listing::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use common::{Bilingual, DateTime, Money};
    use rust_decimal::Decimal;

    use crate::{
        domain::{listing, rating, user, ServiceListing, User},
        infra::database::mock::{service, Mock, MockMailer},
        Command as _,
    };

    use super::{Output, ToggleWishlist};

    async fn seed(db: &Mock) -> (user::Id, listing::Id) {
        let user_id = user::Id::new();
        let listing_id = listing::Id::new();
        db.with_store(|s| {
            drop(s.users.insert(
                user_id,
                User {
                    id: user_id,
                    name: "Amira".parse().unwrap(),
                    email: "amira@example.com".parse().unwrap(),
                    phone: None,
                    password_hash: user::PasswordHash::new(
                        &"h0rses!".into(),
                    ),
                    kind: user::Kind::Regular,
                    provider: None,
                    wishlist: user::Wishlist::default(),
                    created_at: DateTime::now().coerce(),
                },
            ));
            drop(s.listings.insert(
                listing_id,
                ServiceListing {
                    id: listing_id,
                    name: Bilingual::new("Sunrise stable", "اسطبل الشروق"),
                    description: Bilingual::default(),
                    price: listing::Price {
                        money: Money {
                            amount: Decimal::from(100),
                            currency: common::money::Currency::Sar,
                        },
                        unit: listing::Unit::PerDay,
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
                    provider: None,
                    details: None,
                    rating: rating::Aggregate::default(),
                    created_at: DateTime::now().coerce(),
                },
            ));
        })
        .await;
        (user_id, listing_id)
    }

    #[tokio::test]
    async fn double_toggle_restores_membership() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());
        let (user_id, item) = seed(&db).await;

        let cmd = ToggleWishlist {
            user_id,
            collection: user::Collection::Stables,
            item,
        };

        assert_eq!(svc.execute(cmd).await.unwrap(), Output::Added);
        let stables = db
            .with_store(|s| s.users[&user_id].wishlist.stables.clone())
            .await;
        assert_eq!(stables, [item]);

        assert_eq!(svc.execute(cmd).await.unwrap(), Output::Removed);
        let stables = db
            .with_store(|s| s.users[&user_id].wishlist.stables.clone())
            .await;
        assert!(stables.is_empty());
    }

    #[tokio::test]
    async fn collections_are_independent() {
        let db = Mock::default();
        let svc = service(db.clone(), MockMailer::default());
        let (user_id, item) = seed(&db).await;

        drop(
            svc.execute(ToggleWishlist {
                user_id,
                collection: user::Collection::Services,
                item,
            })
            .await
            .unwrap(),
        );

        let wishlist =
            db.with_store(|s| s.users[&user_id].wishlist.clone()).await;
        assert_eq!(wishlist.services, [item]);
        assert!(wishlist.stables.is_empty());
    }
}
