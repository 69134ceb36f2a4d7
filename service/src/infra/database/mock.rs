//! In-memory [`Database`] double used by command tests.
//!
//! Implements the same operation traits the real store does, so commands
//! under test run through the exact generic code paths.

use std::{collections::HashMap, sync::Arc, time::Duration};

use common::operations::{By, Create, Delete, Patch, Perform, Select};
use tokio::sync::Mutex;
use tracerr::Traced;

use crate::{
    domain::{
        book, course, horse, join_request, listing, order, provider, rating,
        refs,
        reservation::{self, horse as horse_reservation},
        user, Book, Course, Horse, HorseReservation, JoinRequest, Order,
        Provider, Rating, Reservation, ServiceListing, User,
    },
    infra::{database, mail, Database, Mailer},
    read, Config, Service,
};

/// Documents held by a [`Mock`] database.
#[derive(Debug, Default)]
pub(crate) struct Store {
    /// User documents.
    pub(crate) users: HashMap<user::Id, User>,

    /// Provider documents.
    pub(crate) providers: HashMap<provider::Id, Provider>,

    /// Service listing documents.
    pub(crate) listings: HashMap<listing::Id, ServiceListing>,

    /// Rating documents.
    pub(crate) ratings: HashMap<rating::Id, Rating>,

    /// Reservation documents.
    pub(crate) reservations: HashMap<reservation::Id, Reservation>,

    /// Horse reservation documents.
    pub(crate) horse_reservations:
        HashMap<horse_reservation::Id, HorseReservation>,

    /// Order documents.
    pub(crate) orders: HashMap<order::Id, Order>,

    /// Horse documents.
    pub(crate) horses: HashMap<horse::Id, Horse>,

    /// Book documents.
    pub(crate) books: HashMap<book::Id, Book>,

    /// Course documents.
    pub(crate) courses: HashMap<course::Id, Course>,

    /// Join request documents.
    pub(crate) join_requests: HashMap<join_request::Id, JoinRequest>,
}

/// In-memory [`Database`] double.
#[derive(Clone, Debug, Default)]
pub(crate) struct Mock {
    /// Shared document [`Store`].
    store: Arc<Mutex<Store>>,

    /// Injected behavior of the next operations.
    behavior: Arc<Mutex<Behavior>>,
}

/// Injected behavior of a [`Mock`].
#[derive(Debug, Default)]
struct Behavior {
    /// Makes every operation fail.
    failing: bool,

    /// Delays every select by this duration.
    delay: Option<Duration>,
}

impl Mock {
    /// Runs the provided closure over the locked [`Store`].
    pub(crate) async fn with_store<R>(
        &self,
        f: impl FnOnce(&mut Store) -> R,
    ) -> R {
        f(&mut *self.store.lock().await)
    }

    /// Makes every following operation fail.
    pub(crate) async fn set_failing(&self, failing: bool) {
        self.behavior.lock().await.failing = failing;
    }

    /// Delays every following select by the provided duration.
    pub(crate) async fn set_delay(&self, delay: Option<Duration>) {
        self.behavior.lock().await.delay = delay;
    }

    /// Applies the injected behavior before an operation touches the store.
    async fn gate(&self) -> Result<(), Traced<database::Error>> {
        let (failing, delay) = {
            let behavior = self.behavior.lock().await;
            (behavior.failing, behavior.delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if failing {
            return Err(tracerr::new!(database::Error::Unavailable));
        }
        Ok(())
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for Mock {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let id = by.into_inner();
        Ok(self.with_store(|s| s.users.get(&id).cloned()).await)
    }
}

impl<'l> Database<Select<By<Option<User>, &'l user::Email>>> for Mock {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'l user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let email = by.into_inner().clone();
        Ok(self
            .with_store(|s| {
                s.users.values().find(|u| u.email == email).cloned()
            })
            .await)
    }
}

impl Database<Select<By<Vec<User>, provider::Id>>> for Mock {
    type Ok = Vec<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<User>, provider::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let id = by.into_inner();
        Ok(self
            .with_store(|s| {
                s.users
                    .values()
                    .filter(|u| u.provider == Some(id))
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl Database<Create<User>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Create(user): Create<User>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        self.with_store(|s| drop(s.users.insert(user.id, user))).await;
        Ok(())
    }
}

impl Database<Patch<user::WishlistAdd>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<user::WishlistAdd>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let user::WishlistAdd {
            user,
            collection,
            item,
        } = op;
        self.with_store(|s| {
            if let Some(u) = s.users.get_mut(&user) {
                let list = match collection {
                    user::Collection::Services => &mut u.wishlist.services,
                    user::Collection::Stables => &mut u.wishlist.stables,
                };
                if !list.contains(&item) {
                    list.push(item);
                }
            }
        })
        .await;
        Ok(())
    }
}

impl Database<Patch<user::WishlistRemove>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<user::WishlistRemove>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let user::WishlistRemove {
            user,
            collection,
            item,
        } = op;
        self.with_store(|s| {
            if let Some(u) = s.users.get_mut(&user) {
                let list = match collection {
                    user::Collection::Services => &mut u.wishlist.services,
                    user::Collection::Stables => &mut u.wishlist.stables,
                };
                list.retain(|i| *i != item);
            }
        })
        .await;
        Ok(())
    }
}

impl Database<Patch<user::PasswordChange>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<user::PasswordChange>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let user::PasswordChange { user, hash } = op;
        self.with_store(|s| {
            if let Some(u) = s.users.get_mut(&user) {
                u.password_hash = hash;
            }
        })
        .await;
        Ok(())
    }
}

impl Database<Patch<user::DetachProvider>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<user::DetachProvider>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let user::DetachProvider { user } = op;
        self.with_store(|s| {
            if let Some(u) = s.users.get_mut(&user) {
                u.provider = None;
            }
        })
        .await;
        Ok(())
    }
}

impl Database<Select<By<Option<ServiceListing>, listing::Id>>> for Mock {
    type Ok = Option<ServiceListing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<ServiceListing>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let id = by.into_inner();
        Ok(self.with_store(|s| s.listings.get(&id).cloned()).await)
    }
}

impl Database<Select<By<Vec<ServiceListing>, read::listing::Filter>>>
    for Mock
{
    type Ok = Vec<ServiceListing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<ServiceListing>, read::listing::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let filter = by.into_inner();
        Ok(self
            .with_store(|s| {
                let mut listings = s
                    .listings
                    .values()
                    .filter(|l| filter.matches(l))
                    .cloned()
                    .collect::<Vec<_>>();
                listings
                    .sort_by_key(|l| std::cmp::Reverse(l.created_at));
                listings
            })
            .await)
    }
}

impl Database<Select<By<Vec<ServiceListing>, provider::Id>>> for Mock {
    type Ok = Vec<ServiceListing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<ServiceListing>, provider::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let id = by.into_inner();
        Ok(self
            .with_store(|s| {
                s.listings
                    .values()
                    .filter(|l| l.provider == Some(id))
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl Database<Select<By<Vec<ServiceListing>, Vec<listing::Id>>>> for Mock {
    type Ok = Vec<ServiceListing>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<ServiceListing>, Vec<listing::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let ids = by.into_inner();
        Ok(self
            .with_store(|s| {
                ids.iter()
                    .filter_map(|id| s.listings.get(id).cloned())
                    .collect()
            })
            .await)
    }
}

impl Database<Create<ServiceListing>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Create(listing): Create<ServiceListing>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        self.with_store(|s| drop(s.listings.insert(listing.id, listing)))
            .await;
        Ok(())
    }
}

impl Database<Patch<listing::DetachProvider>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<listing::DetachProvider>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let listing::DetachProvider { listing } = op;
        self.with_store(|s| {
            if let Some(l) = s.listings.get_mut(&listing) {
                l.provider = None;
            }
        })
        .await;
        Ok(())
    }
}

impl Database<Delete<listing::Id>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(id): Delete<listing::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        self.with_store(|s| drop(s.listings.remove(&id))).await;
        Ok(())
    }
}

impl Database<Select<By<Option<Provider>, provider::Id>>> for Mock {
    type Ok = Option<Provider>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Provider>, provider::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let id = by.into_inner();
        Ok(self.with_store(|s| s.providers.get(&id).cloned()).await)
    }
}

impl Database<Select<By<Vec<Provider>, read::provider::ForeignReferrers>>>
    for Mock
{
    type Ok = Vec<Provider>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Provider>, read::provider::ForeignReferrers>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let read::provider::ForeignReferrers {
            provider,
            services,
            requests,
        } = by.into_inner();
        Ok(self
            .with_store(|s| {
                s.providers
                    .values()
                    .filter(|p| {
                        p.id != provider
                            && (p
                                .main_service
                                .is_some_and(|m| services.contains(&m))
                                || p.services
                                    .iter()
                                    .any(|svc| services.contains(svc))
                                || p.pending_requests
                                    .iter()
                                    .any(|r| requests.contains(r)))
                    })
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl Database<Patch<provider::SetMainService>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<provider::SetMainService>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let provider::SetMainService { provider, listing } = op;
        self.with_store(|s| {
            if let Some(p) = s.providers.get_mut(&provider) {
                p.main_service = Some(listing);
            }
        })
        .await;
        Ok(())
    }
}

impl Database<Patch<provider::AddService>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<provider::AddService>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let provider::AddService { provider, listing } = op;
        self.with_store(|s| {
            if let Some(p) = s.providers.get_mut(&provider) {
                if !p.services.contains(&listing) {
                    p.services.push(listing);
                }
            }
        })
        .await;
        Ok(())
    }
}

impl Database<Patch<provider::DetachService>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<provider::DetachService>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let provider::DetachService {
            provider,
            listing,
            is_main,
        } = op;
        self.with_store(|s| {
            if let Some(p) = s.providers.get_mut(&provider) {
                if is_main {
                    p.main_service = None;
                }
                p.services.retain(|svc| *svc != listing);
            }
        })
        .await;
        Ok(())
    }
}

impl Database<Patch<provider::StripForeignRefs>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<provider::StripForeignRefs>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let provider::StripForeignRefs {
            provider,
            unset_main,
            services,
            requests,
        } = op;
        self.with_store(|s| {
            if let Some(p) = s.providers.get_mut(&provider) {
                if unset_main {
                    p.main_service = None;
                }
                p.services.retain(|svc| !services.contains(svc));
                p.pending_requests.retain(|r| !requests.contains(r));
            }
        })
        .await;
        Ok(())
    }
}

impl Database<Delete<provider::Id>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(id): Delete<provider::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        self.with_store(|s| drop(s.providers.remove(&id))).await;
        Ok(())
    }
}

impl Database<Select<By<Vec<Rating>, rating::Subject>>> for Mock {
    type Ok = Vec<Rating>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rating>, rating::Subject>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let subject = by.into_inner();
        Ok(self
            .with_store(|s| {
                s.ratings
                    .values()
                    .filter(|r| r.subject == subject)
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl Database<Create<Rating>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Create(rating): Create<Rating>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        self.with_store(|s| drop(s.ratings.insert(rating.id, rating)))
            .await;
        Ok(())
    }
}

impl Database<Patch<rating::Reaggregate>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<rating::Reaggregate>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let rating::Reaggregate { subject, aggregate } = op;
        self.with_store(|s| match subject {
            rating::Subject::Listing(id) => {
                if let Some(l) = s.listings.get_mut(&id) {
                    l.rating = aggregate;
                }
            }
            rating::Subject::Book(id) => {
                if let Some(b) = s.books.get_mut(&id) {
                    b.rating = aggregate;
                }
            }
            rating::Subject::Course(id) => {
                if let Some(c) = s.courses.get_mut(&id) {
                    c.rating = aggregate;
                }
            }
        })
        .await;
        Ok(())
    }
}

impl Database<Select<By<Option<Reservation>, reservation::Id>>> for Mock {
    type Ok = Option<Reservation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Reservation>, reservation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let id = by.into_inner();
        Ok(self.with_store(|s| s.reservations.get(&id).cloned()).await)
    }
}

impl Database<Select<By<Vec<Reservation>, provider::Id>>> for Mock {
    type Ok = Vec<Reservation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Reservation>, provider::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let id = by.into_inner();
        Ok(self
            .with_store(|s| {
                s.reservations
                    .values()
                    .filter(|r| r.provider == Some(id))
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl Database<Select<By<Vec<Reservation>, listing::Id>>> for Mock {
    type Ok = Vec<Reservation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Reservation>, listing::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let id = by.into_inner();
        Ok(self
            .with_store(|s| {
                s.reservations
                    .values()
                    .filter(|r| r.service == Some(id))
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl Database<Create<Reservation>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Create(reservation): Create<Reservation>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        self.with_store(|s| {
            drop(s.reservations.insert(reservation.id, reservation));
        })
        .await;
        Ok(())
    }
}

impl Database<Patch<reservation::StatusChange>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<reservation::StatusChange>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let reservation::StatusChange {
            reservation,
            status,
        } = op;
        self.with_store(|s| {
            if let Some(r) = s.reservations.get_mut(&reservation) {
                r.status = status;
            }
        })
        .await;
        Ok(())
    }
}

impl Database<Patch<reservation::Complete>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<reservation::Complete>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let reservation::Complete { reservation } = op;
        self.with_store(|s| {
            if let Some(r) = s.reservations.get_mut(&reservation) {
                r.status = reservation::Status::Completed;
                r.payment = reservation::PaymentStatus::Paid;
            }
        })
        .await;
        Ok(())
    }
}

impl Database<Patch<reservation::DetachService>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<reservation::DetachService>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let reservation::DetachService { reservation } = op;
        self.with_store(|s| {
            if let Some(r) = s.reservations.get_mut(&reservation) {
                r.service = None;
            }
        })
        .await;
        Ok(())
    }
}

impl Database<Delete<reservation::Id>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(id): Delete<reservation::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        self.with_store(|s| drop(s.reservations.remove(&id))).await;
        Ok(())
    }
}

impl Database<Create<HorseReservation>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Create(reservation): Create<HorseReservation>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        self.with_store(|s| {
            drop(s.horse_reservations.insert(reservation.id, reservation));
        })
        .await;
        Ok(())
    }
}

impl Database<Select<By<Vec<Order>, read::order::DanglingFree>>> for Mock {
    type Ok = Vec<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Order>, read::order::DanglingFree>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let read::order::DanglingFree { placed_before } = by.into_inner();
        Ok(self
            .with_store(|s| {
                s.orders
                    .values()
                    .filter(|o| {
                        o.status == reservation::Status::Pending
                            && o.price.is_free()
                            && o.created_at < placed_before
                    })
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl Database<Create<Order>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Create(order): Create<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        self.with_store(|s| drop(s.orders.insert(order.id, order))).await;
        Ok(())
    }
}

impl Database<Patch<order::Complete>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<order::Complete>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let order::Complete { order } = op;
        self.with_store(|s| {
            if let Some(o) = s.orders.get_mut(&order) {
                o.status = reservation::Status::Completed;
                o.payment = reservation::PaymentStatus::Paid;
            }
        })
        .await;
        Ok(())
    }
}

impl Database<Select<By<Option<Horse>, horse::Id>>> for Mock {
    type Ok = Option<Horse>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Horse>, horse::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let id = by.into_inner();
        Ok(self.with_store(|s| s.horses.get(&id).cloned()).await)
    }
}

impl Database<Select<By<Option<Book>, book::Id>>> for Mock {
    type Ok = Option<Book>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Book>, book::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let id = by.into_inner();
        Ok(self.with_store(|s| s.books.get(&id).cloned()).await)
    }
}

impl Database<Select<By<Option<Course>, course::Id>>> for Mock {
    type Ok = Option<Course>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Course>, course::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let id = by.into_inner();
        Ok(self.with_store(|s| s.courses.get(&id).cloned()).await)
    }
}

impl Database<Select<By<Vec<JoinRequest>, provider::Id>>> for Mock {
    type Ok = Vec<JoinRequest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<JoinRequest>, provider::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let id = by.into_inner();
        Ok(self
            .with_store(|s| {
                s.join_requests
                    .values()
                    .filter(|r| r.requester == id || r.receiver == id)
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl Database<Delete<join_request::Id>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(id): Delete<join_request::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        self.with_store(|s| drop(s.join_requests.remove(&id))).await;
        Ok(())
    }
}

impl Database<Select<By<Vec<refs::Inbound>, provider::Id>>> for Mock {
    type Ok = Vec<refs::Inbound>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<refs::Inbound>, provider::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let id = by.into_inner();
        Ok(self
            .with_store(|s| {
                let mut inbound = Vec::new();
                for u in s.users.values().filter(|u| u.provider == Some(id)) {
                    inbound.push(refs::Inbound {
                        document: u.id.to_string(),
                        field: "provider".to_owned(),
                    });
                }
                for l in
                    s.listings.values().filter(|l| l.provider == Some(id))
                {
                    inbound.push(refs::Inbound {
                        document: l.id.to_string(),
                        field: "providerRef".to_owned(),
                    });
                }
                for r in s
                    .reservations
                    .values()
                    .filter(|r| r.provider == Some(id))
                {
                    inbound.push(refs::Inbound {
                        document: r.id.to_string(),
                        field: "providerRef".to_owned(),
                    });
                }
                inbound
            })
            .await)
    }
}

impl Database<Patch<refs::Strip>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<refs::Strip>,
    ) -> Result<Self::Ok, Self::Err> {
        self.gate().await?;
        let refs::Strip { document, field } = op;
        self.with_store(|s| match field.as_str() {
            "provider" => {
                if let Some(u) = s
                    .users
                    .values_mut()
                    .find(|u| u.id.to_string() == document)
                {
                    u.provider = None;
                }
            }
            "providerRef" => {
                if let Some(l) = s
                    .listings
                    .values_mut()
                    .find(|l| l.id.to_string() == document)
                {
                    l.provider = None;
                }
                if let Some(r) = s
                    .reservations
                    .values_mut()
                    .find(|r| r.id.to_string() == document)
                {
                    r.provider = None;
                }
            }
            _ => {}
        })
        .await;
        Ok(())
    }
}

/// Mail double recording every delivered [`Letter`].
///
/// [`Letter`]: mail::Letter
#[derive(Clone, Debug, Default)]
pub(crate) struct MockMailer {
    /// Delivered letters.
    letters: Arc<Mutex<Vec<mail::Letter>>>,
}

impl MockMailer {
    /// Returns all delivered letters so far.
    pub(crate) async fn delivered(&self) -> Vec<mail::Letter> {
        self.letters.lock().await.clone()
    }
}

impl Mailer<Perform<mail::Letter>> for MockMailer {
    type Ok = ();
    type Err = Traced<mail::Error>;

    async fn execute(
        &self,
        Perform(letter): Perform<mail::Letter>,
    ) -> Result<Self::Ok, Self::Err> {
        self.letters.lock().await.push(letter);
        Ok(())
    }
}

/// Creates a [`Service`] over the provided doubles without spawning
/// background tasks.
pub(crate) fn service(
    database: Mock,
    mailer: MockMailer,
) -> Service<Mock, MockMailer> {
    Service::with_parts(
        Config {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(
                b"test-secret",
            ),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                b"test-secret",
            ),
            password_reset_url: "https://marketplace.test/reset".to_owned(),
            password_reset_lifetime: Duration::from_secs(60 * 60),
            reconcile_orders: crate::task::reconcile_orders::Config {
                interval: Duration::from_secs(60),
                threshold: Duration::from_secs(60),
            },
        },
        database,
        mailer,
    )
}
