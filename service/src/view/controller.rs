//! [`Controller`] driving the listing pages' data life cycle.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use common::{
    operations::{By, Select},
    Bilingual,
};
use tokio::sync::{watch, Mutex};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::ServiceListing,
    infra::{database, Database},
    read::listing::{Filter, SearchTerm, SortKey},
};

/// State of a listing page published by a [`Controller`].
#[derive(Clone, Debug, Default)]
pub enum State {
    /// No query has been issued yet.
    #[default]
    Idle,

    /// A query is in flight.
    Loading,

    /// Last query succeeded.
    Success(Vec<ServiceListing>),

    /// Last query failed; the collection is cleared and the message is
    /// shown in the page's locale.
    Error(Bilingual),
}

/// Per-page controller owning the fetch/derive/render life cycle of a
/// listing collection.
///
/// Re-enters the loading state whenever the search term or the filter set
/// changes. Free-text search is debounced; every re-query supersedes the
/// in-flight one through a generation counter, so a slow stale response
/// can never overwrite a fresher one. Instances are fully independent:
/// sibling controllers on one page never share state.
#[derive(Debug)]
pub struct Controller<Db> {
    /// [`Database`] queries are issued against.
    db: Db,

    /// Publisher of the current [`State`].
    state: watch::Sender<State>,

    /// Current query parameters.
    params: Arc<Mutex<Params>>,

    /// Generation counter superseding stale in-flight queries.
    generation: Arc<AtomicU64>,
}

/// Query parameters of a [`Controller`].
#[derive(Clone, Debug, Default)]
struct Params {
    /// Current [`Filter`].
    filter: Filter,

    /// Current [`SortKey`], applied client-side over fetched results.
    sort: SortKey,
}

impl<Db> Clone for Controller<Db>
where
    Db: Clone,
{
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            state: self.state.clone(),
            params: Arc::clone(&self.params),
            generation: Arc::clone(&self.generation),
        }
    }
}

impl<Db> Controller<Db>
where
    Db: Database<
            Select<By<Vec<ServiceListing>, Filter>>,
            Ok = Vec<ServiceListing>,
            Err = Traced<database::Error>,
        > + Clone
        + Send
        + Sync
        + 'static,
{
    /// Debounce applied to free-text search keystrokes.
    const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

    /// Creates a new idle [`Controller`] over the provided [`Filter`].
    #[must_use]
    pub fn new(db: Db, filter: Filter) -> Self {
        let (state, _) = watch::channel(State::Idle);
        Self {
            db,
            state,
            params: Arc::new(Mutex::new(Params {
                filter,
                sort: SortKey::default(),
            })),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Subscribes to the [`State`] updates of this [`Controller`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<State> {
        self.state.subscribe()
    }

    /// Returns the current [`State`] of this [`Controller`].
    #[must_use]
    pub fn state(&self) -> State {
        self.state.subscribe().borrow().clone()
    }

    /// Returns the current [`Filter`] of this [`Controller`].
    pub async fn filter(&self) -> Filter {
        self.params.lock().await.filter.clone()
    }

    /// Issues the initial query.
    pub async fn start(&self) {
        self.refresh(None).await;
    }

    /// Updates the free-text search term and re-queries after a debounce
    /// interval.
    ///
    /// [`None`] clears the term, omitting the free-text clause from the
    /// query entirely.
    pub async fn search(&self, term: Option<SearchTerm>) {
        self.params.lock().await.filter.search = term;
        self.refresh(Some(Self::SEARCH_DEBOUNCE)).await;
    }

    /// Replaces the [`Filter`] and re-queries immediately.
    pub async fn apply_filters(&self, filter: Filter) {
        self.params.lock().await.filter = filter;
        self.refresh(None).await;
    }

    /// Changes the [`SortKey`] and re-sorts the already-fetched collection
    /// without another query.
    pub async fn set_sort(&self, sort: SortKey) {
        self.params.lock().await.sort = sort;
        self.state.send_modify(|state| {
            if let State::Success(listings) = state {
                sort.apply(listings);
            }
        });
    }

    /// Schedules a re-query superseding any in-flight one.
    async fn refresh(&self, debounce: Option<Duration>) {
        let generation =
            self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let this = self.clone();

        drop(tokio::spawn(async move {
            if let Some(debounce) = debounce {
                tokio::time::sleep(debounce).await;
                // Superseded while debouncing: a newer keystroke owns the
                // query now.
                if this.generation.load(Ordering::SeqCst) != generation {
                    return;
                }
            }

            let params = this.params.lock().await.clone();
            _ = this.state.send_replace(State::Loading);

            let result = this
                .db
                .execute(Select(By::new(params.filter)))
                .await;

            // Superseded while in flight: drop the stale response instead
            // of letting it overwrite a fresher one.
            if this.generation.load(Ordering::SeqCst) != generation {
                return;
            }

            match result {
                Ok(mut listings) => {
                    params.sort.apply(&mut listings);
                    _ = this.state.send_replace(State::Success(listings));
                }
                Err(e) => {
                    log::warn!("listing query failed: {e}");
                    _ = this.state.send_replace(State::Error(Bilingual::new(
                        "Failed to load listings, please try again.",
                        "تعذر تحميل الخدمات، يرجى المحاولة مرة أخرى.",
                    )));
                }
            }
        }));
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{Bilingual, DateTimeOf, Money};
    use rust_decimal::Decimal;

    use crate::{
        domain::{listing, rating, ServiceListing},
        infra::database::mock::Mock,
        read::listing::{Filter, SearchTerm, SortKey},
    };

    use super::{Controller, State};

    fn listing(name: &str, price: i64) -> ServiceListing {
        ServiceListing {
            id: listing::Id::new(),
            name: Bilingual::new(name, name),
            description: Bilingual::default(),
            price: listing::Price {
                money: Money {
                    amount: Decimal::from(price),
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
            created_at: DateTimeOf::now(),
        }
    }

    async fn seed(db: &Mock, names: &[(&str, i64)]) {
        for (name, price) in names {
            let doc = listing(name, *price);
            db.with_store(|s| drop(s.listings.insert(doc.id, doc))).await;
        }
    }

    async fn settled(rx: &mut tokio::sync::watch::Receiver<State>) -> State {
        loop {
            rx.changed().await.unwrap();
            let state = rx.borrow_and_update().clone();
            if !matches!(state, State::Loading) {
                return state;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_search_keeps_only_the_last_term() {
        let db = Mock::default();
        seed(&db, &[("alpha stable", 10), ("beta stable", 20)]).await;
        let controller = Controller::new(db, Filter::default());
        let mut rx = controller.subscribe();

        controller.search(SearchTerm::new("alpha")).await;
        // A faster keystroke within the debounce window supersedes the
        // previous one before it ever queries.
        tokio::time::advance(Duration::from_millis(100)).await;
        controller.search(SearchTerm::new("beta")).await;

        let state = settled(&mut rx).await;
        let State::Success(listings) = state else {
            panic!("expected success, got {state:?}");
        };
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].name.en, "beta stable");
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_never_overwrites_a_fresher_one() {
        let db = Mock::default();
        seed(&db, &[("alpha stable", 10)]).await;
        let controller = Controller::new(db.clone(), Filter::default());
        let mut rx = controller.subscribe();

        // First query hangs on a slow transport.
        db.set_delay(Some(Duration::from_secs(5))).await;
        controller
            .apply_filters(Filter {
                search: SearchTerm::new("alpha"),
                ..Filter::default()
            })
            .await;
        tokio::time::advance(Duration::from_millis(10)).await;

        // Second query supersedes it and returns fast.
        db.set_delay(None).await;
        controller.apply_filters(Filter::default()).await;
        let fresh = settled(&mut rx).await;
        assert!(matches!(&fresh, State::Success(l) if l.len() == 1));

        // Let the slow stale response come home; it must be dropped.
        tokio::time::advance(Duration::from_secs(6)).await;
        tokio::task::yield_now().await;
        assert!(matches!(controller.state(), State::Success(_)));
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_failure_clears_results_but_keeps_filters() {
        let db = Mock::default();
        seed(&db, &[("alpha stable", 10)]).await;
        let controller = Controller::new(db.clone(), Filter::default());
        let mut rx = controller.subscribe();

        controller.start().await;
        assert!(matches!(settled(&mut rx).await, State::Success(_)));

        let filter = Filter {
            search: SearchTerm::new("alpha"),
            ..Filter::default()
        };
        db.set_failing(true).await;
        controller.apply_filters(filter.clone()).await;

        let state = settled(&mut rx).await;
        let State::Error(message) = state else {
            panic!("expected error, got {state:?}");
        };
        assert!(!message.en.is_empty() && !message.ar.is_empty());

        // Filters stay put so the user can simply retry.
        assert_eq!(
            controller.filter().await.search,
            filter.search,
        );
        db.set_failing(false).await;
        controller.apply_filters(controller.filter().await).await;
        assert!(matches!(settled(&mut rx).await, State::Success(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn sort_is_applied_client_side_without_a_requery() {
        let db = Mock::default();
        seed(&db, &[("a", 50), ("b", 10), ("c", 100)]).await;
        let controller = Controller::new(db.clone(), Filter::default());
        let mut rx = controller.subscribe();

        controller.start().await;
        assert!(matches!(settled(&mut rx).await, State::Success(_)));

        // A failing transport proves no query is issued for sorting.
        db.set_failing(true).await;
        controller.set_sort(SortKey::PriceLowToHigh).await;

        let State::Success(listings) = controller.state() else {
            panic!("expected success");
        };
        let prices = listings
            .iter()
            .map(|l| l.price.money.amount)
            .collect::<Vec<_>>();
        assert_eq!(
            prices,
            [Decimal::from(10), Decimal::from(50), Decimal::from(100)],
        );
    }
}
