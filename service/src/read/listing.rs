//! [`ServiceListing`]-related read definitions.

use std::str::FromStr;

use derive_more::{AsRef, Display};

use crate::domain::{listing, rating, ServiceListing};

/// Filter narrowing a [`ServiceListing`] collection.
///
/// Every field is a conjunction clause; an unset field is omitted from the
/// query entirely rather than matching everything.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    /// [`listing::Kind`] the page is scoped to.
    pub kind: Option<listing::Kind>,

    /// Free-text [`SearchTerm`] matched against listing names.
    pub search: Option<SearchTerm>,

    /// Minimal rating [`Value`] a listing must have.
    ///
    /// Listings without any ratings are excluded once this is set.
    ///
    /// [`Value`]: rating::Value
    pub min_rating: Option<rating::Value>,

    /// Indicator whether only fully approved listings are returned.
    pub public_only: bool,
}

impl Filter {
    /// Checks whether the provided [`ServiceListing`] passes this [`Filter`].
    ///
    /// Mirrors the clauses the remote query applies, for in-memory
    /// collections.
    #[must_use]
    pub fn matches(&self, listing: &ServiceListing) -> bool {
        if self.public_only && !listing.is_public() {
            return false;
        }
        if let Some(kind) = self.kind {
            if listing.kind != kind {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if listing.rating.count == 0
                || listing.rating.average < f64::from(min.get())
            {
                return false;
            }
        }
        if let Some(term) = &self.search {
            let term = AsRef::<str>::as_ref(term).to_lowercase();
            if !listing.name.en.to_lowercase().contains(&term)
                && !listing.name.ar.contains(term.as_str())
            {
                return false;
            }
        }
        true
    }
}

/// Free-text search term of a [`Filter`].
///
/// Never interpolated into a query body; always passed through the
/// parameter map.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Creates a new [`SearchTerm`] if the given `term` is valid.
    ///
    /// [`None`] is returned for an empty or overlong term, so an empty
    /// search box omits the free-text clause instead of matching everything.
    #[must_use]
    pub fn new(term: impl Into<String>) -> Option<Self> {
        let term = term.into();
        let trimmed = term.trim();
        (!trimmed.is_empty() && trimmed.len() <= 256)
            .then(|| Self(trimmed.to_owned()))
    }
}

impl FromStr for SearchTerm {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `SearchTerm`")
    }
}

/// Sort key applied over an already-fetched [`ServiceListing`] collection.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortKey {
    /// Cheapest first.
    PriceLowToHigh,

    /// Most expensive first.
    PriceHighToLow,

    /// Best rated first.
    RatingHighToLow,

    /// Most recently created first.
    Newest,

    /// Original relevance order.
    #[default]
    Relevance,
}

impl SortKey {
    /// Sorts the provided [`ServiceListing`]s in place.
    pub fn apply(self, listings: &mut [ServiceListing]) {
        match self {
            Self::PriceLowToHigh => {
                listings.sort_by_key(|l| l.price.money.amount);
            }
            Self::PriceHighToLow => {
                listings.sort_by_key(|l| std::cmp::Reverse(l.price.money.amount));
            }
            Self::RatingHighToLow => {
                listings.sort_by(|a, b| {
                    b.rating
                        .average
                        .partial_cmp(&a.rating.average)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            }
            Self::Newest => {
                listings.sort_by_key(|l| std::cmp::Reverse(l.created_at));
            }
            Self::Relevance => {}
        }
    }
}

pub mod list {
    //! [`ServiceListing`] list definitions.

    use common::define_pagination;

    use crate::domain::listing;
    #[cfg(doc)]
    use crate::domain::ServiceListing;

    define_pagination!(Cursor, Node, super::Filter);

    /// Node in a [`Connection`].
    pub type Node = listing::Id;

    /// Cursor pointing to a specific [`ServiceListing`] in a list.
    pub type Cursor = listing::Id;
}

#[cfg(test)]
mod spec {
    use common::{Bilingual, DateTimeOf, Money};
    use rust_decimal::Decimal;

    use crate::domain::{listing, rating, ServiceListing};

    use super::{Filter, SearchTerm, SortKey};

    fn listing(price: i64, rating: Option<(f64, i32)>) -> ServiceListing {
        let (average, count) = rating.unwrap_or_default();
        ServiceListing {
            id: listing::Id::new(),
            name: Bilingual::new("Sunrise stable", "اسطبل الشروق"),
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
            rating: rating::Aggregate { average, count },
            created_at: DateTimeOf::now(),
        }
    }

    #[test]
    fn price_low_to_high_sorts_ascending() {
        let mut listings =
            vec![listing(50, None), listing(100, None), listing(10, None)];
        SortKey::PriceLowToHigh.apply(&mut listings);
        let prices = listings
            .iter()
            .map(|l| l.price.money.amount)
            .collect::<Vec<_>>();
        assert_eq!(
            prices,
            [Decimal::from(10), Decimal::from(50), Decimal::from(100)],
        );
    }

    #[test]
    fn min_rating_excludes_unrated_and_low_rated() {
        let filter = Filter {
            min_rating: rating::Value::new(3),
            ..Filter::default()
        };
        assert!(filter.matches(&listing(10, Some((4.5, 2)))));
        assert!(filter.matches(&listing(10, Some((3.0, 1)))));
        assert!(!filter.matches(&listing(10, Some((2.9, 7)))));
        assert!(!filter.matches(&listing(10, None)));
    }

    #[test]
    fn empty_search_term_is_unrepresentable() {
        assert!(SearchTerm::new("").is_none());
        assert!(SearchTerm::new("   ").is_none());
        assert!(SearchTerm::new("farrier").is_some());
    }

    #[test]
    fn search_matches_either_locale() {
        let filter = Filter {
            search: SearchTerm::new("sunrise"),
            ..Filter::default()
        };
        assert!(filter.matches(&listing(10, None)));

        let filter = Filter {
            search: SearchTerm::new("الشروق"),
            ..Filter::default()
        };
        assert!(filter.matches(&listing(10, None)));

        let filter = Filter {
            search: SearchTerm::new("dressage"),
            ..Filter::default()
        };
        assert!(!filter.matches(&listing(10, None)));
    }
}
