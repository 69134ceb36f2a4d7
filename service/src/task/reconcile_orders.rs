//! [`ReconcileOrders`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Patch, Perform, Select, Start};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{order, Order},
    infra::{database, Database},
    read, Service,
};

use super::Task;

/// Configuration for [`ReconcileOrders`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between reconciliation sweeps.
    pub interval: time::Duration,

    /// Age after which a pending free [`Order`] counts as dangling rather
    /// than merely in flight.
    pub threshold: time::Duration,
}

/// [`Task`] completing free-of-charge [`Order`]s left dangling in the
/// pending status.
///
/// An order creation and its follow-up completion patch are two separate
/// calls, so a crash in between strands a free order in pending forever.
/// This sweep finds such orders and applies the completion they missed;
/// re-running it over an already completed order is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct ReconcileOrders<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, Ml> Task<Start<By<ReconcileOrders<Self>, Config>>>
    for Service<Db, Ml>
where
    ReconcileOrders<Service<Db, Ml>>:
        Task<Perform<()>, Ok = (), Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<ReconcileOrders<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = ReconcileOrders {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::ReconcileOrders` failed: {e}");
            });
        }
    }
}

impl<Db, Ml> Task<Perform<()>> for ReconcileOrders<Service<Db, Ml>>
where
    Db: Database<
            Select<By<Vec<Order>, read::order::DanglingFree>>,
            Ok = Vec<Order>,
            Err = Traced<database::Error>,
        > + Database<
            Patch<order::Complete>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let placed_before =
            order::CreationDateTime::now() - self.config.threshold;
        let dangling = self
            .service
            .database()
            .execute(Select(By::new(read::order::DanglingFree {
                placed_before,
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!())?;

        for order in dangling {
            log::info!("completing dangling free order `{}`", order.id);
            self.service
                .database()
                .execute(Patch(order::Complete { order: order.id }))
                .await
                .map_err(tracerr::map_from_and_wrap!())?;
        }

        Ok(())
    }
}

/// Error of [`ReconcileOrders`] execution.
pub type ExecutionError = Traced<database::Error>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{operations::Perform, DateTime, Money};
    use rust_decimal::Decimal;

    use crate::{
        domain::{order, reservation, user, Order},
        infra::database::mock::{service, Mock, MockMailer},
        Task as _,
    };

    use super::{Config, ReconcileOrders};

    fn order(price: i64, age: Duration) -> Order {
        Order {
            id: order::Id::new(),
            subject: order::Subject::Book(crate::domain::book::Id::new()),
            user: user::Id::new(),
            price: Money {
                amount: Decimal::from(price),
                currency: common::money::Currency::Usd,
            },
            status: reservation::Status::Pending,
            payment: reservation::PaymentStatus::Pending,
            created_at: (DateTime::now() - age).coerce(),
        }
    }

    #[tokio::test]
    async fn completes_only_stale_free_pending_orders() {
        let db = Mock::default();
        let stale_free = order(0, Duration::from_secs(600));
        let fresh_free = order(0, Duration::from_secs(1));
        let stale_priced = order(30, Duration::from_secs(600));
        let (stale_free_id, fresh_free_id, stale_priced_id) =
            (stale_free.id, fresh_free.id, stale_priced.id);
        db.with_store(|s| {
            for o in [stale_free, fresh_free, stale_priced] {
                drop(s.orders.insert(o.id, o));
            }
        })
        .await;

        let task = ReconcileOrders {
            config: Config {
                interval: Duration::from_secs(60),
                threshold: Duration::from_secs(300),
            },
            service: service(db.clone(), MockMailer::default()),
        };
        task.execute(Perform(())).await.unwrap();

        db.with_store(|s| {
            assert_eq!(
                s.orders[&stale_free_id].status,
                reservation::Status::Completed,
            );
            assert_eq!(
                s.orders[&stale_free_id].payment,
                reservation::PaymentStatus::Paid,
            );
            assert_eq!(
                s.orders[&fresh_free_id].status,
                reservation::Status::Pending,
            );
            assert_eq!(
                s.orders[&stale_priced_id].status,
                reservation::Status::Pending,
            );
        })
        .await;
    }
}
