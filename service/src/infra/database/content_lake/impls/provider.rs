//! [`Provider`]-related [`Database`] implementations.
//!
//! [`Database`]: crate::infra::Database

use common::{
    operations::{By, Delete, Patch, Select},
    Bilingual,
};
use serde::Deserialize;
use tracerr::Traced;

use crate::{
    domain::{join_request, listing, provider, user, Provider},
    infra::{
        database::{
            self,
            content_lake::{patch, ContentLake, Query},
        },
        Database,
    },
    read,
};

use super::docs;

/// Projection of a [`Provider`] document.
const PROJECTION: &str = "{\
    \"id\": _id, \
    \"createdAt\": _createdAt, \
    name, \
    \"userRef\": userRef._ref, \
    \"mainServiceRef\": mainServiceRef._ref, \
    \"servicesRef\": servicesRef[]._ref, \
    \"pendingRequests\": pendingRequests[]._ref}";

/// [`Provider`] document as the content lake returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Doc {
    /// ID of the document.
    id: provider::Id,

    /// Creation instant of the document.
    #[serde(with = "common::datetime::serde::rfc3339")]
    created_at: provider::CreationDateTime,

    /// Bilingual name.
    #[serde(default)]
    name: Bilingual,

    /// Owning user reference.
    user_ref: user::Id,

    /// Main service reference, if any.
    main_service_ref: Option<listing::Id>,

    /// Additional service references.
    #[serde(default)]
    services_ref: Vec<listing::Id>,

    /// Pending join request references.
    #[serde(default)]
    pending_requests: Vec<join_request::Id>,
}

impl From<Doc> for Provider {
    fn from(doc: Doc) -> Self {
        let Doc {
            id,
            created_at,
            name,
            user_ref,
            main_service_ref,
            services_ref,
            pending_requests,
        } = doc;

        Self {
            id,
            name,
            user: user_ref,
            main_service: main_service_ref,
            services: services_ref,
            pending_requests,
            created_at,
        }
    }
}

impl ContentLake {
    /// Fetches [`Provider`]s matching the provided query.
    async fn providers(
        &self,
        query: Query,
    ) -> Result<Vec<Provider>, Traced<database::Error>> {
        Ok(docs::<Doc>(self.fetch(query).await.map_err(tracerr::wrap!())?)?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

impl Database<Select<By<Option<Provider>, provider::Id>>> for ContentLake {
    type Ok = Option<Provider>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Provider>, provider::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .providers(
                Query::new("provider", PROJECTION)
                    .clause("_id == $id")
                    .bind("id", id),
            )
            .await
            .map_err(tracerr::wrap!())?
            .pop())
    }
}

impl Database<Select<By<Option<Provider>, user::Id>>> for ContentLake {
    type Ok = Option<Provider>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Provider>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user = by.into_inner();
        Ok(self
            .providers(
                Query::new("provider", PROJECTION)
                    .clause("userRef._ref == $user")
                    .bind("user", user),
            )
            .await
            .map_err(tracerr::wrap!())?
            .pop())
    }
}

impl Database<Select<By<Vec<Provider>, read::provider::ForeignReferrers>>>
    for ContentLake
{
    type Ok = Vec<Provider>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Provider>, read::provider::ForeignReferrers>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::provider::ForeignReferrers {
            provider,
            services,
            requests,
        } = by.into_inner();

        self.providers(
            Query::new("provider", PROJECTION)
                .clause("_id != $provider")
                .bind("provider", provider)
                .clause(
                    "(mainServiceRef._ref in $services \
                     || count(servicesRef[@._ref in $services]) > 0 \
                     || count(pendingRequests[@._ref in $requests]) > 0)",
                )
                .bind("services", services)
                .bind("requests", requests),
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Patch<provider::SetMainService>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<provider::SetMainService>,
    ) -> Result<Self::Ok, Self::Err> {
        let provider::SetMainService { provider, listing } = op;
        self.mutate(vec![patch::Patch::new(provider)
            .set("mainServiceRef", serde_json::json!({ "_ref": listing }))
            .into_mutation()])
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Patch<provider::AddService>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<provider::AddService>,
    ) -> Result<Self::Ok, Self::Err> {
        let provider::AddService { provider, listing } = op;
        self.mutate(vec![patch::Patch::new(provider)
            .set_if_missing("servicesRef", serde_json::json!([]))
            .append(
                "servicesRef",
                [serde_json::json!({ "_key": listing, "_ref": listing })],
            )
            .into_mutation()])
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Patch<provider::DetachService>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<provider::DetachService>,
    ) -> Result<Self::Ok, Self::Err> {
        let provider::DetachService {
            provider,
            listing,
            is_main,
        } = op;

        let mut patch = patch::Patch::new(provider)
            .unset(format!("servicesRef[_ref==\"{listing}\"]"));
        if is_main {
            patch = patch.unset("mainServiceRef");
        }
        self.mutate(vec![patch.into_mutation()])
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Database<Patch<provider::StripForeignRefs>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<provider::StripForeignRefs>,
    ) -> Result<Self::Ok, Self::Err> {
        let provider::StripForeignRefs {
            provider,
            unset_main,
            services,
            requests,
        } = op;

        let mut patch = patch::Patch::new(provider);
        if unset_main {
            patch = patch.unset("mainServiceRef");
        }
        for service in services {
            patch =
                patch.unset(format!("servicesRef[_ref==\"{service}\"]"));
        }
        for request in requests {
            patch =
                patch.unset(format!("pendingRequests[_ref==\"{request}\"]"));
        }
        self.mutate(vec![patch.into_mutation()])
            .await
            .map_err(tracerr::wrap!())
    }
}

impl Database<Delete<provider::Id>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(id): Delete<provider::Id>,
    ) -> Result<Self::Ok, Self::Err> {
        self.delete(id).await.map_err(tracerr::wrap!())
    }
}
