//! [`User`]-related [`Database`] implementations.
//!
//! [`Database`]: crate::infra::Database

use common::operations::{By, Create, Patch, Select};
use serde::Deserialize;
use tracerr::Traced;

use crate::{
    domain::{listing, provider, user, User},
    infra::{
        database::{
            self,
            content_lake::{patch, ContentLake, Query},
        },
        Database,
    },
};

use super::{docs, invalid};

/// Projection of a [`User`] document.
const PROJECTION: &str = "{\
    \"id\": _id, \
    \"createdAt\": _createdAt, \
    name, email, phone, passwordHash, kind, \
    \"provider\": provider._ref, \
    \"wishlistServices\": wishlist.services[]._ref, \
    \"wishlistStables\": wishlist.stables[]._ref}";

/// [`User`] document as the content lake returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Doc {
    /// ID of the document.
    id: user::Id,

    /// Creation instant of the document.
    #[serde(with = "common::datetime::serde::rfc3339")]
    created_at: user::CreationDateTime,

    /// Name of the user.
    name: String,

    /// Email of the user.
    email: String,

    /// Phone of the user.
    phone: Option<String>,

    /// Stored password hash.
    password_hash: String,

    /// Kind tag of the user.
    kind: user::Kind,

    /// Provider reference, if any.
    provider: Option<provider::Id>,

    /// Wishlisted service references.
    #[serde(default)]
    wishlist_services: Vec<listing::Id>,

    /// Wishlisted stable references.
    #[serde(default)]
    wishlist_stables: Vec<listing::Id>,
}

impl TryFrom<Doc> for User {
    type Error = &'static str;

    fn try_from(doc: Doc) -> Result<Self, Self::Error> {
        let Doc {
            id,
            created_at,
            name,
            email,
            phone,
            password_hash,
            kind,
            provider,
            wishlist_services,
            wishlist_stables,
        } = doc;

        Ok(Self {
            id,
            name: user::Name::new(name).ok_or("invalid `user.name`")?,
            email: user::Email::new(email).ok_or("invalid `user.email`")?,
            phone: phone
                .map(|p| user::Phone::new(p).ok_or("invalid `user.phone`"))
                .transpose()?,
            password_hash: user::PasswordHash::from_stored(password_hash),
            kind,
            provider,
            wishlist: user::Wishlist {
                services: wishlist_services,
                stables: wishlist_stables,
            },
            created_at,
        })
    }
}

impl ContentLake {
    /// Fetches [`User`]s matching the provided clause.
    async fn users(
        &self,
        query: Query,
    ) -> Result<Vec<User>, Traced<database::Error>> {
        docs::<Doc>(self.fetch(query).await.map_err(tracerr::wrap!())?)?
            .into_iter()
            .map(|d| User::try_from(d).map_err(invalid))
            .collect()
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for ContentLake {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .users(
                Query::new("user", PROJECTION)
                    .clause("_id == $id")
                    .bind("id", id),
            )
            .await
            .map_err(tracerr::wrap!())?
            .pop())
    }
}

impl<'l> Database<Select<By<Option<User>, &'l user::Email>>> for ContentLake {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'l user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        let email: &str = email.as_ref();
        Ok(self
            .users(
                Query::new("user", PROJECTION)
                    .clause("email == $email")
                    .bind("email", email),
            )
            .await
            .map_err(tracerr::wrap!())?
            .pop())
    }
}

impl Database<Select<By<Vec<User>, provider::Id>>> for ContentLake {
    type Ok = Vec<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<User>, provider::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let provider = by.into_inner();
        self.users(
            Query::new("user", PROJECTION)
                .clause("provider._ref == $provider")
                .bind("provider", provider),
        )
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Create<User>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Create(user): Create<User>,
    ) -> Result<Self::Ok, Self::Err> {
        let User {
            id,
            name,
            email,
            phone,
            password_hash,
            kind,
            provider,
            wishlist,
            created_at,
        } = user;

        self.create(serde_json::json!({
            "_id": id,
            "_type": "user",
            "_createdAt": created_at.to_rfc3339(),
            "name": name.to_string(),
            "email": email.to_string(),
            "phone": phone.map(|p| p.to_string()),
            "passwordHash": password_hash.to_string(),
            "kind": kind,
            "provider": provider.map(|p| serde_json::json!({ "_ref": p })),
            "wishlist": {
                "services": wishlist
                    .services
                    .iter()
                    .map(|s| serde_json::json!({ "_key": s, "_ref": s }))
                    .collect::<Vec<_>>(),
                "stables": wishlist
                    .stables
                    .iter()
                    .map(|s| serde_json::json!({ "_key": s, "_ref": s }))
                    .collect::<Vec<_>>(),
            },
        }))
        .await
        .map_err(tracerr::wrap!())
    }
}

/// Returns the document path of the provided [`Wishlist`] collection.
///
/// [`Wishlist`]: user::Wishlist
fn collection_path(collection: user::Collection) -> &'static str {
    match collection {
        user::Collection::Services => "wishlist.services",
        user::Collection::Stables => "wishlist.stables",
    }
}

impl Database<Patch<user::WishlistAdd>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<user::WishlistAdd>,
    ) -> Result<Self::Ok, Self::Err> {
        let user::WishlistAdd {
            user,
            collection,
            item,
        } = op;

        let path = collection_path(collection);
        // The item ID doubles as the array key, keeping the append
        // idempotent on the store side.
        self.mutate(vec![patch::Patch::new(user)
            .set_if_missing(path, serde_json::json!([]))
            .append(
                path,
                [serde_json::json!({ "_key": item, "_ref": item })],
            )
            .into_mutation()])
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Patch<user::WishlistRemove>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<user::WishlistRemove>,
    ) -> Result<Self::Ok, Self::Err> {
        let user::WishlistRemove {
            user,
            collection,
            item,
        } = op;

        let path = collection_path(collection);
        self.mutate(vec![patch::Patch::new(user)
            .unset(format!("{path}[_key==\"{item}\"]"))
            .into_mutation()])
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Patch<user::PasswordChange>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<user::PasswordChange>,
    ) -> Result<Self::Ok, Self::Err> {
        let user::PasswordChange { user, hash } = op;
        self.mutate(vec![patch::Patch::new(user)
            .set("passwordHash", hash.to_string())
            .into_mutation()])
        .await
        .map_err(tracerr::wrap!())
    }
}

impl Database<Patch<user::DetachProvider>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<user::DetachProvider>,
    ) -> Result<Self::Ok, Self::Err> {
        let user::DetachProvider { user } = op;
        self.mutate(vec![patch::Patch::new(user)
            .unset("provider")
            .into_mutation()])
        .await
        .map_err(tracerr::wrap!())
    }
}
