//! Reference-sweep [`Database`] implementations.
//!
//! [`Database`]: crate::infra::Database

use common::operations::{By, Patch, Select};
use serde::Deserialize;
use tracerr::Traced;

use crate::{
    domain::{provider, refs},
    infra::{
        database::{
            self,
            content_lake::{patch, ContentLake, Query},
        },
        Database,
    },
};

use super::docs;

/// Select of every remaining document referencing a provider, expanded into
/// one [`refs::Inbound`] per known reference field of the document's type.
impl Database<Select<By<Vec<refs::Inbound>, provider::Id>>> for ContentLake {
    type Ok = Vec<refs::Inbound>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<refs::Inbound>, provider::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let provider = by.into_inner();

        /// Row of the sweep query.
        #[derive(Deserialize)]
        struct Row {
            /// ID of the referencing document.
            document: String,

            /// Type tag of the referencing document.
            #[serde(rename = "type")]
            doc_type: String,
        }

        // `references()` walks every document type at once; the reference
        // graph table maps each hit back to its candidate field paths.
        let rows = docs::<Row>(
            self.fetch(
                Query::new_untyped(
                    "*[references($provider)]\
                     {\"document\": _id, \"type\": _type}",
                )
                .bind("provider", provider),
            )
            .await
            .map_err(tracerr::wrap!())?,
        )?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                refs::DocType::from_tag(&row.doc_type).map(|ty| (row, ty))
            })
            .flat_map(|(row, ty)| {
                refs::sweep_fields(ty)
                    .map(move |field| refs::Inbound {
                        document: row.document.clone(),
                        field: field.to_owned(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect())
    }
}

impl Database<Patch<refs::Strip>> for ContentLake {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Patch(op): Patch<refs::Strip>,
    ) -> Result<Self::Ok, Self::Err> {
        let refs::Strip { document, field } = op;
        self.mutate(vec![patch::Patch::new(document)
            .unset(field)
            .into_mutation()])
        .await
        .map_err(tracerr::wrap!())
    }
}
