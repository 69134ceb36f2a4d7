//! [`Patch`] builder definitions.

use serde::Serialize;
use serde_json::{Map, Value};

/// Patch of a single document, committed as one mutation.
///
/// Collects `set` / `unset` / `setIfMissing` / `append` operations and
/// renders them into the store's patch mutation shape. The whole patch is
/// applied atomically by the store.
#[derive(Clone, Debug)]
pub struct Patch {
    /// ID of the patched document.
    id: String,

    /// Fields to set.
    set: Map<String, Value>,

    /// Field paths to unset.
    unset: Vec<String>,

    /// Fields to set only when missing.
    set_if_missing: Map<String, Value>,

    /// Items to append to an array field.
    append: Option<(String, Vec<Value>)>,
}

impl Patch {
    /// Creates a new empty [`Patch`] of the document with the provided ID.
    #[must_use]
    pub fn new(id: impl ToString) -> Self {
        Self {
            id: id.to_string(),
            set: Map::new(),
            unset: Vec::new(),
            set_if_missing: Map::new(),
            append: None,
        }
    }

    /// Sets the field at `path` to the provided value.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn set(mut self, path: &str, value: impl Serialize) -> Self {
        drop(self.set.insert(
            path.to_owned(),
            serde_json::to_value(value).expect("JSON-representable value"),
        ));
        self
    }

    /// Unsets the field at `path`.
    #[must_use]
    pub fn unset(mut self, path: impl Into<String>) -> Self {
        self.unset.push(path.into());
        self
    }

    /// Sets the field at `path` to the provided value only when it's
    /// missing.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn set_if_missing(
        mut self,
        path: &str,
        value: impl Serialize,
    ) -> Self {
        drop(self.set_if_missing.insert(
            path.to_owned(),
            serde_json::to_value(value).expect("JSON-representable value"),
        ));
        self
    }

    /// Appends the provided items to the array field at `path`.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn append(
        mut self,
        path: &str,
        items: impl IntoIterator<Item = impl Serialize>,
    ) -> Self {
        let items = items
            .into_iter()
            .map(|i| {
                serde_json::to_value(i).expect("JSON-representable value")
            })
            .collect();
        self.append = Some((path.to_owned(), items));
        self
    }

    /// Renders this [`Patch`] into a mutation payload.
    #[must_use]
    pub fn into_mutation(self) -> Value {
        let Self {
            id,
            set,
            unset,
            set_if_missing,
            append,
        } = self;

        let mut patch = Map::new();
        drop(patch.insert("id".to_owned(), Value::String(id)));
        if !set.is_empty() {
            drop(patch.insert("set".to_owned(), Value::Object(set)));
        }
        if !unset.is_empty() {
            drop(patch.insert(
                "unset".to_owned(),
                Value::Array(unset.into_iter().map(Value::String).collect()),
            ));
        }
        if !set_if_missing.is_empty() {
            drop(patch.insert(
                "setIfMissing".to_owned(),
                Value::Object(set_if_missing),
            ));
        }
        if let Some((path, items)) = append {
            drop(patch.insert(
                "insert".to_owned(),
                serde_json::json!({
                    "after": format!("{path}[-1]"),
                    "items": items,
                }),
            ));
        }

        serde_json::json!({ "patch": Value::Object(patch) })
    }
}

#[cfg(test)]
mod spec {
    use super::Patch;

    #[test]
    fn renders_all_operations() {
        let mutation = Patch::new("doc-1")
            .set("status", "completed")
            .unset("providerRef")
            .set_if_missing("paymentStatus", "pending")
            .append("wishlist.services", ["svc-1"])
            .into_mutation();

        let patch = &mutation["patch"];
        assert_eq!(patch["id"], "doc-1");
        assert_eq!(patch["set"]["status"], "completed");
        assert_eq!(patch["unset"][0], "providerRef");
        assert_eq!(patch["setIfMissing"]["paymentStatus"], "pending");
        assert_eq!(patch["insert"]["after"], "wishlist.services[-1]");
        assert_eq!(patch["insert"]["items"][0], "svc-1");
    }
}
