//! [`Query`] builder definitions.

use serde::Serialize;
use serde_json::{Map, Value};

/// Parameterized query against the content lake.
///
/// A query selects one document type, narrows it with a conjunction of
/// filter clauses and projects the wanted fields. Untrusted values never
/// reach the query body: clauses reference `$name` placeholders resolved
/// through the parameter map at evaluation time.
#[derive(Clone, Debug)]
pub struct Query {
    /// Raw query body bypassing the builder, for the rare cross-type query.
    raw: Option<&'static str>,

    /// Document type the query selects.
    doc_type: &'static str,

    /// Conjunction of filter clauses.
    clauses: Vec<String>,

    /// Projection of the selected documents.
    projection: &'static str,

    /// Ordering clause, if any.
    order: Option<&'static str>,

    /// Maximal number of documents to return, if bounded.
    limit: Option<usize>,

    /// Parameter map resolving `$name` placeholders.
    params: Map<String, Value>,
}

impl Query {
    /// Creates a new [`Query`] selecting the provided document type with the
    /// provided projection.
    #[must_use]
    pub fn new(doc_type: &'static str, projection: &'static str) -> Self {
        Self {
            raw: None,
            doc_type,
            clauses: Vec::new(),
            projection,
            order: None,
            limit: None,
            params: Map::new(),
        }
    }

    /// Creates a new [`Query`] from a raw body not scoped to a single
    /// document type.
    ///
    /// The body is a compile-time literal; untrusted values still go
    /// through [`Query::bind()`] only.
    #[must_use]
    pub fn new_untyped(body: &'static str) -> Self {
        Self {
            raw: Some(body),
            doc_type: "",
            clauses: Vec::new(),
            projection: "",
            order: None,
            limit: None,
            params: Map::new(),
        }
    }

    /// Appends a filter clause to the conjunction.
    ///
    /// The clause must reference untrusted values via `$name` placeholders
    /// only.
    #[must_use]
    pub fn clause(mut self, clause: impl Into<String>) -> Self {
        self.clauses.push(clause.into());
        self
    }

    /// Binds a `$name` placeholder to the provided value.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn bind(mut self, name: &str, value: impl Serialize) -> Self {
        drop(self.params.insert(
            name.to_owned(),
            serde_json::to_value(value).expect("JSON-representable value"),
        ));
        self
    }

    /// Sets the ordering clause of this [`Query`].
    #[must_use]
    pub fn order(mut self, order: &'static str) -> Self {
        self.order = Some(order);
        self
    }

    /// Bounds the number of returned documents.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Builds the query body and its parameter map.
    #[must_use]
    pub fn build(self) -> (String, Map<String, Value>) {
        let Self {
            raw,
            doc_type,
            clauses,
            projection,
            order,
            limit,
            params,
        } = self;

        if let Some(raw) = raw {
            return (raw.to_owned(), params);
        }

        let mut body = format!("*[_type == \"{doc_type}\"");
        for clause in clauses {
            body.push_str(" && ");
            body.push_str(&clause);
        }
        body.push(']');
        body.push_str(projection);
        if let Some(order) = order {
            body.push_str(" | order(");
            body.push_str(order);
            body.push(')');
        }
        if let Some(limit) = limit {
            body.push_str(&format!(" [0...{limit}]"));
        }

        (body, params)
    }
}

#[cfg(test)]
mod spec {
    use super::Query;

    #[test]
    fn builds_conjunction_with_placeholders() {
        let (body, params) = Query::new("serviceListing", "{...}")
            .clause("kind == $kind")
            .bind("kind", "stable")
            .clause("name.en match $term")
            .bind("term", "sunrise*")
            .order("_createdAt desc")
            .build();

        assert_eq!(
            body,
            "*[_type == \"serviceListing\" && kind == $kind \
             && name.en match $term]{...} | order(_createdAt desc)",
        );
        assert_eq!(params["kind"], "stable");
        assert_eq!(params["term"], "sunrise*");
    }

    #[test]
    fn untrusted_text_never_lands_in_the_body() {
        let hostile = "\"] | *[_type == \"user";
        let (body, params) = Query::new("serviceListing", "{_id}")
            .clause("name.en match $term")
            .bind("term", hostile)
            .build();

        assert!(!body.contains(hostile));
        assert_eq!(params["term"], hostile);
    }
}
