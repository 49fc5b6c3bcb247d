//! Knowledge graph module: the in-memory statement set, the article ontology
//! and the materializer that fills one from a table of article records.

mod materialize;
pub mod vocab;

pub use materialize::{
    materialize, GraphBuilder, InvalidTopicPolicy, MaterializeOptions, MaterializeReport,
    Materialized,
};
pub use vocab::{Class, NodeId, Property, Vocabulary};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// A literal value with an optional datatype IRI or language tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

impl Literal {
    /// An `xsd:string` literal.
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            lexical: value.into(),
            datatype: Some(XSD_STRING.to_string()),
            language: None,
        }
    }
}

/// Object position of a statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    Iri(String),
    Literal(Literal),
}

impl Term {
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal(_) => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Literal(lit) => write!(f, "{:?}", lit.lexical),
        }
    }
}

/// A (subject, predicate, object) statement. Subjects and predicates are IRIs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(<{}>, <{}>, {})", self.subject, self.predicate, self.object)
    }
}

/// A set of statements. Iteration order is the sorted order of the triples,
/// so anything derived from a graph is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    triples: BTreeSet<Triple>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a statement; returns false if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// All statements using the given predicate.
    pub fn with_predicate<'a>(&'a self, predicate: &str) -> impl Iterator<Item = &'a Triple> + 'a {
        let predicate = predicate.to_owned();
        self.triples.iter().filter(move |t| t.predicate == predicate)
    }

    /// Objects of every `(subject, predicate, _)` statement.
    pub fn objects<'a>(
        &'a self,
        subject: &str,
        predicate: &str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        let (subject, predicate) = (subject.to_owned(), predicate.to_owned());
        self.triples
            .iter()
            .filter(move |t| t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Subjects declared `rdf:type` of the given class IRI.
    pub fn instances_of<'a>(&'a self, class: &str) -> impl Iterator<Item = &'a str> + 'a {
        let class = class.to_owned();
        self.triples
            .iter()
            .filter(move |t| t.predicate == RDF_TYPE && t.object.as_iri() == Some(class.as_str()))
            .map(|t| t.subject.as_str())
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::collections::btree_set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

/// A prefix bound to a base IRI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    prefix: String,
    base: String,
}

impl Namespace {
    pub fn new(prefix: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            base: base.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Mint an IRI for `local`. Bytes outside `[A-Za-z0-9_.~-]` are
    /// percent-encoded so identities built from free text stay valid IRIs.
    pub fn iri(&self, local: &str) -> String {
        let mut out = String::with_capacity(self.base.len() + local.len());
        out.push_str(&self.base);
        for byte in local.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'~' | b'-' => {
                    out.push(byte as char)
                }
                _ => out.push_str(&format!("%{:02X}", byte)),
            }
        }
        out
    }

    /// Local part of `iri` if it lives in this namespace.
    pub fn local_name<'a>(&self, iri: &'a str) -> Option<&'a str> {
        iri.strip_prefix(self.base.as_str())
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new("ex", "http://example.org/misinfo#")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_dedupes_statements() {
        let mut g = Graph::new();
        let t = Triple::new("http://x/a", RDF_TYPE, Term::Iri("http://x/C".into()));
        assert!(g.insert(t.clone()));
        assert!(!g.insert(t.clone()));
        assert_eq!(g.len(), 1);
        assert!(g.contains(&t));
    }

    #[test]
    fn test_namespace_iri_plain_local() {
        let ns = Namespace::default();
        assert_eq!(ns.iri("label_REAL"), "http://example.org/misinfo#label_REAL");
    }

    #[test]
    fn test_namespace_iri_percent_encodes() {
        let ns = Namespace::default();
        assert_eq!(
            ns.iri("subject_government news"),
            "http://example.org/misinfo#subject_government%20news"
        );
        assert_eq!(ns.iri("subject_é"), "http://example.org/misinfo#subject_%C3%A9");
    }

    #[test]
    fn test_namespace_local_name() {
        let ns = Namespace::default();
        assert_eq!(ns.local_name("http://example.org/misinfo#topic_3"), Some("topic_3"));
        assert_eq!(ns.local_name("http://other.org/#topic_3"), None);
    }

    #[test]
    fn test_instances_of() {
        let g: Graph = vec![
            Triple::new("http://x/a", RDF_TYPE, Term::Iri("http://x/C".into())),
            Triple::new("http://x/b", RDF_TYPE, Term::Iri("http://x/D".into())),
            Triple::new("http://x/a", "http://x/p", Term::Literal(Literal::string("v"))),
        ]
        .into_iter()
        .collect();
        let cs: Vec<_> = g.instances_of("http://x/C").collect();
        assert_eq!(cs, vec!["http://x/a"]);
        assert_eq!(g.with_predicate("http://x/p").count(), 1);
    }

    #[test]
    fn test_lookups_outlive_key_arguments() {
        let g: Graph = vec![
            Triple::new("http://x/a", "http://x/p", Term::Iri("http://x/b".into())),
            Triple::new("http://x/a", RDF_TYPE, Term::Iri("http://x/C".into())),
        ]
        .into_iter()
        .collect();
        let base = String::from("http://x/");
        let objects: Vec<_> = g.objects(&format!("{base}a"), &format!("{base}p")).collect();
        let instances: Vec<_> = g.instances_of(&format!("{base}C")).collect();
        let statements: Vec<_> = g.with_predicate(&format!("{base}p")).collect();
        assert_eq!(objects, vec![&Term::Iri("http://x/b".into())]);
        assert_eq!(instances, vec!["http://x/a"]);
        assert_eq!(statements.len(), 1);
    }
}
