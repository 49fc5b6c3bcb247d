//! Graph views: predicate-filtered slices of the knowledge graph, shaped as
//! node/edge networks for the vis-network browser library.

mod html;

pub use html::render_page;

use serde::Serialize;
use std::collections::HashSet;

use crate::graph::{Graph, Property, Term, Triple, Vocabulary};

/// Which statements a view keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewFilter {
    Predicate(Property),
    /// Everything whose object is a node rather than a literal.
    NonLiteralObjects,
}

#[derive(Debug, Clone, Copy)]
pub struct ViewSpec {
    pub title: &'static str,
    pub filter: ViewFilter,
    pub color: &'static str,
}

/// The standard page: one view per article relation, then the whole graph.
pub const STANDARD_VIEWS: [ViewSpec; 5] = [
    ViewSpec {
        title: "Articles and their Labels",
        filter: ViewFilter::Predicate(Property::HasLabel),
        color: "#97C2FC",
    },
    ViewSpec {
        title: "Articles and their Subjects",
        filter: ViewFilter::Predicate(Property::HasSubject),
        color: "#FFA07A",
    },
    ViewSpec {
        title: "Articles and their Topics",
        filter: ViewFilter::Predicate(Property::HasTopic),
        color: "#90EE90",
    },
    ViewSpec {
        title: "Articles and their Entities",
        filter: ViewFilter::Predicate(Property::HasEntity),
        color: "#DA70D6",
    },
    ViewSpec {
        title: "Full Knowledge Graph",
        filter: ViewFilter::NonLiteralObjects,
        color: "#FFB347",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisNode {
    pub id: String,
    pub label: String,
    pub title: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisEdge {
    pub from: String,
    pub to: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Network {
    pub nodes: Vec<VisNode>,
    pub edges: Vec<VisEdge>,
}

#[derive(Debug, Clone)]
pub struct GraphView {
    pub title: String,
    pub network: Network,
}

/// Display label for a term: the IRI fragment after `#`, or the literal text.
pub fn label_node(term: &Term) -> String {
    match term {
        Term::Iri(iri) => iri_label(iri).to_string(),
        Term::Literal(lit) => lit.lexical.clone(),
    }
}

fn iri_label(iri: &str) -> &str {
    iri.rsplit('#').next().unwrap_or(iri)
}

fn node_id(term: &Term) -> String {
    match term {
        Term::Iri(iri) => iri.clone(),
        Term::Literal(lit) => lit.lexical.clone(),
    }
}

/// Turn statements into a network. Each node is added once, in first-seen order.
pub fn build_network<'a>(triples: impl IntoIterator<Item = &'a Triple>, color: &str) -> Network {
    let mut network = Network::default();
    let mut seen = HashSet::new();

    for triple in triples {
        let subject = Term::Iri(triple.subject.clone());
        for term in [&subject, &triple.object] {
            let id = node_id(term);
            if seen.insert(id.clone()) {
                network.nodes.push(VisNode {
                    label: label_node(term),
                    title: id.clone(),
                    id,
                    color: color.to_string(),
                });
            }
        }

        network.edges.push(VisEdge {
            from: triple.subject.clone(),
            to: node_id(&triple.object),
            title: iri_label(&triple.predicate).to_string(),
        });
    }

    network
}

/// Apply one view spec to a graph.
pub fn build_view(graph: &Graph, vocab: &Vocabulary, spec: &ViewSpec) -> GraphView {
    let network = match spec.filter {
        ViewFilter::Predicate(property) => {
            let predicate = vocab.property(property);
            build_network(graph.with_predicate(&predicate), spec.color)
        }
        ViewFilter::NonLiteralObjects => {
            build_network(graph.iter().filter(|t| !t.object.is_literal()), spec.color)
        }
    };
    log::debug!(
        "View '{}': {} nodes, {} edges",
        spec.title,
        network.nodes.len(),
        network.edges.len()
    );
    GraphView {
        title: spec.title.to_string(),
        network,
    }
}

/// All standard views, in page order.
pub fn build_views(graph: &Graph, vocab: &Vocabulary) -> Vec<GraphView> {
    STANDARD_VIEWS
        .iter()
        .map(|spec| build_view(graph, vocab, spec))
        .collect()
}
