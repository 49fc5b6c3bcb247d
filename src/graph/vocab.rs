//! The fixed article ontology: five classes, eight properties, and the
//! identity rules that turn row values into node IRIs.

use super::Namespace;

/// Node classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Article,
    TruthLabel,
    Subject,
    Topic,
    Entity,
}

impl Class {
    pub fn local_name(self) -> &'static str {
        match self {
            Class::Article => "Article",
            Class::TruthLabel => "TruthLabel",
            Class::Subject => "Subject",
            Class::Topic => "Topic",
            Class::Entity => "Entity",
        }
    }
}

/// Relations and attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    HasLabel,
    HasSubject,
    HasTopic,
    HasEntity,
    Title,
    TopicTerms,
    EntityName,
    EntityType,
}

impl Property {
    pub fn local_name(self) -> &'static str {
        match self {
            Property::HasLabel => "hasLabel",
            Property::HasSubject => "hasSubject",
            Property::HasTopic => "hasTopic",
            Property::HasEntity => "hasEntity",
            Property::Title => "title",
            Property::TopicTerms => "topicTerms",
            Property::EntityName => "entityName",
            Property::EntityType => "entityType",
        }
    }
}

/// Identity of a node. Two values that compare equal name the same node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeId {
    Article(usize),
    TruthLabel(String),
    Subject(String),
    Topic(i64),
    Entity { article: usize, ordinal: usize },
}

impl NodeId {
    /// TruthLabel keyed by the trimmed, upper-cased label.
    pub fn truth_label(raw: &str) -> Self {
        NodeId::TruthLabel(normalize_label(raw))
    }

    /// Subject keyed by the trimmed, lower-cased subject.
    pub fn subject(raw: &str) -> Self {
        NodeId::Subject(normalize_subject(raw))
    }

    pub fn class(&self) -> Class {
        match self {
            NodeId::Article(_) => Class::Article,
            NodeId::TruthLabel(_) => Class::TruthLabel,
            NodeId::Subject(_) => Class::Subject,
            NodeId::Topic(_) => Class::Topic,
            NodeId::Entity { .. } => Class::Entity,
        }
    }

    /// Local part of the node's IRI, before percent-encoding.
    pub fn local_name(&self) -> String {
        match self {
            NodeId::Article(idx) => format!("article_{}", idx),
            NodeId::TruthLabel(key) => format!("label_{}", key),
            NodeId::Subject(key) => format!("subject_{}", key),
            NodeId::Topic(id) => format!("topic_{}", id),
            NodeId::Entity { article, ordinal } => format!("article_{}_entity_{}", article, ordinal),
        }
    }
}

pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_uppercase()
}

pub fn normalize_subject(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// The ontology bound to a namespace.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    ns: Namespace,
}

impl Vocabulary {
    pub fn new(ns: Namespace) -> Self {
        Self { ns }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.ns
    }

    pub fn class(&self, class: Class) -> String {
        self.ns.iri(class.local_name())
    }

    pub fn property(&self, property: Property) -> String {
        self.ns.iri(property.local_name())
    }

    pub fn node(&self, id: &NodeId) -> String {
        self.ns.iri(&id.local_name())
    }
}
