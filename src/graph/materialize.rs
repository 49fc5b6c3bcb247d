//! Article table → knowledge graph.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::vocab::{normalize_label, normalize_subject};
use super::{Graph, Literal, Namespace, NodeId, Property, Term, Triple, Vocabulary, RDF_TYPE};
use crate::error::{KgError, Result};
use crate::ingest::{parse_entities, ArticleRecord, EntityParse, TopicField};

/// Handling of a dominant_topic cell that is present but not numeric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidTopicPolicy {
    /// Treat like a missing topic: no hasTopic edge.
    #[default]
    Skip,
    /// Abort the run with `KgError::InvalidTopic`.
    Fail,
}

#[derive(Debug, Clone, Default)]
pub struct MaterializeOptions {
    pub namespace: Namespace,
    pub invalid_topic: InvalidTopicPolicy,
}

/// Counts gathered while materializing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterializeReport {
    pub articles: usize,
    pub labels: usize,
    pub subjects: usize,
    pub topic_edges: usize,
    pub entities: usize,
    pub skipped_entities: usize,
    pub skipped_topics: usize,
    pub statements: usize,
}

/// A finished graph together with the namespace its identifiers live in.
#[derive(Debug, Clone)]
pub struct Materialized {
    pub graph: Graph,
    pub namespace: Namespace,
    pub report: MaterializeReport,
}

/// Accumulates the statements for a sequence of article rows.
///
/// Owned by a single materialization; `finish` hands the graph back by value.
pub struct GraphBuilder {
    vocab: Vocabulary,
    invalid_topic: InvalidTopicPolicy,
    graph: Graph,
    labels: BTreeSet<String>,
    subjects: BTreeSet<String>,
    report: MaterializeReport,
}

impl GraphBuilder {
    pub fn new(options: &MaterializeOptions) -> Self {
        Self {
            vocab: Vocabulary::new(options.namespace.clone()),
            invalid_topic: options.invalid_topic,
            graph: Graph::new(),
            labels: BTreeSet::new(),
            subjects: BTreeSet::new(),
            report: MaterializeReport::default(),
        }
    }

    /// Add the statements for one row. `ordinal` is the row's 0-based position.
    ///
    /// Row-level validation happens before anything is emitted, so a failing
    /// row leaves the builder untouched.
    pub fn add_article(&mut self, ordinal: usize, record: &ArticleRecord) -> Result<()> {
        let label = match record.label.as_deref() {
            Some(raw) => normalize_label(raw),
            None => return Err(KgError::EmptyField { row: ordinal, field: "label" }),
        };
        let subject = match record.subject.as_deref() {
            Some(raw) => normalize_subject(raw),
            None => return Err(KgError::EmptyField { row: ordinal, field: "subject" }),
        };

        let topic = match record.topic() {
            TopicField::Id(id) => Some(id),
            TopicField::Absent => None,
            TopicField::Invalid(value) => match self.invalid_topic {
                InvalidTopicPolicy::Fail => {
                    return Err(KgError::InvalidTopic { row: ordinal, value });
                }
                InvalidTopicPolicy::Skip => {
                    log::warn!("Row {}: ignoring non-numeric dominant_topic '{}'", ordinal, value);
                    self.report.skipped_topics += 1;
                    None
                }
            },
        };

        let article = NodeId::Article(ordinal);
        self.declare(&article);
        self.attribute(&article, Property::Title, &record.title);
        self.attribute(&article, Property::TopicTerms, &record.topic_terms);

        self.link(&article, Property::HasLabel, &NodeId::TruthLabel(label.clone()));
        self.labels.insert(label);

        self.link(&article, Property::HasSubject, &NodeId::Subject(subject.clone()));
        self.subjects.insert(subject);

        if let Some(id) = topic {
            self.link(&article, Property::HasTopic, &NodeId::Topic(id));
            self.report.topic_edges += 1;
        }

        if let Some(raw) = record.entities_str.as_deref() {
            self.add_entities(ordinal, &article, raw);
        }

        self.report.articles += 1;
        Ok(())
    }

    fn add_entities(&mut self, ordinal: usize, article: &NodeId, raw: &str) {
        for parse in parse_entities(raw) {
            match parse {
                EntityParse::Parsed(mention) => {
                    let entity = NodeId::Entity { article: ordinal, ordinal: mention.ordinal };
                    self.declare(&entity);
                    self.attribute(&entity, Property::EntityName, &mention.name);
                    self.attribute(&entity, Property::EntityType, &mention.entity_type);
                    self.link(article, Property::HasEntity, &entity);
                    self.report.entities += 1;
                }
                EntityParse::Skipped { raw, reason } => {
                    log::debug!("Row {}: skipping entity '{}' ({:?})", ordinal, raw, reason);
                    self.report.skipped_entities += 1;
                }
            }
        }
    }

    /// `rdf:type` statement for a node.
    fn declare(&mut self, node: &NodeId) {
        let subject = self.vocab.node(node);
        let class = self.vocab.class(node.class());
        self.graph.insert(Triple::new(subject, RDF_TYPE, Term::Iri(class)));
    }

    /// Edge from `from` to `to`, plus the target's type declaration.
    fn link(&mut self, from: &NodeId, property: Property, to: &NodeId) {
        self.graph.insert(Triple::new(
            self.vocab.node(from),
            self.vocab.property(property),
            Term::Iri(self.vocab.node(to)),
        ));
        self.declare(to);
    }

    fn attribute(&mut self, node: &NodeId, property: Property, value: &str) {
        self.graph.insert(Triple::new(
            self.vocab.node(node),
            self.vocab.property(property),
            Term::Literal(Literal::string(value)),
        ));
    }

    pub fn finish(self) -> Materialized {
        let mut report = self.report;
        report.labels = self.labels.len();
        report.subjects = self.subjects.len();
        report.statements = self.graph.len();
        Materialized {
            graph: self.graph,
            namespace: self.vocab.namespace().clone(),
            report,
        }
    }
}

/// Materialize every row in table order.
pub fn materialize(records: &[ArticleRecord], options: &MaterializeOptions) -> Result<Materialized> {
    let mut builder = GraphBuilder::new(options);
    for (ordinal, record) in records.iter().enumerate() {
        builder.add_article(ordinal, record)?;
    }
    let materialized = builder.finish();
    log::info!(
        "Materialized {} articles into {} statements ({} entities, {} skipped)",
        materialized.report.articles,
        materialized.report.statements,
        materialized.report.entities,
        materialized.report.skipped_entities,
    );
    Ok(materialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: &str, subject: &str, topic: Option<&str>, entities: Option<&str>) -> ArticleRecord {
        ArticleRecord {
            title: format!("{} story", label),
            subject: Some(subject.to_string()),
            label: Some(label.to_string()),
            dominant_topic: topic.map(str::to_string),
            topic_terms: "trump said president".to_string(),
            entities_str: entities.map(str::to_string),
        }
    }

    fn ex(local: &str) -> String {
        Namespace::default().iri(local)
    }

    fn run(records: &[ArticleRecord]) -> Materialized {
        materialize(records, &MaterializeOptions::default()).unwrap()
    }

    #[test]
    fn test_one_label_and_subject_edge_per_article() {
        let records = vec![
            record("real", "politicsNews", Some("1"), None),
            record("fake", "News", None, None),
            record("Real", "politicsnews", Some("1"), None),
        ];
        let m = run(&records);
        for idx in 0..records.len() {
            let article = ex(&format!("article_{}", idx));
            assert_eq!(m.graph.objects(&article, &ex("hasLabel")).count(), 1);
            assert_eq!(m.graph.objects(&article, &ex("hasSubject")).count(), 1);
        }
        assert_eq!(m.report.articles, 3);
    }

    #[test]
    fn test_label_and_subject_nodes_deduplicated() {
        let m = run(&[
            record("Real", "Politics", None, None),
            record("REAL ", "politics", None, None),
        ]);
        let labels: Vec<_> = m.graph.instances_of(&ex("TruthLabel")).collect();
        assert_eq!(labels, vec![ex("label_REAL").as_str()]);
        let subjects: Vec<_> = m.graph.instances_of(&ex("Subject")).collect();
        assert_eq!(subjects, vec![ex("subject_politics").as_str()]);
        assert_eq!(m.report.labels, 1);
        assert_eq!(m.report.subjects, 1);
    }

    #[test]
    fn test_topic_edges() {
        let m = run(&[
            record("real", "s", None, None),
            record("real", "s", Some("3"), None),
            record("fake", "s", Some("3.0"), None),
        ]);
        assert_eq!(m.graph.objects(&ex("article_0"), &ex("hasTopic")).count(), 0);
        let topics: Vec<_> = m.graph.objects(&ex("article_1"), &ex("hasTopic")).collect();
        assert_eq!(topics, vec![&Term::Iri(ex("topic_3"))]);
        // Same id merges into one Topic node
        assert_eq!(m.graph.instances_of(&ex("Topic")).count(), 1);
        assert_eq!(m.report.topic_edges, 2);
    }

    #[test]
    fn test_entities_with_malformed_substring() {
        let m = run(&[record(
            "real",
            "s",
            None,
            Some("Jane Doe(PERSON); Acme Corp(ORG); malformed_no_parens"),
        )]);
        let article = ex("article_0");
        assert_eq!(m.graph.objects(&article, &ex("hasEntity")).count(), 2);
        assert_eq!(m.graph.instances_of(&ex("Entity")).count(), 2);
        let names: Vec<_> = m.graph.objects(&ex("article_0_entity_1"), &ex("entityName")).collect();
        assert_eq!(names, vec![&Term::Literal(Literal::string("Acme Corp"))]);
        assert_eq!(m.report.entities, 2);
        assert_eq!(m.report.skipped_entities, 1);
    }

    #[test]
    fn test_entity_last_paren_split() {
        let m = run(&[record("real", "s", None, Some("A(B(C)"))]);
        let entity = ex("article_0_entity_0");
        let name: Vec<_> = m.graph.objects(&entity, &ex("entityName")).collect();
        let kind: Vec<_> = m.graph.objects(&entity, &ex("entityType")).collect();
        assert_eq!(name, vec![&Term::Literal(Literal::string("A(B"))]);
        assert_eq!(kind, vec![&Term::Literal(Literal::string("C"))]);
    }

    #[test]
    fn test_entities_never_shared_across_articles() {
        let m = run(&[
            record("real", "s", None, Some("Reuters(ORG)")),
            record("real", "s", None, Some("Reuters(ORG)")),
        ]);
        assert_eq!(m.graph.instances_of(&ex("Entity")).count(), 2);
    }

    #[test]
    fn test_minimum_statements_per_row() {
        let m = run(&[record("real", "s", None, None)]);
        let article = ex("article_0");
        let from_article = m.graph.iter().filter(|t| t.subject == article).count();
        // type, title, topicTerms, hasLabel, hasSubject
        assert_eq!(from_article, 5);
        // plus the label and subject type declarations
        assert_eq!(m.report.statements, 7);
    }

    #[test]
    fn test_attributes_copied_verbatim() {
        let mut r = record("real", "s", None, None);
        r.title = "  \"Quoted\" title\nwith newline ".to_string();
        let m = run(&[r]);
        let titles: Vec<_> = m.graph.objects(&ex("article_0"), &ex("title")).collect();
        assert_eq!(
            titles,
            vec![&Term::Literal(Literal::string("  \"Quoted\" title\nwith newline "))]
        );
    }

    #[test]
    fn test_invalid_topic_skip_policy() {
        let m = run(&[record("real", "s", Some("abc"), None)]);
        assert_eq!(m.graph.objects(&ex("article_0"), &ex("hasTopic")).count(), 0);
        assert_eq!(m.report.skipped_topics, 1);
    }

    #[test]
    fn test_invalid_topic_fail_policy() {
        let options = MaterializeOptions {
            invalid_topic: InvalidTopicPolicy::Fail,
            ..Default::default()
        };
        let records = vec![record("real", "s", Some("1"), None), record("real", "s", Some("abc"), None)];
        let err = materialize(&records, &options).unwrap_err();
        assert!(matches!(err, KgError::InvalidTopic { row: 1, ref value } if value == "abc"));
    }

    #[test]
    fn test_missing_label_is_fatal() {
        let mut missing = record("real", "s", None, None);
        missing.label = None;
        let err = materialize(&[missing], &MaterializeOptions::default()).unwrap_err();
        assert!(matches!(err, KgError::EmptyField { row: 0, field: "label" }));
    }

    #[test]
    fn test_missing_subject_is_fatal() {
        let mut missing = record("real", "s", None, None);
        missing.subject = None;
        let err = materialize(&[record("real", "s", None, None), missing], &MaterializeOptions::default())
            .unwrap_err();
        assert!(matches!(err, KgError::EmptyField { row: 1, field: "subject" }));
    }

    #[test]
    fn test_blank_label_and_subject_keep_empty_identity() {
        let m = run(&[record("   ", " ", None, None)]);
        assert_eq!(m.report.articles, 1);
        let article = ex("article_0");
        let labels: Vec<_> = m.graph.objects(&article, &ex("hasLabel")).collect();
        assert_eq!(labels, vec![&Term::Iri(ex("label_"))]);
        let subjects: Vec<_> = m.graph.objects(&article, &ex("hasSubject")).collect();
        assert_eq!(subjects, vec![&Term::Iri(ex("subject_"))]);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            record("real", "politicsNews", Some("2"), Some("Obama(PERSON);EU(ORG)")),
            record("fake", "left-news", None, Some("x")),
        ];
        assert_eq!(run(&records).graph, run(&records).graph);
    }

    #[test]
    fn test_custom_namespace() {
        let options = MaterializeOptions {
            namespace: Namespace::new("kg", "https://kg.example.net/"),
            ..Default::default()
        };
        let m = materialize(&[record("real", "s", None, None)], &options).unwrap();
        assert!(m.graph.iter().all(|t| t.subject.starts_with("https://kg.example.net/")));
        assert_eq!(m.namespace.prefix(), "kg");
    }
}
