//! Projection of a [`Link`] onto a JSON-LD named graph.
//!
//! Every arc contributes one edge per pair of matching start and end
//! locators. Nodes are keyed by the locator href; edges are properties named
//! after the arc role and hold arrays of target hrefs.

use std::{
    collections::{BTreeMap, HashMap},
    sync::LazyLock,
};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::link::{Arc, Link, Locator};

/// IRI bound to the `title` term of every graph context.
pub const TITLE_IRI: &str = "http://purl.org/dc/terms/title";

/// Edge property used for arcs without an arc role.
pub const DEFAULT_ARCROLE: &str = "to";

static TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^:]+$").expect("this must never fail"));

static KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@[A-Za-z]+$").expect("this must never fail"));

/// A string cannot be used as a JSON-LD term.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a valid JSON-LD term")]
pub struct InvalidTermError(String);

/// A term to IRI mapping for the `@context` of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextEntry {
    term: String,
    iri: String,
}

impl ContextEntry {
    /// Creates a context entry.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTermError`] if the term is empty, contains a `:`, or
    /// has the shape of a JSON-LD keyword (`@` followed by letters).
    pub fn new(
        term: impl Into<String>,
        iri: impl Into<String>,
    ) -> Result<Self, InvalidTermError> {
        let term = term.into();
        if !TERM.is_match(&term) || KEYWORD.is_match(&term) {
            return Err(InvalidTermError(term));
        }
        Ok(Self {
            term,
            iri: iri.into(),
        })
    }

    /// The short term.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The IRI the term expands to.
    #[must_use]
    pub fn iri(&self) -> &str {
        &self.iri
    }
}

/// A node of a [`NamedGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// The node identifier, taken from a locator href.
    #[serde(rename = "@id")]
    pub id: String,
    /// The node type, taken from a locator role.
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    /// Outgoing edges, keyed by arc role.
    #[serde(flatten)]
    pub edges: BTreeMap<String, Vec<String>>,
}

impl GraphNode {
    fn from_locator(locator: &Locator) -> Self {
        Self {
            id: locator.href.clone(),
            node_type: locator.role.clone(),
            edges: BTreeMap::new(),
        }
    }

    /// The targets of the edges with the given role.
    #[must_use]
    pub fn targets(&self, arcrole: &str) -> &[String] {
        self.edges
            .get(arcrole)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// A JSON-LD named graph derived from one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedGraph {
    /// Term definitions.
    #[serde(rename = "@context")]
    pub context: BTreeMap<String, String>,
    /// The nodes, in order of first appearance.
    #[serde(rename = "@graph")]
    pub nodes: Vec<GraphNode>,
    /// The title of the source link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl NamedGraph {
    /// The node with the given `@id`.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Serializes the graph as compact JSON-LD.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// An arc names a locator label that the link does not define.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid link: no locator with label '{label}'")]
pub struct MalformedLinkError {
    /// The unresolved label.
    pub label: String,
}

/// Projects `link` onto a named graph using the given context terms.
///
/// # Errors
///
/// Returns [`MalformedLinkError`] if an arc refers to a label that no locator
/// of the link carries.
pub fn project(link: &Link, context: &[ContextEntry]) -> Result<NamedGraph, MalformedLinkError> {
    let mut builder = GraphBuilder::default();

    for arc in &link.arcs {
        let starts = resolve(&link.locators, arc.from.as_deref())?;
        let ends = resolve(&link.locators, arc.to.as_deref())?;
        let arcrole = arc.arcrole.as_deref().unwrap_or(DEFAULT_ARCROLE);

        for start in &starts {
            for end in &ends {
                let mut start_node = GraphNode::from_locator(start);
                start_node
                    .edges
                    .insert(arcrole.to_string(), vec![end.href.clone()]);
                builder.merge(start_node);
                builder.merge(GraphNode::from_locator(end));
            }
        }
    }

    let mut terms: BTreeMap<String, String> = context
        .iter()
        .map(|entry| (entry.term.clone(), entry.iri.clone()))
        .collect();
    terms.insert("title".to_string(), TITLE_IRI.to_string());

    Ok(NamedGraph {
        context: terms,
        nodes: builder.nodes,
        title: link.title.clone(),
    })
}

/// The locators an arc endpoint refers to; an absent label means all of them.
fn resolve<'a>(
    locators: &'a [Locator],
    label: Option<&str>,
) -> Result<Vec<&'a Locator>, MalformedLinkError> {
    let Some(label) = label else {
        return Ok(locators.iter().collect());
    };
    let matched: Vec<_> = locators
        .iter()
        .filter(|locator| locator.label.as_deref() == Some(label))
        .collect();
    if matched.is_empty() {
        return Err(MalformedLinkError {
            label: label.to_string(),
        });
    }
    Ok(matched)
}

#[derive(Default)]
struct GraphBuilder {
    nodes: Vec<GraphNode>,
    positions: HashMap<String, usize>,
}

impl GraphBuilder {
    /// Adds `node`, or appends its edges to the node with the same id.
    ///
    /// The `@type` of an existing node is never changed.
    fn merge(&mut self, node: GraphNode) {
        if let Some(&index) = self.positions.get(&node.id) {
            let existing = &mut self.nodes[index];
            for (arcrole, targets) in node.edges {
                existing.edges.entry(arcrole).or_default().extend(targets);
            }
        } else {
            self.positions.insert(node.id.clone(), self.nodes.len());
            self.nodes.push(node);
        }
    }
}

/// Arcs of `link` whose endpoints cannot be resolved.
pub(crate) fn unresolved_arcs(link: &Link) -> impl Iterator<Item = &Arc> {
    link.arcs.iter().filter(|arc| {
        resolve(&link.locators, arc.from.as_deref()).is_err()
            || resolve(&link.locators, arc.to.as_deref()).is_err()
    })
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn two_locator_link(arc: Arc) -> Link {
        Link::new(
            vec![
                Locator::new("urn:a").with_label("x"),
                Locator::new("urn:b").with_label("y"),
            ],
            vec![arc],
        )
    }

    #[test]
    fn labelled_arc_connects_start_to_end() {
        let link = two_locator_link(Arc::new(Some("x"), Some("y")).with_arcrole("validates"));

        let graph = project(&link, &[]).unwrap();

        assert_eq!(graph.nodes.len(), 2);
        let a = graph.node("urn:a").unwrap();
        assert_eq!(a.targets("validates"), ["urn:b"]);
        let b = graph.node("urn:b").unwrap();
        assert!(b.edges.is_empty());
        assert!(b.node_type.is_none());
    }

    #[test]
    fn missing_arcrole_uses_default() {
        let link = two_locator_link(Arc::new(Some("x"), Some("y")));

        let graph = project(&link, &[]).unwrap();

        assert_eq!(graph.node("urn:a").unwrap().targets(DEFAULT_ARCROLE), ["urn:b"]);
    }

    #[test]
    fn wildcard_arc_is_full_cross_product() {
        let link = Link::new(
            vec![
                Locator::new("urn:a"),
                Locator::new("urn:b"),
                Locator::new("urn:c"),
            ],
            vec![Arc::new(None, None).with_arcrole("rel")],
        );

        let graph = project(&link, &[]).unwrap();

        assert_eq!(graph.nodes.len(), 3);
        for node in &graph.nodes {
            assert_eq!(node.targets("rel"), ["urn:a", "urn:b", "urn:c"]);
        }
    }

    #[test]
    fn edges_to_the_same_node_are_concatenated_in_arc_order() {
        let link = Link::new(
            vec![
                Locator::new("urn:a").with_label("x"),
                Locator::new("urn:b").with_label("y"),
                Locator::new("urn:c").with_label("z"),
            ],
            vec![
                Arc::new(Some("x"), Some("y")).with_arcrole("rel"),
                Arc::new(Some("x"), Some("z")).with_arcrole("rel"),
                Arc::new(Some("x"), Some("z")).with_arcrole("other"),
            ],
        );

        let graph = project(&link, &[]).unwrap();

        let a = graph.node("urn:a").unwrap();
        assert_eq!(a.targets("rel"), ["urn:b", "urn:c"]);
        assert_eq!(a.targets("other"), ["urn:c"]);
        assert_eq!(graph.nodes.len(), 3);
    }

    #[test]
    fn first_type_wins() {
        let link = Link::new(
            vec![
                Locator::new("urn:a").with_label("x").with_role("Model"),
                Locator::new("urn:a").with_label("y").with_role("Other"),
            ],
            vec![Arc::new(Some("x"), Some("y"))],
        );

        let graph = project(&link, &[]).unwrap();

        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].node_type.as_deref(), Some("Model"));
        assert_eq!(graph.nodes[0].targets("to"), ["urn:a"]);
    }

    #[test]
    fn unknown_label_is_malformed() {
        let link = two_locator_link(Arc::new(Some("x"), Some("missing")));

        let error = project(&link, &[]).unwrap_err();

        assert_eq!(error.label, "missing");
        assert_eq!(unresolved_arcs(&link).count(), 1);
    }

    #[test]
    fn json_shape() {
        let link = two_locator_link(Arc::new(Some("x"), Some("y")).with_arcrole("validates"))
            .with_title("Verification");
        let context = [ContextEntry::new("validates", "https://example.com/validates").unwrap()];

        let json: serde_json::Value =
            serde_json::from_str(&project(&link, &context).unwrap().to_json_string().unwrap())
                .unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "@context": {
                    "validates": "https://example.com/validates",
                    "title": TITLE_IRI,
                },
                "@graph": [
                    { "@id": "urn:a", "validates": ["urn:b"] },
                    { "@id": "urn:b" },
                ],
                "title": "Verification",
            })
        );
    }

    #[test_case("validates", true; "plain term")]
    #[test_case("has-part", true; "hyphenated")]
    #[test_case("", false; "empty")]
    #[test_case("@type", false; "keyword")]
    #[test_case("@type1", true; "keyword-like with digit")]
    #[test_case("dc:title", false; "compact iri")]
    fn term_validation(term: &str, valid: bool) {
        assert_eq!(ContextEntry::new(term, "https://example.com").is_ok(), valid);
    }
}
