//! Loads the example document, exports it and checks that nothing is lost.

use std::{fmt::Debug, io::Write};

use stmd::{
    Config, LifeCycleStatus, Location, ResourceReference, StmdDocument,
    domain::{Available, Collection, schema::ROOT},
};

const EXAMPLE: &str = include_str!("fixtures/example.stmd");

fn quiet() -> Config {
    let mut config = Config::default();
    config.stamp_generation_time = false;
    config
}

fn load() -> StmdDocument {
    StmdDocument::load_with_config(EXAMPLE, quiet()).unwrap()
}

fn requirements_step() -> Location {
    Location::from([ROOT, "stmd:RequirementsPhase", "stmd:DefineModelRequirements"])
}

fn verification_step() -> Location {
    Location::from([ROOT, "stmd:RequirementsPhase", "stmd:VerifyRequirements"])
}

/// Asserts that both collections hold the same items at the same locations,
/// ignoring uids and order.
fn assert_same_entries<T: PartialEq + Debug>(left: &Collection<T>, right: &Collection<T>) {
    let mut remaining: Vec<&Available<T>> = right.iter().collect();
    for entry in left.iter() {
        let position = remaining
            .iter()
            .position(|other| other.location == entry.location && other.item == entry.item)
            .unwrap_or_else(|| panic!("{entry:?} is missing after round trip"));
        remaining.remove(position);
    }
    assert!(remaining.is_empty(), "unexpected entries: {remaining:?}");
}

#[test]
fn example_loads() {
    let document = load();
    let index = document.index();

    assert_eq!(index.resources.len(), 3);
    assert_eq!(index.resource_references.len(), 2);
    assert_eq!(index.links.len(), 2);
    assert_eq!(index.classifications.len(), 2);
    assert_eq!(index.annotations.len(), 1);
    assert_eq!(index.life_cycle_entries.len(), 2);

    let top = document.top_level_information().unwrap();
    assert_eq!(top.name, "BrakeValidation");
    assert_eq!(top.author.as_deref(), Some("Simulation Team"));
    let general = document.general_information().unwrap();
    assert_eq!(general.derivation_chain.len(), 1);
}

#[test]
fn round_trip_preserves_content() {
    let first = load();
    let second = StmdDocument::load_with_config(&first.export().unwrap(), quiet()).unwrap();

    let (a, b) = (first.index(), second.index());
    assert_same_entries(&a.resources, &b.resources);
    assert_same_entries(&a.resource_references, &b.resource_references);
    assert_same_entries(&a.links, &b.links);
    assert_same_entries(&a.classifications, &b.classifications);
    assert_same_entries(&a.annotations, &b.annotations);
    assert_same_entries(&a.life_cycle_entries, &b.life_cycle_entries);
    assert_eq!(first.general_information(), second.general_information());
}

#[test]
fn export_is_stable() {
    let once = load().export().unwrap();
    let twice = StmdDocument::load_with_config(&once, quiet())
        .unwrap()
        .export()
        .unwrap();
    assert_eq!(once, twice);
}

#[test]
fn export_replaces_generation_tool() {
    let mut document = load();
    document.config_mut().set_generation_tool("Round Trip");
    document.config_mut().stamp_generation_time = true;

    let exported = StmdDocument::load(&document.export().unwrap()).unwrap();
    let top = exported.top_level_information().unwrap();
    assert_eq!(top.generation_tool.as_deref(), Some("Round Trip"));
    assert!(top.generation_date_and_time.is_some());
}

#[test]
fn life_cycle_attachments_are_indexed() {
    let document = load();
    let entries = document.life_cycle_entries(&requirements_step());
    let statuses: Vec<_> = entries.iter().map(|entry| entry.item.status).collect();
    assert_eq!(statuses, [LifeCycleStatus::Drafted, LifeCycleStatus::Approved]);
    assert_eq!(entries[1].item.checksum.as_deref(), Some("abc123"));

    let drafted = requirements_step()
        .child("stc:LifeCycleInformation")
        .child("stc:Drafted");
    let review = document.resources(&drafted);
    assert_eq!(review.len(), 1);
    assert_eq!(review[0].item.id.as_deref(), Some("REV1"));

    let below = document.resources_recursive(&requirements_step()).unwrap();
    assert_eq!(below.len(), 2);
}

#[test]
fn references_resolve_and_cascade() {
    let mut document = load();
    let requirement = document
        .resource_from_reference(&ResourceReference::to_resource("REQ1"))
        .unwrap()
        .clone();
    assert_eq!(requirement.location, requirements_step().child("stc:Output"));

    assert!(document.delete_resource(requirement.uid));
    assert!(
        document
            .resource_references(&verification_step().child("stc:Input"))
            .is_empty()
    );
    assert!(document.resource_from_id("REQ1").is_none());
}

#[test]
fn link_projects_with_inherited_vocabulary() {
    let document = load();
    let context = document.vocabulary(&verification_step());
    let terms: Vec<&str> = context.iter().map(|entry| entry.term()).collect();
    assert_eq!(terms, ["derivedFrom", "satisfies"]);

    let links = document.links(&verification_step());
    let graph = StmdDocument::create_graph_from_link(&links[0].item, &context).unwrap();

    assert_eq!(graph.title.as_deref(), Some("verification"));
    assert_eq!(graph.node("#MODEL1").unwrap().targets("satisfies"), ["#REQ1"]);
    assert_eq!(
        graph.context.get("satisfies").map(String::as_str),
        Some("https://example.com/vocab#satisfies")
    );

    let json: serde_json::Value = serde_json::from_str(&graph.to_json_string().unwrap()).unwrap();
    assert_eq!(json["@graph"][0]["@id"], "#MODEL1");
    assert_eq!(json["@graph"][0]["satisfies"][0], "#REQ1");
}

#[test]
fn config_file_controls_export() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"_version = \"1\"\ngeneration_tool = \"Nightly\"\nstamp_generation_time = false\nindent = 0\n")
        .unwrap();
    let config = Config::load(file.path()).unwrap();

    let exported = StmdDocument::load_with_config(EXAMPLE, config)
        .unwrap()
        .export()
        .unwrap();

    assert!(exported.contains("generationTool=\"Nightly\""));
    assert!(!exported.contains("generationDateAndTime"));
    assert_eq!(exported.lines().count(), 1);
}
