//! This bench test loads and re-exports a large generated document, with
//! resources, references and links spread over every step of every phase.

#![allow(missing_docs)]

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use stmd::{
    Config, Link, Location, Resource, ResourceReference, StmdDocument,
    domain::{
        Arc, Locator, STMD_TREE, TopLevelInformation,
        schema::{NodeKind, SchemaNode},
    },
};

fn of_kind(node: &SchemaNode, kind: NodeKind) -> impl Iterator<Item = &SchemaNode> {
    node.locations().filter(move |child| child.kind == kind)
}

/// Generates a document with a resource, a reference and a link in every
/// particle.
fn preseed_document() -> String {
    let mut config = Config::default();
    config.stamp_generation_time = false;
    let mut document = StmdDocument::with_config(config);
    document.set_top_level_information(TopLevelInformation::new(
        "1.0",
        "bench",
        "{00000000-0000-0000-0000-000000000000}",
    ));

    let mut counter = 0;
    for phase in of_kind(&STMD_TREE, NodeKind::Phase) {
        let phase_location = Location::root().child(phase.name);
        for step in of_kind(phase, NodeKind::Step) {
            let step_location = phase_location.child(step.name);
            for particle in of_kind(step, NodeKind::Particle) {
                let location = step_location.child(particle.name);
                for _ in 0..10 {
                    counter += 1;
                    let id = format!("R{counter}");
                    document
                        .add_resource(
                            Resource::new("model", "application/x-fmu-sharedlibrary")
                                .with_id(&id)
                                .with_source(format!("models/{id}.fmu")),
                            location.clone(),
                        )
                        .unwrap();
                    document
                        .add_resource_reference(
                            ResourceReference::to_resource(&id),
                            location.clone(),
                        )
                        .unwrap();
                }
            }
            document.add_link(
                Link::new(
                    vec![
                        Locator::new(format!("#R{counter}")).with_label("source"),
                        Locator::new("#R1").with_label("target"),
                    ],
                    vec![Arc::new(Some("source"), Some("target"))],
                ),
                step_location,
            );
        }
    }

    document.export().unwrap()
}

fn load_export(c: &mut Criterion) {
    let text = preseed_document();

    c.bench_function("load document", |b| {
        b.iter(|| StmdDocument::load(&text).unwrap());
    });

    c.bench_function("export document", |b| {
        b.iter_batched(
            || StmdDocument::load(&text).unwrap(),
            |document| document.export().unwrap(),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, load_export);
criterion_main!(benches);
