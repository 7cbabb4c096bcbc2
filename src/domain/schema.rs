//! The fixed shape of an STMD document.
//!
//! [`STMD_TREE`] lists, in canonical export order, every phase, step and
//! particle a document may contain, together with the sections (links,
//! resources, classifications, ...) each of them can hold.

use thiserror::Error;

use super::{Location, lifecycle::LifeCycleStatus};

/// Name of the document root element.
pub const ROOT: &str = "stmd:SimulationTaskMetaData";

/// Qualified names of the structural elements.
pub mod element {
    /// General information below the root.
    pub const GENERAL_INFORMATION: &str = "stmd:GeneralInformation";
    /// Derivation chain inside general information.
    pub const DERIVATION_CHAIN: &str = "stc:DerivationChain";
    /// One entry of the derivation chain.
    pub const DERIVATION_CHAIN_ENTRY: &str = "stc:DerivationChainEntry";
    /// Container of links.
    pub const LINKS: &str = "stc:Links";
    /// An extended link.
    pub const LINK: &str = "stc:Link";
    /// A link endpoint.
    pub const LOCATOR: &str = "stc:Locator";
    /// A link connection.
    pub const ARC: &str = "stc:Arc";
    /// Container of life cycle entries.
    pub const LIFE_CYCLE_INFORMATION: &str = "stc:LifeCycleInformation";
    /// Responsible person of a life cycle entry.
    pub const RESPONSIBLE: &str = "stc:Responsible";
    /// A resource.
    pub const RESOURCE: &str = "stc:Resource";
    /// A resource reference.
    pub const RESOURCE_REFERENCE: &str = "stc:ResourceReference";
    /// Free-form content.
    pub const CONTENT: &str = "stc:Content";
    /// Resource summary.
    pub const SUMMARY: &str = "stc:Summary";
    /// Resource meta data.
    pub const META_DATA: &str = "stc:MetaData";
    /// A signature.
    pub const SIGNATURE: &str = "stc:Signature";
    /// A classification.
    pub const CLASSIFICATION: &str = "stc:Classification";
    /// A classification entry.
    pub const CLASSIFICATION_ENTRY: &str = "stc:ClassificationEntry";
    /// Container of annotations.
    pub const ANNOTATIONS: &str = "stc:Annotations";
    /// An annotation.
    pub const ANNOTATION: &str = "ssc:Annotation";

    /// The input particle.
    pub const INPUT: &str = "stc:Input";
    /// The procedure particle.
    pub const PROCEDURE: &str = "stc:Procedure";
    /// The output particle.
    pub const OUTPUT: &str = "stc:Output";
    /// The rationale particle.
    pub const RATIONALE: &str = "stc:Rationale";
}

/// Data-bearing sections of a schema node.
///
/// Sections are not locations themselves; their content is stored at the
/// location of the node that owns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// The derivation chain of general information.
    DerivationChain,
    /// A `stc:Links` container.
    Links,
    /// Repeated `stc:Resource` elements.
    Resources,
    /// Repeated `stc:ResourceReference` elements.
    ResourceReferences,
    /// Repeated `stc:Classification` elements.
    Classifications,
    /// A `stc:Annotations` container.
    Annotations,
}

impl Section {
    /// The qualified name of the element holding this section's data.
    #[must_use]
    pub const fn element_name(self) -> &'static str {
        match self {
            Self::DerivationChain => element::DERIVATION_CHAIN,
            Self::Links => element::LINKS,
            Self::Resources => element::RESOURCE,
            Self::ResourceReferences => element::RESOURCE_REFERENCE,
            Self::Classifications => element::CLASSIFICATION,
            Self::Annotations => element::ANNOTATIONS,
        }
    }
}

/// What a schema node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The document root.
    Root,
    /// General information.
    GeneralInformation,
    /// A phase of the simulation task.
    Phase,
    /// A step within a phase.
    Step,
    /// A particle (input, procedure, output, rationale) within a step.
    Particle,
    /// The life cycle container of a phase or step.
    LifeCycleInformation,
    /// One status slot within life cycle information.
    LifeCycleStatus(LifeCycleStatus),
    /// A data-bearing section.
    Section(Section),
}

/// One node of the static schema tree.
#[derive(Debug, PartialEq, Eq)]
pub struct SchemaNode {
    /// The qualified element name.
    pub name: &'static str,
    /// What the node represents.
    pub kind: NodeKind,
    /// Child nodes in canonical order.
    pub children: &'static [SchemaNode],
}

impl SchemaNode {
    /// Children that are locations, i.e. everything except sections.
    pub fn locations(&self) -> impl Iterator<Item = &Self> {
        self.children
            .iter()
            .filter(|child| !matches!(child.kind, NodeKind::Section(_)))
    }

    /// The location child called `name`.
    #[must_use]
    pub fn location(&self, name: &str) -> Option<&Self> {
        self.locations().find(|child| child.name == name)
    }

    /// Returns `true` if this node holds `section`.
    #[must_use]
    pub fn has_section(&self, section: Section) -> bool {
        self.children
            .iter()
            .any(|child| child.kind == NodeKind::Section(section))
    }
}

/// A location does not resolve in [`STMD_TREE`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{segment}' is not a valid element at location '{location}'")]
pub struct SchemaPathError {
    /// The location that failed to resolve.
    pub location: Location,
    /// The first segment that could not be followed.
    pub segment: String,
}

/// Follows `location` from the root of [`STMD_TREE`].
///
/// # Errors
///
/// Returns [`SchemaPathError`] if the location is empty, does not start at
/// the root element, or names an element the schema does not define.
pub fn subtree_at(location: &Location) -> Result<&'static SchemaNode, SchemaPathError> {
    let fail = |segment: &str| SchemaPathError {
        location: location.clone(),
        segment: segment.to_string(),
    };

    let (first, rest) = location.segments().split_first().ok_or_else(|| fail(""))?;
    if first != STMD_TREE.name {
        return Err(fail(first));
    }

    let mut node: &'static SchemaNode = &STMD_TREE;
    for segment in rest {
        node = node.location(segment).ok_or_else(|| fail(segment))?;
    }
    Ok(node)
}

const fn section(section: Section) -> SchemaNode {
    SchemaNode {
        name: section.element_name(),
        kind: NodeKind::Section(section),
        children: &[],
    }
}

const fn status(status: LifeCycleStatus) -> SchemaNode {
    SchemaNode {
        name: status.element_name(),
        kind: NodeKind::LifeCycleStatus(status),
        children: &[],
    }
}

const fn particle(name: &'static str) -> SchemaNode {
    SchemaNode {
        name,
        kind: NodeKind::Particle,
        children: PARTICLE_CHILDREN,
    }
}

const fn step(name: &'static str) -> SchemaNode {
    SchemaNode {
        name,
        kind: NodeKind::Step,
        children: STEP_CHILDREN,
    }
}

const PARTICLE_CHILDREN: &[SchemaNode] = &[
    section(Section::Resources),
    section(Section::ResourceReferences),
    section(Section::Classifications),
    section(Section::Annotations),
];

const LIFE_CYCLE_INFORMATION: SchemaNode = SchemaNode {
    name: element::LIFE_CYCLE_INFORMATION,
    kind: NodeKind::LifeCycleInformation,
    children: &[
        status(LifeCycleStatus::Drafted),
        status(LifeCycleStatus::Defined),
        status(LifeCycleStatus::Validated),
        status(LifeCycleStatus::Approved),
        status(LifeCycleStatus::Archived),
        status(LifeCycleStatus::Retracted),
    ],
};

const STEP_CHILDREN: &[SchemaNode] = &[
    particle(element::INPUT),
    particle(element::PROCEDURE),
    particle(element::OUTPUT),
    particle(element::RATIONALE),
    section(Section::Links),
    LIFE_CYCLE_INFORMATION,
    section(Section::Classifications),
    section(Section::Annotations),
];

macro_rules! phase {
    ($name:literal, [$($step:literal),+ $(,)?]) => {
        SchemaNode {
            name: $name,
            kind: NodeKind::Phase,
            children: &[
                $(step($step),)+
                section(Section::Links),
                LIFE_CYCLE_INFORMATION,
                section(Section::Classifications),
                section(Section::Annotations),
            ],
        }
    };
}

/// The complete document schema, in canonical export order.
pub static STMD_TREE: SchemaNode = SchemaNode {
    name: ROOT,
    kind: NodeKind::Root,
    children: &[
        SchemaNode {
            name: element::GENERAL_INFORMATION,
            kind: NodeKind::GeneralInformation,
            children: &[section(Section::DerivationChain), section(Section::Links)],
        },
        phase!(
            "stmd:AnalysisPhase",
            [
                "stmd:AnalyzeSimulationTaskAndObjectives",
                "stmd:VerifyAnalysis",
            ]
        ),
        phase!(
            "stmd:RequirementsPhase",
            [
                "stmd:DefineModelRequirements",
                "stmd:DefineParameterRequirements",
                "stmd:DefineSimulationEnvironmentRequirements",
                "stmd:DefineSimulationIntegrationRequirements",
                "stmd:DefineTestCaseRequirements",
                "stmd:DefineQualityAssuranceRequirements",
                "stmd:VerifyRequirements",
            ]
        ),
        phase!(
            "stmd:DesignPhase",
            [
                "stmd:DefineModelDesignSpecification",
                "stmd:DefineParameterDesignSpecification",
                "stmd:DefineSimulationEnvironmentDesignSpecification",
                "stmd:DefineSimulationIntegrationDesignSpecification",
                "stmd:DefineTestCaseDesignSpecification",
                "stmd:DefineQualityAssuranceDesignSpecification",
                "stmd:VerifyDesignSpecification",
            ]
        ),
        phase!(
            "stmd:ImplementationPhase",
            [
                "stmd:ImplementModel",
                "stmd:ImplementParameter",
                "stmd:ImplementSimulationEnvironment",
                "stmd:ImplementTestCase",
                "stmd:IntegrateSimulation",
                "stmd:AssureSimulationSetupQuality",
                "stmd:DeriveSimulationSetupQualityVerdict",
            ]
        ),
        phase!("stmd:ExecutionPhase", ["stmd:ExecuteSimulation"]),
        phase!(
            "stmd:EvaluationPhase",
            [
                "stmd:EvaluateSimulationResults",
                "stmd:AssureSimulationQuality",
                "stmd:DeriveSimulationQualityVerdict",
            ]
        ),
        phase!(
            "stmd:FulfillmentPhase",
            ["stmd:DecideSimulationObjectiveFulfillment"]
        ),
        section(Section::Classifications),
        section(Section::Annotations),
    ],
};
