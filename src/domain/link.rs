use serde::{Deserialize, Serialize};

/// An extended link connecting two or more locators through arcs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// A meaningful title for the link.
    pub title: Option<String>,
    /// The role the link has in the overall process.
    pub role: Option<String>,
    /// The endpoints of the link.
    pub locators: Vec<Locator>,
    /// Connections between the endpoints.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arcs: Vec<Arc>,
}

impl Link {
    /// Creates an untitled link with the given locators and arcs.
    #[must_use]
    pub const fn new(locators: Vec<Locator>, arcs: Vec<Arc>) -> Self {
        Self {
            title: None,
            role: None,
            locators,
            arcs,
        }
    }

    /// Sets the link title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// A labelled endpoint of a [`Link`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    /// The endpoint's address.
    pub href: String,
    /// Label that arcs use to refer to this locator.
    pub label: Option<String>,
    /// A meaningful title for the locator.
    pub title: Option<String>,
    /// The semantic meaning of the locator.
    pub role: Option<String>,
}

impl Locator {
    /// Creates a locator with only an href.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: None,
            title: None,
            role: None,
        }
    }

    /// Sets the locator label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the locator role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// A directed connection between locators of a [`Link`].
///
/// An absent `from` or `to` label stands for every locator of the link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arc {
    /// Label of the starting locators.
    pub from: Option<String>,
    /// Label of the destination locators.
    pub to: Option<String>,
    /// A meaningful title for the arc.
    pub title: Option<String>,
    /// The semantic meaning of the arc.
    pub arcrole: Option<String>,
}

impl Arc {
    /// Creates an arc between the given labels.
    #[must_use]
    pub fn new(from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
            title: None,
            arcrole: None,
        }
    }

    /// Sets the arc role.
    #[must_use]
    pub fn with_arcrole(mut self, arcrole: impl Into<String>) -> Self {
        self.arcrole = Some(arcrole.into());
        self
    }
}
