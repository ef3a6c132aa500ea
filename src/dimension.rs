use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Type tag of a dimension as sent by the server.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DimensionKind {
    #[default]
    Standard,
    #[serde(alias = "time", alias = "time_dimension")]
    TimeHierarchy,
    #[serde(alias = "gl", alias = "glaccount")]
    GlAccount,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Dimension {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: DimensionKind,
    /// System dimensions are managed by the platform and expose a reduced menu
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub member_count: Option<u64>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Dimension {
    pub fn new(id: &str, name: &str, kind: DimensionKind) -> Self {
        Dimension {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            is_system: false,
            member_count: None,
            updated_at: None,
        }
    }

    pub fn system(id: &str, name: &str, kind: DimensionKind) -> Self {
        Dimension {
            is_system: true,
            ..Dimension::new(id, name, kind)
        }
    }
}

/// Entries of the per-row action menu.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DimensionAction {
    View,
    Rename,
    Reload,
    Delete,
    Export,
    Link,
    Configure,
    ViewHierarchy,
    Download,
}

impl DimensionAction {
    /// Menu order.
    pub const ALL: [DimensionAction; 9] = [
        DimensionAction::View,
        DimensionAction::Rename,
        DimensionAction::Reload,
        DimensionAction::Delete,
        DimensionAction::Export,
        DimensionAction::Link,
        DimensionAction::Configure,
        DimensionAction::ViewHierarchy,
        DimensionAction::Download,
    ];

    /// Capability table: whether this action shows up for a dimension.
    pub fn is_available(self, dimension: &Dimension) -> bool {
        use DimensionAction::*;
        use DimensionKind::*;

        match (self, dimension.is_system, dimension.kind) {
            (View, _, _) => true,
            (Configure, _, TimeHierarchy) => true,
            (Configure, _, Standard | GlAccount) => false,
            (ViewHierarchy | Download, true, GlAccount) => true,
            (ViewHierarchy | Download, _, _) => false,
            (Rename | Reload | Delete | Export | Link, system, _) => !system,
        }
    }

    /// Actions that call the server before the menu closes.
    pub fn is_remote(self) -> bool {
        match self {
            DimensionAction::Rename
            | DimensionAction::Reload
            | DimensionAction::Delete
            | DimensionAction::Export
            | DimensionAction::Download => true,
            DimensionAction::View
            | DimensionAction::Link
            | DimensionAction::Configure
            | DimensionAction::ViewHierarchy => false,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DimensionAction::View => "View",
            DimensionAction::Rename => "Rename",
            DimensionAction::Reload => "Reload",
            DimensionAction::Delete => "Delete",
            DimensionAction::Export => "Export",
            DimensionAction::Link => "Link",
            DimensionAction::Configure => "Configure",
            DimensionAction::ViewHierarchy => "View hierarchy",
            DimensionAction::Download => "Download",
        }
    }
}

pub fn available_actions(dimension: &Dimension) -> Vec<DimensionAction> {
    DimensionAction::ALL
        .into_iter()
        .filter(|action| action.is_available(dimension))
        .collect()
}

/// A change to the dimension list, produced by a row action and applied by the list owner.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ListIntent {
    RemoveById { id: String },
    RenameById { id: String, name: String },
    ReplaceById { dimension: Dimension },
}

impl ListIntent {
    /// Apply the intent to `list`. Returns whether an entry matched.
    pub fn apply(&self, list: &mut Vec<Dimension>) -> bool {
        match self {
            ListIntent::RemoveById { id } => {
                let before = list.len();
                list.retain(|d| &d.id != id);
                list.len() != before
            }
            ListIntent::RenameById { id, name } => {
                let mut matched = false;
                for dimension in list.iter_mut().filter(|d| &d.id == id) {
                    dimension.name = name.clone();
                    matched = true;
                }
                matched
            }
            ListIntent::ReplaceById { dimension } => {
                let mut matched = false;
                for entry in list.iter_mut().filter(|d| d.id == dimension.id) {
                    *entry = dimension.clone();
                    matched = true;
                }
                matched
            }
        }
    }
}

/// Where the view goes after a navigating action.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "route", content = "target", rename_all = "snake_case")]
pub enum Route {
    DimensionDetail(String),
    LinkDimension(String),
    ConfigureTimeDimension(String),
    GlAccountHierarchy(String),
    /// Browser download of an exported file
    Download(String),
}
