//! Core types and constants for the route compiler

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

// Convention file names
pub const PAGE_TSX: &str = "page.tsx";
pub const PAGE_MDX: &str = "page.mdx";
pub const LAYOUT_FILE: &str = "layout.tsx";
pub const LOADING_FILE: &str = "loading.tsx";
pub const TEMPLATE_FILE: &str = "template.tsx";
pub const ACCESS_FILE: &str = "access.ts";

// Naming
pub const ROOT_ROUTE_NAME: &str = "/";
pub const GROUP_MARKER: char = '(';
pub const PARAM_MARKER: char = '[';
pub const DEFAULT_LANGUAGE: &str = "_";

// Generated modules
pub const INDEX_MODULE: &str = "index.tsx";
pub const ROUTES_MODULE: &str = "routes.ts";
pub const TYPES_MODULE: &str = "types.ts";

/// Which flavour of page a folder exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Tsx,
    Mdx,
}

impl PageKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Tsx => "tsx",
            Self::Mdx => "mdx",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// The convention files that can carry language variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConventionKind {
    Page,
    Layout,
    Loading,
    Template,
}

impl ConventionKind {
    pub const ALL: [ConventionKind; 4] = [Self::Page, Self::Layout, Self::Loading, Self::Template];

    /// File name stem, e.g. `layout` for `layout.fr.tsx`.
    pub fn stem(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Layout => "layout",
            Self::Loading => "loading",
            Self::Template => "template",
        }
    }

    /// Prefix of the imported component binding, e.g. `Layout3_1`.
    pub fn binding_prefix(self) -> &'static str {
        match self {
            Self::Page => "Page",
            Self::Layout => "Layout",
            Self::Loading => "Loading",
            Self::Template => "Template",
        }
    }

    /// Prefix of the per-route local selected inside `App`, e.g. `ly3`.
    pub fn local_prefix(self) -> &'static str {
        match self {
            Self::Page => "pg",
            Self::Layout => "ly",
            Self::Loading => "fb",
            Self::Template => "tp",
        }
    }
}

impl fmt::Display for ConventionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stem())
    }
}

/// Language tags found for each convention kind. The first entry of every
/// list is always [`DEFAULT_LANGUAGE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Languages {
    pub page: Vec<String>,
    pub layout: Vec<String>,
    pub loading: Vec<String>,
    pub template: Vec<String>,
}

impl Default for Languages {
    fn default() -> Self {
        let sentinel = || vec![DEFAULT_LANGUAGE.to_string()];
        Self {
            page: sentinel(),
            layout: sentinel(),
            loading: sentinel(),
            template: sentinel(),
        }
    }
}

impl Languages {
    pub fn get(&self, kind: ConventionKind) -> &[String] {
        match kind {
            ConventionKind::Page => &self.page,
            ConventionKind::Layout => &self.layout,
            ConventionKind::Loading => &self.loading,
            ConventionKind::Template => &self.template,
        }
    }

    pub fn get_mut(&mut self, kind: ConventionKind) -> &mut Vec<String> {
        match kind {
            ConventionKind::Page => &mut self.page,
            ConventionKind::Layout => &mut self.layout,
            ConventionKind::Loading => &mut self.loading,
            ConventionKind::Template => &mut self.template,
        }
    }
}

/// Index of a route inside its [`RouteTree`]. Ids are assigned in pre-order
/// and only mean something within one generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RouteId(pub usize);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One folder of the route tree.
#[derive(Debug, Clone, Serialize)]
pub struct Route {
    pub id: RouteId,
    /// Canonical path, e.g. `/sections/light` for `app/sections/(green)/light`.
    pub name: String,
    /// Absolute folder location.
    pub path: PathBuf,
    pub page: Option<PageKind>,
    pub layout: bool,
    pub loading: bool,
    pub template: bool,
    /// Is there an access module?
    pub access: bool,
    pub languages: Languages,
    pub children: Vec<RouteId>,
    pub parent: Option<RouteId>,
}

impl Route {
    pub fn has(&self, kind: ConventionKind) -> bool {
        match kind {
            ConventionKind::Page => self.page.is_some(),
            ConventionKind::Layout => self.layout,
            ConventionKind::Loading => self.loading,
            ConventionKind::Template => self.template,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena holding every route of one generation pass. The root is always
/// the first node.
#[derive(Debug, Clone, Serialize)]
pub struct RouteTree {
    root_path: PathBuf,
    nodes: Vec<Route>,
}

impl RouteTree {
    pub(crate) fn new(root_path: PathBuf, nodes: Vec<Route>) -> Self {
        Self { root_path, nodes }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn root(&self) -> &Route {
        &self.nodes[0]
    }

    pub fn get(&self, id: RouteId) -> Option<&Route> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.nodes.iter()
    }

    pub fn children<'a>(&'a self, route: &'a Route) -> impl Iterator<Item = &'a Route> + 'a {
        route.children.iter().filter_map(move |id| self.get(*id))
    }

    pub fn parent(&self, route: &Route) -> Option<&Route> {
        route.parent.and_then(|id| self.get(id))
    }

    /// Walks from `route` up to the root, `route` included.
    pub fn ancestors<'a>(&'a self, route: &'a Route) -> impl Iterator<Item = &'a Route> + 'a {
        std::iter::successors(Some(route), move |current| self.parent(current))
    }

    /// Nearest route, `route` included, that defines `kind`.
    pub fn nearest_with<'a>(&'a self, route: &'a Route, kind: ConventionKind) -> Option<&'a Route> {
        self.ancestors(route).find(|candidate| candidate.has(kind))
    }

    /// Folder of `route` relative to the tree root, always `/`-separated.
    pub fn relative_folder(&self, route: &Route) -> String {
        let relative = route.path.strip_prefix(&self.root_path).unwrap_or(&route.path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Route> {
        self.nodes.iter().find(|route| route.name == name)
    }
}
