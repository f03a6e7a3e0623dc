//! Intermediate representation of the generated modules
//!
//! The emitter turns the route list into these nodes; the printer is the only
//! place that knows how they look as TypeScript.

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub file_name: &'static str,
    pub items: Vec<Item>,
}

impl Module {
    pub fn new(file_name: &'static str) -> Self {
        Self {
            file_name,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = Item>) {
        self.items.extend(items);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// "generated, do not edit" header.
    Disclaimer,
    Blank,
    /// Fixed runtime code copied as is.
    Runtime(&'static str),
    /// `import Layout3 from "./blog/layout"`
    Import { binding: String, source: String },
    /// `const Page3 = React.lazy(() => import("./blog/page"))`
    LazyImport { binding: String, source: String },
    /// Union of every canonical route name.
    RouteUnion { members: Vec<String> },
    /// Route name to segment list dictionary.
    RouteDictionary { entries: Vec<(String, Vec<String>)> },
    /// Navigation store instance with its `(route prefix, guard binding)` list.
    RouteContext { guards: Vec<(String, String)> },
    /// Root component: per-route selections followed by the dispatcher tree.
    App {
        bindings: Vec<Binding>,
        root: Option<DispatchNode>,
    },
}

/// `const <name> = <value>` inside `App`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(String),
    /// `<Loading0/>`
    Element(String),
    /// Raw markup such as the default loading fallback.
    Markup(&'static str),
    /// Runtime selection of a language variant, keyed by language tag.
    Intl {
        base: Box<Expr>,
        translations: Vec<(String, Expr)>,
    },
}

/// One `<Route>` of the dispatcher, with every inherited prop already
/// resolved to a concrete binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchNode {
    pub path: String,
    pub page: Option<String>,
    pub layout: Option<String>,
    pub template: Option<String>,
    pub fallback: String,
    pub children: Vec<DispatchNode>,
}

impl DispatchNode {
    /// Number of nodes in this subtree, itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(DispatchNode::node_count).sum::<usize>()
    }

    pub fn find(&self, path: &str) -> Option<&DispatchNode> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(path))
    }
}
