//! Route list to IR
//!
//! Bindings are named after the route id: `Layout3` for the default variant of
//! a layout, `Layout3_1` for its first language variant, and `ly3` for the
//! value selected inside `App`.

use super::ir::{Binding, DispatchNode, Expr, Item, Module};
use super::templates;
use crate::segments;
use crate::types::*;
use std::collections::HashSet;

/// `types.ts`: the route union and the runtime type declarations.
pub fn emit_types_module(routes: &[&Route]) -> Module {
    let mut module = Module::new(TYPES_MODULE);
    module.push(Item::Disclaimer);
    module.push(Item::RouteUnion {
        members: routes.iter().map(|route| route.name.clone()).collect(),
    });
    module.push(Item::Runtime(templates::TYPES_TAIL));
    module
}

/// `routes.ts`: access guards, the route dictionary and the navigation store.
pub fn emit_routes_module(tree: &RouteTree, routes: &[&Route]) -> Module {
    let mut module = Module::new(ROUTES_MODULE);
    module.push(Item::Disclaimer);
    module.push(Item::Runtime(templates::ROUTES_HEAD));

    let guarded: Vec<&Route> = routes.iter().copied().filter(|route| route.access).collect();
    module.extend(guarded.iter().map(|route| Item::Import {
        binding: access_binding(route),
        source: module_source(tree, route, "access"),
    }));

    module.push(Item::Blank);
    module.push(Item::RouteDictionary {
        entries: routes
            .iter()
            .map(|route| (route.name.clone(), segments::parse_route_name(&route.name)))
            .collect(),
    });
    module.push(Item::Runtime(templates::ROUTES_TAIL));

    // Deepest guard first: the runtime picks the first covering prefix.
    let mut guards: Vec<(String, String)> = guarded
        .iter()
        .map(|route| (route.name.clone(), access_binding(route)))
        .collect();
    guards.sort_by(|a, b| b.0.cmp(&a.0));
    module.push(Item::RouteContext { guards });
    module
}

/// `index.tsx`: component imports and the `App` dispatcher.
pub fn emit_index_module(tree: &RouteTree, routes: &[&Route]) -> Module {
    let mut module = Module::new(INDEX_MODULE);
    module.push(Item::Disclaimer);
    module.push(Item::Runtime(templates::INDEX_HEAD));

    for kind in [ConventionKind::Layout, ConventionKind::Loading, ConventionKind::Template] {
        for route in routes.iter().filter(|route| route.has(kind)) {
            for (index, lang) in route.languages.get(kind).iter().enumerate() {
                let file = if index == 0 {
                    kind.stem().to_string()
                } else {
                    format!("{}.{}", kind.stem(), lang)
                };
                module.push(Item::Import {
                    binding: component_binding(kind, route.id, index),
                    source: module_source(tree, route, &file),
                });
            }
        }
    }

    for route in routes {
        let Some(page) = route.page else {
            continue;
        };
        for (index, lang) in route.languages.page.iter().enumerate() {
            module.push(Item::LazyImport {
                binding: component_binding(ConventionKind::Page, route.id, index),
                source: module_source(tree, route, &page_file(page, index, lang)),
            });
        }
    }

    module.push(Item::Blank);
    let surviving: HashSet<RouteId> = routes.iter().map(|route| route.id).collect();
    let root = tree.root();
    let app = if surviving.contains(&root.id) {
        Item::App {
            bindings: app_bindings(root, routes),
            root: Some(dispatch_node(tree, root, &surviving)),
        }
    } else {
        Item::App {
            bindings: Vec::new(),
            root: None,
        }
    };
    module.push(app);
    module.push(Item::Runtime(templates::INDEX_TAIL));
    module
}

fn app_bindings(root: &Route, routes: &[&Route]) -> Vec<Binding> {
    let mut bindings = Vec::new();
    if !root.loading {
        bindings.push(Binding {
            name: "fb".to_string(),
            value: Expr::Markup(templates::DEFAULT_FALLBACK),
        });
    }
    for route in routes {
        for kind in [
            ConventionKind::Loading,
            ConventionKind::Layout,
            ConventionKind::Template,
            ConventionKind::Page,
        ] {
            if route.has(kind) {
                bindings.push(Binding {
                    name: local_binding(kind, route.id),
                    value: variant_selection(kind, route),
                });
            }
        }
    }
    bindings
}

/// Loading fallbacks are elements, the other kinds are components.
fn variant_selection(kind: ConventionKind, route: &Route) -> Expr {
    let reference = |index: usize| {
        let name = component_binding(kind, route.id, index);
        match kind {
            ConventionKind::Loading => Expr::Element(name),
            _ => Expr::Ident(name),
        }
    };
    let languages = route.languages.get(kind);
    if languages.len() < 2 {
        return reference(0);
    }
    Expr::Intl {
        base: Box::new(reference(0)),
        translations: languages
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, lang)| (lang.clone(), reference(index)))
            .collect(),
    }
}

/// Loading and template are inherited from the nearest ancestor, self
/// included, that defines them.
fn dispatch_node(tree: &RouteTree, route: &Route, surviving: &HashSet<RouteId>) -> DispatchNode {
    let inherited = |kind: ConventionKind| {
        tree.nearest_with(route, kind)
            .map(|owner| local_binding(kind, owner.id))
    };
    DispatchNode {
        path: route.name.clone(),
        page: route
            .page
            .map(|_| local_binding(ConventionKind::Page, route.id)),
        layout: route
            .layout
            .then(|| local_binding(ConventionKind::Layout, route.id)),
        template: inherited(ConventionKind::Template),
        fallback: inherited(ConventionKind::Loading).unwrap_or_else(|| "fb".to_string()),
        children: tree
            .children(route)
            .filter(|child| surviving.contains(&child.id))
            .map(|child| dispatch_node(tree, child, surviving))
            .collect(),
    }
}

fn component_binding(kind: ConventionKind, id: RouteId, index: usize) -> String {
    if index == 0 {
        format!("{}{}", kind.binding_prefix(), id)
    } else {
        format!("{}{}_{}", kind.binding_prefix(), id, index)
    }
}

fn local_binding(kind: ConventionKind, id: RouteId) -> String {
    format!("{}{}", kind.local_prefix(), id)
}

fn access_binding(route: &Route) -> String {
    format!("access{}", route.id)
}

fn page_file(page: PageKind, index: usize, lang: &str) -> String {
    match (page, index) {
        (PageKind::Tsx, 0) => "page".to_string(),
        (PageKind::Tsx, _) => format!("page.{}", lang),
        (PageKind::Mdx, 0) => "page.mdx".to_string(),
        (PageKind::Mdx, _) => format!("page.{}.mdx", lang),
    }
}

/// Import specifier relative to the generated modules, which live in the root.
fn module_source(tree: &RouteTree, route: &Route, file: &str) -> String {
    let folder = tree.relative_folder(route);
    if folder.is_empty() {
        format!("./{}", file)
    } else {
        format!("./{}/{}", folder, file)
    }
}
