//! Route flattener: linearize the tree and keep only the routes that lead to a page

use crate::types::*;
use std::collections::VecDeque;

/// Breadth-first list of the routes that have a page or a descendant with a
/// page, sorted by canonical name.
pub fn flatten_routes(tree: &RouteTree) -> Vec<&Route> {
    let mut routes = Vec::with_capacity(tree.len());
    let mut fringe = VecDeque::from([tree.root()]);
    while let Some(next) = fringe.pop_front() {
        routes.push(next);
        fringe.extend(tree.children(next));
    }

    let mut routes: Vec<&Route> = routes
        .into_iter()
        .filter(|route| has_page(tree, route))
        .collect();
    routes.sort_by(|a, b| a.name.cmp(&b.name));
    routes
}

/// A route must have a page, or any child with a page.
pub fn has_page(tree: &RouteTree, route: &Route) -> bool {
    route.page.is_some() || tree.children(route).any(|child| has_page(tree, child))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_route_tree;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn folder(root: &Path, path: &str, files: &[&str]) {
        let dir = root.join(path);
        fs::create_dir_all(&dir).unwrap();
        for file in files {
            fs::write(dir.join(file), "").unwrap();
        }
    }

    fn names(routes: &[&Route]) -> Vec<String> {
        routes.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_keeps_pages_and_their_ancestors() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        folder(root, "docs/guide/intro", &["page.mdx"]);
        folder(root, "docs/empty", &["layout.tsx"]);
        folder(root, "assets/img", &[]);
        folder(root, "about", &["page.tsx"]);

        let tree = build_route_tree(root).unwrap();
        let routes = flatten_routes(&tree);
        assert_eq!(
            names(&routes),
            vec!["/", "/about", "/docs", "/docs/guide", "/docs/guide/intro"]
        );
    }

    #[test]
    fn test_sorted_by_name_not_by_depth() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        folder(root, "b", &["page.tsx"]);
        folder(root, "a/z", &["page.tsx"]);
        folder(root, "B", &["page.tsx"]);

        let tree = build_route_tree(root).unwrap();
        let routes = flatten_routes(&tree);
        assert_eq!(names(&routes), vec!["/", "/B", "/a", "/a/z", "/b"]);
    }

    #[test]
    fn test_tree_without_pages_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        folder(temp_dir.path(), "nothing/here", &["layout.tsx"]);

        let tree = build_route_tree(temp_dir.path()).unwrap();
        assert!(flatten_routes(&tree).is_empty());
        assert!(!has_page(&tree, tree.root()));
    }
}
