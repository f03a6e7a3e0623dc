//! Route tree builder
//!
//! Walks the watched folder depth-first and turns every folder into a
//! [`Route`]. Grouping folders, whose name starts with `(`, never become routes
//! themselves: their sub-folders are spliced into the parent's children.

use crate::error::{Result, RouteError};
use crate::prober::{list_dirs, probe};
use crate::types::*;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Builds the route tree rooted at `root`. Every call starts numbering at 0.
pub fn build_route_tree(root: &Path) -> Result<RouteTree> {
    if !root.exists() {
        return Err(RouteError::PathNotFound {
            path: root.display().to_string(),
        });
    }
    if !root.is_dir() {
        return Err(RouteError::NotADirectory {
            path: root.display().to_string(),
        });
    }
    let mut builder = RouteTreeBuilder::default();
    builder.visit(root, None)?;
    log::debug!("Discovered {} route folder(s) under {}", builder.nodes.len(), root.display());
    Ok(RouteTree::new(root.to_path_buf(), builder.nodes))
}

/// Owns the arena while it is being filled. The arena length is the id
/// counter, so ids come out dense and in pre-order.
#[derive(Default)]
struct RouteTreeBuilder {
    nodes: Vec<Route>,
}

impl RouteTreeBuilder {
    fn visit(&mut self, path: &Path, parent: Option<RouteId>) -> Result<RouteId> {
        let id = RouteId(self.nodes.len());
        let name = match parent {
            Some(parent_id) => {
                let parent_name = &self.nodes[parent_id.0].name;
                join_route_name(parent_name, &basename(path))
            }
            None => ROOT_ROUTE_NAME.to_string(),
        };
        let probe = probe(path)?;
        log::trace!("Probed {} as {}: {:?}", path.display(), name, probe);

        self.nodes.push(Route {
            id,
            name,
            path: path.to_path_buf(),
            page: probe.page,
            layout: probe.layout,
            loading: probe.loading,
            template: probe.template,
            access: probe.access,
            languages: probe.languages,
            children: Vec::new(),
            parent,
        });

        for folder in find_route_folders(path)? {
            let child = self.visit(&folder, Some(id))?;
            self.nodes[id.0].children.push(child);
        }
        Ok(id)
    }
}

/// Sub-folders of `path` that become child routes, grouping folders being
/// replaced by their own sub-folders. Groups are expanded through a FIFO, so
/// their content lands after the plain siblings met so far.
fn find_route_folders(path: &Path) -> Result<Vec<PathBuf>> {
    let mut folders = Vec::new();
    let mut fringe: VecDeque<PathBuf> = list_dirs(path)?.into();
    while let Some(dir) = fringe.pop_front() {
        if is_grouping_folder(&dir) {
            fringe.extend(list_dirs(&dir)?);
        } else {
            folders.push(dir);
        }
    }
    Ok(folders)
}

pub fn is_grouping_folder(path: &Path) -> bool {
    basename(path).starts_with(GROUP_MARKER)
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Joins a parent route name and a folder name with exactly one `/`.
pub fn join_route_name(parent: &str, basename: &str) -> String {
    let parent = parent.trim_end_matches('/');
    let basename = basename.trim_matches('/');
    if basename.is_empty() {
        if parent.is_empty() {
            ROOT_ROUTE_NAME.to_string()
        } else {
            parent.to_string()
        }
    } else {
        format!("{}/{}", parent, basename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn page(root: &Path, folder: &str) {
        let dir = root.join(folder);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(PAGE_TSX), "export default null\n").unwrap();
    }

    /// (name, child names) for every route, in pre-order.
    fn shape(tree: &RouteTree) -> Vec<(String, Vec<String>)> {
        tree.iter()
            .map(|route| {
                let children = tree.children(route).map(|c| c.name.clone()).collect();
                (route.name.clone(), children)
            })
            .collect()
    }

    #[test]
    fn test_join_route_name() {
        assert_eq!(join_route_name("/", "about"), "/about");
        assert_eq!(join_route_name("/blog", "[slug]"), "/blog/[slug]");
        assert_eq!(join_route_name("/blog/", "/x/"), "/blog/x");
        assert_eq!(join_route_name("/", ""), "/");
    }

    #[test]
    fn test_ids_are_preorder_and_dense() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        page(root, "a/a1");
        page(root, "a/a2");
        page(root, "b");

        let tree = build_route_tree(root).unwrap();
        let names: Vec<_> = tree.iter().map(|r| (r.id.0, r.name.as_str())).collect();
        assert_eq!(
            names,
            vec![(0, "/"), (1, "/a"), (2, "/a/a1"), (3, "/a/a2"), (4, "/b")]
        );
        assert_eq!(tree.get(RouteId(2)).unwrap().parent, Some(RouteId(1)));
        assert!(tree.root().is_root());
    }

    #[test]
    fn test_ids_restart_for_each_build() {
        let temp_dir = TempDir::new().unwrap();
        page(temp_dir.path(), "x");

        let first = build_route_tree(temp_dir.path()).unwrap();
        let second = build_route_tree(temp_dir.path()).unwrap();
        assert_eq!(first.root().id, RouteId(0));
        assert_eq!(second.root().id, RouteId(0));
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_grouping_folder_is_transparent() {
        let grouped = TempDir::new().unwrap();
        page(grouped.path(), "(marketing)/about");
        page(grouped.path(), "(marketing)/(deep)/pricing");
        page(grouped.path(), "blog");

        let plain = TempDir::new().unwrap();
        page(plain.path(), "blog");
        page(plain.path(), "about");
        page(plain.path(), "pricing");

        let grouped_tree = build_route_tree(grouped.path()).unwrap();
        let plain_tree = build_route_tree(plain.path()).unwrap();

        let mut grouped_shape = shape(&grouped_tree);
        let mut plain_shape = shape(&plain_tree);
        for (_, children) in grouped_shape.iter_mut().chain(plain_shape.iter_mut()) {
            children.sort();
        }
        grouped_shape.sort();
        plain_shape.sort();
        assert_eq!(grouped_shape, plain_shape);

        let about = grouped_tree.find_by_name("/about").unwrap();
        assert_eq!(about.path, grouped.path().join("(marketing)").join("about"));
        assert!(grouped_tree.find_by_name("/(marketing)").is_none());
    }

    #[test]
    fn test_grouped_children_follow_plain_siblings() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        page(root, "(group)/inner");
        page(root, "zeta");

        let tree = build_route_tree(root).unwrap();
        let children: Vec<_> = tree.children(tree.root()).map(|r| r.name.as_str()).collect();
        assert_eq!(children, vec!["/zeta", "/inner"]);
    }

    #[test]
    fn test_dynamic_segment_names() {
        let temp_dir = TempDir::new().unwrap();
        page(temp_dir.path(), "blog/[slug]");

        let tree = build_route_tree(temp_dir.path()).unwrap();
        let post = tree.find_by_name("/blog/[slug]").unwrap();
        assert_eq!(post.page, Some(PageKind::Tsx));
        assert_eq!(tree.parent(post).unwrap().name, "/blog");
    }

    #[test]
    fn test_root_must_be_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        assert!(matches!(
            build_route_tree(&missing),
            Err(RouteError::PathNotFound { .. })
        ));

        let file = temp_dir.path().join(PAGE_TSX);
        fs::write(&file, "").unwrap();
        assert!(matches!(
            build_route_tree(&file),
            Err(RouteError::NotADirectory { .. })
        ));
    }
}
