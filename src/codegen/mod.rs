//! Code generator
//!
//! Compiles the flattened route list into the three TypeScript modules the
//! host application imports. Generation is split in two stages: [`emit`] builds
//! an [`ir::Module`] per file, [`printer`] turns it into text.

pub mod emit;
pub mod ir;
pub mod printer;
pub mod templates;

use crate::error::Result;
use crate::types::{Route, RouteTree};
use std::path::PathBuf;

/// A rendered module and where it belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Renders every module in memory. Nothing touches the disk here.
pub fn generate(tree: &RouteTree, routes: &[&Route]) -> Result<Vec<GeneratedFile>> {
    let modules = [
        emit::emit_types_module(routes),
        emit::emit_routes_module(tree, routes),
        emit::emit_index_module(tree, routes),
    ];
    modules
        .iter()
        .map(|module| -> Result<GeneratedFile> {
            Ok(GeneratedFile {
                path: tree.root_path().join(module.file_name),
                contents: printer::print_module(module)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_route_tree;
    use crate::flatten::flatten_routes;
    use crate::types::{INDEX_MODULE, ROUTES_MODULE, TYPES_MODULE};
    use std::fs;
    use tempfile::TempDir;

    fn contents<'a>(files: &'a [GeneratedFile], name: &str) -> &'a str {
        files
            .iter()
            .find(|file| file.path.file_name().unwrap() == name)
            .map(|file| file.contents.as_str())
            .unwrap()
    }

    #[test]
    fn test_generate_three_modules() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("page.tsx"), "").unwrap();
        fs::create_dir_all(root.join("blog/[slug]")).unwrap();
        fs::write(root.join("blog/[slug]/page.tsx"), "").unwrap();

        let tree = build_route_tree(root).unwrap();
        let routes = flatten_routes(&tree);
        let files = generate(&tree, &routes).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|file| file.path.parent() == Some(root)));

        let types = contents(&files, TYPES_MODULE);
        assert!(types.contains("| \"/blog/[slug]\""));
        assert!(types.contains("export interface RouteMatch"));

        let table = contents(&files, ROUTES_MODULE);
        assert!(table.contains("\"/blog/[slug]\": [\"blog\",\"[slug]\"],"));
        assert!(table.contains("const currentRouteContext = new RouteContext([])"));
        assert!(table.contains("export function goto("));
        assert!(table.contains("export function useRouteParam("));
        assert!(table.contains("const absHash = this.ensureAbsoluteHash(hash, \"/\")"));

        let index = contents(&files, INDEX_MODULE);
        assert!(index.contains("const Page2 = React.lazy(() => import(\"./blog/[slug]/page\"))"));
        assert!(index.contains("export default function App({ lang }: { lang?: string }) {"));
        assert!(index.contains("function Route("));
        for file in &files {
            assert!(file.contents.contains("WARNING! this file has been generated automatically."));
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for folder in ["b", "a", "(g)/c"] {
            fs::create_dir_all(root.join(folder)).unwrap();
            fs::write(root.join(folder).join("page.tsx"), "").unwrap();
        }

        let render = || {
            let tree = build_route_tree(root).unwrap();
            let routes = flatten_routes(&tree);
            generate(&tree, &routes).unwrap()
        };
        assert_eq!(render(), render());
    }
}
