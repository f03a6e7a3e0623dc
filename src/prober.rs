//! Directory prober: which convention files live directly inside a folder

use crate::error::Result;
use crate::types::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What a single folder contributes to its route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub page: Option<PageKind>,
    pub layout: bool,
    pub loading: bool,
    pub template: bool,
    pub access: bool,
    pub languages: Languages,
}

/// Inspects `dir` without recursing. The caller guarantees the folder exists.
pub fn probe(dir: &Path) -> Result<Probe> {
    let page = if exists(dir, PAGE_TSX) {
        Some(PageKind::Tsx)
    } else if exists(dir, PAGE_MDX) {
        Some(PageKind::Mdx)
    } else {
        None
    };

    Ok(Probe {
        page,
        layout: exists(dir, LAYOUT_FILE),
        loading: exists(dir, LOADING_FILE),
        template: exists(dir, TEMPLATE_FILE),
        access: exists(dir, ACCESS_FILE),
        languages: find_languages(dir, page)?,
    })
}

fn exists(dir: &Path, filename: &str) -> bool {
    dir.join(filename).exists()
}

fn find_languages(dir: &Path, page: Option<PageKind>) -> Result<Languages> {
    // A folder without `page.tsx` looks for `.mdx` page variants.
    let page_extension = match page {
        Some(PageKind::Tsx) => "tsx",
        _ => "mdx",
    };
    let mut languages = Languages::default();
    for file in list_files(dir)? {
        for kind in ConventionKind::ALL {
            let extension = if kind == ConventionKind::Page { page_extension } else { "tsx" };
            if let Some(lang) = extract_lang(&file, kind.stem(), extension) {
                languages.get_mut(kind).push(lang.to_string());
                break;
            }
        }
    }
    Ok(languages)
}

/// Returns `fr` for (`layout.fr.tsx`, `layout`, `tsx`). The middle part must
/// not be empty.
pub fn extract_lang<'a>(filename: &'a str, prefix: &str, extension: &str) -> Option<&'a str> {
    let lang = filename
        .strip_prefix(prefix)?
        .strip_prefix('.')?
        .strip_suffix(extension)?
        .strip_suffix('.')?;
    if lang.is_empty() {
        None
    } else {
        Some(lang)
    }
}

/// File names directly inside `dir`, in file-name order.
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in shallow_walk(dir) {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(files)
}

/// Sub-folders directly inside `dir`, in file-name order.
pub fn list_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in shallow_walk(dir) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

fn shallow_walk(dir: &Path) -> walkdir::IntoIter {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
}
