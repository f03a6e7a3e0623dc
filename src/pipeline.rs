//! Generation pipeline
//!
//! One pass is: build the route tree, flatten it, compare the resulting
//! structure with the previous pass, and only when it changed render and write
//! the generated modules. Skipping unchanged passes matters in watch mode: the
//! generated files live inside the watched folder, so rewriting them would
//! trigger another pass.

use crate::builder::build_route_tree;
use crate::codegen::{self, GeneratedFile};
use crate::error::Result;
use crate::flatten::flatten_routes;
use crate::types::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Where the rendered modules go.
pub trait OutputSink {
    /// Writes `file`, returning `false` when nothing had to be written.
    fn write(&mut self, file: &GeneratedFile) -> Result<bool>;
}

/// Writes to disk, leaving files with identical content untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSink;

impl OutputSink for FsSink {
    fn write(&mut self, file: &GeneratedFile) -> Result<bool> {
        if let Ok(current) = fs::read_to_string(&file.path) {
            if current == file.contents {
                log::debug!("{} is up to date", file.path.display());
                return Ok(false);
            }
        }
        fs::write(&file.path, &file.contents)?;
        log::debug!("Wrote {}", file.path.display());
        Ok(true)
    }
}

/// Generation statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    /// Routes that survived flattening
    pub route_count: usize,

    /// Routes with a page of their own
    pub page_count: usize,

    /// Modules actually written (identical files are skipped)
    pub files_written: usize,

    /// Wall-clock time of the pass in milliseconds
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The route structure did not change since the previous pass.
    Unchanged,
    Generated(GenerationStats),
}

/// Generator state for one watched folder.
pub struct RouteGenerator<S: OutputSink = FsSink> {
    root: PathBuf,
    sink: S,
    exec: Option<String>,
    fingerprint: Option<String>,
}

impl RouteGenerator<FsSink> {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_sink(root, FsSink)
    }
}

impl<S: OutputSink> RouteGenerator<S> {
    pub fn with_sink(root: impl Into<PathBuf>, sink: S) -> Self {
        Self {
            root: root.into(),
            sink,
            exec: None,
            fingerprint: None,
        }
    }

    /// Shell command run after every pass that wrote something.
    pub fn with_exec(mut self, command: Option<String>) -> Self {
        self.exec = command.filter(|command| !command.trim().is_empty());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Runs one pass. On error the previous fingerprint is kept, so the next
    /// pass retries.
    pub fn regenerate(&mut self) -> Result<GenerationOutcome> {
        let start_time = Instant::now();
        let tree = build_route_tree(&self.root)?;
        let routes = flatten_routes(&tree);

        let current = fingerprint(&stringify_routes(&self.root, &routes));
        if self.fingerprint.as_deref() == Some(current.as_str()) {
            log::debug!("Route structure of {} is unchanged", self.root.display());
            return Ok(GenerationOutcome::Unchanged);
        }

        log_routes(&routes);
        let files = codegen::generate(&tree, &routes)?;
        let mut files_written = 0;
        for file in &files {
            if self.sink.write(file)? {
                files_written += 1;
            }
        }
        // The generated modules may only exist now.
        self.fingerprint = Some(fingerprint(&stringify_routes(&self.root, &routes)));

        if files_written > 0 {
            if let Some(command) = &self.exec {
                let _ = run_hook(command, &self.root);
            }
        }

        let stats = GenerationStats {
            route_count: routes.len(),
            page_count: routes.iter().filter(|route| route.page.is_some()).count(),
            files_written,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        };
        log::info!(
            "Generated {} route(s) in {}ms ({} file(s) written)",
            stats.route_count,
            stats.elapsed_ms,
            stats.files_written
        );
        Ok(GenerationOutcome::Generated(stats))
    }
}

/// Everything a pass depends on: one line per route, then which generated
/// modules are on disk.
pub fn stringify_routes(root: &Path, routes: &[&Route]) -> String {
    let mut lines: Vec<String> = routes
        .iter()
        .map(|route| {
            format!(
                "{{{},{:?},{},{},{},{},{:?},{}}}",
                route.name,
                route.page,
                route.layout,
                route.loading,
                route.template,
                route.access,
                route.languages,
                route.path.display()
            )
        })
        .collect();
    for module in [TYPES_MODULE, ROUTES_MODULE, INDEX_MODULE] {
        lines.push(format!("{}:{}", module, root.join(module).exists()));
    }
    lines.join("\n")
}

pub fn fingerprint(structure: &str) -> String {
    format!("{:x}", md5::compute(structure.as_bytes()))
}

fn log_routes(routes: &[&Route]) {
    for route in routes {
        let mut parts = Vec::new();
        if let Some(page) = route.page {
            parts.push(format!("page.{}", page));
        }
        for (present, label) in [
            (route.layout, "layout"),
            (route.loading, "loading"),
            (route.template, "template"),
            (route.access, "access"),
        ] {
            if present {
                parts.push(label.to_string());
            }
        }
        for kind in ConventionKind::ALL {
            let languages = route.languages.get(kind);
            if languages.len() > 1 {
                parts.push(format!("{}[{}]", kind, languages[1..].join(",")));
            }
        }
        log::info!("{:<32} {}", route.name, parts.join(" "));
    }
}

/// Spawns `command` through the platform shell. Generation does not wait for
/// it; a detached thread reaps the child and reports its exit status.
fn run_hook(command: &str, root: &Path) -> Option<JoinHandle<Option<ExitStatus>>> {
    let mut process = if cfg!(windows) {
        let mut process = Command::new("cmd");
        process.args(["/C", command]);
        process
    } else {
        let mut process = Command::new("sh");
        process.args(["-c", command]);
        process
    };
    let mut child = match process.current_dir(root).spawn() {
        Ok(child) => child,
        Err(e) => {
            log::error!("Cannot run \"{}\": {}", command, e);
            return None;
        }
    };
    log::debug!("Started \"{}\" (pid {})", command, child.id());

    let command = command.to_string();
    let reaper_command = command.clone();
    let reaper = thread::Builder::new()
        .name("fsroutes-hook".to_string())
        .spawn(move || {
            let command = reaper_command;
            match child.wait() {
                Ok(status) => {
                    log::debug!("\"{}\" exited with {}", command, status);
                    Some(status)
                }
                Err(e) => {
                    log::error!("Cannot wait for \"{}\": {}", command, e);
                    None
                }
            }
        });
    match reaper {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::error!("Cannot reap \"{}\": {}", command, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<GeneratedFile>,
    }

    impl OutputSink for RecordingSink {
        fn write(&mut self, file: &GeneratedFile) -> Result<bool> {
            self.writes.push(file.clone());
            Ok(true)
        }
    }

    fn page(root: &Path, folder: &str) {
        let dir = root.join(folder);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(PAGE_TSX), "export default null\n").unwrap();
    }

    #[test]
    fn test_unchanged_structure_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        page(temp_dir.path(), "about");

        let mut generator = RouteGenerator::with_sink(temp_dir.path(), RecordingSink::default());
        let first = generator.regenerate().unwrap();
        assert!(matches!(first, GenerationOutcome::Generated(ref stats) if stats.files_written == 3));
        assert_eq!(generator.sink().writes.len(), 3);

        let second = generator.regenerate().unwrap();
        assert_eq!(second, GenerationOutcome::Unchanged);
        assert_eq!(generator.sink().writes.len(), 3);
    }

    #[test]
    fn test_structure_change_regenerates() {
        let temp_dir = TempDir::new().unwrap();
        page(temp_dir.path(), "about");

        let mut generator = RouteGenerator::with_sink(temp_dir.path(), RecordingSink::default());
        generator.regenerate().unwrap();

        page(temp_dir.path(), "contact");
        match generator.regenerate().unwrap() {
            GenerationOutcome::Generated(stats) => {
                assert_eq!(stats.route_count, 3);
                assert_eq!(stats.page_count, 2);
            }
            GenerationOutcome::Unchanged => panic!("new page must trigger generation"),
        }
        assert_eq!(generator.sink().writes.len(), 6);
    }

    #[test]
    fn test_fs_sink_writes_into_root() {
        let temp_dir = TempDir::new().unwrap();
        page(temp_dir.path(), "about");

        let mut generator = RouteGenerator::new(temp_dir.path());
        generator.regenerate().unwrap();
        for module in [INDEX_MODULE, ROUTES_MODULE, TYPES_MODULE] {
            assert!(temp_dir.path().join(module).exists(), "missing {}", module);
        }
        let types = fs::read_to_string(temp_dir.path().join(TYPES_MODULE)).unwrap();
        assert!(types.contains("| \"/about\""));

        // Deleting the output forces the next pass.
        fs::remove_file(temp_dir.path().join(INDEX_MODULE)).unwrap();
        assert!(matches!(generator.regenerate().unwrap(), GenerationOutcome::Generated(_)));
        assert!(temp_dir.path().join(INDEX_MODULE).exists());
    }

    #[test]
    fn test_deleted_module_is_rewritten() {
        let temp_dir = TempDir::new().unwrap();
        page(temp_dir.path(), "about");

        let mut generator = RouteGenerator::new(temp_dir.path());
        generator.regenerate().unwrap();
        assert_eq!(generator.regenerate().unwrap(), GenerationOutcome::Unchanged);

        for module in [ROUTES_MODULE, TYPES_MODULE] {
            fs::remove_file(temp_dir.path().join(module)).unwrap();
            match generator.regenerate().unwrap() {
                GenerationOutcome::Generated(stats) => assert_eq!(stats.files_written, 1),
                GenerationOutcome::Unchanged => panic!("missing {} must trigger generation", module),
            }
            assert!(temp_dir.path().join(module).exists(), "missing {}", module);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_hook_child_is_reaped() {
        let temp_dir = TempDir::new().unwrap();
        let reaper = run_hook("echo done > hook.txt; exit 3", temp_dir.path()).unwrap();
        let status = reaper.join().unwrap().unwrap();
        assert_eq!(status.code(), Some(3));
        assert_eq!(fs::read_to_string(temp_dir.path().join("hook.txt")).unwrap(), "done\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_hook_runs_only_after_writes() {
        let temp_dir = TempDir::new().unwrap();
        page(temp_dir.path(), "about");

        let mut generator = RouteGenerator::new(temp_dir.path()).with_exec(Some("echo x >> hook.log".to_string()));
        generator.regenerate().unwrap();
        assert_eq!(generator.regenerate().unwrap(), GenerationOutcome::Unchanged);

        let log = temp_dir.path().join("hook.log");
        let deadline = Instant::now() + std::time::Duration::from_secs(5);
        while !log.exists() && Instant::now() < deadline {
            thread::sleep(std::time::Duration::from_millis(20));
        }
        thread::sleep(std::time::Duration::from_millis(100));
        assert_eq!(fs::read_to_string(&log).unwrap(), "x\n");
    }

    #[test]
    fn test_fs_sink_skips_identical_content() {
        let temp_dir = TempDir::new().unwrap();
        let file = GeneratedFile {
            path: temp_dir.path().join("routes.ts"),
            contents: "export {}\n".to_string(),
        };
        let mut sink = FsSink;
        assert!(sink.write(&file).unwrap());
        assert!(!sink.write(&file).unwrap());
    }

    #[test]
    fn test_fingerprint_is_md5_hex() {
        let digest = fingerprint("");
        assert_eq!(digest, "d41d8cd98f00b204e9800998ecf8427e");
        assert_ne!(fingerprint("{/a}"), fingerprint("{/b}"));
    }

    #[test]
    fn test_missing_root_keeps_previous_state() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("app");
        page(&root, "about");

        let mut generator = RouteGenerator::with_sink(&root, RecordingSink::default());
        generator.regenerate().unwrap();
        fs::remove_dir_all(&root).unwrap();
        assert!(generator.regenerate().is_err());
        assert_eq!(generator.sink().writes.len(), 3);
    }
}
