//! Watch mode
//!
//! File events are collapsed by a trailing debounce window per watched root:
//! every event pushes that root's deadline back, and the root is regenerated
//! once its deadline passes without new events.

use crate::error::Result;
use crate::pipeline::{GenerationOutcome, OutputSink, RouteGenerator};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Trailing debounce deadlines, one slot per root.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadlines: Vec<Option<Instant>>,
}

impl Debouncer {
    pub fn new(roots: usize, delay: Duration) -> Self {
        Self {
            delay,
            deadlines: vec![None; roots],
        }
    }

    /// Records an event for root `index`, resetting its window.
    pub fn touch(&mut self, index: usize, now: Instant) {
        if let Some(deadline) = self.deadlines.get_mut(index) {
            *deadline = Some(now + self.delay);
        }
    }

    /// Time until the earliest pending deadline, `None` when idle.
    pub fn next_timeout(&self, now: Instant) -> Option<Duration> {
        self.deadlines
            .iter()
            .flatten()
            .min()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Roots whose window has elapsed. Their deadlines are cleared.
    pub fn take_due(&mut self, now: Instant) -> Vec<usize> {
        let mut due = Vec::new();
        for (index, deadline) in self.deadlines.iter_mut().enumerate() {
            if matches!(deadline, Some(at) if *at <= now) {
                *deadline = None;
                due.push(index);
            }
        }
        due
    }

    pub fn is_idle(&self) -> bool {
        self.deadlines.iter().all(Option::is_none)
    }
}

/// Index of the root containing `path`. Nested roots resolve to the deepest.
pub fn root_index(roots: &[&Path], path: &Path) -> Option<usize> {
    roots
        .iter()
        .enumerate()
        .filter(|(_, root)| path.starts_with(root))
        .max_by_key(|(_, root)| root.components().count())
        .map(|(index, _)| index)
}

/// Blocks forever, regenerating each root after its own debounce window.
/// `report` sees every successful pass; failures are logged and the loop goes
/// on with the previous output left in place.
pub fn watch<S, F>(generators: &mut [RouteGenerator<S>], delay: Duration, mut report: F) -> Result<()>
where
    S: OutputSink,
    F: FnMut(&Path, &GenerationOutcome),
{
    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Err(e) = tx.send(res) {
                log::error!("Watch error: {}", e);
            }
        },
        notify::Config::default(),
    )?;
    for generator in generators.iter() {
        watcher.watch(generator.root(), RecursiveMode::Recursive)?;
        log::info!("Watching: {}", generator.root().display());
    }

    let mut debouncer = Debouncer::new(generators.len(), delay);
    loop {
        let received = match debouncer.next_timeout(Instant::now()) {
            Some(timeout) => rx.recv_timeout(timeout),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(Ok(event)) => {
                if event.kind.is_access() {
                    continue;
                }
                let roots: Vec<&Path> = generators.iter().map(|g| g.root()).collect();
                let now = Instant::now();
                for path in &event.paths {
                    if let Some(index) = root_index(&roots, path) {
                        log::trace!("{:?} on {}", event.kind, path.display());
                        debouncer.touch(index, now);
                    }
                }
            }
            Ok(Err(e)) => log::warn!("Watch error: {}", e),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("File watcher stopped");
                return Ok(());
            }
        }

        for index in debouncer.take_due(Instant::now()) {
            let generator = &mut generators[index];
            match generator.regenerate() {
                Ok(outcome) => report(generator.root(), &outcome),
                Err(e) => log::error!("Generation failed for {}: {}", generator.root().display(), e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_burst_collapses_to_one_pass() {
        let start = Instant::now();
        let delay = Duration::from_millis(300);
        let mut debouncer = Debouncer::new(1, delay);
        assert!(debouncer.is_idle());
        assert_eq!(debouncer.next_timeout(start), None);

        for step in 0..10 {
            debouncer.touch(0, start + Duration::from_millis(step * 50));
        }
        let last = start + Duration::from_millis(450);
        assert!(debouncer.take_due(last + Duration::from_millis(299)).is_empty());
        assert_eq!(debouncer.take_due(last + delay), vec![0]);
        assert!(debouncer.take_due(last + delay * 2).is_empty());
        assert!(debouncer.is_idle());
    }

    #[test]
    fn test_roots_have_independent_windows() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(2, Duration::from_millis(100));
        debouncer.touch(0, start);
        debouncer.touch(1, start + Duration::from_millis(80));

        assert_eq!(
            debouncer.next_timeout(start + Duration::from_millis(20)),
            Some(Duration::from_millis(80))
        );
        assert_eq!(debouncer.take_due(start + Duration::from_millis(100)), vec![0]);
        assert_eq!(debouncer.take_due(start + Duration::from_millis(180)), vec![1]);
    }

    #[test]
    fn test_touch_ignores_unknown_root() {
        let mut debouncer = Debouncer::new(1, Duration::from_millis(10));
        debouncer.touch(5, Instant::now());
        assert!(debouncer.is_idle());
    }

    #[test]
    fn test_overdue_timeout_is_zero() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(1, Duration::from_millis(10));
        debouncer.touch(0, start);
        assert_eq!(
            debouncer.next_timeout(start + Duration::from_secs(1)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_root_index_prefers_deepest_root() {
        let app = PathBuf::from("/work/app");
        let admin = PathBuf::from("/work/app/admin");
        let roots = [app.as_path(), admin.as_path()];

        assert_eq!(root_index(&roots, Path::new("/work/app/about/page.tsx")), Some(0));
        assert_eq!(root_index(&roots, Path::new("/work/app/admin/page.tsx")), Some(1));
        assert_eq!(root_index(&roots, Path::new("/work/application/page.tsx")), None);
    }
}
