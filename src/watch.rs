//! File system watcher for live rebuild.
//!
//! Monitors the config file, hotel data, post sources, static pages and
//! assets, rebuilding the site when any of them change.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Event Loop                              │
//! │                                                              │
//! │  ┌──────────┐    ┌──────────┐    ┌────────────────────────┐  │
//! │  │ notify   │───▶│ Debouncer│───▶│    handle_changes()    │  │
//! │  │ events   │    │ (300ms)  │    │                        │  │
//! │  └──────────┘    └──────────┘    │  config? reload_config │  │
//! │                                  │  full rebuild          │  │
//! │                                  │  data? reload snapshot │  │
//! │                                  └────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every change triggers a full rebuild: the whole site is small and most
//! pages depend on the hotel snapshot or the post list.

use crate::{
    build::build_all,
    config::{cfg, reload_config},
    log,
    logger::WatchStatus,
    serve::{Snapshot, reload_snapshot},
    utils::category::{FileCategory, categorize_path, watched_paths},
};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    sync::mpsc::{RecvTimeoutError, channel},
    time::{Duration, Instant},
};
use tokio::runtime::Handle;

// =============================================================================
// Constants
// =============================================================================

const DEBOUNCE_MS: u64 = 300;
const REBUILD_COOLDOWN_MS: u64 = 800;

// =============================================================================
// Path Utilities
// =============================================================================

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// Format path as relative to root for log display.
///
/// `/proj/posts/hello.md` → `posts/hello.md`
fn rel_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// Up to three changed paths, then a count of the rest.
fn describe(paths: &[PathBuf], root: &Path) -> String {
    const SHOWN: usize = 3;
    let mut names: Vec<_> = paths.iter().take(SHOWN).map(|p| rel_path(p, root)).collect();
    if paths.len() > SHOWN {
        names.push(format!("+{} more", paths.len() - SHOWN));
    }
    names.join(", ")
}

// =============================================================================
// Debounce State
// =============================================================================

/// Batches rapid file events with debouncing and rebuild cooldown.
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
            last_rebuild: None,
        }
    }

    fn in_cooldown(&self) -> bool {
        self.last_rebuild
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
    }

    fn add(&mut self, event: Event) {
        for path in event.paths {
            if !is_temp_file(&path) {
                self.pending.insert(path);
            }
        }
        self.last_event = Some(Instant::now());
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<PathBuf> {
        self.last_event = None;
        let mut paths: Vec<_> = self.pending.drain().collect();
        paths.sort();
        paths
    }

    fn mark_rebuild(&mut self) {
        self.last_rebuild = Some(Instant::now());
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_secs(60)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

// =============================================================================
// Event Handler
// =============================================================================

/// Rebuild after `paths` changed. Returns true if a rebuild ran (for cooldown).
fn handle_changes(
    paths: &[PathBuf],
    runtime: &Handle,
    snapshot: &Snapshot,
    status: &mut WatchStatus,
) -> bool {
    let config = cfg();
    let categories: FxHashSet<FileCategory> = paths
        .iter()
        .map(|p| categorize_path(p, &config))
        .filter(|&c| c != FileCategory::Unknown)
        .collect();
    if categories.is_empty() {
        return false;
    }

    let trigger = describe(paths, config.get_root());

    if categories.contains(&FileCategory::Config) {
        match reload_config() {
            Ok(false) if categories.len() == 1 => {
                status.unchanged("config unchanged");
                return false;
            }
            Ok(_) => {}
            Err(e) => {
                status.error("config reload failed, keeping previous config", &format!("{e:#}"));
                return false;
            }
        }
    }

    // Fresh config: the reload above may have replaced it
    if let Err(e) = runtime.block_on(build_all(cfg())) {
        status.error(&format!("rebuild failed ({trigger})"), &format!("{e:#}"));
        return false;
    }

    if categories.iter().any(|c| c.reloads_snapshot()) {
        let _guard = runtime.enter();
        reload_snapshot(snapshot);
    }

    status.success(&format!("rebuilt ({trigger})"));
    true
}

// =============================================================================
// Watcher Setup
// =============================================================================

fn setup_watchers(watcher: &mut impl Watcher) -> Result<()> {
    let config = cfg();
    let root = config.get_root();
    let mut watched = Vec::new();

    for path in watched_paths(&config) {
        let mode = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&path, mode)
            .with_context(|| format!("Failed to watch {}", path.display()))?;

        let suffix = if path.is_dir() { "/" } else { "" };
        watched.push(format!("{}{suffix}", rel_path(&path, root)));
    }

    log!("watch"; "watching {}", watched.join(", "));
    Ok(())
}

const fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

// =============================================================================
// Public API
// =============================================================================

/// Start blocking file watcher with debouncing and live rebuild.
///
/// Rebuilds and snapshot reloads run on `runtime`.
pub fn watch_for_changes_blocking(runtime: &Handle, snapshot: &Snapshot) -> Result<()> {
    let (tx, rx) = channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;
    setup_watchers(&mut watcher)?;

    let mut debouncer = Debouncer::new();
    let mut status = WatchStatus::new();

    loop {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) && !debouncer.in_cooldown() => {
                debouncer.add(event);
            }
            Ok(Err(e)) => log!("watch"; "error: {e}"),
            Err(RecvTimeoutError::Timeout) if debouncer.ready() => {
                if handle_changes(&debouncer.take(), runtime, snapshot, &mut status) {
                    debouncer.mark_rebuild();
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
            // Irrelevant events, timeout without pending paths, cooldown
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        let mut event = Event::new(kind);
        for path in paths {
            event = event.add_path(PathBuf::from(path));
        }
        event
    }

    #[test]
    fn test_is_temp_file() {
        assert!(is_temp_file(Path::new("posts/hello.md~")));
        assert!(is_temp_file(Path::new("posts/.hello.md.swp")));
        assert!(is_temp_file(Path::new("data/hotels.json.bak")));
        assert!(!is_temp_file(Path::new("posts/hello.md")));
    }

    #[test]
    fn test_rel_path_and_describe() {
        let root = Path::new("/site");
        assert_eq!(rel_path(Path::new("/site/posts/a.md"), root), "posts/a.md");
        assert_eq!(rel_path(Path::new("/elsewhere/x"), root), "/elsewhere/x");

        let paths: Vec<_> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|n| PathBuf::from(format!("/site/posts/{n}.md")))
            .collect();
        assert_eq!(
            describe(&paths, root),
            "posts/a.md, posts/b.md, posts/c.md, +2 more"
        );
    }

    #[test]
    fn test_debouncer_batches_and_filters() {
        let mut debouncer = Debouncer::new();
        assert!(!debouncer.ready());
        assert_eq!(debouncer.timeout(), Duration::from_secs(60));

        debouncer.add(event(
            EventKind::Modify(ModifyKind::Any),
            &["/site/posts/b.md", "/site/posts/.b.md.swp"],
        ));
        debouncer.add(event(
            EventKind::Create(CreateKind::File),
            &["/site/posts/a.md", "/site/posts/b.md"],
        ));
        assert_eq!(debouncer.timeout(), Duration::from_millis(DEBOUNCE_MS));
        // Events just arrived: still settling
        assert!(!debouncer.ready());

        assert_eq!(
            debouncer.take(),
            [PathBuf::from("/site/posts/a.md"), PathBuf::from("/site/posts/b.md")]
        );
        assert!(!debouncer.ready());
    }

    #[test]
    fn test_debouncer_ready_after_quiet_period() {
        let mut debouncer = Debouncer::new();
        debouncer.add(event(EventKind::Modify(ModifyKind::Any), &["/site/data/hotels.json"]));
        debouncer.last_event = Some(Instant::now() - Duration::from_millis(DEBOUNCE_MS));
        assert!(debouncer.ready());
    }

    #[test]
    fn test_cooldown() {
        let mut debouncer = Debouncer::new();
        assert!(!debouncer.in_cooldown());
        debouncer.mark_rebuild();
        assert!(debouncer.in_cooldown());
        debouncer.last_rebuild = Some(Instant::now() - Duration::from_millis(REBUILD_COOLDOWN_MS));
        assert!(!debouncer.in_cooldown());
    }

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(&event(EventKind::Modify(ModifyKind::Any), &[])));
        assert!(is_relevant(&event(EventKind::Remove(notify::event::RemoveKind::File), &[])));
        assert!(!is_relevant(&event(EventKind::Access(notify::event::AccessKind::Any), &[])));
    }
}
