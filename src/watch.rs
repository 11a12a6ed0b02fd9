//! Filesystem watch trigger for full rebuilds.
//!
//! A recursive watcher observes the whole project directory. Events are
//! debounced so a burst of rapid changes coalesces into a single rebuild,
//! and rebuilds run on the event loop's own thread, so at most one build
//! is ever in flight. Every rebuild re-reads the project manifest, picking
//! up edits to `project.yaml` itself.

use crate::build::Anvil;
use crate::log;
use crate::logger;
use anyhow::{Context as _, Result};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::{Component, Path};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

/// Settle window after the last event before a rebuild fires.
const DEBOUNCE_MS: u64 = 300;

/// Idle poll interval; bounds how long shutdown can lag behind Ctrl-C.
const IDLE_TICK_MS: u64 = 500;

/// Version-control metadata, never a rebuild trigger.
const VCS_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// vim probes write permission with a transient file of this name.
const EDITOR_LOCK_FILE: &str = "4913";

/// Watch `project_dir` recursively and run a full rebuild once changes
/// settle. Blocks until Ctrl-C, then stops the watcher and returns.
pub fn watch_for_changes_blocking(project_dir: &Path, output_dir: &Path) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("cannot create file watcher")?;
    watcher
        .watch(project_dir, RecursiveMode::Recursive)
        .with_context(|| format!("cannot watch {}", project_dir.display()))?;

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))
            .context("cannot install Ctrl-C handler")?;
    }

    log!("watch"; "watching {} for changes", project_dir.display());

    let mut debouncer = Debouncer::new();
    while !interrupted.load(Ordering::SeqCst) {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) if is_relevant(&event) => {
                for path in &event.paths {
                    if is_ignored(path) {
                        continue;
                    }
                    logger::log_timestamped(
                        "watch",
                        &format!("{} {}", describe_kind(&event.kind), display_name(path)),
                    );
                    debouncer.touch();
                }
            }
            Ok(Ok(_)) => {}
            Ok(Err(err)) => log!("watch"; "error: {err}"),
            Err(RecvTimeoutError::Timeout) if debouncer.ready() => {
                debouncer.clear();
                rebuild(project_dir, output_dir);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    log!("watch"; "shutting down");
    // Dropping the watcher stops its backend and joins the notification
    // thread before we return.
    drop(watcher);
    Ok(())
}

/// One full rebuild over fresh state. A failed rebuild is logged and the
/// watcher stays alive; the output keeps its last good state until the
/// next successful pass.
fn rebuild(project_dir: &Path, output_dir: &Path) {
    log!("watch"; "rebuilding...");
    match Anvil::new(project_dir, output_dir, false).and_then(|anvil| anvil.build()) {
        Ok(()) => log!("watch"; "rebuild complete"),
        Err(err) => log!("error"; "{err}"),
    }
}

// =============================================================================
// Event classification
// =============================================================================

fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

fn describe_kind(kind: &EventKind) -> &'static str {
    match kind {
        EventKind::Create(_) => "created",
        EventKind::Modify(ModifyKind::Name(_)) => "moved",
        EventKind::Modify(_) => "modified",
        EventKind::Remove(_) => "deleted",
        _ => "changed",
    }
}

/// Entry base name for event logging, with a trailing separator for
/// directories.
fn display_name(path: &Path) -> String {
    let name = path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    );
    if path.is_dir() { format!("{name}/") } else { name }
}

/// Check whether a changed path should be ignored: VCS metadata, editor
/// swap/backup files, dotfiles, and vim's transient lock file.
fn is_ignored(path: &Path) -> bool {
    let in_vcs_dir = path.components().any(|component| {
        matches!(
            component,
            Component::Normal(name) if VCS_DIRS.contains(&name.to_string_lossy().as_ref())
        )
    });
    if in_vcs_dir {
        return true;
    }

    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "swp" | "swo" | "swx" | "tmp" | "bak")
        || name.ends_with('~')
        || name.starts_with('.')
        || name == EDITOR_LOCK_FILE
}

// =============================================================================
// Debounce state
// =============================================================================

/// Coalesces rapid successive events into one pending rebuild.
struct Debouncer {
    pending: bool,
    last_event: Option<Instant>,
}

impl Debouncer {
    const fn new() -> Self {
        Self {
            pending: false,
            last_event: None,
        }
    }

    fn touch(&mut self) {
        self.pending = true;
        self.last_event = Some(Instant::now());
    }

    fn ready(&self) -> bool {
        self.pending
            && self
                .last_event
                .is_some_and(|at| at.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn clear(&mut self) {
        self.pending = false;
        self.last_event = None;
    }

    fn timeout(&self) -> Duration {
        if self.pending {
            Duration::from_millis(DEBOUNCE_MS)
        } else {
            Duration::from_millis(IDLE_TICK_MS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, RemoveKind, RenameMode};
    use std::path::PathBuf;

    #[test]
    fn vcs_metadata_is_ignored() {
        assert!(is_ignored(Path::new("site/.git/objects/ab/cdef")));
        assert!(is_ignored(Path::new("site/.hg/dirstate")));
        assert!(is_ignored(Path::new("site/.svn/wc.db")));
    }

    #[test]
    fn editor_artifacts_are_ignored() {
        assert!(is_ignored(Path::new("site/pages/.index.md.swp")));
        assert!(is_ignored(Path::new("site/pages/index.md~")));
        assert!(is_ignored(Path::new("site/pages/index.bak")));
        assert!(is_ignored(Path::new("site/pages/4913")));
    }

    #[test]
    fn ordinary_source_files_are_not_ignored() {
        assert!(!is_ignored(Path::new("site/project.yaml")));
        assert!(!is_ignored(Path::new("site/pages/index.md")));
        assert!(!is_ignored(Path::new("site/templates/base.html")));
    }

    #[test]
    fn event_kinds_map_to_verbs() {
        assert_eq!(describe_kind(&EventKind::Create(CreateKind::File)), "created");
        assert_eq!(
            describe_kind(&EventKind::Modify(ModifyKind::Data(
                notify::event::DataChange::Content
            ))),
            "modified"
        );
        assert_eq!(
            describe_kind(&EventKind::Modify(ModifyKind::Name(RenameMode::Both))),
            "moved"
        );
        assert_eq!(describe_kind(&EventKind::Remove(RemoveKind::File)), "deleted");
    }

    #[test]
    fn access_events_are_irrelevant() {
        let event = Event::new(EventKind::Access(notify::event::AccessKind::Open(
            notify::event::AccessMode::Read,
        )));
        assert!(!is_relevant(&event));
    }

    #[test]
    fn missing_file_display_name_has_no_separator() {
        let name = display_name(&PathBuf::from("site/pages/gone.md"));
        assert_eq!(name, "gone.md");
    }

    #[test]
    fn debouncer_waits_for_the_settle_window() {
        let mut debouncer = Debouncer::new();
        assert!(!debouncer.ready());
        assert_eq!(debouncer.timeout(), Duration::from_millis(IDLE_TICK_MS));

        debouncer.touch();
        assert!(!debouncer.ready());
        assert_eq!(debouncer.timeout(), Duration::from_millis(DEBOUNCE_MS));

        std::thread::sleep(Duration::from_millis(DEBOUNCE_MS + 50));
        assert!(debouncer.ready());

        debouncer.clear();
        assert!(!debouncer.ready());
    }
}
