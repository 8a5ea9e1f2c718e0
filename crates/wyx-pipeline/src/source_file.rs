//! Per-file bookkeeping.
//!
//! A [`SourceFileInfo`] owns everything derived from one file: the parse
//! product, dependency edges and change-tracking state. During the
//! parallel parse each task holds `&mut` to exactly one record, so no
//! locking happens on the hot path; the mutex only guards the side arena
//! used for allocations after the parse has been shared.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use tracing::debug;
use wyx_parser::{Arena, SyntaxTree};

use crate::error::Error;

/// Stable identity of a file within one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

pub struct SourceFileInfo {
    id: FileId,
    path: PathBuf,
    /// Package the file belongs to, once ownership is computed.
    pub package: Option<String>,
    /// Modification time observed when the file was last scheduled.
    edit_time: Option<SystemTime>,
    tree: Option<SyntaxTree>,
    /// Set when the file could not be read; the job records it and moves on.
    load_error: Option<Error>,
    /// Files this file depends on / files that depend on this one.
    pub dependencies: Vec<FileId>,
    pub dependents: Vec<FileId>,
    /// Seen by the current job.
    pub touched: bool,
    /// Reparsed by the current job.
    pub changed: bool,
    /// Arena recycled from the previous parse, reused by the next one.
    recycled: Option<Arena>,
    /// Post-parse allocations from other threads land here, never in the
    /// parse arena.
    side_arena: Mutex<Arena>,
}

// SAFETY: the only `!Sync` state is the `Bump` inside `recycled`, which is
// reached exclusively through `&mut self` (`take_recycled_arena`,
// `invalidate`); `tree` is a `SyntaxTree`, which is `Sync` by its own
// contract, and cross-thread allocation goes through the mutex-guarded
// `side_arena`.
unsafe impl Sync for SourceFileInfo {}

impl SourceFileInfo {
    #[must_use]
    pub fn new(id: FileId, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            path: path.into(),
            package: None,
            edit_time: None,
            tree: None,
            load_error: None,
            dependencies: Vec::new(),
            dependents: Vec::new(),
            touched: false,
            changed: false,
            recycled: None,
            side_arena: Mutex::new(Arena::new()),
        }
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parse product, if the file has been parsed since its last
    /// invalidation.
    pub fn tree(&self) -> Option<&SyntaxTree> {
        self.tree.as_ref()
    }

    pub fn load_error(&self) -> Option<&Error> {
        self.load_error.as_ref()
    }

    pub(crate) fn set_tree(&mut self, tree: SyntaxTree) {
        self.tree = Some(tree);
        self.load_error = None;
        self.changed = true;
    }

    pub(crate) fn set_load_error(&mut self, error: Error) {
        self.tree = None;
        self.load_error = Some(error);
    }

    pub(crate) fn take_recycled_arena(&mut self) -> Arena {
        self.recycled.take().unwrap_or_default()
    }

    /// Drops every derived product: the tree, the dependency edges and the
    /// change flags. The parse arena is recycled for the next parse of
    /// this file.
    pub fn invalidate(&mut self) {
        if let Some(tree) = self.tree.take() {
            let mut arena = tree.into_arena();
            arena.reset();
            self.recycled = Some(arena);
        }
        self.load_error = None;
        self.dependencies.clear();
        self.dependents.clear();
        self.touched = false;
        self.changed = false;
        debug!(path = %self.path.display(), "Invalidated file record");
    }

    /// Records a newly observed modification time; a moved time
    /// invalidates the file so the next job reparses it.
    pub fn observe_edit_time(&mut self, time: SystemTime) {
        if self.edit_time != Some(time) {
            if self.edit_time.is_some() {
                self.invalidate();
            }
            self.edit_time = Some(time);
        }
    }

    /// Runs `f` with the side arena locked. Allocations made here survive
    /// until the record itself is dropped, independent of reparses.
    pub fn with_side_arena<R>(&self, f: impl FnOnce(&Arena) -> R) -> R {
        let arena = self.side_arena.lock().unwrap();
        f(&arena)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn invalidate_clears_derived_state_and_recycles_arena() {
        let mut file = SourceFileInfo::new(FileId(0), "/src/a.wyx");
        file.set_tree(SyntaxTree::parse("class A { }"));
        file.dependencies.push(FileId(1));
        file.dependents.push(FileId(2));
        file.touched = true;
        assert!(file.tree().is_some());

        file.invalidate();
        assert!(file.tree().is_none());
        assert!(file.dependencies.is_empty());
        assert!(file.dependents.is_empty());
        assert!(!file.touched && !file.changed);

        let arena = file.take_recycled_arena();
        assert_eq!(arena.allocated_bytes(), 0);
    }

    #[test]
    fn moved_edit_time_invalidates() {
        let now = SystemTime::now();
        let mut file = SourceFileInfo::new(FileId(0), "/src/a.wyx");
        file.observe_edit_time(now);
        file.set_tree(SyntaxTree::parse("class A { }"));

        // same time: nothing happens
        file.observe_edit_time(now);
        assert!(file.tree().is_some());

        file.observe_edit_time(now + Duration::from_secs(1));
        assert!(file.tree().is_none());
    }

    #[test]
    fn side_arena_usable_across_threads() {
        let file = SourceFileInfo::new(FileId(0), "/src/a.wyx");
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    file.with_side_arena(|arena| {
                        let s = arena.alloc_str("shared");
                        assert_eq!(s, "shared");
                    });
                });
            }
        });
    }
}
