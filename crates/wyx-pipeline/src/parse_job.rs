//! The parallel parse job.
//!
//! One rayon task per file; every task owns its record exclusively, so the
//! parallel section takes no locks. Output is deterministic because a
//! file's parse depends only on that file's text.

use rayon::prelude::*;
use tracing::{debug, info};
use wyx_parser::SyntaxTree;

use crate::source_file::SourceFileInfo;
use crate::vfs::FileSystem;

/// What the job did, for logging and exit codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Files parsed by this job (the rest were already up to date).
    pub parsed: usize,
    /// Files that could not be read.
    pub failed: usize,
    /// Syntax diagnostics across all parsed files.
    pub diagnostics: usize,
}

/// Parses every file record that has no current tree. Unreadable files get
/// their error recorded on the record and the job keeps going.
pub fn parse_files(fs: &dyn FileSystem, files: &mut [SourceFileInfo]) -> ParseStats {
    let start = std::time::Instant::now();

    files.par_iter_mut().for_each(|file| {
        file.touched = true;
        // `changed` reports this job only, not earlier ones
        file.changed = false;
        if file.tree().is_some() {
            return;
        }
        parse_one(fs, file);
    });

    let mut stats = ParseStats::default();
    for file in files.iter() {
        if file.changed {
            stats.parsed += 1;
        }
        if file.load_error().is_some() {
            stats.failed += 1;
        }
        if let Some(tree) = file.tree() {
            stats.diagnostics += tree.diagnostics().len();
        }
    }
    info!(
        files = files.len(),
        parsed = stats.parsed,
        failed = stats.failed,
        diagnostics = stats.diagnostics,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Parse job finished"
    );
    stats
}

fn parse_one(fs: &dyn FileSystem, file: &mut SourceFileInfo) {
    let _span = tracing::debug_span!("parse_file", path = %file.path().display()).entered();
    match fs.read_file_text(file.path()) {
        Ok(text) => {
            let arena = file.take_recycled_arena();
            let tree = SyntaxTree::parse_in(&text, arena);
            debug!(
                bytes = text.len(),
                tokens = tree.tokens().len(),
                diagnostics = tree.diagnostics().len(),
                "Parsed"
            );
            file.set_tree(tree);
        }
        Err(error) => {
            debug!(error = %error, "Read failed");
            file.set_load_error(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_file::FileId;
    use crate::vfs::MemoryFileSystem;

    fn records(paths: &[&str]) -> Vec<SourceFileInfo> {
        paths
            .iter()
            .enumerate()
            .map(|(i, p)| SourceFileInfo::new(FileId(i as u32), *p))
            .collect()
    }

    #[test]
    fn parses_every_file_once() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/a.wyx", "class A { int x; }");
        fs.add_file("/b.wyx", "class B { }");
        let mut files = records(&["/a.wyx", "/b.wyx"]);

        let stats = parse_files(&fs, &mut files);
        assert_eq!(stats.parsed, 2);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.diagnostics, 0);
        assert!(files.iter().all(|f| f.tree().is_some() && f.touched));

        // second run: everything up to date, nothing re-reported
        let stats = parse_files(&fs, &mut files);
        assert_eq!(stats.parsed, 0);
        assert!(files.iter().all(|f| f.tree().is_some()));
    }

    #[test]
    fn unreadable_file_does_not_stop_the_job() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/a.wyx", "class A { }");
        let mut files = records(&["/a.wyx", "/missing.wyx", "/b.wyx"]);
        fs.add_file("/b.wyx", "class B { }");

        let stats = parse_files(&fs, &mut files);
        assert_eq!(stats.parsed, 2);
        assert_eq!(stats.failed, 1);
        assert!(files[1].load_error().is_some());
        assert!(files[0].tree().is_some());
        assert!(files[2].tree().is_some());
    }

    #[test]
    fn syntax_errors_land_on_the_record() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/bad.wyx", "class C { int x public int y; }");
        let mut files = records(&["/bad.wyx"]);

        let stats = parse_files(&fs, &mut files);
        assert_eq!(stats.failed, 0);
        assert!(stats.diagnostics >= 1);
        assert!(files[0].tree().is_some());
    }
}
