//! `wyx` — parse wyx sources and report diagnostics.

mod dump;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use miette::{miette, Result};
use tracing::debug;
use walkdir::WalkDir;
use wyx_parser::LineIndex;
use wyx_pipeline::{parse_files, FileId, OsFileSystem, SourceFileInfo};

#[derive(Parser, Debug)]
#[command(name = "wyx")]
#[command(author, version, about = "Parser front end for the wyx language", long_about = None)]
struct Cli {
    /// Files or directories to parse; directories are searched recursively
    /// for `.wyx` files
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print each file's syntax tree kinds after parsing
    #[arg(long)]
    dump_tree: bool,
}

/// Expands the argument list into a sorted, deduplicated set of source
/// files. Order matters for stable output.
fn collect_sources(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry =
                    entry.map_err(|e| miette!("Failed to walk {}: {e}", path.display()))?;
                if entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "wyx")
                {
                    sources.push(entry.into_path());
                }
            }
        } else {
            sources.push(path.clone());
        }
    }
    sources.sort();
    sources.dedup();
    Ok(sources)
}

fn report(files: &[SourceFileInfo], dump_tree: bool) -> usize {
    let mut errors = 0;
    for file in files {
        if let Some(error) = file.load_error() {
            eprintln!("{}: error: {error}", file.path().display());
            errors += 1;
            continue;
        }
        let Some(tree) = file.tree() else { continue };
        let index = LineIndex::new(tree.source());
        for diagnostic in tree.diagnostics().iter() {
            let (line, col) = index.line_col(diagnostic.span.start);
            eprintln!(
                "{}:{line}:{col}: error[{}]: {}",
                file.path().display(),
                diagnostic.code.name(),
                diagnostic.code.message()
            );
            errors += 1;
        }
        if dump_tree {
            println!("== {}", file.path().display());
            print!("{}", dump::dump_tree(tree));
        }
    }
    errors
}

fn run(cli: &Cli) -> Result<usize> {
    let sources = collect_sources(&cli.paths)?;
    if sources.is_empty() {
        return Err(miette!("No .wyx files found under the given paths"));
    }
    debug!(files = sources.len(), "Collected sources");

    let mut files: Vec<SourceFileInfo> = sources
        .into_iter()
        .enumerate()
        .map(|(i, path)| SourceFileInfo::new(FileId(i as u32), path))
        .collect();
    parse_files(&OsFileSystem, &mut files);

    Ok(report(&files, cli.dump_tree))
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let errors = run(&cli)?;
    if errors > 0 {
        eprintln!("{errors} error(s)");
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn collects_wyx_files_recursively_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.wyx"), "class B { }").unwrap();
        fs::write(dir.path().join("sub/a.wyx"), "class A { }").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let sources = collect_sources(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(sources.len(), 2);
        assert!(sources[0].ends_with("b.wyx"));
        assert!(sources[1].ends_with("sub/a.wyx"));
    }

    #[test]
    fn reports_errors_with_line_and_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.wyx");
        fs::write(&path, "class C {\n    int x public int y;\n}\n").unwrap();

        let mut files = vec![SourceFileInfo::new(FileId(0), path)];
        parse_files(&OsFileSystem, &mut files);
        let errors = report(&files, false);
        assert_eq!(errors, 1);
    }
}
