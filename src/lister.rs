//! Directory traversal and per-entry dispatch.
//!
//! A directory's own entries are always fully listed before any recorded
//! subdirectory is descended into, and no failure is ever fatal to the run:
//! each one is reported through the [`Reporter`] and traversal moves on to
//! the next sibling or directory.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::format::{self, FormatConfig};
use crate::identity::IdentityResolver;
use crate::provider::{EntryKind, EntryMetadata, MetadataProvider};
use crate::status::{Reporter, RunStatus};

/// Listing mode flags resolved from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    /// Long-format metadata lines instead of bare names.
    pub long: bool,
    /// Include hidden entries (names starting with '.').
    pub all: bool,
    /// Descend into subdirectories after each directory's listing.
    pub recursive: bool,
    /// Tally entries instead of printing them; one total at the end.
    pub count_only: bool,
}

/// What listing one entry produced, so the enclosing directory walk can
/// reuse already-fetched metadata for its recursion decision.
enum ListOutcome {
    /// Entry rendered; carries the metadata fetched for it.
    Listed(EntryMetadata),
    /// Count mode: tallied without fetching metadata.
    Counted,
    /// Metadata fetch failed and was reported; entry skipped.
    Failed,
}

/// Drives the whole listing: enumeration, per-entry rendering, subdirectory
/// recursion, and the multi-argument dispatch.
pub struct Lister<'a, W: Write, E: Write> {
    provider: &'a dyn MetadataProvider,
    identity: &'a dyn IdentityResolver,
    options: ListOptions,
    format: FormatConfig,
    out: W,
    reporter: Reporter<E>,
}

impl<'a, W: Write, E: Write> Lister<'a, W, E> {
    pub fn new(
        provider: &'a dyn MetadataProvider,
        identity: &'a dyn IdentityResolver,
        options: ListOptions,
        format: FormatConfig,
        out: W,
        reporter: Reporter<E>,
    ) -> Self {
        Self {
            provider,
            identity,
            options,
            format,
            out,
            reporter,
        }
    }

    /// List every requested path: the current directory when `paths` is
    /// empty, otherwise each argument in order. Directory arguments get a
    /// `path:` header when more than one argument was given or recursion is
    /// on, and a separating blank line when further arguments follow.
    pub fn run(&mut self, paths: &[PathBuf]) -> io::Result<()> {
        if paths.is_empty() {
            let cwd = Path::new(".");
            if self.options.recursive && !self.options.count_only {
                writeln!(self.out, "{}:", cwd.display())?;
            }
            self.list_dir(cwd)?;
        } else {
            let multiple = paths.len() > 1;
            for (index, path) in paths.iter().enumerate() {
                let meta = match self.provider.stat(path) {
                    Ok(meta) => meta,
                    Err(e) => {
                        self.reporter.report("cannot access", path, &e);
                        continue;
                    }
                };
                if meta.is_dir() {
                    if (multiple || self.options.recursive) && !self.options.count_only {
                        writeln!(self.out, "{}:", path.display())?;
                    }
                    self.list_dir(path)?;
                    if index + 1 < paths.len() && !self.options.count_only {
                        writeln!(self.out)?;
                    }
                } else {
                    // A plain-file argument is listed under the name it was
                    // given on the command line.
                    let name = path.to_string_lossy();
                    self.list_file(path, &name)?;
                }
            }
        }

        if self.options.count_only {
            writeln!(self.out, "{}", self.reporter.entries())?;
        }
        Ok(())
    }

    /// Finish the run and hand back the accumulated status.
    pub fn into_status(self) -> RunStatus {
        self.reporter.into_status()
    }

    /// List one directory: immediate entries first, then, if recursion is
    /// on, each subdirectory recorded during the listing, in order.
    fn list_dir(&mut self, dir: &Path) -> io::Result<()> {
        let names = match self.provider.list_entries(dir) {
            Ok(names) => names,
            Err(e) => {
                self.reporter.report("cannot open directory", dir, &e);
                return Ok(());
            }
        };

        let mut subdirs: Vec<PathBuf> = Vec::new();
        for name in &names {
            if !self.options.all && name.starts_with('.') {
                continue;
            }
            let full = dir.join(name);
            let outcome = self.list_file(&full, name)?;

            if self.options.recursive && name != "." && name != ".." {
                let meta = match outcome {
                    ListOutcome::Listed(meta) => Some(meta),
                    // Count mode skipped the fetch; do it for the recursion
                    // decision alone.
                    ListOutcome::Counted => match self.provider.stat(&full) {
                        Ok(meta) => Some(meta),
                        Err(e) => {
                            self.reporter.report("cannot access", &full, &e);
                            None
                        }
                    },
                    // Already reported while listing; don't report twice.
                    ListOutcome::Failed => None,
                };
                if meta.is_some_and(|m| m.is_dir()) {
                    subdirs.push(full);
                }
            }
        }

        for sub in subdirs {
            if !self.options.count_only {
                writeln!(self.out)?;
                writeln!(self.out, "{}:", sub.display())?;
            }
            self.list_dir(&sub)?;
        }
        Ok(())
    }

    /// List a single entry according to the mode flags.
    fn list_file(&mut self, path: &Path, name: &str) -> io::Result<ListOutcome> {
        if self.options.count_only {
            self.reporter.tally_entry();
            return Ok(ListOutcome::Counted);
        }

        let meta = match self.provider.stat(path) {
            Ok(meta) => meta,
            Err(e) => {
                self.reporter.report("cannot access", path, &e);
                return Ok(ListOutcome::Failed);
            }
        };

        if self.options.long {
            let owner = self.resolve_user(meta.uid);
            let group = self.resolve_group(meta.gid);
            // An unreadable target renders as "?" without touching the
            // exit status.
            let target = if meta.kind == EntryKind::Symlink {
                Some(
                    self.provider
                        .read_link_target(path)
                        .unwrap_or_else(|_| "?".to_string()),
                )
            } else {
                None
            };
            let line = format::long_line(
                &meta,
                name,
                &owner,
                &group,
                target.as_deref(),
                &self.format,
            );
            writeln!(self.out, "{line}")?;
        } else {
            writeln!(self.out, "{}", format::short_line(name, meta.is_dir()))?;
        }
        Ok(ListOutcome::Listed(meta))
    }

    fn resolve_user(&mut self, uid: u32) -> String {
        match self.identity.user_name(uid) {
            Some(name) => name,
            None => {
                self.reporter.identity_fallback();
                uid.to_string()
            }
        }
    }

    fn resolve_group(&mut self, gid: u32) -> String {
        match self.identity.group_name(gid) {
            Some(name) => name,
            None => {
                self.reporter.identity_fallback();
                gid.to_string()
            }
        }
    }
}
