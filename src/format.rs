//! Entry rendering: permission strings, sizes, timestamps, and the long
//! and short line layouts.

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::provider::{EntryKind, EntryMetadata};

/// One Julian year. Modification times further back than this (or in the
/// future) are rendered with the year instead of hour:minute.
const DATED_CUTOFF_SECS: i64 = 31_556_952;

/// Configuration for the rendering pipeline.
#[derive(Debug, Clone, Copy)]
pub struct FormatConfig {
    /// Scale sizes through B/K/M/G/T/P/E instead of raw byte counts.
    pub human_readable: bool,
    /// Reference instant for relative vs dated timestamp rendering.
    pub now_unix: i64,
    /// Offset applied before formatting timestamps.
    pub utc_offset: UtcOffset,
}

/// Single-character type indicator for the first column of a long line.
pub fn type_char(kind: EntryKind) -> char {
    match kind {
        EntryKind::Directory => 'd',
        EntryKind::Regular => '-',
        EntryKind::Symlink => 'l',
        EntryKind::Other => '?',
    }
}

/// Nine-character rwx string for owner/group/other. Special bits are not
/// rendered; only the plain triplets.
pub fn permission_string(mode: u32) -> String {
    const BITS: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];
    BITS.iter()
        .map(|&(bit, ch)| if mode & bit != 0 { ch } else { '-' })
        .collect()
}

/// Scale a byte count by repeated division by 1024, stopping at the first
/// unit below 1024 (or at E). Plain integer for bytes, otherwise one
/// fractional digit plus the unit letter.
pub fn human_size(size: u64) -> String {
    const UNITS: [&str; 7] = ["B", "K", "M", "G", "T", "P", "E"];
    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < 6 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        size.to_string()
    } else {
        format!("{:.1}{}", value, UNITS[unit])
    }
}

/// Render a modification time: `Mon DD HH:MM` for recent timestamps,
/// `Mon DD YYYY` for future timestamps and those at least a Julian year in
/// the past. The day is space-padded to two characters.
pub fn mtime_string(mtime: i64, cfg: &FormatConfig) -> String {
    let stamp = OffsetDateTime::from_unix_timestamp(mtime)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
        .to_offset(cfg.utc_offset);
    let recent = mtime <= cfg.now_unix && cfg.now_unix - mtime < DATED_CUTOFF_SECS;
    let rendered = if recent {
        stamp.format(format_description!(
            "[month repr:short] [day padding:space] [hour]:[minute]"
        ))
    } else {
        stamp.format(format_description!(
            "[month repr:short] [day padding:space] [year]"
        ))
    };
    rendered.unwrap_or_default()
}

fn wants_slash(name: &str, is_dir: bool) -> bool {
    is_dir && name != "." && name != ".."
}

/// Short-format rendering: the bare name, with a trailing `/` for
/// directories other than `.` and `..`.
pub fn short_line(name: &str, is_dir: bool) -> String {
    if wants_slash(name, is_dir) {
        format!("{name}/")
    } else {
        name.to_string()
    }
}

/// Assemble one long-format line. `owner` and `group` are the resolved
/// display strings (name or numeric fallback); `target` is the symlink
/// target when the entry is a symlink, `?` standing in for an unreadable
/// one.
pub fn long_line(
    meta: &EntryMetadata,
    name: &str,
    owner: &str,
    group: &str,
    target: Option<&str>,
    cfg: &FormatConfig,
) -> String {
    let size_field = if cfg.human_readable {
        format!("{:>5}", human_size(meta.size))
    } else {
        format!("{:>8}", meta.size)
    };

    let mut line = format!(
        "{}{} {} {:<8} {:<8} {} {}",
        type_char(meta.kind),
        permission_string(meta.mode),
        meta.nlink,
        owner,
        group,
        size_field,
        mtime_string(meta.mtime, cfg),
    );

    line.push(' ');
    line.push_str(name);
    match target {
        Some(t) => {
            line.push_str(" -> ");
            line.push_str(t);
        }
        None => {
            if wants_slash(name, meta.is_dir()) {
                line.push('/');
            }
        }
    }
    line
}
