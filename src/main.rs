#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use time::{OffsetDateTime, UtcOffset};

use lsr::cli::Args;
use lsr::format::FormatConfig;
use lsr::identity::SystemIdentityResolver;
use lsr::lister::{ListOptions, Lister};
use lsr::provider::OsMetadataProvider;
use lsr::status::Reporter;
use lsr::PROGRAM;

fn main() {
    match run_app() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{PROGRAM}: {e:#}");
            // A failure of the tool itself maps to the generic-error bit.
            std::process::exit(64);
        }
    }
}

fn run_app() -> Result<i32> {
    let args = Args::parse().validated();

    let options = ListOptions {
        long: args.long,
        all: args.all,
        recursive: args.recursive,
        count_only: args.count_only,
    };
    let format = FormatConfig {
        human_readable: args.human_readable,
        now_unix: OffsetDateTime::now_utc().unix_timestamp(),
        // Indeterminate local offsets fall back to UTC rather than failing
        // the run.
        utc_offset: UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
    };

    let provider = OsMetadataProvider;
    let identity = SystemIdentityResolver;
    let stdout = io::stdout();
    let mut lister = Lister::new(
        &provider,
        &identity,
        options,
        format,
        stdout.lock(),
        Reporter::new(PROGRAM, io::stderr()),
    );
    lister
        .run(&args.paths)
        .context("failed to write listing")?;
    Ok(lister.into_status().exit_code())
}
