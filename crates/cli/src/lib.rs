#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` implements the `header-scan` front-end. It resolves the scan root
//! and filters from the command line, runs the [`walk`] scanner and prints
//! one line per selected file with the settings that apply to it. It can
//! also parse a single rule file and print it back in canonical form.
//!
//! # Design
//!
//! [`run`] accepts the argument list together with handles for standard
//! output and error, so tests drive it exactly like the binary does. A
//! [`clap`](https://docs.rs/clap/) builder parses the arguments; the
//! verbosity options become a [`logging::VerbosityConfig`] and diagnostics
//! collected by the library crates are written to standard error as the scan
//! progresses.
//!
//! # Invariants
//!
//! - `run` never panics; every failure maps onto an exit code.
//! - Standard output carries scan results only. Diagnostics always go to
//!   standard error.
//!
//! # Errors
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | invalid arguments, patterns or operands |
//! | 2 | a rule file, ignore file or directory could not be processed |
//!
//! # Examples
//!
//! ```
//! use std::ffi::OsString;
//!
//! let temp = tempfile::tempdir().unwrap();
//! let rules = temp.path().join("rules");
//! std::fs::write(&rules, "{\n+ *.h\nguards\n}\n").unwrap();
//!
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let args = vec![
//!     OsString::from("header-scan"),
//!     OsString::from("--dump-rules"),
//!     rules.into_os_string(),
//! ];
//! let status = cli::run(args, &mut stdout, &mut stderr);
//!
//! assert_eq!(status, 0);
//! assert_eq!(String::from_utf8(stdout).unwrap(), "{\n    + *.h\n    guards\n}\n");
//! ```
//!
//! # See also
//!
//! - `src/bin/header-scan.rs` for the binary that wires [`run`] into `main`.

use std::ffi::OsString;
use std::io::Write;

mod arguments;
mod command_builder;
mod diagnostics;
mod execution;
mod failure;
mod operands;
mod render;

pub use render::format_entry;

use arguments::parse_args;
use failure::Failure;

/// Name used in usage text and diagnostics.
pub const PROGRAM_NAME: &str = "header-scan";

/// Exit code for a successful run.
pub const EXIT_OK: i32 = 0;
/// Exit code for invalid arguments, patterns or operands.
pub const EXIT_USAGE: i32 = 1;
/// Exit code for failures while reading rules or scanning.
pub const EXIT_SCAN: i32 = 2;

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Runs the front-end with the given arguments and output handles.
///
/// The first argument is the program name. Returns the process exit code.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(error) => {
            let rendered = error.render().to_string();
            if error.use_stderr() {
                let _ = stderr.write_all(rendered.as_bytes());
                return EXIT_USAGE;
            }
            let _ = stdout.write_all(rendered.as_bytes());
            return EXIT_OK;
        }
    };

    let status = match diagnostics::install(&parsed) {
        Ok(()) => match execution::execute(&parsed, stdout, stderr) {
            Ok(()) => EXIT_OK,
            Err(failure) => report(&failure, stderr),
        },
        Err(failure) => report(&failure, stderr),
    };
    diagnostics::flush(stderr);
    status
}

fn report<Err: Write>(failure: &Failure, stderr: &mut Err) -> i32 {
    diagnostics::flush(stderr);
    let _ = writeln!(stderr, "{PROGRAM_NAME}: {failure}");
    failure.exit_code()
}

/// Converts a numeric exit code into an [`std::process::ExitCode`].
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(clamped as u8)
}
