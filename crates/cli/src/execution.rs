use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use filters::PatternSet;
use logging::debug_log;
use rules::RuleNode;
use walk::{ScanBuilder, git};

use crate::arguments::ParsedArgs;
use crate::diagnostics;
use crate::failure::Failure;
use crate::operands::{self, ScanTarget};
use crate::render::format_entry;

/// Patterns every command-line scan excludes.
const HIDDEN: &str = ".*";

pub(crate) fn execute<Out, Err>(
    parsed: &ParsedArgs,
    stdout: &mut Out,
    stderr: &mut Err,
) -> Result<(), Failure>
where
    Out: Write,
    Err: Write,
{
    if let Some(path) = &parsed.dump_rules {
        return dump_rules(path, stdout);
    }

    let cwd = env::current_dir().map_err(|source| Failure::Operand {
        path: PathBuf::from("."),
        source,
    })?;
    let target = operands::resolve(&parsed.paths, &cwd)?;
    let builder = scan_builder(parsed, target)?;

    if parsed.parallel {
        return scan_parallel(builder, stdout);
    }

    for entry in builder.build()? {
        let entry = entry?;
        diagnostics::flush(stderr);
        writeln!(stdout, "{}", format_entry(&entry))?;
    }
    stdout.flush()?;
    Ok(())
}

#[cfg(feature = "parallel")]
fn scan_parallel<Out: Write>(builder: ScanBuilder, stdout: &mut Out) -> Result<(), Failure> {
    for entry in builder.scan_parallel()? {
        writeln!(stdout, "{}", format_entry(&entry))?;
    }
    stdout.flush()?;
    Ok(())
}

#[cfg(not(feature = "parallel"))]
fn scan_parallel<Out: Write>(builder: ScanBuilder, stdout: &mut Out) -> Result<(), Failure> {
    for entry in builder.build()? {
        writeln!(stdout, "{}", format_entry(&entry?))?;
    }
    stdout.flush()?;
    Ok(())
}

/// Configures the scanner from the command line and the resolved target.
fn scan_builder(parsed: &ParsedArgs, target: ScanTarget) -> Result<ScanBuilder, Failure> {
    let excludes = PatternSet::parse(
        std::iter::once(HIDDEN).chain(parsed.ignore.iter().map(String::as_str)),
    )?;
    tracing::debug!(target: "headerfix::cmd", "scan root {}", target.root.display());

    let mut builder = ScanBuilder::new(target.root)
        .excludes(excludes)
        .follow_symlinks(parsed.follow_symlinks);
    if let Some(includes) = target.includes {
        builder = builder.includes(includes);
    }
    if let Some(name) = &parsed.rules_file {
        builder = builder.rules_file_name(name.clone());
    }
    if let Some(name) = &parsed.ignore_file {
        builder = builder.ignore_file_name(name.clone());
    }
    if parsed.no_global_ignore {
        debug_log!(Cmd, 1, "global excludes file disabled");
    } else if let Some(path) = git::global_excludes_file() {
        debug_log!(Cmd, 1, "global excludes file {}", path.display());
        builder = builder.global_ignore_file(path);
    }
    Ok(builder)
}

/// Parses one rule file and prints it in canonical form.
fn dump_rules<Out: Write>(path: &Path, stdout: &mut Out) -> Result<(), Failure> {
    let text = fs::read_to_string(path).map_err(|source| Failure::ReadRules {
        path: path.to_path_buf(),
        source,
    })?;
    let node = RuleNode::read(&text).map_err(|source| Failure::RuleSyntax {
        path: path.to_path_buf(),
        source,
    })?;
    write!(stdout, "{node}")?;
    stdout.flush()?;
    Ok(())
}
