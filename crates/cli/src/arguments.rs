use std::ffi::OsString;
use std::path::PathBuf;

use crate::command_builder::clap_command;

/// Parsed command-line arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ParsedArgs {
    /// `--ignore` patterns, in order.
    pub(crate) ignore: Vec<String>,
    pub(crate) rules_file: Option<OsString>,
    pub(crate) ignore_file: Option<OsString>,
    pub(crate) no_global_ignore: bool,
    pub(crate) follow_symlinks: bool,
    pub(crate) dump_rules: Option<PathBuf>,
    /// Number of `-v` flags.
    pub(crate) verbose: u8,
    /// Raw `--info` values; each may hold a comma-separated list.
    pub(crate) info: Vec<String>,
    /// Raw `--debug` values; each may hold a comma-separated list.
    pub(crate) debug: Vec<String>,
    pub(crate) parallel: bool,
    /// Path operands; empty means the working directory.
    pub(crate) paths: Vec<PathBuf>,
}

/// Parses `args`, whose first element is the program name.
pub(crate) fn parse_args<I, S>(args: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let mut matches = clap_command().try_get_matches_from(args)?;

    let strings = |matches: &mut clap::ArgMatches, id: &str| -> Vec<String> {
        matches
            .remove_many::<String>(id)
            .map(Iterator::collect)
            .unwrap_or_default()
    };

    Ok(ParsedArgs {
        ignore: strings(&mut matches, "ignore"),
        rules_file: matches.remove_one::<OsString>("rules-file"),
        ignore_file: matches.remove_one::<OsString>("ignore-file"),
        no_global_ignore: matches.get_flag("no-global-ignore"),
        follow_symlinks: matches.get_flag("follow-symlinks"),
        dump_rules: matches.remove_one::<PathBuf>("dump-rules"),
        verbose: matches.get_count("verbose"),
        info: strings(&mut matches, "info"),
        debug: strings(&mut matches, "debug"),
        parallel: parallel_requested(&matches),
        paths: matches
            .remove_many::<PathBuf>("paths")
            .map(Iterator::collect)
            .unwrap_or_default(),
    })
}

#[cfg(feature = "parallel")]
fn parallel_requested(matches: &clap::ArgMatches) -> bool {
    matches.get_flag("parallel")
}

#[cfg(not(feature = "parallel"))]
const fn parallel_requested(_matches: &clap::ArgMatches) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ParsedArgs {
        parse_args(std::iter::once("header-scan").chain(args.iter().copied())).expect("parse")
    }

    #[test]
    fn defaults_are_empty() {
        assert_eq!(parse(&[]), ParsedArgs::default());
    }

    #[test]
    fn repeated_options_accumulate() {
        let parsed = parse(&["-i", "*.o", "--ignore", "build/", "-vv", "--debug", "filter2,dup"]);
        assert_eq!(parsed.ignore, ["*.o", "build/"]);
        assert_eq!(parsed.verbose, 2);
        assert_eq!(parsed.debug, ["filter2,dup"]);
    }

    #[test]
    fn file_names_and_operands() {
        let parsed = parse(&[
            "--rules-file",
            "HEADER",
            "--ignore-file=.ignore",
            "--no-global-ignore",
            "-L",
            "src",
            "include/api.h",
        ]);
        assert_eq!(parsed.rules_file, Some(OsString::from("HEADER")));
        assert_eq!(parsed.ignore_file, Some(OsString::from(".ignore")));
        assert!(parsed.no_global_ignore);
        assert!(parsed.follow_symlinks);
        assert_eq!(
            parsed.paths,
            [PathBuf::from("src"), PathBuf::from("include/api.h")]
        );
    }

    #[test]
    fn unknown_option_is_an_error() {
        let error = parse_args(["header-scan", "--frobnicate"]).expect_err("unknown option");
        assert!(error.use_stderr());
    }

    #[test]
    fn help_is_not_an_error_stream() {
        let error = parse_args(["header-scan", "--help"]).expect_err("help short-circuits");
        assert_eq!(error.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(!error.use_stderr());
    }
}
