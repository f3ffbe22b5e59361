use clap::{Arg, ArgAction, Command, builder::OsStringValueParser, value_parser};

use crate::PROGRAM_NAME;

/// Builds the `clap` command used for parsing.
pub(crate) fn clap_command() -> Command {
    let command = Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("List source files with the header settings that apply to them.")
        .arg(
            Arg::new("ignore")
                .long("ignore")
                .short('i')
                .value_name("PATTERN")
                .help("Skip files and directories matching PATTERN.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("rules-file")
                .long("rules-file")
                .value_name("NAME")
                .help("Name of the per-directory rule file [default: .header].")
                .value_parser(OsStringValueParser::new())
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("ignore-file")
                .long("ignore-file")
                .value_name("NAME")
                .help("Name of the per-directory ignore file [default: .gitignore].")
                .value_parser(OsStringValueParser::new())
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("no-global-ignore")
                .long("no-global-ignore")
                .help("Do not apply git's global excludes file.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("follow-symlinks")
                .long("follow-symlinks")
                .short('L')
                .help("Follow symbolic links to files and directories.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dump-rules")
                .long("dump-rules")
                .value_name("FILE")
                .help("Parse FILE as a rule file, print it in canonical form and exit.")
                .value_parser(value_parser!(std::path::PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic output; repeat for more.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("info")
                .long("info")
                .value_name("FLAGS")
                .help("Fine-grained informational output (rules, scan, skip, stats, all).")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .value_name("FLAGS")
                .help("Fine-grained debug output (cmd, dup, filter, rules, scan, all).")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("paths")
                .value_name("PATH")
                .help("Files or directories to scan [default: .].")
                .value_parser(value_parser!(std::path::PathBuf))
                .action(ArgAction::Append),
        );

    with_parallel(command)
}

#[cfg(feature = "parallel")]
fn with_parallel(command: Command) -> Command {
    command.arg(
        Arg::new("parallel")
            .long("parallel")
            .short('j')
            .help("Scan directories on all cores; output order is unchanged.")
            .action(ArgAction::SetTrue),
    )
}

#[cfg(not(feature = "parallel"))]
fn with_parallel(command: Command) -> Command {
    command
}
