use super::*;
use filters::PatternSet;
use rules::RuleNode;
use std::fs;
use std::path::PathBuf;
use test_support::FileTree;

fn collect_relative_paths(scanner: Scanner) -> Vec<PathBuf> {
    scanner
        .map(|entry| entry.expect("scan entry").relative_path().to_path_buf())
        .collect()
}

fn scan(builder: ScanBuilder) -> Vec<PathBuf> {
    collect_relative_paths(builder.build().expect("build scanner"))
}

fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

#[test]
fn missing_root_is_reported() {
    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("missing");
    let error = ScanBuilder::new(&missing).build().expect_err("missing root");
    assert!(matches!(error.kind(), ScanErrorKind::RootMetadata { .. }));
    assert_eq!(error.path(), missing.as_path());
}

#[test]
fn file_root_is_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("file.c");
    fs::write(&file, b"").expect("write file");

    let error = ScanBuilder::new(&file).build().expect_err("file root");
    assert!(matches!(error.kind(), ScanErrorKind::RootNotDirectory { .. }));
    assert!(error.to_string().contains("is not a directory"));
}

#[test]
fn empty_root_yields_nothing() {
    let temp = tempfile::tempdir().expect("tempdir");
    assert!(scan(ScanBuilder::new(temp.path())).is_empty());
}

#[test]
fn files_come_before_subdirectories_in_name_order() {
    let dir = FileTree::new()
        .files(["zeta.c", "alpha.c", "b/two.c", "b/one.c", "a/deep/x.h", "a/y.h"])
        .dir("empty")
        .create()
        .expect("tree");

    assert_eq!(
        scan(ScanBuilder::new(dir.path())),
        paths(&[
            "alpha.c",
            "zeta.c",
            "a/y.h",
            "a/deep/x.h",
            "b/one.c",
            "b/two.c",
        ])
    );
}

#[test]
fn entries_carry_full_and_relative_paths() {
    let dir = FileTree::new()
        .file("nested/file.c", "")
        .create()
        .expect("tree");

    let mut scanner = ScanBuilder::new(dir.path()).build().expect("scanner");
    let entry = scanner.next().expect("entry").expect("entry ok");
    assert_eq!(entry.path(), dir.join("nested/file.c"));
    assert_eq!(entry.relative_path(), std::path::Path::new("nested/file.c"));
    assert_eq!(entry.file_name(), Some(std::ffi::OsStr::new("file.c")));
    assert_eq!(entry.depth(), 1);
    assert!(scanner.next().is_none());
}

#[test]
fn relative_root_is_resolved_against_the_working_directory() {
    let cwd = std::env::current_dir().expect("cwd");
    let dir = FileTree::new().file("a.c", "").create().expect("tree");
    let Ok(relative) = dir.path().strip_prefix(&cwd) else {
        // Temp directory outside the working directory; nothing to check.
        return;
    };

    let entries: Vec<_> = ScanBuilder::new(relative)
        .build()
        .expect("scanner")
        .collect::<Result<_, _>>()
        .expect("scan");
    assert!(entries[0].path().is_absolute());
}

#[test]
fn ignore_files_hide_files_and_directories() {
    let dir = FileTree::new()
        .file(".gitignore", "build/\n*.o\n")
        .files(["main.c", "main.o", "build/out.c", "src/build", "src/util.o"])
        .create()
        .expect("tree");

    assert_eq!(
        scan(ScanBuilder::new(dir.path())),
        paths(&["main.c", "src/build"])
    );
}

#[test]
fn nested_ignore_file_only_applies_below_its_directory() {
    let dir = FileTree::new()
        .file("sub/.gitignore", "*.tmp\n")
        .files(["a.tmp", "sub/b.tmp", "sub/b.c"])
        .create()
        .expect("tree");

    assert_eq!(
        scan(ScanBuilder::new(dir.path())),
        paths(&["a.tmp", "sub/b.c"])
    );
}

#[test]
fn rule_files_set_settings_per_file() {
    let dir = FileTree::new()
        .file(".header", "width = 72\n{\n+ *.h\nguards\n}\n")
        .files(["lib.h", "lib.c", "inc/api.h"])
        .file("inc/.header", "guardname = PROJ\n")
        .create()
        .expect("tree");

    let entries: Vec<ScanEntry> = ScanBuilder::new(dir.path())
        .build()
        .expect("scanner")
        .collect::<Result<_, _>>()
        .expect("scan");
    let find = |name: &str| {
        entries
            .iter()
            .find(|entry| entry.relative_path() == std::path::Path::new(name))
            .unwrap_or_else(|| panic!("missing {name}"))
    };

    let header = find("lib.h");
    assert!(header.env().guards());
    assert_eq!(header.env().width(), 72);
    assert_eq!(header.env().guardname(), "LIB_H");

    let source = find("lib.c");
    assert!(!source.env().guards());
    assert_eq!(source.env().width(), 72);

    let nested = find("inc/api.h");
    assert!(nested.env().guards());
    assert_eq!(nested.env().guardname(), "PROJ_API_H");
}

#[test]
fn ignore_setting_in_a_rule_file_skips_paths() {
    let dir = FileTree::new()
        .file(".header", "{\n+ vendor/\nignore\n}\n{\n+ *.gen.c\nignore\n}\n")
        .files(["a.c", "a.gen.c", "vendor/lib.c"])
        .create()
        .expect("tree");

    assert_eq!(
        scan(ScanBuilder::new(dir.path())),
        paths(&["a.c"])
    );
}

#[test]
fn custom_file_names_are_honoured() {
    let dir = FileTree::new()
        .file("rules.hf", "{\n+ *.c\nextern_c\n}\n")
        .file(".ignore", "skip.c\n")
        .file(".gitignore", "keep.c\n")
        .files(["keep.c", "skip.c"])
        .create()
        .expect("tree");

    let entries: Vec<ScanEntry> = ScanBuilder::new(dir.path())
        .rules_file_name("rules.hf")
        .ignore_file_name(".ignore")
        .build()
        .expect("scanner")
        .collect::<Result<_, _>>()
        .expect("scan");
    let names: Vec<_> = entries.iter().map(ScanEntry::relative_path).collect();
    assert_eq!(names, [".gitignore", "keep.c"].map(std::path::Path::new));
    assert!(entries[1].env().extern_c());
}

#[test]
fn nested_repositories_are_not_entered() {
    let dir = FileTree::new()
        .files(["top.c", "nested/.git/HEAD", "nested/inner.c", "plain/inner.c"])
        .create()
        .expect("tree");

    assert_eq!(
        scan(ScanBuilder::new(dir.path()).excludes(PatternSet::parse([".*"]).expect("excludes"))),
        paths(&["top.c", "plain/inner.c"])
    );
}

#[test]
fn boundary_marker_can_be_renamed() {
    let dir = FileTree::new()
        .files(["a/.hg/store", "a/x.c", "b/.git/HEAD", "b/y.c"])
        .create()
        .expect("tree");

    let builder = ScanBuilder::new(dir.path())
        .boundary_marker(".hg")
        .excludes(PatternSet::parse([".*"]).expect("excludes"));
    assert_eq!(scan(builder), paths(&["b/y.c"]));
}

#[test]
fn includes_restrict_the_scan() {
    let dir = FileTree::new()
        .files(["top.c", "src/a.c", "src/deep/b.c", "docs/c.c"])
        .create()
        .expect("tree");

    let includes = PatternSet::parse(["/src/"]).expect("includes");
    assert_eq!(
        scan(ScanBuilder::new(dir.path()).includes(includes)),
        paths(&["src/a.c", "src/deep/b.c"])
    );
}

#[test]
fn literal_file_includes_select_single_files() {
    let dir = FileTree::new()
        .files(["a.c", "b.c", "sub/c.c", "sub/d.c"])
        .create()
        .expect("tree");

    let includes = PatternSet::new([
        filters::PatternEntry::positive(filters::PathPattern::literal(["b.c"]).expect("literal")),
        filters::PatternEntry::positive(filters::PathPattern::literal(["sub", "d.c"]).expect("literal")),
    ]);
    assert_eq!(
        scan(ScanBuilder::new(dir.path()).includes(includes)),
        paths(&["b.c", "sub/d.c"])
    );
}

#[test]
fn excludes_remove_files_and_directories() {
    let dir = FileTree::new()
        .files([".hidden.c", "a.c", "a.o", "obj/x.c", ".cache/y.c"])
        .create()
        .expect("tree");

    let excludes = PatternSet::parse([".*", "*.o", "obj/"]).expect("excludes");
    assert_eq!(
        scan(ScanBuilder::new(dir.path()).excludes(excludes)),
        paths(&["a.c"])
    );
}

#[test]
fn base_rules_apply_before_rule_files() {
    let dir = FileTree::new()
        .file(".header", "width = 100\n")
        .files(["a.c"])
        .create()
        .expect("tree");

    let base = RuleNode::read("width = 80\ntabsize = 2\n").expect("base rules");
    let entries: Vec<ScanEntry> = ScanBuilder::new(dir.path())
        .base_rules(base)
        .excludes(PatternSet::parse([".*"]).expect("excludes"))
        .build()
        .expect("scanner")
        .collect::<Result<_, _>>()
        .expect("scan");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].env().width(), 100);
    assert_eq!(entries[0].env().tabsize(), 2);
}

#[test]
fn global_ignore_file_applies_to_the_whole_tree() {
    let global = tempfile::tempdir().expect("tempdir");
    let global_file = global.path().join("ignore");
    fs::write(&global_file, "*.log\n").expect("write global ignore");

    let dir = FileTree::new()
        .files(["a.c", "a.log", "sub/b.log", "sub/b.c"])
        .create()
        .expect("tree");

    assert_eq!(
        scan(ScanBuilder::new(dir.path()).global_ignore_file(&global_file)),
        paths(&["a.c", "sub/b.c"])
    );
}

#[test]
fn missing_global_ignore_file_is_treated_as_empty() {
    let dir = FileTree::new().files(["a.log"]).create().expect("tree");
    let builder = ScanBuilder::new(dir.path()).global_ignore_file(dir.join("no-such-file"));
    assert_eq!(scan(builder), paths(&["a.log"]));
}

#[test]
fn root_rule_syntax_error_fails_build() {
    let dir = FileTree::new()
        .file(".header", "{\n+ *.c\n")
        .create()
        .expect("tree");

    let error = ScanBuilder::new(dir.path()).build().expect_err("syntax error");
    assert!(error.kind().is_syntax());
    assert_eq!(error.path(), dir.join(".header"));
    assert!(error.to_string().ends_with("line 1: missing closing brace"));
}

#[test]
fn nested_rule_syntax_error_ends_the_scan() {
    let dir = FileTree::new()
        .files(["a/ok.c", "b/x.c", "c/later.c"])
        .file("b/.header", "}\n")
        .create()
        .expect("tree");

    let mut scanner = ScanBuilder::new(dir.path()).build().expect("scanner");
    let first = scanner.next().expect("first").expect("first ok");
    assert_eq!(first.relative_path(), std::path::Path::new("a/ok.c"));

    let error = scanner.next().expect("error").expect_err("syntax error");
    assert!(matches!(error.kind(), ScanErrorKind::RuleSyntax { .. }));
    assert!(error.to_string().contains("extra closing brace"));
    assert!(scanner.next().is_none());
    assert!(scanner.next().is_none());
}

#[test]
fn unreadable_rule_file_ends_the_scan() {
    let dir = FileTree::new()
        .file("a.c", "")
        .file("sub/b.c", "")
        .dir("sub/.header")
        .create()
        .expect("tree");

    let mut scanner = ScanBuilder::new(dir.path()).build().expect("scanner");
    let first = scanner.next().expect("first").expect("first ok");
    assert_eq!(first.relative_path(), std::path::Path::new("a.c"));

    let error = scanner.next().expect("error").expect_err("read error");
    assert!(matches!(error.kind(), ScanErrorKind::ReadRules { .. }));
    assert_eq!(error.path(), dir.join("sub/.header"));
    assert!(error.to_string().starts_with("failed to read '"));
    assert!(scanner.next().is_none());
}

#[test]
fn unreadable_ignore_file_ends_the_scan() {
    let dir = FileTree::new()
        .file("sub/b.c", "")
        .dir("sub/.gitignore")
        .create()
        .expect("tree");

    let result: Result<Vec<_>, _> = ScanBuilder::new(dir.path()).build().expect("scanner").collect();
    let error = result.expect_err("read error");
    assert!(matches!(error.kind(), ScanErrorKind::ReadRules { .. }));
    assert_eq!(error.path(), dir.join("sub/.gitignore"));
}

#[cfg(unix)]
#[test]
fn unlistable_directory_ends_the_scan() {
    use std::os::unix::fs::PermissionsExt;

    let dir = FileTree::new()
        .files(["a.c", "locked/b.c"])
        .create()
        .expect("tree");
    let locked = dir.join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");
    if fs::read_dir(&locked).is_ok() {
        // Running with privileges that ignore permission bits.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");
        return;
    }

    let mut scanner = ScanBuilder::new(dir.path()).build().expect("scanner");
    scanner.next().expect("first").expect("first ok");
    let error = scanner.next().expect("error").expect_err("listing error");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");

    assert!(error.path().starts_with(&locked));
    assert!(scanner.next().is_none());
}

#[test]
fn lone_bracket_in_ignore_file_is_literal() {
    let dir = FileTree::new()
        .file("sub/.gitignore", "[\n")
        .file("sub/a.c", "")
        .create()
        .expect("tree");

    let result: Result<Vec<_>, _> = ScanBuilder::new(dir.path()).build().expect("scanner").collect();
    let entries = result.expect("scan");
    assert_eq!(entries.len(), 1);
}

#[cfg(unix)]
#[test]
fn symlinks_are_skipped_by_default() {
    let dir = FileTree::new()
        .file("target/inner.c", "")
        .file("real.c", "")
        .symlink("root/link_dir", "../target")
        .symlink("root/link_file", "../real.c")
        .file("root/own.c", "")
        .create()
        .expect("tree");

    assert_eq!(scan(ScanBuilder::new(dir.join("root"))), paths(&["own.c"]));
}

#[cfg(unix)]
#[test]
fn symlinks_are_followed_when_enabled() {
    let dir = FileTree::new()
        .file("target/inner.c", "")
        .file("real.c", "")
        .symlink("root/link_dir", "../target")
        .symlink("root/link_file", "../real.c")
        .symlink("root/dangling", "../missing")
        .file("root/own.c", "")
        .create()
        .expect("tree");

    let builder = ScanBuilder::new(dir.join("root")).follow_symlinks(true);
    assert_eq!(
        scan(builder),
        paths(&["link_file", "own.c", "link_dir/inner.c"])
    );
}

#[cfg(unix)]
#[test]
fn symlink_cycles_are_not_followed() {
    let dir = FileTree::new()
        .file("root/a.c", "")
        .file("root/sub/b.c", "")
        .symlink("root/self", ".")
        .symlink("root/sub/up", "..")
        .create()
        .expect("tree");

    let builder = ScanBuilder::new(dir.join("root")).follow_symlinks(true);
    assert_eq!(scan(builder), paths(&["a.c", "sub/b.c"]));
}

#[cfg(unix)]
#[test]
fn symlinked_root_is_scanned_through_the_link() {
    let dir = FileTree::new()
        .file("target/file.c", "")
        .symlink("link", "target")
        .create()
        .expect("tree");

    let entries: Vec<ScanEntry> = ScanBuilder::new(dir.join("link"))
        .build()
        .expect("scanner")
        .collect::<Result<_, _>>()
        .expect("scan");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path(), dir.join("link/file.c"));
}

#[test]
fn scanner_reports_statistics_when_requested() {
    let dir = FileTree::new()
        .files(["a.c", "sub/b.c"])
        .create()
        .expect("tree");

    let mut config = logging::VerbosityConfig::default();
    config.info.stats = 1;
    logging::init(config);
    logging::drain_events();

    let count = ScanBuilder::new(dir.path()).build().expect("scanner").count();
    assert_eq!(count, 2);

    let messages: Vec<String> = logging::drain_events()
        .iter()
        .map(|event| event.message().to_owned())
        .collect();
    assert!(messages.contains(&"scanned 2 directories, selected 2 files".to_owned()));
    logging::init(logging::VerbosityConfig::default());
}
