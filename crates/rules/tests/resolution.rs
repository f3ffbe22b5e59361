//! Resolving settings along a path through layered rule and ignore files.

use rules::{Environment, RuleNode};

/// Resolves `path` by descending through every directory component, unioning
/// the per-directory layers found in `layers` on the way.
fn resolve(root: &RuleNode, layers: &[(&str, RuleNode)], path: &str) -> Option<Environment> {
    let mut components: Vec<&str> = path.split('/').collect();
    let file = components.pop()?;

    let mut node = layered(root.clone(), layers, "");
    let mut dir = String::new();
    for name in components {
        node = node.descend(name)?;
        if !dir.is_empty() {
            dir.push('/');
        }
        dir.push_str(name);
        node = layered(node, layers, &dir);
    }
    node.effective_env(file)
}

fn layered(node: RuleNode, layers: &[(&str, RuleNode)], dir: &str) -> RuleNode {
    layers
        .iter()
        .filter(|(at, _)| *at == dir)
        .fold(node, |acc, (_, layer)| acc.union(layer))
}

#[test]
fn deeper_rule_files_override_shallower_ones() {
    let root = RuleNode::read("width = 80\n{\n+ *.h\nguards\n}\n").unwrap();
    let layers = [(
        "legacy",
        RuleNode::read("width = 132\n{\n+ *.h\nguards = false\n}\n").unwrap(),
    )];

    let top = resolve(&root, &layers, "src/a.h").unwrap();
    assert_eq!(top.width(), 80);
    assert!(top.guards());

    let legacy = resolve(&root, &layers, "legacy/old/b.h").unwrap();
    assert_eq!(legacy.width(), 132);
    assert!(!legacy.guards());
    assert_eq!(legacy.guardname(), "LEGACY_OLD_B_H");
}

#[test]
fn nested_ignore_file_only_applies_below_its_directory() {
    let root = RuleNode::default();
    let layers = [("sub", RuleNode::from_ignore_text("*.tmp\n").unwrap())];

    assert!(resolve(&root, &layers, "a.tmp").is_some());
    assert!(resolve(&root, &layers, "sub/b.tmp").is_none());
    assert!(resolve(&root, &layers, "sub/deeper/c.tmp").is_none());
    assert!(resolve(&root, &layers, "sub/b.c").is_some());
}

#[test]
fn anchored_ignore_pattern_is_relative_to_its_file() {
    let layers = [("pkg", RuleNode::from_ignore_text("gen/out.c\n").unwrap())];
    let root = RuleNode::default();

    assert!(resolve(&root, &layers, "pkg/gen/out.c").is_none());
    assert!(resolve(&root, &layers, "pkg/x/gen/out.c").is_some());
    assert!(resolve(&root, &layers, "gen/out.c").is_some());
}

#[test]
fn ignored_directory_cannot_be_reopened_below() {
    let root = RuleNode::from_ignore_text("build/\n").unwrap();
    let layers = [(
        "build",
        RuleNode::read("{\n+ *.c\nignore = false\n}\n").unwrap(),
    )];
    assert!(resolve(&root, &layers, "build/main.c").is_none());
}

#[test]
fn rooted_block_in_root_rules() {
    let root = RuleNode::read("{\n+ /include/*.h\nextern_c\nguardname = API\n}\n").unwrap();

    let public = resolve(&root, &[], "include/api.h").unwrap();
    assert!(public.extern_c());
    assert_eq!(public.guardname(), "API");

    let private = resolve(&root, &[], "src/include/api.h").unwrap();
    assert!(!private.extern_c());
    assert_eq!(private.guardname(), "SRC_INCLUDE_API_H");
}
