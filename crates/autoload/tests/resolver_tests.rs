mod common;

use autoload::Resolver;
use common::{setup_tree, write_file};
use std::path::PathBuf;

#[test]
fn test_miss_is_repeatable_and_not_memoized() {
    let tree = setup_tree(&["app/models/User.plx"]);
    let mut resolver = Resolver::new();
    resolver.add_search_root(tree.path().join("app"));

    assert_eq!(resolver.find_path("app::models::Order"), None);
    assert_eq!(resolver.find_path("app::models::Order"), None);
    assert!(resolver.memo().is_empty());
    assert_eq!(resolver.stats().misses, 2);
}

#[test]
fn test_hit_is_memoized() {
    let tree = setup_tree(&["app/models/User.plx"]);
    let mut resolver = Resolver::new();
    resolver.add_search_root(tree.path().join("app"));

    let expected = tree.path().join("app/models/User.plx");
    assert_eq!(resolver.find_path("app::models::User"), Some(expected.clone()));
    let visited = resolver.stats().directories_visited;
    assert!(visited > 0);

    assert_eq!(resolver.find_path("app::models::User"), Some(expected.clone()));
    let stats = resolver.stats();
    assert_eq!(stats.memo_hits, 1);
    assert_eq!(stats.searches, 1);
    assert_eq!(stats.directories_visited, visited);
    assert_eq!(resolver.memoized("app::models::User"), Some(expected.as_path()));
}

#[test]
fn test_leading_separator_shares_memo_entry() {
    let tree = setup_tree(&["lib/User.plx"]);
    let mut resolver = Resolver::new();
    resolver.add_search_root(tree.path().join("lib"));

    let found = resolver.find_path("::app::User");
    assert!(found.is_some());
    assert_eq!(resolver.memo().keys().collect::<Vec<_>>(), vec!["app::User"]);

    assert_eq!(resolver.find_path("app::User"), found);
    assert_eq!(resolver.stats().memo_hits, 1);
}

#[test]
fn test_ignored_directory_hides_files() {
    let tree = setup_tree(&["app/vendor/cache/User.plx"]);
    let mut resolver = Resolver::new();
    resolver
        .add_search_root(tree.path().join("app"))
        .add_ignored_name("cache");

    assert_eq!(resolver.find_path("User"), None);
}

#[test]
fn test_ignored_name_matches_basename_only() {
    let tree = setup_tree(&["app/vendor/cache/User.plx"]);
    let mut resolver = Resolver::new();
    resolver
        .add_search_root(tree.path().join("app"))
        .add_ignored_names(["vendor/cache", "cach"]);

    assert_eq!(
        resolver.find_path("User"),
        Some(tree.path().join("app/vendor/cache/User.plx"))
    );
}

#[test]
fn test_unaccepted_extension_is_never_matched() {
    let tree = setup_tree(&["app/User.txt", "app/User", "app/User.plx.bak"]);
    let mut resolver = Resolver::new();
    resolver.add_search_root(tree.path().join("app"));

    assert_eq!(resolver.find_path("User"), None);

    resolver.add_extension(".txt");
    assert_eq!(resolver.extensions(), ["plx", "txt"]);
    assert_eq!(resolver.find_path("User"), Some(tree.path().join("app/User.txt")));
}

#[test]
fn test_ignored_directory_scenario() {
    let tree = setup_tree(&["app/trash/Foo.src-ext", "libs/Bar/Foo.src-ext"]);
    let mut resolver = Resolver::new();
    resolver
        .add_search_roots([tree.path().join("app"), tree.path().join("libs")])
        .add_ignored_name("trash")
        .set_extensions(["src-ext"]);

    let expected = tree.path().join("libs/Bar/Foo.src-ext");
    assert_eq!(resolver.find_path("Foo"), Some(expected.clone()));
    let after_first = resolver.stats();

    assert_eq!(resolver.find_path("Foo"), Some(expected));
    let after_second = resolver.stats();
    assert_eq!(after_second.directories_visited, after_first.directories_visited);
    assert_eq!(after_second.searches, 1);
    assert_eq!(after_second.memo_hits, 1);
}

#[test]
fn test_first_root_wins() {
    let tree = setup_tree(&["first/Foo.plx", "second/deep/er/Foo.plx"]);
    let mut resolver = Resolver::new();
    resolver
        .add_search_root(tree.path().join("first"))
        .add_search_root(tree.path().join("second"));

    assert_eq!(resolver.find_path("Foo"), Some(tree.path().join("first/Foo.plx")));
    // only `first` was listed
    assert_eq!(resolver.stats().directories_visited, 1);
}

#[test]
fn test_missing_roots_are_skipped() {
    let tree = setup_tree(&["libs/Foo.plx"]);
    let mut resolver = Resolver::new();
    resolver
        .add_search_root(tree.path().join("does-not-exist"))
        .add_search_root(tree.path().join("libs"));

    assert_eq!(resolver.find_path("Foo"), Some(tree.path().join("libs/Foo.plx")));
}

#[test]
fn test_namespace_is_not_part_of_the_search() {
    let tree = setup_tree(&["src/somewhere/else/Foo.plx"]);
    let mut resolver = Resolver::new();
    resolver.add_search_root(tree.path().join("src"));

    assert_eq!(
        resolver.find_path("app::models::Foo"),
        Some(tree.path().join("src/somewhere/else/Foo.plx"))
    );
}

#[test]
fn test_custom_separator() {
    let tree = setup_tree(&["src/Foo.plx"]);
    let mut resolver = Resolver::new();
    resolver
        .add_search_root(tree.path().join("src"))
        .set_separator(".");

    assert!(resolver.find_path(".app.Foo").is_some());
    assert!(resolver.memoized("app.Foo").is_some());
}

#[cfg(unix)]
#[test]
fn test_literal_probe_of_absolute_name() {
    let tree = setup_tree(&["Probe.plx"]);
    let dir = tree.path().canonicalize().unwrap();
    let mut type_name = dir
        .strip_prefix("/")
        .unwrap()
        .components()
        .map(|c| c.as_os_str().to_str().unwrap().to_string())
        .collect::<Vec<_>>()
        .join("::");
    type_name.push_str("::Probe");

    // no search roots at all
    let mut resolver = Resolver::new();
    assert_eq!(resolver.find_path(&type_name), Some(dir.join("Probe.plx")));
    assert_eq!(resolver.stats().probe_hits, 1);
    assert_eq!(resolver.stats().searches, 0);
}

#[test]
fn test_memoized_path_is_not_rechecked() {
    let tree = setup_tree(&[]);
    let path = write_file(tree.path(), "src/Gone.plx");
    let mut resolver = Resolver::new();
    resolver.add_search_root(tree.path().join("src"));

    assert_eq!(resolver.find_path("Gone"), Some(path.clone()));
    std::fs::remove_file(&path).unwrap();
    assert_eq!(resolver.find_path("Gone"), Some(PathBuf::from(&path)));
}
