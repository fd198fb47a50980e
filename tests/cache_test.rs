mod common;

use assert2::{check, let_assert};
use common::{TempWorkspace, site};
use doxysearch::cache::{DEFAULT_CATEGORY, discover_shards, fingerprint};
use doxysearch::{IndexCache, load_dir, load_or_build};
use rstest::rstest;

/// Test: Only shards of the requested category are discovered.
#[rstest]
fn discovers_category_shards(site: TempWorkspace) {
    let_assert!(Ok(shards) = discover_shards(site.path(), DEFAULT_CATEGORY));
    let names: Vec<_> = shards
        .iter()
        .filter_map(|p| p.file_name()?.to_str())
        .collect();
    check!(names == ["all_63.js", "all_64.js"]);

    let_assert!(Ok(classes) = discover_shards(site.path(), "classes"));
    check!(classes.len() == 1);
}

/// Test: Shards merge into one table searchable across first letters.
#[rstest]
fn load_dir_merges_shards(site: TempWorkspace) {
    let_assert!(Ok(table) = load_dir(site.path(), DEFAULT_CATEGORY));
    check!(table.len() == 25);
    check!(table.get("DNSQuery").is_some());
    check!(table.get("CLI").is_some());
    check!(table.get("DNSLoq").is_none(), "classes shard is another category");

    let dns: Vec<_> = table.search("dns").map(|e| e.label.as_str()).collect();
    check!(dns == ["DNSQuery", "DNSRecord"]);
}

#[test]
fn load_dir_without_shards_fails() {
    let workspace = TempWorkspace::new();
    workspace.create_file("html/index.html", "<html></html>");

    let_assert!(Err(e) = load_dir(workspace.path(), DEFAULT_CATEGORY));
    check!(e.to_string().contains("No 'all_*.js' search shards"));
}

/// Test: A broken shard reports which file failed.
#[test]
fn load_dir_names_broken_shard() {
    let workspace = TempWorkspace::new();
    workspace.create_file("search/all_63.js", "var searchData=[['cli',['CLI']]];");

    let_assert!(Err(e) = load_dir(workspace.path(), DEFAULT_CATEGORY));
    let message = format!("{:#}", e);
    check!(message.contains("all_63.js"));
    check!(message.contains("no occurrences"));
}

/// Test: The cache is written on first load and reused while shards are unchanged.
#[rstest]
fn cache_reused_until_shards_change(site: TempWorkspace) {
    let cache_dir = TempWorkspace::new();
    let cache = IndexCache::new(cache_dir.path().join("site.index"));

    let_assert!(Ok(first) = load_or_build(site.path(), DEFAULT_CATEGORY, Some(&cache)));
    check!(cache.path().exists());

    let_assert!(Ok(second) = load_or_build(site.path(), DEFAULT_CATEGORY, Some(&cache)));
    check!(second == first);

    // Changing a shard invalidates the cached table
    site.create_file(
        "html/search/all_64.js",
        "var searchData=[['dnsquery',['DNSQuery',['../q.html',1,'']]]];",
    );
    let_assert!(Ok(third) = load_or_build(site.path(), DEFAULT_CATEGORY, Some(&cache)));
    check!(third.len() == 24);
    check!(third.get("DNSRecord").is_none());
}

/// Test: A cache built for other shards is not mistaken for this site's table.
#[rstest]
fn cache_from_other_site_is_ignored(site: TempWorkspace) {
    let other = TempWorkspace::new();
    other.create_file("search/all_64.js", common::D_SHARD);

    let cache_dir = TempWorkspace::new();
    let cache = IndexCache::new(cache_dir.path().join("shared.index"));

    let_assert!(Ok(small) = load_or_build(other.path(), DEFAULT_CATEGORY, Some(&cache)));
    check!(small.len() == 2);

    let_assert!(Ok(full) = load_or_build(site.path(), DEFAULT_CATEGORY, Some(&cache)));
    check!(full.len() == 25);
}

#[rstest]
fn fingerprint_ignores_location(site: TempWorkspace) {
    let moved = TempWorkspace::new();
    moved.copy_file(&common::sample_shard_path(), "html/search/all_63.js");
    moved.create_file("html/search/all_64.js", common::D_SHARD);

    let original_shards = discover_shards(site.path(), DEFAULT_CATEGORY).unwrap();
    let moved_shards = discover_shards(moved.path(), DEFAULT_CATEGORY).unwrap();

    check!(
        fingerprint(site.path(), &original_shards).unwrap()
            == fingerprint(moved.path(), &moved_shards).unwrap()
    );
}

#[rstest]
fn load_without_cache(site: TempWorkspace) {
    let_assert!(Ok(table) = load_or_build(site.path(), DEFAULT_CATEGORY, None));
    check!(table.len() == 25);
}
