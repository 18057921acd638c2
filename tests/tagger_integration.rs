// Tag synchronization against real git repositories built on the fly.

use git2::{Oid, Repository, Signature, Time};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use docs_sync::domain::MessageTemplate;
use docs_sync::git::{Git2Repository, Repository as _};
use docs_sync::tagger::Tagger;

/// Create a commit at a fixed timestamp, returning its id
fn commit_at(repo: &Repository, time: i64, message: &str, parents: &[Oid]) -> Oid {
    let sig = Signature::new("Test User", "test@example.com", &Time::new(time, 0))
        .expect("Could not create signature");

    // Unique content so every commit gets its own tree
    let marker = repo.path().parent().unwrap().join("marker.txt");
    fs::write(&marker, format!("{} {}\n", time, message)).expect("Could not write file");

    let mut index = repo.index().expect("Could not get index");
    index
        .add_path(Path::new("marker.txt"))
        .expect("Could not add file to index");
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");

    let parent_commits: Vec<_> = parents
        .iter()
        .map(|oid| repo.find_commit(*oid).expect("Could not find parent"))
        .collect();
    let parent_refs: Vec<_> = parent_commits.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .expect("Could not create commit")
}

/// Create an annotated tag with a fixed tagged time
fn annotated_tag_at(repo: &Repository, name: &str, target: Oid, time: i64) {
    let sig = Signature::new("Release Manager", "release@example.com", &Time::new(time, 0))
        .expect("Could not create signature");
    let object = repo.find_object(target, None).expect("Could not find object");
    repo.tag(name, &object, &sig, &format!("{} release", name), false)
        .expect("Could not create tag");
}

struct Fixture {
    _docs_dir: TempDir,
    _upstream_dir: TempDir,
    docs: Git2Repository,
    upstream: Git2Repository,
    docs_commits: Vec<Oid>,
}

/// Upstream released v2.16.0 (t=1000) and v2.16.1 (t=2000); the docs repo
/// has commits at t=500, 1500, 2500 on stable-2.16 and only mirrors v2.16.0.
fn setup() -> Fixture {
    let upstream_dir = TempDir::new().expect("Could not create temp dir");
    let upstream = Repository::init(upstream_dir.path()).expect("Could not init repo");
    let u1 = commit_at(&upstream, 900, "upstream work", &[]);
    let u2 = commit_at(&upstream, 1900, "more upstream work", &[u1]);
    annotated_tag_at(&upstream, "v2.16.0", u1, 1000);
    annotated_tag_at(&upstream, "v2.16.1", u2, 2000);

    let docs_dir = TempDir::new().expect("Could not create temp dir");
    let docs = Repository::init(docs_dir.path()).expect("Could not init repo");
    let d1 = commit_at(&docs, 500, "docs: initial", &[]);
    let d2 = commit_at(&docs, 1500, "docs: update guides", &[d1]);
    let d3 = commit_at(&docs, 2500, "docs: later work", &[d2]);
    docs.branch(
        "stable-2.16",
        &docs.find_commit(d3).expect("Could not find commit"),
        true,
    )
    .expect("Could not create branch");
    annotated_tag_at(&docs, "v2.16.0", d1, 1100);

    Fixture {
        docs: Git2Repository::open(docs_dir.path()).expect("Could not open docs repo"),
        upstream: Git2Repository::open(upstream_dir.path()).expect("Could not open upstream repo"),
        _docs_dir: docs_dir,
        _upstream_dir: upstream_dir,
        docs_commits: vec![d1, d2, d3],
    }
}

fn fixture_tagger<'a>(fixture: &'a Fixture) -> Tagger<'a> {
    Tagger {
        docs: &fixture.docs,
        upstream: &fixture.upstream,
        docs_remote: "origin".to_string(),
        upstream_remote: "origin".to_string(),
        message: MessageTemplate::snapshot_default(),
        quiet: true,
    }
}

#[test]
fn test_new_tags_reports_gap() {
    let fixture = setup();
    let tagger = fixture_tagger(&fixture);

    assert_eq!(
        tagger.new_tags("stable-2.16").unwrap(),
        vec!["v2.16.1".to_string()]
    );
}

#[test]
fn test_resolve_selects_commit_before_release_time() {
    let fixture = setup();
    let tagger = fixture_tagger(&fixture);

    // v2.16.1 released at t=2000; the docs commit at t=1500 is the last
    // one at or before it
    let plan = tagger.resolve(None, "2.16.1", None).unwrap();
    assert_eq!(plan.branch, "stable-2.16");
    assert_eq!(plan.target, fixture.docs_commits[1].to_string());
}

#[test]
fn test_sync_creates_annotated_tag_and_is_idempotent() {
    let fixture = setup();
    let tagger = fixture_tagger(&fixture);

    let plans = tagger.sync(&["stable-2.16".to_string()], false).unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].tag, "v2.16.1");

    // The docs repo now has the tag, pointing at the right commit
    assert!(fixture.docs.tag_exists("v2.16.1").unwrap());
    assert_eq!(
        fixture.docs.resolve_commit("v2.16.1^{commit}").unwrap(),
        fixture.docs_commits[1].to_string()
    );

    // Second run finds nothing to do
    let plans = tagger.sync(&["stable-2.16".to_string()], false).unwrap();
    assert!(plans.is_empty());
    assert!(tagger.new_tags("stable-2.16").unwrap().is_empty());
}

#[test]
fn test_annotated_tag_time_wins_over_commit_time() {
    let fixture = setup();

    // The upstream commit was at t=1900 but the tag itself at t=2000
    assert_eq!(fixture.upstream.tag_time("v2.16.1").unwrap(), 2000);
}

#[test]
fn test_missing_upstream_tag_is_fatal() {
    let fixture = setup();
    let tagger = fixture_tagger(&fixture);

    let err = tagger.resolve(None, "v2.16.9", None).unwrap_err();
    assert!(err.to_string().contains("does not exist upstream"));
}

#[test]
fn test_no_docs_commit_before_release_is_fatal() {
    let fixture = setup();

    // A release predating every docs commit (t=400) has no commit to tag
    let commits = fixture
        .docs
        .branch_commits("origin", "stable-2.16")
        .unwrap();
    assert!(docs_sync::tagger::last_commit_before(&commits, 400).is_err());
    assert!(docs_sync::tagger::last_commit_before(&commits, 500).is_ok());
}

#[test]
fn test_branch_commits_newest_first() {
    let fixture = setup();
    let commits = fixture
        .docs
        .branch_commits("origin", "stable-2.16")
        .unwrap();

    assert_eq!(commits.len(), 3);
    assert!(commits[0].time > commits[1].time);
    assert!(commits[1].time > commits[2].time);
    assert_eq!(commits[0].summary, "docs: later work");
}
