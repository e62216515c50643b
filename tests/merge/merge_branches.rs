use crate::common::command::{
    commit_count, head_commit_id, init_repository_dir, open_repository, repository_dir,
    run_gitlite_command, stage_and_commit,
};
use crate::common::file::{read_file, write_file};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use gitlite::commands::porcelain::merge::MergeOutcome;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::Path;

/// Create `other` at HEAD, run `on_other` there and `on_master` back on master
///
/// Returns the tips of master and other.
fn diverge(
    dir: &Path,
    on_master: impl FnOnce(&Path),
    on_other: impl FnOnce(&Path),
) -> (String, String) {
    run_gitlite_command(dir, &["branch", "other"])
        .assert()
        .success();
    run_gitlite_command(dir, &["checkout", "other"])
        .assert()
        .success();
    on_other(dir);
    let other_tip = head_commit_id(dir);

    run_gitlite_command(dir, &["checkout", "master"])
        .assert()
        .success();
    on_master(dir);

    (head_commit_id(dir), other_tip)
}

#[rstest]
fn merging_a_descendant_fast_forwards(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let (_, other_tip) = diverge(
        dir,
        |_| {},
        |dir| {
            write_file(dir, "ahead.txt", "ahead");
            stage_and_commit(dir, &["ahead.txt"], "ahead");
        },
    );
    let commits_before = commit_count(dir);

    run_gitlite_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout(predicate::eq("Current branch fast-forwarded.\n"));

    assert_eq!(head_commit_id(dir), other_tip);
    assert_eq!(commit_count(dir), commits_before);
    assert_eq!(read_file(dir, "ahead.txt"), "ahead");
    assert_eq!(open_repository(dir).0.head_branch().as_ref(), "master");
}

#[rstest]
fn merging_an_ancestor_changes_nothing(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let (master_tip, _) = diverge(
        dir,
        |dir| {
            write_file(dir, "1.txt", "uno");
            stage_and_commit(dir, &["1.txt"], "master moves on");
        },
        |_| {},
    );

    run_gitlite_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout(predicate::eq(
            "Given branch is an ancestor of the current branch.\n",
        ));

    assert_eq!(head_commit_id(dir), master_tip);
}

#[rstest]
fn conflicting_edits_produce_a_conflict_block_and_a_merge_commit(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_gitlite_command(dir, &["init"]).assert().success();
    write_file(dir, "f.txt", "1");
    stage_and_commit(dir, &["f.txt"], "base");

    let (master_tip, other_tip) = diverge(
        dir,
        |dir| {
            write_file(dir, "f.txt", "2");
            stage_and_commit(dir, &["f.txt"], "two");
        },
        |dir| {
            write_file(dir, "f.txt", "3");
            stage_and_commit(dir, &["f.txt"], "three");
        },
    );

    run_gitlite_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout(predicate::eq("Encountered a merge conflict.\n"));

    assert_eq!(
        read_file(dir, "f.txt"),
        "<<<<<<< HEAD\n2\n=======\n3\n>>>>>>>\n"
    );

    let (repository, _) = open_repository(dir);
    let merge_commit = repository.head_commit().unwrap();
    assert_eq!(merge_commit.message(), "Merged other into master.");
    assert_eq!(
        merge_commit
            .parents()
            .iter()
            .map(|oid| oid.to_string())
            .collect::<Vec<_>>(),
        vec![master_tip, other_tip]
    );
    let conflict_blob = repository
        .database()
        .load_blob(merge_commit.blob_at("f.txt").unwrap())
        .unwrap();
    assert_eq!(
        conflict_blob.content().as_ref(),
        b"<<<<<<< HEAD\n2\n=======\n3\n>>>>>>>\n"
    );
    assert!(repository.status().unwrap().staged.is_empty());
}

#[rstest]
fn deletion_against_no_change_deletes_without_conflict(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_gitlite_command(dir, &["init"]).assert().success();
    write_file(dir, "g.txt", "g");
    stage_and_commit(dir, &["g.txt"], "base");

    diverge(
        dir,
        |dir| {
            run_gitlite_command(dir, &["rm", "g.txt"])
                .assert()
                .success();
            run_gitlite_command(dir, &["commit", "drop g"])
                .assert()
                .success();
        },
        |dir| {
            write_file(dir, "h.txt", "h");
            stage_and_commit(dir, &["h.txt"], "add h");
        },
    );

    run_gitlite_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    repository_dir
        .child("g.txt")
        .assert(predicate::path::missing());
    assert_eq!(read_file(dir, "h.txt"), "h");
    let merge_commit = open_repository(dir).0.head_commit().unwrap();
    assert!(!merge_commit.tracks("g.txt"));
    assert!(merge_commit.tracks("h.txt"));
    assert_eq!(merge_commit.parents().len(), 2);
}

#[rstest]
fn their_deletion_of_an_unchanged_file_is_applied(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    diverge(
        dir,
        |dir| {
            write_file(dir, "m.txt", "m");
            stage_and_commit(dir, &["m.txt"], "add m");
        },
        |dir| {
            run_gitlite_command(dir, &["rm", "1.txt"])
                .assert()
                .success();
            run_gitlite_command(dir, &["commit", "drop one"])
                .assert()
                .success();
        },
    );

    run_gitlite_command(dir, &["merge", "other"])
        .assert()
        .success();

    init_repository_dir
        .child("1.txt")
        .assert(predicate::path::missing());
    let merge_commit = open_repository(dir).0.head_commit().unwrap();
    assert!(!merge_commit.tracks("1.txt"));
    assert!(merge_commit.tracks("m.txt"));
    assert!(merge_commit.tracks("a/2.txt"));
}

#[rstest]
fn modification_against_deletion_conflicts_with_an_empty_side(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    diverge(
        dir,
        |dir| {
            run_gitlite_command(dir, &["rm", "1.txt"])
                .assert()
                .success();
            run_gitlite_command(dir, &["commit", "drop one"])
                .assert()
                .success();
        },
        |dir| {
            write_file(dir, "1.txt", "modified\n\n");
            stage_and_commit(dir, &["1.txt"], "modify one");
        },
    );

    let (mut repository, _) = open_repository(dir);
    let outcome = repository.merge("other").unwrap();

    assert!(matches!(
        outcome,
        MergeOutcome::Merged {
            conflicted: true,
            ..
        }
    ));
    assert_eq!(
        read_file(dir, "1.txt"),
        "<<<<<<< HEAD\n=======\nmodified\n>>>>>>>\n"
    );
}

#[rstest]
fn identical_changes_on_both_sides_merge_cleanly(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let same_change = |dir: &Path| {
        write_file(dir, "1.txt", "same");
        write_file(dir, "both.txt", "both");
        stage_and_commit(dir, &["1.txt", "both.txt"], "same change");
    };
    diverge(dir, same_change, |dir| {
        write_file(dir, "1.txt", "same");
        write_file(dir, "both.txt", "both");
        stage_and_commit(dir, &["1.txt", "both.txt"], "same change elsewhere");
    });

    let (mut repository, _) = open_repository(dir);
    let outcome = repository.merge("other").unwrap();

    assert!(matches!(
        outcome,
        MergeOutcome::Merged {
            conflicted: false,
            ..
        }
    ));
    assert_eq!(read_file(dir, "1.txt"), "same");
    assert_eq!(read_file(dir, "both.txt"), "both");
}
