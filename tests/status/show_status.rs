use crate::common::command::{init_repository_dir, open_repository, run_gitlite_command};
use crate::common::file::{delete_file, write_file};
use assert_fs::TempDir;
use gitlite::artifacts::status::file_change::WorkspaceChange;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::collections::BTreeMap;

#[rstest]
fn clean_repository_shows_only_branches(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_gitlite_command(dir, &["branch", "other"]).assert().success();

    run_gitlite_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::eq(
            "=== Branches ===\n*master\nother\n\n\
             === Staged Files ===\n\n\
             === Removed Files ===\n\n\
             === Modifications Not Staged For Commit ===\n\n\
             === Untracked Files ===\n\n",
        ));
}

#[rstest]
fn status_reports_every_kind_of_change(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    // staged, then edited again
    write_file(dir, "staged.txt", "v1");
    run_gitlite_command(dir, &["add", "staged.txt"]).assert().success();
    write_file(dir, "staged.txt", "v2");
    // tracked and edited without staging
    write_file(dir, "1.txt", "edited");
    // tracked and deleted without rm
    delete_file(dir, "a/2.txt");
    // never added
    write_file(dir, "zz.txt", "loose");

    run_gitlite_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::eq(
            "=== Branches ===\n*master\n\n\
             === Staged Files ===\nstaged.txt\n\n\
             === Removed Files ===\n\n\
             === Modifications Not Staged For Commit ===\n\
             1.txt (modified)\na/2.txt (deleted)\nstaged.txt (modified)\n\n\
             === Untracked Files ===\nzz.txt\n\n",
        ));
}

#[rstest]
fn removed_file_recreated_in_the_tree_is_untracked(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_gitlite_command(dir, &["rm", "1.txt"]).assert().success();
    write_file(dir, "1.txt", "back");
    write_file(dir, "gone.txt", "gone");
    run_gitlite_command(dir, &["add", "gone.txt"]).assert().success();
    delete_file(dir, "gone.txt");

    let (repository, buffer) = open_repository(dir);
    let status = repository.status().unwrap();

    assert!(status.removed.contains("1.txt"));
    assert!(status.untracked.contains("1.txt"));
    assert_eq!(
        status.modifications,
        BTreeMap::from([("gone.txt".to_string(), WorkspaceChange::Deleted)])
    );
    assert!(buffer.contents().contains("=== Removed Files ===\n1.txt\n\n"));
}
