use crate::common::command::{
    head_commit_id, init_repository_dir, open_repository, run_gitlite_command, stage_and_commit,
};
use crate::common::expect_repo_error;
use crate::common::file::{read_file, working_tree_snapshot, write_file};
use assert_fs::TempDir;
use gitlite::errors::{BranchLookup, RepoError};
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn merging_an_unknown_branch_fails(init_repository_dir: TempDir) {
    run_gitlite_command(init_repository_dir.path(), &["merge", "ghost"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "A branch with that name does not exist.",
        ));

    let (mut repository, _) = open_repository(init_repository_dir.path());
    assert_eq!(
        expect_repo_error(repository.merge("bad..name")),
        RepoError::NoSuchBranch(BranchLookup::Merge)
    );
}

#[rstest]
fn merging_the_current_branch_fails(init_repository_dir: TempDir) {
    run_gitlite_command(init_repository_dir.path(), &["merge", "master"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot merge a branch with itself."));
}

#[rstest]
fn merging_with_staged_changes_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_gitlite_command(dir, &["branch", "other"]).assert().success();
    write_file(dir, "1.txt", "staged");
    run_gitlite_command(dir, &["add", "1.txt"]).assert().success();

    run_gitlite_command(dir, &["merge", "other"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("You have uncommitted changes."));
}

#[rstest]
fn untracked_file_in_the_way_aborts_the_merge(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_gitlite_command(dir, &["branch", "other"]).assert().success();
    write_file(dir, "1.txt", "uno");
    stage_and_commit(dir, &["1.txt"], "master side");
    let master_tip = head_commit_id(dir);

    run_gitlite_command(dir, &["checkout", "other"]).assert().success();
    write_file(dir, "incoming.txt", "theirs");
    stage_and_commit(dir, &["incoming.txt"], "other side");
    run_gitlite_command(dir, &["checkout", "master"]).assert().success();

    write_file(dir, "incoming.txt", "mine");

    run_gitlite_command(dir, &["merge", "other"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("There is an untracked file in the way"));

    assert_eq!(read_file(dir, "incoming.txt"), "mine");
    assert_eq!(head_commit_id(dir), master_tip);
}

#[rstest]
#[case::file_where_a_directory_is_needed("d/e/f.txt", "d")]
#[case::directory_where_a_file_is_needed("d", "d/notes.txt")]
fn untracked_work_around_an_incoming_path_aborts_the_merge(
    init_repository_dir: TempDir,
    #[case] incoming: &str,
    #[case] untracked: &str,
) {
    let dir = init_repository_dir.path();
    run_gitlite_command(dir, &["branch", "other"]).assert().success();
    run_gitlite_command(dir, &["checkout", "other"]).assert().success();
    write_file(dir, incoming, "theirs");
    stage_and_commit(dir, &[incoming], "other side");
    run_gitlite_command(dir, &["checkout", "master"]).assert().success();

    write_file(dir, "1.txt", "uno");
    stage_and_commit(dir, &["1.txt"], "master side");
    let master_tip = head_commit_id(dir);
    write_file(dir, untracked, "precious");
    let before = working_tree_snapshot(dir);

    run_gitlite_command(dir, &["merge", "other"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("There is an untracked file in the way"));

    assert_eq!(working_tree_snapshot(dir), before);
    assert_eq!(read_file(dir, untracked), "precious");
    let (mut repository, _) = open_repository(dir);
    assert_eq!(repository.head_commit_id().to_string(), master_tip);
    assert_eq!(
        expect_repo_error(repository.merge("other")),
        RepoError::UntrackedFileInWay
    );
    let status = repository.status().unwrap();
    assert!(status.staged.is_empty());
    assert!(status.removed.is_empty());
}
