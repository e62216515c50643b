use crate::common::command::{init_repository_dir, open_repository, run_gitlite_command};
use crate::common::expect_repo_error;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use gitlite::errors::RepoError;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn rm_branch_deletes_the_ref_and_keeps_the_commits(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_gitlite_command(dir, &["branch", "team/feature"]).assert().success();
    let commits_before = open_repository(dir).0.commits().clone();

    run_gitlite_command(dir, &["rm-branch", "team/feature"])
        .assert()
        .success();

    init_repository_dir
        .child(".gitlite/refs/heads/team")
        .assert(predicate::path::missing());
    let (repository, _) = open_repository(dir);
    assert!(repository.branches().iter().all(|b| b.as_ref() != "team/feature"));
    assert_eq!(repository.commits(), &commits_before);
}

#[rstest]
fn rm_current_branch_always_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_gitlite_command(dir, &["rm-branch", "master"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot remove the current branch."));

    run_gitlite_command(dir, &["branch", "other"]).assert().success();
    let (mut repository, _) = open_repository(dir);
    assert_eq!(
        expect_repo_error(repository.rm_branch("master")),
        RepoError::CannotRemoveCurrentBranch
    );
    init_repository_dir
        .child(".gitlite/refs/heads/master")
        .assert(predicate::path::is_file());
}

#[rstest]
fn rm_unknown_branch_fails(init_repository_dir: TempDir) {
    run_gitlite_command(init_repository_dir.path(), &["rm-branch", "ghost"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "A branch with that name does not exist.",
        ));
}
