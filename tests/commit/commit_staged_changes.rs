use crate::common::command::{
    commit_count, head_commit_id, init_repository_dir, open_repository, run_gitlite_command,
};
use crate::common::expect_repo_error;
use crate::common::file::write_file;
use assert_fs::TempDir;
use gitlite::errors::RepoError;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn commit_with_empty_message_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(dir, "1.txt", "uno");
    run_gitlite_command(dir, &["add", "1.txt"]).assert().success();

    run_gitlite_command(dir, &["commit", ""])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Please enter a commit message."));
}

#[rstest]
fn commit_with_nothing_staged_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let head_before = head_commit_id(dir);

    run_gitlite_command(dir, &["commit", "nothing"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No changes added to the commit."));

    assert_eq!(head_commit_id(dir), head_before);
}

#[rstest]
fn commit_applies_additions_and_removals_to_the_head_snapshot(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let parent = head_commit_id(dir);

    write_file(dir, "1.txt", "uno");
    write_file(dir, "b/c/3.txt", "three");
    run_gitlite_command(dir, &["add", "1.txt"]).assert().success();
    run_gitlite_command(dir, &["add", "b/c/3.txt"]).assert().success();
    run_gitlite_command(dir, &["rm", "a/2.txt"]).assert().success();
    run_gitlite_command(dir, &["commit", "second"]).assert().success();

    let (repository, _) = open_repository(dir);
    let commit = repository.head_commit().unwrap();

    assert_eq!(commit.message(), "second");
    assert_eq!(commit.parents().len(), 1);
    assert_eq!(commit.parents()[0].to_string(), parent);
    assert_eq!(
        commit.mapping().keys().cloned().collect::<Vec<_>>(),
        vec!["1.txt".to_string(), "b/c/3.txt".to_string()]
    );
    assert_eq!(
        repository.database().load_blob(&commit.mapping()["1.txt"]).unwrap().content().as_ref(),
        b"uno"
    );

    let status = repository.status().unwrap();
    assert!(status.staged.is_empty());
    assert!(status.removed.is_empty());
}

#[rstest]
fn commit_advances_the_current_branch_and_registers_the_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let commits_before = commit_count(dir);
    write_file(dir, "1.txt", "uno");

    let (mut repository, _) = open_repository(dir);
    repository.add("1.txt").unwrap();
    let commit_id = repository.commit("in process").unwrap();

    let (reopened, _) = open_repository(dir);
    assert_eq!(reopened.head_commit_id(), &commit_id);
    assert_eq!(
        reopened.refs().read_ref(reopened.head_branch()).unwrap(),
        Some(commit_id.clone())
    );
    assert!(reopened.commits().contains(&commit_id));
    assert_eq!(reopened.commits().len(), commits_before + 1);
}

#[rstest]
fn engine_reports_commit_preconditions(init_repository_dir: TempDir) {
    let (mut repository, _) = open_repository(init_repository_dir.path());

    assert_eq!(
        expect_repo_error(repository.commit("")),
        RepoError::EmptyCommitMessage
    );
    assert_eq!(
        expect_repo_error(repository.commit("message")),
        RepoError::NothingStaged
    );
}
