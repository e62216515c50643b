use crate::common::SharedBuffer;
use crate::common::file::write_file;
use assert_cmd::Command;
use assert_fs::TempDir;
use gitlite::areas::repository::Repository;
use rstest::fixture;
use std::path::Path;

pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Repository whose `master` holds `1.txt` = "one" and `a/2.txt` = "two" on top of the root
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_gitlite_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(repository_dir.path(), "1.txt", "one");
    write_file(repository_dir.path(), "a/2.txt", "two");

    run_gitlite_command(repository_dir.path(), &["add", "1.txt"])
        .assert()
        .success();
    run_gitlite_command(repository_dir.path(), &["add", "a/2.txt"])
        .assert()
        .success();
    run_gitlite_command(repository_dir.path(), &["commit", "first files"])
        .assert()
        .success();

    repository_dir
}

pub fn run_gitlite_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("gitlite").expect("Failed to find gitlite binary");
    cmd.envs(vec![
        ("NO_PAGER", "1"),
        ("TZ", "UTC"),
        ("GITLITE_DATE", COMMIT_DATE),
    ]);
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// Stage every listed file and commit them with `message`
pub fn stage_and_commit(dir: &Path, files: &[&str], message: &str) {
    for file in files {
        run_gitlite_command(dir, &["add", file]).assert().success();
    }
    run_gitlite_command(dir, &["commit", message])
        .assert()
        .success();
}

/// Open the repository in-process, capturing whatever it writes
pub fn open_repository(dir: &Path) -> (Repository, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let repository =
        Repository::open(dir, Box::new(buffer.clone())).expect("Failed to open repository");

    (repository, buffer)
}

pub fn head_commit_id(dir: &Path) -> String {
    open_repository(dir).0.head_commit_id().to_string()
}

pub fn commit_count(dir: &Path) -> usize {
    open_repository(dir).0.commits().len()
}
