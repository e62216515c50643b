use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::{METADATA_DIR, Workspace};
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepoError;
use anyhow::Context;
use bitflags::bitflags;
use std::cell::{RefCell, RefMut};
use std::collections::BTreeSet;
use std::path::Path;

const OBJECTS_DIR: &str = "objects";
const COMMITS_FILE: &str = "COMMITS";

bitflags! {
    /// Pieces of repository state changed by the running operation
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Touched: u8 {
        /// Staged additions and removals, always persisted as a pair
        const INDEX = 0b0001;
        const COMMITS = 0b0010;
        const BRANCHES = 0b0100;
        /// The HEAD file and the current branch's ref
        const HEAD = 0b1000;
    }
}

/// Session handle over one repository
///
/// `open` loads all mutable state in one step; operations mutate it in memory, mark what
/// they changed with `touch`, and end with `save`, which writes back exactly those pieces.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    index: Index,
    head_branch: BranchName,
    head_commit_id: ObjectId,
    commits: BTreeSet<ObjectId>,
    branches: BTreeSet<BranchName>,
    touched: Touched,
    colorize: bool,
}

impl Repository {
    /// Lay out the areas of a repository rooted at `root` without reading any state
    pub(crate) fn unloaded(root: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        if !root.exists() {
            std::fs::create_dir_all(root)
                .with_context(|| format!("Unable to create directory {}", root.display()))?;
        }
        let path = root
            .canonicalize()
            .with_context(|| format!("Unable to resolve {}", root.display()))?;
        let metadata_path = path.join(METADATA_DIR);

        Ok(Repository {
            writer: RefCell::new(writer),
            database: Database::new(
                metadata_path.join(OBJECTS_DIR).into_boxed_path(),
                metadata_path.join(COMMITS_FILE).into_boxed_path(),
            ),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            refs: Refs::new(metadata_path.clone().into_boxed_path()),
            index: Index::new(metadata_path.into_boxed_path()),
            path: path.into_boxed_path(),
            head_branch: BranchName::default(),
            head_commit_id: ObjectId::default(),
            commits: BTreeSet::new(),
            branches: BTreeSet::new(),
            touched: Touched::empty(),
            colorize: false,
        })
    }

    /// Load the repository rooted at `root`
    ///
    /// HEAD and the current branch's ref are required; a fresh repository may lack the
    /// staging files and the registries, which then read as empty.
    pub fn open(root: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        if !root.join(METADATA_DIR).is_dir() {
            return Err(RepoError::NotInitialized.into());
        }

        let mut repository = Self::unloaded(root, writer)?;

        repository.head_branch = repository.refs.read_head()?;
        repository.head_commit_id = repository
            .refs
            .read_ref(&repository.head_branch)?
            .with_context(|| format!("Branch {} has no ref", repository.head_branch))?;
        repository.index.rehydrate()?;
        repository.commits = repository.database.read_commit_set()?;
        repository.branches = repository.refs.read_branch_set()?;

        tracing::debug!(
            branch = %repository.head_branch,
            head = %repository.head_commit_id,
            "repository opened"
        );

        Ok(repository)
    }

    /// Persist every piece of state marked as touched
    pub fn save(&mut self) -> anyhow::Result<()> {
        if self.touched.contains(Touched::INDEX) || self.index.is_changed() {
            self.index.write_updates()?;
        }
        if self.touched.contains(Touched::COMMITS) {
            self.database.write_commit_set(&self.commits)?;
        }
        if self.touched.contains(Touched::BRANCHES) {
            self.refs.write_branch_set(&self.branches)?;
        }
        if self.touched.contains(Touched::HEAD) {
            self.refs
                .update_ref(&self.head_branch, &self.head_commit_id)?;
            self.refs.set_head(&self.head_branch)?;
        }

        tracing::trace!(touched = ?self.touched, "repository saved");
        self.touched = Touched::empty();

        Ok(())
    }

    pub fn touch(&mut self, touched: Touched) {
        self.touched |= touched;
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    /// Colour status output (only sensible when writing to a terminal)
    pub fn with_color(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    pub fn colorize(&self) -> bool {
        self.colorize
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Mutable staging area; marks it for saving
    pub fn index_mut(&mut self) -> &mut Index {
        self.touched |= Touched::INDEX;
        &mut self.index
    }

    pub fn head_branch(&self) -> &BranchName {
        &self.head_branch
    }

    pub fn head_commit_id(&self) -> &ObjectId {
        &self.head_commit_id
    }

    pub fn head_commit(&self) -> anyhow::Result<Commit> {
        self.database.load_commit(&self.head_commit_id)
    }

    pub fn commits(&self) -> &BTreeSet<ObjectId> {
        &self.commits
    }

    pub fn branches(&self) -> &BTreeSet<BranchName> {
        &self.branches
    }

    /// Move the current branch to `commit_id`
    pub fn advance_head(&mut self, commit_id: ObjectId) {
        self.head_commit_id = commit_id;
        self.touched |= Touched::HEAD;
    }

    /// Check out `branch`, whose tip is `commit_id`
    pub fn switch_branch(&mut self, branch: BranchName, commit_id: ObjectId) {
        self.head_branch = branch;
        self.advance_head(commit_id);
    }

    pub fn register_commit(&mut self, commit_id: ObjectId) {
        if self.commits.insert(commit_id) {
            self.touched |= Touched::COMMITS;
        }
    }

    pub fn register_branch(&mut self, branch: BranchName) {
        if self.branches.insert(branch) {
            self.touched |= Touched::BRANCHES;
        }
    }

    pub fn unregister_branch(&mut self, branch: &BranchName) {
        if self.branches.remove(branch) {
            self.touched |= Touched::BRANCHES;
        }
    }
}
