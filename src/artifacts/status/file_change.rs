use colored::Colorize;

/// Change of a working-tree file that is not reflected in the staging area
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkspaceChange {
    Modified,
    Deleted,
}

impl From<&WorkspaceChange> for &str {
    fn from(change: &WorkspaceChange) -> Self {
        match change {
            WorkspaceChange::Modified => "modified",
            WorkspaceChange::Deleted => "deleted",
        }
    }
}

impl WorkspaceChange {
    pub fn colored_label(&self) -> colored::ColoredString {
        let label: &str = self.into();
        match self {
            WorkspaceChange::Modified => label.yellow(),
            WorkspaceChange::Deleted => label.red(),
        }
    }
}

impl std::fmt::Display for WorkspaceChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label: &str = self.into();
        write!(f, "{}", label)
    }
}
