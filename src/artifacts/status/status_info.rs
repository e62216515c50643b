use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::status::file_change::WorkspaceChange;
use colored::Colorize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

/// Snapshot of the repository state shown by `status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub head_branch: BranchName,
    pub branches: BTreeSet<BranchName>,
    pub staged: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    pub modifications: BTreeMap<String, WorkspaceChange>,
    pub untracked: BTreeSet<String>,
}

impl StatusInfo {
    /// Render the five sections, each followed by a blank line
    pub fn render(&self, colorize: bool) -> String {
        let mut out = String::new();

        let branches = self
            .branches
            .iter()
            .map(|branch| {
                if branch == &self.head_branch {
                    let current = format!("*{}", branch);
                    if colorize { current.green().to_string() } else { current }
                } else {
                    branch.to_string()
                }
            })
            .collect::<Vec<_>>();
        Self::render_section(&mut out, "Branches", branches);

        let paint = |path: &String, color: fn(&str) -> colored::ColoredString| {
            if colorize {
                color(path).to_string()
            } else {
                path.clone()
            }
        };

        Self::render_section(
            &mut out,
            "Staged Files",
            self.staged.iter().map(|path| paint(path, |p| p.green())),
        );
        Self::render_section(
            &mut out,
            "Removed Files",
            self.removed.iter().map(|path| paint(path, |p| p.red())),
        );
        Self::render_section(
            &mut out,
            "Modifications Not Staged For Commit",
            self.modifications.iter().map(|(path, change)| {
                if colorize {
                    format!("{} ({})", path, change.colored_label())
                } else {
                    format!("{} ({})", path, change)
                }
            }),
        );
        Self::render_section(
            &mut out,
            "Untracked Files",
            self.untracked.iter().map(|path| paint(path, |p| p.red())),
        );

        out
    }

    fn render_section(out: &mut String, title: &str, lines: impl IntoIterator<Item = String>) {
        // writing into a String cannot fail
        let _ = writeln!(out, "=== {} ===", title);
        for line in lines {
            let _ = writeln!(out, "{}", line);
        }
        out.push('\n');
    }
}
