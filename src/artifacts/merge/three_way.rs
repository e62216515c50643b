//! Three-way merge decisions
//!
//! Every path appearing in the merge base, our tip or their tip is classified against the
//! base. A side "changed" a path when it deleted it or its blob differs from the base.
//!
//! | base    | ours          | theirs            | action                   |
//! |---------|---------------|-------------------|--------------------------|
//! | present | unchanged     | modified          | take theirs              |
//! | present | unchanged     | deleted           | delete                   |
//! | present | changed       | unchanged         | keep ours                |
//! | present | changed       | changed, same way | keep ours                |
//! | present | changed       | changed, differs  | conflict                 |
//! | absent  | absent        | present           | take theirs              |
//! | absent  | present       | present, differs  | conflict                 |
//! | absent  | present       | present, equal    | keep ours                |

use crate::artifacts::objects::commit::Mapping;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAction {
    /// The working tree and our tip already hold the result
    KeepOurs,
    /// Write their blob and stage it for addition
    TakeTheirs(ObjectId),
    /// Remove the file and stage it for removal
    Delete,
    /// Write a conflict block; `None` marks a side that deleted the file
    Conflict {
        ours: Option<ObjectId>,
        theirs: Option<ObjectId>,
    },
}

pub fn resolve(
    base: Option<&ObjectId>,
    ours: Option<&ObjectId>,
    theirs: Option<&ObjectId>,
) -> MergeAction {
    match base {
        Some(_) => {
            let ours_changed = ours != base;
            let theirs_changed = theirs != base;

            match (ours_changed, theirs_changed) {
                (false, true) => match theirs {
                    Some(theirs) => MergeAction::TakeTheirs(theirs.clone()),
                    None => MergeAction::Delete,
                },
                (true, true) if ours != theirs => MergeAction::Conflict {
                    ours: ours.cloned(),
                    theirs: theirs.cloned(),
                },
                _ => MergeAction::KeepOurs,
            }
        }
        None => match (ours, theirs) {
            (None, Some(theirs)) => MergeAction::TakeTheirs(theirs.clone()),
            (Some(ours), Some(theirs)) if ours != theirs => MergeAction::Conflict {
                ours: Some(ours.clone()),
                theirs: Some(theirs.clone()),
            },
            _ => MergeAction::KeepOurs,
        },
    }
}

/// Actions for every path the merge has to touch, in path order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    actions: BTreeMap<String, MergeAction>,
}

impl MergePlan {
    pub fn build(base: &Mapping, ours: &Mapping, theirs: &Mapping) -> Self {
        let paths = base
            .keys()
            .chain(ours.keys())
            .chain(theirs.keys())
            .collect::<BTreeSet<_>>();

        let actions = paths
            .into_iter()
            .filter_map(|path| {
                let action = resolve(base.get(path), ours.get(path), theirs.get(path));
                tracing::trace!(path = %path, action = ?action, "merge decision");

                (action != MergeAction::KeepOurs).then(|| (path.clone(), action))
            })
            .collect();

        Self { actions }
    }

    pub fn actions(&self) -> &BTreeMap<String, MergeAction> {
        &self.actions
    }

    pub fn has_conflicts(&self) -> bool {
        self.actions
            .values()
            .any(|action| matches!(action, MergeAction::Conflict { .. }))
    }
}
