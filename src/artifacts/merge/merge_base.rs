//! Merge base search
//!
//! Finds a common ancestor of two commits with a two-frontier breadth-first search:
//!
//! - frontier 1 starts at `ours`, frontier 2 at `theirs`
//! - each round expands one full BFS layer of frontier 1, then one of frontier 2
//! - popping a commit that already carries the other side's colour ends the search
//! - otherwise the commit takes this side's colour and its parents join the frontier
//!
//! Both frontiers advance at the same pace, so the result is the first common ancestor met
//! by layer depth. Under criss-cross or uneven histories that is *a* common ancestor but not
//! necessarily the lowest one; merges are resolved against whatever this search returns.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{HashMap, VecDeque};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const OURS = 0b01;
        const THEIRS = 0b10;
    }
}

impl VisitState {
    fn opposite(self) -> Self {
        self.complement()
    }
}

/// Merge base finder over any commit source
///
/// The loader maps a commit id to its slim form; the finder never touches the object store
/// directly, which keeps it testable against an in-memory graph.
pub struct MergeBaseFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> MergeBaseFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Common ancestor of `ours` and `theirs`, `None` if their histories never meet
    pub fn find_merge_base(
        &self,
        ours: &ObjectId,
        theirs: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let mut colors = HashMap::<ObjectId, VisitState>::new();
        let mut our_frontier = VecDeque::from([ours.clone()]);
        let mut their_frontier = VecDeque::from([theirs.clone()]);

        while !our_frontier.is_empty() || !their_frontier.is_empty() {
            if let Some(base) =
                self.expand_layer(&mut our_frontier, &mut colors, VisitState::OURS)?
            {
                return Ok(Some(base));
            }
            if let Some(base) =
                self.expand_layer(&mut their_frontier, &mut colors, VisitState::THEIRS)?
            {
                return Ok(Some(base));
            }
        }

        Ok(None)
    }

    fn expand_layer(
        &self,
        frontier: &mut VecDeque<ObjectId>,
        colors: &mut HashMap<ObjectId, VisitState>,
        side: VisitState,
    ) -> anyhow::Result<Option<ObjectId>> {
        tracing::trace!(side = ?side, layer = frontier.len(), "expanding merge base frontier");

        for _ in 0..frontier.len() {
            let Some(commit_id) = frontier.pop_front() else {
                break;
            };

            let state = colors.entry(commit_id.clone()).or_insert(VisitState::empty());
            if state.contains(side.opposite()) {
                tracing::debug!(base = %commit_id, "merge base found");
                return Ok(Some(commit_id));
            }
            if state.contains(side) {
                continue;
            }
            state.insert(side);

            let commit = (self.commit_loader)(&commit_id)?;
            frontier.extend(commit.parents);
        }

        Ok(None)
    }
}
