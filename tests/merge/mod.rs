mod merge_branches;
mod merge_preconditions;
