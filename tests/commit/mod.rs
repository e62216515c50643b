mod commit_staged_changes;
