use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

pub fn write_file(dir: &Path, path: &str, content: &str) {
    let path = dir.join(path);

    // make sure the parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("Failed to create directory {:?}: {}", parent, e));
    }

    std::fs::write(&path, content)
        .unwrap_or_else(|e| panic!("Failed to write file {:?}: {}", path, e));
}

pub fn read_file(dir: &Path, path: &str) -> String {
    let path = dir.join(path);

    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read file {:?}: {}", path, e))
}

pub fn delete_file(dir: &Path, path: &str) {
    let path = dir.join(path);

    std::fs::remove_file(&path)
        .unwrap_or_else(|e| panic!("Failed to delete file {:?}: {}", path, e));
}

/// Every working-tree file with its content, skipping repository metadata
pub fn working_tree_snapshot(dir: &Path) -> BTreeMap<String, String> {
    WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".gitlite")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let relative = entry
                .path()
                .strip_prefix(dir)
                .unwrap_or_else(|e| panic!("Failed to relativize {:?}: {}", entry.path(), e));
            let content = std::fs::read_to_string(entry.path())
                .unwrap_or_else(|e| panic!("Failed to read file {:?}: {}", entry.path(), e));

            (relative.to_string_lossy().replace('\\', "/"), content)
        })
        .collect()
}
