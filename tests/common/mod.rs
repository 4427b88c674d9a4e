#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Smallest byte string that starts like a PNG file.
pub const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

pub fn write_png(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, PNG_MAGIC).expect("write png file");
}

/// Creates `root/<category>/<file>` for every listed file.
pub fn build_tree(root: &Path, layout: &[(&str, &[&str])]) {
    fs::create_dir_all(root).expect("create train root");
    for (category, files) in layout {
        let dir = root.join(category);
        fs::create_dir_all(&dir).expect("create category dir");
        for file in *files {
            write_png(&dir.join(file));
        }
    }
}

/// Sorted names of the regular files directly under `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    entry_names(dir, |file_type| file_type.is_file())
}

/// Sorted names of the directories directly under `dir`.
pub fn dir_names(dir: &Path) -> Vec<String> {
    entry_names(dir, |file_type| file_type.is_dir())
}

fn entry_names(dir: &Path, keep: impl Fn(fs::FileType) -> bool) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry"))
        .filter(|entry| keep(entry.file_type().expect("file type")))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
