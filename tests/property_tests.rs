//! Property-based tests for fingerprinting and grouping.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use proptest::prelude::*;
use tempfile::TempDir;

use picuniq::duplicates::{group_by_content, GrouperConfig};
use picuniq::scanner::{FileEntry, Hasher};

fn write_file(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(&path).unwrap();
    f.write_all(content).unwrap();
    path
}

proptest! {
    // Fingerprints depend on content only, never on path or write order.
    #[test]
    fn identical_content_hashes_identically(content in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let dir = TempDir::new().unwrap();
        let a = write_file(dir.path(), "deeply/nested/first.jpg", &content);
        let b = write_file(dir.path(), "second.jpg", &content);

        let hasher = Hasher::new();
        prop_assert_eq!(hasher.hash_file(&a).unwrap(), hasher.hash_file(&b).unwrap());
    }

    // Different content yields different fingerprints (collision
    // probability is negligible at these sizes).
    #[test]
    fn distinct_content_hashes_distinctly(
        a in proptest::collection::vec(any::<u8>(), 1..1024),
        b in proptest::collection::vec(any::<u8>(), 1..1024),
    ) {
        prop_assume!(a != b);
        let dir = TempDir::new().unwrap();
        let pa = write_file(dir.path(), "a.jpg", &a);
        let pb = write_file(dir.path(), "b.jpg", &b);

        let hasher = Hasher::new();
        prop_assert_ne!(hasher.hash_file(&pa).unwrap(), hasher.hash_file(&pb).unwrap());
    }

    // The grouping partitions the input: every file appears in exactly
    // one group, and group sizes sum to the input size.
    #[test]
    fn grouping_partitions_the_input(
        contents in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..256), 1..20),
        assignment in proptest::collection::vec(0usize..5, 1..20),
    ) {
        let dir = TempDir::new().unwrap();

        // Each file gets a content picked from the pool; repeats create
        // genuine duplicates
        let mut entries = Vec::new();
        for (i, pick) in assignment.iter().enumerate() {
            let content = &contents[pick % contents.len()];
            let path = write_file(dir.path(), &format!("d{}/f{}.jpg", i % 3, i), content);
            entries.push(FileEntry::new(path, content.len() as u64));
        }
        let input_paths: HashSet<PathBuf> = entries.iter().map(|e| e.path.clone()).collect();

        let (groups, stats) = group_by_content(
            entries,
            Arc::new(Hasher::new()),
            &GrouperConfig::default().with_io_threads(4),
        );

        prop_assert_eq!(stats.failed_files, 0);

        let mut seen = HashSet::new();
        for group in &groups {
            prop_assert!(!group.is_empty());
            for file in &group.files {
                // No path appears twice across groups
                prop_assert!(seen.insert(file.path.clone()));
            }
        }
        // Union of groups equals the input set
        prop_assert_eq!(seen, input_paths);

        let member_total: usize = groups.iter().map(picuniq::duplicates::ContentGroup::len).sum();
        prop_assert_eq!(member_total, stats.hashed_files);

        // Distinct contents match the number of distinct byte strings used
        let distinct_used: HashSet<&Vec<u8>> = assignment
            .iter()
            .map(|pick| &contents[pick % contents.len()])
            .collect();
        prop_assert_eq!(groups.len(), distinct_used.len());
    }
}
