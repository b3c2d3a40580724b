//! End-to-end detection over real source trees.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use draupnir::core::config::DetectionConfig;
use draupnir::core::pipeline::{CloneDetector, Preprocessor};

/// One parsed pair-file row: (id1, id2, ngram_sim, lcs_sim).
type PairRow = (u32, u32, u32, Option<u32>);

fn run_detection(
    root: &Path,
    out: &Path,
    mutate: impl FnOnce(&mut DetectionConfig),
) -> (usize, Vec<PairRow>) {
    let mut config = DetectionConfig::default();
    mutate(&mut config);
    let config = Arc::new(config);
    config.validate().expect("test configuration must be valid");

    let blocks_path = out.join("code_blocks.csv");
    let pair_path = out.join("clone_pairs.csv");

    let (corpus, _) = Preprocessor::new(Arc::clone(&config))
        .run(root, &blocks_path)
        .expect("preprocessing should succeed");
    let sequences = corpus.len();

    CloneDetector::new(config)
        .run(
            &Arc::new(corpus),
            &pair_path,
            Arc::new(AtomicBool::new(false)),
        )
        .expect("detection should succeed");

    let mut pairs: Vec<PairRow> = fs::read_to_string(&pair_path)
        .expect("pair file should exist")
        .lines()
        .map(|line| {
            let fields: Vec<&str> = line.split(',').collect();
            (
                fields[0].parse().unwrap(),
                fields[1].parse().unwrap(),
                fields[2].parse().unwrap(),
                fields.get(3).map(|f| f.parse().unwrap()),
            )
        })
        .collect();
    // Emission order is unspecified; compare as a sorted set
    pairs.sort();
    (sequences, pairs)
}

/// Map sequence ids to (file, start, end) via the code-blocks file.
fn read_code_blocks(out: &Path) -> HashMap<u32, (String, usize, usize)> {
    fs::read_to_string(out.join("code_blocks.csv"))
        .expect("code-blocks file should exist")
        .lines()
        .enumerate()
        .map(|(id, line)| {
            let fields: Vec<&str> = line.split(',').collect();
            (
                id as u32,
                (
                    fields[0].to_string(),
                    fields[1].parse().unwrap(),
                    fields[2].parse().unwrap(),
                ),
            )
        })
        .collect()
}

const CHECKSUM_JAVA: &str = r#"
class Checksum {
    static int fold(int[] values, int seed) {
        int acc = seed;
        for (int i = 0; i < values.length; i++) {
            acc = acc * 31 + values[i];
            if (acc < 0) {
                acc = -acc;
            }
        }
        return acc;
    }
}
"#;

const DIGEST_JAVA: &str = r#"
class Digest {
    static int fold(int[] values, int seed) {
        int acc = seed;
        for (int i = 0; i < values.length; i++) {
            acc = acc * 31 + values[i];
            if (acc < 0) {
                acc = -acc;
            }
        }
        return acc;
    }
}
"#;

#[test]
fn identical_functions_in_two_files_form_one_perfect_pair() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("Checksum.java"), CHECKSUM_JAVA).unwrap();
    fs::write(src.join("Digest.java"), DIGEST_JAVA).unwrap();

    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    let (sequences, pairs) = run_detection(&src, &out, |config| {
        config.min_line = 3;
        config.min_token = 10;
    });

    assert_eq!(sequences, 2);
    assert_eq!(pairs, vec![(0, 1, 100, None)]);

    // File and line ranges are recoverable through the code-blocks file
    let blocks = read_code_blocks(&out);
    let (file1, start1, end1) = &blocks[&0];
    let (file2, ..) = &blocks[&1];
    assert!(file1.ends_with("Checksum.java"));
    assert!(file2.ends_with("Digest.java"));
    assert!(start1 < end1);
}

#[test]
fn unrelated_functions_produce_no_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("Checksum.java"), CHECKSUM_JAVA).unwrap();
    fs::write(
        src.join("Parser.java"),
        r#"
class Parser {
    static String strip(String raw) {
        StringBuilder out = new StringBuilder();
        for (char c : raw.toCharArray()) {
            if (!Character.isWhitespace(c)) {
                out.append(c);
            }
        }
        return out.toString();
    }
}
"#,
    )
    .unwrap();

    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    let (sequences, pairs) = run_detection(&src, &out, |config| {
        config.min_line = 3;
        config.min_token = 10;
    });

    assert_eq!(sequences, 2);
    assert!(pairs.is_empty());
}

#[test]
fn empty_source_tree_yields_empty_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    let (sequences, pairs) = run_detection(&src, &out, |_| {});
    assert_eq!(sequences, 0);
    assert!(pairs.is_empty());
    assert!(fs::read_to_string(out.join("clone_pairs.csv"))
        .unwrap()
        .is_empty());
}

#[test]
fn partition_count_does_not_change_the_pair_set() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("Checksum.java"), CHECKSUM_JAVA).unwrap();
    fs::write(src.join("Digest.java"), DIGEST_JAVA).unwrap();
    fs::write(
        src.join("Variant.java"),
        r#"
class Variant {
    static int fold(int[] values, int seed) {
        int acc = seed;
        for (int i = 0; i < values.length; i++) {
            acc = acc * 37 + values[i] + 1;
            if (acc < 0) {
                acc = -acc;
            }
        }
        return acc;
    }
}
"#,
    )
    .unwrap();

    let out_single = dir.path().join("single");
    fs::create_dir(&out_single).unwrap();
    let (_, baseline) = run_detection(&src, &out_single, |config| {
        config.min_line = 3;
        config.min_token = 10;
        config.partition_count = 1;
    });
    assert!(!baseline.is_empty());

    for partition_count in [2, 7] {
        let out = dir.path().join(format!("partitions-{partition_count}"));
        fs::create_dir(&out).unwrap();
        let (_, pairs) = run_detection(&src, &out, |config| {
            config.min_line = 3;
            config.min_token = 10;
            config.partition_count = partition_count;
        });
        assert_eq!(pairs, baseline, "partition_count {partition_count}");
    }
}

#[test]
fn thread_count_does_not_change_the_pair_set() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    for i in 0..6 {
        fs::write(
            src.join(format!("Copy{i}.java")),
            CHECKSUM_JAVA.replace("Checksum", &format!("Copy{i}")),
        )
        .unwrap();
    }

    let out_single = dir.path().join("one-thread");
    fs::create_dir(&out_single).unwrap();
    let (_, single) = run_detection(&src, &out_single, |config| {
        config.min_line = 3;
        config.min_token = 10;
        config.threads = 1;
    });

    let out_parallel = dir.path().join("eight-threads");
    fs::create_dir(&out_parallel).unwrap();
    let (_, parallel) = run_detection(&src, &out_parallel, |config| {
        config.min_line = 3;
        config.min_token = 10;
        config.threads = 8;
    });

    // All 15 unordered pairs of the 6 identical functions, in either case
    assert_eq!(single.len(), 15);
    assert_eq!(single, parallel);
}

#[test]
fn python_corpus_detects_renamed_near_clone_via_lcs() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    fs::write(
        src.join("metrics.py"),
        r#"
def summarize(rows):
    total = 0
    count = 0
    for row in rows:
        total += row.value
        count += 1
    if count == 0:
        return 0
    return total / count
"#,
    )
    .unwrap();
    fs::write(
        src.join("stats.py"),
        r#"
def averaged(entries):
    small = entries[0]
    total = 0
    count = 0
    for entry in entries:
        total += entry.value
        count += 1
    if count == 0:
        return 0
    return total / count
"#,
    )
    .unwrap();

    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    let (sequences, pairs) = run_detection(&src, &out, |config| {
        config.language = "python".to_string();
        config.min_line = 3;
        config.min_token = 10;
        config.filtration_threshold = 10;
        config.verification_threshold = 70;
    });

    assert_eq!(sequences, 2);
    assert_eq!(pairs.len(), 1, "expected one near-clone pair: {pairs:?}");
    let (id1, id2, ngram_sim, _) = pairs[0];
    assert_eq!((id1, id2), (0, 1));
    assert!(ngram_sim >= 10);
}
