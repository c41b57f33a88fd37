use std::collections::HashSet;

use blake3::hash;
use persistree::script::run_script;
use persistree::{PersistentSegmentTree, RangeStrategy, TreeConfig, VersionId};

const SCRIPT: &str = "\
build 3 1 4 1 5 9 2 6 5 3 5 8 9 7 9
range-add v0 2 11 4
assign v1 7 -20
range-add v0 1 15 -1
point-add v2 3 12
range-add v4 5 9 6
sum v5 1 15
kth v0 v1 10
dump v5
dump v3
";

#[test]
fn script_output_is_deterministic() {
    let mut fingerprints = HashSet::new();
    for _ in 0..3 {
        for strategy in RangeStrategy::ALL {
            let config = TreeConfig::default().with_strategy(strategy);
            let output = run_script(SCRIPT, config).expect("script runs");
            fingerprints.insert(hash(output.join("\n").as_bytes()));
        }
    }

    assert_eq!(fingerprints.len(), 1, "outputs diverged across runs or strategies");
}

#[test]
fn version_fingerprints_agree_across_strategies() {
    let values: Vec<i64> = (0..97).map(|i| (i * 7919) % 211 - 105).collect();
    let mut per_strategy = Vec::new();

    for strategy in RangeStrategy::ALL {
        let mut tree =
            PersistentSegmentTree::build_with_config(&values, TreeConfig::default().with_strategy(strategy))
                .expect("build succeeds");
        let mut version = VersionId::INITIAL;
        for step in 0..40usize {
            let lo = 1 + (step * 13) % 97;
            let hi = (lo + step * 5).min(97);
            version = if step % 3 == 0 {
                tree.update_point(version, hi, step as i64)
            } else {
                tree.update_range(version, lo, hi, step as i64 - 20)
            }
            .expect("update succeeds");
        }
        let fingerprints: Vec<_> = (0..tree.version_count())
            .map(|v| tree.fingerprint(VersionId(v)).expect("known version"))
            .collect();
        per_strategy.push(fingerprints);
    }

    assert_eq!(per_strategy[0], per_strategy[1]);
}
