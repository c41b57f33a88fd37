//! Script and batch adapters end to end

use persistree::script::{parse_kth_batch, parse_script, run_script, Command, ScriptError, ScriptRunner};
use persistree::{OrderStatisticTree, RangeStrategy, TreeConfig, TreeError, VersionId};
use test_case::test_case;

#[test_case(RangeStrategy::Lazy ; "lazy")]
#[test_case(RangeStrategy::Permanent ; "permanent")]
fn full_script_round(strategy: RangeStrategy) {
    let script = "\
# five values
build 5 6 7 8 9
range-add v0 2 4 10   # v1
assign v1 3 0         # v2
point-add 0 5 -9      # v3
sum v2 1 5
get v1 3
get v2 3
dump v3
sum v0 1 5
";
    let output = run_script(script, TreeConfig::default().with_strategy(strategy)).unwrap();
    assert_eq!(
        output,
        vec!["v0", "v1", "v2", "v3", "48", "17", "0", "5 6 7 8 0", "35"]
    );
}

#[test]
fn kth_command_over_count_versions() {
    let script = "\
build 0 0 0 0 0 0 0
point-add v0 5 1
point-add v1 2 1
point-add v2 1 1
point-add v3 4 1
point-add v4 7 1
kth v0 v5 3
kth v2 v4 1
";
    let output = run_script(script, TreeConfig::default()).unwrap();
    assert_eq!(output[6..], ["4".to_string(), "1".to_string()]);
}

#[test]
fn kth_command_rejects_rank_beyond_signed_range() {
    let script = "build 0 0 0\npoint-add v0 2 1\nkth v0 v1 18446744073709551615\n";
    let err = run_script(script, TreeConfig::default()).unwrap_err();
    assert_eq!(
        err,
        ScriptError::Tree {
            line: 3,
            source: TreeError::RankOutOfRange {
                k: usize::MAX,
                available: 1
            }
        }
    );
}

#[test]
fn runner_keeps_tree_between_calls() {
    let lines = parse_script("build 1 2 3\nrange-add v0 1 3 1").unwrap();
    let mut runner = ScriptRunner::new(TreeConfig::default().with_space_profiling(true));
    assert!(runner.tree().is_none());

    runner.run(&lines).unwrap();
    let tree = runner.tree().unwrap();
    assert_eq!(tree.version_count(), 2);
    assert_eq!(tree.query_range(VersionId(1), 1, 3).unwrap(), 9);
    assert_eq!(tree.space_profile().map(|p| p.timeline.len()), Some(1));
}

#[test]
fn parse_errors_name_the_line() {
    assert_eq!(
        parse_script("build 1\nfrobnicate v0").unwrap_err(),
        ScriptError::UnknownCommand {
            line: 2,
            command: "frobnicate".to_string()
        }
    );
    assert!(matches!(
        parse_script("build 1\n\nsum v0 1").unwrap_err(),
        ScriptError::Arity { line: 3, command: "sum", expected: 3, found: 2 }
    ));
    assert!(matches!(
        parse_script("get vx 1").unwrap_err(),
        ScriptError::InvalidToken { line: 1, what: "version", .. }
    ));

    let lines = parse_script("sum v3 1 2").unwrap();
    assert_eq!(
        lines[0].command,
        Command::Sum { version: VersionId(3), lo: 1, hi: 2 }
    );
}

#[test]
fn tree_errors_surface_with_line_numbers() {
    let err = run_script("build 1 2 3\nrange-add v0 3 2 1", TreeConfig::default()).unwrap_err();
    assert_eq!(
        err,
        ScriptError::Tree {
            line: 2,
            source: TreeError::InvalidRange { lo: 3, hi: 2, len: 3 }
        }
    );

    let err = run_script("build 1 2 3\nsum v4 1 2", TreeConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ScriptError::Tree { line: 2, source: TreeError::UnknownVersion { version: 4, .. } }
    ));
}

#[test]
fn batch_queries_through_order_statistic_tree() {
    let batch = parse_kth_batch("# values\n5 2 1 4 7\n1 5 3\n3 4 1\n2 5 4\n").unwrap();
    let tree = OrderStatisticTree::from_values(&batch.values).unwrap();

    let answers: Vec<i64> = batch
        .queries
        .iter()
        .map(|&(lo, hi, k)| tree.kth_smallest(lo, hi, k).unwrap())
        .collect();
    assert_eq!(answers, vec![4, 1, 7]);
}
