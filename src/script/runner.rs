//! Script execution

use tracing::debug;

use crate::persistent::{PersistentSegmentTree, TreeConfig};
use crate::TreeError;

use super::{parse_script, Command, ScriptError, ScriptLine};

/// Executes parsed commands against one tree, producing one output line
/// per command.
#[derive(Debug)]
pub struct ScriptRunner {
    config: TreeConfig,
    tree: Option<PersistentSegmentTree>,
}

impl ScriptRunner {
    /// Runner whose tree will be built with `config`.
    pub fn new(config: TreeConfig) -> Self {
        Self { config, tree: None }
    }

    /// Tree built by the script so far.
    pub fn tree(&self) -> Option<&PersistentSegmentTree> {
        self.tree.as_ref()
    }

    /// Execute every line, stopping at the first failure.
    pub fn run(&mut self, lines: &[ScriptLine]) -> Result<Vec<String>, ScriptError> {
        lines.iter().map(|line| self.execute(line)).collect()
    }

    /// Execute one line and return its output.
    pub fn execute(&mut self, script_line: &ScriptLine) -> Result<String, ScriptError> {
        let line = script_line.line;
        let tree_err = |source: TreeError| ScriptError::Tree { line, source };
        debug!(line, command = ?script_line.command, "executing");

        if let Command::Build(values) = &script_line.command {
            if self.tree.is_some() {
                return Err(ScriptError::AlreadyBuilt { line });
            }
            let tree = PersistentSegmentTree::build_with_config(values, self.config.clone())
                .map_err(tree_err)?;
            let output = tree.latest().to_string();
            self.tree = Some(tree);
            return Ok(output);
        }

        let tree = self.tree.as_mut().ok_or(ScriptError::NotBuilt { line })?;
        let output = match script_line.command {
            Command::Build(_) => return Err(ScriptError::AlreadyBuilt { line }),
            Command::Assign {
                version,
                index,
                value,
            } => tree.update_point(version, index, value).map_err(tree_err)?.to_string(),
            Command::PointAdd {
                version,
                index,
                delta,
            } => tree.point_add(version, index, delta).map_err(tree_err)?.to_string(),
            Command::RangeAdd {
                version,
                lo,
                hi,
                delta,
            } => tree
                .update_range(version, lo, hi, delta)
                .map_err(tree_err)?
                .to_string(),
            Command::Sum { version, lo, hi } => {
                tree.query_range(version, lo, hi).map_err(tree_err)?.to_string()
            }
            Command::Get { version, index } => tree.get(version, index).map_err(tree_err)?.to_string(),
            Command::Kth { older, newer, k } => tree.kth(older, newer, k).map_err(tree_err)?.to_string(),
            Command::Dump { version } => tree
                .materialize(version)
                .map_err(tree_err)?
                .iter()
                .map(|value| value.to_string())
                .collect::<Vec<_>>()
                .join(" "),
        };
        Ok(output)
    }
}

/// Parse and run `text` with a fresh tree.
pub fn run_script(text: &str, config: TreeConfig) -> Result<Vec<String>, ScriptError> {
    let lines = parse_script(text)?;
    ScriptRunner::new(config).run(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::RangeStrategy;

    #[test]
    fn test_run_range_sum_script() {
        let script = "build 5 6 7 8 9\nsum v0 1 5\nrange-add v0 2 4 10\nsum v1 1 5\nsum v0 1 5\ndump v1\n";
        for strategy in RangeStrategy::ALL {
            let output = run_script(script, TreeConfig::default().with_strategy(strategy)).unwrap();
            assert_eq!(output, vec!["v0", "35", "v1", "65", "35", "5 16 17 18 9"]);
        }
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let err = run_script("sum v0 1 1", TreeConfig::default()).unwrap_err();
        assert_eq!(err, ScriptError::NotBuilt { line: 1 });

        let err = run_script("build 1 2\nbuild 3", TreeConfig::default()).unwrap_err();
        assert_eq!(err, ScriptError::AlreadyBuilt { line: 2 });

        let err = run_script("build 1 2\nget v0 3", TreeConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ScriptError::Tree {
                line: 2,
                source: TreeError::IndexOutOfRange { index: 3, len: 2 }
            }
        );
    }
}
