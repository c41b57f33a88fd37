//! Line-oriented command scripts
//!
//! Turns textual input into calls against a [`PersistentSegmentTree`]:
//!
//! ```text
//! # comment
//! build 5 6 7 8 9
//! range-add v0 2 4 10
//! sum v1 1 5
//! ```
//!
//! Version arguments accept `3` or `v3`.
//!
//! [`PersistentSegmentTree`]: crate::PersistentSegmentTree

mod batch;
mod runner;

pub use batch::{parse_kth_batch, KthBatch};
pub use runner::{run_script, ScriptRunner};

use std::str::FromStr;

use thiserror::Error;

use crate::version::VersionId;
use crate::TreeError;

/// Errors raised while parsing or executing a script.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    /// First word of a line is not a known command.
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand {
        /// 1-based line number
        line: usize,
        /// Offending word
        command: String,
    },

    /// Wrong number of arguments.
    #[error("line {line}: '{command}' expects {expected} arguments, got {found}")]
    Arity {
        /// 1-based line number
        line: usize,
        /// Command name
        command: &'static str,
        /// Arguments required
        expected: usize,
        /// Arguments given
        found: usize,
    },

    /// Argument that does not parse.
    #[error("line {line}: invalid {what} '{token}'")]
    InvalidToken {
        /// 1-based line number
        line: usize,
        /// Kind of argument expected
        what: &'static str,
        /// Offending token
        token: String,
    },

    /// Command that needs a tree before `build` ran.
    #[error("line {line}: no tree has been built yet")]
    NotBuilt {
        /// 1-based line number
        line: usize,
    },

    /// Second `build`.
    #[error("line {line}: the tree was already built")]
    AlreadyBuilt {
        /// 1-based line number
        line: usize,
    },

    /// Tree operation rejected the command.
    #[error("line {line}: {source}")]
    Tree {
        /// 1-based line number
        line: usize,
        /// Underlying failure
        #[source]
        source: TreeError,
    },
}

/// One script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `build <x1> ... <xN>`
    Build(Vec<i64>),
    /// `assign <v> <i> <x>`
    Assign {
        /// Source version
        version: VersionId,
        /// Position
        index: usize,
        /// New value
        value: i64,
    },
    /// `point-add <v> <i> <delta>`
    PointAdd {
        /// Source version
        version: VersionId,
        /// Position
        index: usize,
        /// Delta
        delta: i64,
    },
    /// `range-add <v> <l> <r> <delta>`
    RangeAdd {
        /// Source version
        version: VersionId,
        /// First position
        lo: usize,
        /// Last position
        hi: usize,
        /// Delta
        delta: i64,
    },
    /// `sum <v> <l> <r>`
    Sum {
        /// Version to read
        version: VersionId,
        /// First position
        lo: usize,
        /// Last position
        hi: usize,
    },
    /// `get <v> <i>`
    Get {
        /// Version to read
        version: VersionId,
        /// Position
        index: usize,
    },
    /// `kth <v_lo> <v_hi> <k>`
    Kth {
        /// Subtracted version
        older: VersionId,
        /// Version subtracted from
        newer: VersionId,
        /// 1-based rank
        k: usize,
    },
    /// `dump <v>`
    Dump {
        /// Version to print
        version: VersionId,
    },
}

/// A command with its source line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// 1-based line number
    pub line: usize,
    /// Parsed command
    pub command: Command,
}

/// Parse a whole script, skipping blank lines and `#` comments.
pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut lines = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let line = idx + 1;
        lines.push(ScriptLine {
            line,
            command: parse_command(line, content)?,
        });
    }
    Ok(lines)
}

fn parse_command(line: usize, content: &str) -> Result<Command, ScriptError> {
    let mut words = content.split_whitespace();
    let name = words.next().unwrap_or("");
    let args: Vec<&str> = words.collect();

    let arity = |command: &'static str, expected: usize| {
        if args.len() == expected {
            Ok(())
        } else {
            Err(ScriptError::Arity {
                line,
                command,
                expected,
                found: args.len(),
            })
        }
    };

    let command = match name {
        "build" => Command::Build(
            args.iter()
                .map(|token| parse_token(line, "value", token))
                .collect::<Result<_, _>>()?,
        ),
        "assign" => {
            arity("assign", 3)?;
            Command::Assign {
                version: parse_token(line, "version", args[0])?,
                index: parse_token(line, "index", args[1])?,
                value: parse_token(line, "value", args[2])?,
            }
        }
        "point-add" => {
            arity("point-add", 3)?;
            Command::PointAdd {
                version: parse_token(line, "version", args[0])?,
                index: parse_token(line, "index", args[1])?,
                delta: parse_token(line, "delta", args[2])?,
            }
        }
        "range-add" => {
            arity("range-add", 4)?;
            Command::RangeAdd {
                version: parse_token(line, "version", args[0])?,
                lo: parse_token(line, "index", args[1])?,
                hi: parse_token(line, "index", args[2])?,
                delta: parse_token(line, "delta", args[3])?,
            }
        }
        "sum" => {
            arity("sum", 3)?;
            Command::Sum {
                version: parse_token(line, "version", args[0])?,
                lo: parse_token(line, "index", args[1])?,
                hi: parse_token(line, "index", args[2])?,
            }
        }
        "get" => {
            arity("get", 2)?;
            Command::Get {
                version: parse_token(line, "version", args[0])?,
                index: parse_token(line, "index", args[1])?,
            }
        }
        "kth" => {
            arity("kth", 3)?;
            Command::Kth {
                older: parse_token(line, "version", args[0])?,
                newer: parse_token(line, "version", args[1])?,
                k: parse_token(line, "rank", args[2])?,
            }
        }
        "dump" => {
            arity("dump", 1)?;
            Command::Dump {
                version: parse_token(line, "version", args[0])?,
            }
        }
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            })
        }
    };
    Ok(command)
}

pub(crate) fn parse_token<T: FromStr>(
    line: usize,
    what: &'static str,
    token: &str,
) -> Result<T, ScriptError> {
    token.parse().map_err(|_| ScriptError::InvalidToken {
        line,
        what,
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands_and_comments() {
        let script = "# header\nbuild 1 -2 3\n\nrange-add v0 1 3 4  # bump\nsum 1 1 3\nkth v0 v1 2\n";
        let lines = parse_script(script).unwrap();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].line, 2);
        assert_eq!(lines[0].command, Command::Build(vec![1, -2, 3]));
        assert_eq!(
            lines[1].command,
            Command::RangeAdd {
                version: VersionId(0),
                lo: 1,
                hi: 3,
                delta: 4
            }
        );
        assert_eq!(
            lines[2].command,
            Command::Sum {
                version: VersionId(1),
                lo: 1,
                hi: 3
            }
        );
        assert_eq!(lines[3].line, 6);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_script("frobnicate 1").unwrap_err(),
            ScriptError::UnknownCommand {
                line: 1,
                command: "frobnicate".to_string()
            }
        );
        assert_eq!(
            parse_script("build 1\nsum v0 1").unwrap_err(),
            ScriptError::Arity {
                line: 2,
                command: "sum",
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            parse_script("get vx 1").unwrap_err(),
            ScriptError::InvalidToken {
                line: 1,
                what: "version",
                token: "vx".to_string()
            }
        );
    }
}
