//! Batch k-th query input
//!
//! First non-comment line: the values. Each following line: `l r k`.

use super::{parse_token, ScriptError};

/// Values plus `(l, r, k)` queries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KthBatch {
    /// Input values, position 1 first
    pub values: Vec<i64>,
    /// Queries as (l, r, k), all 1-based
    pub queries: Vec<(usize, usize, usize)>,
}

/// Parse a batch of k-th queries.
pub fn parse_kth_batch(text: &str) -> Result<KthBatch, ScriptError> {
    let mut batch = KthBatch::default();
    let mut seen_values = false;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = content.split_whitespace().collect();

        if !seen_values {
            batch.values = tokens
                .iter()
                .map(|token| parse_token(line, "value", token))
                .collect::<Result<_, _>>()?;
            seen_values = true;
            continue;
        }

        if tokens.len() != 3 {
            return Err(ScriptError::Arity {
                line,
                command: "query",
                expected: 3,
                found: tokens.len(),
            });
        }
        batch.queries.push((
            parse_token(line, "index", tokens[0])?,
            parse_token(line, "index", tokens[1])?,
            parse_token(line, "rank", tokens[2])?,
        ));
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_batch() {
        let batch = parse_kth_batch("5 2 1 4 7\n1 5 3\n\n3 4 1\n").unwrap();
        assert_eq!(batch.values, vec![5, 2, 1, 4, 7]);
        assert_eq!(batch.queries, vec![(1, 5, 3), (3, 4, 1)]);
    }

    #[test]
    fn test_bad_query_line() {
        let err = parse_kth_batch("1 2\n1 2").unwrap_err();
        assert!(matches!(err, ScriptError::Arity { line: 2, .. }));
    }
}
