//! Substring search over large vocabularies such as the taxonomy lists.

use serde::Serialize;

/// Result of an [`autocomplete`] query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AutocompleteOutcome {
    /// Terms containing the query, at most `limit` of them.
    Matches {
        /// A term equal to the query ignoring case, if any.
        exact: Option<String>,
        matches: Vec<String>,
    },
    /// More terms matched than the limit allows; the query should be refined.
    TooMany { count: usize },
    /// Nothing matched, or the query was blank.
    NoMatch,
}

/// Case-insensitive substring search of `terms`.
pub fn autocomplete<'a, I>(terms: I, query: &str, limit: usize) -> AutocompleteOutcome
where
    I: IntoIterator<Item = &'a str>,
{
    let query = query.trim();
    if query.is_empty() {
        return AutocompleteOutcome::NoMatch;
    }
    let needle = query.to_lowercase();

    let mut exact = None;
    let mut matches = Vec::new();
    let mut count = 0usize;
    for term in terms {
        let lowered = term.to_lowercase();
        if !lowered.contains(&needle) {
            continue;
        }
        if exact.is_none() && lowered == needle {
            exact = Some(term.to_string());
        }
        count += 1;
        if count <= limit {
            matches.push(term.to_string());
        }
    }

    match count {
        0 => AutocompleteOutcome::NoMatch,
        n if n > limit => AutocompleteOutcome::TooMany { count: n },
        _ => AutocompleteOutcome::Matches { exact, matches },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECIES: &[&str] = &[
        "Homo sapiens",
        "Homo sapiens neanderthalensis",
        "Mus musculus",
        "Mus spretus",
    ];

    #[test]
    fn test_matches_with_exact() {
        let outcome = autocomplete(SPECIES.iter().copied(), "homo SAPIENS", 500);
        assert_eq!(
            outcome,
            AutocompleteOutcome::Matches {
                exact: Some("Homo sapiens".to_string()),
                matches: vec![
                    "Homo sapiens".to_string(),
                    "Homo sapiens neanderthalensis".to_string()
                ],
            }
        );
    }

    #[test]
    fn test_matches_without_exact() {
        match autocomplete(SPECIES.iter().copied(), "mus", 500) {
            AutocompleteOutcome::Matches { exact, matches } => {
                assert!(exact.is_none());
                assert_eq!(matches.len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_too_many_and_limit_boundary() {
        assert_eq!(
            autocomplete(SPECIES.iter().copied(), "s", 3),
            AutocompleteOutcome::TooMany { count: 4 }
        );
        assert!(matches!(
            autocomplete(SPECIES.iter().copied(), "s", 4),
            AutocompleteOutcome::Matches { .. }
        ));
    }

    #[test]
    fn test_blank_and_missing() {
        assert_eq!(autocomplete(SPECIES.iter().copied(), "  ", 10), AutocompleteOutcome::NoMatch);
        assert_eq!(autocomplete(SPECIES.iter().copied(), "danio", 10), AutocompleteOutcome::NoMatch);
    }
}
