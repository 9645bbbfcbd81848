//! Literal token substitution applied to path strings or file content.

use serde::{Deserialize, Serialize};

/// One literal find-and-replace rule.
///
/// Filters are applied in registration order: the first filter is applied
/// fully, the second on the result, and so on. Tokens are literal strings,
/// never patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenFilter {
    pub token: String,
    pub value: String,
}

impl TokenFilter {
    pub fn new(token: impl Into<String>, value: impl Into<String>) -> Self {
        TokenFilter {
            token: token.into(),
            value: value.into(),
        }
    }

    fn apply(&self, input: &str) -> String {
        input.replace(&self.token, &self.value)
    }
}

/// Apply every filter in order to `input`.
pub fn apply_all(filters: &[TokenFilter], input: &str) -> String {
    filters
        .iter()
        .fold(input.to_string(), |acc, filter| filter.apply(&acc))
}
