//! Include/exclude pattern matching over relative paths.

use regex::Regex;

use crate::error::{Error, Result};

/// Compiled include/exclude regular expressions.
///
/// Matching semantics:
/// - An empty include list matches everything.
/// - A path passes if it matches ANY include pattern.
/// - A path is rejected if it matches ANY exclude pattern, evaluated after
///   includes - exclude always overrides include.
///
/// Patterns are unanchored (`Regex::is_match` substring semantics) and are
/// applied to the forward-slash relative path, never to the absolute path.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    includes: Vec<Regex>,
    excludes: Vec<Regex>,
}

impl PatternSet {
    /// Compile include and exclude pattern lists.
    ///
    /// A pattern that fails to compile is a configuration error naming the
    /// offending pattern.
    pub fn compile<I, E>(includes: &[I], excludes: &[E]) -> Result<Self>
    where
        I: AsRef<str>,
        E: AsRef<str>,
    {
        Ok(PatternSet {
            includes: compile_all(includes)?,
            excludes: compile_all(excludes)?,
        })
    }

    /// A pattern set that matches every path.
    pub fn match_all() -> Self {
        PatternSet::default()
    }

    /// Whether `relative` (forward-slash separated) is selected.
    pub fn matches(&self, relative: &str) -> bool {
        if !self.includes.is_empty() && !self.includes.iter().any(|re| re.is_match(relative)) {
            return false;
        }
        !self.excludes.iter().any(|re| re.is_match(relative))
    }
}

fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p.as_ref()).map_err(|source| Error::Pattern {
                pattern: p.as_ref().to_string(),
                source,
            })
        })
        .collect()
}
