//! Key filter: a case-insensitive regular expression, swapped wholesale.

#![forbid(unsafe_code)]

use regex::{Regex, RegexBuilder};
use tracing::{debug, info};

use crate::registry::EntryRegistry;
use crate::VisibilityCommand;

#[derive(Debug, thiserror::Error)]
#[error("invalid filter pattern {pattern:?}: {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// Compiled filter. `None` matches every key.
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    re: Option<Regex>,
}

impl Predicate {
    pub fn match_all() -> Self {
        Self { re: None }
    }

    /// Empty (or all-whitespace) text compiles to match-all.
    pub fn compile(text: &str) -> Result<Self, PatternError> {
        if text.trim().is_empty() {
            return Ok(Self::match_all());
        }
        let re = RegexBuilder::new(text)
            .case_insensitive(true)
            .build()
            .map_err(|source| PatternError { pattern: text.to_string(), source })?;
        Ok(Self { re: Some(re) })
    }

    pub fn matches(&self, key: &str) -> bool {
        match &self.re {
            None => true,
            Some(re) => re.is_match(key),
        }
    }

    pub fn is_match_all(&self) -> bool {
        self.re.is_none()
    }

    pub fn as_str(&self) -> &str {
        self.re.as_ref().map(|r| r.as_str()).unwrap_or("")
    }
}

/// Owns the active predicate; starts as match-all.
#[derive(Debug, Default)]
pub struct FilterEngine {
    active: Predicate,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predicate(&self) -> &Predicate {
        &self.active
    }

    /// Compile `text`, swap it in and re-evaluate every entry.
    /// On a bad pattern nothing changes: the old predicate stays active and
    /// no entry is touched.
    pub fn set_pattern(
        &mut self,
        text: &str,
        registry: &mut EntryRegistry,
    ) -> Result<Vec<VisibilityCommand>, PatternError> {
        let next = match Predicate::compile(text) {
            Ok(p) => p,
            Err(e) => {
                debug!(pattern = %text, error = %e, "filter: rejected");
                return Err(e);
            }
        };
        self.active = next;
        let changed = registry.apply_filter(&self.active);
        info!(pattern = %self.active.as_str(), changed = changed.len(), "filter: applied");
        Ok(changed)
    }

    pub fn clear(&mut self, registry: &mut EntryRegistry) -> Vec<VisibilityCommand> {
        self.active = Predicate::match_all();
        registry.apply_filter(&self.active)
    }
}
