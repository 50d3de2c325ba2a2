//! Maps pull request titles to an increment level
//!
//! A title must open with a configured keyword, followed by a colon or
//! whitespace and some text: `Minor: add export`, `fix null check`,
//! `DOC: readme`. Titles without a recognised keyword are rejected so that
//! every merged pull request declares its semantic impact.

use crate::config::KeywordsConfig;
use crate::domain::{IncrementLevel, PullRequest};
use crate::error::{PrSemverError, Result};
use regex::Regex;
use std::collections::HashMap;

/// Classifies pull requests by their leading title keyword
#[derive(Debug, Clone)]
pub struct IncrementClassifier {
    pattern: Option<Regex>,
    levels: HashMap<String, IncrementLevel>,
}

impl IncrementClassifier {
    /// Build the keyword table from configuration.
    ///
    /// A keyword listed under several levels maps to the highest of them.
    pub fn new(config: &KeywordsConfig) -> Result<Self> {
        let groups = [
            (&config.major, IncrementLevel::Major),
            (&config.minor, IncrementLevel::Minor),
            (&config.patch, IncrementLevel::Patch),
            (&config.ignored, IncrementLevel::None),
        ];

        let mut levels: HashMap<String, IncrementLevel> = HashMap::new();
        for (keywords, level) in groups {
            for keyword in keywords {
                let keyword = keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    continue;
                }
                let entry = levels.entry(keyword).or_insert(level);
                *entry = (*entry).max(level);
            }
        }

        let pattern = if levels.is_empty() {
            None
        } else {
            let mut keywords: Vec<&String> = levels.keys().collect();
            // longest first keeps the alternation deterministic
            keywords.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
            let alternation = keywords
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            let source = format!(r"(?i)^({})(?::\s*|\s+)\S", alternation);
            let re = Regex::new(&source).map_err(|e| {
                PrSemverError::config(format!("Invalid title keyword table: {}", e))
            })?;
            Some(re)
        };

        Ok(IncrementClassifier { pattern, levels })
    }

    /// Level implied by a single title, or `None` if no keyword matches
    pub fn level_for_title(&self, title: &str) -> Option<IncrementLevel> {
        let captures = self.pattern.as_ref()?.captures(title)?;
        self.levels.get(&captures[1].to_lowercase()).copied()
    }

    /// Reduce pull requests to the single highest increment level.
    ///
    /// No pull requests yields `IncrementLevel::None`. The first title without a
    /// recognised keyword aborts with `InvalidPullRequestTitle`.
    pub fn classify<'a, I>(&self, pull_requests: I) -> Result<IncrementLevel>
    where
        I: IntoIterator<Item = &'a PullRequest>,
    {
        let mut result = IncrementLevel::None;
        for pull_request in pull_requests {
            let level = self.level_for_title(&pull_request.title).ok_or_else(|| {
                PrSemverError::InvalidPullRequestTitle {
                    id: pull_request.id,
                    title: pull_request.title.clone(),
                }
            })?;
            result = result.max(level);
        }
        Ok(result)
    }
}
