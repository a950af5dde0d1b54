//! Expected-failure lists.
//!
//! One test per line, keyed by the input file's basename:
//!
//! ```text
//! # comment
//! address.wast                 # always expected to fail
//! float_exprs.wast  d8,opt     # only when the run has both `d8` and `opt` attributes
//! ```
//!
//! A line with an attribute list only applies when every listed attribute is part of the run's attribute set.
//! Listing the same test twice among applicable lines is an error.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::errors::{HarnessError, HarnessResult};

/// Where an expected failure was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludeSource {
    pub file: String,
    pub line: usize,
}

/// The set of tests known to currently fail. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedFailures {
    entries: BTreeMap<String, ExcludeSource>,
}

impl ExpectedFailures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse the list at `path`.
    pub fn load(path: &Path, attributes: &BTreeSet<String>) -> HarnessResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            HarnessError::configuration(format!("Cannot read expected failures {}: {}", path.display(), e))
        })?;
        Self::parse(&text, &path.display().to_string(), attributes)
    }

    /// Parse list contents; `source` names the list in error messages.
    pub fn parse(text: &str, source: &str, attributes: &BTreeSet<String>) -> HarnessResult<Self> {
        let mut entries: BTreeMap<String, ExcludeSource> = BTreeMap::new();

        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.split('#').next().unwrap_or("").trim();
            let mut tokens = line.split_whitespace();
            let Some(test) = tokens.next() else {
                continue;
            };
            if let Some(required) = tokens.next() {
                let applies = required
                    .split(',')
                    .filter(|attr| !attr.is_empty())
                    .all(|attr| attributes.contains(attr));
                if !applies {
                    continue;
                }
            }

            let here = ExcludeSource {
                file: source.to_string(),
                line: index + 1,
            };
            if let Some(previous) = entries.get(test) {
                return Err(HarnessError::configuration(format!(
                    "duplicate exclude: [{}] at {}:{} (first listed at {}:{})",
                    raw_line.trim(),
                    here.file,
                    here.line,
                    previous.file,
                    previous.line
                )));
            }
            entries.insert(test.to_string(), here);
        }

        Ok(Self { entries })
    }

    pub fn contains(&self, test: &str) -> bool {
        self.entries.contains_key(test)
    }

    pub fn source(&self, test: &str) -> Option<&ExcludeSource> {
        self.entries.get(test)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Test names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ExpectedFailures {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|name| {
                let source = ExcludeSource {
                    file: "<inline>".to_string(),
                    line: 0,
                };
                (name.into(), source)
            })
            .collect();
        Self { entries }
    }
}
