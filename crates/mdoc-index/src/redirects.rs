//! Redirect table: deprecated documentation URLs mapped to current ones.
//!
//! Raw rows are kept in table order so that repeated sources can be
//! reported. Lookups use the effective mapping, where the first row for a
//! source wins.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::IndexError;
use crate::path::{is_external, join_fragment, normalize_path, split_fragment};
use crate::table::{PipeTable, find_tables};

/// Header of the redirect table.
const REDIRECT_HEADER: [&str; 2] = ["path", "location"];

/// Default limit on redirect chain length.
pub const DEFAULT_MAX_HOPS: usize = 10;

/// One row of the redirect table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectRule {
    /// Source path as written.
    pub from: String,
    /// Destination path or URL as written.
    pub to: String,
    /// 1-based line number in the index page.
    #[serde(skip)]
    pub line: usize,
}

impl RedirectRule {
    /// Create a rule.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>, line: usize) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            line,
        }
    }

    /// Normalized source used as the lookup key.
    #[must_use]
    pub fn source_key(&self) -> String {
        normalize_path(split_fragment(&self.from).0)
    }
}

/// Two rows sharing a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleClash<'a> {
    /// Row that defines the effective mapping.
    pub first: &'a RedirectRule,
    /// Later row for the same source.
    pub repeat: &'a RedirectRule,
}

/// Outcome of resolving a request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    /// Path is a page and is not redirected.
    Page {
        /// Normalized path.
        path: String,
    },
    /// Path is redirected; `target` is the end of the chain.
    Redirect {
        /// Final destination, fragment included.
        target: String,
        /// Number of redirects followed.
        hops: usize,
    },
    /// Path is neither redirected nor a page.
    NotFound {
        /// Normalized path.
        path: String,
    },
}

/// Error returned when a redirect chain cannot be followed to its end.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedirectError {
    /// Chain revisits a path.
    #[error("redirect loop from {path}: {}", .chain.join(" -> "))]
    Loop {
        /// Requested path.
        path: String,
        /// Paths visited, ending with the repeated one.
        chain: Vec<String>,
    },
    /// Chain is longer than the configured limit.
    #[error("redirect chain from {path} exceeds {max} hops")]
    TooManyHops {
        /// Requested path.
        path: String,
        /// Configured limit.
        max: usize,
    },
}

/// Parsed redirect table.
#[derive(Debug, Clone)]
pub struct RedirectTable {
    rules: Vec<RedirectRule>,
    effective: HashMap<String, usize>,
    max_hops: usize,
}

impl Default for RedirectTable {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            effective: HashMap::new(),
            max_hops: DEFAULT_MAX_HOPS,
        }
    }
}

impl RedirectTable {
    /// Parse the redirect table out of an index page.
    ///
    /// Returns an empty table if the page has no `Path | Location` table.
    /// Rows with an empty cell are skipped.
    pub fn parse(markdown: &str) -> Result<Self, IndexError> {
        let Some(table) = find_tables(markdown)
            .into_iter()
            .find(|t| t.has_header(&REDIRECT_HEADER))
        else {
            return Ok(Self::default());
        };
        Ok(Self::from_rules(rules_from_table(&table)?))
    }

    /// Build a table from rules in order.
    #[must_use]
    pub fn from_rules(rules: Vec<RedirectRule>) -> Self {
        let mut effective = HashMap::with_capacity(rules.len());
        for (idx, rule) in rules.iter().enumerate() {
            effective.entry(rule.source_key()).or_insert(idx);
        }
        Self {
            rules,
            effective,
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    /// Set the chain length limit used by [`resolve`](Self::resolve).
    #[must_use]
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Chain length limit.
    #[must_use]
    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    /// Raw rows in table order.
    #[must_use]
    pub fn rules(&self) -> &[RedirectRule] {
        &self.rules
    }

    /// Rows that define the effective mapping, in table order.
    pub fn effective_rules(&self) -> impl Iterator<Item = &RedirectRule> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(idx, rule)| self.effective.get(&rule.source_key()) == Some(idx))
            .map(|(_, rule)| rule)
    }

    /// Number of distinct sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.effective.len()
    }

    /// Whether the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effective.is_empty()
    }

    /// Normalized distinct sources in table order.
    #[must_use]
    pub fn sources(&self) -> Vec<String> {
        self.effective_rules().map(RedirectRule::source_key).collect()
    }

    /// Whether the path (fragment ignored) is a redirect source.
    #[must_use]
    pub fn is_source(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// Direct destination of a path under the effective mapping.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&str> {
        let key = normalize_path(split_fragment(path).0);
        self.effective.get(&key).map(|&i| self.rules[i].to.as_str())
    }

    /// Follow the redirect chain from `path`.
    ///
    /// `is_page` receives normalized paths and decides whether an unredirected
    /// path exists. A fragment on the request is carried to the final target;
    /// without one, the first fragment found on a destination is kept.
    /// External destinations end the chain.
    pub fn resolve(
        &self,
        path: &str,
        is_page: impl Fn(&str) -> bool,
    ) -> Result<Resolution, RedirectError> {
        let (raw, request_fragment) = split_fragment(path);
        let start = normalize_path(raw);
        let mut fragment = request_fragment.map(str::to_owned);
        let mut current = start.clone();
        let mut chain = vec![start.clone()];
        let mut hops = 0;

        while let Some(dest) = self.lookup(&current) {
            hops += 1;
            if hops > self.max_hops {
                return Err(RedirectError::TooManyHops {
                    path: start,
                    max: self.max_hops,
                });
            }

            let (dest_path, dest_fragment) = split_fragment(dest);
            if fragment.is_none() {
                fragment = dest_fragment.map(str::to_owned);
            }
            if is_external(dest_path) {
                return Ok(Resolution::Redirect {
                    target: join_fragment(dest_path.trim(), fragment.as_deref()),
                    hops,
                });
            }

            let next = normalize_path(dest_path);
            if chain.contains(&next) {
                chain.push(next);
                return Err(RedirectError::Loop { path: start, chain });
            }
            chain.push(next.clone());
            current = next;
        }

        if hops > 0 {
            return Ok(Resolution::Redirect {
                target: join_fragment(&current, fragment.as_deref()),
                hops,
            });
        }
        if is_page(&current) {
            Ok(Resolution::Page { path: current })
        } else {
            Ok(Resolution::NotFound { path: current })
        }
    }

    /// Later rows whose source was already mapped to a different destination.
    #[must_use]
    pub fn conflicts(&self) -> Vec<RuleClash<'_>> {
        self.clashes(|first, repeat| !same_destination(first, repeat))
    }

    /// Later rows repeating an earlier row's source and destination.
    #[must_use]
    pub fn duplicates(&self) -> Vec<RuleClash<'_>> {
        self.clashes(same_destination)
    }

    fn clashes(
        &self,
        keep: impl Fn(&RedirectRule, &RedirectRule) -> bool,
    ) -> Vec<RuleClash<'_>> {
        self.rules
            .iter()
            .enumerate()
            .filter_map(|(idx, repeat)| {
                let &first_idx = self.effective.get(&repeat.source_key())?;
                let first = &self.rules[first_idx];
                (first_idx != idx && keep(first, repeat)).then_some(RuleClash { first, repeat })
            })
            .collect()
    }
}

fn same_destination(a: &RedirectRule, b: &RedirectRule) -> bool {
    destination_key(&a.to) == destination_key(&b.to)
}

fn destination_key(to: &str) -> String {
    let (path, fragment) = split_fragment(to);
    join_fragment(&normalize_path(path), fragment)
}

fn rules_from_table(table: &PipeTable) -> Result<Vec<RedirectRule>, IndexError> {
    let mut rules = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        if row.cells.len() < REDIRECT_HEADER.len() {
            return Err(IndexError::ShortRow {
                line: row.line,
                expected: REDIRECT_HEADER.len(),
                found: row.cells.len(),
            });
        }
        let (from, to) = (&row.cells[0], &row.cells[1]);
        if from.is_empty() || to.is_empty() {
            tracing::warn!(line = row.line, "Skipping redirect row with an empty cell");
            continue;
        }
        rules.push(RedirectRule::new(from.as_str(), to.as_str(), row.line));
    }
    Ok(rules)
}
