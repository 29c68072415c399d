//! Writing grouped reference pages.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ClidocError;
use crate::group::{file_base, find_existing_page, group_for_key, list_pages};
use crate::node::CommandNode;
use crate::render::render_command;

/// What happened to one page file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Created,
    Updated,
    Unchanged,
}

/// Result of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Page files with their status, in group order.
    pub files: Vec<(PathBuf, FileStatus)>,
    /// Commands rendered.
    pub commands: usize,
}

impl Outcome {
    /// Files that differ (or would differ) from what is on disk.
    #[must_use]
    pub fn would_change(&self) -> usize {
        self.created + self.updated
    }

    fn record(&mut self, path: PathBuf, status: FileStatus) {
        match status {
            FileStatus::Created => self.created += 1,
            FileStatus::Updated => self.updated += 1,
            FileStatus::Unchanged => self.unchanged += 1,
        }
        self.files.push((path, status));
    }
}

/// Renders command nodes into per-resource reference pages.
#[derive(Debug, Clone)]
pub struct Generator {
    output_dir: PathBuf,
    skip_groups: Vec<String>,
    check: bool,
}

impl Generator {
    /// Create a generator writing under `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            skip_groups: Vec::new(),
            check: false,
        }
    }

    /// Groups that get no page.
    #[must_use]
    pub fn with_skip_groups(mut self, groups: Vec<String>) -> Self {
        self.skip_groups = groups;
        self
    }

    /// Compare only, never write.
    #[must_use]
    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render and write every group.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be created or
    /// searched, or a page cannot be read or written.
    pub fn run(&self, nodes: &[CommandNode]) -> Result<Outcome, ClidocError> {
        let mut outcome = Outcome::default();
        if nodes.is_empty() {
            tracing::warn!("No commands found in input");
            return Ok(outcome);
        }

        if !self.check {
            fs::create_dir_all(&self.output_dir)
                .map_err(|e| ClidocError::io(&self.output_dir, e))?;
        }
        let existing = list_pages(&self.output_dir)?;

        let mut groups: BTreeMap<String, Vec<(String, &CommandNode)>> = BTreeMap::new();
        for node in nodes {
            let (group, command_path) = group_for_key(&node.key);
            groups.entry(group).or_default().push((command_path, node));
        }

        for (group, mut commands) in groups {
            if self.skip_groups.contains(&group) {
                tracing::debug!(group = %group, "Skipping group");
                continue;
            }

            let base = file_base(&group);
            let path = find_existing_page(&base, &existing)
                .map_or_else(|| self.output_dir.join(format!("{base}-tba.md")), Path::to_path_buf);

            commands.sort_by(|(a_path, a), (b_path, b)| (a_path, &a.key).cmp(&(b_path, &b.key)));
            let sections: Vec<String> = commands
                .iter()
                .map(|(command_path, node)| render_command(node, command_path))
                .collect();
            let content = format!("{}\n", sections.join("\n\n").trim_end());

            let status = self.write_page(&path, &content)?;
            tracing::debug!(path = %path.display(), status = ?status, commands = commands.len(), "Rendered page");
            outcome.commands += commands.len();
            outcome.record(path, status);
        }

        tracing::info!(
            created = outcome.created,
            updated = outcome.updated,
            unchanged = outcome.unchanged,
            check = self.check,
            "CLI reference generated"
        );
        Ok(outcome)
    }

    fn write_page(&self, path: &Path, content: &str) -> Result<FileStatus, ClidocError> {
        let status = match fs::read_to_string(path) {
            Ok(existing) if existing == content => return Ok(FileStatus::Unchanged),
            Ok(_) => FileStatus::Updated,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileStatus::Created,
            Err(e) => return Err(ClidocError::io(path, e)),
        };
        if !self.check {
            fs::write(path, content).map_err(|e| ClidocError::io(path, e))?;
        }
        Ok(status)
    }
}
