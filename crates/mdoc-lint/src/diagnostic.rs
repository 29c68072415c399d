//! Diagnostics and the lint report.

use std::fmt;
use std::fmt::Write;
use std::str::FromStr;

use serde::Serialize;

/// Check that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Code {
    BrokenLink,
    RedirectedLink,
    BrokenAnchor,
    DuplicateHeading,
    NavMissingPage,
    NavDuplicatePath,
    NavLevelJump,
    OrphanPage,
    RedirectConflict,
    RedirectDuplicate,
    RedirectSelf,
    RedirectLoop,
    RedirectChain,
    RedirectDangling,
    RedirectShadowsPage,
    ExternalLink,
}

impl Code {
    /// Every code, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::BrokenLink,
        Self::RedirectedLink,
        Self::BrokenAnchor,
        Self::DuplicateHeading,
        Self::NavMissingPage,
        Self::NavDuplicatePath,
        Self::NavLevelJump,
        Self::OrphanPage,
        Self::RedirectConflict,
        Self::RedirectDuplicate,
        Self::RedirectSelf,
        Self::RedirectLoop,
        Self::RedirectChain,
        Self::RedirectDangling,
        Self::RedirectShadowsPage,
        Self::ExternalLink,
    ];

    /// Kebab-case name used in config and output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BrokenLink => "broken-link",
            Self::RedirectedLink => "redirected-link",
            Self::BrokenAnchor => "broken-anchor",
            Self::DuplicateHeading => "duplicate-heading",
            Self::NavMissingPage => "nav-missing-page",
            Self::NavDuplicatePath => "nav-duplicate-path",
            Self::NavLevelJump => "nav-level-jump",
            Self::OrphanPage => "orphan-page",
            Self::RedirectConflict => "redirect-conflict",
            Self::RedirectDuplicate => "redirect-duplicate",
            Self::RedirectSelf => "redirect-self",
            Self::RedirectLoop => "redirect-loop",
            Self::RedirectChain => "redirect-chain",
            Self::RedirectDangling => "redirect-dangling",
            Self::RedirectShadowsPage => "redirect-shadows-page",
            Self::ExternalLink => "external-link",
        }
    }

    /// Severity diagnostics with this code carry.
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::BrokenLink
            | Self::BrokenAnchor
            | Self::NavMissingPage
            | Self::RedirectConflict
            | Self::RedirectSelf
            | Self::RedirectLoop
            | Self::RedirectDangling => Severity::Error,
            Self::RedirectedLink
            | Self::DuplicateHeading
            | Self::NavDuplicatePath
            | Self::NavLevelJump
            | Self::OrphanPage
            | Self::RedirectDuplicate
            | Self::RedirectChain
            | Self::RedirectShadowsPage
            | Self::ExternalLink => Severity::Warning,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unrecognized lint code name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown lint code '{0}'")]
pub struct UnknownCode(pub String);

impl FromStr for Code {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCode(s.to_owned()))
    }
}

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// Where a diagnostic points.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Location {
    /// Line of a source file, relative to the source directory.
    File { path: String, line: usize },
    /// Row of the navigation table.
    Nav { line: usize },
    /// Row of the redirect table.
    Redirect { line: usize },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { path, line } => write!(f, "{path}:{line}"),
            Self::Nav { line } => write!(f, "navigation table:{line}"),
            Self::Redirect { line } => write!(f, "redirect table:{line}"),
        }
    }
}

/// One finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: Code,
    pub severity: Severity,
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic with the code's severity.
    pub fn new(code: Code, location: Location, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.severity(),
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.location, self.severity, self.code, self.message
        )
    }
}

/// Counts of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
}

/// Sorted diagnostics of a lint run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    /// Build a report, sorting by location then code.
    #[must_use]
    pub fn new(mut diagnostics: Vec<Diagnostic>) -> Self {
        diagnostics.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then(a.code.cmp(&b.code))
                .then_with(|| a.message.cmp(&b.message))
        });
        Self { diagnostics }
    }

    /// All diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Error diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    /// Warning diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Whether any error was found.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Whether the run passes; `strict` also fails on warnings.
    #[must_use]
    pub fn is_clean(&self, strict: bool) -> bool {
        if strict {
            self.diagnostics.is_empty()
        } else {
            !self.has_errors()
        }
    }

    /// Error and warning counts.
    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary {
            errors: self.errors().count(),
            warnings: self.warnings().count(),
        }
    }

    /// One line per diagnostic.
    #[must_use]
    pub fn render_human(&self) -> String {
        let mut out = String::new();
        for diagnostic in &self.diagnostics {
            let _ = writeln!(out, "{diagnostic}");
        }
        out
    }
}
