//! Exclusion rules for packaging.
//!
//! A rule is a literal substring. A name or path is excluded when any rule
//! occurs anywhere in it, ignoring ASCII and Unicode case. Glob characters
//! carry no meaning, so `*-backup-*` only matches names containing those
//! exact characters.
//!
//! Unanchored substring matching can exclude legitimate files: `contests.php`
//! contains `tests`, `jquery.mdl.js` contains `.md`. Choose rules with
//! that in mind.

use std::path::Path;

/// Ordered set of case-insensitive substring exclusion rules.
///
/// # Examples
///
/// ```
/// use plugpack_core::filters::ExclusionRules;
///
/// let rules = ExclusionRules::new([".git", "node_modules", "tests"]);
///
/// assert!(rules.is_excluded_name(".gitignore"));
/// assert!(rules.is_excluded_name("Node_Modules"));
/// assert!(!rules.is_excluded_name("plugin.php"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRules {
    /// Rules as given, used for reporting.
    patterns: Vec<String>,
    /// Lowercased rules, used for matching.
    folded: Vec<String>,
}

impl ExclusionRules {
    /// Builds a rule set from patterns. Empty patterns are dropped, since
    /// they would exclude everything.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(Into::into)
            .filter(|p| !p.is_empty())
            .collect();
        let folded = patterns.iter().map(|p| p.to_lowercase()).collect();
        Self { patterns, folded }
    }

    /// Returns the rules in their original spelling.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns the first rule contained in `name`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugpack_core::filters::ExclusionRules;
    ///
    /// let rules = ExclusionRules::new([".md", ".log"]);
    /// assert_eq!(rules.matching_rule("CHANGELOG.MD"), Some(".md"));
    /// assert_eq!(rules.matching_rule("plugin.php"), None);
    /// ```
    #[must_use]
    pub fn matching_rule(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.folded
            .iter()
            .position(|rule| name.contains(rule.as_str()))
            .map(|idx| self.patterns[idx].as_str())
    }

    /// Checks a single file or directory name against the rules.
    #[must_use]
    pub fn is_excluded_name(&self, name: &str) -> bool {
        self.matching_rule(name).is_some()
    }

    /// Checks a path against the rules.
    ///
    /// The path is tested as one string, with `/` separators, so rules that
    /// span a directory boundary (such as `assets/dev`) also apply.
    /// Non-UTF-8 components are compared lossily.
    #[must_use]
    pub fn is_excluded_path(&self, path: &Path) -> bool {
        self.is_excluded_name(&to_slash_lossy(path))
    }
}

/// Renders a relative path with `/` separators regardless of platform.
///
/// # Examples
///
/// ```
/// use plugpack_core::filters::to_slash_lossy;
/// use std::path::Path;
///
/// assert_eq!(to_slash_lossy(Path::new("a/b/c.php")), "a/b/c.php");
/// ```
#[must_use]
pub fn to_slash_lossy(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
