//! Search hits flowing through the pipeline.

use serde::{Deserialize, Serialize};

use crate::selector::SelectPath;

/// Location of a file at a specific commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct File {
    /// Repository name.
    pub repo: String,
    /// Commit the file was read at.
    #[serde(default)]
    pub commit: String,
    /// Path within the repository.
    pub path: String,
}

/// One matching line within a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineMatch {
    /// Zero-based line number.
    pub line_number: u32,
    /// Line text.
    #[serde(default)]
    pub preview: String,
    /// Byte ranges of the match within `preview`.
    #[serde(default)]
    pub offsets: Vec<(u32, u32)>,
}

/// A symbol definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    /// Symbol name.
    pub name: String,
    /// Lowercase symbol kind, e.g. `function`.
    pub kind: String,
    /// Zero-based line of the definition.
    #[serde(default)]
    pub line: u32,
}

/// A file hit, optionally with the lines that matched.
///
/// A file match with no line matches is a path match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMatch {
    /// The matched file.
    pub file: File,
    /// Matching lines, in file order.
    #[serde(default)]
    pub line_matches: Vec<LineMatch>,
}

/// Symbols defined in one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolMatch {
    /// File defining the symbols.
    pub file: File,
    /// Matching symbols.
    pub symbols: Vec<Symbol>,
}

/// A commit hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMatch {
    /// Repository name.
    pub repo: String,
    /// Commit object id.
    pub oid: String,
    /// Commit message.
    #[serde(default)]
    pub message: String,
}

/// A repository hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMatch {
    /// Repository name.
    pub name: String,
    /// Revision searched, empty for the default branch.
    #[serde(default)]
    pub rev: String,
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Match {
    /// File or line matches.
    File(FileMatch),
    /// Symbol matches.
    Symbol(SymbolMatch),
    /// A commit.
    Commit(CommitMatch),
    /// A repository.
    Repo(RepoMatch),
}

/// Stable identity of a match, used for deduplication.
///
/// File identities leave out line matches, so two events about the same file share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchKey {
    /// A file at a commit.
    File(File),
    /// A set of symbols in a file.
    Symbol {
        /// The defining file.
        file: File,
        /// `(kind, name)` pairs in match order.
        symbols: Vec<(String, String)>,
    },
    /// A commit in a repository.
    Commit {
        /// Repository name.
        repo: String,
        /// Commit object id.
        oid: String,
    },
    /// A repository at a revision.
    Repo {
        /// Repository name.
        name: String,
        /// Revision.
        rev: String,
    },
}

impl Match {
    /// Number of result units this match consumes from a limit.
    pub fn result_count(&self) -> usize {
        match self {
            Self::File(m) => m.line_matches.len().max(1),
            Self::Symbol(m) => m.symbols.len(),
            Self::Commit(_) | Self::Repo(_) => 1,
        }
    }

    /// Returns the deduplication key.
    pub fn key(&self) -> MatchKey {
        match self {
            Self::File(m) => MatchKey::File(m.file.clone()),
            Self::Symbol(m) => MatchKey::Symbol {
                file: m.file.clone(),
                symbols: m
                    .symbols
                    .iter()
                    .map(|s| (s.kind.clone(), s.name.clone()))
                    .collect(),
            },
            Self::Commit(m) => MatchKey::Commit {
                repo: m.repo.clone(),
                oid: m.oid.clone(),
            },
            Self::Repo(m) => MatchKey::Repo {
                name: m.name.clone(),
                rev: m.rev.clone(),
            },
        }
    }

    /// Returns true for file matches.
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Repository the match belongs to.
    pub fn repo(&self) -> &str {
        match self {
            Self::File(m) => &m.file.repo,
            Self::Symbol(m) => &m.file.repo,
            Self::Commit(m) => &m.repo,
            Self::Repo(m) => &m.name,
        }
    }

    /// Projects the match onto `path`, or returns `None` if it has no such projection.
    pub fn select(self, path: &SelectPath) -> Option<Self> {
        match path {
            SelectPath::Identity => Some(self),
            SelectPath::Repo => Some(Self::Repo(self.into_repo())),
            SelectPath::File => match self {
                Self::File(m) => Some(Self::File(FileMatch {
                    file: m.file,
                    line_matches: Vec::new(),
                })),
                Self::Symbol(m) => Some(Self::File(FileMatch {
                    file: m.file,
                    line_matches: Vec::new(),
                })),
                Self::Commit(_) | Self::Repo(_) => None,
            },
            SelectPath::Content => match self {
                Self::File(m) if !m.line_matches.is_empty() => Some(Self::File(m)),
                _ => None,
            },
            SelectPath::Symbol(kind) => match self {
                Self::Symbol(mut m) => {
                    if let Some(kind) = kind {
                        m.symbols.retain(|s| s.kind.eq_ignore_ascii_case(kind));
                    }
                    (!m.symbols.is_empty()).then_some(Self::Symbol(m))
                }
                _ => None,
            },
            SelectPath::Commit => match self {
                Self::Commit(m) => Some(Self::Commit(m)),
                _ => None,
            },
        }
    }

    /// Converts the match into the repository it was found in.
    fn into_repo(self) -> RepoMatch {
        match self {
            Self::File(m) => RepoMatch {
                name: m.file.repo,
                rev: m.file.commit,
            },
            Self::Symbol(m) => RepoMatch {
                name: m.file.repo,
                rev: m.file.commit,
            },
            Self::Commit(m) => RepoMatch {
                name: m.repo,
                rev: String::new(),
            },
            Self::Repo(m) => m,
        }
    }
}

impl From<FileMatch> for Match {
    fn from(m: FileMatch) -> Self {
        Self::File(m)
    }
}

impl From<SymbolMatch> for Match {
    fn from(m: SymbolMatch) -> Self {
        Self::Symbol(m)
    }
}

impl From<CommitMatch> for Match {
    fn from(m: CommitMatch) -> Self {
        Self::Commit(m)
    }
}

impl From<RepoMatch> for Match {
    fn from(m: RepoMatch) -> Self {
        Self::Repo(m)
    }
}
