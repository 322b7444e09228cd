/// One line of `git status --porcelain` output.
///
/// The first two characters are the index and working-tree status codes,
/// followed by a separating space and the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub index: char,
    pub worktree: char,
    pub path: String,
}

/// Width of the `XY ` prefix in porcelain output.
const STATUS_PREFIX_WIDTH: usize = 3;

/// Separates the original and new path of renamed or copied entries.
const RENAME_SEPARATOR: &str = " -> ";

impl StatusLine {
    /// Parse a porcelain line, returning `None` for lines too short to carry a path.
    pub fn parse(line: &str) -> Option<Self> {
        let mut chars = line.chars();
        let index = chars.next()?;
        let worktree = chars.next()?;
        let path = line.get(STATUS_PREFIX_WIDTH..)?.trim_end();
        if path.is_empty() {
            return None;
        }

        // `R  old -> new`: the entry now lives at the new path
        let path = match path.split_once(RENAME_SEPARATOR) {
            Some((_, renamed)) if matches!(index, 'R' | 'C') || matches!(worktree, 'R' | 'C') => {
                renamed
            }
            _ => path,
        };

        Some(Self {
            index,
            worktree,
            path: path.trim_matches('"').to_string(),
        })
    }

    /// Untracked (`??`) or ignored (`!!`) entries are not under version control.
    pub fn is_untracked(&self) -> bool {
        matches!((self.index, self.worktree), ('?', '?') | ('!', '!'))
    }

    /// Modified or added in either the index or the working tree.
    pub fn is_modified_or_added(&self) -> bool {
        !self.is_untracked()
            && [self.index, self.worktree]
                .iter()
                .any(|code| matches!(code, 'M' | 'A'))
    }
}
