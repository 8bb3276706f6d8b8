//! Index of comment tokens by the lines they start and end on.

use std::collections::HashMap;

use ctbind_ast::{SourceRange, Token};

use crate::{Error, Result};

#[derive(Debug, Clone)]
struct IndexedComment {
    token: Token,
    /// Code precedes the comment on its first line.
    trailing: bool,
}

#[derive(Debug, Clone, Default)]
struct FileComments {
    comments: Vec<IndexedComment>,
    by_end_line: HashMap<u32, Vec<usize>>,
    by_start_line: HashMap<u32, Vec<usize>>,
}

/// Comment tokens of a translation unit, per source file.
///
/// Built once from the token stream and never modified afterwards.
#[derive(Debug, Clone, Default)]
pub struct CommentIndex {
    files: HashMap<String, FileComments>,
}

impl CommentIndex {
    /// Index every comment token in `tokens`.
    ///
    /// Tokens of one file must appear in source order.
    pub fn build(tokens: &[Token]) -> Self {
        let mut files: HashMap<String, FileComments> = HashMap::new();
        let mut last_code_line: HashMap<&str, u32> = HashMap::new();

        for token in tokens {
            let Some(file) = token.extent.file() else {
                continue;
            };
            if !token.is_comment() {
                last_code_line.insert(file, token.extent.end.line);
                continue;
            }
            let start_line = token.extent.start.line;
            let trailing = last_code_line.get(file) == Some(&start_line);
            let entry = files.entry(file.to_string()).or_default();
            let slot = entry.comments.len();
            entry
                .by_end_line
                .entry(token.extent.end.line)
                .or_default()
                .push(slot);
            entry.by_start_line.entry(start_line).or_default().push(slot);
            entry.comments.push(IndexedComment {
                token: token.clone(),
                trailing,
            });
        }

        Self { files }
    }

    /// Number of indexed comments across all files.
    pub fn len(&self) -> usize {
        self.files.values().map(|file| file.comments.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The comment ending on the line directly above `extent`.
    ///
    /// Comments that trail code on their own line belong to that code and
    /// are not considered.
    pub fn above(&self, extent: &SourceRange) -> Result<Option<&Token>> {
        let Some((file, comments)) = self.file_of(extent) else {
            return Ok(None);
        };
        let Some(line) = extent.start.line.checked_sub(1).filter(|line| *line > 0) else {
            return Ok(None);
        };
        let candidates = comments
            .by_end_line
            .get(&line)
            .into_iter()
            .flatten()
            .map(|&slot| &comments.comments[slot])
            .filter(|comment| !comment.trailing);
        single(candidates, file, line)
    }

    /// The comment starting after the code on the last line of `extent`.
    pub fn right_of(&self, extent: &SourceRange) -> Result<Option<&Token>> {
        let Some((file, comments)) = self.file_of(extent) else {
            return Ok(None);
        };
        let line = extent.end.line;
        let candidates = comments
            .by_start_line
            .get(&line)
            .into_iter()
            .flatten()
            .map(|&slot| &comments.comments[slot])
            .filter(|comment| comment.token.extent.start.column >= extent.end.column);
        single(candidates, file, line)
    }

    fn file_of<'s, 'e>(
        &'s self,
        extent: &'e SourceRange,
    ) -> Option<(&'e str, &'s FileComments)> {
        let file = extent.file()?;
        self.files.get(file).map(|comments| (file, comments))
    }
}

fn single<'a>(
    candidates: impl Iterator<Item = &'a IndexedComment>,
    file: &str,
    line: u32,
) -> Result<Option<&'a Token>> {
    let candidates: Vec<&IndexedComment> = candidates.collect();
    match candidates.as_slice() {
        [] => Ok(None),
        [comment] => Ok(Some(&comment.token)),
        _ => Err(Error::AmbiguousComment {
            file: file.to_string(),
            line,
            count: candidates.len(),
        }),
    }
}
