// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing of fully-qualified test names.
//!
//! A fully-qualified test name looks like `Company.Product.Tests.Method(System.String,System.Int32)`.
//! It is split into segments at `.` characters, except for dots nested within:
//!
//! * parameter lists: `(...)`;
//! * generic argument lists: `<...>`;
//! * bracketed generic arguments following an arity marker, e.g. ``Fixture`1[[System.Int32]]``.
//!
//! Once a top-level parameter list starts, the rest of the name belongs to the final segment.
//! Within a parameter list, string literals (`"..."`) and char literals (`'x'`), as printed for
//! data-driven tests, are skipped over, so that delimiters and dots inside argument values are not
//! interpreted.

use crate::errors::{MalformedNameError, MalformedNameKind};
use std::fmt;

/// The end of one hierarchical level within a [`ParsedName`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Segment {
    end: usize,
}

impl Segment {
    /// Returns the byte offset into the full name where this segment ends (exclusive).
    #[inline]
    pub fn end(self) -> usize {
        self.end
    }
}

/// A fully-qualified test name, split into hierarchical segments.
///
/// Segments only store end offsets. Prefixes and labels are slices of the full name.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ParsedName {
    full_name: String,
    // Strictly increasing, never empty. The last segment always ends at full_name.len().
    segments: Vec<Segment>,
}

impl ParsedName {
    /// Parses a fully-qualified test name.
    ///
    /// Leading and trailing whitespace is trimmed. No other normalization is performed.
    pub fn parse(raw: &str) -> Result<Self, MalformedNameError> {
        let name = raw.trim();
        let segments = segment(name).map_err(|kind| MalformedNameError::new(name, kind))?;
        Ok(Self {
            full_name: name.to_owned(),
            segments,
        })
    }

    /// Returns the full name, as passed in (after trimming).
    #[inline]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the segments of this name, outermost first.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the number of segments. This is always at least 1.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns the prefix of the full name ending at the given segment.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn prefix(&self, index: usize) -> &str {
        &self.full_name[..self.segments[index].end]
    }

    /// Returns this segment's own label, without the prefix of the enclosing segment.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn label(&self, index: usize) -> &str {
        let start = match index {
            0 => 0,
            // Skip over the separating `.`.
            _ => self.segments[index - 1].end + 1,
        };
        &self.full_name[start..self.segments[index].end]
    }

    /// Iterates over all prefixes, outermost first. The last prefix is the full name.
    pub fn prefixes(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        (0..self.segments.len()).map(move |index| self.prefix(index))
    }

    /// Iterates over all labels, outermost first.
    pub fn labels(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        (0..self.segments.len()).map(move |index| self.label(index))
    }

    /// Returns the label of the test method, including any parameter list.
    pub fn test_label(&self) -> &str {
        self.label(self.segments.len() - 1)
    }

    /// Returns the full name of the namespace or class containing the test, or an empty string if
    /// the name has a single segment.
    pub fn parent_name(&self) -> &str {
        match self.segments.len() {
            1 => "",
            n => self.prefix(n - 2),
        }
    }
}

impl fmt::Display for ParsedName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '<' => '>',
        '[' => ']',
        _ => unreachable!("only called with opening delimiters"),
    }
}

fn segment(name: &str) -> Result<Vec<Segment>, MalformedNameKind> {
    if name.is_empty() {
        return Err(MalformedNameKind::EmptyName);
    }

    let mut segments = Vec::new();
    // Open delimiters, innermost last, with their positions.
    let mut open: Vec<(char, usize)> = Vec::new();
    // Set once a top-level parameter list starts: nothing after that point is split.
    let mut in_parameters = false;
    // The opening quote and its position while inside a string or char literal.
    let mut quote: Option<(char, usize)> = None;
    let mut escaped = false;
    let mut prev: Option<char> = None;

    for (position, c) in name.char_indices() {
        if let Some((quote_c, _)) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote_c {
                quote = None;
            }
            prev = Some(c);
            continue;
        }

        match c {
            '"' | '\'' if !open.is_empty() => {
                quote = Some((c, position));
            }
            '(' | '<' | '[' => {
                if open.is_empty() && c == '(' {
                    in_parameters = true;
                }
                open.push((c, position));
            }
            ')' | '>' | ']' | ',' => {
                if prev == Some('.') {
                    return Err(MalformedNameKind::EmptySegment {
                        position: position - 1,
                    });
                }
                if c != ',' {
                    match open.pop() {
                        Some((open_c, _)) if closing_for(open_c) == c => {}
                        Some((open_c, _)) => {
                            return Err(MalformedNameKind::MismatchedDelimiter {
                                open: open_c,
                                close: c,
                                position,
                            });
                        }
                        None => {
                            return Err(MalformedNameKind::UnbalancedDelimiter {
                                delimiter: c,
                                position,
                            });
                        }
                    }
                }
            }
            '.' => {
                if matches!(prev, None | Some('.' | '(' | '<' | '[' | ',')) {
                    return Err(MalformedNameKind::EmptySegment { position });
                }
                if open.is_empty() && !in_parameters {
                    segments.push(Segment { end: position });
                }
            }
            _ => {}
        }

        prev = Some(c);
    }

    if let Some((_, position)) = quote {
        return Err(MalformedNameKind::UnterminatedQuote { position });
    }
    if let Some(&(delimiter, position)) = open.last() {
        return Err(MalformedNameKind::UnbalancedDelimiter {
            delimiter,
            position,
        });
    }
    if prev == Some('.') {
        return Err(MalformedNameKind::EmptySegment {
            position: name.len() - 1,
        });
    }

    segments.push(Segment { end: name.len() });
    Ok(segments)
}
