//! Greedy word wrapping.
//!
//! Text is split into paragraphs on `\n`, and every paragraph wider than the
//! column is rebuilt word by word. Words are never broken, so a word wider
//! than the column gets a line of its own. Widths come from a caller-supplied
//! measure function so the wrapper always agrees with the renderer.

use fontcache_core::profiling::profile_function;

/// Split on `\n`. With `keep_newlines` every delimiter stays at the start
/// of the segment that follows it, so the segments concatenate back to
/// `text`.
pub fn split_paragraphs(text: &str, keep_newlines: bool) -> Vec<&str> {
    if !keep_newlines {
        return text.split('\n').collect();
    }
    let mut segments = Vec::new();
    let mut start = 0;
    for (offset, _) in text.match_indices('\n') {
        segments.push(&text[start..offset]);
        start = offset;
    }
    segments.push(&text[start..]);
    segments
}

#[inline]
fn is_break(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Split a paragraph into `(word, trailing break run)` pairs. The first word
/// may be empty when the paragraph starts with spaces; the last run may be
/// empty.
pub fn split_words(line: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();
    let mut rest = line;
    loop {
        let word_end = rest.find(is_break).unwrap_or(rest.len());
        let (word, after) = rest.split_at(word_end);
        let run_end = after.find(|c| !is_break(c)).unwrap_or(after.len());
        let (run, next) = after.split_at(run_end);
        pairs.push((word, run));
        if next.is_empty() {
            break;
        }
        rest = next;
    }
    pairs
}

/// Break `text` into lines no wider than `column`.
///
/// `None` or a non-positive column means unlimited: only `\n` breaks lines.
pub fn break_lines<F>(
    text: &str,
    column: Option<i32>,
    keep_newlines: bool,
    mut measure: F,
) -> Vec<String>
where
    F: FnMut(&str) -> i32,
{
    profile_function!();

    let limit = column.filter(|&c| c > 0);
    let mut lines = Vec::new();

    for paragraph in split_paragraphs(text, keep_newlines) {
        let Some(limit) = limit else {
            lines.push(paragraph.to_string());
            continue;
        };
        if measure(paragraph) <= limit {
            lines.push(paragraph.to_string());
            continue;
        }

        let mut pairs = split_words(paragraph).into_iter();
        let mut line = match pairs.next() {
            Some((word, run)) => format!("{}{}", word, run),
            None => String::new(),
        };
        for (word, run) in pairs {
            let mut candidate = String::with_capacity(line.len() + word.len() + run.len());
            candidate.push_str(&line);
            candidate.push_str(word);
            candidate.push_str(run);
            if measure(&candidate) > limit {
                lines.push(std::mem::replace(&mut line, format!("{}{}", word, run)));
            } else {
                line = candidate;
            }
        }
        lines.push(line);
    }

    lines
}
