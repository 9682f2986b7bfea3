use crate::model::Field;

fn split_tabs(line: &str) -> Vec<String> {
    line.split('\t')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits on runs of two or more whitespace characters.
pub(crate) fn split_wide_gaps(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut whitespace_run = 0_usize;

    for ch in trimmed.chars() {
        if ch.is_whitespace() {
            whitespace_run += 1;
            if whitespace_run >= 2 {
                if !current.trim().is_empty() {
                    cells.push(current.trim().to_string());
                }
                current.clear();
                continue;
            }
            current.push(' ');
            continue;
        }

        whitespace_run = 0;
        current.push(ch);
    }

    if !current.trim().is_empty() {
        cells.push(current.trim().to_string());
    }

    cells
}

pub(crate) fn split_words(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

fn bare_word(word: &str) -> String {
    word.trim_matches(|ch: char| !ch.is_alphanumeric())
        .to_lowercase()
}

/// Single-space header: keyword phrases stay whole, other words stand alone.
fn split_keyword_phrases(line: &str) -> Vec<String> {
    let words = line.split_whitespace().collect::<Vec<_>>();
    let bare = words.iter().map(|word| bare_word(word)).collect::<Vec<_>>();

    let mut phrases = Field::ALL
        .iter()
        .map(|field| field.keyword().split(' ').collect::<Vec<_>>())
        .collect::<Vec<_>>();
    phrases.sort_by_key(|phrase| std::cmp::Reverse(phrase.len()));

    let mut cells = Vec::new();
    let mut index = 0;
    while index < words.len() {
        let matched = phrases.iter().find(|phrase| {
            bare.get(index..index + phrase.len())
                .is_some_and(|window| window.iter().zip(phrase.iter()).all(|(a, b)| a == b))
        });

        let span = matched.map_or(1, Vec::len);
        cells.push(words[index..index + span].join(" "));
        index += span;
    }

    cells
}

/// Tab first, then wide gaps, then keyword phrases.
pub(crate) fn split_header_cells(line: &str) -> Vec<String> {
    let cells = split_tabs(line);
    if cells.len() > 1 {
        return cells;
    }

    let cells = split_wide_gaps(line);
    if cells.len() > 1 {
        return cells;
    }

    split_keyword_phrases(line)
}

/// Tab first, then wide gaps, then any whitespace.
pub(crate) fn split_row_cells(line: &str) -> Vec<String> {
    let cells = split_tabs(line);
    if cells.len() > 1 {
        return cells;
    }

    let cells = split_wide_gaps(line);
    if cells.len() > 1 {
        return cells;
    }

    split_words(line)
}
