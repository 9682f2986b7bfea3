use tracing::{debug, warn};

use crate::error::ParseError;
use crate::model::{Field, HeaderMap, RawLine, RawTable};
use crate::options::ParseOptions;
use crate::table_parse::split_header_cells;
use crate::warning::{ParseWarning, WarningCode};

const PREVIEW_CHARS: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeaderMatch {
    pub map: HeaderMap,
    /// Position of the header within `RawTable::lines`.
    pub line_index: usize,
    pub warnings: Vec<ParseWarning>,
}

fn keyword_hits(lowered: &str) -> usize {
    Field::ALL
        .iter()
        .filter(|field| lowered.contains(field.keyword()))
        .count()
}

fn qualifies_as_header(line: &str, options: &ParseOptions) -> bool {
    let lowered = line.to_lowercase();
    keyword_hits(&lowered) >= options.min_header_keywords
        && !options
            .row_starters
            .iter()
            .any(|starter| lowered.starts_with(starter.as_str()))
}

fn preview(table: &RawTable) -> String {
    let joined = table
        .lines
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join(" | ");
    if joined.chars().count() <= PREVIEW_CHARS {
        return joined;
    }
    let mut cut = joined.chars().take(PREVIEW_CHARS).collect::<String>();
    cut.push_str("...");
    cut
}

pub(crate) fn map_columns(
    header: &RawLine,
    warnings: &mut Vec<ParseWarning>,
) -> Result<HeaderMap, ParseError> {
    let cells = split_header_cells(&header.text)
        .into_iter()
        .map(|cell| cell.to_lowercase())
        .collect::<Vec<_>>();
    debug!(line = header.number, ?cells, "header cells");

    let locate = |field: Field, warnings: &mut Vec<ParseWarning>| -> Option<usize> {
        let mut hits = cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.contains(field.keyword()))
            .map(|(index, _)| index);
        let first = hits.next()?;
        if hits.next().is_some() {
            warnings.push(
                ParseWarning::new(
                    WarningCode::AmbiguousHeader,
                    format!(
                        "Mais de uma coluna do cabeçalho contém '{field}'; usando a primeira (coluna {}).",
                        first + 1
                    ),
                )
                .with_line(header.number),
            );
        }
        Some(first)
    };

    let mut columns = [0_usize; 5];
    for (slot, field) in Field::REQUIRED.into_iter().enumerate() {
        let index = locate(field, warnings).ok_or_else(|| ParseError::ColumnNotMapped {
            field,
            header_line: header.text.clone(),
        })?;
        columns[slot + 1] = index;
    }

    let implicit_objetos = match locate(Field::Objetos, warnings) {
        Some(index) => {
            columns[0] = index;
            false
        }
        None => {
            // Rows still lead with the objeto even when its title is missing.
            for column in &mut columns[1..] {
                *column += 1;
            }
            true
        }
    };

    Ok(HeaderMap::new(columns, implicit_objetos))
}

pub(crate) fn find_header(
    table: &RawTable,
    options: &ParseOptions,
) -> Result<HeaderMatch, ParseError> {
    let mut warnings = Vec::new();

    if let Some(line_index) = table
        .lines
        .iter()
        .position(|line| qualifies_as_header(&line.text, options))
    {
        let header = &table.lines[line_index];
        debug!(line = header.number, text = %header.text, "header found by keywords");
        let map = map_columns(header, &mut warnings)?;
        return Ok(HeaderMatch {
            map,
            line_index,
            warnings,
        });
    }

    let title_index = table
        .lines
        .iter()
        .position(|line| line.text.trim().to_lowercase() == "objetos");
    if let Some(line_index) = title_index.map(|index| index + 1)
        && let Some(header) = table.lines.get(line_index)
    {
        warn!(line = header.number, "header not found by keywords, using line after 'Objetos'");
        warnings.push(
            ParseWarning::new(
                WarningCode::HeaderFallback,
                "Cabeçalho não encontrado por palavras-chave, usando a linha após 'Objetos'.",
            )
            .with_line(header.number),
        );
        let map = map_columns(header, &mut warnings)?;
        return Ok(HeaderMatch {
            map,
            line_index,
            warnings,
        });
    }

    Err(ParseError::HeaderNotFound {
        scanned_lines: table.lines.len(),
        preview: preview(table),
    })
}
