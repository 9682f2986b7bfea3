use tracing::debug;

use crate::model::{Cell, Field, HeaderMap, RawLine, Record};
use crate::options::ParseOptions;
use crate::table_parse::split_row_cells;
use crate::warning::{ParseWarning, WarningCode};

const LINE_PREVIEW_CHARS: usize = 70;

fn is_ui_chrome(line: &str, options: &ParseOptions) -> bool {
    let lowered = line.trim().to_lowercase();
    options
        .ui_chrome_prefixes
        .iter()
        .any(|prefix| lowered.starts_with(prefix.as_str()))
}

fn line_preview(line: &str) -> String {
    line.chars().take(LINE_PREVIEW_CHARS).collect()
}

fn record_from_cells(cells: &[String], map: &HeaderMap) -> Record {
    let mut record = Record::default();
    for field in Field::ALL {
        let cell = cells
            .get(map.column(field))
            .map_or(Cell::Missing, |value| Cell::from(value.as_str()));
        record.set(field, cell);
    }
    record
}

/// Maps every line after the header onto the header columns.
pub(crate) fn extract_records(
    lines: &[RawLine],
    map: &HeaderMap,
    options: &ParseOptions,
) -> (Vec<Record>, Vec<ParseWarning>) {
    let mut records = Vec::new();
    let mut warnings = Vec::new();
    let min_cells = map.min_row_cells();
    let expected = map.width();

    for line in lines {
        if line.text.trim().is_empty() || is_ui_chrome(&line.text, options) {
            debug!(line = line.number, "skipping interface line");
            continue;
        }

        let cells = split_row_cells(&line.text);
        debug!(line = line.number, ?cells, "row cells");

        if cells.len() < min_cells {
            warnings.push(
                ParseWarning::new(
                    WarningCode::RowMalformed,
                    format!(
                        "Linha {} parece incompleta (tem {} partes, esperado ~{expected}): '{}...'",
                        line.number,
                        cells.len(),
                        line_preview(&line.text)
                    ),
                )
                .with_line(line.number),
            );
            continue;
        }

        if cells.len() < expected {
            debug!(
                line = line.number,
                found = cells.len(),
                expected,
                "short row, trailing columns set to N/A"
            );
        }

        records.push(record_from_cells(&cells, map));
    }

    (records, warnings)
}

#[cfg(test)]
mod tests {
    use super::extract_records;
    use crate::model::{Cell, HeaderMap, RawTable};
    use crate::options::ParseOptions;
    use crate::warning::WarningCode;

    fn standard_map() -> HeaderMap {
        HeaderMap::new([0, 1, 2, 3, 4], false)
    }

    #[test]
    fn maps_cells_by_header_position() {
        let table = RawTable::from_text("Horas extras\tProcedência\tImprocedência\tReforma\tN/A");
        let (records, warnings) =
            extract_records(&table.lines, &standard_map(), &ParseOptions::default());
        assert!(warnings.is_empty());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].objetos, Cell::from("Horas extras"));
        assert_eq!(records[0].resultado_2a_instancia, Cell::from("Reforma"));
    }

    #[test]
    fn short_but_viable_rows_get_sentinels() {
        let table = RawTable::from_text("FGTS\tProcedência\tProcedência");
        let (records, warnings) =
            extract_records(&table.lines, &standard_map(), &ParseOptions::default());
        assert!(warnings.is_empty());
        assert_eq!(records[0].resultado_1a_instancia, Cell::from("Procedência"));
        assert_eq!(records[0].resultado_2a_instancia, Cell::Missing);
        assert_eq!(records[0].resultado_instancia_superior, Cell::Missing);
    }

    #[test]
    fn too_short_rows_become_warnings_with_line_numbers() {
        let table = RawTable::from_text(
            "Danos Morais\tProcedência\tImprocedência\tN/A\tN/A\nMulta\tProcedência\nFGTS\tImprocedência\tImprocedência\tN/A\tN/A",
        );
        let (records, warnings) =
            extract_records(&table.lines, &standard_map(), &ParseOptions::default());
        assert_eq!(records.len(), 2);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::RowMalformed);
        assert_eq!(warnings[0].line, Some(2));
        assert!(warnings[0].message.starts_with("Linha 2 "));
    }

    #[test]
    fn skips_interface_chrome_without_warning() {
        let table = RawTable::from_text(
            "Visualizar\nEditar pedido\nAção\nGerenciar colunas\nFGTS\tProcedência\tImprocedência",
        );
        let (records, warnings) =
            extract_records(&table.lines, &standard_map(), &ParseOptions::default());
        assert_eq!(records.len(), 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn implicit_objetos_reads_first_cell() {
        let map = HeaderMap::new([0, 1, 2, 3, 4], true);
        let table = RawTable::from_text("Aviso prévio  Improcedência  Procedência");
        let (records, _) = extract_records(&table.lines, &map, &ParseOptions::default());
        assert_eq!(records[0].objetos, Cell::from("Aviso prévio"));
        assert_eq!(records[0].situacao, Cell::from("Improcedência"));
    }
}
