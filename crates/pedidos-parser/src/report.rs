use crate::model::{Cell, Field, Record};
use crate::options::DecisionMode;
use crate::warning::ParseWarning;

const IRRELEVANT_RESULTS: [&str; 4] = ["aguardando julgamento", "n/a", "", "não houve recurso"];
const WARNINGS_TITLE: &str = "[AVISOS DURANTE PROCESSAMENTO]:";
const WARNINGS_RULE: &str = "--------------------";

#[must_use]
pub fn is_relevant(value: &Cell) -> bool {
    let lowered = value.as_str().trim().to_lowercase();
    !IRRELEVANT_RESULTS.contains(&lowered.as_str())
}

/// Stable sort on the raw `objetos` text.
pub fn sort_records(records: &mut [Record]) {
    records.sort_by(|left, right| left.objetos.as_str().cmp(right.objetos.as_str()));
}

fn shown_results(mode: &DecisionMode) -> Vec<Field> {
    let mut fields = vec![Field::Resultado1aInstancia];
    if mode.shows_second_instance() {
        fields.push(Field::Resultado2aInstancia);
    }
    if mode.shows_superior_instance() {
        fields.push(Field::ResultadoInstanciaSuperior);
    }
    fields
}

/// Renders the numbered pedidos section. Records are expected in final order.
#[must_use]
pub fn render_report(records: &[Record], warnings: &[ParseWarning], mode: &DecisionMode) -> String {
    let mut lines = Vec::new();
    if !warnings.is_empty() {
        lines.push(WARNINGS_TITLE.to_string());
        lines.extend(warnings.iter().map(|warning| format!("- {warning}")));
        lines.push(WARNINGS_RULE.to_string());
    }

    let results = shown_results(mode);
    for (index, record) in records.iter().enumerate() {
        lines.push(format!("{}) {}", index + 1, record.objetos));

        let situacao = record.situacao.as_str().trim();
        if !situacao.is_empty() {
            lines.push(format!(" - {}: {situacao}", Field::Situacao.label()));
        }

        for field in &results {
            let value = record.get(*field);
            if is_relevant(value) {
                lines.push(format!(" - {}: {value}", field.label()));
            }
        }

        lines.push(String::new());
    }

    lines.join("\n")
}

/// Joins titled sections, numbering only the ones with content.
#[must_use]
pub fn render_sections<T, C>(sections: &[(T, C)]) -> String
where
    T: AsRef<str>,
    C: AsRef<str>,
{
    let mut lines = Vec::new();
    let mut visible = 1;
    for (title, content) in sections {
        let content = content.as_ref().trim();
        if content.is_empty() {
            continue;
        }
        lines.push(format!("{visible}. {}:", title.as_ref()));
        lines.push(content.to_string());
        lines.push(String::new());
        visible += 1;
    }
    lines.join("\n")
}

#[must_use]
pub fn make_hyperlink(path: &str) -> String {
    let cleaned = path.trim();
    let lowered = cleaned.to_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        return format!("[{cleaned}]({cleaned})");
    }
    cleaned.to_string()
}

#[cfg(test)]
mod tests {
    use super::{is_relevant, make_hyperlink, render_report, render_sections, sort_records};
    use crate::model::{Cell, Record};
    use crate::options::DecisionMode;
    use crate::warning::{ParseWarning, WarningCode};

    fn record(objetos: &str, situacao: &str, results: [&str; 3]) -> Record {
        Record {
            objetos: Cell::from(objetos),
            situacao: Cell::from(situacao),
            resultado_1a_instancia: Cell::from(results[0]),
            resultado_2a_instancia: Cell::from(results[1]),
            resultado_instancia_superior: Cell::from(results[2]),
        }
    }

    #[test]
    fn relevance_ignores_placeholders() {
        assert!(!is_relevant(&Cell::from("Aguardando Julgamento")));
        assert!(!is_relevant(&Cell::from("  n/a ")));
        assert!(!is_relevant(&Cell::from("Não houve recurso")));
        assert!(!is_relevant(&Cell::from("")));
        assert!(!is_relevant(&Cell::Missing));
        assert!(is_relevant(&Cell::from("Procedência")));
    }

    #[test]
    fn sentence_shows_only_first_instance() {
        let records = [record("FGTS", "Procedência", ["Procedência", "Reforma", "Mantida"])];
        let report = render_report(&records, &[], &DecisionMode::new("Sentença (Vara do Trabalho)"));
        assert_eq!(
            report,
            "1) FGTS\n - Situação: Procedência\n - Resultado 1ª Instância: Procedência\n"
        );
    }

    #[test]
    fn tst_decision_shows_every_relevant_instance() {
        let records = [record("FGTS", "Procedência", ["Procedência", "Reforma", "Mantida"])];
        let report = render_report(&records, &[], &DecisionMode::new("Acórdão (TST - Turma)"));
        assert!(report.contains(" - Resultado 2ª Instância: Reforma"));
        assert!(report.contains(" - Resultado Instância Superior: Mantida"));
    }

    #[test]
    fn warnings_block_precedes_records() {
        let warnings = [ParseWarning::new(WarningCode::RowMalformed, "Linha 4 parece incompleta")];
        let records = [record("FGTS", "", ["N/A", "N/A", "N/A"])];
        let report = render_report(&records, &warnings, &DecisionMode::new("Acórdão (TRT)"));
        assert_eq!(
            report,
            "[AVISOS DURANTE PROCESSAMENTO]:\n- Linha 4 parece incompleta\n--------------------\n1) FGTS\n"
        );
    }

    #[test]
    fn sorts_by_objetos_text() {
        let mut records = vec![
            record("Multa", "", ["", "", ""]),
            record("Adicional noturno", "", ["", "", ""]),
            record("FGTS", "", ["", "", ""]),
        ];
        sort_records(&mut records);
        let names = records
            .iter()
            .map(|record| record.objetos.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Adicional noturno", "FGTS", "Multa"]);
    }

    #[test]
    fn sections_skip_empty_content_and_renumber() {
        let text = render_sections(&[
            ("Contexto", "- Cliente: Reclamado"),
            ("Vazio", "   "),
            ("Observações Finais", "Nenhuma\n"),
        ]);
        assert_eq!(
            text,
            "1. Contexto:\n- Cliente: Reclamado\n\n2. Observações Finais:\nNenhuma\n"
        );
    }

    #[test]
    fn wraps_only_web_links() {
        assert_eq!(
            make_hyperlink(" https://guias.example/1 "),
            "[https://guias.example/1](https://guias.example/1)"
        );
        assert_eq!(make_hyperlink("G:/Guias/123.pdf"), "G:/Guias/123.pdf");
    }
}
