//! Client notification drafted after a decision is published.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::model::Record;
use crate::options::{DecisionMode, NO_APPEAL};

const SUMMARY_GROUPS: [(&str, &str); 3] = [
    ("Procedentes", "Procedência"),
    ("Parcialmente Procedentes", "Parcialmente procedente"),
    ("Improcedentes", "Improcedência"),
];

const MISSING_LOCAL: &str = "Local não informado";
const MISSING_VALUE: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContext {
    pub pasta: String,
    pub cliente: String,
    pub adverso: String,
    #[serde(default)]
    pub local: Option<String>,
    pub decision: DecisionMode,
    /// Free text placed after the summary, e.g. from [`appeal_recommendation`].
    #[serde(default)]
    pub recommendation: String,
    /// Deposit and court-costs paragraph.
    #[serde(default)]
    pub costs_note: String,
    pub lawyer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

#[must_use]
pub fn email_subject(decision: &DecisionMode, adverso: &str, cliente: &str) -> String {
    let label = decision.label();
    let tag = match label {
        "Sentença (Vara do Trabalho)" => "SENTENÇA".to_string(),
        "Decisão de Embargos de Declaração" => "SENTENÇA ED".to_string(),
        "Acórdão (TRT)" => "ACÓRDÃO TRT".to_string(),
        other => other.to_uppercase(),
    };
    format!("TRABALHISTA: {tag} - {adverso} X {cliente}")
}

/// Recommendation sentence for a chosen appeal, or `None` when no appeal is filed.
#[must_use]
pub fn appeal_recommendation(appeal: &str, justification: &str) -> Option<String> {
    let appeal = appeal.trim();
    if appeal.is_empty() || appeal == NO_APPEAL {
        return None;
    }
    let purpose = match justification.trim() {
        "" => "reverter a decisão desfavorável.".to_string(),
        text => text.to_lowercase(),
    };
    Some(format!("Recomendamos a interposição de {appeal} para {purpose}"))
}

/// Objetos grouped by situação. Known outcomes come first in a fixed order,
/// the rest are listed under "Outras Ocorrências" sorted by situação.
#[must_use]
pub fn summarize_by_situacao(records: &[Record]) -> String {
    let mut by_situacao: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for record in records {
        by_situacao
            .entry(record.situacao.as_str())
            .or_default()
            .push(record.objetos.as_str());
    }

    let mut summary = String::new();
    for (title, situacao) in SUMMARY_GROUPS {
        if let Some(objetos) = by_situacao.get(situacao) {
            let _ = writeln!(summary, "{title}:");
            for objeto in objetos {
                let _ = writeln!(summary, "- {objeto}");
            }
            summary.push('\n');
        }
    }

    let others = by_situacao
        .iter()
        .filter(|(situacao, _)| !SUMMARY_GROUPS.iter().any(|(_, known)| known == *situacao))
        .flat_map(|(situacao, objetos)| {
            objetos
                .iter()
                .map(move |objeto| format!("- {objeto} ({situacao})"))
        })
        .collect::<Vec<_>>();
    if !others.is_empty() {
        summary.push_str("Outras Ocorrências:\n");
        summary.push_str(&others.join("\n"));
        summary.push('\n');
    }

    summary
}

fn or_missing(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() { MISSING_VALUE } else { value }
}

#[must_use]
pub fn draft_email(context: &EmailContext, records: &[Record]) -> EmailDraft {
    let subject = email_subject(&context.decision, &context.adverso, &context.cliente);
    let local = context
        .local
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(MISSING_LOCAL);
    let decision = match context.decision.label().trim() {
        "" => "decisão".to_string(),
        label => label.to_lowercase(),
    };
    let summary = summarize_by_situacao(records);

    let body = format!(
        "Prezados, bom dia!\n\
         \n\
         Local: {local}\n\
         Processo nº. {pasta}\n\
         Cliente: {cliente}\n\
         Adverso: {adverso}\n\
         \n\
         Pelo presente, informamos que a {decision} referente ao processo acima foi publicada.\n\
         \n\
         Segue abaixo um resumo dos pedidos, com informações atualizadas sobre cada um deles:\n\
         \n\
         {summary}\n\
         \n\
         {recommendation}\n\
         {costs}\n\
         \n\
         Diante do exposto, para que possamos elaborar o recurso, solicitamos retorno quanto ao interesse em 48 horas.\n\
         Qualquer esclarecimento, favor entrar em contato com o escritório.\n\
         \n\
         Atenciosamente,\n\
         \n\
         {lawyer}\n",
        pasta = or_missing(&context.pasta),
        cliente = or_missing(&context.cliente),
        adverso = or_missing(&context.adverso),
        summary = summary.trim(),
        recommendation = context.recommendation.trim(),
        costs = context.costs_note.trim(),
        lawyer = context.lawyer.trim(),
    );

    EmailDraft { subject, body }
}

#[cfg(test)]
mod tests {
    use super::{
        EmailContext, appeal_recommendation, draft_email, email_subject, summarize_by_situacao,
    };
    use crate::model::{Cell, Record};
    use crate::options::DecisionMode;

    fn record(objetos: &str, situacao: &str) -> Record {
        Record {
            objetos: Cell::from(objetos),
            situacao: Cell::from(situacao),
            ..Record::default()
        }
    }

    #[test]
    fn maps_known_decisions_in_subject() {
        let subject = email_subject(
            &DecisionMode::new("Sentença (Vara do Trabalho)"),
            "Fulano",
            "ACME",
        );
        assert_eq!(subject, "TRABALHISTA: SENTENÇA - Fulano X ACME");

        let other = email_subject(&DecisionMode::new("Acórdão (TST - SDI)"), "A", "B");
        assert_eq!(other, "TRABALHISTA: ACÓRDÃO (TST - SDI) - A X B");
    }

    #[test]
    fn groups_known_outcomes_before_others() {
        let records = vec![
            record("Horas extras", "Improcedência"),
            record("FGTS", "Procedência"),
            record("Danos morais", "Aguardando Julgamento"),
            record("Multa 477", "Procedência"),
            record("Adicional", "Acordo"),
        ];
        assert_eq!(
            summarize_by_situacao(&records),
            "Procedentes:\n- FGTS\n- Multa 477\n\n\
             Improcedentes:\n- Horas extras\n\n\
             Outras Ocorrências:\n- Adicional (Acordo)\n- Danos morais (Aguardando Julgamento)\n"
        );
    }

    #[test]
    fn recommendation_skips_no_appeal() {
        assert_eq!(appeal_recommendation("Não Interpor Recurso", ""), None);
        assert_eq!(
            appeal_recommendation("Recurso Ordinário (RO)", "Afastar a condenação."),
            Some("Recomendamos a interposição de Recurso Ordinário (RO) para afastar a condenação.".to_string())
        );
        assert_eq!(
            appeal_recommendation("Recurso de Revista (RR)", " "),
            Some("Recomendamos a interposição de Recurso de Revista (RR) para reverter a decisão desfavorável.".to_string())
        );
    }

    #[test]
    fn draft_fills_the_template() {
        let context = EmailContext {
            pasta: "PROC-001".to_string(),
            cliente: "ACME".to_string(),
            adverso: "Fulano".to_string(),
            local: None,
            decision: DecisionMode::new("Acórdão (TRT)"),
            recommendation: "Recomendamos aguardar.".to_string(),
            costs_note: "Não há valor a ser recolhido.".to_string(),
            lawyer: "Dra. Silva".to_string(),
        };
        let draft = draft_email(&context, &[record("FGTS", "Procedência")]);

        assert_eq!(draft.subject, "TRABALHISTA: ACÓRDÃO TRT - Fulano X ACME");
        assert!(draft.body.starts_with("Prezados, bom dia!\n\nLocal: Local não informado\n"));
        assert!(draft.body.contains("Processo nº. PROC-001\n"));
        assert!(draft.body.contains("informamos que a acórdão (trt) referente"));
        assert!(draft.body.contains("Procedentes:\n- FGTS\n\nRecomendamos aguardar.\nNão há valor"));
        assert!(draft.body.ends_with("Atenciosamente,\n\nDra. Silva\n"));
    }
}
