//! Internal analysis report for a published decision, with the client email.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::{HolidayCache, HolidayProvider};
use crate::deadline::{Deadline, DeadlinePolicy, EdAssessment, format_deadlines, suggest_deadline};
use crate::email::{EmailContext, EmailDraft, appeal_recommendation, draft_email};
use crate::error::AnalysisError;
use crate::fees::{FeeAssessment, FeeInput, FeePolicy, assess_fees, costs_note, costs_section};
use crate::model::Record;
use crate::options::DecisionMode;
use crate::report::{make_hyperlink, render_report, render_sections, sort_records};

const DATE_FORMAT: &str = "%d/%m/%Y";
const NOT_INFORMED: &str = "N/A";
const NOTHING: &str = "Nenhuma";

/// A deadline as typed in, validated by [`Deadline::manual`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineEntry {
    pub descricao: String,
    pub data_d: NaiveDate,
    pub data_fatal: NaiveDate,
    #[serde(default)]
    pub obs: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisInput {
    pub pasta: String,
    pub cliente: String,
    /// Reclamante or reclamada.
    pub cliente_role: String,
    pub adverso: String,
    pub local: Option<String>,
    pub decision: DecisionMode,
    pub ciencia: Option<NaiveDate>,
    /// Overall outcome for the client, e.g. "Parcialmente Favorável".
    pub outcome: String,
    pub decision_notes: String,
    pub ed: Option<EdAssessment>,
    pub ed_justification: String,
    /// Only read when no ED is filed.
    pub appeal: Option<String>,
    pub appeal_justification: String,
    pub fees: FeeInput,
    /// Where the payment slips were saved: a path or a URL.
    pub payment_slips: Option<String>,
    pub deadlines: Vec<DeadlineEntry>,
    /// Prepends the deadline proposed from `ciencia`.
    pub suggest_deadline: bool,
    pub final_notes: String,
    /// Drafts the client email when set.
    pub lawyer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub report: String,
    pub deadlines: Vec<Deadline>,
    pub fees: FeeAssessment,
    pub email: Option<EmailDraft>,
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() { fallback } else { value }
}

fn filed_appeal(input: &AnalysisInput) -> Option<&str> {
    if input.ed != Some(EdAssessment::NaoCabe) {
        return None;
    }
    input
        .appeal
        .as_deref()
        .map(str::trim)
        .filter(|appeal| !appeal.is_empty())
}

fn context_section(input: &AnalysisInput) -> String {
    let cliente = match input.cliente_role.trim() {
        "" => or_default(&input.cliente, NOT_INFORMED).to_string(),
        role => format!("{} ({role})", or_default(&input.cliente, NOT_INFORMED)),
    };
    let ciencia = input.ciencia.map_or_else(
        || NOT_INFORMED.to_string(),
        |date| date.format(DATE_FORMAT).to_string(),
    );
    format!(
        "- Processo: {}\n- Cliente: {cliente}\n- Adverso: {}\n- Tipo de Decisão Analisada: {}\n- Data da Ciência: {ciencia}",
        or_default(&input.pasta, NOT_INFORMED),
        or_default(&input.adverso, NOT_INFORMED),
        or_default(input.decision.label(), NOT_INFORMED),
    )
}

fn collect_deadlines<P: HolidayProvider>(
    cache: &mut HolidayCache<P>,
    policy: &DeadlinePolicy,
    input: &AnalysisInput,
) -> Result<Vec<Deadline>, AnalysisError> {
    let mut deadlines = Vec::with_capacity(input.deadlines.len() + 1);
    if input.suggest_deadline {
        if let (Some(ciencia), Some(ed)) = (input.ciencia, input.ed) {
            let appeal = input.appeal.as_deref();
            deadlines.extend(suggest_deadline(cache, policy, ciencia, ed, appeal)?);
        } else {
            debug!("deadline suggestion needs both ciencia and the ED assessment");
        }
    }
    for entry in &input.deadlines {
        deadlines.push(Deadline::manual(
            &entry.descricao,
            entry.data_d,
            entry.data_fatal,
            &entry.obs,
        )?);
    }
    Ok(deadlines)
}

/// Builds the internal report in its fixed section order. Sections without
/// content are left out and the rest renumbered.
///
/// `records` are sorted by objeto before rendering.
pub fn build_analysis<P: HolidayProvider>(
    cache: &mut HolidayCache<P>,
    deadline_policy: &DeadlinePolicy,
    fee_policy: &FeePolicy,
    input: &AnalysisInput,
    records: &[Record],
) -> Result<Analysis, AnalysisError> {
    let deadlines = collect_deadlines(cache, deadline_policy, input)?;
    let appeal = filed_appeal(input);
    let fees = assess_fees(fee_policy, &input.fees, appeal)?;

    let mut sorted = records.to_vec();
    sort_records(&mut sorted);

    let mut sections = vec![
        ("Contexto do Processo", context_section(input)),
        (
            "Resultado Geral da Decisão",
            format!(
                "- Avaliação para o Cliente: {}\n- Observações: {}",
                or_default(&input.outcome, NOT_INFORMED),
                or_default(&input.decision_notes, NOTHING)
            ),
        ),
        (
            "Tabela de Pedidos Processada",
            render_report(&sorted, &[], &input.decision),
        ),
        (
            "Embargos de Declaração (ED)",
            format!(
                "- Avaliação: {}\n- Justificativa: {}",
                input.ed.map_or(NOT_INFORMED, EdAssessment::label),
                or_default(&input.ed_justification, NOT_INFORMED)
            ),
        ),
    ];

    if input.ed == Some(EdAssessment::NaoCabe) {
        sections.push((
            "Recurso",
            format!(
                "- Decisão/Recomendação: {}\n- Justificativa: {}",
                appeal.unwrap_or(NOT_INFORMED),
                or_default(&input.appeal_justification, NOT_INFORMED)
            ),
        ));
        sections.push(("Custas e Depósito Recursal", costs_section(&fees)));

        let owes = fees.deposit > 0.0 || fees.costs > 0.0;
        if let Some(location) = input.payment_slips.as_deref().filter(|_| owes) {
            sections.push((
                "Guias de Pagamento",
                format!("- Local/Observação: {}", make_hyperlink(location)),
            ));
        }
    }

    sections.push(("Prazos Adicionados", format_deadlines(&deadlines)));
    sections.push((
        "Observações Finais Internas",
        or_default(&input.final_notes, NOTHING).to_string(),
    ));

    let email = input
        .lawyer
        .as_deref()
        .map(str::trim)
        .filter(|lawyer| !lawyer.is_empty())
        .map(|lawyer| {
            let recommendation = appeal
                .and_then(|appeal| appeal_recommendation(appeal, &input.appeal_justification))
                .unwrap_or_else(|| input.decision_notes.trim().to_string());
            let context = EmailContext {
                pasta: input.pasta.clone(),
                cliente: input.cliente.clone(),
                adverso: input.adverso.clone(),
                local: input.local.clone(),
                decision: input.decision.clone(),
                recommendation,
                costs_note: costs_note(&fees),
                lawyer: lawyer.to_string(),
            };
            draft_email(&context, &sorted)
        });

    Ok(Analysis {
        report: render_sections(&sections),
        deadlines,
        fees,
        email,
    })
}
