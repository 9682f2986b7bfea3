use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{HolidayCache, HolidayProvider, add_business_days};
use crate::error::DeadlineError;
use crate::options::NO_APPEAL;

const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdAssessment {
    /// Embargos de Declaração should be filed.
    Cabe,
    NaoCabe,
}

impl EdAssessment {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Cabe => "Cabe ED",
            Self::NaoCabe => "Não cabe ED",
        }
    }
}

/// Day counts for suggested deadlines. Business days throughout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlinePolicy {
    pub ed_days: i64,
    pub appeal_days: i64,
    pub extraordinary_appeal_days: i64,
    /// Distance between the internal (D-) and the fatal date.
    pub internal_margin_days: i64,
}

impl Default for DeadlinePolicy {
    fn default() -> Self {
        Self {
            ed_days: 5,
            appeal_days: 8,
            extraordinary_appeal_days: 15,
            internal_margin_days: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    pub descricao: String,
    pub data_d: NaiveDate,
    pub data_fatal: NaiveDate,
    #[serde(default)]
    pub obs: String,
}

impl Deadline {
    /// Builds a manually entered deadline.
    pub fn manual(
        descricao: &str,
        data_d: NaiveDate,
        data_fatal: NaiveDate,
        obs: &str,
    ) -> Result<Self, DeadlineError> {
        let descricao = descricao.trim();
        if descricao.is_empty() {
            return Err(DeadlineError::MissingDescription);
        }
        if data_d > data_fatal {
            return Err(DeadlineError::InternalAfterFatal);
        }
        Ok(Self {
            descricao: descricao.to_string(),
            data_d,
            data_fatal,
            obs: obs.trim().to_string(),
        })
    }
}

/// Deadline proposed from the publication date and the next procedural step.
///
/// `appeal` is only read when no ED is filed; `None` there means nothing was
/// chosen yet and no suggestion is made.
pub fn suggest_deadline<P: HolidayProvider>(
    cache: &mut HolidayCache<P>,
    policy: &DeadlinePolicy,
    ciencia: NaiveDate,
    ed: EdAssessment,
    appeal: Option<&str>,
) -> Result<Option<Deadline>, DeadlineError> {
    match ed {
        EdAssessment::Cabe => {
            let data_fatal = add_business_days(cache, ciencia, policy.ed_days)?;
            let data_d = add_business_days(cache, data_fatal, -policy.internal_margin_days)?;
            Ok(Some(Deadline {
                descricao: "Prazo para Oposição de Embargos de Declaração".to_string(),
                data_d,
                data_fatal,
                obs: String::new(),
            }))
        }
        EdAssessment::NaoCabe => {
            let Some(appeal) = appeal.map(str::trim).filter(|value| !value.is_empty()) else {
                return Ok(None);
            };
            let days = if appeal.contains("Extraordinário") {
                policy.extraordinary_appeal_days
            } else {
                policy.appeal_days
            };
            let data_fatal = add_business_days(cache, ciencia, days)?;

            let (descricao, data_d) = if appeal == NO_APPEAL {
                (
                    "Verificar interposição de recurso pela parte contrária".to_string(),
                    data_fatal,
                )
            } else {
                (
                    format!("Prazo para Interposição de {appeal}"),
                    add_business_days(cache, data_fatal, -policy.internal_margin_days)?,
                )
            };

            Ok(Some(Deadline {
                descricao,
                data_d,
                data_fatal,
                obs: String::new(),
            }))
        }
    }
}

#[must_use]
pub fn format_deadlines(deadlines: &[Deadline]) -> String {
    if deadlines.is_empty() {
        return "Nenhum prazo informado.".to_string();
    }

    let mut lines = Vec::new();
    for (index, deadline) in deadlines.iter().enumerate() {
        lines.push(format!("{}) {}", index + 1, deadline.descricao));
        lines.push(format!("   - Data D-: {}", deadline.data_d.format(DATE_FORMAT)));
        lines.push(format!(
            "   - Data Fatal: {}",
            deadline.data_fatal.format(DATE_FORMAT)
        ));
        let obs = deadline.obs.trim();
        if !obs.is_empty() {
            lines.push(format!("   - Observações: {obs}"));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}
