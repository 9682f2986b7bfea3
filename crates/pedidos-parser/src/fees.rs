//! Appeal deposit and court costs owed after a decision.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FeeError;
use crate::options::NO_APPEAL;

/// Why a deposit or court costs are waived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exemption {
    #[default]
    NaoSeAplica,
    JusticaGratuita,
    EntidadeFilantropica,
    MassaFalida,
    /// Still pays the deposit, at half the amount.
    EntidadeBeneficente,
    Outro(String),
}

impl Exemption {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::NaoSeAplica => "Não se aplica",
            Self::JusticaGratuita => "Justiça Gratuita",
            Self::EntidadeFilantropica => "Entidade Filantrópica",
            Self::MassaFalida => "Massa Falida",
            Self::EntidadeBeneficente => "Entidade Beneficente",
            Self::Outro(reason) => reason.trim(),
        }
    }

    #[must_use]
    pub fn applies(&self) -> bool {
        !matches!(self, Self::NaoSeAplica)
    }
}

/// Deposit caps per appeal and the default costs rate. Caps change with each
/// CSJT ordinance; the defaults are the ones in force from 2024-08-01.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeePolicy {
    pub deposit_caps: BTreeMap<String, f64>,
    /// Used for appeals without their own cap.
    pub fallback_cap: f64,
    pub default_costs_percent: f64,
}

impl Default for FeePolicy {
    fn default() -> Self {
        let deposit_caps = [
            ("Recurso Ordinário (RO)", 12_969.43),
            ("Recurso de Revista (RR)", 25_938.87),
            ("Recurso de Embargos (E-RR/E-ED)", 25_938.87),
            ("Agravo de Instrumento em Recurso Ordinário (AIRO)", 6_484.72),
            ("Agravo de Instrumento em Recurso de Revista (AIRR)", 12_969.44),
            ("Outro", 25_938.87),
        ]
        .into_iter()
        .map(|(appeal, cap)| (appeal.to_string(), cap))
        .collect();

        Self {
            deposit_caps,
            fallback_cap: 25_938.87,
            default_costs_percent: 2.0,
        }
    }
}

impl FeePolicy {
    #[must_use]
    pub fn cap_for(&self, appeal: &str) -> f64 {
        self.deposit_caps
            .get(appeal)
            .copied()
            .unwrap_or(self.fallback_cap)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeInput {
    /// Condemnation amount; zero when the decision set none.
    pub condemnation: f64,
    pub deposit_paid: f64,
    /// Costs rate set by the decision. Falls back to the policy default.
    pub costs_percent: Option<f64>,
    pub deposit_exemption: Exemption,
    pub costs_exemption: Exemption,
    /// 50% deposit reduction (MEI, EPP and similar).
    pub half_deposit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeAssessment {
    pub deposit: f64,
    pub costs: f64,
    pub deposit_exemption: Exemption,
    pub costs_exemption: Exemption,
}

fn checked_amount(field: &'static str, value: f64) -> Result<f64, FeeError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(FeeError::InvalidAmount { field, value })
    }
}

/// Deposit and costs due for `appeal`. No deposit is due when no appeal is filed.
pub fn assess_fees(
    policy: &FeePolicy,
    input: &FeeInput,
    appeal: Option<&str>,
) -> Result<FeeAssessment, FeeError> {
    let condemnation = checked_amount("condemnation", input.condemnation)?;
    let deposit_paid = checked_amount("deposit_paid", input.deposit_paid)?;
    let costs_percent = checked_amount(
        "costs_percent",
        input.costs_percent.unwrap_or(policy.default_costs_percent),
    )?;
    if costs_percent > 100.0 {
        return Err(FeeError::InvalidAmount {
            field: "costs_percent",
            value: costs_percent,
        });
    }

    let charitable = input.deposit_exemption == Exemption::EntidadeBeneficente;
    let appeal = appeal
        .map(str::trim)
        .filter(|appeal| !appeal.is_empty() && *appeal != NO_APPEAL);

    let deposit = match appeal {
        Some(appeal) if !input.deposit_exemption.applies() || charitable => {
            let cap = policy.cap_for(appeal);
            let base = if condemnation > 0.0 {
                cap.min(condemnation)
            } else {
                cap
            };
            let mut due = base - deposit_paid;
            if charitable || input.half_deposit {
                due /= 2.0;
            }
            due.max(0.0)
        }
        _ => 0.0,
    };

    let costs = if input.costs_exemption.applies() {
        0.0
    } else {
        condemnation * costs_percent / 100.0
    };

    Ok(FeeAssessment {
        deposit,
        costs,
        deposit_exemption: input.deposit_exemption.clone(),
        costs_exemption: input.costs_exemption.clone(),
    })
}

/// `R$ 12,969.43`: comma thousands, two decimals.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_money(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let units = (cents / 100).to_string();

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (index, digit) in units.chars().enumerate() {
        if index > 0 && (units.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("R$ {sign}{grouped}.{:02}", cents % 100)
}

/// Paragraph telling the client what has to be paid.
#[must_use]
pub fn costs_note(fees: &FeeAssessment) -> String {
    let deposit = if fees.deposit_exemption.applies() {
        format!(
            "Quanto ao depósito recursal, foi deferida a isenção (motivo: {}).",
            fees.deposit_exemption.label()
        )
    } else if fees.deposit > 0.0 {
        format!(
            "Para a interposição do recurso, será necessário o recolhimento de {} a título de depósito recursal.",
            format_money(fees.deposit)
        )
    } else {
        "Não há valor a ser recolhido a título de depósito recursal.".to_string()
    };

    let costs = if fees.costs_exemption.applies() {
        format!(
            "Quanto às custas processuais, foi deferida a isenção (motivo: {}).",
            fees.costs_exemption.label()
        )
    } else if fees.costs > 0.0 {
        format!(
            "Será necessário, também, o pagamento de {} de custas processuais.",
            format_money(fees.costs)
        )
    } else {
        "Não há valor a ser recolhido a título de custas processuais.".to_string()
    };

    format!("{deposit} {costs}")
}

/// Two-line summary for the internal analysis report.
#[must_use]
pub fn costs_section(fees: &FeeAssessment) -> String {
    format!(
        "- Depósito a Recolher: {} (Isenção: {})\n- Custas a Recolher: {} (Isenção: {})",
        format_money(fees.deposit),
        fees.deposit_exemption.label(),
        format_money(fees.costs),
        fees.costs_exemption.label()
    )
}

#[cfg(test)]
mod tests {
    use super::{
        Exemption, FeeInput, FeePolicy, assess_fees, costs_note, costs_section, format_money,
    };
    use crate::error::FeeError;

    const RO: Option<&str> = Some("Recurso Ordinário (RO)");

    fn close(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-6
    }

    #[test]
    fn deposit_is_capped_by_condemnation_and_reduced_by_payments() {
        let input = FeeInput {
            condemnation: 5_000.0,
            deposit_paid: 1_000.0,
            ..FeeInput::default()
        };
        let fees = assess_fees(&FeePolicy::default(), &input, RO).expect("valid input");
        assert!(close(fees.deposit, 4_000.0), "{}", fees.deposit);
        assert!(close(fees.costs, 100.0), "{}", fees.costs);
    }

    #[test]
    fn deposit_uses_appeal_cap_without_condemnation() {
        let fees = assess_fees(&FeePolicy::default(), &FeeInput::default(), RO).expect("valid");
        assert!(close(fees.deposit, 12_969.43));
        assert!(close(fees.costs, 0.0));

        let unknown = assess_fees(
            &FeePolicy::default(),
            &FeeInput::default(),
            Some("Agravo de Petição (AP)"),
        )
        .expect("valid");
        assert!(close(unknown.deposit, 25_938.87));
    }

    #[test]
    fn half_reduction_and_charitable_entities_halve_the_deposit() {
        let policy = FeePolicy::default();
        let halved = FeeInput {
            condemnation: 8_000.0,
            half_deposit: true,
            ..FeeInput::default()
        };
        let fees = assess_fees(&policy, &halved, RO).expect("valid");
        assert!(close(fees.deposit, 4_000.0));

        let charitable = FeeInput {
            condemnation: 8_000.0,
            deposit_exemption: Exemption::EntidadeBeneficente,
            ..FeeInput::default()
        };
        let fees = assess_fees(&policy, &charitable, RO).expect("valid");
        assert!(close(fees.deposit, 4_000.0));
    }

    #[test]
    fn deposit_never_goes_negative_and_exemptions_zero_it() {
        let policy = FeePolicy::default();
        let overpaid = FeeInput {
            condemnation: 2_000.0,
            deposit_paid: 3_000.0,
            ..FeeInput::default()
        };
        assert!(close(assess_fees(&policy, &overpaid, RO).expect("valid").deposit, 0.0));

        let exempt = FeeInput {
            condemnation: 2_000.0,
            deposit_exemption: Exemption::JusticaGratuita,
            costs_exemption: Exemption::Outro("Acordo homologado".to_string()),
            ..FeeInput::default()
        };
        let fees = assess_fees(&policy, &exempt, RO).expect("valid");
        assert!(close(fees.deposit, 0.0));
        assert!(close(fees.costs, 0.0));

        let no_appeal = assess_fees(&policy, &overpaid, Some("Não Interpor Recurso"))
            .expect("valid");
        assert!(close(no_appeal.deposit, 0.0));
    }

    #[test]
    fn rejects_negative_amounts_and_rates_above_100() {
        let negative = FeeInput {
            deposit_paid: -1.0,
            ..FeeInput::default()
        };
        assert_eq!(
            assess_fees(&FeePolicy::default(), &negative, RO),
            Err(FeeError::InvalidAmount {
                field: "deposit_paid",
                value: -1.0
            })
        );

        let rate = FeeInput {
            costs_percent: Some(150.0),
            ..FeeInput::default()
        };
        assert!(assess_fees(&FeePolicy::default(), &rate, RO).is_err());
    }

    #[test]
    fn formats_money_with_thousand_separators() {
        assert_eq!(format_money(12_969.43), "R$ 12,969.43");
        assert_eq!(format_money(1_234_567.891), "R$ 1,234,567.89");
        assert_eq!(format_money(0.0), "R$ 0.00");
        assert_eq!(format_money(999.999), "R$ 1,000.00");
    }

    #[test]
    fn renders_costs_paragraph_and_section() {
        let input = FeeInput {
            condemnation: 10_000.0,
            costs_exemption: Exemption::MassaFalida,
            ..FeeInput::default()
        };
        let fees = assess_fees(&FeePolicy::default(), &input, RO).expect("valid");
        assert_eq!(
            costs_note(&fees),
            "Para a interposição do recurso, será necessário o recolhimento de R$ 10,000.00 a título de depósito recursal. \
             Quanto às custas processuais, foi deferida a isenção (motivo: Massa Falida)."
        );
        assert_eq!(
            costs_section(&fees),
            "- Depósito a Recolher: R$ 10,000.00 (Isenção: Não se aplica)\n- Custas a Recolher: R$ 0.00 (Isenção: Massa Falida)"
        );

        let nothing_due = assess_fees(&FeePolicy::default(), &FeeInput::default(), None)
            .expect("valid");
        assert_eq!(
            costs_note(&nothing_due),
            "Não há valor a ser recolhido a título de depósito recursal. \
             Não há valor a ser recolhido a título de custas processuais."
        );
    }
}
