use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DECISION_OPTIONS: [&str; 9] = [
    "Sentença (Vara do Trabalho)",
    "Acórdão (TRT)",
    "Acórdão (TST - Turma)",
    "Acórdão (TST - SDI)",
    "Decisão Monocrática (Relator TRT/TST)",
    "Despacho Denegatório de Recurso",
    "Decisão de Embargos de Declaração",
    "Decisão Interlocutória",
    "Outro",
];

pub const APPEAL_OPTIONS: [&str; 10] = [
    "Não Interpor Recurso",
    "Recurso Ordinário (RO)",
    "Recurso de Revista (RR)",
    "Agravo de Instrumento em Recurso Ordinário (AIRO)",
    "Agravo de Instrumento em Recurso de Revista (AIRR)",
    "Agravo de Petição (AP)",
    "Agravo Regimental / Agravo Interno",
    "Recurso de Embargos (E-RR/E-ED)",
    "Recurso Extraordinário (RE)",
    "Outro",
];

pub const NO_APPEAL: &str = "Não Interpor Recurso";

/// Type of ruling under analysis. Drives which result columns the report shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionMode(String);

impl DecisionMode {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.0
    }

    fn lowered(&self) -> String {
        self.0.to_lowercase()
    }

    #[must_use]
    pub fn shows_second_instance(&self) -> bool {
        let lowered = self.lowered();
        ["acórdão", "monocrática", "denegatório"]
            .iter()
            .any(|term| lowered.contains(term))
    }

    #[must_use]
    pub fn shows_superior_instance(&self) -> bool {
        let lowered = self.lowered();
        ["tst", "denegatório"]
            .iter()
            .any(|term| lowered.contains(term))
    }

    /// Appeal option proposed by default when no ED is filed.
    #[must_use]
    pub fn suggested_appeal(&self) -> &'static str {
        let index = match self.0.as_str() {
            "Sentença (Vara do Trabalho)" | "Decisão de Embargos de Declaração" => 1,
            "Acórdão (TRT)" => 2,
            "Acórdão (TST - Turma)" => 7,
            "Acórdão (TST - SDI)" => 8,
            "Decisão Monocrática (Relator TRT/TST)" => 6,
            "Despacho Denegatório de Recurso" => 4,
            _ => 0,
        };
        APPEAL_OPTIONS[index]
    }

    #[must_use]
    pub fn is_known_option(&self) -> bool {
        DECISION_OPTIONS.contains(&self.0.as_str())
    }
}

impl Default for DecisionMode {
    fn default() -> Self {
        Self::new(DECISION_OPTIONS[0])
    }
}

impl FromStr for DecisionMode {
    type Err = Infallible;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(label.trim()))
    }
}

impl Display for DecisionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Keyword hits a line needs before it is taken as the header.
    pub min_header_keywords: usize,
    /// Lines starting with these words are data, even when they mention keywords.
    pub row_starters: Vec<String>,
    /// Interface leftovers from the copy-paste source, skipped silently.
    pub ui_chrome_prefixes: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            min_header_keywords: 2,
            row_starters: [
                "adicional",
                "horas",
                "multa",
                "diferenças",
                "danos",
                "justiça",
                "honorários",
            ]
            .map(str::to_string)
            .to_vec(),
            ui_chrome_prefixes: ["visualizar", "editar", "ação", "gerenciar"]
                .map(str::to_string)
                .to_vec(),
        }
    }
}
