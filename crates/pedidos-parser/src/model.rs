use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub(crate) const MISSING_CELL: &str = "N/A";

/// Canonical columns of a DataJuri "pedidos" table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "objetos")]
    Objetos,
    #[serde(rename = "situação")]
    Situacao,
    #[serde(rename = "resultado_1a_instancia")]
    Resultado1aInstancia,
    #[serde(rename = "resultado_2a_instancia")]
    Resultado2aInstancia,
    #[serde(rename = "resultado_instancia_superior")]
    ResultadoInstanciaSuperior,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Objetos,
        Field::Situacao,
        Field::Resultado1aInstancia,
        Field::Resultado2aInstancia,
        Field::ResultadoInstanciaSuperior,
    ];

    /// Fields every header must carry. `Objetos` may be implicit.
    pub const REQUIRED: [Field; 4] = [
        Field::Situacao,
        Field::Resultado1aInstancia,
        Field::Resultado2aInstancia,
        Field::ResultadoInstanciaSuperior,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Objetos => "objetos",
            Self::Situacao => "situação",
            Self::Resultado1aInstancia => "resultado_1a_instancia",
            Self::Resultado2aInstancia => "resultado_2a_instancia",
            Self::ResultadoInstanciaSuperior => "resultado_instancia_superior",
        }
    }

    /// Lower-case substring searched for in header cells.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Objetos => "objetos",
            Self::Situacao => "situação",
            Self::Resultado1aInstancia => "resultado 1ª instância",
            Self::Resultado2aInstancia => "resultado 2ª instância",
            Self::ResultadoInstanciaSuperior => "resultado instância superior",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Objetos => "Objetos",
            Self::Situacao => "Situação",
            Self::Resultado1aInstancia => "Resultado 1ª Instância",
            Self::Resultado2aInstancia => "Resultado 2ª Instância",
            Self::ResultadoInstanciaSuperior => "Resultado Instância Superior",
        }
    }

    /// Column name used by the case-management API for this field.
    #[must_use]
    pub const fn api_name(self) -> &'static str {
        match self {
            Self::Objetos => "nomeObjeto",
            Self::Situacao => "situacao",
            Self::Resultado1aInstancia => "resultado_1_instanci",
            Self::Resultado2aInstancia => "resultado_2_instanci",
            Self::ResultadoInstanciaSuperior => "resultado_instancia_",
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Objetos => 0,
            Self::Situacao => 1,
            Self::Resultado1aInstancia => 2,
            Self::Resultado2aInstancia => 3,
            Self::ResultadoInstanciaSuperior => 4,
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A field value, or the sentinel for a column the row did not reach.
///
/// Serialized as its text, so `Missing` is written as `"N/A"`. `null`, an
/// absent field and `"N/A"` all read back as `Missing`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cell {
    Value(String),
    #[default]
    Missing,
}

impl Cell {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Value(value) => value,
            Self::Missing => MISSING_CELL,
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(match value {
            Some(text) if text != MISSING_CELL => Self::Value(text),
            _ => Self::Missing,
        })
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

/// One parsed pedido.
///
/// Deserialization also accepts the case-management API column names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(alias = "nomeObjeto", default)]
    pub objetos: Cell,
    #[serde(rename = "situação", alias = "situacao", default)]
    pub situacao: Cell,
    #[serde(alias = "resultado_1_instanci", default)]
    pub resultado_1a_instancia: Cell,
    #[serde(alias = "resultado_2_instanci", default)]
    pub resultado_2a_instancia: Cell,
    #[serde(alias = "resultado_instancia_", default)]
    pub resultado_instancia_superior: Cell,
}

impl Record {
    #[must_use]
    pub fn get(&self, field: Field) -> &Cell {
        match field {
            Field::Objetos => &self.objetos,
            Field::Situacao => &self.situacao,
            Field::Resultado1aInstancia => &self.resultado_1a_instancia,
            Field::Resultado2aInstancia => &self.resultado_2a_instancia,
            Field::ResultadoInstanciaSuperior => &self.resultado_instancia_superior,
        }
    }

    pub fn set(&mut self, field: Field, value: Cell) {
        let slot = match field {
            Field::Objetos => &mut self.objetos,
            Field::Situacao => &mut self.situacao,
            Field::Resultado1aInstancia => &mut self.resultado_1a_instancia,
            Field::Resultado2aInstancia => &mut self.resultado_2a_instancia,
            Field::ResultadoInstanciaSuperior => &mut self.resultado_instancia_superior,
        };
        *slot = value;
    }
}

/// A non-blank line of the pasted text with its 1-based source line number.
///
/// Blank lines are counted, so `number` is the line an editor shows. Positions
/// among non-blank lines only would be smaller whenever the paste has gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub number: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub lines: Vec<RawLine>,
}

impl RawTable {
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .filter_map(|(index, line)| {
                let trimmed = line.trim();
                (!trimmed.is_empty()).then(|| RawLine {
                    number: index + 1,
                    text: trimmed.to_string(),
                })
            })
            .collect();
        Self { lines }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Column positions resolved from the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMap {
    columns: [usize; 5],
    implicit_objetos: bool,
}

impl HeaderMap {
    pub(crate) fn new(columns: [usize; 5], implicit_objetos: bool) -> Self {
        Self {
            columns,
            implicit_objetos,
        }
    }

    #[must_use]
    pub fn column(&self, field: Field) -> usize {
        self.columns[field.slot()]
    }

    /// True when the header had no Objetos title and column 0 was assumed.
    #[must_use]
    pub fn implicit_objetos(&self) -> bool {
        self.implicit_objetos
    }

    /// Tokens a row needs before it can be mapped at all.
    #[must_use]
    pub fn min_row_cells(&self) -> usize {
        let reach = [Field::Objetos, Field::Situacao, Field::Resultado1aInstancia]
            .into_iter()
            .map(|field| self.column(field))
            .max()
            .unwrap_or(0);
        reach + 1
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.iter().copied().max().unwrap_or(0) + 1
    }
}
