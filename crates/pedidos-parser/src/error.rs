use std::io;

use thiserror::Error;

use crate::model::Field;
use crate::warning::ParseWarning;

fn bullet_list(warnings: &[ParseWarning]) -> String {
    warnings
        .iter()
        .map(|warning| format!("\n- {warning}"))
        .collect()
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Erro: O texto da tabela está vazio.")]
    EmptyTable,

    #[error(
        "Erro: Não foi possível localizar a linha de cabeçalho ({scanned_lines} linhas analisadas). \
         Verifique se colunas como 'Objetos', 'Situação' e 'Resultado...' estão presentes. \
         Início do texto: '{preview}'"
    )]
    HeaderNotFound {
        scanned_lines: usize,
        preview: String,
    },

    #[error("Coluna essencial '{field}' não encontrada no cabeçalho: '{header_line}'")]
    ColumnNotMapped { field: Field, header_line: String },

    #[error(
        "Erro: Nenhum dado de pedido válido foi extraído. Verifique o conteúdo após o cabeçalho.{}",
        bullet_list(.warnings)
    )]
    NoRecordsExtracted { warnings: Vec<ParseWarning> },
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid utf-8 csv output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeadlineError {
    #[error("A descrição do prazo é obrigatória!")]
    MissingDescription,

    #[error("Erro: A Data D- não pode ser posterior à Data Fatal!")]
    InternalAfterFatal,

    #[error("date arithmetic left the supported calendar range")]
    OutOfRange,
}

#[derive(Debug, Error, PartialEq)]
pub enum FeeError {
    #[error("Erro: valor inválido para '{field}': {value}")]
    InvalidAmount { field: &'static str, value: f64 },
}

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error(transparent)]
    Deadline(#[from] DeadlineError),

    #[error(transparent)]
    Fee(#[from] FeeError),
}
