use std::io::Write;
use std::path::Path;

use csv::{Writer, WriterBuilder};

use crate::error::OutputError;
use crate::model::{Field, Record};

fn write_all<W: Write>(writer: &mut Writer<W>, records: &[Record]) -> Result<(), OutputError> {
    writer.write_record(Field::ALL.map(Field::label))?;
    for record in records {
        writer.write_record(Field::ALL.map(|field| record.get(field).as_str()))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_records_csv(
    path: &Path,
    records: &[Record],
    delimiter: u8,
) -> Result<(), OutputError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    write_all(&mut writer, records)
}

pub fn records_to_csv_string(records: &[Record], delimiter: u8) -> Result<String, OutputError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::<u8>::new());
    write_all(&mut writer, records)?;

    let bytes = writer
        .into_inner()
        .map_err(|error| OutputError::Io(error.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
