// JSON value files
//
// A value file is a flat object keyed by "row-col", the same shape the
// change notification carries: {"0-0": "12", "1-3": "4.5"}

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use entrygrid_engine::RawValues;

use crate::error::ValuesFileError;

pub fn from_str(text: &str) -> Result<RawValues, ValuesFileError> {
    Ok(serde_json::from_str(text)?)
}

pub fn to_string(values: &RawValues) -> Result<String, ValuesFileError> {
    Ok(serde_json::to_string_pretty(values)?)
}

pub fn load(path: &Path) -> Result<RawValues, ValuesFileError> {
    let file = File::open(path).map_err(|e| ValuesFileError::Io(format!("{}: {e}", path.display())))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

pub fn save(values: &RawValues, path: &Path) -> Result<(), ValuesFileError> {
    let file = File::create(path).map_err(|e| ValuesFileError::Io(format!("{}: {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, values)?;
    writer.flush().map_err(|e| ValuesFileError::Io(e.to_string()))
}
