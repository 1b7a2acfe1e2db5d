use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use carchive_format::encoding_rs::Encoding;
use carchive_format::{CArchive, LogicalType, Mode, Value};

use crate::error::{Error, Result};

/// One decoded entry, with the offset it started at.
#[derive(Debug)]
pub struct Entry {
    pub offset: u64,
    pub ty: LogicalType,
    pub value: Value,
}

/// Reads `types` in order from `path`.
pub fn read_entries(
    path: &Path,
    types: &[LogicalType],
    encoding: &'static Encoding,
) -> Result<Vec<Entry>> {
    let file = File::open(path).map_err(|e| Error::OpenArchive {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    let mut ar = CArchive::with_provider(BufReader::new(file), Mode::Read, encoding);

    let mut entries = Vec::with_capacity(types.len());
    for (index, &ty) in types.iter().enumerate() {
        let offset = ar.position();
        let value = ar.read(ty).map_err(|source| Error::ReadValue {
            index,
            ty,
            offset,
            source,
        })?;
        entries.push(Entry { offset, ty, value });
    }

    tracing::debug!(count = entries.len(), bytes = ar.position(), "read archive");
    Ok(entries)
}

fn json_value(value: &Value) -> serde_json::Value {
    match value {
        Value::U16(v) => (*v).into(),
        Value::U32(v) => (*v).into(),
        Value::U64(v) => (*v).into(),
        Value::I16(v) => (*v).into(),
        Value::I32(v) => (*v).into(),
        Value::I64(v) => (*v).into(),
        Value::F32(v) => (*v).into(),
        Value::F64(v) => (*v).into(),
        Value::String(v) => v.as_str().into(),
    }
}

pub fn to_json(entries: &[Entry]) -> serde_json::Value {
    entries
        .iter()
        .map(|entry| {
            serde_json::json!({
                "offset": entry.offset,
                "type": entry.ty.name(),
                "value": json_value(&entry.value),
            })
        })
        .collect()
}

pub fn run(
    path: PathBuf,
    types: Vec<LogicalType>,
    encoding: &'static Encoding,
    json: bool,
) -> Result<()> {
    let entries = read_entries(&path, &types, encoding)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if json {
        serde_json::to_writer_pretty(&mut out, &to_json(&entries))
            .map_err(|e| Error::Output(e.into()))?;
        writeln!(out).map_err(Error::Output)?;
        return Ok(());
    }

    for entry in entries.iter() {
        let line = match &entry.value {
            Value::String(s) => writeln!(out, "{:#010x}  {:<8} {:?}", entry.offset, entry.ty, s),
            value => writeln!(out, "{:#010x}  {:<8} {}", entry.offset, entry.ty, value),
        };
        line.map_err(Error::Output)?;
    }

    Ok(())
}
