// src/catalog.rs
// The local opcode catalog: a JSON array of objects, loaded whole and
// written back whole.

use std::{
    error::Error,
    ffi::OsString,
    fmt, fs,
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::config::consts::TMP_SUFFIX;

/// Ordered records, exactly as they were read. Field order inside each
/// record is kept too (`serde_json` with `preserve_order`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    pub records: Vec<Value>,
}

impl Catalog {
    pub fn from_json(text: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        match serde_json::from_str::<Value>(text)? {
            Value::Array(records) => Ok(Self { records }),
            other => Err(format!("Catalog must be a JSON array, found {}", kind(&other)).into()),
        }
    }

    pub fn to_json(&self) -> Result<String, Box<dyn Error + Send + Sync>> {
        Ok(serde_json::to_string(&self.records)?)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogOp {
    Read,
    Parse,
    Write,
    Replace,
}

/// A catalog file operation failed. The I/O or JSON cause is the `source`,
/// not part of the message.
#[derive(Debug)]
pub struct CatalogError {
    pub op: CatalogOp,
    pub path: PathBuf,
    pub source: Box<dyn Error + Send + Sync>,
}

impl CatalogError {
    fn new(op: CatalogOp, path: &Path, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self { op, path: path.to_path_buf(), source: source.into() }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.op {
            CatalogOp::Read => "Cannot read catalog",
            CatalogOp::Parse => "Cannot parse catalog",
            CatalogOp::Write => "Cannot write",
            CatalogOp::Replace => "Cannot replace",
        };
        write!(f, "{what} {}", self.path.display())
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.source.as_ref())
    }
}

pub fn load(path: &Path) -> Result<Catalog, Box<dyn Error + Send + Sync>> {
    let text = fs::read_to_string(path).map_err(|e| CatalogError::new(CatalogOp::Read, path, e))?;
    let catalog = Catalog::from_json(&text).map_err(|e| CatalogError::new(CatalogOp::Parse, path, e))?;
    log::info!("Loaded {} records from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Serialize and replace `path`. Writes a sibling temp file first and renames
/// it over the target, so a failed write leaves the old catalog in place.
pub fn save(path: &Path, catalog: &Catalog) -> Result<PathBuf, Box<dyn Error + Send + Sync>> {
    let contents = catalog.to_json()?;
    let tmp = tmp_path(path);

    if let Err(e) = fs::write(&tmp, contents) {
        let _ = fs::remove_file(&tmp);
        return Err(Box::new(CatalogError::new(CatalogOp::Write, &tmp, e)));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(Box::new(CatalogError::new(CatalogOp::Replace, path, e)));
    }

    log::info!("Wrote {} records to {}", catalog.len(), path.display());
    Ok(path.to_path_buf())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("catalog"));
    name.push(TMP_SUFFIX);
    path.with_file_name(name)
}
