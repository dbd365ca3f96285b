//! # Segment Import
//!
//! Reads segment dimensions from CSV files with a header row. Columns are
//! found by header name (trimmed, case-insensitive), so extra columns and
//! any column order are fine:
//!
//! | Kind    | Columns                  |
//! |---------|--------------------------|
//! | Wall    | `ancho`, `alto`          |
//! | Ceiling | `ancho`, `largo`         |
//! | Trim    | `largo`, `ancho`, `alto` |
//!
//! A missing column fails the whole import. A bad row is skipped and
//! reported, and the rest of the file is still imported.
//!
//! ```rust
//! use tablayeso_core::import::import_segments;
//! use tablayeso_core::items::ItemKind;
//!
//! let data = "Ancho,Alto\n3.0,2.4\nx,2.4\n";
//! let report = import_segments(data.as_bytes(), ItemKind::Wall).unwrap();
//! assert_eq!(report.imported_count(), 1);
//! assert_eq!(report.skipped, vec!["Row 3: invalid wall dimensions (width and height must be > 0)"]);
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::items::{CeilingSegmentInput, ItemInput, ItemKind, TrimSegmentInput, WallSegmentInput};

/// Segments read from one file, typed by item kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "segments", rename_all = "snake_case")]
pub enum ImportedSegments {
    Wall(Vec<WallSegmentInput>),
    Ceiling(Vec<CeilingSegmentInput>),
    Trim(Vec<TrimSegmentInput>),
}

impl ImportedSegments {
    fn empty(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Wall => ImportedSegments::Wall(Vec::new()),
            ItemKind::Ceiling => ImportedSegments::Ceiling(Vec::new()),
            ItemKind::Trim => ImportedSegments::Trim(Vec::new()),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            ImportedSegments::Wall(_) => ItemKind::Wall,
            ImportedSegments::Ceiling(_) => ItemKind::Ceiling,
            ImportedSegments::Trim(_) => ItemKind::Trim,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ImportedSegments::Wall(s) => s.len(),
            ImportedSegments::Ceiling(s) => s.len(),
            ImportedSegments::Trim(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, dims: &[f64]) {
        match self {
            ImportedSegments::Wall(s) => s.push(WallSegmentInput::new(dims[0], dims[1])),
            ImportedSegments::Ceiling(s) => s.push(CeilingSegmentInput::new(dims[0], dims[1])),
            ImportedSegments::Trim(s) => s.push(TrimSegmentInput::new(dims[0], dims[1], dims[2])),
        }
    }
}

/// Outcome of an import: the accepted segments and one message per
/// skipped row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub segments: ImportedSegments,
    pub skipped: Vec<String>,
}

impl ImportReport {
    pub fn imported_count(&self) -> usize {
        self.segments.len()
    }

    /// Append the imported segments to an item of the same kind.
    ///
    /// Returns the number of segments appended.
    pub fn append_to(&self, item: &mut ItemInput) -> CalcResult<usize> {
        match (item, &self.segments) {
            (ItemInput::Wall(w), ImportedSegments::Wall(s)) => w.segments.extend_from_slice(s),
            (ItemInput::Ceiling(c), ImportedSegments::Ceiling(s)) => c.segments.extend_from_slice(s),
            (ItemInput::Trim(t), ImportedSegments::Trim(s)) => t.segments.extend_from_slice(s),
            (item, segments) => {
                return Err(CalcError::invalid_input(
                    "kind",
                    item.kind().display_name(),
                    format!("cannot append {} segments", segments.kind()),
                ))
            }
        }
        Ok(self.imported_count())
    }
}

/// Header names for a kind, in the order dimensions are stored
fn required_columns(kind: ItemKind) -> &'static [&'static str] {
    match kind {
        ItemKind::Wall => &["ancho", "alto"],
        ItemKind::Ceiling => &["ancho", "largo"],
        ItemKind::Trim => &["largo", "ancho", "alto"],
    }
}

fn invalid_row_reason(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Wall => "invalid wall dimensions (width and height must be > 0)",
        ItemKind::Ceiling => "invalid ceiling dimensions (width and length must be > 0)",
        ItemKind::Trim => "invalid trim dimensions (length, width and height must be > 0)",
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Round to two decimals, the precision a dimension is entered with
fn round_dimension(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn parse_dimension(cell: &str) -> Option<f64> {
    let value = round_dimension(cell.trim().parse::<f64>().ok()?);
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Import segments for `kind` from CSV data with a header row.
pub fn import_segments<R: Read>(reader: R, kind: ItemKind) -> CalcResult<ImportReport> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = required_columns(kind);
    let indices: Vec<Option<usize>> = columns
        .iter()
        .map(|name| {
            headers
                .iter()
                .position(|h| h.trim().to_lowercase() == *name)
        })
        .collect();

    let missing: Vec<String> = columns
        .iter()
        .zip(&indices)
        .filter(|(_, index)| index.is_none())
        .map(|(name, _)| format!("\"{}\"", capitalize(name)))
        .collect();
    if !missing.is_empty() {
        return Err(CalcError::import_failed(format!(
            "the file must contain the columns {} in the first row for {}",
            missing.join(", "),
            kind
        )));
    }
    let indices: Vec<usize> = indices.into_iter().flatten().collect();
    let last_index = indices.iter().copied().max().unwrap_or(0);

    let mut segments = ImportedSegments::empty(kind);
    let mut skipped = Vec::new();
    let mut rows = 0usize;

    for (i, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = i + 2;
        rows += 1;

        if record.len() <= last_index {
            skipped.push(format!("Row {row}: incomplete data"));
            continue;
        }

        let dims: Option<Vec<f64>> = indices
            .iter()
            .map(|&index| record.get(index).and_then(parse_dimension))
            .collect();
        match dims {
            Some(dims) => segments.push(&dims),
            None => skipped.push(format!("Row {row}: {}", invalid_row_reason(kind))),
        }
    }

    if rows == 0 {
        return Err(CalcError::import_failed(
            "the file needs a header row and at least one data row",
        ));
    }

    tracing::info!(
        kind = %kind,
        imported = segments.len(),
        skipped = skipped.len(),
        "segments imported"
    );
    for message in &skipped {
        tracing::warn!(%message, "row not imported");
    }

    Ok(ImportReport { segments, skipped })
}

/// Import segments from a CSV file on disk.
pub fn import_segments_from_path(path: impl AsRef<Path>, kind: ItemKind) -> CalcResult<ImportReport> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;
    import_segments(file, kind)
}
