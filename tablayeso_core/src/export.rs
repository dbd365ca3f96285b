//! # Bill Export
//!
//! Writes a bill of materials as CSV: a `Material,Quantity,Unit` header
//! followed by one row per bill line, in bill order.
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use tablayeso_core::export::write_bill_csv;
//! use tablayeso_core::materials::{BillOfMaterials, Material};
//!
//! let mut bill = BillOfMaterials::new();
//! bill.add_rounded(&BTreeMap::from([(Material::LightPost, 8)]));
//!
//! let mut out = Vec::new();
//! write_bill_csv(&bill, &mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("Material,Quantity,Unit\n"));
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::errors::{CalcError, CalcResult};
use crate::materials::BillOfMaterials;

/// Column headers of the exported bill
pub const BILL_HEADERS: [&str; 3] = ["Material", "Quantity", "Unit"];

/// Write `bill` as CSV rows to `writer`.
pub fn write_bill_csv<W: Write>(bill: &BillOfMaterials, writer: W) -> CalcResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(BILL_HEADERS).map_err(write_error)?;

    for line in bill.lines() {
        csv_writer
            .write_record([line.name.as_str(), &line.quantity.to_string(), line.unit.label()])
            .map_err(write_error)?;
    }

    csv_writer
        .flush()
        .map_err(|e| CalcError::SerializationError { reason: e.to_string() })
}

/// Create (or truncate) the file at `path` and write `bill` to it as CSV.
pub fn export_bill_csv(bill: &BillOfMaterials, path: impl AsRef<Path>) -> CalcResult<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| CalcError::file_error("create", path.display().to_string(), e.to_string()))?;
    write_bill_csv(bill, file)?;
    tracing::info!(path = %path.display(), lines = bill.len(), "bill exported");
    Ok(())
}

fn write_error(err: csv::Error) -> CalcError {
    CalcError::SerializationError { reason: err.to_string() }
}
