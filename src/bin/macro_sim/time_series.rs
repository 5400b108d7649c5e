// Per-Step JSONL Time Series Writer
// Outputs one JSON line per step record for downstream analysis

use macro_engine::{StepRecord, TrovePopulation};
use std::io::Write;
use std::path::Path;

/// Write all records to a JSONL file
pub fn write_jsonl(records: &[StepRecord], path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    for record in records {
        let line = serde_json::to_string(record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        writeln!(file, "{}", line)?;
    }
    file.flush()
}

/// Write the final population, each trove with its ratio at the last price
pub fn write_troves(troves: &TrovePopulation, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&troves.snapshot())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    std::fs::write(path, json)
}
