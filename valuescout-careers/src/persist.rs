use crate::types::ExtractionResult;
use std::fs;
use std::path::Path;
use tracing::info;
use valuescout_common::Result;

/// Write `result` as pretty-printed UTF-8 JSON, creating parent directories.
pub fn save_extraction(result: &ExtractionResult, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut body = serde_json::to_string_pretty(result)?;
    body.push('\n');
    fs::write(path, body)?;
    info!(
        target: "careers.persist",
        path = %path.display(),
        values = result.total_values_extracted,
        "saved core values"
    );
    Ok(())
}

pub fn load_extraction(path: &Path) -> Result<ExtractionResult> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
