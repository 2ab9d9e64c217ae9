//! Report directory writer for `petcheck run --report-dir`
//!
//! Layout:
//! - `summary.json`: verdict, counts, metadata
//! - `results.json`: every scenario result
//! - `config.toml`: the effective config
//! - `reproductions.http`: only when something failed

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use petcheck_core::{Config, SuiteReport, Verdict, to_http_file};

/// Everything needed to persist one suite run.
pub struct ReportData<'a> {
    pub config: &'a Config,
    pub report: &'a SuiteReport,
    pub verdict: &'a Verdict,
    pub duration_secs: f64,
}

/// Write the report files into `dir`, creating it if needed.
///
/// Returns the paths written, in order.
pub fn save_report(dir: &Path, data: &ReportData) -> Result<Vec<PathBuf>, std::io::Error> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let summary = serde_json::json!({
        "verdict": {
            "status": data.verdict.status.to_string(),
            "exit_code": data.verdict.exit_code,
            "reason": data.verdict.reason,
        },
        "stats": {
            "total": data.report.total,
            "passed": data.report.passed,
            "failed": data.report.failed,
            "skipped": data.report.skipped,
        },
        "meta": {
            "unix_time": unix_time(),
            "duration_secs": data.duration_secs,
            "base_url": data.report.base_url,
            "ids": data.config.ids,
            "inventory": data.config.inventory,
            "version": env!("CARGO_PKG_VERSION"),
        },
    });
    written.push(write_json(dir, "summary.json", &summary)?);
    written.push(write_json(dir, "results.json", &data.report.results)?);

    let config_toml =
        toml::to_string_pretty(data.config).map_err(|e| std::io::Error::other(e.to_string()))?;
    let path = dir.join("config.toml");
    std::fs::write(&path, config_toml)?;
    written.push(path);

    if data.report.failed > 0 {
        let path = dir.join("reproductions.http");
        std::fs::write(&path, to_http_file(&data.report.results))?;
        written.push(path);
    }

    Ok(written)
}

fn write_json(
    dir: &Path,
    name: &str,
    value: &impl serde::Serialize,
) -> Result<PathBuf, std::io::Error> {
    let path = dir.join(name);
    let content = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    std::fs::write(&path, content)?;
    Ok(path)
}

fn unix_time() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
