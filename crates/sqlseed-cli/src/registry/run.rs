use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use sqlseed_core::{Row, TableSchema};
use sqlseed_generate::output::write_rows_csv;
use sqlseed_generate::{GenerateOptions, SessionReport};

use super::{RegistryError, RegistryResult};

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub schema_version: String,
    pub backend: String,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub rows: u64,
    pub run_dir: PathBuf,
    pub options: GenerateOptions,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig<'a> {
    pub run_id: &'a str,
    pub started_at: String,
    pub schema_version: &'a str,
    pub backend: &'a str,
    pub endpoint: Option<&'a str>,
    pub model: Option<&'a str>,
    pub rows: u64,
    pub options: &'a GenerateOptions,
    pub git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub schema_path: PathBuf,
    pub dataset_path: PathBuf,
    pub report_path: PathBuf,
    pub logs_path: PathBuf,
}

impl RunPaths {
    fn under(root: PathBuf) -> Self {
        Self {
            schema_path: root.join("schema.json"),
            dataset_path: root.join("dataset.csv"),
            report_path: root.join("report.json"),
            logs_path: root.join("logs.ndjson"),
            root,
        }
    }
}

/// Create `<run_dir>/<timestamp>__run_<id>/` with `config.json` and an empty
/// log file.
pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let paths = RunPaths::under(ctx.run_dir.join(format!("{timestamp}__run_{}", ctx.run_id)));

    create_dir_all(&paths.root)?;

    let config = RunConfig {
        run_id: &ctx.run_id,
        started_at: ctx.started_at.to_rfc3339(),
        schema_version: &ctx.schema_version,
        backend: &ctx.backend,
        endpoint: ctx.endpoint.as_deref(),
        model: ctx.model.as_deref(),
        rows: ctx.rows,
        options: &ctx.options,
        git: collect_git_info(),
    };
    write_json(&paths.root.join("config.json"), &config)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.logs_path)?;

    Ok(paths)
}

pub fn write_schema(paths: &RunPaths, schema: &TableSchema) -> RegistryResult<()> {
    write_json(&paths.schema_path, schema)
}

/// Write `dataset.csv` and, when `out_path` is set, a copy there.
/// Returns the size of the dataset in bytes.
pub fn write_dataset(
    paths: &RunPaths,
    schema: &TableSchema,
    rows: &[Row],
    out_path: Option<&Path>,
) -> RegistryResult<u64> {
    let bytes = write_rows_csv(&paths.dataset_path, schema, rows)?;

    if let Some(out_path) = out_path {
        if let Some(parent) = out_path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        std::fs::copy(&paths.dataset_path, out_path)?;
    }

    Ok(bytes)
}

pub fn write_report(paths: &RunPaths, report: &SessionReport) -> RegistryResult<()> {
    write_json(&paths.report_path, report)
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, value).map_err(RegistryError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlseed_core::{ColumnDescriptor, Value};
    use sqlseed_generate::SessionState;

    fn temp_run_dir() -> PathBuf {
        std::env::temp_dir().join(format!("sqlseed-registry-{}", uuid::Uuid::new_v4()))
    }

    fn schema() -> TableSchema {
        TableSchema {
            name: "t".to_string(),
            columns: vec![
                ColumnDescriptor {
                    ordinal_position: 0,
                    name: "id".to_string(),
                    declared_type: "INTEGER".to_string(),
                    is_primary_key: true,
                    is_not_null: false,
                    default: None,
                },
                ColumnDescriptor {
                    ordinal_position: 1,
                    name: "name".to_string(),
                    declared_type: "TEXT".to_string(),
                    is_primary_key: false,
                    is_not_null: false,
                    default: None,
                },
            ],
        }
    }

    #[test]
    fn run_directory_holds_every_artifact() {
        let run_dir = temp_run_dir();
        let started_at = Utc::now();
        let ctx = RunContext {
            run_id: "abc".to_string(),
            started_at,
            schema_version: sqlseed_core::SCHEMA_VERSION.to_string(),
            backend: "scripted".to_string(),
            endpoint: None,
            model: None,
            rows: 1,
            run_dir: run_dir.clone(),
            options: GenerateOptions::default(),
        };

        let paths = start_run(&ctx).expect("start run");
        let expected_name = format!("{}__run_abc", started_at.format("%Y-%m-%dT%H-%M-%SZ"));
        assert_eq!(paths.root, run_dir.join(expected_name));
        assert!(paths.root.join("config.json").exists());
        assert!(paths.logs_path.exists());

        let schema = schema();
        let mut row = Row::new();
        row.insert("id", Value::Int(1));
        row.insert("name", Value::Text("Bob".to_string()));

        write_schema(&paths, &schema).expect("schema");
        let out = run_dir.join("copy").join("out.csv");
        let bytes = write_dataset(&paths, &schema, &[row], Some(&out)).expect("dataset");
        let mut report = SessionReport::new("abc".to_string(), "t".to_string(), 1);
        report.state = SessionState::Completed;
        report.rows_generated = 1;
        write_report(&paths, &report).expect("report");

        let csv = std::fs::read_to_string(&paths.dataset_path).expect("read csv");
        assert_eq!(csv, "id,name\n1,Bob\n");
        assert_eq!(bytes, csv.len() as u64);
        assert_eq!(std::fs::read_to_string(&out).expect("read copy"), csv);

        let report_json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&paths.report_path).expect("read report"))
                .expect("parse report");
        assert_eq!(report_json["state"], "completed");
        assert_eq!(report_json["rows_generated"], 1);

        let config_json: serde_json::Value = serde_json::from_slice(
            &std::fs::read(paths.root.join("config.json")).expect("read config"),
        )
        .expect("parse config");
        assert_eq!(config_json["run_id"], "abc");
        assert_eq!(config_json["options"]["max_attempts"], 5);
        assert_eq!(config_json["options"]["on_exhausted"], "fail");

        let _ = std::fs::remove_dir_all(&run_dir);
    }
}
