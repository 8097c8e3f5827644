use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensorMeta {
    pub key: String,
    pub shape: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMeta {
    pub bucket: String,
    pub tensors: Vec<TensorMeta>,
    pub time_steps: Option<u64>,
    pub pred_len: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alignment {
    pub min_len: Option<u64>,
    pub locations: Option<u64>,
    pub rows_per_location: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub csv_path: Option<String>,
    pub rows_written: Option<u64>,
    /// False when the run completed but the final write failed; that
    /// failure is reported, not fatal.
    pub persisted: bool,
    pub persist_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReportV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub input_meta: InputMeta,
    pub alignment: Alignment,
    pub output: Output,
    pub warnings: Vec<String>,
}

impl RunReportV1 {
    pub fn empty(tool_version: &str, bucket: &str, pred_len: usize) -> Self {
        Self {
            tool: "smoke-signals".to_string(),
            version: tool_version.to_string(),
            schema_version: "v1".to_string(),
            input_meta: InputMeta {
                bucket: bucket.to_string(),
                tensors: Vec::new(),
                time_steps: None,
                pred_len: pred_len as u64,
            },
            alignment: Alignment {
                min_len: None,
                locations: None,
                rows_per_location: None,
            },
            output: Output {
                csv_path: None,
                rows_written: None,
                persisted: false,
                persist_error: None,
            },
            warnings: Vec::new(),
        }
    }
}
