use std::path::PathBuf;

use crate::locations::{LocationCache, LocationTable};
use crate::reshape::AlignedSet;
use crate::schema::v1::RunReportV1;
use crate::store::ObjectStore;
use crate::table::TimeSeriesTable;
use crate::tensor::Tensor;

/// Object-store keys for the four input blobs.
#[derive(Debug, Clone)]
pub struct BlobKeys {
    pub predict_net: String,
    pub predict_ambient: String,
    pub label: String,
    pub time: String,
}

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
    pub locations_csv_path: PathBuf,
    pub location_map_csv_path: PathBuf,
}

/// Mutable run context threaded through the pipeline stages: fixed
/// configuration up front, intermediates filled in as stages run.
#[derive(Debug)]
pub struct Ctx {
    pub store: Box<dyn ObjectStore>,
    pub bucket: String,
    pub keys: BlobKeys,
    pub locations_path: PathBuf,
    pub pred_len: usize,
    pub write_json: bool,
    /// Derived location artifacts (locations.csv, location_map.csv)
    /// are skipped in validate runs.
    pub write_location_artifacts: bool,
    pub location_cache: LocationCache,
    pub locations: Option<LocationTable>,
    pub predict_net: Option<Tensor>,
    pub predict_ambient: Option<Tensor>,
    pub label: Option<Tensor>,
    pub time: Option<Vec<i64>>,
    pub aligned: Option<AlignedSet>,
    pub table: Option<TimeSeriesTable>,
    pub warnings: Vec<String>,
    pub output: OutputPaths,
    pub report: RunReportV1,
}

impl Ctx {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Box<dyn ObjectStore>,
        bucket: String,
        keys: BlobKeys,
        locations_path: PathBuf,
        out_dir: PathBuf,
        pred_len: usize,
        write_json: bool,
        tool_version: &str,
    ) -> Self {
        let csv_path = out_dir.join("time_series_data.csv");
        let json_path = out_dir.join("run_report.json");
        let locations_csv_path = out_dir.join("locations.csv");
        let location_map_csv_path = out_dir.join("location_map.csv");
        let report = RunReportV1::empty(tool_version, &bucket, pred_len);
        Self {
            store,
            bucket,
            keys,
            locations_path,
            pred_len,
            write_json,
            write_location_artifacts: true,
            location_cache: LocationCache::default(),
            locations: None,
            predict_net: None,
            predict_ambient: None,
            label: None,
            time: None,
            aligned: None,
            table: None,
            warnings: Vec::new(),
            output: OutputPaths {
                out_dir,
                csv_path,
                json_path,
                locations_csv_path,
                location_map_csv_path,
            },
            report,
        }
    }
}
