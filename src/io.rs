use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::Writer;
use serde::Serialize;

use crate::table::LoadTable;
use crate::PropLoadError;

pub const OUTPUT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub schema_version: String,
    pub rows: usize,
    pub low_fidelity_formula: String,
    pub noise_seed: Option<u64>,
    pub files: Vec<String>,
}

fn fmt_f64(value: f64) -> String {
    format!("{value:.10}")
}

impl LoadTable {
    /// Header follows [`LoadTable::column_names`], so `load_noise` is only
    /// written once every row has it.
    pub fn write_csv<W: Write>(&self, sink: W) -> Result<(), PropLoadError> {
        let columns = self.columns();
        let mut writer = Writer::from_writer(sink);
        writer.write_record(columns.iter().map(|c| c.name()))?;

        for row in self {
            writer.write_record(
                columns
                    .iter()
                    .map(|&c| row.get(c).map(fmt_f64).unwrap_or_default()),
            )?;
        }

        writer.flush()?;
        Ok(())
    }
}

pub fn ensure_outdir(outdir: &Path) -> Result<(), PropLoadError> {
    fs::create_dir_all(outdir)?;
    Ok(())
}

pub fn write_table_csv(path: &Path, table: &LoadTable) -> Result<(), PropLoadError> {
    let file = fs::File::create(path)?;
    table.write_csv(file)
}

pub fn write_manifest_json(outdir: &Path, manifest: &Manifest) -> Result<PathBuf, PropLoadError> {
    let path = outdir.join("manifest.json");
    let payload = serde_json::to_string_pretty(manifest)?;
    fs::write(&path, payload)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fidelity::lf_data;
    use crate::noise::add_noise_adv_rat;

    #[test]
    fn csv_header_tracks_noise_column() {
        let table = lf_data(&[0.0, 90.0], &[10.0, 10.0], &[100.0, 100.0], 100.0, 50.0).unwrap();

        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("airspeed,discangle,propspeed,load"));
        assert_eq!(lines.next(), Some("10.0000000000,0.0000000000,100.0000000000,50.0000000000"));

        let noisy = add_noise_adv_rat(table, 10.0, 1.6, 1.0);
        let mut buf = Vec::new();
        noisy.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("airspeed,discangle,propspeed,load,load_noise\n"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn empty_noisy_table_keeps_full_header() {
        let empty = lf_data(&[], &[], &[], 100.0, 1.0).unwrap();
        let noisy = add_noise_adv_rat(empty, 0.1, 1.6, 1.0);

        let mut buf = Vec::new();
        noisy.write_csv(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "airspeed,discangle,propspeed,load,load_noise\n"
        );
    }

    #[test]
    fn files_land_in_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let table = lf_data(&[45.0], &[10.0], &[100.0], 100.0, 1.0).unwrap();

        let csv_path = dir.path().join("lf.csv");
        write_table_csv(&csv_path, &table).unwrap();
        assert!(fs::read_to_string(&csv_path).unwrap().contains("load"));

        let manifest = Manifest {
            schema_version: OUTPUT_SCHEMA_VERSION.to_string(),
            rows: table.len(),
            low_fidelity_formula: "bracket".to_string(),
            noise_seed: None,
            files: vec!["lf.csv".to_string()],
        };
        let path = write_manifest_json(dir.path(), &manifest).unwrap();
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["rows"], 1);
        assert!(json["noise_seed"].is_null());
    }
}
