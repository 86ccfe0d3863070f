//! Serialization of digest tables and sweep plans.

use crate::digest::DigestRow;
use crate::invoke::serialize_config;
use crate::merge::SweepPoint;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_yaml::{Mapping, Value};
use std::io::Write;
use std::path::Path;
use sweep_common::{Error, Result, DIGEST_COLUMNS};

/// Output format for the digest table and plan listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Header-labeled CSV.
    #[default]
    Csv,
    /// JSON array of objects.
    Json,
}

/// Column names: dimensions in declaration order, then the fixed digest columns.
///
/// The first row's descriptor decides the dimension columns; `dimensions`
/// is used when there are no rows.
pub fn digest_header(rows: &[DigestRow], dimensions: &[&str]) -> Vec<String> {
    let mut header: Vec<String> = match rows.first() {
        Some(row) => row.descriptor.dimensions().map(str::to_string).collect(),
        None => dimensions.iter().map(|d| d.to_string()).collect(),
    };
    header.extend(DIGEST_COLUMNS.iter().map(|c| c.to_string()));
    header
}

impl DigestRow {
    /// Cell values in [`digest_header`] order. An absent close time is empty.
    ///
    /// Floats always carry a fractional part (`2.0`, not `2`).
    pub fn cells(&self) -> Vec<String> {
        let mut cells: Vec<String> = self.descriptor.iter().map(|(_, v)| v.to_string()).collect();
        cells.push(self.name.clone());
        cells.push(format!("{:?}", self.avg_byte_throughput));
        cells.push(self.max_arena_size.to_string());
        cells.push(self.max_in_use_size.to_string());
        cells.push(self.max_mmap_size.to_string());
        cells.push(
            self.close_time
                .map(|t| format!("{t:?}"))
                .unwrap_or_default(),
        );
        cells
    }
}

impl Serialize for DigestRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.descriptor.len() + DIGEST_COLUMNS.len()))?;
        for (dimension, variant) in self.descriptor.iter() {
            map.serialize_entry(dimension, variant)?;
        }
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("avg_byte_throughput", &self.avg_byte_throughput)?;
        map.serialize_entry("max_arena_size", &self.max_arena_size)?;
        map.serialize_entry("max_in_use_size", &self.max_in_use_size)?;
        map.serialize_entry("max_mmap_size", &self.max_mmap_size)?;
        map.serialize_entry("close_time", &self.close_time)?;
        map.end()
    }
}

/// Write the digest table.
pub fn write_digest<W: Write>(
    mut out: W,
    rows: &[DigestRow],
    dimensions: &[&str],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut out);
            writer.write_record(digest_header(rows, dimensions))?;
            for row in rows {
                writer.write_record(row.cells())?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, rows)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Write the digest table to `path`, replacing it atomically.
///
/// The table is staged in a temporary file next to `path` and renamed into
/// place once fully written.
pub fn write_digest_file(
    path: &Path,
    rows: &[DigestRow],
    dimensions: &[&str],
    format: OutputFormat,
) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(parent)?;
    write_digest(staged.as_file_mut(), rows, dimensions, format)?;
    staged.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Write the planned sweep points without running them.
///
/// `Csv` lists each point as a commented YAML document; `Json` writes an array.
pub fn write_plan<W: Write>(mut out: W, points: &[SweepPoint], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            for point in points {
                writeln!(out, "# {}", point.descriptor)?;
                write!(out, "{}", serialize_config(&point.config)?)?;
                writeln!(out, "---")?;
            }
        }
        OutputFormat::Json => {
            let plan: Vec<Value> = points.iter().map(plan_entry).collect();
            serde_json::to_writer_pretty(&mut out, &plan)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn plan_entry(point: &SweepPoint) -> Value {
    let descriptor: Mapping = point
        .descriptor
        .iter()
        .map(|(d, v)| (Value::from(d), Value::from(v)))
        .collect();
    let mut entry = Mapping::new();
    entry.insert("name".into(), point.descriptor.display_name().into());
    entry.insert("descriptor".into(), Value::Mapping(descriptor));
    entry.insert("config".into(), Value::Mapping(point.config.clone()));
    Value::Mapping(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::NameDescriptor;

    fn row(size: &str, mode: &str, close_time: Option<f64>) -> DigestRow {
        let descriptor: NameDescriptor = [("size", size), ("mode", mode)].into_iter().collect();
        DigestRow {
            name: descriptor.display_name(),
            descriptor,
            avg_byte_throughput: 1500.5,
            max_arena_size: 4096,
            max_in_use_size: -12,
            max_mmap_size: 0,
            close_time,
        }
    }

    #[test]
    fn csv_header_and_rows() {
        let rows = vec![row("big", "x", Some(0.25)), row("small", "y", None)];
        let mut buf = Vec::new();
        write_digest(&mut buf, &rows, &["size", "mode"], OutputFormat::Csv).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "size,mode,name,avg_byte_throughput,max_arena_size,max_in_use_size,max_mmap_size,close_time",
                "big,x,size=big-mode=x,1500.5,4096,-12,0,0.25",
                "small,y,size=small-mode=y,1500.5,4096,-12,0,",
            ]
        );
    }

    #[test]
    fn whole_floats_keep_fractional_part() {
        let mut r = row("big", "x", Some(2.0));
        r.avg_byte_throughput = 200_000_000.0;
        let cells = r.cells();
        assert_eq!(cells[3], "200000000.0");
        assert_eq!(cells[7], "2.0");
    }

    #[test]
    fn empty_table_still_has_header() {
        let mut buf = Vec::new();
        write_digest(&mut buf, &[], &["size", "nothing"], OutputFormat::Csv).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec!["size,nothing,name,avg_byte_throughput,max_arena_size,max_in_use_size,max_mmap_size,close_time"]
        );
    }

    #[test]
    fn json_keeps_column_order_and_nulls() {
        let mut buf = Vec::new();
        write_digest(&mut buf, &[row("big", "x", None)], &[], OutputFormat::Json).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let size_at = text.find("\"size\"").unwrap();
        let name_at = text.find("\"name\"").unwrap();
        let close_at = text.find("\"close_time\"").unwrap();
        assert!(size_at < name_at && name_at < close_at);

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["mode"], "x");
        assert!(parsed[0]["close_time"].is_null());
        assert_eq!(parsed[0]["max_in_use_size"], -12);
    }

    #[test]
    fn file_output_replaces_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digest.csv");
        std::fs::write(&path, "stale").unwrap();
        write_digest_file(&path, &[row("big", "x", None)], &[], OutputFormat::Csv).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("size,mode,name,"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn plan_listing_names_every_point() {
        let points = vec![SweepPoint {
            descriptor: [("mode", "x")].into_iter().collect(),
            config: serde_yaml::from_str("flag: true").unwrap(),
        }];
        let mut buf = Vec::new();
        write_plan(&mut buf, &points, OutputFormat::Csv).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "# mode=x\nflag: true\n---\n");

        let mut buf = Vec::new();
        write_plan(&mut buf, &points, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed[0]["name"], "mode=x");
        assert_eq!(parsed[0]["descriptor"]["mode"], "x");
        assert_eq!(parsed[0]["config"]["flag"], true);
    }
}
