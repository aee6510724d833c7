use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sha2::{Digest, Sha256};

pub fn now_utc_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn utc_compact_string(ts: DateTime<Utc>) -> String {
    ts.format("%Y%m%dT%H%M%SZ").to_string()
}

pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

pub fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent),
        _ => Ok(()),
    }
}

pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .with_context(|| format!("failed to open file for hashing: {}", path.display()))?;

    let mut hasher = Sha256::new();
    let mut buf = [0_u8; 8192];

    loop {
        let count = file
            .read(&mut buf)
            .with_context(|| format!("failed to read file for hashing: {}", path.display()))?;
        if count == 0 {
            break;
        }
        hasher.update(&buf[..count]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;

    let data = serde_json::to_vec_pretty(value)
        .with_context(|| format!("failed to serialize json: {}", path.display()))?;

    let mut file = File::create(path)
        .with_context(|| format!("failed to create json file: {}", path.display()))?;
    file.write_all(&data)
        .with_context(|| format!("failed to write json file: {}", path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("failed to finalize json file: {}", path.display()))?;

    Ok(())
}

/// Reads one JSON value per non-blank line. With an `envelope`, each line
/// must be an object and the value under that key is what gets decoded.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path, envelope: Option<&str>) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let mut values = Vec::<T>::new();
    for (line_index, line) in BufReader::new(file).lines().enumerate() {
        let line_number = line_index + 1;
        let line = line
            .with_context(|| format!("failed to read {} line {line_number}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }

        let mut value: Value = serde_json::from_str(&line)
            .with_context(|| format!("invalid json in {} line {line_number}", path.display()))?;
        if let Some(key) = envelope {
            value = value
                .get_mut(key)
                .map(Value::take)
                .with_context(|| {
                    format!("{} line {line_number} has no '{key}' field", path.display())
                })?;
        }

        let decoded = serde_json::from_value(value).with_context(|| {
            format!("unexpected record shape in {} line {line_number}", path.display())
        })?;
        values.push(decoded);
    }

    Ok(values)
}

pub fn write_jsonl<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    ensure_parent(path)?;

    let file = File::create(path)
        .with_context(|| format!("failed to create jsonl file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for (index, record) in records.iter().enumerate() {
        serde_json::to_writer(&mut writer, record)
            .with_context(|| format!("failed to serialize record {index}: {}", path.display()))?;
        writer
            .write_all(b"\n")
            .with_context(|| format!("failed to write jsonl file: {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush jsonl file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn utc_compact_string_has_no_separators() {
        let ts = Utc
            .with_ymd_and_hms(2024, 3, 9, 7, 5, 1)
            .single()
            .expect("timestamp should be unambiguous");
        assert_eq!(utc_compact_string(ts), "20240309T070501Z");
    }

    #[test]
    fn jsonl_round_trips_and_skips_blank_lines() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("nested").join("records.jsonl");
        let records = vec![json!({"a": 1}), json!({"a": 2})];

        write_jsonl(&path, &records).expect("write should succeed");
        let mut raw = fs::read_to_string(&path).expect("file should exist");
        assert_eq!(raw.lines().count(), 2);

        raw.push_str("\n   \n");
        fs::write(&path, raw).expect("rewrite should succeed");
        let read_back: Vec<Value> = read_jsonl(&path, None).expect("read should succeed");
        assert_eq!(read_back, records);
    }

    #[test]
    fn read_jsonl_unwraps_envelope() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("generations.jsonl");
        fs::write(
            &path,
            "{\"item\": {\"analysis_overview\": \"x\"}, \"meta\": 1}\n{\"item\": [1, 2]}\n",
        )
        .expect("fixture should be written");

        let values: Vec<Value> = read_jsonl(&path, Some("item")).expect("read should succeed");
        assert_eq!(values, vec![json!({"analysis_overview": "x"}), json!([1, 2])]);
    }

    #[test]
    fn read_jsonl_reports_failing_line() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("broken.jsonl");
        fs::write(&path, "{\"item\": 1}\n\n{\"other\": 2}\n").expect("fixture should be written");

        let err = read_jsonl::<Value>(&path, Some("item")).expect_err("missing envelope fails");
        assert!(format!("{err:#}").contains("line 3"));

        fs::write(&path, "{\"item\": 1}\nnot json\n").expect("fixture should be written");
        let err = read_jsonl::<Value>(&path, None).expect_err("invalid json fails");
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn sha256_file_matches_known_digest() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("abc.txt");
        fs::write(&path, b"abc").expect("fixture should be written");
        assert_eq!(
            sha256_file(&path).expect("hash should succeed"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
