use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::axis::STRING_AXIS_NAME;

use super::model::{AxisInfo, BasicData, DataBlob, RawRecord, RecordValue, ValueType};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a data blob from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `{ "basic_data": {...}, "data_value": [[coords, value], ...] }`
/// * `.csv`  – one record per row, see [`parse_csv`]
pub fn load_file(path: &Path) -> Result<DataBlob> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let blob = match ext.as_str() {
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)
        }
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            parse_csv(file)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "loaded {} records ({}) from {}",
        blob.len(),
        blob.value_type(),
        path.display()
    );
    Ok(blob)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Parse a JSON blob. Individual records of the wrong shape are kept and
/// dropped later by projection; a broken envelope is an error.
pub fn parse_json(text: &str) -> Result<DataBlob> {
    let blob: DataBlob = serde_json::from_str(text).context("parsing JSON blob")?;
    Ok(blob)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names.
///
/// * `Y0`, `Y1`, ... are output columns (at least one),
/// * a column named `String` holds the categorical label,
/// * every other column is an input coordinate, in header order.
///
/// The value type follows from the columns present; axis min/max/interval
/// are derived from the input values.
pub fn parse_csv<R: Read>(input: R) -> Result<DataBlob> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let label_idx = headers.iter().position(|h| h == STRING_AXIS_NAME);
    let output_idx = output_columns(&headers)?;
    let input_idx: Vec<usize> = (0..headers.len())
        .filter(|i| Some(*i) != label_idx && !output_idx.contains(i))
        .collect();

    let value_type = match (label_idx.is_some(), output_idx.len()) {
        (false, 1) => ValueType::Double,
        (false, _) => ValueType::Array,
        (true, 1) => ValueType::StringDouble,
        (true, _) => ValueType::StringArray,
    };

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let number = |col: usize| -> Result<f64> {
            let cell = row.get(col).unwrap_or("").trim();
            cell.parse::<f64>().with_context(|| {
                format!("Row {row_no}, column '{}': '{cell}' is not a number", headers[col])
            })
        };

        let coords = input_idx.iter().map(|&c| number(c)).collect::<Result<Vec<_>>>()?;
        let outputs = output_idx.iter().map(|&c| number(c)).collect::<Result<Vec<_>>>()?;
        let label = label_idx.map(|c| row.get(c).unwrap_or("").to_string());

        let value = match (label, value_type) {
            (None, ValueType::Double) => RecordValue::Double(outputs[0]),
            (None, _) => RecordValue::Array(outputs),
            (Some(s), ValueType::StringDouble) => RecordValue::StringDouble(s, outputs[0]),
            (Some(s), _) => RecordValue::StringArray(s, outputs),
        };
        records.push(RawRecord::new(coords, value));
    }

    let axes = input_idx
        .iter()
        .enumerate()
        .map(|(slot, &col)| {
            let values: Vec<f64> = records.iter().map(|r| r.coords[slot]).collect();
            derive_axis_info(&headers[col], &values)
        })
        .collect();

    Ok(DataBlob {
        basic_data: BasicData { axes, value_type },
        data_value: records,
    })
}

/// Column indices of `Y0..Y{m-1}`, in output order.
fn output_columns(headers: &[String]) -> Result<Vec<usize>> {
    let mut outputs: Vec<(usize, usize)> = headers
        .iter()
        .enumerate()
        .filter_map(|(col, h)| {
            let slot = h.strip_prefix('Y')?.parse::<usize>().ok()?;
            Some((slot, col))
        })
        .collect();
    if outputs.is_empty() {
        bail!("CSV has no output columns (expected Y0, Y1, ...)");
    }
    outputs.sort_unstable();
    for (expected, (slot, _)) in outputs.iter().enumerate() {
        if *slot != expected {
            bail!("CSV output columns must be Y0..Y{}, missing Y{expected}", outputs.len() - 1);
        }
    }
    Ok(outputs.into_iter().map(|(_, col)| col).collect())
}

/// Observed min/max of an input column; the interval is the smallest gap
/// between distinct values (1 when there is none).
fn derive_axis_info(name: &str, values: &[f64]) -> AxisInfo {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();

    let interval = sorted
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|gap| *gap > 0.0)
        .fold(None, |acc: Option<f64>, gap| Some(acc.map_or(gap, |a| a.min(gap))))
        .unwrap_or(1.0);

    AxisInfo {
        name: name.to_string(),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
        interval: Some(interval),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_blob() {
        let blob = parse_json(
            r#"{
                "basic_data": { "axes": [{"name": "t"}], "value_type": "string_double" },
                "data_value": [[[0], ["a", 1]], [[1], ["b", 2]]]
            }"#,
        )
        .unwrap();
        assert_eq!(blob.value_type(), ValueType::StringDouble);
        assert_eq!(blob.len(), 2);
        assert_eq!(blob.records()[1].value.label(), Some("b"));
        assert_eq!(blob.axis_info("t").unwrap().min, None);
    }

    #[test]
    fn test_parse_json_rejects_broken_envelope() {
        assert!(parse_json(r#"{"data_value": []}"#).is_err());
        assert!(parse_json("not json").is_err());
    }

    #[test]
    fn test_parse_csv_numeric() {
        let text = "t,Y0\n0,1\n2,4\n1,9\n";
        let blob = parse_csv(text.as_bytes()).unwrap();
        assert_eq!(blob.value_type(), ValueType::Double);
        assert_eq!(blob.records()[1], RawRecord::new(vec![2.0], RecordValue::Double(4.0)));

        let t = blob.axis_info("t").unwrap();
        assert_eq!((t.min, t.max, t.interval), (Some(0.0), Some(2.0), Some(1.0)));
    }

    #[test]
    fn test_parse_csv_with_label_and_outputs() {
        let text = "Y1,x,String,Y0\n5,0.5,a,1\n6,0,b,2\n7,0,c,3\n";
        let blob = parse_csv(text.as_bytes()).unwrap();
        assert_eq!(blob.value_type(), ValueType::StringArray);
        assert_eq!(blob.declared_names(), vec!["x".to_string()]);
        assert_eq!(
            blob.records()[0],
            RawRecord::new(vec![0.5], RecordValue::StringArray("a".into(), vec![1.0, 5.0]))
        );
        assert_eq!(blob.axis_info("x").unwrap().interval, Some(0.5));
    }

    #[test]
    fn test_parse_csv_errors() {
        assert!(parse_csv("a,b\n1,2\n".as_bytes()).is_err());
        assert!(parse_csv("a,Y1\n1,2\n".as_bytes()).is_err());
        let err = parse_csv("a,Y0\n1,oops\n".as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("oops"));
    }

    #[test]
    fn test_single_value_axis_interval_defaults_to_one() {
        let info = derive_axis_info("c", &[3.0, 3.0]);
        assert_eq!((info.min, info.max, info.interval), (Some(3.0), Some(3.0), Some(1.0)));
    }
}
