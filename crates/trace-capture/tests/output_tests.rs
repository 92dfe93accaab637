use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;
use trace_capture::output::{read_report, report_to_string, write_captured_text, write_report};
use trace_capture::parser::{TraceFormat, TraceParser, TraceReport};

fn parse_report(text: &str) -> TraceReport {
    let parser = TraceParser::new(TraceFormat::default()).unwrap();
    let outcome = parser.parse(text).unwrap();
    TraceReport::from_outcome(parser.format(), "test", &outcome)
}

#[test]
fn test_report_file_round_trip_restores_records() {
    let text = "Delta = -85.7\nDelta = [1. -inf nan]\nDelta = 0.107\n";
    let report = parse_report(text);
    let temp_file = NamedTempFile::new().unwrap();

    write_report(&report, temp_file.path()).unwrap();
    let loaded = read_report(temp_file.path()).unwrap();

    let records = loaded.to_records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].value.as_scalar(), Some(-85.7));
    assert_eq!(records[1].value.values()[1], f64::NEG_INFINITY);
    assert!(records[1].value.values()[2].is_nan());
    assert_eq!(records[2].line_number, 3);
    assert_eq!(loaded.format(), TraceFormat::default());
}

#[test]
fn test_report_json_shape() {
    let report = parse_report("Delta = inf\n");
    let json: serde_json::Value = serde_json::from_str(&report_to_string(&report).unwrap()).unwrap();

    assert_eq!(json["version"], "1.0.0");
    assert_eq!(json["record_count"], 1);
    assert_eq!(json["records"][0]["kind"], "scalar");
    assert_eq!(json["records"][0]["values"][0], "inf");
    assert!(json.get("skipped").is_none());
}

#[test]
fn test_write_captured_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw/capture.log");

    write_captured_text("Delta = 1.0\n", &path).unwrap();

    assert_eq!(std::fs::read_to_string(path).unwrap(), "Delta = 1.0\n");
}

#[test]
fn test_read_report_missing_file() {
    assert!(read_report("/definitely/not/here.json").is_err());
}
