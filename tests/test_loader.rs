use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use fronthaul_capacity::domain::aligner::align_cells;
use fronthaul_capacity::domain::config::AlignerConfig;
use fronthaul_capacity::domain::optimizer::OptimizationResult;
use fronthaul_capacity::domain::series::CellSeries;
use fronthaul_capacity::domain::topology::LinkTopology;
use fronthaul_capacity::domain::utils::id::{CellId, LinkId};
use fronthaul_capacity::error::Error;
use fronthaul_capacity::load_config;
use fronthaul_capacity::loader::aligned_table::{aligned_file_name, load_aligned_dir, read_aligned_series, write_aligned_series};
use fronthaul_capacity::loader::topology_table::{capacity_report_rows, read_topology_table, write_capacity_report};
use fronthaul_capacity::loader::trace_reader::{CellTraceFiles, read_cell_traces, read_packet_trace, read_throughput_trace, scan_log_dir};

use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("failed to write fixture");
}

#[test]
fn test_scan_pairs_trace_files_by_cell() {
    let dir = tempdir().unwrap();
    write(dir.path(), "throughput-cell-1.dat", "0.0 10\n");
    write(dir.path(), "pkt-stats-cell-1.dat", "0.0 5 5 0\n");
    write(dir.path(), "throughput-cell-12.dat", "0.0 10\n");
    write(dir.path(), "pkt-stats-cell-12.dat", "0.0 5 5 0\n");
    write(dir.path(), "throughput-cell-3.dat", "0.0 10\n");
    write(dir.path(), "pkt-stats-cell-4.dat", "0.0 5 5 0\n");
    write(dir.path(), "notes.txt", "not a trace\n");

    let cells = scan_log_dir(dir.path()).unwrap();

    let ids: Vec<&str> = cells.keys().map(CellId::as_str).collect();
    assert_eq!(ids, vec!["1", "12"], "Only complete pairs are returned");
    assert_eq!(cells[&CellId::new("12")].packets, dir.path().join("pkt-stats-cell-12.dat"));
}

#[test]
fn test_trace_reader_ignores_comments_and_blank_lines() {
    let dir = tempdir().unwrap();
    write(dir.path(), "thr.dat", "<header line>\n0.10 12.5\n\n0.20 13.0 <annotated\n");
    write(dir.path(), "pkt.dat", "<time tx rx late>\n0.15 10 8 1\n");

    let throughput = read_throughput_trace(dir.path().join("thr.dat")).unwrap();
    let packets = read_packet_trace(dir.path().join("pkt.dat")).unwrap();

    assert_eq!(throughput.len(), 2);
    assert_eq!(throughput[1].timestamp, 0.20);
    assert_eq!(throughput[1].kbits, 13.0);
    assert_eq!(packets.len(), 1);
    assert_eq!(packets[0].too_late, 1.0);
}

#[test]
fn test_malformed_trace_reports_line() {
    let dir = tempdir().unwrap();
    write(dir.path(), "thr.dat", "0.1 10\n0.2 abc\n");
    write(dir.path(), "pkt.dat", "0.1 10 8\n");

    let bad_value = read_throughput_trace(dir.path().join("thr.dat"));
    let bad_columns = read_packet_trace(dir.path().join("pkt.dat"));

    assert!(matches!(bad_value, Err(Error::MalformedTrace { line: 2, .. })), "got {:?}", bad_value);
    assert!(matches!(bad_columns, Err(Error::MalformedTrace { line: 1, .. })), "got {:?}", bad_columns);
}

#[test]
fn test_non_finite_trace_value_is_malformed() {
    let dir = tempdir().unwrap();
    write(dir.path(), "thr.dat", "0.1 10\nnan 20\n");
    write(dir.path(), "pkt.dat", "0.1 10 8 inf\n");

    let throughput = read_throughput_trace(dir.path().join("thr.dat"));
    let packets = read_packet_trace(dir.path().join("pkt.dat"));

    assert!(matches!(throughput, Err(Error::MalformedTrace { line: 2, .. })), "got {:?}", throughput);
    assert!(matches!(packets, Err(Error::MalformedTrace { line: 1, .. })), "got {:?}", packets);
}

#[test]
fn test_bad_trace_value_skips_only_that_cell() {
    let dir = tempdir().unwrap();
    write(dir.path(), "throughput-cell-1.dat", "0.0 10\nnan 20\n0.1 30\n");
    write(dir.path(), "pkt-stats-cell-1.dat", "0.0 5 5 0\n0.1 5 4 0\n");
    write(dir.path(), "throughput-cell-2.dat", "0.0 10\n0.1 20\n0.2 30\n");
    write(dir.path(), "pkt-stats-cell-2.dat", "0.0 5 5 0\n0.1 5 4 0\n0.2 5 3 1\n");

    let cells = scan_log_dir(dir.path()).unwrap();
    let batch = align_cells(cells.into_iter().map(|(cell, files)| (cell, read_cell_traces(&files))), &AlignerConfig::default());

    assert_eq!(batch.aligned.len(), 1);
    assert_eq!(batch.aligned[0].series.cell(), &CellId::new("2"));
    assert_eq!(batch.skipped.len(), 1);
    assert_eq!(batch.skipped[0].cell, CellId::new("1"));
}

#[test]
fn test_missing_trace_file_is_io_error() {
    let dir = tempdir().unwrap();
    write(dir.path(), "throughput-cell-1.dat", "0.0 10\n");
    let files = CellTraceFiles {
        throughput: dir.path().join("throughput-cell-1.dat"),
        packets: dir.path().join("pkt-stats-cell-1.dat"),
    };

    assert!(matches!(read_cell_traces(&files), Err(Error::IoError(_))));
}

#[test]
fn test_aligned_series_round_trip() {
    let dir = tempdir().unwrap();
    let series = CellSeries::new(CellId::new("7"), vec![0.0, 0.5, 1.0], vec![1.25, 0.0, 3.5], vec![0.0, 2.0, 1.0]).unwrap();

    let path = write_aligned_series(dir.path(), &series).unwrap();
    assert_eq!(path.file_name().unwrap().to_str().unwrap(), aligned_file_name(&CellId::new("7")));
    assert_eq!(aligned_file_name(&CellId::new("7")), "cell_7_aligned.csv");

    let header = fs::read_to_string(&path).unwrap();
    assert!(header.starts_with("timestamp,gbps,packet_loss"));

    let restored = read_aligned_series(&path, CellId::new("7")).unwrap();
    assert_eq!(restored, series);
}

#[test]
fn test_load_aligned_dir_skips_empty_files() {
    let dir = tempdir().unwrap();
    let a = CellSeries::new(CellId::new("2"), vec![0.0, 1.0], vec![1.0, 2.0], vec![0.0, 0.0]).unwrap();
    let b = CellSeries::new(CellId::new("10"), vec![0.0], vec![4.0], vec![1.0]).unwrap();
    write_aligned_series(dir.path(), &a).unwrap();
    write_aligned_series(dir.path(), &b).unwrap();
    write(dir.path(), "cell_5_aligned.csv", "timestamp,gbps,packet_loss\n");
    write(dir.path(), "link_capacity_estimates.csv", "Link_ID,Cells\n1,2\n");

    let data = load_aligned_dir(dir.path()).unwrap();

    let loaded: Vec<&str> = data.series.iter().map(|s| s.cell().as_str()).collect();
    assert_eq!(loaded, vec!["10", "2"], "Series come back ordered by cell id");
    assert_eq!(data.skipped.len(), 1);
    assert_eq!(data.skipped[0].cell, CellId::new("5"));
}

#[test]
fn test_capacity_report_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("link_capacity_estimates.csv");

    let mut topology = LinkTopology::new();
    topology.extend_link(LinkId::new(1), vec![CellId::new("3"), CellId::new("6")]);
    topology.extend_link(LinkId::new(2), vec![CellId::new("1")]);
    topology.ensure_link(LinkId::new(3));

    let mut results = BTreeMap::new();
    results.insert(LinkId::new(1), OptimizationResult::new(4.321, 5.0, true));

    let rows = capacity_report_rows(&topology, &results);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].cells, "3 6");
    assert_eq!(rows[0].capacity_no_buffer_gbps, Some(5.0));
    assert_eq!(rows[0].capacity_with_buffer_gbps, Some(4.32));
    assert_eq!(rows[1].capacity_with_buffer_gbps, None);

    write_capacity_report(&path, &rows).unwrap();
    let restored = read_topology_table(&path).unwrap();

    assert_eq!(restored, topology);
    assert_eq!(restored.cells(LinkId::new(3)), Some(&BTreeSet::new()));
}

#[test]
fn test_topology_table_without_capacity_columns() {
    let dir = tempdir().unwrap();
    write(dir.path(), "report.csv", "Link_ID,Cells\n2,1 4\n1,3\n");

    let topology = read_topology_table(dir.path().join("report.csv")).unwrap();

    assert_eq!(topology.len(), 2);
    let link_two: Vec<&str> = topology.cells(LinkId::new(2)).unwrap().iter().map(CellId::as_str).collect();
    assert_eq!(link_two, vec!["1", "4"]);
}

#[test]
fn test_load_config_overlays_file_on_defaults() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "config.json",
        r#"{
            "topology": { "targetComponents": 2, "anchors": [ { "cellId": "9", "linkId": 4 } ] },
            "financial": { "costPerGbps": 75.0 }
        }"#,
    );

    let config = load_config(Some(dir.path().join("config.json").as_path())).unwrap();

    assert_eq!(config.topology.target_components, 2);
    assert_eq!(config.topology.anchors.len(), 1);
    assert_eq!(config.topology.anchors[0].cell, CellId::new("9"));
    assert_eq!(config.topology.anchors[0].link, LinkId::new(4));
    assert_eq!(config.topology.anchors[0].priority, 0);
    assert_eq!(config.financial.cost_per_gbps, 75.0);
    assert_eq!(config.optimizer.iterations, 15, "Untouched sections keep their defaults");
}

#[test]
fn test_load_config_rejects_invalid_values() {
    let dir = tempdir().unwrap();
    write(dir.path(), "bad.json", r#"{ "topology": { "thresholdLow": 0.9, "thresholdHigh": 0.5 } }"#);
    write(dir.path(), "broken.json", "{ not json");

    let invalid = load_config(Some(dir.path().join("bad.json").as_path()));
    let broken = load_config(Some(dir.path().join("broken.json").as_path()));

    assert!(matches!(invalid, Err(Error::InvalidConfiguration(_))), "got {:?}", invalid);
    assert!(matches!(broken, Err(Error::DeserializationError(_))), "got {:?}", broken);
}

#[test]
fn test_default_config_is_valid() {
    let config = load_config(None).unwrap();

    assert_eq!(config.topology.target_components, 3);
    assert_eq!(config.financial.cost_per_gbps, 50.0);
}
