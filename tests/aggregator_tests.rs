use cmake_trace_stat::aggregator::{
    build_call_tree, calculate_duration_distribution, calculate_hot_traces, NestingMode,
};
use cmake_trace_stat::parser::{SnapshotEntry, TraceEvent};
use pretty_assertions::assert_eq;

fn sample_entries() -> Vec<SnapshotEntry> {
    let events = vec![
        TraceEvent::new(0.0, "CMakeLists.txt", 1, "project(\"demo\")").with_nesting(1),
        TraceEvent::new(1.0, "CMakeLists.txt", 2, "include(\"Deps\")").with_nesting(1),
        TraceEvent::new(2.0, "cmake/Deps.cmake", 1, "find_package(\"ZLIB\")").with_nesting(2),
        TraceEvent::new(2.5, "cmake/Deps.cmake", 2, "if(\"ZLIB_FOUND\")").with_nesting(2),
        TraceEvent::new(3.0, "cmake/Deps.cmake", 3, "message(\"zlib\")").with_nesting(3),
        TraceEvent::new(5.0, "CMakeLists.txt", 3, "add_executable(\"demo\")").with_nesting(1),
        TraceEvent::new(7.0, "CMakeLists.txt", 4, "install()").with_nesting(1),
    ];
    build_call_tree(events, NestingMode::Declared)
        .unwrap()
        .to_entries()
}

#[test]
fn test_hot_traces_ranked_by_duration() {
    let entries = sample_entries();
    let total: f64 = entries.iter().map(|e| e.trace.duration).sum();

    let hot = calculate_hot_traces(&entries, total, 2);

    assert_eq!(hot.len(), 2);
    assert_eq!(hot[0].code, "include(\"Deps\")");
    assert_eq!(hot[0].duration, 4.0);
    assert_eq!(hot[1].code, "add_executable(\"demo\")");
    assert_eq!(hot[1].duration, 2.0);
    assert!((hot[0].percentage - 4.0 / total * 100.0).abs() < 1e-9);
}

#[test]
fn test_hot_traces_with_zero_total() {
    let entries = sample_entries();
    let hot = calculate_hot_traces(&entries, 0.0, 10);

    assert_eq!(hot.len(), entries.len());
    assert!(hot.iter().all(|h| h.percentage == 0.0));
}

#[test]
fn test_duration_distribution() {
    let distribution = calculate_duration_distribution(&sample_entries());

    assert_eq!(distribution.trace_count, 4);
    assert_eq!(distribution.call_count, 7);
    assert_eq!(distribution.max_depth, 3);
    assert!((distribution.total_duration - 7.000001).abs() < 1e-9);
    // durations sorted: 0.000001, 1.0, 2.0, 4.0
    assert_eq!(distribution.median_duration, 2.0);
    assert!(distribution.summary().contains("Traces: 4"));
}

#[test]
fn test_empty_distribution() {
    let distribution = calculate_duration_distribution(&[]);

    assert_eq!(distribution.trace_count, 0);
    assert_eq!(distribution.call_count, 0);
    assert_eq!(distribution.total_duration, 0.0);
    assert!(calculate_hot_traces(&[], 0.0, 3).is_empty());
}
