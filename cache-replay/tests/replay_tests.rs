use cache_replay::{compare, read_trace_file, replay, ReplayEvent};
use policy_cache::PolicyKind;
use std::num::NonZeroUsize;
use std::path::PathBuf;

fn reference_trace() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("traces/reference.csv")
}

fn capacity() -> NonZeroUsize {
    NonZeroUsize::new(4).unwrap()
}

#[test]
fn lifo_run_output() {
    let ops = read_trace_file(reference_trace()).unwrap();
    let report = replay(PolicyKind::Lifo, capacity(), &ops);

    let mut out = Vec::new();
    report.write_to(&mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Hello\n\
         DISCARD: D\n\
         None\n\
         World\n\
         DISCARD: C\n\
         DISCARD: F\n\
         None\n\
         Current cache:\n\
         A: Hello\n\
         B: World\n\
         E: Battery\n\
         G: San Francisco\n"
    );
}

#[test]
fn compare_reference_trace() {
    let ops = read_trace_file(reference_trace()).unwrap();
    let reports = compare(capacity(), &ops);
    assert_eq!(reports.len(), 4);

    let expect = [
        (PolicyKind::Fifo, vec!["A", "B", "C"], vec!["D", "E", "F", "G"]),
        (PolicyKind::Lifo, vec!["D", "C", "F"], vec!["A", "B", "E", "G"]),
        (PolicyKind::Mru, vec!["A", "B", "F"], vec!["C", "D", "E", "G"]),
        (PolicyKind::Lru, vec!["B", "D", "A"], vec!["C", "E", "F", "G"]),
    ];

    for (report, (policy, evicted, resident)) in reports.iter().zip(expect) {
        assert_eq!(report.policy, policy);
        assert_eq!(report.evicted().collect::<Vec<_>>(), evicted, "{policy}");
        assert_eq!(report.resident_keys(), resident, "{policy}");
        assert!(report.resident.len() <= capacity().get());
    }
}

#[test]
fn ignored_puts_are_reported() {
    let ops = read_trace_file(reference_trace()).unwrap();
    let report = replay(PolicyKind::Fifo, capacity(), &ops);
    let ignored = report
        .events
        .iter()
        .filter(|e| **e == ReplayEvent::Ignored)
        .count();
    assert_eq!(ignored, 2);
    assert_eq!(report.metrics.get("ignored_puts"), Some(&2.0));
    assert_eq!(report.metrics.get("updates"), Some(&1.0));
}

#[test]
fn summary_line() {
    let ops = read_trace_file(reference_trace()).unwrap();
    let report = replay(PolicyKind::Lru, capacity(), &ops);
    let mut out = Vec::new();
    report.write_summary(&mut out).unwrap();
    let line = String::from_utf8(out).unwrap();
    assert!(line.starts_with("LRU   evicted [B, D, A] resident [C, E, F, G]"));
}
