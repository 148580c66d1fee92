//! End-to-end regression fixtures for the five policies.
//!
//! The fault counts here are exact: they pin down victim selection,
//! tie-breaking, and hand movement, not just rough behavior.

use pgsub::{AccessTrace, PageFlags, PageIdx, Policy, SimMemory};

/// The classic reference trace used in Belady's 1969 paper and most OS
/// textbooks since.
const BELADY: [u32; 20] = [7, 0, 1, 2, 0, 3, 0, 4, 2, 3, 0, 3, 2, 1, 2, 0, 1, 7, 0, 1];

/// The trace exhibiting Belady's anomaly under FIFO.
const ANOMALY: [u32; 12] = [3, 2, 1, 0, 3, 2, 4, 3, 2, 1, 0, 4];

fn read_trace(vpns: &[u32]) -> AccessTrace {
    vpns.iter()
        .map(|&v| (PageIdx::new(v), PageFlags::READ))
        .collect()
}

fn faults(mut policy: Policy<SimMemory>, trace: &AccessTrace) -> u64 {
    policy.run_trace(trace).unwrap();
    policy.memory().stats().total()
}

#[test]
fn test_belady_trace_opt() {
    let trace = read_trace(&BELADY);
    let policy = Policy::opt(SimMemory::new(3), 10, trace.clone());
    assert_eq!(faults(policy, &trace), 9);
}

#[test]
fn test_belady_trace_fifo() {
    let trace = read_trace(&BELADY);
    assert_eq!(faults(Policy::fifo(SimMemory::new(3)), &trace), 15);
}

#[test]
fn test_belady_trace_lru() {
    let trace = read_trace(&BELADY);
    assert_eq!(faults(Policy::lru(SimMemory::new(3)), &trace), 12);
}

#[test]
fn test_belady_trace_clock_variants_between_fifo_and_lru() {
    let trace = read_trace(&BELADY);

    let clock = faults(Policy::clock(SimMemory::new(3)), &trace);
    let nru = faults(Policy::nru_clock(SimMemory::new(3)), &trace);

    assert_eq!(clock, 14);
    assert_eq!(nru, 14);
    for count in [clock, nru] {
        assert!((12..=15).contains(&count));
    }
}

#[test]
fn test_fifo_belady_anomaly() {
    // More frames, more faults: 9 at 3 frames, 10 at 4.
    let trace = read_trace(&ANOMALY);

    let three = faults(Policy::fifo(SimMemory::new(3)), &trace);
    let four = faults(Policy::fifo(SimMemory::new(4)), &trace);

    assert_eq!(three, 9);
    assert_eq!(four, 10);
    assert!(four > three);
}

#[test]
fn test_opt_is_optimal_on_reference_traces() {
    for (vpns, frames) in [
        (&BELADY[..], 3),
        (&ANOMALY[..], 3),
        (&ANOMALY[..], 4),
        (&[1, 8, 1, 7, 8, 2, 7, 2, 1, 8, 3, 8, 2, 1, 3, 1, 7, 1, 3, 7][..], 4),
    ] {
        let trace = read_trace(vpns);
        let opt = faults(Policy::opt(SimMemory::new(frames), 10, trace.clone()), &trace);
        for other in [
            Policy::fifo(SimMemory::new(frames)),
            Policy::lru(SimMemory::new(frames)),
            Policy::clock(SimMemory::new(frames)),
            Policy::nru_clock(SimMemory::new(frames)),
        ] {
            assert!(opt <= faults(other, &trace));
        }
    }
}

#[test]
fn test_nru_avoids_write_back_clock_incurs() {
    let trace: AccessTrace = [
        (3, PageFlags::WRITE),
        (3, PageFlags::READ),
        (2, PageFlags::READ),
        (3, PageFlags::READ),
        (0, PageFlags::READ),
        (3, PageFlags::READ),
        (0, PageFlags::READ),
        (4, PageFlags::WRITE),
    ]
    .iter()
    .map(|&(v, f)| (PageIdx::new(v), f))
    .collect();

    let mut clock = Policy::clock(SimMemory::new(2));
    clock.run_trace(&trace).unwrap();
    assert_eq!(clock.memory().stats().total(), 5);
    assert_eq!(clock.memory().stats().write_backs, 1);

    let mut nru = Policy::nru_clock(SimMemory::new(2));
    nru.run_trace(&trace).unwrap();
    assert_eq!(nru.memory().stats().total(), 4);
    assert_eq!(nru.memory().stats().write_backs, 0);
}

#[test]
fn test_resident_count_never_exceeds_frames() {
    let trace = read_trace(&BELADY);
    for frames in 1..=5 {
        for mut policy in [
            Policy::fifo(SimMemory::new(frames)),
            Policy::lru(SimMemory::new(frames)),
            Policy::clock(SimMemory::new(frames)),
            Policy::nru_clock(SimMemory::new(frames)),
            Policy::opt(SimMemory::new(frames), 10, trace.clone()),
        ] {
            for &(vpn, rights) in &trace {
                policy.access(vpn, rights).unwrap();
                assert!(policy.memory().resident_count() <= frames);
            }
        }
    }
}

#[test]
fn test_fault_kind_breakdown() {
    // Mixed rights over a single frame: every access faults, classified
    // write before read before exec.
    let trace: AccessTrace = vec![
        (PageIdx::new(0), PageFlags::READ),
        (PageIdx::new(1), PageFlags::RW),
        (PageIdx::new(2), PageFlags::EXEC),
        (PageIdx::new(3), PageFlags::RX),
    ];

    let mut policy = Policy::fifo(SimMemory::new(1));
    policy.run_trace(&trace).unwrap();

    let stats = policy.memory().stats();
    assert_eq!(stats.read_faults, 2); // READ and RX
    assert_eq!(stats.write_faults, 1); // RW
    assert_eq!(stats.exec_faults, 1); // EXEC alone
    assert_eq!(stats.total(), 4);
}

#[test]
fn test_final_page_table_dump_shape() {
    let trace = read_trace(&[0, 1, 2]);
    let mut policy = Policy::fifo(SimMemory::new(2));
    policy.run_trace(&trace).unwrap();

    let dump = policy.memory().dump_page_table();
    // All three pages appear, in ascending VPN order, evicted one included.
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines[0], "|VPN|PPN|Flags|");
    assert_eq!(lines[1], "|-|-|-|");
    assert!(lines[2].starts_with("|0|"));
    assert!(lines[3].starts_with("|1|"));
    assert!(lines[4].starts_with("|2|"));
}
