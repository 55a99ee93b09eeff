// Derivation tests: unit conversion, durations, ranking

use hostdash::derivation::*;
use hostdash::models::ProcessSample;
use hostdash::probe::{
    POWER_TIME_UNKNOWN, POWER_TIME_UNLIMITED, Partition, PartitionUsage, ProcessTable, RawBattery,
    RawMemory, RawProcess,
};
use std::path::PathBuf;

const GIB: u64 = 1024 * 1024 * 1024;

fn sample(pid: u32, cpu_percent: f64) -> ProcessSample {
    ProcessSample {
        pid,
        name: format!("p{pid}"),
        cpu_percent,
        memory_percent: 0.0,
    }
}

#[test]
fn test_uptime_one_hour_one_minute_one_second() {
    let now = 1_700_000_000;
    let secs = uptime_secs(now, now - 3661);
    assert_eq!(secs, 3661);
    assert_eq!(format_duration(secs), "1:01:01");
}

#[test]
fn test_uptime_boot_in_future_clamps_to_zero() {
    let now = 1_700_000_000;
    let secs = uptime_secs(now, now + 500);
    assert_eq!(secs, 0);
    assert_eq!(format_duration(secs), "0:00:00");
}

#[test]
fn test_format_duration_days() {
    assert_eq!(format_duration(86_400), "1 day, 0:00:00");
    assert_eq!(format_duration(2 * 86_400 + 3 * 3_600 + 15 * 60 + 7), "2 days, 3:15:07");
    assert_eq!(format_duration(59), "0:00:59");
}

#[test]
fn test_battery_time_left_sentinels_are_unknown() {
    assert_eq!(battery_time_left(-1), "Unknown");
    assert_eq!(battery_time_left(POWER_TIME_UNKNOWN), "Unknown");
    assert_eq!(battery_time_left(POWER_TIME_UNLIMITED), "Unknown");
    assert_eq!(battery_time_left(5_400), "1:30:00");
}

#[test]
fn test_battery_info_on_ac() {
    let info = battery_info(&RawBattery {
        percent: 99.6,
        plugged: true,
        secs_left: POWER_TIME_UNLIMITED,
    });
    assert!(info.plugged);
    assert_eq!(info.percent, 99.6);
    assert_eq!(info.secs_left, None);
    assert_eq!(info.time_left, "Unknown");
}

#[test]
fn test_battery_info_discharging() {
    let info = battery_info(&RawBattery {
        percent: 42.0,
        plugged: false,
        secs_left: 3_725,
    });
    assert_eq!(info.secs_left, Some(3_725));
    assert_eq!(info.time_left, "1:02:05");
}

#[test]
fn test_binary_and_decimal_bases_differ() {
    assert_eq!(bytes_to_gib(8 * GIB), 8.0);
    assert_eq!(bytes_to_gib(GIB + GIB / 2), 1.5);
    assert_eq!(bytes_to_gib(1_000_000_000), 0.93);
    assert_eq!(bytes_to_gb(1_000_000_000), 1.0);
    assert_eq!(bytes_to_gb(1_500_000_000), 1.5);
    assert_eq!(bytes_to_mb(2_345_678), 2.35);
}

#[test]
fn test_round_half_away_from_zero() {
    assert_eq!(round_to(0.125, 2), 0.13);
    assert_eq!(round_to(-0.125, 2), -0.13);
    assert_eq!(round_to(33.333, 1), 33.3);
}

#[test]
fn test_percent_bounds() {
    assert_eq!(percent(0, 0), 0.0);
    assert_eq!(percent(1, 3), 33.3);
    assert_eq!(percent(5, 4), 100.0);
}

#[test]
fn test_top_n_sorted_descending_and_truncated() {
    let input = vec![sample(1, 3.0), sample(2, 50.0), sample(3, 0.5), sample(4, 20.0)];
    let top = top_n(input, 3);
    let pids: Vec<u32> = top.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![2, 4, 1]);
}

#[test]
fn test_top_n_stable_for_equal_cpu() {
    let input = vec![
        sample(10, 1.0),
        sample(11, 5.0),
        sample(12, 5.0),
        sample(13, 2.0),
        sample(14, 5.0),
    ];
    let top = top_n(input.clone(), 3);
    let pids: Vec<u32> = top.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![11, 12, 14]);
    // Same input again gives the same order.
    assert_eq!(top, top_n(input, 3));
}

#[test]
fn test_top_n_fewer_than_n_returns_all() {
    let top = top_n(vec![sample(1, 1.0), sample(2, 2.0)], 5);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].pid, 2);
    assert!(top_n(vec![sample(1, 1.0)], 0).is_empty());
}

#[test]
fn test_memory_info_invariants() {
    let cases = [
        RawMemory {
            total: 16 * GIB,
            available: 6 * GIB,
            swap_total: 0,
            swap_used: 0,
        },
        RawMemory {
            total: 8 * GIB + 12_345,
            available: 0,
            swap_total: GIB,
            swap_used: GIB,
        },
        // Available over total is reported by some containers; it must not go negative.
        RawMemory {
            total: 4 * GIB,
            available: 5 * GIB,
            swap_total: GIB,
            swap_used: 2 * GIB,
        },
    ];
    for raw in cases {
        let mem = memory_info(&raw);
        assert!(mem.used_gb <= mem.total_gb, "{mem:?}");
        assert!((0.0..=100.0).contains(&mem.percent), "{mem:?}");
        assert!((0.0..=100.0).contains(&mem.swap_percent), "{mem:?}");
    }
    let mem = memory_info(&cases[0]);
    assert_eq!(mem.total_gb, 16.0);
    assert_eq!(mem.used_gb, 10.0);
    assert_eq!(mem.available_gb, 6.0);
    assert_eq!(mem.percent, 62.5);
    assert_eq!(mem.swap_percent, 0.0);
}

#[test]
fn test_disk_info_used_plus_free_matches_total() {
    let partition = Partition {
        device: "/dev/nvme0n1p2".into(),
        mountpoint: PathBuf::from("/"),
        fs_type: "btrfs".into(),
    };
    for (total, available) in [
        (512 * GIB, 100 * GIB + 1),
        (1_000_204_886_016, 333_333_333_333),
        (7 * GIB + 777_777, 3 * GIB + 5),
        (GIB, GIB),
    ] {
        let d = disk_info(&partition, &PartitionUsage { total, available });
        assert!(
            (d.used_gb + d.free_gb - d.total_gb).abs() <= 0.01 + f64::EPSILON,
            "{d:?}"
        );
    }
    let d = disk_info(
        &partition,
        &PartitionUsage {
            total: 100 * GIB,
            available: 25 * GIB,
        },
    );
    assert_eq!(d.mountpoint, "/");
    assert_eq!(d.used_gb, 75.0);
    assert_eq!(d.percent, 75.0);
}

#[test]
fn test_process_samples_memory_share() {
    let table = ProcessTable {
        total_memory: 4 * GIB,
        processes: vec![RawProcess {
            pid: 7,
            name: "db".into(),
            cpu_usage: 150.04,
            memory_bytes: GIB,
        }],
    };
    let samples = process_samples(&table);
    assert_eq!(samples[0].memory_percent, 25.0);
    assert_eq!(samples[0].cpu_percent, 150.0);

    let empty_total = ProcessTable {
        total_memory: 0,
        ..table
    };
    assert_eq!(process_samples(&empty_total)[0].memory_percent, 0.0);
}
