// Linux-specific reads: /proc/cpuinfo, cpufreq, /sys/class/power_supply.

use super::{POWER_TIME_UNKNOWN, POWER_TIME_UNLIMITED, ProbeError, ProbeResult, RawBattery};
use std::path::{Path, PathBuf};

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub(super) const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

/// First "model name" from /proc/cpuinfo. Preferred over sysinfo, which may report "cpu0".
pub(super) fn read_cpu_model_linux() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/cpuinfo").ok()?;
        content
            .lines()
            .find(|line| line.starts_with("model name"))
            .and_then(|line| line.split_once(':'))
            .map(|(_, name)| name.trim())
            .filter(|name| !name.is_empty() && *name != "cpu0")
            .map(str::to_string)
    }
    #[cfg(not(target_os = "linux"))]
    None
}

/// cpu0's hardware max frequency in MHz (cpufreq reports kHz).
pub(super) fn read_max_frequency_mhz() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        let khz = read_u64(Path::new(
            "/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq",
        ))?;
        (khz > 0).then_some(khz / 1000)
    }
    #[cfg(not(target_os = "linux"))]
    None
}

/// Reads the first system battery under `root` (normally [`POWER_SUPPLY_ROOT`]).
///
/// Returns `Ok(None)` when no battery is present. Peripheral batteries (`scope=Device`) are
/// ignored. Plugged state comes from any online Mains/USB supply, falling back to the battery
/// status when no AC adapter is exposed.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub(super) fn read_battery(root: &Path) -> ProbeResult<Option<RawBattery>> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut supplies: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    supplies.sort();

    let mut battery_dir = None;
    let mut ac_online: Option<bool> = None;
    for dir in supplies {
        match read_trimmed(&dir.join("type")).as_deref() {
            Some("Battery") => {
                if read_trimmed(&dir.join("scope")).as_deref() == Some("Device") {
                    continue;
                }
                if battery_dir.is_none() {
                    battery_dir = Some(dir);
                }
            }
            Some("Mains") | Some("USB") => {
                if let Some(online) = read_u64(&dir.join("online")) {
                    ac_online = Some(ac_online.unwrap_or(false) || online == 1);
                }
            }
            _ => {}
        }
    }

    let Some(dir) = battery_dir else {
        return Ok(None);
    };

    let percent = read_u64(&dir.join("capacity"))
        .map(|c| c as f32)
        .or_else(|| ratio_percent(&dir, "energy_now", "energy_full"))
        .or_else(|| ratio_percent(&dir, "charge_now", "charge_full"))
        .ok_or_else(|| ProbeError::NoData(format!("{}: no capacity", dir.display())))?;

    let status = read_trimmed(&dir.join("status"));
    let plugged = ac_online.unwrap_or_else(|| status.as_deref() != Some("Discharging"));
    let secs_left = if plugged {
        POWER_TIME_UNLIMITED
    } else {
        secs_to_empty(&dir).unwrap_or(POWER_TIME_UNKNOWN)
    };

    Ok(Some(RawBattery {
        percent: percent.clamp(0.0, 100.0),
        plugged,
        secs_left,
    }))
}

/// Remaining energy over current draw. Kernels expose either energy/power (µWh, µW) or
/// charge/current (µAh, µA); both ratios are in hours.
fn secs_to_empty(dir: &Path) -> Option<i64> {
    let (remaining, rate) = match (
        read_u64(&dir.join("energy_now")),
        read_u64(&dir.join("power_now")),
    ) {
        (Some(energy), Some(power)) => (energy, power),
        _ => (
            read_u64(&dir.join("charge_now"))?,
            read_u64(&dir.join("current_now"))?,
        ),
    };
    if rate == 0 {
        return None;
    }
    Some((remaining as f64 / rate as f64 * 3600.0) as i64)
}

fn ratio_percent(dir: &Path, now: &str, full: &str) -> Option<f32> {
    let now = read_u64(&dir.join(now))?;
    let full = read_u64(&dir.join(full))?;
    if full == 0 {
        return None;
    }
    Some((now as f64 / full as f64 * 100.0) as f32)
}

fn read_trimmed(path: &Path) -> Option<String> {
    let v = std::fs::read_to_string(path).ok()?;
    let v = v.trim();
    if v.is_empty() {
        return None;
    }
    Some(v.to_string())
}

fn read_u64(path: &Path) -> Option<u64> {
    read_trimmed(path)?.parse().ok()
}
