//! System resource detection
//!
//! Reports CPU count and total RAM so the launcher can print a useful
//! summary before starting the server.

/// Basic host facts
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub cpu_count: usize,
    pub ram_total_gb: u64,
}

/// Default RAM guess when detection is unavailable on this platform.
const DEFAULT_RAM_GB: u64 = 16;

/// Detect CPU count and total RAM (best effort).
pub fn system_info() -> SystemInfo {
    let cpu_count = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);

    SystemInfo {
        cpu_count,
        ram_total_gb: detect_ram_total_gb().unwrap_or(DEFAULT_RAM_GB),
    }
}

#[cfg(target_os = "linux")]
fn detect_ram_total_gb() -> Option<u64> {
    let meminfo = std::fs::read_to_string("/proc/meminfo").ok()?;
    parse_meminfo_total_kb(&meminfo).map(|kb| kb / 1024 / 1024)
}

/// Extract the MemTotal value (in kB) from /proc/meminfo content.
#[cfg(any(target_os = "linux", test))]
fn parse_meminfo_total_kb(meminfo: &str) -> Option<u64> {
    for line in meminfo.lines() {
        // "MemTotal:       65536000 kB"
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            let value = rest.trim().split_whitespace().next()?;
            return value.parse::<u64>().ok();
        }
    }
    None
}

#[cfg(target_os = "macos")]
fn detect_ram_total_gb() -> Option<u64> {
    let output = std::process::Command::new("sysctl")
        .args(["-n", "hw.memsize"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let bytes_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let bytes = bytes_str.parse::<u64>().ok()?;
    Some(bytes / 1024 / 1024 / 1024)
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn detect_ram_total_gb() -> Option<u64> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meminfo() {
        let meminfo = "MemTotal:       65536000 kB\nMemFree:        12345678 kB\n";
        assert_eq!(parse_meminfo_total_kb(meminfo), Some(65_536_000));
    }

    #[test]
    fn test_parse_meminfo_missing_total() {
        assert_eq!(parse_meminfo_total_kb("MemFree: 1 kB\n"), None);
        assert_eq!(parse_meminfo_total_kb(""), None);
    }

    #[test]
    fn test_system_info_has_sane_defaults() {
        let info = system_info();
        assert!(info.cpu_count >= 1);
        assert!(info.ram_total_gb >= 1);
    }
}
