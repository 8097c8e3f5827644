/// Resident set size in MiB, from the VmRSS line of /proc/self/status
/// (kernel reports it in KiB, independent of page size). Returns None
/// off Linux or when the proc file is unavailable.
pub fn rss_mb() -> Option<f64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb: f64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb / 1024.0)
}
