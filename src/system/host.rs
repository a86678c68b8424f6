//! Read-only host introspection backed by sysinfo
//!
//! No external calls: OS identity, CPU model, memory, and disk totals all
//! come from the local system tables.

use crate::router::ResponseLocale;
use crate::{AssistantError, Result};
use std::path::Path;
use sysinfo::{Disks, System};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Disk totals with the invariant `used + free == total`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DiskFigures {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

impl DiskFigures {
    pub fn new(total: u64, free: u64) -> Self {
        Self {
            total,
            used: total.saturating_sub(free),
            free: free.min(total),
        }
    }

    /// Used fraction as a percentage, for one-decimal rendering
    pub fn used_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.used as f64 / self.total as f64 * 100.0
        }
    }
}

pub(crate) fn system_info(locale: ResponseLocale) -> String {
    let sys = System::new_all();
    let os_name = System::name().unwrap_or_else(|| "unknown".to_string());
    let os_version = System::os_version().unwrap_or_else(|| "unknown".to_string());
    let host = System::host_name().unwrap_or_else(|| "unknown".to_string());
    let cpu = sys
        .cpus()
        .first()
        .map(|c| c.brand().trim().to_string())
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| "unknown".to_string());
    let ram_gb = sys.total_memory() as f64 / GIB;

    if locale.is_chinese() {
        format!(
            "系統：{os_name} {os_version}，主機名稱：{host}，處理器：{cpu}，記憶體總量：{ram_gb:.2} GB。"
        )
    } else {
        format!("System: {os_name} {os_version}, host {host}, CPU {cpu}, {ram_gb:.2} GB RAM.")
    }
}

pub(crate) fn disk_space(path: &Path, locale: ResponseLocale) -> Result<String> {
    let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let disks = Disks::new_with_refreshed_list();

    // The disk whose mount point is the longest prefix of the volume path
    let mut best: Option<(usize, u64, u64)> = None;
    for disk in disks.list() {
        let mount = disk.mount_point();
        if resolved.starts_with(mount) {
            let depth = mount.as_os_str().len();
            if best.map(|(d, _, _)| depth >= d).unwrap_or(true) {
                best = Some((depth, disk.total_space(), disk.available_space()));
            }
        }
    }
    let (_, total, free) = best.ok_or_else(|| {
        AssistantError::IoError(format!("no disk found for {}", resolved.display()))
    })?;

    Ok(render_disk(DiskFigures::new(total, free), locale))
}

fn render_disk(figures: DiskFigures, locale: ResponseLocale) -> String {
    let total_gb = figures.total as f64 / GIB;
    let used_gb = figures.used as f64 / GIB;
    let free_gb = figures.free as f64 / GIB;
    let percent = figures.used_percent();
    if locale.is_chinese() {
        format!(
            "磁碟總容量 {total_gb:.2} GB，已使用 {used_gb:.2} GB（{percent:.1}%），剩餘 {free_gb:.2} GB。"
        )
    } else {
        format!(
            "Disk capacity {total_gb:.2} GB, {used_gb:.2} GB used ({percent:.1}%), {free_gb:.2} GB free."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_figures_sum_exactly() {
        let figures = DiskFigures::new(1_000_000, 333_333);
        assert_eq!(figures.used + figures.free, figures.total);
        assert_eq!(figures.used, 666_667);
    }

    #[test]
    fn test_disk_figures_survive_degenerate_inputs() {
        let empty = DiskFigures::new(0, 0);
        assert_eq!(empty.used_percent(), 0.0);
        assert_eq!(empty.used + empty.free, empty.total);

        // Free reported above total is clamped rather than underflowing
        let odd = DiskFigures::new(100, 150);
        assert_eq!(odd.used + odd.free, odd.total);
    }

    #[test]
    fn test_percent_renders_to_one_decimal() {
        let figures = DiskFigures::new(1000, 333);
        let text = render_disk(figures, ResponseLocale::En);
        assert!(text.contains("(66.7%)"), "got: {text}");
    }

    #[test]
    fn test_system_info_mentions_memory_and_cpu() {
        let zh = system_info(ResponseLocale::ZhTw);
        assert!(zh.contains("處理器"));
        assert!(zh.contains("GB"));
        let en = system_info(ResponseLocale::En);
        assert!(en.contains("CPU"));
        assert!(en.contains("RAM"));
    }

    #[test]
    fn test_disk_space_for_temp_dir_resolves_or_reports_io_error() {
        // Containers without visible block devices legitimately find no disk
        match disk_space(&std::env::temp_dir(), ResponseLocale::En) {
            Ok(text) => assert!(text.contains("GB")),
            Err(err) => assert!(matches!(err, AssistantError::IoError(_))),
        }
    }
}
