// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Disk usage abstraction for the cleanup pass's disk-pressure check
//! (`spec.md` §4.7). `sysinfo` isn't part of the teacher's stack, but no
//! workspace crate exposes filesystem free-space stats cross-platform;
//! trait + fake/real split follows the same shape as [`relcore_adapters`].

use crate::error::RetentionError;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskStats {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
}

impl DiskStats {
    pub fn usage_ratio(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            self.used_bytes as f64 / self.total_bytes as f64
        }
    }

    pub fn free_gb(&self) -> f64 {
        self.free_bytes as f64 / 1_000_000_000.0
    }
}

pub trait DiskUsage: Send + Sync + 'static {
    fn usage(&self, path: &Path) -> Result<DiskStats, RetentionError>;
}

/// Reads real disk stats for the filesystem mounted under `path` via
/// `sysinfo`, picking the mount point with the longest matching prefix.
pub struct SysinfoDiskUsage;

impl DiskUsage for SysinfoDiskUsage {
    fn usage(&self, path: &Path) -> Result<DiskStats, RetentionError> {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let disks = sysinfo::Disks::new_with_refreshed_list();
        let disk = disks
            .iter()
            .filter(|d| canonical.starts_with(d.mount_point()))
            .max_by_key(|d| d.mount_point().as_os_str().len())
            .ok_or_else(|| RetentionError::DiskUsage(format!("no mounted disk found for {}", path.display())))?;

        let total_bytes = disk.total_space();
        let free_bytes = disk.available_space();
        Ok(DiskStats { total_bytes, used_bytes: total_bytes.saturating_sub(free_bytes), free_bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_ratio_of_empty_disk_is_zero() {
        let stats = DiskStats { total_bytes: 0, used_bytes: 0, free_bytes: 0 };
        assert_eq!(stats.usage_ratio(), 0.0);
    }

    #[test]
    fn usage_ratio_computes_fraction_used() {
        let stats = DiskStats { total_bytes: 100, used_bytes: 85, free_bytes: 15 };
        assert!((stats.usage_ratio() - 0.85).abs() < f64::EPSILON);
    }
}
