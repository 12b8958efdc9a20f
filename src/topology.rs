//! Best-effort CPU topology detection.
//!
//! Core records feed the multi-core worker-count decision and nothing
//! else; every failure path degrades to a usable default instead of
//! surfacing an error. Results are cached for the process lifetime: the
//! topology cannot change under a running benchmark in any way we could
//! meaningfully react to.

use crate::error::TopologyError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;

/// Cores clocking above 2.0 GHz are classified as big cores on
/// heterogeneous (big.LITTLE) parts.
const BIG_CORE_FREQ_KHZ: i64 = 2_000_000;

/// Conservative worker count when no detection source is available.
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// One logical CPU as seen by the scheduler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CpuCore {
    pub id: usize,
    /// Maximum frequency in kHz; 0 when cpufreq is unreadable.
    pub max_freq_khz: i64,
    pub is_big_core: bool,
    pub is_online: bool,
}

/// Read a core's maximum frequency from cpufreq sysfs.
fn read_max_freq_khz(id: usize) -> Result<i64, TopologyError> {
    let path = format!("/sys/devices/system/cpu/cpu{}/cpufreq/cpuinfo_max_freq", id);
    let content = fs::read_to_string(&path).map_err(|_| TopologyError::FreqUnreadable(id))?;
    content
        .trim()
        .parse::<i64>()
        .map_err(|_| TopologyError::FreqUnreadable(id))
}

/// Detect the topology without caching. Frequency read failures degrade to
/// `max_freq_khz = 0` per core; the core itself is always listed.
pub fn detect_uncached() -> Vec<CpuCore> {
    let logical = num_cpus::get();
    let mut cores = Vec::with_capacity(logical);

    for id in 0..logical {
        let max_freq_khz = match read_max_freq_khz(id) {
            Ok(freq) => freq,
            Err(err) => {
                log::debug!("[TOPOLOGY] cpu{}: {}", id, err);
                0
            }
        };

        cores.push(CpuCore {
            id,
            max_freq_khz,
            is_big_core: max_freq_khz > BIG_CORE_FREQ_KHZ,
            is_online: true,
        });
    }

    cores
}

static TOPOLOGY: Lazy<Vec<CpuCore>> = Lazy::new(detect_uncached);

/// Cached topology snapshot, detected once per process.
pub fn detect() -> &'static [CpuCore] {
    &TOPOLOGY
}

/// Ids of cores classified as big.
pub fn big_cores() -> Vec<usize> {
    detect().iter().filter(|c| c.is_big_core).map(|c| c.id).collect()
}

/// Ids of cores classified as LITTLE.
pub fn little_cores() -> Vec<usize> {
    detect().iter().filter(|c| !c.is_big_core).map(|c| c.id).collect()
}

/// Worker count for multi-core phases: online core count, then logical
/// core count, then the conservative default.
pub fn worker_count() -> usize {
    let online = detect().iter().filter(|c| c.is_online).count();
    if online > 0 {
        return online;
    }
    let logical = num_cpus::get();
    if logical > 0 {
        logical
    } else {
        DEFAULT_WORKER_COUNT
    }
}

/// Log the detected topology at info level.
pub fn log_topology() {
    let cores = detect();
    let big = big_cores();
    let little = little_cores();
    log::info!(
        "[TOPOLOGY] {} cores total: {} big {:?}, {} LITTLE {:?}",
        cores.len(),
        big.len(),
        big,
        little.len(),
        little
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_never_fails() {
        let cores = detect_uncached();
        assert!(!cores.is_empty());
        for (index, core) in cores.iter().enumerate() {
            assert_eq!(core.id, index);
            assert!(core.is_online);
        }
    }

    #[test]
    fn test_worker_count_is_positive() {
        assert!(worker_count() >= 1);
    }

    #[test]
    fn test_big_little_partition_covers_all_cores() {
        let total = detect().len();
        assert_eq!(big_cores().len() + little_cores().len(), total);
    }

    #[test]
    fn test_cached_detection_is_stable() {
        assert_eq!(detect(), detect());
    }
}
