use crate::domain::aligner::trace::{PacketRecord, ThroughputRecord};
use crate::domain::config::AlignerConfig;
use crate::domain::utils::statistics;

/// Throughput after spike removal, converted to Gbps.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedThroughput {
    pub timestamps: Vec<f64>,
    pub gbps: Vec<f64>,
    pub cutoff_kbits: f64,
    pub spikes_removed: usize,
}

/// Packet loss derived from the accounting counters.
#[derive(Debug, Clone, PartialEq)]
pub struct PacketLossTrace {
    pub timestamps: Vec<f64>,
    pub loss: Vec<f64>,
}

/// Sorts by timestamp, zeroes every sample above
/// `max(median_factor * median, mean_factor * mean, floor)` and converts
/// kilobits per symbol to Gbps. Spikes keep their timestamp slot.
pub fn clean_throughput(records: &[ThroughputRecord], config: &AlignerConfig) -> CleanedThroughput {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

    let raw: Vec<f64> = sorted.iter().map(|r| r.kbits).collect();
    let cutoff_kbits = (config.spike_median_factor * statistics::median(&raw))
        .max(config.spike_mean_factor * statistics::mean(&raw))
        .max(config.spike_floor_kbits);

    let mut spikes_removed = 0;
    let gbps = raw
        .iter()
        .map(|&kbits| {
            let kbits = if kbits > cutoff_kbits {
                spikes_removed += 1;
                0.0
            } else {
                kbits
            };
            kbits_to_gbps(kbits, config.symbol_duration_sec)
        })
        .collect();

    CleanedThroughput { timestamps: sorted.iter().map(|r| r.timestamp).collect(), gbps, cutoff_kbits, spikes_removed }
}

/// Kilobits carried in one symbol expressed as gigabits per second.
pub fn kbits_to_gbps(kbits: f64, symbol_duration_sec: f64) -> f64 {
    kbits * 1000.0 / symbol_duration_sec / 1e9
}

/// Sorts by timestamp and computes `max(tx - rx + too_late, 0)`: late
/// packets count as lost even though they were received.
pub fn derive_packet_loss(records: &[PacketRecord]) -> PacketLossTrace {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

    PacketLossTrace {
        timestamps: sorted.iter().map(|r| r.timestamp).collect(),
        loss: sorted.iter().map(|r| (r.tx - r.rx + r.too_late).max(0.0)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thr(timestamp: f64, kbits: f64) -> ThroughputRecord {
        ThroughputRecord { timestamp, kbits }
    }

    #[test]
    fn spike_is_zeroed_in_place() {
        let mut records: Vec<ThroughputRecord> = (0..20).map(|i| thr(i as f64 * 0.1, 40.0)).collect();
        records.push(thr(2.05, 50_000.0));

        let cleaned = clean_throughput(&records, &AlignerConfig::default());

        assert_eq!(cleaned.spikes_removed, 1);
        assert_eq!(cleaned.timestamps.len(), 21);
        assert_eq!(cleaned.gbps[20], 0.0);
        assert!(cleaned.gbps[..20].iter().all(|g| *g > 0.0));
    }

    #[test]
    fn floor_protects_quiet_cells() {
        // median 0, mean tiny: only the floor keeps small bursts.
        let mut records: Vec<ThroughputRecord> = (0..9).map(|i| thr(i as f64 * 0.1, 0.0)).collect();
        records.push(thr(0.9, 90.0));
        let cleaned = clean_throughput(&records, &AlignerConfig::default());
        assert_eq!(cleaned.cutoff_kbits, 100.0);
        assert_eq!(cleaned.spikes_removed, 0);
    }

    #[test]
    fn sort_is_stable_for_equal_timestamps() {
        let records = vec![thr(1.0, 10.0), thr(0.5, 20.0), thr(1.0, 30.0)];
        let cleaned = clean_throughput(&records, &AlignerConfig::default());
        let expected: Vec<f64> = [20.0, 10.0, 30.0].iter().map(|k| kbits_to_gbps(*k, AlignerConfig::default().symbol_duration_sec)).collect();
        assert_eq!(cleaned.gbps, expected);
    }

    #[test]
    fn late_packets_count_as_lost_and_loss_is_clipped() {
        let records = vec![
            PacketRecord { timestamp: 0.2, tx: 10.0, rx: 12.0, too_late: 0.0 },
            PacketRecord { timestamp: 0.1, tx: 10.0, rx: 8.0, too_late: 3.0 },
        ];
        let trace = derive_packet_loss(&records);
        assert_eq!(trace.timestamps, vec![0.1, 0.2]);
        assert_eq!(trace.loss, vec![5.0, 0.0]);
    }
}
