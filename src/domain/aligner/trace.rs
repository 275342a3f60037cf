/// One row of a raw throughput trace: kilobits carried in one symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThroughputRecord {
    pub timestamp: f64,
    pub kbits: f64,
}

/// One row of a raw packet accounting trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacketRecord {
    pub timestamp: f64,
    pub tx: f64,
    pub rx: f64,
    /// Packets that arrived but missed their deadline.
    pub too_late: f64,
}

/// Both raw traces of one cell, as read from disk. Arrival times are
/// irregular and not necessarily sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCellTraces {
    pub throughput: Vec<ThroughputRecord>,
    pub packets: Vec<PacketRecord>,
}
