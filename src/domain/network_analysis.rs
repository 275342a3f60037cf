use std::collections::BTreeMap;

use crate::api::topology_dto::TopologyGraphDto;
use crate::domain::config::AnalysisConfig;
use crate::domain::financial::{FinancialSummary, summarize_financials};
use crate::domain::optimizer::link_traffic::{LinkStats, LinkTraffic, TRAFFIC_SAMPLE_POINTS, TrafficPoint, downsample};
use crate::domain::optimizer::{CapacityOptimizer, OptimizationResult, optimize_links};
use crate::domain::series::CellSeries;
use crate::domain::series::frame::SeriesFrame;
use crate::domain::simulator::{LeakyBucket, SimulationResult};
use crate::domain::topology::correlation::CorrelationMatrix;
use crate::domain::topology::{LinkTopology, TopologyDiagnostic, infer_from_frame};
use crate::domain::utils::id::LinkId;
use crate::error::{Error, Result};

/// Reindexed cell data plus a cached link topology.
///
/// Built once per data set; the simulation, optimization and financial
/// queries reuse the cached frame and topology and take their parameters
/// per call.
#[derive(Debug, Clone)]
pub struct NetworkAnalysis {
    config: AnalysisConfig,
    frame: SeriesFrame,
    topology: LinkTopology,
    correlation: Option<CorrelationMatrix>,
    converged: bool,
    diagnostics: Vec<TopologyDiagnostic>,
}

impl NetworkAnalysis {
    /// Reindexes `series` and infers the topology from packet loss
    /// correlation.
    pub fn new(series: &[CellSeries], config: AnalysisConfig) -> Result<Self> {
        config.validate()?;

        let frame = SeriesFrame::reindex(series, config.topology.timestamp_precision);
        log::info!("Reindexed {} cells onto {} timestamps.", frame.cell_count(), frame.timestamps().len());

        let inference = infer_from_frame(&frame, &config.topology)?;

        Ok(Self {
            config,
            frame,
            topology: inference.topology,
            correlation: Some(inference.correlation),
            converged: inference.converged,
            diagnostics: inference.diagnostics,
        })
    }

    /// Uses a topology computed earlier (e.g. read back from a capacity
    /// report) instead of inferring one.
    pub fn with_topology(series: &[CellSeries], topology: LinkTopology, config: AnalysisConfig) -> Result<Self> {
        config.validate()?;

        let frame = SeriesFrame::reindex(series, config.topology.timestamp_precision);
        let diagnostics = topology.validate(frame.cells());

        Ok(Self { config, frame, topology, correlation: None, converged: true, diagnostics })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn frame(&self) -> &SeriesFrame {
        &self.frame
    }

    pub fn topology(&self) -> &LinkTopology {
        &self.topology
    }

    /// `None` when the topology was supplied rather than inferred.
    pub fn correlation(&self) -> Option<&CorrelationMatrix> {
        self.correlation.as_ref()
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn diagnostics(&self) -> &[TopologyDiagnostic] {
        &self.diagnostics
    }

    pub fn topology_graph(&self) -> TopologyGraphDto {
        TopologyGraphDto::from(&self.topology)
    }

    /// Aggregate traffic of one link.
    pub fn link_traffic(&self, link: LinkId) -> Result<LinkTraffic> {
        let members = self.topology.cells(link).ok_or(Error::UnknownLink(link.get()))?;
        Ok(LinkTraffic::aggregate(&self.frame, link, members))
    }

    /// Runs every link at the same candidate capacity. Links without data
    /// report no drops.
    pub fn simulate_network(&self, capacity_gbps: f64, buffer_time_sec: f64) -> BTreeMap<LinkId, SimulationResult> {
        let bucket = LeakyBucket::from(&self.config.simulation);

        self.topology
            .iter()
            .map(|(link, members)| {
                let traffic = LinkTraffic::aggregate(&self.frame, link, members);
                let result = if traffic.has_data() {
                    bucket.simulate(capacity_gbps, &traffic.aggregate_gbps, buffer_time_sec)
                } else {
                    SimulationResult { drop_rate: 0.0, congested: false }
                };
                (link, result)
            })
            .collect()
    }

    pub fn find_optimal_capacity(&self, buffer_time_sec: f64, sla_drop_rate: f64) -> BTreeMap<LinkId, OptimizationResult> {
        let optimizer = CapacityOptimizer::from(&self.config);
        optimize_links(&self.frame, &self.topology, &optimizer, buffer_time_sec, sla_drop_rate)
    }

    pub fn calculate_financials(&self, buffer_time_sec: f64, sla_drop_rate: f64, cost_per_gbps: f64) -> FinancialSummary {
        let results = self.find_optimal_capacity(buffer_time_sec, sla_drop_rate);
        summarize_financials(&results, cost_per_gbps)
    }

    /// Peak, percentiles and mean of a link's aggregate. `None` when no
    /// member cell has data.
    pub fn link_stats(&self, link: LinkId) -> Result<Option<LinkStats>> {
        let traffic = self.link_traffic(link)?;
        Ok(traffic.has_data().then(|| LinkStats::from_series(&traffic.aggregate_gbps)))
    }

    /// Aggregate traffic of a link thinned out for display.
    pub fn traffic_sample(&self, link: LinkId) -> Result<Vec<TrafficPoint>> {
        let traffic = self.link_traffic(link)?;
        if !traffic.has_data() {
            return Ok(Vec::new());
        }
        Ok(downsample(self.frame.timestamps(), &traffic.aggregate_gbps, TRAFFIC_SAMPLE_POINTS))
    }
}
