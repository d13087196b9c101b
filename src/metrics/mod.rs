use prometheus::{Counter, Gauge, Histogram, HistogramOpts, Opts, Registry};
use std::sync::Arc;

use crate::index::BuildReport;

/// Prometheus metrics for index builds and searches
#[derive(Clone)]
pub struct IndexMetrics {
    // Counters
    pub documents_indexed: Counter,
    pub documents_failed: Counter,
    pub searches_total: Counter,

    // Gauges
    pub index_terms: Gauge,
    pub index_documents: Gauge,

    // Histograms
    pub build_latency: Histogram,
    pub search_latency: Histogram,
    pub search_results: Histogram,

    // Registry
    registry: Arc<Registry>,
}

impl IndexMetrics {
    /// Create a new IndexMetrics instance
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Counters
        let documents_indexed = Counter::with_opts(Opts::new(
            "inkdex_documents_indexed_total",
            "Total number of documents merged into an index",
        ))?;
        registry.register(Box::new(documents_indexed.clone()))?;

        let documents_failed = Counter::with_opts(Opts::new(
            "inkdex_documents_failed_total",
            "Total number of documents skipped because their scan failed",
        ))?;
        registry.register(Box::new(documents_failed.clone()))?;

        let searches_total = Counter::with_opts(Opts::new(
            "inkdex_searches_total",
            "Total number of searches served",
        ))?;
        registry.register(Box::new(searches_total.clone()))?;

        // Gauges
        let index_terms = Gauge::with_opts(Opts::new(
            "inkdex_index_terms",
            "Number of distinct terms in the loaded index",
        ))?;
        registry.register(Box::new(index_terms.clone()))?;

        let index_documents = Gauge::with_opts(Opts::new(
            "inkdex_index_documents",
            "Number of distinct documents in the loaded index",
        ))?;
        registry.register(Box::new(index_documents.clone()))?;

        // Histograms
        let build_latency = Histogram::with_opts(
            HistogramOpts::new("inkdex_build_latency_seconds", "Index build latency")
                .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0]),
        )?;
        registry.register(Box::new(build_latency.clone()))?;

        let search_latency = Histogram::with_opts(
            HistogramOpts::new("inkdex_search_latency_seconds", "Search latency")
                .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        )?;
        registry.register(Box::new(search_latency.clone()))?;

        let search_results = Histogram::with_opts(
            HistogramOpts::new("inkdex_search_results", "Documents returned per search")
                .buckets(vec![0.0, 1.0, 10.0, 50.0, 100.0, 500.0, 1000.0]),
        )?;
        registry.register(Box::new(search_results.clone()))?;

        Ok(Self {
            documents_indexed,
            documents_failed,
            searches_total,
            index_terms,
            index_documents,
            build_latency,
            search_latency,
            search_results,
            registry: Arc::new(registry),
        })
    }

    /// Record a finished build pass
    pub fn record_build(&self, report: &BuildReport) {
        self.documents_indexed.inc_by(report.documents_indexed as f64);
        self.documents_failed.inc_by(report.documents_failed() as f64);
        self.build_latency.observe(report.elapsed.as_secs_f64());
        self.set_index_size(report.index.len(), report.index.documents().len());
    }

    /// Record a search
    pub fn record_search(&self, duration_secs: f64, results: usize) {
        self.searches_total.inc();
        self.search_latency.observe(duration_secs);
        self.search_results.observe(results as f64);
    }

    /// Update the index size gauges
    pub fn set_index_size(&self, terms: usize, documents: usize) {
        self.index_terms.set(terms as f64);
        self.index_documents.set(documents as f64);
    }

    /// Render every metric in the Prometheus text format
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
