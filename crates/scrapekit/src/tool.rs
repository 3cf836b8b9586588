//! Tool builder and contract for ScrapeKit
//!
//! Wraps the scrape pipeline behind a configured, schema-described
//! surface for tool hosts: fixed backend/output/network configuration,
//! per-call URL input.

use crate::client::scrape;
use crate::error::ScrapeError;
use crate::types::{
    FailoverOptions, FailurePolicy, NetworkOptions, OutputOptions, ProxyOptions, ReaderOptions,
    ScrapeApiOptions, ScrapeRecord, ScrapeRequest, Strategy,
};
use crate::{TOOL_DESCRIPTION, TOOL_LLMTXT};
use schemars::schema_for;

/// Builder for configuring the scrape tool
#[derive(Debug, Clone, Default)]
pub struct ToolBuilder {
    strategy: Strategy,
    failover: FailoverOptions,
    output: OutputOptions,
    network: NetworkOptions,
    on_error: FailurePolicy,
}

impl ToolBuilder {
    /// Create a builder with default configuration
    pub fn new() -> Self {
        Self {
            output: OutputOptions::default(),
            network: NetworkOptions::default(),
            ..Default::default()
        }
    }

    /// Set the backend trial-order strategy
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enable the Jina Reader backend
    pub fn reader(mut self, options: ReaderOptions) -> Self {
        self.failover.reader = Some(options);
        self
    }

    /// Enable the Firecrawl backend
    pub fn scrape_api(mut self, options: ScrapeApiOptions) -> Self {
        self.failover.scrape_api = Some(options);
        self
    }

    /// Route direct requests through a proxy
    pub fn proxy(mut self, proxy: ProxyOptions) -> Self {
        self.failover.proxy = Some(proxy);
        self
    }

    /// Set output options
    pub fn output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    /// Set network options
    pub fn network(mut self, network: NetworkOptions) -> Self {
        self.network = network;
        self
    }

    /// Set the per-URL failure policy
    pub fn on_error(mut self, policy: FailurePolicy) -> Self {
        self.on_error = policy;
        self
    }

    /// Build the tool
    pub fn build(self) -> Tool {
        Tool {
            strategy: self.strategy,
            failover: self.failover,
            output: self.output,
            network: self.network,
            on_error: self.on_error,
        }
    }
}

/// Configured scrape tool
#[derive(Debug, Clone)]
pub struct Tool {
    strategy: Strategy,
    failover: FailoverOptions,
    output: OutputOptions,
    network: NetworkOptions,
    on_error: FailurePolicy,
}

impl Default for Tool {
    fn default() -> Self {
        ToolBuilder::new().build()
    }
}

impl Tool {
    /// Create a new tool builder
    pub fn builder() -> ToolBuilder {
        ToolBuilder::new()
    }

    /// Get tool description
    pub fn description(&self) -> &'static str {
        TOOL_DESCRIPTION
    }

    /// Get full documentation (llmtxt)
    pub fn llmtxt(&self) -> &'static str {
        TOOL_LLMTXT
    }

    /// Get input schema as JSON
    pub fn input_schema(&self) -> serde_json::Value {
        let schema = schema_for!(ScrapeRequest);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Get output schema as JSON
    pub fn output_schema(&self) -> serde_json::Value {
        let schema = schema_for!(ScrapeRecord);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Scrape a comma- or newline-separated URL list with the
    /// configured settings
    pub async fn execute(&self, urls: &str) -> Result<Vec<ScrapeRecord>, ScrapeError> {
        let request = ScrapeRequest::new(urls)
            .strategy(self.strategy)
            .failover(self.failover.clone())
            .output(self.output.clone())
            .network(self.network.clone())
            .on_error(self.on_error);
        scrape(&request).await
    }

    /// Scrape with a fully explicit request, ignoring the tool's
    /// configured defaults
    pub async fn execute_request(
        &self,
        request: &ScrapeRequest,
    ) -> Result<Vec<ScrapeRecord>, ScrapeError> {
        scrape(request).await
    }
}
