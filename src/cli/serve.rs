//! JSON-RPC server command handler

use anyhow::Result;
use veracity::Analyzer;

/// Run the JSON-RPC server on stdio
pub fn run(analyzer: Analyzer) -> Result<()> {
    veracity::rpc::run_server(analyzer)
}
