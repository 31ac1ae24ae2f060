//! JSON-RPC 2.0 server over stdio

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use tracing::{debug, error, info, warn};

use super::params::{AnnotateParams, BootstrapBatchParams, BootstrapParams, HistogramParams};
use super::state::SessionState;
use crate::analyzer::{AnalysisInput, Analyzer};
use crate::classifier::Metric;
use crate::error::EngineError;

pub const METHODS: &[&str] = &[
    "initialize",
    "analyze",
    "bootstrap",
    "bootstrap/batch",
    "session/summary",
    "session/histogram",
    "session/reset",
    "annotate",
    "shutdown",
];

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
const INTERNAL_ERROR: i64 = -32603;

/// JSON-RPC error code for an engine failure
pub fn error_code(err: &EngineError) -> i64 {
    match err {
        EngineError::EmptyInput => -32001,
        EngineError::UnreachableSource { .. } => -32002,
        EngineError::InvalidFeatureInput { .. } => -32003,
        EngineError::MalformedResponse(_) => -32004,
    }
}

#[derive(Debug)]
struct RpcError {
    code: i64,
    message: String,
    kind: Option<&'static str>,
}

impl RpcError {
    fn invalid_params(message: impl std::fmt::Display) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: format!("Invalid params: {}", message),
            kind: None,
        }
    }

    fn internal(message: impl std::fmt::Display) -> Self {
        Self {
            code: INTERNAL_ERROR,
            message: message.to_string(),
            kind: None,
        }
    }

    fn to_json(&self) -> Value {
        match self.kind {
            Some(kind) => json!({ "code": self.code, "message": self.message, "data": { "kind": kind } }),
            None => json!({ "code": self.code, "message": self.message }),
        }
    }
}

impl From<EngineError> for RpcError {
    fn from(err: EngineError) -> Self {
        Self {
            code: error_code(&err),
            message: err.to_string(),
            kind: Some(err.kind()),
        }
    }
}

type RpcResult = std::result::Result<Value, RpcError>;

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> std::result::Result<T, RpcError> {
    let params = params.ok_or_else(|| RpcError::invalid_params("missing params"))?;
    serde_json::from_value(params).map_err(RpcError::invalid_params)
}

/// JSON-RPC 2.0 Request
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: Option<String>,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

pub struct RpcServer {
    analyzer: Analyzer,
    state: SessionState,
    shutdown: bool,
}

impl RpcServer {
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            state: SessionState::new(),
            shutdown: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Serve requests until EOF or `shutdown`
    pub fn run<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> Result<()> {
        info!("veracity JSON-RPC server started");

        for line in reader.lines() {
            let line = line.context("Failed to read request")?;
            if line.trim().is_empty() {
                continue;
            }
            debug!("Received: {}", line);

            if let Some(response) = self.handle_message(&line)? {
                let response_str = serde_json::to_string(&response)?;
                debug!("Sending: {}", response_str);
                writeln!(writer, "{}", response_str)?;
                writer.flush()?;
            }

            if self.shutdown {
                info!("Shutdown requested");
                break;
            }
        }

        Ok(())
    }

    /// Handle one request line. Returns `None` for notifications.
    pub fn handle_message(&mut self, message: &str) -> Result<Option<Value>> {
        let request: JsonRpcRequest = match serde_json::from_str(message) {
            Ok(request) => request,
            Err(e) => {
                warn!("Unparsable request: {}", e);
                return Ok(Some(json!({
                    "jsonrpc": "2.0",
                    "id": null,
                    "error": { "code": PARSE_ERROR, "message": format!("Parse error: {}", e) }
                })));
            }
        };

        let result = self.dispatch(&request.method, request.params);

        let Some(id) = request.id else {
            if let Err(e) = &result {
                debug!("Notification {} failed: {}", request.method, e.message);
            }
            return Ok(None);
        };

        Ok(Some(match result {
            Ok(value) => json!({ "jsonrpc": "2.0", "id": id, "result": value }),
            Err(e) => {
                if e.code == METHOD_NOT_FOUND || e.code == INVALID_PARAMS {
                    warn!("{}: {}", request.method, e.message);
                } else {
                    error!("{} failed: {}", request.method, e.message);
                }
                json!({ "jsonrpc": "2.0", "id": id, "error": e.to_json() })
            }
        }))
    }

    fn dispatch(&mut self, method: &str, params: Option<Value>) -> RpcResult {
        match method {
            "initialize" => Ok(self.handle_initialize()),
            "analyze" => self.handle_analyze(params),
            "bootstrap" => self.handle_bootstrap(params),
            "bootstrap/batch" => self.handle_bootstrap_batch(params),
            "session/summary" => Ok(self.handle_summary()),
            "session/histogram" => self.handle_histogram(params),
            "session/reset" => {
                self.state.reset();
                Ok(json!(null))
            }
            "annotate" => self.handle_annotate(params),
            "shutdown" => {
                self.shutdown = true;
                Ok(json!(null))
            }
            _ => Err(RpcError {
                code: METHOD_NOT_FOUND,
                message: format!("Unknown method: {}", method),
                kind: None,
            }),
        }
    }

    fn handle_initialize(&self) -> Value {
        let config = self.analyzer.config();
        json!({
            "serverInfo": {
                "name": "veracity",
                "version": env!("CARGO_PKG_VERSION")
            },
            "methods": METHODS,
            "config": {
                "stopWords": config.vocabulary.stop_words,
                "topWords": config.display.top_words,
                "buckets": config.bootstrap.buckets
            }
        })
    }

    fn handle_analyze(&mut self, params: Option<Value>) -> RpcResult {
        let input: AnalysisInput = parse_params(params)?;
        let result = self.analyzer.analyze(&input)?;
        self.state.select_text(&result.original_text);
        serde_json::to_value(&result).map_err(RpcError::internal)
    }

    fn handle_bootstrap(&mut self, params: Option<Value>) -> RpcResult {
        let p: BootstrapParams = parse_params(params)?;
        let sample = self.analyzer.bootstrap(&p.text, p.seed)?;
        self.state.select_text(&p.text);
        self.state.samples.push(sample.clone());
        Ok(json!({
            "sample": sample,
            "samples": self.state.samples.len()
        }))
    }

    fn handle_bootstrap_batch(&mut self, params: Option<Value>) -> RpcResult {
        let p: BootstrapBatchParams = parse_params(params)?;
        if p.samples == 0 {
            return Err(RpcError::invalid_params("samples must be at least 1"));
        }
        let max_batch = self.analyzer.config().bootstrap.max_batch;
        if p.samples > max_batch {
            return Err(RpcError::invalid_params(format!(
                "samples must be at most {max_batch}"
            )));
        }
        let batch = self.analyzer.bootstrap_batch(&p.text, p.samples, p.seed)?;
        self.state.select_text(&p.text);
        self.state.samples.extend(batch);
        Ok(json!({
            "added": p.samples,
            "samples": self.state.samples.len(),
            "summary": self.state.samples.summary()
        }))
    }

    fn handle_summary(&self) -> Value {
        json!({
            "samples": self.state.samples.len(),
            "summary": self.state.samples.summary()
        })
    }

    fn handle_histogram(&self, params: Option<Value>) -> RpcResult {
        let p: HistogramParams = parse_params(params)?;
        let metric: Metric = p.metric.parse().map_err(RpcError::invalid_params)?;
        let buckets = p.buckets.unwrap_or(self.analyzer.config().bootstrap.buckets);
        Ok(json!({
            "metric": metric,
            "samples": self.state.samples.len(),
            "buckets": self.state.samples.histogram(metric, buckets)
        }))
    }

    fn handle_annotate(&self, params: Option<Value>) -> RpcResult {
        let p: AnnotateParams = parse_params(params)?;
        let annotation = match &p.problematic_elements {
            Some(elements) => self.analyzer.annotate_with(&p.text, elements),
            None => self.analyzer.annotate(&p.text)?,
        };
        serde_json::to_value(&annotation).map_err(RpcError::internal)
    }
}

/// Run the server on stdin/stdout
pub fn run_server(analyzer: Analyzer) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut server = RpcServer::new(analyzer);
    server.run(BufReader::new(stdin.lock()), stdout.lock())
}
