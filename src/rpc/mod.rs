//! JSON-RPC server for external consumers
//!
//! Line-delimited JSON-RPC 2.0 over stdio. A UI spawns `veracity serve`, writes
//! one request per line and reads one response per line.
//!
//! # Usage
//!
//! ```bash
//! echo '{"jsonrpc":"2.0","id":1,"method":"analyze","params":{"text":"..."}}' | veracity serve
//! ```
//!
//! # Methods
//!
//! - `initialize` - server info and method list
//! - `analyze` - `{text}` or `{url}`, returns the full analysis
//! - `bootstrap` - `{text, seed?}`, appends one sample to the session
//! - `bootstrap/batch` - `{text, samples, seed?}`, appends a parallel batch
//! - `session/summary` - mean, standard error and interval per metric
//! - `session/histogram` - `{metric, buckets?}`
//! - `session/reset` - forget the text and its samples
//! - `annotate` - `{text, problematicElements?}`
//! - `shutdown`
//!
//! Engine failures use their own error codes so a client can tell them apart:
//! -32001 empty input, -32002 unreachable source, -32003 invalid feature input,
//! -32004 malformed response.

pub mod params;
mod server;
mod state;

pub use server::{error_code, run_server, RpcServer, METHODS};
pub use state::SessionState;
