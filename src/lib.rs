//! Tint execution service.
//!
//! Accepts automaton programs over HTTP, runs them with the platform's Tint
//! interpreter under a wall-clock timeout, and answers with a
//! `{status, output}` envelope.

pub mod artifact;
pub mod config;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod http_server;
pub mod invocation;
pub mod model;
pub mod platform;
pub mod pool;
pub mod runner;
pub mod state;

pub use config::{ExitPolicy, ServiceConfig};
pub use dispatcher::Dispatcher;
pub use envelope::ExecutionResult;
pub use error::ExecError;
pub use model::{MachineType, Submission};
