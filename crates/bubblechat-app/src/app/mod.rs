pub mod query;
pub mod repl;
pub mod setup;

pub use query::run_query_mode;
pub use repl::{parse_repl_line, run_repl_mode, ReplInput};
pub use setup::{build_backend, init_logging, request_log_settings};
