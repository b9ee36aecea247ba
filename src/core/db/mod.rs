/// Database Module
///
/// The execution side of dbcontrol:
/// - **Connection** (`connection.rs`): the `Connector`/`Connection` driver seam and the bundled SQLite driver
/// - **Executor** (`executor.rs`): the per-statement connect, execute, commit, fetch and close lifecycle
pub mod connection;
pub mod executor;

pub use connection::*;
pub use executor::*;
