//! Host-facing contract and JSON bridge for front ends driving a session.

pub mod contract;
pub mod router;
pub mod stdio;

pub use router::SessionRouter;
pub use stdio::{run_bridge, run_stdio_bridge};
