pub mod facade;
pub mod references;
pub mod rpc;
pub mod transport;

pub use facade::*;
pub use references::resolve_references;
pub use rpc::*;
pub use transport::*;
