pub mod artifacts;
pub mod observability;
pub mod transport;
