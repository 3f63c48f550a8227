pub mod preview;
pub mod transport;
