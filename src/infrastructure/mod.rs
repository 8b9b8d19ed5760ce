pub mod network;
pub mod offline;
