pub mod connectivity;

pub use connectivity::ConnectivityFlag;
