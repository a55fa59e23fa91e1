pub mod gwosc;

pub use gwosc::GwoscClient;
