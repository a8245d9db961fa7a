pub mod assembly;
pub mod config;
pub mod detail;
pub mod features;
pub mod pipeline;
pub mod pool;
pub mod scoring;
