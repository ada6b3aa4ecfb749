pub mod processed_example;
pub mod raw_example;

pub use processed_example::ProcessedExample;
pub use raw_example::RawExample;
