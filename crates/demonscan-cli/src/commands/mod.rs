pub mod fixtures;
pub mod scan;
