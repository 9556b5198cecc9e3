pub mod chop;
pub mod crop;
pub mod luma;
pub mod orchestrator;
pub mod score;
pub mod select;
pub mod threshold;
