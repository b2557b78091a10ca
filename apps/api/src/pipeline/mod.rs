// Recruiting pipeline: RTI drafting, rule scoring, orchestration and HTTP handlers.
// Storage goes through `store::PipelineStore` only.

pub mod drafter;
pub mod handlers;
pub mod orchestrator;
pub mod scoring;
