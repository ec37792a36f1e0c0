//! Resume ingestion and candidate-scoring pipeline.
//!
//! Flow: extract (tiered fallback) -> structure (oracle) -> validate
//! (oracle, advisory) -> repair (pure heuristics) -> score (oracle) ->
//! approve (state transition materializing a Candidate).

pub mod approval;
pub mod extract;
pub mod handlers;
pub mod oracle;
pub mod prompts;
pub mod repair;
pub mod scorer;
pub mod structurer;
pub mod validator;
