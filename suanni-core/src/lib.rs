//! Grounded chart interpretation.
//!
//! This crate provides:
//! - Curated knowledge tables for the four-pillar and twelve-palace charts
//! - Shape-tolerant fact extraction from chart producers' JSON
//! - Deterministic retrieval and digest composition
//! - A relay that normalizes the generative service's streamed output
//!
//! # Quick Start
//!
//! ```ignore
//! use futures::StreamExt;
//! use suanni_core::{InterpretRequest, Interpreter, RelayEvent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let interpreter = Interpreter::from_env()?;
//!     let request: InterpretRequest = serde_json::from_str(BODY)?;
//!
//!     let mut events = interpreter.interpret(&request).await?;
//!     while let Some(event) = events.next().await {
//!         if let RelayEvent::Text(text) = event {
//!             print!("{text}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod digest;
pub mod extract;
pub mod interpret;
pub mod knowledge;
pub mod preview;
pub mod relationship;
pub mod relay;
pub mod retrieve;
pub mod testing;

// Primary public API
pub use digest::{Digest, DigestSection, SectionKind};
pub use extract::{CalendarChartInput, CalendarFacts, StarChartInput, StarFact, StarFacts};
pub use interpret::{
    BirthInfo, InterpretConfig, InterpretError, InterpretRequest, Interpreter, Narrator,
    PreparedPrompt,
};
pub use preview::Preview;
pub use relationship::{
    RelationshipAnalyzer, RelationshipConfig, RelationshipError, RelationshipReport,
    RelationshipRequest,
};
pub use relay::{relay_stream, RelayEvent, RelayParser, RelayStream};
pub use retrieve::{retrieve_calendar, retrieve_comprehensive, retrieve_star, MatchedKnowledge};
pub use testing::{ScriptedNarrator, ScriptedReply};
