//! Agent System
//!
//! - **Roster**: declarative agent records (instructions, tools, handoffs)
//! - **Deep Research System**: runs a research request end to end
//! - **Report Writer**: turns the gathered outcome into the final report
//!
//! ## Pipeline Overview
//!
//! ```text
//! Query
//!   │
//!   ▼
//! ┌─────────────┐
//! │  Planning   │  → research tasks
//! └─────────────┘
//!   │
//!   ▼
//! ┌─────────────┐
//! │  Research   │  → cached web search per task,
//! │ Coordinator │    source reliability
//! └─────────────┘
//!   │
//!   ▼
//! ┌─────────────┐
//! │ Fact check, │  → claim support, insights,
//! │  Synthesis  │    confidence
//! └─────────────┘
//!   │
//!   ▼
//! ┌─────────────┐
//! │   Report    │  → model-written or plain markdown
//! │   Writer    │
//! └─────────────┘
//! ```

pub mod definitions;
pub mod report;
pub mod system;

pub use definitions::{AgentConfig, AgentRoster};
pub use report::ReportWriter;
pub use system::{DeepResearchSystem, ResearchOutcome, TaskFindings};
