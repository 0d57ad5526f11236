//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  registry + engine      ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌──────────┐           ┌─────────────┐              ┌───────────┐
//! │ Topic    │           │   Market    │              │   Link    │
//! │ Pipeline │           │   Source    │              │   Store   │
//! └──────────┘           └─────────────┘              └───────────┘
//! ```
//!
//! - [`inbound`]: capabilities the engine drives (topic pipelines)
//! - [`outbound`]: collaborators the engine depends on (market source, link store)

pub mod inbound;
pub mod outbound;
