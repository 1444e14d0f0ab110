//! # AI SDK 5 Migration MCP
//!
//! Section search over the AI SDK 5 code and data migration guides,
//! served to AI agents over MCP and a JSON tool API, plus a generated
//! migration checklist.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────────┐   ┌──────────────┐
//! │ GuideStore  │──▶│ guide-search-core │──▶│ ToolRegistry │
//! │ (read once) │   │ segment+score+rank│   │ 3 tools      │
//! └─────────────┘   └──────────────────┘   └──────┬───────┘
//!                                                 │
//!                      ┌──────────────────────────┤
//!                      ▼                          ▼
//!                 ┌──────────┐              ┌──────────┐
//!                 │   CLI    │              │   HTTP   │
//!                 │          │              │ MCP+JSON │
//!                 └──────────┘              └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! migration-mcp search "useChat"
//! migration-mcp search "dual write" --corpus data-guide --limit 5
//! migration-mcp sections --corpus data-guide
//! migration-mcp checklist --output AI_SDK_5_MIGRATION.md
//! migration-mcp serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`guide`] | Read-once guide cache and loaders |
//! | [`search`] | Search response formatting and CLI commands |
//! | [`checklist`] | Migration checklist generator |
//! | [`traits`] | Tool trait, built-in tools, parameter validation |
//! | [`mcp`] | MCP protocol bridge |
//! | [`server`] | HTTP server |

pub mod checklist;
pub mod config;
pub mod guide;
pub mod mcp;
pub mod search;
pub mod server;
pub mod traits;

pub use guide_search_core::{GuideCorpus, SearchResult};
