//! # amock
//!
//! **amock** turns a plain-language description of a data entity ("users with a
//! name, email and age") into a working set of mock CRUD endpoints, persists
//! them, and serves them over HTTP on the `may` coroutine runtime.
//!
//! ## Architecture
//!
//! - **[`generator`]** - entity naming and five-archetype endpoint generation
//! - **[`llm`]** - the [`llm::ChatModel`] seam and an OpenAI-compatible client
//! - **[`store`]** - grouped flat-file persistence with a one-generation backup
//! - **[`router`]** - matches live requests against stored definitions
//! - **[`server`]** - `may_minihttp` service: management API plus dynamic routes
//! - **[`cli`]** / **[`config`]** / **[`logging`]** - the binary's outer shell
//!
//! ## Request flow
//!
//! ```text
//! POST /api/mock { description }
//!   → derive entity name      (generator::derive_entity_name)
//!   → enhance description     (soft failure, original text kept)
//!   → 5 concurrent requests   (list, detail, create, update, delete)
//!   → validate every reply    (all-or-nothing)
//!   → save_batch              (store)
//!
//! GET /api/user?page=2
//!   → MockRouter::respond     (match method + path, paginate user_list)
//! ```
//!
//! ## Response envelope
//!
//! Every API answer is `{ "code": 0 | 1, "data": ..., "msg": "..." }`; a
//! failure pairs `code: 1` with a 4xx/5xx status (see [`error::MockError`]).

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod ids;
pub mod llm;
pub mod logging;
pub mod model;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod store;

pub use error::{MockError, Result};
pub use generator::{EndpointBatch, EndpointGenerator};
pub use ids::MockId;
pub use model::{MockEndpoint, MockMethod, ResponseEnvelope};
pub use router::MockRouter;
pub use store::{FileMockStore, MemoryMockStore, MockStore};
