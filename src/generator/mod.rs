//! # Endpoint Generator
//!
//! Turns one free-text description into a batch of five mock endpoint
//! definitions that share a single entity name:
//!
//! | archetype    | method | path                |
//! |--------------|--------|---------------------|
//! | list-query   | GET    | `/api/<entity>`      |
//! | detail-query | GET    | `/api/<entity>/{id}` |
//! | create       | POST   | `/api/<entity>`      |
//! | update       | PUT    | `/api/<entity>/{id}` |
//! | delete       | DELETE | `/api/<entity>/{id}` |
//!
//! ## Flow
//!
//! 1. [`derive_entity_name`] asks the backend for a noun and normalizes it
//! 2. [`TextGenerator::enhance_description`] optionally rewrites the description
//! 3. [`EndpointGenerator`] requests all five archetypes concurrently
//! 4. every reply is schema-checked and compared against the request
//!    ([`validate`]); one failure discards the batch
//!
//! Nothing here persists anything; the caller stores the batch.

mod archetype;
mod endpoints;
mod namer;
pub mod prompts;
mod text;
pub mod validate;

pub use archetype::Archetype;
pub use endpoints::{EndpointBatch, EndpointGenerator, DEFAULT_GENERATION_STACK_SIZE};
pub use namer::{derive_entity_name, normalize_entity_name, RESERVED_ENTITY_NAMES};
pub use text::{DescriptionOutcome, TextGenerator, ENHANCE_TEMPERATURE};
