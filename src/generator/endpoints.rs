use super::archetype::Archetype;
use super::namer::derive_entity_name;
use super::text::{DescriptionOutcome, TextGenerator};
use crate::error::{MockError, Result};
use crate::llm::ChatModel;
use crate::model::MockEndpoint;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Default stack for the per-archetype generation coroutines.
///
/// The blocking HTTP call, JSON parsing and schema validation all run on it.
pub const DEFAULT_GENERATION_STACK_SIZE: usize = 0x40000;

/// One description's worth of generated definitions.
#[derive(Debug, Clone)]
pub struct EndpointBatch {
    /// Canonical entity name shared by every definition
    pub entity: String,
    /// Whether the description rewrite succeeded, and the text actually used
    pub description: DescriptionOutcome,
    /// Exactly one definition per [`Archetype`], in [`Archetype::ALL`] order
    pub endpoints: Vec<MockEndpoint>,
}

/// Orchestrates the five CRUD generations for one entity.
#[derive(Clone)]
pub struct EndpointGenerator {
    text: TextGenerator,
    stack_size: usize,
}

impl EndpointGenerator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            text: TextGenerator::new(model),
            stack_size: DEFAULT_GENERATION_STACK_SIZE,
        }
    }

    /// Override the coroutine stack size used for generation calls.
    #[must_use]
    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    #[must_use]
    pub fn text(&self) -> &TextGenerator {
        &self.text
    }

    /// Generate the five canonical CRUD definitions for `description`.
    ///
    /// The entity name is fixed first, the description is optionally rewritten,
    /// then the five archetype requests run concurrently. All of them are
    /// awaited; any failure discards the whole batch.
    ///
    /// # Errors
    ///
    /// - `Validation` for a blank description
    /// - `Generation` if naming fails or any archetype fails validation
    pub fn generate_endpoint_set(&self, description: &str) -> Result<EndpointBatch> {
        let start = Instant::now();
        let description = description.trim();
        if description.is_empty() {
            return Err(MockError::validation("description is required"));
        }

        let entity = derive_entity_name(&self.text, description)?;
        let outcome = self.text.enhance_description(description);
        info!(
            entity = %entity,
            enhanced = outcome.is_enhanced(),
            "Generating endpoint batch"
        );

        let results = self.fan_out(&entity, outcome.text());

        let mut endpoints = Vec::with_capacity(Archetype::ALL.len());
        let mut first_error = None;
        for (archetype, result) in results {
            match result {
                Ok(endpoint) => endpoints.push(endpoint),
                Err(e) => {
                    error!(
                        entity = %entity,
                        archetype = %archetype,
                        error = %e,
                        "Endpoint generation failed, discarding batch"
                    );
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        info!(
            entity = %entity,
            count = endpoints.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Endpoint batch generated"
        );
        Ok(EndpointBatch {
            entity,
            description: outcome,
            endpoints,
        })
    }

    /// Run one coroutine per archetype and join every one of them.
    fn fan_out(&self, entity: &str, description: &str) -> Vec<(Archetype, Result<MockEndpoint>)> {
        let spawned: Vec<_> = Archetype::ALL
            .iter()
            .map(|&archetype| {
                let text = self.text.clone();
                let entity = entity.to_string();
                let description = description.to_string();
                // SAFETY: may::coroutine::Builder::spawn() is marked unsafe by the may runtime.
                // The closure owns all of its data and uses no thread-local state.
                let handle = unsafe {
                    may::coroutine::Builder::new()
                        .name(format!("generate-{archetype}"))
                        .stack_size(self.stack_size)
                        .spawn(move || text.propose_endpoint(archetype, &entity, &description))
                };
                (archetype, handle)
            })
            .collect();

        spawned
            .into_iter()
            .map(|(archetype, handle)| {
                let result = match handle {
                    Ok(h) => h.join().unwrap_or_else(|_| {
                        Err(MockError::generation(format!(
                            "{archetype}: generation coroutine panicked"
                        )))
                    }),
                    Err(e) => Err(MockError::generation(format!(
                        "{archetype}: cannot spawn generation coroutine: {e}"
                    ))),
                };
                (archetype, result)
            })
            .collect()
    }
}
