//! Prompt templates sent to the chat backend, rendered with `minijinja`.

use super::archetype::Archetype;
use crate::error::{MockError, Result};
use crate::model::list_key;
use minijinja::{context, Environment};

const ENHANCE_SYSTEM: &str = "\
You are an API design expert. Rewrite the user's short description of a business entity \
into one complete, detailed sentence. Name the entity, list its important fields and \
their meaning, and use precise domain terms. Reply with that sentence only, in the \
language the user wrote in.";

const ENTITY_NAME_SYSTEM: &str = "\
You name REST resources. Reply with exactly one English noun in lowercase singular form \
that names the business entity the user describes, using ASCII letters only. \
No punctuation, no quotes, no explanation. Example: for \"用户\" reply user.";

const ENDPOINT_SYSTEM: &str = r#"You are an API design expert producing mock data for one RESTful endpoint.
Reply with a single JSON object and nothing else.

Endpoint to produce:
- operation: {{ archetype }}
- method: {{ method }}
- path: {{ path }} (use this path exactly; the entity segment is "{{ entity }}")

The JSON object must have these fields:
- "path": "{{ path }}"
- "method": "{{ method }}"
- "description": a short human-readable description of the endpoint
{%- if has_body %}
- "requestBody": an object mapping each writable field name to an example value
{%- endif %}
- "responseBody": {"code": 0, "data": ..., "msg": "success"}

{% if is_list -%}
"data" must be an object with exactly two keys: "{{ list_key }}", an array of 3 to 5
realistic {{ entity }} objects, and "total", an integer equal to that array's length.
{%- elif method == "DELETE" -%}
"data" should be null.
{%- else -%}
"data" must be one realistic {{ entity }} object including its "id".
{%- endif %}
Field values should be realistic and consistent with the description."#;

fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.add_template("endpoint", ENDPOINT_SYSTEM)
        .map_err(|e| MockError::generation(format!("invalid endpoint prompt template: {e}")))?;
    Ok(env)
}

/// System prompt for rewriting a description into a richer one.
#[must_use]
pub fn enhance_system() -> &'static str {
    ENHANCE_SYSTEM
}

/// System prompt for deriving the entity identifier.
#[must_use]
pub fn entity_name_system() -> &'static str {
    ENTITY_NAME_SYSTEM
}

/// System prompt for one archetype of `entity`.
///
/// # Errors
///
/// Returns `Generation` if the template fails to render.
pub fn endpoint_system(archetype: Archetype, entity: &str) -> Result<String> {
    let env = environment()?;
    let template = env
        .get_template("endpoint")
        .map_err(|e| MockError::generation(format!("missing endpoint prompt template: {e}")))?;
    let method = archetype.method();
    template
        .render(context! {
            archetype => archetype.label(),
            method => method.as_str(),
            path => archetype.expected_path(entity),
            entity => entity,
            is_list => archetype.is_list(),
            has_body => method.has_request_body(),
            list_key => list_key(entity),
        })
        .map_err(|e| MockError::generation(format!("cannot render endpoint prompt: {e}")))
}
