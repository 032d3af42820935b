// Document generation: prompt assembly, text generation, and the render hand-off.
// All model calls go through llm_client — no direct HTTP calls here.

pub mod generator;
pub mod handlers;
pub mod prompts;
