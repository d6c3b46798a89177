// Runner profile extraction: free text -> (sex, age, 5 km time).
// All LLM calls go through llm_client; everything after the call is pure.

pub mod extractor;
pub mod handlers;
pub mod missing;
pub mod models;
pub mod normalize;
pub mod observer;
pub mod prompts;
pub mod recovery;
pub mod time_codec;
