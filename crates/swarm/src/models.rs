//! These models represent the objects passed around by the runner
//!
//! The transcript is kept in an internal shape that is close to, but not exactly,
//! the OpenAI chat-completions format. Providers convert to and from their own wire
//! format using the helpers in `providers::utils`, so the runner never has to care
//! about encodings such as tool call arguments being sent as a JSON string.
pub mod message;
pub mod role;
pub mod tool;
