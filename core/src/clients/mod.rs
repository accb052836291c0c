pub mod anthropic;

// Re-export commonly used types
pub use anthropic::{AnthropicClient, AnthropicError, VisionReply};
