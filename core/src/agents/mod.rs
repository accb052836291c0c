pub mod analyst;
pub mod vision;

// Re-export commonly used types
pub use analyst::{AnalystAgent, AnalystResult};
pub use vision::{VisionAgent, VisionAgentResult};
