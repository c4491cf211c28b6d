pub mod chat;
pub mod clean;
pub mod config;
pub mod llm;
pub mod optimizer;
pub mod reverse;
pub mod template;

pub use chat::{ChatAssistant, ChatRequest};
pub use clean::clean_completion;
pub use config::{CompletionConfig, TemplateConfig};
pub use llm::{ChatMessage, CompletionBackend, ComposedPrompt, GenerationParams, Role};
pub use optimizer::PromptOptimizer;
pub use reverse::{ReverseAnalysisResult, ReverseAnalyzer, ReverseRequest};
