mod app;
mod generation;
mod github;
mod llm;
mod network;

pub use app::{AppConfig, UIConfig};
pub use generation::{GenerationConfig, TestFramework};
pub use github::GitHubConfig;
pub use llm::LLMConfig;
pub use network::NetworkConfig;
