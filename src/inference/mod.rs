pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{CompletionClient, CompletionRequest, ProviderError};
pub use providers::ChatCompletionsProvider;
pub use types::{Message, Role};
