pub mod client;
pub mod gateway;
pub mod handle;
pub mod model;
pub mod prompt;
pub mod route;
pub mod service;
pub mod template;

pub use client::{ChatMessage, ChatModel};
pub use gateway::ChatCompletionsModel;
pub use model::{GeneratePostModel, GeneratePostResponse, PostSource, PostStyle};
pub use service::PostService;
