pub mod analyzer;
pub mod client;
pub mod gemini;
pub mod handle;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod queue;
pub mod route;
pub mod service;
pub mod sidecar;

pub use analyzer::VideoAnalyzer;
pub use client::VideoModel;
pub use gemini::GeminiVideoModel;
pub use model::{AnalysisStatus, AnalysisTask, VideoAnalysis};
pub use service::AnalysisService;
