pub mod api;
pub mod flow;

pub use api::ApiClient;
pub use flow::{
    run_generate, run_upload, AnalysisPoll, BackendApi, FlowConfig, GenerateState, UploadState,
};
