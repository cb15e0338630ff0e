use crate::api::error;

/// A generative model that can look at a whole video and answer a prompt.
#[async_trait::async_trait]
pub trait VideoModel: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Sends `prompt` together with the inline video and returns the reply text.
    async fn describe_video(
        &self,
        prompt: &str,
        video: &[u8],
        mime_type: &str,
    ) -> Result<String, error::SystemError>;
}
