use std::sync::Arc;

use crate::api::error;
use crate::modules::post::{
    client::{ChatMessage, ChatModel},
    model::{GeneratePostModel, GeneratePostResponse, PostSource, PostStyle},
    prompt, template,
};

#[derive(Clone)]
pub struct PostService {
    chat: Option<Arc<dyn ChatModel>>,
}

impl PostService {
    pub fn new(chat: Option<Arc<dyn ChatModel>>) -> Self {
        match &chat {
            Some(model) => log::info!("PostService using chat model {}", model.name()),
            None => log::warn!("No chat API key configured, posts will use offline templates"),
        }
        Self { chat }
    }

    pub fn is_ai_enabled(&self) -> bool {
        self.chat.is_some()
    }

    pub async fn generate(
        &self,
        request: GeneratePostModel,
    ) -> Result<GeneratePostResponse, error::SystemError> {
        let style: PostStyle = request.style.parse()?;

        let Some(chat) = &self.chat else {
            let post = template::write_post(style, &request.context, &mut rand::thread_rng());
            return Ok(GeneratePostResponse { post, style, source: PostSource::Template });
        };

        let messages = [
            ChatMessage::system(prompt::system_prompt(style)),
            ChatMessage::user(prompt::user_prompt(
                style,
                &request.context,
                request.has_file,
                request.video_analysis.as_ref(),
            )),
        ];

        log::info!("Generating {} post", style);
        let post = chat.complete(&messages).await?;

        Ok(GeneratePostResponse { post, style, source: PostSource::Ai })
    }
}
