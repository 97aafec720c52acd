use log::error;

use crate::{
    api::Backend,
    model::{ChatMessage, MediaUpload},
    reconciler::Reconciler,
};

pub const CAPTION_FALLBACK: &str = "A beautiful moment captured.";
pub const CHATBOT_FALLBACK: &str =
    "Sorry, I'm having a little trouble thinking right now. Please try again later.";

impl<B: Backend> Reconciler<B> {
    /// Asks the backend to caption `media`, falling back to a stock caption.
    pub async fn generate_caption(&self, media: &MediaUpload) -> String {
        match self.backend().generate_caption(media).await {
            Ok(caption) if !caption.trim().is_empty() => caption.trim().to_string(),
            Ok(_) => CAPTION_FALLBACK.to_string(),
            Err(e) => {
                error!("Error generating caption: {}", e);
                CAPTION_FALLBACK.to_string()
            }
        }
    }

    /// Continues the assistant conversation with `text` and returns the reply.
    pub async fn ask_chatbot(&self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let history = self.store().update(|state| {
            state.chat.push(ChatMessage::user(text));
            state.chat.clone()
        });

        let reply = match self.backend().chatbot(&history).await {
            Ok(reply) => reply.trim().to_string(),
            Err(e) => {
                error!("Error getting chatbot response: {}", e);
                CHATBOT_FALLBACK.to_string()
            }
        };

        self.store()
            .update(|state| state.chat.push(ChatMessage::ai(reply.clone())));
        Some(reply)
    }
}
