use serde::{ Serialize, Deserialize };

use super::chat::Suggestion;

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "chat")] Chat {
        content: String,
    },
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "welcome")] Welcome {
        conversation_id: String,
        suggestions: Vec<Suggestion>,
        contact_link: String,
    },
    #[serde(rename = "typing")]
    Typing,
    #[serde(rename = "response")] Response {
        content: String,
        show_suggestions: bool,
        suggestions: Vec<Suggestion>,
        timestamp: i64,
    },
    #[serde(rename = "error")] Error {
        message: String,
    },
}
