//! Chat command and query handlers.

mod chat_history;
mod send_chat_message;

pub use chat_history::{
    ChatHistoryHandler, ChatHistoryQuery, MarkChatReadCommand, MarkChatReadHandler,
};
pub use send_chat_message::{SendChatMessageCommand, SendChatMessageHandler};
