use crate::{
    config::Config,
    services::{ConversationService, MessageService},
};
use sqlx::{Pool, Postgres};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Postgres>,
    pub conversations: ConversationService,
    pub messages: MessageService,
    pub config: Arc<Config>,
}
