use chat_service::{
    config, db, error, logging, middleware, migrations, realtime::RedisNotifier, routes,
    services::{ConversationService, KafkaNotificationProducer, MessageService},
    state::AppState,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), error::AppError> {
    logging::init_tracing();
    let cfg = Arc::new(config::Config::from_env()?);

    let db = db::init_pool(&cfg)
        .await
        .map_err(|e| error::AppError::StartServer(format!("db: {e}")))?;

    // Treat migration failures as fatal - the database schema must be in sync
    migrations::run_all(&db)
        .await
        .map_err(|e| error::AppError::StartServer(format!("database migrations failed: {e}")))?;

    let redis_client = redis::Client::open(cfg.redis_url.as_str())
        .map_err(|e| error::AppError::StartServer(format!("redis: {e}")))?;
    let realtime = Arc::new(RedisNotifier::new(
        redis_client,
        cfg.chat_events_channel.clone(),
    ));

    let notifications = Arc::new(
        KafkaNotificationProducer::new(&cfg.kafka_brokers)
            .map_err(|e| error::AppError::StartServer(format!("kafka: {e}")))?,
    );

    let state = AppState {
        db: db.clone(),
        conversations: ConversationService::new(db.clone()),
        messages: MessageService::new(db, realtime, notifications),
        config: cfg.clone(),
    };

    let app = middleware::with_defaults(routes::build_router()).with_state(state);

    let bind_addr = format!("0.0.0.0:{}", cfg.port);
    tracing::info!(%bind_addr, "starting chat-service");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| error::AppError::StartServer(e.to_string()))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| error::AppError::StartServer(e.to_string()))?;

    Ok(())
}
