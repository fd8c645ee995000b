//! Tutoring server binary
//!
//! Run with: cargo run -p tutor-rag --bin tutor-rag-server

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tutor_rag::{config::TutorConfig, server::TutorServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tutor_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = TutorConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Chat model: {}", config.llm.chat_model);
    tracing::info!("  - Generation model: {}", config.llm.generation_model);
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - Vector store: {}", config.store.base_url);
    tracing::info!(
        "  - Chunk sizes: retrieval {} / generation {}",
        config.chunking.retrieval_chunk_size,
        config.chunking.generation_chunk_size
    );

    // Probe the vector store; sessions fail fast if it stays unreachable
    let client = reqwest::Client::new();
    let ready_url = format!(
        "{}/v1/.well-known/ready",
        config.store.base_url.trim_end_matches('/')
    );
    match client.get(&ready_url).send().await {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Vector store is ready");
        }
        _ => {
            tracing::warn!("Vector store not reachable at {}", config.store.base_url);
            tracing::warn!("Document loading will fail until it is up");
        }
    }

    // Create and start the server
    let server = TutorServer::new(config);

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /session/load - Upload a document");
    println!("  POST /chat         - Ask grounded questions");
    println!("  POST /summary      - Summarize a document");
    println!("  POST /flashcard    - Generate flashcards");
    println!("  POST /quiz         - Generate a quiz");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
