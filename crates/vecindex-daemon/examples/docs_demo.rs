//! Demo: build a small index and query it
//!
//! Usage:
//! ```bash
//! cargo run --example docs_demo
//! ```
//!
//! Connects to a running daemon, creates a three-dimensional index under a
//! fresh key, appends the unit basis and runs a few searches.

use vecindex_client::VectorIndexClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let endpoint =
        std::env::var("VECINDEX_ENDPOINT").unwrap_or_else(|_| "http://[::1]:50051".to_string());

    println!("Connecting to vecindex daemon at {}...", endpoint);
    let mut client = VectorIndexClient::connect(&endpoint).await?;

    let key = format!("demo-{}", std::process::id());
    let dimension = client.create_index(&key, 3).await?;
    println!("Created index '{}' (dimension {})", key, dimension);

    let added = client
        .add_vectors(
            &key,
            vec![
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
                vec![1.0, 1.0, 0.0],
            ],
        )
        .await?;
    println!("{}", added.message);

    let queries = [vec![1.0, 0.0, 0.0], vec![2.0, 2.0, 0.1], vec![0.0, 0.0, -1.0]];
    for query in queries {
        let hits = client.search(&key, query.clone(), Some(3)).await?;
        println!("query {:?}", query);
        for (id, score) in hits.ids.iter().zip(hits.scores.iter()) {
            println!("  id={} score={:.4}", id, score);
        }
    }

    let stats = client.index_stats(&key).await?;
    println!(
        "Index '{}': {} vectors of dimension {}",
        stats.key, stats.vector_count, stats.dimension
    );

    Ok(())
}
