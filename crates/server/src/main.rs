//! Line-oriented harness for the query service.
//!
//! Reads one request per line from stdin (`developer Valve`,
//! `recommend 10 5`, ...) and writes one JSON document per line to stdout.
//! Requests are served concurrently; responses carry the request line they
//! answer so they can be matched up when they arrive out of order.
//!
//! Usage: `steam-recs-server [DATA_DIR] [MODEL_PATH]`
//! (`STEAM_RECS_DATA` overrides the default `data` directory).

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use server::{Query, QueryService};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,server=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let data_dir = args
        .next()
        .map(PathBuf::from)
        .or_else(|| env::var_os("STEAM_RECS_DATA").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data"));
    let model_path = args.next().map(PathBuf::from);

    info!("Loading snapshot from {}", data_dir.display());
    let service = QueryService::load(&data_dir, model_path.as_deref())?;

    let stdin = BufReader::new(tokio::io::stdin());
    serve(service, stdin, tokio::io::stdout()).await?;

    info!("Input closed, shutting down");
    Ok(())
}

/// Answer every request line from `input` on `output`, one JSON document
/// per line, and hand `output` back once input is exhausted and every
/// response has been written.
async fn serve<R, W>(service: QueryService, input: R, mut output: W) -> Result<W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    // Single writer so concurrent responses never interleave mid-line
    let writer = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            output.write_all(line.as_bytes()).await?;
            output.write_all(b"\n").await?;
            output.flush().await?;
        }
        Ok::<_, std::io::Error>(output)
    });

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        // Each task owns a sender; the writer stops once all are gone
        let service = service.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let body = match line.parse::<Query>() {
                Ok(query) => match service.execute(query).await {
                    Ok(response) => json!({ "request": line, "response": response }),
                    Err(e) => json!({ "request": line, "error": e.to_string() }),
                },
                Err(e) => {
                    warn!("Rejected request '{}': {}", line, e);
                    json!({ "request": line, "error": e.to_string() })
                }
            };
            let _ = tx.send(body.to_string());
        });
    }
    drop(tx);

    Ok(writer.await??)
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{DataIndex, Game, LibraryEntry};
    use recommender::ItemModel;
    use std::sync::Arc;

    fn create_service() -> QueryService {
        let games = vec![Game {
            id: 10,
            app_name: "Counter-Strike".to_string(),
            developer: Some("Valve".to_string()),
            genres: "Action".to_string(),
            release_year: Some(2000),
            price: Some(9.99),
        }];
        let library = vec![LibraryEntry {
            user_id: "A".to_string(),
            item_id: 10,
            playtime_forever: 5.0,
        }];
        let model = ItemModel::from_library(&library);
        let index = DataIndex::from_records(games, vec![], library).unwrap();
        QueryService::new(Arc::new(index), Arc::new(model))
    }

    #[tokio::test]
    async fn test_every_request_gets_one_response_line() {
        let mut input = String::new();
        for i in 0..50 {
            input.push_str(&format!("user u{}\n\n", i));
        }
        input.push_str("recommend 10\nnonsense here\n");

        let output = serve(create_service(), input.as_bytes(), Vec::new()).await.unwrap();
        let text = String::from_utf8(output).unwrap();
        let responses: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(responses.len(), 52);
        assert!(responses.iter().any(|r| r["request"] == "nonsense here" && r["error"].is_string()));
        assert!(responses
            .iter()
            .any(|r| r["request"] == "recommend 10" && r["response"]["status"] == "found"));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        // Dropping the read half makes every write fail with BrokenPipe
        let (write_half, read_half) = tokio::io::duplex(64);
        drop(read_half);

        let result = serve(create_service(), "user A\n".as_bytes(), write_half).await;
        assert!(result.is_err());
    }
}
