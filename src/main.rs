use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use voxline::config::{PipelineConfig, SynthesisConfig};
use voxline::outputs::deliver_all;
use voxline::services::synthesis::{HttpSynthesizer, SilenceSynthesizer, Synthesizer};
use voxline::SegmentQueue;

const USAGE: &str = "usage: voxline <input.txt> [out_dir]";
const HELP: &str = "Commands: status | stop | continue | restart | clear | merge | telemetry | quit";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Setup Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut args = std::env::args().skip(1);
    let input = args.next().map(PathBuf::from).context(USAGE)?;
    let out_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("output"));

    let text = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("reading {}", input.display()))?;

    // 2. Setup Synthesis Backend + Queue
    let config = PipelineConfig::default();
    let synthesizer: Arc<dyn Synthesizer> = if dry_run() {
        tracing::info!("VOXLINE_DRY_RUN set: synthesizing one second of silence per segment");
        Arc::new(SilenceSynthesizer::seconds(config.sample_rate, 1.0))
    } else {
        Arc::new(HttpSynthesizer::new(SynthesisConfig::from_env()?)?)
    };
    let queue = Arc::new(SegmentQueue::new(synthesizer, config)?);

    // 3. Progress Reporter
    let mut progress = queue.subscribe();
    tokio::spawn(async move {
        let mut last = None;
        while progress.changed().await.is_ok() {
            let snap = progress.borrow_and_update().clone();
            let line = (snap.completed, snap.failed, snap.total);
            if last != Some(line) {
                println!(
                    "[PROGRESS] {}% ({} done, {} failed, {} total)",
                    snap.progress_percent, snap.completed, snap.failed, snap.total
                );
                last = Some(line);
            }
        }
    });

    spawn_run(Arc::clone(&queue), Some(text.clone()));

    // 4. Console Commands
    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim().to_ascii_lowercase().as_str() {
            "" => continue,
            "status" => println!("{}", serde_json::to_string_pretty(&queue.snapshot())?),
            "telemetry" => println!("{}", serde_json::to_string_pretty(&queue.telemetry().await)?),
            "stop" => {
                if let Err(e) = queue.stop().await {
                    println!("[ERROR] {}", e);
                }
            }
            "continue" => spawn_run(Arc::clone(&queue), None),
            "restart" => spawn_run(Arc::clone(&queue), Some(text.clone())),
            "clear" => queue.clear().await,
            "merge" => match deliver_all(&out_dir, &queue).await {
                Ok(paths) => {
                    for path in paths {
                        println!("[FILE] {}", path.display());
                    }
                }
                Err(e) => println!("[ERROR] {}", e),
            },
            "quit" | "exit" => break,
            other => println!("Unknown command '{}'. {}", other, HELP),
        }
    }

    Ok(())
}

fn dry_run() -> bool {
    std::env::var("VOXLINE_DRY_RUN").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Drives a run in the background so the console stays responsive to `stop`.
fn spawn_run(queue: Arc<SegmentQueue>, text: Option<String>) {
    tokio::spawn(async move {
        let result = match text {
            Some(text) => queue.start(&text).await,
            None => queue.continue_run().await,
        };
        match result {
            Ok(outcome) => tracing::info!("Run ended: {:?}", outcome),
            Err(e) => println!("[ERROR] {}", e),
        }
    });
}
