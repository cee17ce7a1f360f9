//! # Example: Launch a supervised application
//!
//! Demonstrates:
//! - Stacking replicas, retry and panic recovery around a flaky runnable.
//! - Injecting the built-in `tracing` logger.
//! - Running it next to a long-lived runnable under one `Launcher`.
//! - Stopping everything with Ctrl-C.
//!
//! ## Flow
//! ```text
//! launch([app, heartbeat])
//!   ├─► app = replicas(3) → retry(1, 2s) → recover → trace → flaky
//!   │     each replica: fails once, waits 2s → RetryExhausted
//!   │     first failing replica cancels its siblings → Replica { index, .. }
//!   └─► heartbeat: ticks until cancelled
//! launcher: first member error cancels heartbeat → Group { index: 0, name, .. }
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example launch
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use taskchain::{Chain, LogWriter, RunFn, Runnable, RunnableRef, TaskError, launch};

/// Runnable that fails on every call and reports how many calls it has seen.
fn flaky() -> RunnableRef {
    let calls = Arc::new(AtomicU32::new(0));
    RunFn::new(move |ctx: CancellationToken| {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            tokio::select! {
                _ = ctx.cancelled() => Err::<(), _>(TaskError::Canceled),
                _ = tokio::time::sleep(Duration::from_millis(300)) => {
                    Err(TaskError::fail(format!("upstream unavailable (call {n})")))
                }
            }
        }
    })
    .with_name("flaky")
    .into_ref()
}

/// Runnable that ticks until cancelled.
fn heartbeat() -> RunnableRef {
    RunFn::new(|ctx: CancellationToken| async move {
        let mut tick = tokio::time::interval(Duration::from_millis(500));
        loop {
            tokio::select! {
                _ = ctx.cancelled() => {
                    println!("[heartbeat] stopping");
                    return Ok::<_, TaskError>(());
                }
                _ = tick.tick() => println!("[heartbeat] alive"),
            }
        }
    })
    .with_name("heartbeat")
    .into_ref()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let chain = Chain::new()
        .replicas(3)
        .retry(1, Duration::from_secs(2))
        .recover()
        .on_cancel(|| println!("[app] cancelled, cleaning up"))
        .extend(|next: RunnableRef| {
            RunFn::new(move |ctx: CancellationToken| {
                let next = Arc::clone(&next);
                async move {
                    println!("[trace] -> {}", next.name());
                    let res = next.run(ctx).await;
                    println!("[trace] <- {} ok={}", next.name(), res.is_ok());
                    res
                }
            })
            .with_name("trace")
            .into_ref()
        })
        .with_logger(Arc::new(LogWriter));

    let app = chain.apply(flaky());
    let root = launch([app, heartbeat()]);

    let token = CancellationToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                println!("[main] ctrl-c, cancelling");
                token.cancel();
            }
        });
    }

    match root.run(token).await {
        Ok(()) => println!("[main] finished"),
        Err(e) if e.is_canceled() => println!("[main] cancelled: {e}"),
        Err(e) => println!("[main] failed: {e}"),
    }
    Ok(())
}
