//! Memocache CLI
//!
//! Demonstrates the TTL memoization cache: a hit/miss/expiry walkthrough and a
//! multi-threaded stress run.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use memocache::{CacheConfig, TtlCache};

/// Memocache - thread-safe memoization with per-entry TTL
#[derive(Parser)]
#[command(name = "memocache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON cache configuration file
    #[arg(short, long, global = true, env = "MEMOCACHE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through a hit, a miss, and an expiry-triggered recompute
    Demo {
        /// Key whose length is memoized
        #[arg(short, long, default_value = "apple")]
        key: String,
        /// TTL in seconds (defaults to the configured TTL)
        #[arg(short, long)]
        ttl_secs: Option<u64>,
        /// Seconds to wait before the third call
        #[arg(short, long, default_value = "6")]
        delay_secs: u64,
    },

    /// Hammer one cache from many threads with a slow computation
    Stress {
        /// Number of worker threads
        #[arg(short, long, default_value = "8")]
        threads: usize,
        /// Number of distinct keys
        #[arg(short, long, default_value = "4")]
        keys: usize,
        /// Lookups per thread
        #[arg(short, long, default_value = "100")]
        ops: usize,
        /// Simulated work per computation, in milliseconds
        #[arg(short, long, default_value = "50")]
        work_ms: u64,
        /// TTL in seconds (defaults to the configured TTL)
        #[arg(long)]
        ttl_secs: Option<u64>,
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "memocache=debug,info"
    } else {
        "memocache=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => CacheConfig::default(),
    };

    match cli.command {
        Commands::Demo {
            key,
            ttl_secs,
            delay_secs,
        } => {
            let ttl = ttl_secs.map_or_else(|| config.default_ttl(), Duration::from_secs);
            cmd_demo(config, &key, ttl, Duration::from_secs(delay_secs))
        }
        Commands::Stress {
            threads,
            keys,
            ops,
            work_ms,
            ttl_secs,
            json,
        } => {
            let ttl = ttl_secs.map_or_else(|| config.default_ttl(), Duration::from_secs);
            cmd_stress(config, threads, keys, ops, Duration::from_millis(work_ms), ttl, json)
        }
    }
}

/// Load a JSON config, telling unreadable input apart from bad values
fn load_config(path: &Path) -> Result<CacheConfig> {
    CacheConfig::from_file(path).map_err(|err| {
        let what = if err.is_input_error() {
            "Failed to read config"
        } else {
            "Invalid config"
        };
        anyhow::Error::new(err).context(format!("{} {}", what, path.display()))
    })
}

/// Hit, miss, and expiry walkthrough
fn cmd_demo(config: CacheConfig, key: &str, ttl: Duration, delay: Duration) -> Result<()> {
    println!(
        "{} ttl={:?}, delay={:?}",
        "🧮 Memoizing string length".cyan().bold(),
        ttl,
        delay
    );

    let cache: TtlCache<String, usize> = TtlCache::with_config(config);
    let calculate_length = |s: &String| {
        info!("Calculating length for '{}'", s);
        s.len()
    };

    let first = cache.get_or_compute(key.to_string(), calculate_length, ttl);
    println!("   {} '{}': {}", "Length of".dimmed(), key, first);

    let second = cache.get_or_compute(key.to_string(), calculate_length, ttl);
    println!("   {} '{}' (from cache): {}", "Length of".dimmed(), key, second);

    wait_with_progress(delay)?;

    let third = cache.get_or_compute(key.to_string(), calculate_length, ttl);
    println!("   {} '{}' (after expiration): {}", "Length of".dimmed(), key, third);

    let stats = cache.stats();
    println!(
        "\n{} {} hits, {} misses",
        "✅ Done:".green().bold(),
        stats.hits,
        stats.misses
    );

    Ok(())
}

/// Concurrent load against a single cache
fn cmd_stress(
    config: CacheConfig,
    threads: usize,
    keys: usize,
    ops: usize,
    work: Duration,
    ttl: Duration,
    json: bool,
) -> Result<()> {
    if threads == 0 || keys == 0 {
        bail!("--threads and --keys must both be at least 1");
    }

    println!(
        "{} {} threads x {} ops over {} keys",
        "🔥 Stress run:".cyan().bold(),
        threads,
        ops,
        keys
    );

    let cache: Arc<TtlCache<String, usize>> = Arc::new(TtlCache::with_config(config));
    let computations = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(threads));
    let started = Instant::now();

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let computations = Arc::clone(&computations);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..ops {
                    let key = format!("key-{}", (t + i) % keys);
                    cache.get_or_compute(
                        key,
                        |k| {
                            computations.fetch_add(1, Ordering::Relaxed);
                            thread::sleep(work);
                            k.len()
                        },
                        ttl,
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            bail!("worker thread panicked");
        }
    }

    let elapsed = started.elapsed();
    let stats = cache.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("\n{}", "📊 Results:".green().bold());
    println!("   {} {:?}", "Elapsed:".dimmed(), elapsed);
    println!("   {} {}", "Computations:".dimmed(), computations.load(Ordering::Relaxed));
    println!("   {} {}", "Hits:".dimmed(), stats.hits);
    println!("   {} {}", "Misses:".dimmed(), stats.misses);
    println!("   {} {:.1}%", "Hit rate:".dimmed(), stats.hit_rate() * 100.0);
    println!(
        "   {} {} ({} stale)",
        "Entries:".dimmed(),
        stats.total_entries,
        stats.stale_entries
    );

    Ok(())
}

fn wait_with_progress(delay: Duration) -> Result<()> {
    const TICK: Duration = Duration::from_millis(100);

    let ticks = u64::try_from(delay.as_millis() / TICK.as_millis()).unwrap_or(u64::MAX);
    let remainder = Duration::from_nanos((delay.as_nanos() % TICK.as_nanos()) as u64);
    let pb = ProgressBar::new(ticks);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} waiting [{bar:40.cyan/blue}] {elapsed_precise}")?
            .progress_chars("#>-"),
    );

    for _ in 0..ticks {
        thread::sleep(TICK);
        pb.inc(1);
    }
    thread::sleep(remainder);
    pb.finish_and_clear();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read config"));
    }

    #[test]
    fn test_load_config_out_of_range() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"initial_capacity": 99999999}}"#).unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid config"));
    }

    #[test]
    fn test_load_config_ok() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_ttl_ms": 250}}"#).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.default_ttl(), Duration::from_millis(250));
    }

    #[test]
    fn test_wait_with_progress_sub_tick_delay() {
        let started = Instant::now();
        wait_with_progress(Duration::from_millis(30)).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
