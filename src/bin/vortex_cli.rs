//! CLI tool for vortex-table - drives a headless grid over synthetic rows
//!
//! Usage:
//!   vortex_cli                      # 1,000,000 rows, default scroll script
//!   vortex_cli <rows>               # Custom dataset size
//!   vortex_cli <rows> --jump <row>  # Also jump straight to a row
//!
//! Set `RUST_LOG=vortex_table=debug` to see cache and paint tracing.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::rc::Rc;

use futures::executor::LocalPool;
use tracing_subscriber::EnvFilter;
use vortex_table::render::{ManualFrames, RecordingSurfaceProvider};
use vortex_table::{Column, Grid, GridOptions, InMemoryLoader, Row};

fn synthetic_rows(total: usize) -> Vec<Row> {
    (0..total)
        .map(|i| {
            Row::new(i64::try_from(i).unwrap_or(i64::MAX), i)
                .with("name", format!("Item {i}"))
                .with("value", (i % 997) as f64)
                .with("status", if i % 3 == 0 { "active" } else { "idle" })
        })
        .collect()
}

fn parse_count(arg: &str, what: &str) -> usize {
    match arg.replace('_', "").parse() {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Invalid {}: {} ({})", what, arg, e);
            std::process::exit(1);
        }
    }
}

/// Let pending fetches settle, then run queued frames.
fn settle(pool: &mut LocalPool, frames: &ManualFrames) {
    pool.run_until_stalled();
    frames.run_pending();
}

fn report(step: &str, grid: &Grid) {
    let stats = grid.last_paint();
    let drawn: Vec<&str> = stats.drawn.iter().map(|k| k.name()).collect();
    let info = serde_json::to_string(&grid.pagination_info()).unwrap();
    println!(
        "{:<18} scroll=({:.0}, {:.0}) cached={} pending={} painted={:?} page={}",
        step,
        grid.scroll().scroll_x,
        grid.scroll().scroll_y,
        grid.cache().cached_row_count(),
        grid.cache().pending_count(),
        drawn,
        info
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        eprintln!("Usage: vortex_cli [rows] [--jump <row>]");
        std::process::exit(0);
    }

    let total = args.get(1).map_or(1_000_000, |a| parse_count(a, "row count"));
    let jump = if args.len() > 3 && args[2] == "--jump" {
        Some(parse_count(&args[3], "jump row"))
    } else {
        None
    };

    let mut pool = LocalPool::new();
    let frames = ManualFrames::new();
    let options = GridOptions {
        total_rows: total,
        columns: vec![
            Column::new("name", 240.0).titled("Name"),
            Column::new("value", 160.0).titled("Value"),
            Column::new("status", 200.0).titled("Status"),
        ],
        ..GridOptions::default()
    };
    let grid = Grid::new(
        options,
        InMemoryLoader::new(synthetic_rows(total)),
        &RecordingSurfaceProvider::new(),
        Rc::new(frames.clone()),
        Rc::new(pool.spawner()),
    );
    settle(&mut pool, &frames);
    report("initial", &grid);

    for _ in 0..20 {
        grid.wheel(0.0, 120.0, false);
    }
    settle(&mut pool, &frames);
    report("wheel x20", &grid);

    grid.wheel(0.0, 300.0, true);
    settle(&mut pool, &frames);
    report("shift+wheel", &grid);

    grid.click_track(vortex_table::viewer::Axis::Vertical, 280.0);
    settle(&mut pool, &frames);
    report("track click", &grid);

    if let Some(row) = jump {
        let pending = grid.scroll_to_index(row);
        let outcome = pool.run_until(pending);
        frames.run_pending();
        report(&format!("jump {row} ({outcome:?})"), &grid);
    }

    grid.clear_cache();
    settle(&mut pool, &frames);
    report("clear cache", &grid);
}
