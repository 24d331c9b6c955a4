use clap::{Parser, Subcommand};
use collatz_longest::*;
use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use tracing::Level;

#[derive(Parser)]
#[command(name = "collatz-longest")]
#[command(about = "コラッツ軌道の最長探索 (並列・停止可能・u64 オーバーフロー検出)")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    /// DEBUG レベルのログを出す
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// [1, LIMIT] の中で最長の軌道を持つ開始値を探す (Enter で停止)
    Search {
        /// 探索範囲の上限 (含む)
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        limit: u64,
        /// ワーカースレッド数 (省略時は CPU 数、0 は 1 として扱う)
        #[arg(short, long)]
        workers: Option<usize>,
    },
    /// 1つの開始値の軌道を表示する
    Trace {
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        n: u64,
    },
}

fn init_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Commands::Search { limit, workers } => cmd_search(limit, workers),
        Commands::Trace { n } => {
            cmd_trace(n);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("エラー: {}", e);
        std::process::exit(1);
    }
}

fn cmd_search(limit: u64, workers: Option<usize>) -> Result<()> {
    let request = SearchRequest::new(limit, workers.unwrap_or_else(rayon::current_num_threads));
    println!("最長軌道探索: [1, {}], {}スレッド", request.limit(), request.workers());
    eprintln!("(Enter で停止)");

    let engine = Arc::new(SearchEngine::new());
    engine.reset_stop();

    // 標準入力が閉じている場合 (read_line が 0 を返す) は停止しない
    let stopper = Arc::clone(&engine);
    thread::spawn(move || {
        let mut line = String::new();
        if let Ok(n) = std::io::stdin().lock().read_line(&mut line) {
            if n > 0 {
                stopper.request_stop();
            }
        }
    });

    let report = engine.run(request.limit(), request.workers())?;

    println!();
    println!("{}", report.summary_message());
    if let Some(best) = report.best_start() {
        if let Ok(t) = trajectory(best) {
            println!("Peak: {}", t.peak);
        }
    }
    Ok(())
}

fn cmd_trace(n: u64) {
    let t = match trajectory(n) {
        Ok(t) => t,
        Err(e) => {
            println!("{}", OVERFLOW_MESSAGE);
            println!("({})", e);
            return;
        }
    };

    // 画面表示（長すぎる場合は省略）
    let show_limit = 50;
    println!("軌道追跡: n={}", n);
    println!("  {:>6}  {:>20}", "step", "n");
    for (i, v) in t.values.iter().enumerate() {
        if i < show_limit || i >= t.len().saturating_sub(5) {
            println!("  {:>6}  {:>20}", i, v);
        } else if i == show_limit {
            println!("  ... ({} ステップ省略) ...", t.len().saturating_sub(show_limit + 5));
        }
    }

    println!();
    println!("--- 結果 ---");
    println!("軌道長 (開始値を含む) = {}", t.len());
    println!("ステップ数             = {}", t.len().saturating_sub(1));
    println!("最大値                 = {}", t.peak);
}
