//! Command-line driver: perft, divide and search over a FEN.
//!
//! ```text
//! tern perft <depth> [fen <fen>]
//! tern divide <depth> [fen <fen>]
//! tern search [depth <n>] [movetime <ms>] [nodes <n>] [threads <n>] [fen <fen>] [moves <m>...]
//! ```

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use tern_core::{Position, STARTING_FEN, divide, perft};
use tern_engine::{MaterialEvaluator, SearchConfig, SearchLimits, SearchResult, search_parallel};
use tracing::info;

#[derive(Debug)]
enum Command {
    Perft { depth: usize, fen: String },
    Divide { depth: usize, fen: String },
    Search(SearchArgs),
}

#[derive(Debug)]
struct SearchArgs {
    limits: SearchLimits,
    threads: usize,
    fen: String,
    moves: Vec<String>,
}

fn parse_number<T: std::str::FromStr>(name: &str, token: Option<&&str>) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let token = token.with_context(|| format!("`{name}` needs a value"))?;
    token.parse().with_context(|| format!("invalid {name} `{token}`"))
}

/// Everything after `fen` up to `moves` (or the end) is the FEN.
fn take_fen<'a, 'b>(tokens: &'a [&'b str]) -> (String, &'a [&'b str]) {
    let end = tokens.iter().position(|&t| t == "moves").unwrap_or(tokens.len());
    (tokens[..end].join(" "), &tokens[end..])
}

fn parse_command(tokens: &[&str]) -> Result<Command> {
    let Some((&name, rest)) = tokens.split_first() else {
        bail!("expected a command: perft, divide or search");
    };

    match name {
        "perft" | "divide" => {
            let depth = parse_number("depth", rest.first())?;
            let fen = match rest.get(1..) {
                Some(["fen", fen @ ..]) if !fen.is_empty() => fen.join(" "),
                Some([]) | None => STARTING_FEN.to_string(),
                Some(other) => bail!("unexpected arguments after depth: {}", other.join(" ")),
            };
            Ok(if name == "perft" {
                Command::Perft { depth, fen }
            } else {
                Command::Divide { depth, fen }
            })
        }
        "search" => parse_search(rest).map(Command::Search),
        other => bail!("unknown command `{other}`"),
    }
}

fn parse_search(tokens: &[&str]) -> Result<SearchArgs> {
    let mut args = SearchArgs {
        limits: SearchLimits::default(),
        threads: 1,
        fen: STARTING_FEN.to_string(),
        moves: Vec::new(),
    };
    let mut depth_given = false;
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                args.limits.depth = SearchLimits::depth(parse_number("depth", tokens.get(i + 1))?).depth;
                depth_given = true;
                i += 2;
            }
            "movetime" => {
                args.limits.movetime = Some(Duration::from_millis(parse_number("movetime", tokens.get(i + 1))?));
                i += 2;
            }
            "nodes" => {
                args.limits.nodes = Some(parse_number("nodes", tokens.get(i + 1))?);
                i += 2;
            }
            "threads" => {
                args.threads = parse_number("threads", tokens.get(i + 1))?;
                i += 2;
            }
            "fen" => {
                let (fen, rest) = take_fen(&tokens[i + 1..]);
                if fen.is_empty() {
                    bail!("`fen` needs a position");
                }
                args.fen = fen;
                i = tokens.len() - rest.len();
            }
            "moves" => {
                args.moves = tokens[i + 1..].iter().map(|t| t.to_string()).collect();
                break;
            }
            other => bail!("unexpected search argument `{other}`"),
        }
    }
    // Without any bound the search would never end.
    if !depth_given && args.limits.movetime.is_none() && args.limits.nodes.is_none() {
        args.limits.depth = 6;
    }
    Ok(args)
}

fn parse_position(fen: &str) -> Result<Position> {
    fen.parse().with_context(|| format!("invalid FEN `{fen}`"))
}

fn run_search(args: SearchArgs) -> Result<SearchResult> {
    let mut pos = parse_position(&args.fen)?;
    let mut history = Vec::with_capacity(args.moves.len());
    for text in &args.moves {
        let mv = pos.parse_move(text);
        if mv.is_null() {
            bail!("illegal move `{text}` in {pos}");
        }
        history.push(pos);
        pos.make_move(mv);
    }

    let config = SearchConfig {
        threads: args.threads,
        ..SearchConfig::default()
    };
    let result = search_parallel(
        &pos,
        &history,
        &args.limits,
        &config,
        MaterialEvaluator,
        Arc::new(AtomicBool::new(false)),
    )
    .context("invalid search configuration")?;
    Ok(result)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let tokens: Vec<&str> = args.iter().map(String::as_str).collect();
    let command = parse_command(&tokens)?;
    info!(?command, "tern starting");

    match command {
        Command::Perft { depth, fen } => {
            let pos = parse_position(&fen)?;
            let start = Instant::now();
            let nodes = perft(&pos, depth);
            let elapsed = start.elapsed();
            println!("{nodes}");
            info!(depth, nodes, elapsed_ms = elapsed.as_millis() as u64, "perft complete");
        }
        Command::Divide { depth, fen } => {
            let pos = parse_position(&fen)?;
            let split = divide(&pos, depth);
            for (mv, nodes) in &split {
                println!("{mv}: {nodes}");
            }
            println!("\n{}", split.iter().map(|(_, n)| n).sum::<u64>());
        }
        Command::Search(args) => {
            let result = run_search(args)?;
            let pv = result.pv.iter().map(|mv| mv.to_uci()).collect::<Vec<_>>().join(" ");
            match result.mate_in() {
                Some(plies) => println!("score mate {plies} depth {} nodes {}", result.depth, result.nodes),
                None => println!("score cp {} depth {} nodes {}", result.score, result.depth, result.nodes),
            }
            println!("pv {pv}");
            println!("bestmove {}", result.best_move);
        }
    }
    Ok(())
}
