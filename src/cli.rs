//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_trades::CsvTradeAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::scoring::FixedScoring;
use crate::domain::aggregate;
use crate::domain::codec::{parse_filters, serialize_filters};
use crate::domain::emotion::emotion_leaning;
use crate::domain::error::JournalError;
use crate::domain::psychology;
use crate::ports::config_port::ConfigPort;
use crate::ports::scoring_port::ScoringPort;
use crate::ports::trade_port::TradePort;

#[derive(Parser, Debug)]
#[command(name = "tradelog", about = "Trading journal filter and analytics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply a filter query to a trades CSV and print the matches
    Filter {
        #[arg(short, long)]
        trades: PathBuf,
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Print the analytics document for a trades CSV
    Analytics {
        #[arg(short, long)]
        trades: PathBuf,
        #[arg(short, long)]
        query: Option<String>,
        #[arg(long)]
        discipline: Option<f64>,
        #[arg(long)]
        tilt: Option<f64>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the canonical form of a filter query string
    Canonicalize {
        #[arg(short, long)]
        query: String,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Filter { trades, query } => run_filter(&trades, query.as_deref()),
        Command::Analytics {
            trades,
            query,
            discipline,
            tilt,
            config,
        } => run_analytics(&trades, query.as_deref(), discipline, tilt, config.as_ref()),
        Command::Canonicalize { query } => run_canonicalize(&query),
        Command::Serve { config } => run_serve(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = JournalError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_trades(path: &PathBuf) -> Result<Vec<crate::domain::trade::Trade>, ExitCode> {
    let adapter = CsvTradeAdapter::new(path.clone());
    adapter.fetch_trades().map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn run_filter(trades_path: &PathBuf, query: Option<&str>) -> ExitCode {
    let trades = match load_trades(trades_path) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let filters = parse_filters(query.unwrap_or(""));
    let matched = aggregate::apply(&trades, &filters);
    eprintln!("{} of {} trades match", matched.len(), trades.len());

    println!("id,symbol,market,side,pnl,trade_date,strategy_id");
    for trade in &matched {
        println!(
            "{},{},{},{},{},{},{}",
            trade.id,
            trade.symbol,
            trade.market,
            trade.side.map(|s| s.as_str()).unwrap_or(""),
            trade.pnl.map(|p| p.to_string()).unwrap_or_default(),
            trade.trade_date.format("%Y-%m-%d"),
            trade.strategy_id.as_deref().unwrap_or(""),
        );
    }
    ExitCode::SUCCESS
}

fn run_analytics(
    trades_path: &PathBuf,
    query: Option<&str>,
    discipline: Option<f64>,
    tilt: Option<f64>,
    config_path: Option<&PathBuf>,
) -> ExitCode {
    let trades = match load_trades(trades_path) {
        Ok(t) => t,
        Err(code) => return code,
    };

    // Raw score source: explicit flags win, then config, then midpoint.
    let (raw_discipline, raw_tilt) = match config_path {
        Some(path) => {
            let config = match load_config(path) {
                Ok(c) => c,
                Err(code) => return code,
            };
            (
                discipline.unwrap_or_else(|| config.get_double("scoring", "discipline", 50.0)),
                tilt.unwrap_or_else(|| config.get_double("scoring", "tilt", 50.0)),
            )
        }
        None => (discipline.unwrap_or(50.0), tilt.unwrap_or(50.0)),
    };

    let filters = parse_filters(query.unwrap_or(""));
    let filtered = aggregate::apply(&trades, &filters);

    let emotional_data = emotion_leaning(&filtered);
    let scoring = FixedScoring::new(raw_discipline, raw_tilt);
    let (d, t) = scoring.raw_scores(&filtered);
    let metrics = psychology::correct(d, t);

    let document = serde_json::json!({
        "emotionalData": emotional_data,
        "psychologicalMetrics": {
            "disciplineLevel": metrics.discipline_level,
            "tiltControl": metrics.tilt_control,
        },
        "validationWarnings": metrics.validation_warnings,
    });

    match serde_json::to_string_pretty(&document) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to render analytics: {e}");
            ExitCode::from(1)
        }
    }
}

fn run_canonicalize(query: &str) -> ExitCode {
    let canonical = serialize_filters(&parse_filters(query));
    println!("{canonical}");
    ExitCode::SUCCESS
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{build_router, AppState};
        use crate::domain::config_validation::{validate_journal_config, validate_server_config};
        use std::net::SocketAddr;
        use std::sync::Arc;

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        if let Err(e) = validate_journal_config(&config).and_then(|_| validate_server_config(&config))
        {
            eprintln!("error: {e}");
            return (&e).into();
        }

        let trades_path = config
            .get_string("storage", "trades_path")
            .unwrap_or_default();
        let trades = Arc::new(CsvTradeAdapter::new(PathBuf::from(trades_path)))
            as Arc<dyn TradePort + Send + Sync>;

        let scoring = Arc::new(FixedScoring::new(
            config.get_double("scoring", "discipline", 50.0),
            config.get_double("scoring", "tilt", 50.0),
        )) as Arc<dyn ScoringPort + Send + Sync>;

        let addr: SocketAddr = match config
            .get_string("server", "bind")
            .unwrap_or_else(|| "127.0.0.1:8080".to_string())
            .parse()
        {
            Ok(a) => a,
            Err(e) => {
                eprintln!("error: invalid [server] bind: {e}");
                return ExitCode::from(2);
            }
        };

        eprintln!("Starting web server on {addr}");

        let state = AppState {
            trades,
            scoring,
            config: Arc::new(config),
        };
        let router = build_router(state);

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: failed to start runtime: {e}");
                return ExitCode::from(1);
            }
        };

        let served: Result<(), std::io::Error> = runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await
        });

        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::from(1)
            }
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
