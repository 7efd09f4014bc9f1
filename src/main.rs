//! EcoPlay CLI
//!
//! Usage:
//!   ecoplay --serve                          # HTTP API server
//!   ecoplay --serve --dev                    # server with auth bypass
//!   ecoplay --simulate public_goods          # local round simulation
//!   ecoplay --simulate trust_game_trustor --rounds 5 --seed 42
//!   ecoplay --simulate public_goods --json   # JSON output

use clap::Parser;
use colored::Colorize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::str::FromStr;
use std::sync::Arc;

use ecoplay::core::{advisor, public_goods, trust};
use ecoplay::core::{AppState, MemoryStore, RecordNumberVerifier};
use ecoplay::types::{
    GameType, PerformanceData, PublicGoodsRequest, TrustDecision, TrustRequest,
};
use ecoplay::{INITIAL_POINTS, MAX_SIMULATED_DONATION, TOTAL_ROUNDS, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "ecoplay",
    version = VERSION,
    about = "EcoPlay - behavioral-economics experiment backend",
    long_about = "EcoPlay serves a Public Goods Game and a Trust Game, records\n\
                  round decisions to a document store, and exposes aggregate\n\
                  reports.\n\n\
                  Modes:\n  \
                  --serve     HTTP API server (default)\n  \
                  --simulate  Run rounds locally and print the outcomes"
)]
struct Args {
    /// Run the HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: String,

    /// Allow unauthenticated requests as a fixed development user
    #[arg(long)]
    dev: bool,

    /// Allowed CORS origin (repeatable); all origins allowed when omitted
    #[arg(long = "cors-origin")]
    cors_origins: Vec<String>,

    /// Simulate rounds locally: public_goods, trust_game_trustor or
    /// trust_game_trustee
    #[arg(long)]
    simulate: Option<String>,

    /// Number of rounds to simulate
    #[arg(long, default_value_t = TOTAL_ROUNDS)]
    rounds: u32,

    /// Seed for deterministic simulation draws
    #[arg(long)]
    seed: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ecoplay=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    if let Some(ref game) = args.simulate {
        run_simulation(game, &args);
    } else {
        run_serve(&args).await;
    }
}

/// Run the HTTP API server
async fn run_serve(args: &Args) {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(RecordNumberVerifier::new()),
        args.dev,
    );

    if args.dev {
        tracing::warn!("dev mode: unauthenticated requests use a fixed development user");
    }

    if let Err(e) = ecoplay::core::run_server(&args.addr, state, &args.cors_origins).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}

/// Simulate rounds locally and print the outcomes
fn run_simulation(game: &str, args: &Args) {
    let game_type = match GameType::from_str(game) {
        Ok(GameType::TrustGame) => {
            eprintln!("{}", "pick a role: trust_game_trustor or trust_game_trustee".red());
            std::process::exit(2);
        }
        Ok(gt) => gt,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            std::process::exit(2);
        }
    };

    let mut rng: StdRng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if !args.json {
        println!("{}", format!("EcoPlay v{} - {} simulation", VERSION, game_type).bold());
        println!("Starting balance: {}", INITIAL_POINTS);
        println!();
    }

    let mut balance = INITIAL_POINTS as f64;

    for round in 1..=args.rounds {
        match game_type {
            GameType::PublicGoods => {
                let donation = rng.gen_range(0..=MAX_SIMULATED_DONATION.min(balance.max(0.0) as u32));
                let request = PublicGoodsRequest {
                    round,
                    donation,
                    current_balance: balance,
                };
                match public_goods::settle(&request, &mut rng) {
                    Ok(o) => {
                        print_round(round, &format!("donated {}", donation), o.payoff, o.new_balance, &o, args);
                        balance = o.new_balance;
                    }
                    Err(e) => {
                        eprintln!("{}", e.to_string().red());
                        std::process::exit(1);
                    }
                }
            }
            GameType::TrustGameTrustor => {
                let investment = rng.gen_range(0..=(balance.max(0.0) as u32).min(30));
                let request = TrustRequest {
                    round,
                    current_balance: balance,
                    decision: TrustDecision::Trustor { investment },
                };
                settle_trust_round(round, &request, &format!("invested {}", investment), &mut rng, &mut balance, args);
            }
            GameType::TrustGameTrustee => {
                let received = rng.gen_range(0..=MAX_SIMULATED_DONATION * 3);
                let returned = rng.gen_range(0..=received);
                let request = TrustRequest {
                    round,
                    current_balance: balance,
                    decision: TrustDecision::Trustee {
                        received_amount: received,
                        return_amount: returned,
                    },
                };
                settle_trust_round(
                    round,
                    &request,
                    &format!("received {}, returned {}", received, returned),
                    &mut rng,
                    &mut balance,
                    args,
                );
            }
            // Rejected before the loop
            GameType::TrustGame => unreachable!(),
        };

        if !args.json {
            if let Ok(advice) = advisor::select_message(
                game_type,
                round,
                Some(&PerformanceData { balance }),
                &mut rng,
            ) {
                println!("  {}", advice.dimmed());
            }
        }
    }

    if !args.json {
        println!();
        println!(
            "Final balance after {} rounds: {}",
            args.rounds,
            format!("{:.1}", balance).bold()
        );
    }
}

/// Settle one trust round for the simulator, print it, advance the balance
fn settle_trust_round(
    round: u32,
    request: &TrustRequest,
    decision: &str,
    rng: &mut StdRng,
    balance: &mut f64,
    args: &Args,
) {
    match trust::settle(request, rng) {
        Ok(o) => {
            print_round(round, decision, o.payoff, o.new_balance, &o, args);
            *balance = o.new_balance;
        }
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            std::process::exit(1);
        }
    }
}

/// Print one settled round
fn print_round<T: serde::Serialize>(
    round: u32,
    decision: &str,
    payoff: f64,
    new_balance: f64,
    outcome: &T,
    args: &Args,
) {
    if args.json {
        println!("{}", serde_json::to_string(outcome).unwrap());
        return;
    }

    let payoff_str = if payoff >= 0.0 {
        format!("+{:.1}", payoff).green()
    } else {
        format!("{:.1}", payoff).red()
    };
    println!(
        "round {:>2} | {} | payoff {} | balance {:.1}",
        round, decision, payoff_str, new_balance
    );
}
