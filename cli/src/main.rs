// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checkers CLI - play locally or against a network peer
//!
//! Headless interface for running the game without a GUI: moves are
//! entered as square names (two inputs, select then destination), the
//! board is reprinted after every change. Also the harness used by the
//! integration tests.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use checkers_cli::render::{self, render_board};
use checkers_cli::session::{GameMode, GameSession};
use checkers_core::MoveResult;
use checkers_network::{NetworkChannel, NetworkStatus, DEFAULT_PORT};

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(
    name = "checkers-cli",
    about = "P2P checkers command-line interface",
    version
)]
struct Args {
    /// Host a network game and wait for an opponent
    #[clap(long, conflicts_with = "join")]
    host: bool,

    /// Join a network game at the given host address
    #[clap(long, value_name = "ADDR")]
    join: Option<String>,

    /// TCP port to host on or connect to
    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Enable debug logging
    #[clap(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    if args.host {
        let channel = host_session(args.port).await?;
        play_network(GameMode::NetworkHost, channel).await
    } else if let Some(addr) = args.join {
        let channel = join_session(&addr, args.port).await?;
        play_network(GameMode::NetworkClient, channel).await
    } else {
        run_local_game().await
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

enum InputOutcome {
    Quit,
    Restarted,
    Clicked(MoveResult),
    Invalid,
}

fn handle_input(session: &mut GameSession, line: &str, network: bool) -> InputOutcome {
    match line.trim() {
        "" => InputOutcome::Invalid,
        "quit" | "exit" => InputOutcome::Quit,
        "new" if network => {
            println!("Restart is not available in a network game.");
            InputOutcome::Invalid
        }
        "new" => {
            session.restart();
            InputOutcome::Restarted
        }
        square => match render::parse_square(square) {
            Some((row, col)) => InputOutcome::Clicked(session.click(row, col)),
            None => {
                println!("Unrecognized input '{square}' (try e.g. 'c3').");
                InputOutcome::Invalid
            }
        },
    }
}

async fn run_local_game() -> Result<()> {
    let mut session = GameSession::new(GameMode::Local);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", render_board(session.board()));
    println!("Enter a square to select, then a destination ('new' restarts, 'quit' exits).");

    loop {
        if !session.is_over() {
            println!("{:?} to move", session.current_player());
        }
        let Some(line) = lines.next_line().await.context("reading stdin")? else {
            return Ok(());
        };
        match handle_input(&mut session, &line, false) {
            InputOutcome::Quit => return Ok(()),
            InputOutcome::Restarted => println!("{}", render_board(session.board())),
            InputOutcome::Clicked(result) => {
                println!("{}", render_board(session.board()));
                if result.can_chain {
                    println!("Capture chain continues...");
                }
                if let Some(winner) = session.winner() {
                    println!("{winner:?} wins! ('new' restarts, 'quit' exits)");
                }
            }
            InputOutcome::Invalid => {}
        }
    }
}

async fn host_session(port: u16) -> Result<NetworkChannel> {
    let mut channel = NetworkChannel::new();
    if !channel.host_game(port).await {
        bail!("failed to host: {}", channel.status_text());
    }
    let shown_port = channel.local_addr().map(|addr| addr.port()).unwrap_or(port);
    println!(
        "Hosting on {}:{} - waiting for an opponent...",
        NetworkChannel::local_ip(),
        shown_port
    );
    while channel.status() == NetworkStatus::Hosting {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    if channel.status() != NetworkStatus::Connected {
        bail!("hosting failed: {}", channel.status_text());
    }
    println!("Opponent connected.");
    Ok(channel)
}

async fn join_session(addr: &str, port: u16) -> Result<NetworkChannel> {
    let mut channel = NetworkChannel::new();
    println!("Connecting to {addr}:{port}...");
    if !channel.connect_to_game(addr, port).await {
        bail!("failed to connect: {}", channel.status_text());
    }
    println!("Connected.");
    Ok(channel)
}

async fn play_network(mode: GameMode, mut channel: NetworkChannel) -> Result<()> {
    info!(?mode, "starting network game");
    let mut session = GameSession::new(mode);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", render_board(session.board()));
    if let Some(color) = session.local_color() {
        println!("You play {color:?}.");
    }

    while !session.is_over() {
        if session.my_turn() {
            println!("{:?} to move (you)", session.current_player());
            let Some(line) = lines.next_line().await.context("reading stdin")? else {
                break;
            };
            match handle_input(&mut session, &line, true) {
                InputOutcome::Quit => break,
                InputOutcome::Clicked(result) => {
                    if result.moved {
                        // Every completed segment is forwarded, chain
                        // segments included.
                        if let Some(record) = session.last_move() {
                            if !channel
                                .send_move(
                                    record.from_row,
                                    record.from_col,
                                    record.to_row,
                                    record.to_col,
                                )
                                .await
                            {
                                println!("Connection lost: {}", channel.status_text());
                                break;
                            }
                        }
                    }
                    println!("{}", render_board(session.board()));
                    if result.can_chain {
                        println!("Capture chain continues...");
                    }
                }
                InputOutcome::Restarted | InputOutcome::Invalid => {}
            }
        } else if channel.status() == NetworkStatus::Disconnected {
            println!("Opponent disconnected: {}", channel.status_text());
            break;
        } else if channel.has_received_move() {
            let record = channel.take_received_move();
            if session.apply_remote_move(record) {
                println!("{}", render_board(session.board()));
            } else {
                println!("Ignoring an illegal move from the opponent.");
            }
        } else {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    if let Some(winner) = session.winner() {
        println!("{winner:?} wins!");
    }
    channel.disconnect().await;
    Ok(())
}
