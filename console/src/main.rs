mod command;
mod config;
mod render;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use tictactoe_engine::config::{ConfigError, GameConfig, Validate};
use tictactoe_engine::logger::{self, LogLevel};
use tictactoe_engine::tictactoe::{Difficulty, GameMode, SharedGameSession};
use tictactoe_engine::log;

use command::{ConsoleCommand, HELP, parse_command};
use render::{ConsoleBroadcaster, render_board, status_line};

#[derive(Parser)]
#[command(name = "tictactoe_console")]
struct Args {
    /// ai or pvp
    #[arg(long)]
    mode: Option<GameMode>,

    /// easy, medium or hard
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Fixed seed for the computer's random choices
    #[arg(long)]
    seed: Option<u64>,

    /// Config file; defaults to tictactoe_config.yaml next to the executable
    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    delay_ms: Option<u64>,

    #[arg(long)]
    log_level: Option<LogLevel>,

    #[arg(long)]
    use_log_prefix: bool,
}

impl Args {
    fn apply_to(&self, mut config: GameConfig) -> GameConfig {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(delay_ms) = self.delay_ms {
            config.computer_move_delay_ms = delay_ms;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = args.apply_to(config::load_config(args.config.as_deref())?);
    config.validate().map_err(ConfigError::Invalid)?;

    let prefix = if args.use_log_prefix {
        Some("Console".to_string())
    } else {
        None
    };
    logger::init_logger(prefix, config.log_level);

    let session = SharedGameSession::from_config("console".to_string(), &config, ConsoleBroadcaster);
    log!(
        "Starting tic-tac-toe ({} / {})",
        config.mode,
        config.difficulty
    );

    println!("{}", HELP);
    let snapshot = session.current_state().await;
    println!("\n{}\n{}", render_board(&snapshot), status_line(&snapshot));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            ConsoleCommand::Move(index) => {
                let result = session.submit_move(index).await;
                if let Some(e) = result.error {
                    println!("Move rejected: {}", e);
                }
            }
            ConsoleCommand::Reset => {
                session.reset().await;
            }
            ConsoleCommand::Mode(mode) => {
                session.set_mode(mode).await;
            }
            ConsoleCommand::Difficulty(difficulty) => {
                session.set_difficulty(difficulty).await;
            }
            ConsoleCommand::Show => {
                let snapshot = session.current_state().await;
                println!("\n{}\n{}", render_board(&snapshot), status_line(&snapshot));
            }
            ConsoleCommand::Help => println!("{}", HELP),
            ConsoleCommand::Quit => break,
        }
    }

    log!("Session closed");
    Ok(())
}
