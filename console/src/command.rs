use tictactoe_engine::tictactoe::{CELL_COUNT, Difficulty, GameMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Board index 0-8. Players type 1-9.
    Move(usize),
    Reset,
    Mode(GameMode),
    Difficulty(Difficulty),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  1-9                       place a mark (cells numbered left to right, top to bottom)
  reset                     start a new game
  mode ai|pvp               play the computer or another person (resets)
  difficulty easy|medium|hard
                            computer strength (resets)
  show                      redraw the board
  help                      this text
  quit                      leave";

pub fn parse_command(line: &str) -> Result<ConsoleCommand, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err("Empty command".to_string());
    };
    let argument = words.next();
    if words.next().is_some() {
        return Err(format!("Too many arguments in '{}'", line.trim()));
    }

    if let Ok(cell) = head.parse::<usize>() {
        if argument.is_some() || !(1..=CELL_COUNT).contains(&cell) {
            return Err(format!("Cell must be a number from 1 to {}", CELL_COUNT));
        }
        return Ok(ConsoleCommand::Move(cell - 1));
    }

    match (head.to_ascii_lowercase().as_str(), argument) {
        ("reset" | "r", None) => Ok(ConsoleCommand::Reset),
        ("show" | "s", None) => Ok(ConsoleCommand::Show),
        ("help" | "h" | "?", None) => Ok(ConsoleCommand::Help),
        ("quit" | "q" | "exit", None) => Ok(ConsoleCommand::Quit),
        ("mode", Some(mode)) => mode.parse().map(ConsoleCommand::Mode),
        ("difficulty" | "d", Some(level)) => level.parse().map(ConsoleCommand::Difficulty),
        ("mode" | "difficulty" | "d", None) => Err(format!("'{}' needs an argument", head)),
        _ => Err(format!("Unknown command '{}' (type help)", line.trim())),
    }
}
