//! Interactive commands read from stdin.
//!
//! One command per line:
//!
//! - `search <text>`: filter by name; `search` alone clears the filter.
//! - `sort <price-asc|price-desc|change-asc|change-desc>`: change the order.
//! - `select <SYMBOL>`: select a visible ticker.
//! - `refresh`: restart polling immediately.
//! - `help`: list the commands.
//! - `quit`: stop the client.
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{info, warn};
use std::io::BufRead;
use std::str::FromStr;
use std::thread;
use ticker_common::{Result, SortOption, TickerError};

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Search(String),
    Sort(SortOption),
    Select(String),
    Refresh,
    Help,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = TickerError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        match verb.to_ascii_lowercase().as_str() {
            "search" | "s" => Ok(Self::Search(rest.to_string())),
            "sort" => rest
                .parse::<SortOption>()
                .map(Self::Sort)
                .map_err(|_| TickerError::Format(format!("Unknown sort option: '{}'", rest))),
            "select" if !rest.is_empty() => Ok(Self::Select(rest.to_string())),
            "refresh" | "r" => Ok(Self::Refresh),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(TickerError::Format(format!("Unknown command: '{}'", line))),
        }
    }
}

/// Usage lines printed by `help`.
pub const USAGE: &[&str] = &[
    "search <text>   filter tickers by name (empty clears)",
    "sort <option>   price-asc | price-desc | change-asc | change-desc",
    "select <SYMBOL> select a visible ticker",
    "refresh         restart polling now",
    "quit            stop the client",
];

/// Parses commands from `reader` line by line until it ends or nobody listens.
///
/// Blank lines are skipped; unparsable lines are logged and skipped.
pub fn read_commands<R: BufRead>(reader: R, tx: &Sender<ConsoleCommand>) {
    for line in reader.lines() {
        let Ok(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<ConsoleCommand>() {
            Ok(command) => {
                if tx.send(command).is_err() {
                    break;
                }
            }
            Err(e) => warn!("{}. Type 'help' for the list of commands.", e),
        }
    }
}

/// Spawns a thread reading commands from stdin.
pub fn spawn_stdin_reader() -> Result<Receiver<ConsoleCommand>> {
    let (tx, rx) = unbounded();
    thread::Builder::new()
        .name("stdin-commands".into())
        .spawn(move || {
            read_commands(std::io::stdin().lock(), &tx);
            info!("Console input closed");
        })?;
    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_every_command() {
        assert_eq!(
            "search coin".parse::<ConsoleCommand>().unwrap(),
            ConsoleCommand::Search("coin".into())
        );
        assert_eq!(
            "  SEARCH  ".parse::<ConsoleCommand>().unwrap(),
            ConsoleCommand::Search(String::new())
        );
        assert_eq!(
            "sort Price-Asc".parse::<ConsoleCommand>().unwrap(),
            ConsoleCommand::Sort(SortOption::PriceAsc)
        );
        assert_eq!(
            "select BTC".parse::<ConsoleCommand>().unwrap(),
            ConsoleCommand::Select("BTC".into())
        );
        assert_eq!("r".parse::<ConsoleCommand>().unwrap(), ConsoleCommand::Refresh);
        assert_eq!("help".parse::<ConsoleCommand>().unwrap(), ConsoleCommand::Help);
        assert_eq!("quit".parse::<ConsoleCommand>().unwrap(), ConsoleCommand::Quit);
    }

    #[test]
    fn rejects_unknown_input() {
        assert!(matches!(
            "sort cheapest".parse::<ConsoleCommand>(),
            Err(TickerError::Format(_))
        ));
        assert!("select".parse::<ConsoleCommand>().is_err());
        assert!("buy BTC".parse::<ConsoleCommand>().is_err());
    }

    #[test]
    fn reader_skips_blank_and_invalid_lines() {
        let input = Cursor::new("search eth\n\nbogus\nsort change-desc\nquit\n");
        let (tx, rx) = unbounded();
        read_commands(input, &tx);
        drop(tx);

        assert_eq!(
            rx.iter().collect::<Vec<_>>(),
            vec![
                ConsoleCommand::Search("eth".into()),
                ConsoleCommand::Sort(SortOption::ChangeDesc),
                ConsoleCommand::Quit,
            ]
        );
    }
}
