use crate::domain::change::ExchangeRequest;
use crate::error::{ExchangeError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Exchange,
    Add,
    Remove,
    Reset,
}

/// One CSV row. Columns a command does not use may be left empty.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CommandRecord {
    pub r#type: CommandType,
    pub amount: Option<i64>,
    pub minimal: Option<bool>,
    pub arbitrary: Option<bool>,
    pub coin: Option<u32>,
    pub quantity: Option<u32>,
}

/// A machine operation ready to run against the engine.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Command {
    Exchange(ExchangeRequest),
    AddCoins { coin: u32, quantity: u32 },
    RemoveCoins { coin: u32, quantity: u32 },
    Reset,
}

impl Command {
    /// The `type` column value this command was read from.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Exchange(_) => "exchange",
            Command::AddCoins { .. } => "add",
            Command::RemoveCoins { .. } => "remove",
            Command::Reset => "reset",
        }
    }
}

impl TryFrom<CommandRecord> for Command {
    type Error = ExchangeError;

    fn try_from(record: CommandRecord) -> Result<Self> {
        let missing = |field: &str| {
            ExchangeError::Command(format!(
                "{:?} requires a value for '{}'",
                record.r#type, field
            ))
        };
        match record.r#type {
            CommandType::Exchange => {
                let amount = record.amount.ok_or_else(|| missing("amount"))?;
                Ok(Command::Exchange(ExchangeRequest::new(
                    amount,
                    record.minimal.unwrap_or(true),
                    record.arbitrary.unwrap_or(false),
                )))
            }
            CommandType::Add => Ok(Command::AddCoins {
                coin: record.coin.ok_or_else(|| missing("coin"))?,
                quantity: record.quantity.ok_or_else(|| missing("quantity"))?,
            }),
            CommandType::Remove => Ok(Command::RemoveCoins {
                coin: record.coin.ok_or_else(|| missing("coin"))?,
                quantity: record.quantity.ok_or_else(|| missing("quantity"))?,
            }),
            CommandType::Reset => Ok(Command::Reset),
        }
    }
}

/// Reads machine commands from a CSV source.
///
/// Header: `type, amount, minimal, arbitrary, coin, quantity`. Whitespace is
/// trimmed and short rows are accepted.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads and converts rows, one `Result` per row.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader.into_deserialize().map(|result| {
            let record: CommandRecord = result.map_err(ExchangeError::from)?;
            Command::try_from(record)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coin::Strategy;

    const HEADER: &str = "type, amount, minimal, arbitrary, coin, quantity";

    #[test]
    fn test_reader_valid_stream() {
        let data = format!(
            "{HEADER}\nexchange, 10, true, false, ,\nadd, , , , 25, 4\nremove, , , , 1, 2\nreset, , , , ,"
        );
        let reader = CommandReader::new(data.as_bytes());
        let commands: Vec<Command> = reader.commands().map(|c| c.unwrap()).collect();

        assert_eq!(
            commands,
            vec![
                Command::Exchange(ExchangeRequest::new(10, true, false)),
                Command::AddCoins {
                    coin: 25,
                    quantity: 4
                },
                Command::RemoveCoins {
                    coin: 1,
                    quantity: 2
                },
                Command::Reset,
            ]
        );
        let names: Vec<&str> = commands.iter().map(Command::name).collect();
        assert_eq!(names, ["exchange", "add", "remove", "reset"]);
    }

    #[test]
    fn test_exchange_defaults() {
        let data = format!("{HEADER}\nexchange, 15");
        let reader = CommandReader::new(data.as_bytes());
        let command = reader.commands().next().unwrap().unwrap();

        match command {
            Command::Exchange(request) => {
                assert_eq!(request.amount, 15);
                assert_eq!(request.strategy, Strategy::Minimal);
                assert!(!request.allow_arbitrary);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = format!("{HEADER}\ninvalid, 1, true, false, ,\nexchange, abc, , , ,");
        let reader = CommandReader::new(data.as_bytes());
        let results: Vec<Result<Command>> = reader.commands().collect();

        assert!(matches!(results[0], Err(ExchangeError::CsvError(_))));
        assert!(matches!(results[1], Err(ExchangeError::CsvError(_))));
    }

    #[test]
    fn test_reader_missing_required_field() {
        let data = format!("{HEADER}\nadd, , , , 25,");
        let reader = CommandReader::new(data.as_bytes());
        let result = reader.commands().next().unwrap();

        assert!(matches!(result, Err(ExchangeError::Command(_))));
    }
}
