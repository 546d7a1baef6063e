use std::{fmt, str::FromStr};

use alloy::primitives::U256;
use thiserror::Error;

use crate::{clients::rarity::class_list, types::SummonerClass};

pub const NOT_CONNECTED: &str =
    "Your account is not connected, please type help for further instructions";
pub const WRONG_INFO: &str = "You did not enter the correct info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandName {
    Help,
    Connect,
    Disconnect,
    Summon,
    Summoners,
    Summoner,
}

impl CommandName {
    pub const ALL: [CommandName; 6] = [
        CommandName::Help,
        CommandName::Connect,
        CommandName::Disconnect,
        CommandName::Summon,
        CommandName::Summoners,
        CommandName::Summoner,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommandName::Help => "help",
            CommandName::Connect => "connect",
            CommandName::Disconnect => "disconnect",
            CommandName::Summon => "summon",
            CommandName::Summoners => "summoners",
            CommandName::Summoner => "summoner",
        }
    }

    /// Commands that act on the connected account's summoners.
    pub fn requires_connection(self) -> bool {
        matches!(
            self,
            CommandName::Summon | CommandName::Summoners | CommandName::Summoner
        )
    }

    pub fn description(self) -> String {
        match self {
            CommandName::Help => "show this help".to_string(),
            CommandName::Connect => "connect your FTM wallet".to_string(),
            CommandName::Disconnect => "disconnect your FTM wallet".to_string(),
            CommandName::Summon => {
                format!("Usage: summon [class]\n\n    [class] - {}", class_list())
            }
            CommandName::Summoners => concat!(
                "Usage: summoners [options]\n\n",
                "    list - list all owned summoners\n\n",
                "    adventure - send all eligible summoners on an adventure\n\n",
                "    gold - claim gold for eligible summoners"
            )
            .to_string(),
            CommandName::Summoner => concat!(
                "Usage: summoner [id] [options] e.g. summoner 12412 name Galdur\n\n",
                "    name [name] - name a summoner"
            )
            .to_string(),
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == wanted)
            .ok_or_else(|| ParseError::Unknown(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummonersAction {
    List,
    Adventure,
    Gold,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummonerAction {
    Name(String),
}

/// A validated terminal command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Connect,
    Disconnect,
    Summon(SummonerClass),
    Summoners(SummonersAction),
    Summoner { id: U256, action: SummonerAction },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no command given")]
    Empty,

    #[error("command not found: {0}")]
    Unknown(String),

    /// Arguments were missing or invalid; `message` is shown to the user.
    #[error("{message}")]
    Usage {
        command: CommandName,
        message: String,
    },
}

fn usage(command: CommandName, message: impl ToString) -> ParseError {
    ParseError::Usage {
        command,
        message: message.to_string(),
    }
}

impl Command {
    pub fn name(&self) -> CommandName {
        match self {
            Command::Help => CommandName::Help,
            Command::Connect => CommandName::Connect,
            Command::Disconnect => CommandName::Disconnect,
            Command::Summon(_) => CommandName::Summon,
            Command::Summoners(_) => CommandName::Summoners,
            Command::Summoner { .. } => CommandName::Summoner,
        }
    }

    /// Parses one line of terminal input.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let args: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = args.first() else {
            return Err(ParseError::Empty);
        };

        let name: CommandName = first.parse()?;
        match name {
            CommandName::Help => Ok(Command::Help),
            CommandName::Connect => Ok(Command::Connect),
            CommandName::Disconnect => Ok(Command::Disconnect),
            CommandName::Summon => args
                .get(1)
                .and_then(|choice| choice.parse::<SummonerClass>().ok())
                .map(Command::Summon)
                .ok_or_else(|| {
                    usage(
                        name,
                        format!("You must enter one of these classes: {}", class_list()),
                    )
                }),
            CommandName::Summoners => match args.get(1).copied() {
                Some("list" | "ls") => Ok(Command::Summoners(SummonersAction::List)),
                Some("adventure") => Ok(Command::Summoners(SummonersAction::Adventure)),
                Some("gold") => Ok(Command::Summoners(SummonersAction::Gold)),
                _ => Err(usage(name, WRONG_INFO)),
            },
            CommandName::Summoner => {
                let id = args
                    .get(1)
                    .ok_or_else(|| usage(name, "Please specify a summoner id"))?;
                let action = args
                    .get(2)
                    .ok_or_else(|| usage(name, "Please specify a command"))?;
                let id = U256::from_str_radix(id, 10)
                    .map_err(|_| usage(name, format!("{id} is not a valid summoner id")))?;

                match *action {
                    "name" => {
                        let new_name = args[3..].join(" ");
                        if new_name.is_empty() {
                            return Err(usage(name, "Please specify a name for your summoner"));
                        }
                        Ok(Command::Summoner {
                            id,
                            action: SummonerAction::Name(new_name),
                        })
                    }
                    _ => Err(usage(name, WRONG_INFO)),
                }
            }
        }
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)
    }
}

/// Text printed by the built-in `help` command.
pub fn help_text() -> String {
    CommandName::ALL
        .into_iter()
        .map(|name| format!("{name} - {}", name.description()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
