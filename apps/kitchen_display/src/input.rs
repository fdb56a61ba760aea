//! Staff commands typed on stdin.

use client_core::{BoardCommand, Locale};
use shared::domain::{Filter, OrderId, OrderStatus};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    sync::mpsc,
};
use tracing::{debug, warn};

pub const HELP: &str = "\
commands:
  f <all|pending|received|cooking|ready|completed>   change filter
  a <id>                                              advance order to its next status
  s <id> <status>                                     set order status
  d <id>                                              delete order
  r                                                   reload
  q                                                   quit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(BoardCommand),
    /// Needs a yes/no answer before it becomes a command.
    Delete(OrderId),
    Help,
    Empty,
}

pub fn parse_line(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Input::Empty);
    };
    let args: Vec<&str> = words.collect();

    let input = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("f" | "filter", [filter]) => {
            let filter = filter.parse::<Filter>().map_err(|err| err.to_string())?;
            Input::Command(BoardCommand::SetFilter(filter))
        }
        ("a" | "advance", [id]) => Input::Command(BoardCommand::Advance(parse_id(id)?)),
        ("s" | "status", [id, status]) => {
            let status = status.parse::<OrderStatus>().map_err(|err| err.to_string())?;
            Input::Command(BoardCommand::SetStatus {
                order_id: parse_id(id)?,
                status,
            })
        }
        ("d" | "delete", [id]) => Input::Delete(parse_id(id)?),
        ("r" | "reload", []) => Input::Command(BoardCommand::Reload),
        ("q" | "quit", []) => Input::Command(BoardCommand::Shutdown),
        ("h" | "help" | "?", _) => Input::Help,
        (verb, _) => return Err(format!("unrecognised command '{verb}', type 'help'")),
    };
    Ok(input)
}

fn parse_id(raw: &str) -> Result<OrderId, String> {
    raw.trim_start_matches('#')
        .parse::<i64>()
        .map(OrderId)
        .map_err(|_| format!("invalid order id '{raw}'"))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "是"
    )
}

/// Reads commands until EOF or `q`, asking before every deletion unless `assume_yes`.
pub async fn read_commands<R, W>(
    reader: R,
    mut prompt_out: W,
    commands: mpsc::Sender<BoardCommand>,
    locale: Locale,
    assume_yes: bool,
) where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                warn!(error = %err, "input: stdin read failed");
                break;
            }
        };

        let command = match parse_line(&line) {
            Ok(Input::Command(command)) => command,
            Ok(Input::Delete(order_id)) => {
                let confirmed = if assume_yes {
                    true
                } else {
                    let prompt = format!("{} [y/N] ", locale.delete_prompt());
                    let _ = prompt_out.write_all(prompt.as_bytes()).await;
                    let _ = prompt_out.flush().await;
                    matches!(lines.next_line().await, Ok(Some(answer)) if is_yes(&answer))
                };
                BoardCommand::Delete {
                    order_id,
                    confirmed,
                }
            }
            Ok(Input::Help) => {
                let _ = prompt_out.write_all(HELP.as_bytes()).await;
                continue;
            }
            Ok(Input::Empty) => continue,
            Err(message) => {
                let _ = prompt_out.write_all(format!("{message}\n").as_bytes()).await;
                continue;
            }
        };

        debug!(?command, "input: command parsed");
        let quit = command == BoardCommand::Shutdown;
        if commands.send(command).await.is_err() || quit {
            break;
        }
    }
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
