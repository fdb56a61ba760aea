use super::{is_yes, parse_line, read_commands, Input};

use client_core::{BoardCommand, Locale};
use shared::domain::{Filter, OrderId, OrderStatus};
use tokio::sync::mpsc;

async fn collect(script: &str, assume_yes: bool) -> (Vec<BoardCommand>, String) {
    let (tx, mut rx) = mpsc::channel(16);
    let mut out = Vec::new();
    read_commands(script.as_bytes(), &mut out, tx, Locale::En, assume_yes).await;

    let mut commands = Vec::new();
    while let Ok(command) = rx.try_recv() {
        commands.push(command);
    }
    (commands, String::from_utf8(out).expect("utf8 prompts"))
}

#[test]
fn parses_every_command_form() {
    assert_eq!(
        parse_line("f cooking"),
        Ok(Input::Command(BoardCommand::SetFilter(Filter::Only(
            OrderStatus::Cooking
        ))))
    );
    assert_eq!(
        parse_line("filter ALL"),
        Ok(Input::Command(BoardCommand::SetFilter(Filter::All)))
    );
    assert_eq!(
        parse_line("a #12"),
        Ok(Input::Command(BoardCommand::Advance(OrderId(12))))
    );
    assert_eq!(
        parse_line("s 3 ready"),
        Ok(Input::Command(BoardCommand::SetStatus {
            order_id: OrderId(3),
            status: OrderStatus::Ready,
        }))
    );
    assert_eq!(parse_line("d 9"), Ok(Input::Delete(OrderId(9))));
    assert_eq!(parse_line("r"), Ok(Input::Command(BoardCommand::Reload)));
    assert_eq!(parse_line("q"), Ok(Input::Command(BoardCommand::Shutdown)));
    assert_eq!(parse_line("   "), Ok(Input::Empty));
    assert_eq!(parse_line("help"), Ok(Input::Help));
}

#[test]
fn rejects_malformed_commands() {
    assert!(parse_line("a twelve").is_err());
    assert!(parse_line("s 3 burnt").is_err());
    assert!(parse_line("f").is_err());
    assert!(parse_line("r now").is_err());
    assert!(parse_line("x 1").is_err());
}

#[test]
fn only_explicit_yes_confirms() {
    assert!(is_yes("y"));
    assert!(is_yes(" YES "));
    assert!(!is_yes(""));
    assert!(!is_yes("n"));
    assert!(!is_yes("yeah"));
}

#[tokio::test]
async fn deletion_waits_for_answer() {
    let (commands, prompts) = collect("d 4\nn\nd 5\ny\n", false).await;

    assert_eq!(
        commands,
        vec![
            BoardCommand::Delete {
                order_id: OrderId(4),
                confirmed: false,
            },
            BoardCommand::Delete {
                order_id: OrderId(5),
                confirmed: true,
            },
        ]
    );
    assert_eq!(prompts.matches("[y/N]").count(), 2);
}

#[tokio::test]
async fn assume_yes_skips_prompt() {
    let (commands, prompts) = collect("d 4\n", true).await;

    assert_eq!(
        commands,
        vec![BoardCommand::Delete {
            order_id: OrderId(4),
            confirmed: true,
        }]
    );
    assert!(prompts.is_empty());
}

#[tokio::test]
async fn stops_reading_after_quit() {
    let (commands, prompts) = collect("bogus\nr\nq\na 1\n", false).await;

    assert_eq!(commands, vec![BoardCommand::Reload, BoardCommand::Shutdown]);
    assert!(prompts.contains("unrecognised command"));
}
