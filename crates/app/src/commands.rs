//! Typed lines -> intents

use notes_core::{MessageId, Sender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Reply { to: MessageId, text: String },
    Edit { id: MessageId, text: String },
    React { id: MessageId, emoji: String },
    Delete(MessageId),
    /// `None` flips the current identity
    SendAs(Option<Sender>),
    List,
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
Commands:
  send <text>          post as the current identity (a bare line does the same)
  reply <id> <text>    reply to a message
  edit <id> <text>     change a message's text
  react <id> <emoji>   toggle a reaction as the current identity
  delete <id>          delete a message (replies are kept)
  as [me|other]        switch or set the identity you post as
  list                 show the threads
  help                 show this help
  quit                 exit";

/// Parse one input line
///
/// Lines that do not start with a command word are sent as a message.
pub fn parse(line: &str) -> Result<Command, String> {
    if line.trim().is_empty() {
        return Ok(Command::Empty);
    }

    let trimmed = line.trim_start();
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (trimmed.trim_end(), ""),
    };

    match word.to_lowercase().as_str() {
        "send" => Ok(Command::Send(rest.to_string())),
        "reply" => {
            let (to, text) = id_and_rest(rest, "reply <id> <text>")?;
            Ok(Command::Reply { to, text })
        }
        "edit" => {
            let (id, text) = id_and_rest(rest, "edit <id> <text>")?;
            Ok(Command::Edit { id, text })
        }
        "react" => {
            let (id, emoji) = id_and_rest(rest, "react <id> <emoji>")?;
            Ok(Command::React {
                id,
                emoji: emoji.trim().to_string(),
            })
        }
        "delete" => Ok(Command::Delete(parse_id(rest.trim(), "delete <id>")?)),
        "as" => match rest.trim() {
            "" => Ok(Command::SendAs(None)),
            name => Ok(match name.parse::<Sender>() {
                Ok(sender) => Command::SendAs(Some(sender)),
                Err(_) => Command::Send(line.to_string()),
            }),
        },
        "list" if rest.trim().is_empty() => Ok(Command::List),
        "help" if rest.trim().is_empty() => Ok(Command::Help),
        "quit" | "exit" if rest.trim().is_empty() => Ok(Command::Quit),
        _ => Ok(Command::Send(line.to_string())),
    }
}

fn id_and_rest(input: &str, usage: &str) -> Result<(MessageId, String), String> {
    let (id, rest) = input
        .split_once(char::is_whitespace)
        .ok_or_else(|| format!("usage: {}", usage))?;
    Ok((parse_id(id, usage)?, rest.trim_start().to_string()))
}

fn parse_id(input: &str, usage: &str) -> Result<MessageId, String> {
    input
        .trim_start_matches('#')
        .parse::<i64>()
        .map(MessageId)
        .map_err(|_| format!("'{}' is not a message id (usage: {})", input, usage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_forms() {
        assert_eq!(parse("send Hello").unwrap(), Command::Send("Hello".into()));
        assert_eq!(
            parse("just typing").unwrap(),
            Command::Send("just typing".into())
        );
        assert_eq!(parse("send").unwrap(), Command::Send(String::new()));
        assert_eq!(parse("   ").unwrap(), Command::Empty);
    }

    #[test]
    fn test_command_words_need_no_trailing_text() {
        assert_eq!(parse("list").unwrap(), Command::List);
        assert_eq!(parse("HELP").unwrap(), Command::Help);
        assert_eq!(parse("quit").unwrap(), Command::Quit);
        // Prose that merely starts with a command word is a message
        assert_eq!(
            parse("list of topics to review").unwrap(),
            Command::Send("list of topics to review".into())
        );
    }

    #[test]
    fn test_reply_edit_react_delete() {
        assert_eq!(
            parse("reply 17 Hi there!").unwrap(),
            Command::Reply {
                to: MessageId(17),
                text: "Hi there!".into()
            }
        );
        assert_eq!(
            parse("edit #17 **bold** now").unwrap(),
            Command::Edit {
                id: MessageId(17),
                text: "**bold** now".into()
            }
        );
        assert_eq!(
            parse("react 17 👍").unwrap(),
            Command::React {
                id: MessageId(17),
                emoji: "👍".into()
            }
        );
        assert_eq!(parse("delete 17").unwrap(), Command::Delete(MessageId(17)));
    }

    #[test]
    fn test_bad_ids_and_usage() {
        assert!(parse("delete abc").is_err());
        assert!(parse("reply 17").is_err());
        assert!(parse("edit x text").is_err());
    }

    #[test]
    fn test_send_as() {
        assert_eq!(parse("as").unwrap(), Command::SendAs(None));
        assert_eq!(parse("as other").unwrap(), Command::SendAs(Some(Sender::Other)));
        assert_eq!(parse("as Me").unwrap(), Command::SendAs(Some(Sender::Me)));
        assert_eq!(
            parse("as far as I know").unwrap(),
            Command::Send("as far as I know".into())
        );
    }
}
