//! Game server session protocol
//!
//! One message per line, fields separated by `;`:
//!
//! - `START;<size>;<R|B>` - new game, Red moves first
//! - `CHANGE;<row,col|SWAP>;<board>;<next colour>` - last action and whose
//!   turn it is; the short form `<row,col|SWAP>;<next colour>` is accepted
//! - `END` in the first or last field - the game is over
//!
//! The agent answers `<row>,<col>` or `SWAP`.

use hexbot_core::{Action, Color, Move};

/// Errors raised while decoding server messages
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("empty message")]
    Empty,

    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("invalid board size: {0}")]
    BadSize(String),

    #[error("invalid colour: {0}")]
    BadColour(String),

    #[error("invalid move: {0}")]
    BadMove(String),
}

/// Decoded server message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    Start { size: usize, colour: Color },
    Change { action: Action, next: Color },
    End,
}

/// Decode one line from the server
pub fn parse_message(line: &str) -> Result<ServerMessage, ProtocolError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ProtocolError::Empty);
    }
    let fields: Vec<&str> = line.split(';').map(str::trim).collect();

    if fields[0] == "END" || fields.last() == Some(&"END") {
        return Ok(ServerMessage::End);
    }

    if fields[0] == "START" {
        let [_, size, colour] = fields[..] else {
            return Err(ProtocolError::Malformed(line.to_string()));
        };
        let size = size
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ProtocolError::BadSize(size.to_string()))?;
        return Ok(ServerMessage::Start {
            size,
            colour: parse_colour(colour)?,
        });
    }

    let action_field = if fields[0] == "CHANGE" { 1 } else { 0 };
    if fields.len() < action_field + 2 {
        return Err(ProtocolError::Malformed(line.to_string()));
    }
    let action = parse_action(fields[action_field])?;
    let next = parse_colour(fields[fields.len() - 1])?;
    Ok(ServerMessage::Change { action, next })
}

/// `row,col` or `SWAP`
pub fn parse_action(field: &str) -> Result<Action, ProtocolError> {
    if field == "SWAP" {
        return Ok(Action::Swap);
    }
    let (row, col) = field
        .split_once(',')
        .ok_or_else(|| ProtocolError::BadMove(field.to_string()))?;
    let row = row
        .trim()
        .parse()
        .map_err(|_| ProtocolError::BadMove(field.to_string()))?;
    let col = col
        .trim()
        .parse()
        .map_err(|_| ProtocolError::BadMove(field.to_string()))?;
    Ok(Action::Place(Move::new(row, col)))
}

fn parse_colour(field: &str) -> Result<Color, ProtocolError> {
    Color::from_wire(field).ok_or_else(|| ProtocolError::BadColour(field.to_string()))
}

/// Wire form of the agent's action, newline included
pub fn format_action(action: Action) -> String {
    match action {
        Action::Place(mv) => format!("{},{}\n", mv.row, mv.col),
        Action::Swap => "SWAP\n".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start() {
        assert_eq!(
            parse_message("START;11;R\n"),
            Ok(ServerMessage::Start { size: 11, colour: Color::Red })
        );
        assert!(matches!(parse_message("START;0;R"), Err(ProtocolError::BadSize(_))));
        assert!(matches!(parse_message("START;5;G"), Err(ProtocolError::BadColour(_))));
        assert!(matches!(parse_message("START;5"), Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_parse_change_forms() {
        let expected = ServerMessage::Change {
            action: Action::Place(Move::new(3, 4)),
            next: Color::Blue,
        };
        assert_eq!(parse_message("CHANGE;3,4;0000,0000;B"), Ok(expected.clone()));
        assert_eq!(parse_message("3,4;B"), Ok(expected));
        assert_eq!(
            parse_message("CHANGE;SWAP;0000;R"),
            Ok(ServerMessage::Change { action: Action::Swap, next: Color::Red })
        );
    }

    #[test]
    fn test_parse_end() {
        assert_eq!(parse_message("END;R"), Ok(ServerMessage::End));
        assert_eq!(parse_message("CHANGE;1,1;0000;END"), Ok(ServerMessage::End));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_message("   "), Err(ProtocolError::Empty));
        assert!(matches!(parse_message("CHANGE;x,1;0;R"), Err(ProtocolError::BadMove(_))));
        assert!(matches!(parse_message("CHANGE;12;0;R"), Err(ProtocolError::BadMove(_))));
        assert!(matches!(parse_message("CHANGE"), Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn test_format_action() {
        assert_eq!(format_action(Action::Place(Move::new(0, 10))), "0,10\n");
        assert_eq!(format_action(Action::Swap), "SWAP\n");
    }
}
