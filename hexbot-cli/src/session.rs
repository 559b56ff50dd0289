//! Game session state machine
//!
//! ## Phases
//!
//! - `WaitStart`: read `START`, set up the board, move first if Red
//! - `MakeMove`: ask the player for an action and send it
//! - `WaitMessage`: fold the reported action into the board, move when the
//!   server says it is our turn
//! - `Closed`: the game ended or the server hung up
//!
//! Each handler takes the game state by value and hands it to the next
//! phase.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::time::Duration;

use anyhow::{Context, Result};

use hexbot_core::{apply_opponent_update, Action, Board, Color, EngineError, HexPlayer};

use crate::protocol::{format_action, parse_message, ProtocolError, ServerMessage};

/// What the agent knows about the game in progress
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub colour: Color,
    /// Game turn, 1 for the opening move. Advances on every report.
    pub turn: u32,
}

enum Phase {
    WaitStart,
    MakeMove(GameState),
    WaitMessage(GameState),
    Closed(Option<GameState>),
}

/// How a session went
#[derive(Debug, Default)]
pub struct SessionSummary {
    /// Actions sent, in order
    pub actions: Vec<Action>,
    /// Last known game state, if a game was started
    pub state: Option<GameState>,
}

/// One game against the server over any line-oriented stream
pub struct Session<R, W> {
    reader: R,
    writer: W,
    player: HexPlayer,
    budget: Duration,
    actions: Vec<Action>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(reader: R, writer: W, player: HexPlayer) -> Self {
        let budget = player.config.turn_timeout();
        Self {
            reader,
            writer,
            player,
            budget,
            actions: Vec::new(),
        }
    }

    /// Drive the session until the game ends or the stream closes
    pub fn run(mut self) -> Result<SessionSummary> {
        let mut phase = Phase::WaitStart;
        loop {
            phase = match phase {
                Phase::WaitStart => self.wait_start()?,
                Phase::MakeMove(game) => self.make_move(game)?,
                Phase::WaitMessage(game) => self.wait_message(game)?,
                Phase::Closed(state) => {
                    tracing::info!("Session closed after {} actions", self.actions.len());
                    return Ok(SessionSummary {
                        actions: self.actions,
                        state,
                    });
                }
            };
        }
    }

    fn wait_start(&mut self) -> Result<Phase> {
        match self.next_message()? {
            Some(ServerMessage::Start { size, colour }) => {
                tracing::info!("Game started: {}x{} board, playing {:?}", size, size, colour);
                let game = GameState {
                    board: Board::new(size),
                    colour,
                    turn: 1,
                };
                if colour == Color::Red {
                    Ok(Phase::MakeMove(game))
                } else {
                    Ok(Phase::WaitMessage(game))
                }
            }
            Some(ServerMessage::End) | None => Ok(Phase::Closed(None)),
            Some(other) => {
                tracing::warn!("Expected START, got {:?}", other);
                Ok(Phase::Closed(None))
            }
        }
    }

    fn make_move(&mut self, mut game: GameState) -> Result<Phase> {
        let action = match self
            .player
            .select_move(&game.board, game.colour, game.turn, self.budget)
        {
            Ok(action) => action,
            Err(EngineError::NoLegalMove) => {
                tracing::warn!("No legal move left on turn {}", game.turn);
                return Ok(Phase::Closed(Some(game)));
            }
            Err(e) => return Err(e).context("Failed to select a move"),
        };

        if let Action::Place(mv) = action {
            game.board.place(mv, game.colour);
        }
        self.writer
            .write_all(format_action(action).as_bytes())
            .and_then(|_| self.writer.flush())
            .context("Failed to send move")?;
        tracing::info!("Turn {}: sent {:?}", game.turn, action);
        self.actions.push(action);

        Ok(Phase::WaitMessage(game))
    }

    fn wait_message(&mut self, mut game: GameState) -> Result<Phase> {
        let message = self.next_message()?;
        game.turn += 1;

        match message {
            Some(ServerMessage::Change { action, next }) => {
                if let Action::Place(mv) = action {
                    match game.board.validate(mv) {
                        Err(e @ EngineError::OutOfBounds { .. }) => {
                            tracing::warn!("Ignoring reported move: {}", e)
                        }
                        Err(e) => tracing::debug!("Reported move already on the board: {}", e),
                        Ok(()) => {}
                    }
                }
                apply_opponent_update(&mut game.board, &mut game.colour, action);
                if next == game.colour {
                    Ok(Phase::MakeMove(game))
                } else {
                    Ok(Phase::WaitMessage(game))
                }
            }
            Some(ServerMessage::Start { .. }) => {
                tracing::warn!("Ignoring START in the middle of a game");
                Ok(Phase::WaitMessage(game))
            }
            Some(ServerMessage::End) | None => Ok(Phase::Closed(Some(game))),
        }
    }

    /// Next decoded message, skipping blank lines. `None` at end of stream.
    fn next_message(&mut self) -> Result<Option<ServerMessage>> {
        loop {
            let mut line = String::new();
            let read = self
                .reader
                .read_line(&mut line)
                .context("Failed to read from server")?;
            if read == 0 {
                return Ok(None);
            }
            match parse_message(&line) {
                Ok(message) => return Ok(Some(message)),
                Err(ProtocolError::Empty) => continue,
                Err(e) => {
                    return Err(e).with_context(|| format!("Bad server message: {}", line.trim()))
                }
            }
        }
    }
}

/// Connect to a game server and play one game
pub fn connect(host: &str, port: u16, player: HexPlayer) -> Result<SessionSummary> {
    let stream = TcpStream::connect((host, port))
        .with_context(|| format!("Failed to connect to {}:{}", host, port))?;
    tracing::info!("Connected to {}:{}", host, port);
    let reader = BufReader::new(stream.try_clone().context("Failed to clone socket")?);
    Session::new(reader, stream, player).run()
}
