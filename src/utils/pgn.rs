//! PGN read/write utilities for game history interchange.
//!
//! Serializes the move history and headers to PGN text and replays PGN text
//! into a fresh game. The `Variant`, `TimeControl`, `SetUp`/`FEN` and
//! `Termination` tags carry the game configuration and how it ended.

use std::collections::BTreeMap;

use chrono::Local;
use log::warn;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;
use crate::game_state::game_config::GameConfig;
use crate::game_state::game_outcome::{DrawReason, GameResult, GameStatus, WinReason};
use crate::game_state::placement::default_starting_fen;
use crate::game_state::undo_state::revert_move;
use crate::game_state::variants::{Variant, VariantSet};
use crate::move_generation::move_registration::register_any_move;
use crate::timing::time_control::TimeControl;

pub const TERMINATION_NORMAL: &str = "normal";
pub const TERMINATION_TIME_FORFEIT: &str = "time forfeit";
pub const TERMINATION_ABANDONED: &str = "abandoned";

#[derive(Debug, Clone)]
pub struct PgnGame {
    pub headers: BTreeMap<String, String>,
    pub config: GameConfig,
    /// Replayed position; its `move_history` holds every movetext move.
    pub final_state: GameState,
    pub result: String,
}

/// FEN of the position before the first recorded move.
pub fn initial_fen(state: &GameState) -> String {
    let mut initial = state.clone();
    while let Some(record) = initial.move_history.pop() {
        revert_move(&mut initial, record.undo);
    }
    initial.get_fen()
}

fn termination(state: &GameState) -> &'static str {
    match (state.status, state.result) {
        (GameStatus::Aborted, _) => TERMINATION_ABANDONED,
        (
            _,
            Some(GameResult::Win {
                reason: WinReason::TimeForfeit,
                ..
            }),
        ) => TERMINATION_TIME_FORFEIT,
        _ => TERMINATION_NORMAL,
    }
}

fn result_token(state: &GameState) -> &'static str {
    match (state.status, state.result) {
        (GameStatus::Finished, Some(result)) => result.pgn_token(),
        _ => "*",
    }
}

/// Standard headers for `state`, dated today.
pub fn default_headers(state: &GameState, time_control: &TimeControl) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::<String, String>::new();
    headers.insert("Event".to_owned(), "Casual Game".to_owned());
    headers.insert("Site".to_owned(), "Local".to_owned());
    headers.insert("Date".to_owned(), Local::now().format("%Y.%m.%d").to_string());
    headers.insert("White".to_owned(), "White".to_owned());
    headers.insert("Black".to_owned(), "Black".to_owned());
    headers.insert("Result".to_owned(), result_token(state).to_owned());
    headers.insert("Variant".to_owned(), state.variants.pgn_name());
    headers.insert("TimeControl".to_owned(), time_control.to_string());
    headers.insert("Termination".to_owned(), termination(state).to_owned());

    let fen = initial_fen(state);
    let default_fen = default_starting_fen(state.variants, &mut StdRng::seed_from_u64(0));
    if state.variants.contains(Variant::Chess960) || fen != default_fen {
        headers.insert("SetUp".to_owned(), "1".to_owned());
        headers.insert("FEN".to_owned(), fen);
    }
    headers
}

pub fn write_pgn(state: &GameState, time_control: &TimeControl) -> String {
    write_pgn_with_headers(state, &default_headers(state, time_control))
}

pub fn write_pgn_with_headers(state: &GameState, headers: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (key, value) in headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, escape_pgn_value(value)));
    }
    out.push('\n');

    let first_ply = state.starting_data.starting_ply;
    let mut movetext_parts = Vec::<String>::with_capacity(state.move_history.len() + 1);
    for (offset, record) in state.move_history.iter().enumerate() {
        let ply = first_ply + offset as u32;
        let number = ply / 2 + 1;
        if ply % 2 == 0 {
            movetext_parts.push(format!("{number}. {}", record.san));
        } else if offset == 0 {
            movetext_parts.push(format!("{number}... {}", record.san));
        } else {
            movetext_parts.push(record.san.clone());
        }
    }
    let result = headers
        .get("Result")
        .map(|x| normalize_result(x))
        .unwrap_or("*");
    movetext_parts.push(result.to_owned());
    out.push_str(&movetext_parts.join(" "));
    out.push('\n');
    out
}

/// Builds the configuration the headers describe.
fn config_from_headers(headers: &BTreeMap<String, String>, seed: Option<u64>) -> ChessResult<GameConfig> {
    let variants = VariantSet::parse(headers.get("Variant").map_or("", String::as_str))?;
    let time_control = TimeControl::parse(headers.get("TimeControl").map_or("-", String::as_str))?;
    let mut config = GameConfig::new(variants).with_time_control(time_control);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    match (headers.get("SetUp").map(String::as_str), headers.get("FEN")) {
        (Some("1"), None) => {
            return Err(ChessErrors::InvalidPgn(
                "SetUp is 1 but the FEN tag is missing".to_owned(),
            ))
        }
        (_, Some(fen)) => config = config.with_fen(fen.clone()),
        _ => {
            if variants.contains(Variant::Chess960) {
                return Err(ChessErrors::InvalidPgn(
                    "Chess960 game without a FEN tag".to_owned(),
                ));
            }
        }
    }
    Ok(config)
}

/// Parses PGN text and replays its moves. Any bad tag or move aborts the
/// whole read.
pub fn read_pgn(pgn: &str) -> ChessResult<PgnGame> {
    read_pgn_with_seed(pgn, None)
}

/// Headers, configuration and movetext of a PGN game, before any move is
/// played.
#[derive(Debug, Clone)]
pub struct ParsedPgn {
    pub headers: BTreeMap<String, String>,
    pub config: GameConfig,
    /// Move tokens in order, with move numbers, NAGs and annotations removed.
    pub moves: Vec<String>,
    pub result: String,
}

impl ParsedPgn {
    pub fn termination(&self) -> Option<&str> {
        self.headers.get("Termination").map(String::as_str)
    }
}

pub fn parse_pgn(pgn: &str) -> ChessResult<ParsedPgn> {
    parse_pgn_with_seed(pgn, None)
}

pub fn parse_pgn_with_seed(pgn: &str, seed: Option<u64>) -> ChessResult<ParsedPgn> {
    let mut headers = BTreeMap::<String, String>::new();
    let mut movetext_lines = Vec::<String>::new();

    for line in pgn.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        if trimmed.starts_with('[') {
            let (k, v) = parse_header_line(trimmed)?;
            headers.insert(k, v);
        } else {
            movetext_lines.push(trimmed.to_owned());
        }
    }

    let config = config_from_headers(&headers, seed)?;
    let mut moves = Vec::new();
    let mut result = "*".to_owned();

    let movetext = strip_pgn_comments_and_variations(&movetext_lines.join(" "));
    for token in movetext.split_whitespace() {
        let token = strip_move_number(token);
        if token.is_empty() || token.starts_with('$') {
            continue;
        }

        let cleaned = trim_annotation_suffix(token);
        if is_result_token(cleaned) {
            result = normalize_result(cleaned).to_owned();
            break;
        }
        moves.push(cleaned.to_owned());
    }

    if let Some(header_result) = headers.get("Result") {
        if is_result_token(header_result) {
            result = header_result.clone();
        }
    }

    Ok(ParsedPgn {
        headers,
        config,
        moves,
        result,
    })
}

pub fn read_pgn_with_seed(pgn: &str, seed: Option<u64>) -> ChessResult<PgnGame> {
    let parsed = parse_pgn_with_seed(pgn, seed)?;
    let mut state = GameState::new(&parsed.config)?;

    for token in &parsed.moves {
        if let Err(error) = register_any_move(&mut state, token) {
            warn!("PGN replay stopped at '{token}' after {} moves: {error}", state.move_history.len());
            return Err(error);
        }
    }
    close_by_termination(&mut state, &parsed.result, parsed.termination());

    Ok(PgnGame {
        headers: parsed.headers,
        config: parsed.config,
        final_state: state,
        result: parsed.result,
    })
}

/// Results the board alone cannot explain: resignation, time forfeit,
/// agreed draws and abandoned games.
pub fn close_by_termination(state: &mut GameState, result: &str, termination: Option<&str>) {
    if !state.is_ongoing() {
        return;
    }
    let by_time = termination.is_some_and(|text| text.eq_ignore_ascii_case(TERMINATION_TIME_FORFEIT));
    let abandoned = termination.is_some_and(|text| text.eq_ignore_ascii_case(TERMINATION_ABANDONED));
    let reason = if by_time {
        WinReason::TimeForfeit
    } else {
        WinReason::Resignation
    };
    let closing = match result {
        "1-0" => Some(GameResult::Win { winner: Color::Light, reason }),
        "0-1" => Some(GameResult::Win { winner: Color::Dark, reason }),
        "1/2-1/2" => Some(GameResult::Draw(DrawReason::Agreement)),
        _ => None,
    };
    match closing {
        Some(closing) => {
            state.status = GameStatus::Finished;
            state.result = Some(closing);
        }
        None if abandoned => state.status = GameStatus::Aborted,
        None => {}
    }
}

fn parse_header_line(line: &str) -> ChessResult<(String, String)> {
    let invalid = || ChessErrors::InvalidPgn(format!("invalid header line: {line}"));
    if !line.starts_with('[') || !line.ends_with(']') {
        return Err(invalid());
    }
    let inner = &line[1..line.len() - 1];
    let mut parts = inner.splitn(2, ' ');
    let key = parts.next().ok_or_else(invalid)?.trim();
    let value_raw = parts.next().ok_or_else(invalid)?.trim();

    if key.is_empty() || !value_raw.starts_with('"') || !value_raw.ends_with('"') || value_raw.len() < 2 {
        return Err(invalid());
    }
    let value = value_raw[1..value_raw.len() - 1]
        .replace("\\\"", "\"")
        .replace("\\\\", "\\");
    Ok((key.to_owned(), value))
}

fn strip_pgn_comments_and_variations(text: &str) -> String {
    let mut out = String::new();
    let mut brace_depth = 0usize;
    let mut paren_depth = 0usize;

    for ch in text.chars() {
        match ch {
            '{' => brace_depth = brace_depth.saturating_add(1),
            '}' => {
                brace_depth = brace_depth.saturating_sub(1);
                out.push(' ');
            }
            '(' if brace_depth == 0 => paren_depth = paren_depth.saturating_add(1),
            ')' if brace_depth == 0 => {
                paren_depth = paren_depth.saturating_sub(1);
                out.push(' ');
            }
            _ if brace_depth == 0 && paren_depth == 0 => out.push(ch),
            _ => {}
        }
    }

    out
}

/// Drops a leading move number (`12.`, `12...`, `12.e4`) from a token.
fn strip_move_number(token: &str) -> &str {
    let digits = token.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 || !token[digits..].starts_with('.') {
        return token;
    }
    token[digits..].trim_start_matches('.')
}

fn trim_annotation_suffix(token: &str) -> &str {
    token.trim_end_matches(|c: char| matches!(c, '!' | '?'))
}

fn is_result_token(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

fn normalize_result(result: &str) -> &str {
    if is_result_token(result) {
        result
    } else {
        "*"
    }
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
