use super::CanonicalGame;
use regex::Regex;
use std::sync::LazyLock;

static ANNOTATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}").expect("valid annotation regex"));

static BLACK_MOVE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\.\.").expect("valid black move number regex"));

static WHITESPACE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace run regex"));

static MOVE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" \d+\.").expect("valid move number regex"));

/// Characters some exporters leave glued to a ply.
const ARTIFACT_CHARS: &[char] = &['@'];

/// Why a single move-number segment was left out of the mapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SegmentError {
    #[error("segment does not start with a move number: {0:?}")]
    InvalidMoveNumber(String),
    #[error("move {0} has no plies")]
    NoPlies(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("no move text left after stripping headers and annotations")]
    EmptyMoveText,
}

/// Outcome of normalizing one game.
///
/// `pgn` and `result` are always filled in; `Partial` means some move-number
/// segments could not be decoded and were omitted from the mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Complete(CanonicalGame),
    Partial {
        game: CanonicalGame,
        errors: Vec<SegmentError>,
    },
}

impl Normalized {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    pub fn game(&self) -> &CanonicalGame {
        match self {
            Self::Complete(game) | Self::Partial { game, .. } => game,
        }
    }

    pub fn into_game(self) -> CanonicalGame {
        match self {
            Self::Complete(game) | Self::Partial { game, .. } => game,
        }
    }

    pub fn errors(&self) -> &[SegmentError] {
        match self {
            Self::Complete(_) => &[],
            Self::Partial { errors, .. } => errors,
        }
    }
}

/// Reduce a raw PGN blob to its bare move list.
///
/// Drops header lines, `{...}` annotations (clock times, comments), the
/// `N...` markers that only exist to re-anchor Black's reply after an
/// annotation and exporter artifacts. Any whitespace run (tabs included)
/// becomes one space. The result token is left in place. Applying this to
/// its own output changes nothing.
pub fn strip_annotations(raw: &str) -> String {
    let moves = raw
        .lines()
        .filter(|line| !line.trim_start().starts_with('['))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let moves = ANNOTATION_RE.replace_all(&moves, "");
    let moves = BLACK_MOVE_NUMBER_RE.replace_all(&moves, "");
    let moves = WHITESPACE_RUN_RE.replace_all(&moves, " ");
    let moves: String = moves
        .chars()
        .filter(|c| !ARTIFACT_CHARS.contains(c))
        .collect();

    WHITESPACE_RUN_RE.replace_all(&moves, " ").trim().to_string()
}

/// Normalize one raw game record into a [`CanonicalGame`].
///
/// Segments that fail to decode are reported in [`Normalized::Partial`]
/// rather than aborting; only a record with no move text at all is an error.
pub fn normalize(raw: &str) -> Result<Normalized, NormalizeError> {
    let cleaned = strip_annotations(raw);
    if cleaned.is_empty() {
        return Err(NormalizeError::EmptyMoveText);
    }

    let (pgn, result) = split_result(&cleaned);

    let mut game = CanonicalGame {
        pgn: pgn.to_string(),
        result: result.to_string(),
        ..CanonicalGame::default()
    };
    let mut errors = Vec::new();

    for segment in split_segments(pgn) {
        match parse_segment(segment) {
            Ok((number, plies)) => game.moves.entry(number).or_default().extend(plies),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(Normalized::Complete(game))
    } else {
        Ok(Normalized::Partial { game, errors })
    }
}

/// Split off the trailing token by length, so a ply that happens to end in
/// the same characters as the result keeps them.
fn split_result(cleaned: &str) -> (&str, &str) {
    match cleaned.rsplit_once(char::is_whitespace) {
        Some((moves, result)) => (moves.trim_end(), result),
        None => ("", cleaned),
    }
}

fn split_segments(moves: &str) -> Vec<&str> {
    if moves.is_empty() {
        return Vec::new();
    }

    let mut bounds = vec![0];
    bounds.extend(MOVE_NUMBER_RE.find_iter(moves).map(|m| m.start() + 1));
    bounds.push(moves.len());

    bounds
        .windows(2)
        .map(|w| moves[w[0]..w[1]].trim())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_segment(segment: &str) -> Result<(u32, Vec<String>), SegmentError> {
    let invalid = || SegmentError::InvalidMoveNumber(segment.to_string());

    let (number, rest) = segment.split_once('.').ok_or_else(invalid)?;
    let number = number
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(invalid)?;

    let plies: Vec<String> = rest.split_whitespace().map(String::from).collect();
    if plies.is_empty() {
        return Err(SegmentError::NoPlies(number));
    }
    Ok((number, plies))
}
