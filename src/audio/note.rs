//! Note name parsing ("A4", "C#3", "Eb-1" ...)
//!
//! Pitch numbering follows MIDI: `(octave + 1) * 12 + semitone`, so A4 is 69
//! and C-1 is 0.

use thiserror::Error;

/// Errors from [`parse_note`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NoteError {
    #[error("empty note name")]
    Empty,

    #[error("note name {0:?} is too short")]
    TooShort(String),

    #[error("unknown note letter {0:?}")]
    UnknownLetter(char),

    #[error("note name {0:?} has no octave number")]
    MissingOctave(String),

    #[error("unexpected {trailing:?} after note name {token:?}")]
    TrailingInput { token: String, trailing: String },

    #[error("octave in {0:?} is out of range")]
    OctaveOverflow(String),
}

/// Semitone offset of a natural note within its octave
fn semitone_of(letter: char) -> Option<i32> {
    match letter.to_ascii_uppercase() {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

/// Parse a note token into a MIDI-style pitch number
///
/// Format: letter `A`-`G` (any case), optional `#` or `b`, optional `-`,
/// then one or more decimal digits.
pub fn parse_note(token: &str) -> Result<i32, NoteError> {
    if token.is_empty() {
        return Err(NoteError::Empty);
    }
    if token.chars().count() < 2 {
        return Err(NoteError::TooShort(token.to_string()));
    }

    let mut chars = token.chars().peekable();
    let letter = chars.next().ok_or(NoteError::Empty)?;
    let mut semitone = semitone_of(letter).ok_or(NoteError::UnknownLetter(letter))?;

    match chars.peek() {
        Some('#') => {
            semitone += 1;
            chars.next();
        }
        Some('b') => {
            semitone -= 1;
            chars.next();
        }
        _ => {}
    }

    let negative = chars.next_if_eq(&'-').is_some();

    let mut octave: i32 = 0;
    let mut digits = 0;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        octave = octave
            .checked_mul(10)
            .and_then(|o| o.checked_add(d as i32))
            .ok_or_else(|| NoteError::OctaveOverflow(token.to_string()))?;
        digits += 1;
        chars.next();
    }
    if digits == 0 {
        return Err(NoteError::MissingOctave(token.to_string()));
    }

    let trailing: String = chars.collect();
    if !trailing.is_empty() {
        return Err(NoteError::TrailingInput {
            token: token.to_string(),
            trailing,
        });
    }

    if negative {
        octave = -octave;
    }

    octave
        .checked_add(1)
        .and_then(|o| o.checked_mul(12))
        .and_then(|p| p.checked_add(semitone))
        .ok_or_else(|| NoteError::OctaveOverflow(token.to_string()))
}
