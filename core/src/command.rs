use alloc::string::{String, ToString};
use core::num::IntErrorKind;

use crate::*;

pub const LOAD_PREFIX: &str = "LOAD ";
pub const DISPLAY_PREFIX: &str = "DISPLAY";
pub const TOUCH_PREFIX: &str = "TOUCH ";

/// One recognised line of a command script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Board file path, taken verbatim from the rest of the line.
    Load(String),
    Display,
    /// 1-based `(x, y)`, not yet range-checked.
    Touch(i64, i64),
}

impl Command {
    /// Parses a single line. Lines without a known prefix yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        if let Some(path) = line.strip_prefix(LOAD_PREFIX) {
            if path.is_empty() {
                return Err(malformed(line, "missing board path"));
            }
            Ok(Some(Self::Load(path.to_string())))
        } else if line.starts_with(DISPLAY_PREFIX) {
            Ok(Some(Self::Display))
        } else if let Some(args) = line.strip_prefix(TOUCH_PREFIX) {
            let mut parts = args.split_whitespace();
            let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(malformed(line, "expected two coordinates"));
            };
            let x = parse_coord(x).ok_or_else(|| malformed(line, "x is not an integer"))?;
            let y = parse_coord(y).ok_or_else(|| malformed(line, "y is not an integer"))?;
            Ok(Some(Self::Touch(x, y)))
        } else {
            Ok(None)
        }
    }
}

/// Integers too large for `i64` saturate, so they land off the board instead of failing.
fn parse_coord(text: &str) -> Option<i64> {
    match text.parse::<i64>() {
        Ok(value) => Some(value),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

fn malformed(line: &str, reason: &str) -> GameError {
    GameError::MalformedCommand {
        line: line.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!(
            Command::parse("LOAD boards/my board.txt").unwrap(),
            Some(Command::Load("boards/my board.txt".into()))
        );
        assert_eq!(Command::parse("DISPLAY").unwrap(), Some(Command::Display));
        assert_eq!(Command::parse("TOUCH 3 7").unwrap(), Some(Command::Touch(3, 7)));
        assert_eq!(Command::parse("TOUCH  0   -2 ").unwrap(), Some(Command::Touch(0, -2)));
    }

    #[test]
    fn oversized_coordinates_saturate() {
        assert_eq!(
            Command::parse("TOUCH 99999999999999999999 1").unwrap(),
            Some(Command::Touch(i64::MAX, 1))
        );
        assert_eq!(
            Command::parse("TOUCH 3 -99999999999999999999").unwrap(),
            Some(Command::Touch(3, i64::MIN))
        );
    }

    #[test]
    fn ignores_unknown_lines() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("# comment").unwrap(), None);
        assert_eq!(Command::parse("touch 1 1").unwrap(), None);
        assert_eq!(Command::parse("TOUCH").unwrap(), None);
    }

    #[test]
    fn rejects_bad_touch_arguments() {
        for line in ["TOUCH a 1", "TOUCH 1", "TOUCH 1 2 3", "TOUCH 1 b"] {
            assert!(
                matches!(Command::parse(line), Err(GameError::MalformedCommand { .. })),
                "{line}"
            );
        }
        assert!(Command::parse("LOAD ").is_err());
    }
}
