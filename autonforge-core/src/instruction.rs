use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_DRIVE_TOLERANCE: f64 = 1.0;
pub const DEFAULT_TURN_TOLERANCE: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("missing {name} argument")]
    MissingArgument { name: &'static str },
    #[error("could not convert {name} '{value}' to a number")]
    InvalidNumber { name: &'static str, value: String },
    #[error("could not convert {name} '{value}' to an integer")]
    InvalidInteger { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClampState {
    Open,
    Close,
    /// Anything else, kept lowercased for the diagnostic.
    Unknown(String),
}

impl ClampState {
    fn from_word(word: &str) -> Self {
        match word.to_lowercase().as_str() {
            "open" => ClampState::Open,
            "close" => ClampState::Close,
            other => ClampState::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Drive {
        distance: f64,
        speed: i64,
        tolerance: f64,
    },
    Turn {
        angle: f64,
        speed: i64,
        tolerance: f64,
    },
    Intake {
        duration: i64,
        speed: i64,
    },
    Clamp(ClampState),
    Delay {
        duration: i64,
    },
    Unrecognized(String),
}

impl Instruction {
    pub fn parse(line: &str) -> Result<Self, LineError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let args = Args(&tokens);

        let instruction = match tokens.first().copied() {
            Some("DRIVE") => Instruction::Drive {
                distance: args.float(1, "distance")?,
                speed: args.integer(2, "speed")?,
                tolerance: args.optional_float(3, "tolerance", DEFAULT_DRIVE_TOLERANCE)?,
            },
            Some("TURN") => Instruction::Turn {
                angle: args.float(1, "angle")?,
                speed: args.integer(2, "speed")?,
                tolerance: args.optional_float(3, "tolerance", DEFAULT_TURN_TOLERANCE)?,
            },
            Some("INTAKE") => Instruction::Intake {
                duration: args.integer(1, "duration")?,
                speed: args.integer(2, "speed")?,
            },
            Some("CLAMP") => Instruction::Clamp(ClampState::from_word(args.word(1, "state")?)),
            Some("DELAY") => Instruction::Delay {
                duration: args.integer(1, "duration")?,
            },
            _ => Instruction::Unrecognized(line.to_string()),
        };
        Ok(instruction)
    }
}

pub fn normalize_line(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_uppercase())
}

struct Args<'a>(&'a [&'a str]);

impl<'a> Args<'a> {
    fn word(&self, index: usize, name: &'static str) -> Result<&'a str, LineError> {
        self.0
            .get(index)
            .copied()
            .ok_or(LineError::MissingArgument { name })
    }

    fn float(&self, index: usize, name: &'static str) -> Result<f64, LineError> {
        let value = self.word(index, name)?;
        parse_digits(value).ok_or_else(|| LineError::InvalidNumber {
            name,
            value: value.to_string(),
        })
    }

    fn optional_float(&self, index: usize, name: &'static str, default: f64) -> Result<f64, LineError> {
        if index < self.0.len() {
            self.float(index, name)
        } else {
            Ok(default)
        }
    }

    fn integer(&self, index: usize, name: &'static str) -> Result<i64, LineError> {
        let value = self.word(index, name)?;
        parse_digits(value).ok_or_else(|| LineError::InvalidInteger {
            name,
            value: value.to_string(),
        })
    }
}

fn parse_digits<T: FromStr>(value: &str) -> Option<T> {
    if !value.contains('_') {
        return value.parse().ok();
    }
    let bytes = value.as_bytes();
    let separated = bytes.iter().enumerate().all(|(i, byte)| {
        *byte != b'_'
            || (i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    });
    if !separated {
        return None;
    }
    value.replace('_', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<Instruction, LineError> {
        Instruction::parse(&normalize_line(raw).unwrap())
    }

    #[test]
    fn blank_lines_normalize_to_none() {
        assert_eq!(normalize_line(""), None);
        assert_eq!(normalize_line("   \t "), None);
        assert_eq!(normalize_line("  drive 1 2 "), Some("DRIVE 1 2".to_string()));
    }

    #[test]
    fn parses_drive_with_default_tolerance() {
        assert_eq!(
            parse("drive 24 110"),
            Ok(Instruction::Drive {
                distance: 24.0,
                speed: 110,
                tolerance: DEFAULT_DRIVE_TOLERANCE,
            })
        );
    }

    #[test]
    fn parses_turn_with_explicit_tolerance() {
        assert_eq!(
            parse("TURN -45.5 90 0.5"),
            Ok(Instruction::Turn {
                angle: -45.5,
                speed: 90,
                tolerance: 0.5,
            })
        );
    }

    #[test]
    fn parses_fixed_arity_verbs() {
        assert_eq!(
            parse("intake 1000 127"),
            Ok(Instruction::Intake {
                duration: 1000,
                speed: 127,
            })
        );
        assert_eq!(parse("delay 500"), Ok(Instruction::Delay { duration: 500 }));
        assert_eq!(parse("clamp Open"), Ok(Instruction::Clamp(ClampState::Open)));
        assert_eq!(parse("CLAMP close"), Ok(Instruction::Clamp(ClampState::Close)));
        assert_eq!(
            parse("clamp Sideways"),
            Ok(Instruction::Clamp(ClampState::Unknown("sideways".to_string())))
        );
    }

    #[test]
    fn unknown_verbs_keep_normalized_text() {
        assert_eq!(
            parse("  strafe 12 "),
            Ok(Instruction::Unrecognized("STRAFE 12".to_string()))
        );
    }

    #[test]
    fn reports_first_bad_argument() {
        assert_eq!(
            parse("DRIVE abc"),
            Err(LineError::InvalidNumber {
                name: "distance",
                value: "ABC".to_string(),
            })
        );
        assert_eq!(
            parse("DRIVE 12"),
            Err(LineError::MissingArgument { name: "speed" })
        );
        assert_eq!(
            parse("TURN 90 fast"),
            Err(LineError::InvalidInteger {
                name: "speed",
                value: "FAST".to_string(),
            })
        );
        assert_eq!(
            parse("DELAY 2.5"),
            Err(LineError::InvalidInteger {
                name: "duration",
                value: "2.5".to_string(),
            })
        );
        assert_eq!(parse("CLAMP"), Err(LineError::MissingArgument { name: "state" }));
    }

    #[test]
    fn bad_optional_tolerance_fails_the_line() {
        assert_eq!(
            parse("DRIVE 12 100 loose"),
            Err(LineError::InvalidNumber {
                name: "tolerance",
                value: "LOOSE".to_string(),
            })
        );
    }

    #[test]
    fn accepts_underscore_digit_separators() {
        assert_eq!(
            parse("DRIVE 1_000 5"),
            Ok(Instruction::Drive {
                distance: 1000.0,
                speed: 5,
                tolerance: DEFAULT_DRIVE_TOLERANCE,
            })
        );
        assert_eq!(parse("delay 1_500"), Ok(Instruction::Delay { duration: 1500 }));
        assert_eq!(
            parse("TURN 4_5.2_5 9_0"),
            Ok(Instruction::Turn {
                angle: 45.25,
                speed: 90,
                tolerance: DEFAULT_TURN_TOLERANCE,
            })
        );
    }

    #[test]
    fn rejects_misplaced_separators() {
        for line in ["DELAY _10", "DELAY 10_", "DELAY 1__0", "DRIVE 1_.5 10"] {
            assert!(parse(line).is_err(), "{line}");
        }
    }

    #[test]
    fn integers_beyond_i64_fail_the_line() {
        assert_eq!(
            parse("DELAY 99999999999999999999"),
            Err(LineError::InvalidInteger {
                name: "duration",
                value: "99999999999999999999".to_string(),
            })
        );
    }

    #[test]
    fn integer_speed_rejects_fractions() {
        assert!(matches!(
            parse("INTAKE 1000 12.7"),
            Err(LineError::InvalidInteger { name: "speed", .. })
        ));
    }
}
