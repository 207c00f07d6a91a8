use std::{fmt, str::FromStr, sync::OnceLock, time::Duration};

use regex::Regex;

use crate::error::Error;

/// An ffmpeg time expression, either plain seconds (`12.5`) or a clock
/// (`01:02:03.500000`), optionally signed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimeSpec {
    pub negative: bool,
    pub hours: u64,
    pub minutes: u8,
    pub seconds: u8,
    pub microseconds: u32,
}

impl TimeSpec {
    /// The total time as signed seconds.
    pub fn total_seconds(&self) -> f64 {
        let magnitude = self.hours as f64 * 3600.0
            + self.minutes as f64 * 60.0
            + self.seconds as f64
            + self.microseconds as f64 / 1e6;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// The magnitude as a `Duration`; negative specs collapse to zero.
    pub fn to_duration(&self) -> Duration {
        if self.negative {
            return Duration::ZERO;
        }
        Duration::new(
            self.hours * 3600 + self.minutes as u64 * 60 + self.seconds as u64,
            self.microseconds * 1000,
        )
    }
}

fn clock_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([+-])?(\d+):(\d{1,2}):(\d{1,2})(?:\.(\d{1,6}))?$")
            .expect("the regex is valid")
    })
}

fn seconds_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([+-])?(\d+)(?:\.(\d{1,6}))?$").expect("the regex is valid")
    })
}

/// `".5"` means 500000 microseconds, not 5.
fn parse_fraction(digits: Option<&str>) -> u32 {
    match digits {
        None => 0,
        Some(digits) => format!("{digits:0<6}")
            .parse()
            .expect("at most six digits"),
    }
}

impl FromStr for TimeSpec {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::BadTimeSyntax(text.to_string());

        if let Some(caps) = clock_regex().captures(text) {
            let minutes: u8 = caps[3].parse().map_err(|_| malformed())?;
            let seconds: u8 = caps[4].parse().map_err(|_| malformed())?;
            if minutes > 59 || seconds > 59 {
                return Err(malformed());
            }
            return Ok(Self {
                negative: caps.get(1).is_some_and(|sign| sign.as_str() == "-"),
                hours: caps[2].parse().map_err(|_| malformed())?,
                minutes,
                seconds,
                microseconds: parse_fraction(caps.get(5).map(|m| m.as_str())),
            });
        }

        if let Some(caps) = seconds_regex().captures(text) {
            let total: u64 = caps[2].parse().map_err(|_| malformed())?;
            return Ok(Self {
                negative: caps.get(1).is_some_and(|sign| sign.as_str() == "-"),
                hours: total / 3600,
                minutes: (total % 3600 / 60) as u8,
                seconds: (total % 60) as u8,
                microseconds: parse_fraction(caps.get(3).map(|m| m.as_str())),
            });
        }

        Err(malformed())
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:02}:{:02}:{:02}.{:06}",
            if self.negative { "-" } else { "" },
            self.hours,
            self.minutes,
            self.seconds,
            self.microseconds
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(text: &str) -> TimeSpec {
        text.parse().expect(text)
    }

    #[test]
    fn plain_seconds() {
        assert_eq!("00:00:12.500000", parse("12.5").to_string());
        assert_eq!("00:00:07.000000", parse("7").to_string());
        assert_eq!("01:01:30.250000", parse("3690.25").to_string());
    }

    #[test]
    fn clock_form() {
        assert_eq!("01:02:03.500000", parse("01:02:03.500000").to_string());
        assert_eq!("123:59:59.000000", parse("123:59:59").to_string());
        assert_eq!("00:00:04.100000", parse("00:00:04.10").to_string());
    }

    #[test]
    fn signs() {
        assert_eq!("-00:00:05.000000", parse("-5").to_string());
        assert_eq!("00:00:05.000000", parse("+5").to_string());
        assert_eq!(-5.0, parse("-5").total_seconds());
        assert_eq!(Duration::ZERO, parse("-01:00:00").to_duration());
    }

    #[test]
    fn totals() {
        assert_eq!(3723.5, parse("01:02:03.5").total_seconds());
        assert_eq!(Duration::from_micros(12_500_000), parse("12.5").to_duration());
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "abc", "1:2", "00:60:00", "00:00:60", "1.2345678", "5s"] {
            assert!(
                matches!(bad.parse::<TimeSpec>(), Err(Error::BadTimeSyntax(_))),
                "{bad:?} should not parse"
            );
        }
    }
}
