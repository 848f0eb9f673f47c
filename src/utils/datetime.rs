//! Date/time values found in image metadata
//!
//! EXIF stores capture dates as `YYYY:MM:DD HH:mm:ss` with no time zone.
//! XMP uses an ISO 8601 profile that allows partial dates, fractional seconds
//! and zone offsets. Both parse into the same [`DateTime`].

use crate::core::error::{MetaError, MetaResult};
use std::fmt;

/// A calendar date/time with optional components
///
/// Partial XMP dates leave `month`/`day` at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTime {
    /// Year
    pub year: i32,
    /// Month (1-12, 0 means not set)
    pub month: u8,
    /// Day (1-31, 0 means not set)
    pub day: u8,
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
    /// Nanoseconds (0-999999999)
    pub nanosecond: u32,
    /// Whether time components are present
    pub has_time: bool,
    /// Zone offset east of UTC in minutes, `None` when no zone was given
    pub offset_minutes: Option<i16>,
}

impl DateTime {
    /// Build a zone-less date and time
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            nanosecond: 0,
            has_time: true,
            offset_minutes: None,
        }
    }

    /// Parse the fixed EXIF layout `YYYY:MM:DD HH:mm:ss`
    ///
    /// ```rust
    /// use metakit::DateTime;
    ///
    /// let dt = DateTime::parse_exif("2020:10:09 14:21:50").unwrap();
    /// assert_eq!(dt, DateTime::new(2020, 10, 9, 14, 21, 50));
    /// ```
    pub fn parse_exif(s: &str) -> MetaResult<Self> {
        let s = s.trim_end_matches(['\0', ' ']);
        let bytes = s.as_bytes();
        if bytes.len() != 19 || !s.is_ascii() {
            return Err(MetaError::malformed(format!(
                "EXIF date '{s}' is not 19 ASCII characters"
            )));
        }
        for (pos, sep) in [(4, b':'), (7, b':'), (10, b' '), (13, b':'), (16, b':')] {
            if bytes[pos] != sep {
                return Err(MetaError::malformed(format!(
                    "EXIF date '{s}' has no '{}' at {pos}",
                    sep as char
                )));
            }
        }

        let field = |start: usize, end: usize| -> MetaResult<u32> {
            let digits = &s[start..end];
            if !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(MetaError::malformed(format!(
                    "EXIF date '{s}' has non-digit field '{digits}'"
                )));
            }
            digits
                .parse()
                .map_err(|_| MetaError::malformed(format!("bad EXIF date field '{digits}'")))
        };

        let dt = Self::new(
            narrow(field(0, 4)?, "year")?,
            narrow(field(5, 7)?, "month")?,
            narrow(field(8, 10)?, "day")?,
            narrow(field(11, 13)?, "hour")?,
            narrow(field(14, 16)?, "minute")?,
            narrow(field(17, 19)?, "second")?,
        );
        dt.validate()?;
        // Cameras write all-zero placeholders when the clock was never set
        if dt.month == 0 || dt.day == 0 {
            return Err(MetaError::malformed(format!("EXIF date '{s}' has no month or day")));
        }
        Ok(dt)
    }

    /// Parse an XMP (ISO 8601 profile) date/time string
    ///
    /// Accepted forms:
    /// - `YYYY`, `YYYY-MM`, `YYYY-MM-DD`
    /// - `YYYY-MM-DDThh:mm`, `YYYY-MM-DDThh:mm:ss`, `YYYY-MM-DDThh:mm:ss.sss`
    /// - any time form followed by `Z`, `+hh:mm` or `-hh:mm`
    ///
    /// ```rust
    /// use metakit::DateTime;
    ///
    /// let dt = DateTime::parse("2023-12-25T10:30:00+08:00").unwrap();
    /// assert_eq!(dt.year, 2023);
    /// assert_eq!(dt.offset_minutes, Some(480));
    /// ```
    pub fn parse(s: &str) -> MetaResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MetaError::malformed("empty date/time string"));
        }
        let mut scanner = Scanner::new(s);
        let mut dt = Self::default();

        dt.year = narrow(scanner.number("year", 4)?, "year")?;
        if scanner.eat(b'-') {
            dt.month = narrow(scanner.number("month", 2)?, "month")?;
            if scanner.eat(b'-') {
                dt.day = narrow(scanner.number("day", 2)?, "day")?;
            }
        }

        if scanner.eat(b'T') {
            dt.has_time = true;
            dt.hour = narrow(scanner.number("hour", 2)?, "hour")?;
            scanner.expect(b':')?;
            dt.minute = narrow(scanner.number("minute", 2)?, "minute")?;
            if scanner.eat(b':') {
                dt.second = narrow(scanner.number("second", 2)?, "second")?;
                if scanner.eat(b'.') {
                    dt.nanosecond = scanner.fraction()?;
                }
            }

            if scanner.eat(b'Z') {
                dt.offset_minutes = Some(0);
            } else if let Some(sign) = scanner.sign() {
                let hours: i16 = narrow(scanner.number("zone hour", 2)?, "zone hour")?;
                scanner.expect(b':')?;
                let minutes: i16 = narrow(scanner.number("zone minute", 2)?, "zone minute")?;
                if hours > 23 || minutes > 59 {
                    return Err(MetaError::malformed(format!("zone offset out of range in '{s}'")));
                }
                dt.offset_minutes = Some(sign * (hours * 60 + minutes));
            }
        }

        if !scanner.done() {
            return Err(MetaError::malformed(format!(
                "extra characters at end of date '{s}'"
            )));
        }
        dt.validate()?;
        Ok(dt)
    }

    /// Check that every component is within range
    pub fn validate(&self) -> MetaResult<()> {
        if self.month > 12 {
            return Err(MetaError::malformed("month is out of range"));
        }
        if self.day > 31 {
            return Err(MetaError::malformed("day is out of range"));
        }
        if self.hour > 23 || self.minute > 59 || self.second > 60 {
            return Err(MetaError::malformed("time is out of range"));
        }
        if self.nanosecond >= 1_000_000_000 {
            return Err(MetaError::malformed("nanosecond is out of range"));
        }
        Ok(())
    }

    /// Format as an ISO 8601 string, keeping partial dates partial
    pub fn format(&self) -> String {
        let mut result = if self.month == 0 {
            format!("{:04}", self.year)
        } else if self.day == 0 {
            format!("{:04}-{:02}", self.year, self.month)
        } else {
            format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
        };

        if self.has_time {
            result.push_str(&format!(
                "T{:02}:{:02}:{:02}",
                self.hour, self.minute, self.second
            ));
            if self.nanosecond != 0 {
                let frac = format!("{:09}", self.nanosecond);
                result.push('.');
                result.push_str(frac.trim_end_matches('0'));
            }
            match self.offset_minutes {
                Some(0) => result.push('Z'),
                Some(offset) => {
                    let sign = if offset < 0 { '-' } else { '+' };
                    let abs = offset.unsigned_abs();
                    result.push_str(&format!("{}{:02}:{:02}", sign, abs / 60, abs % 60));
                }
                None => {}
            }
        }

        result
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Serialize for DateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.format())
    }
}

/// Convert a parsed field without wrapping
fn narrow<T: TryFrom<u32>>(value: u32, what: &str) -> MetaResult<T> {
    T::try_from(value).map_err(|_| MetaError::malformed(format!("{what} {value} is out of range")))
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn done(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.bytes.get(self.pos) == Some(&b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, b: u8) -> MetaResult<()> {
        if self.eat(b) {
            Ok(())
        } else {
            Err(MetaError::malformed(format!(
                "expected '{}' at {} in '{}'",
                b as char, self.pos, self.src
            )))
        }
    }

    fn sign(&mut self) -> Option<i16> {
        if self.eat(b'+') {
            Some(1)
        } else if self.eat(b'-') {
            Some(-1)
        } else {
            None
        }
    }

    fn digits(&mut self) -> &'a str {
        let start = self.pos;
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    fn number(&mut self, what: &str, min_digits: usize) -> MetaResult<u32> {
        let digits = self.digits();
        if digits.len() < min_digits || digits.len() > 9 {
            return Err(MetaError::malformed(format!(
                "invalid {what} in date '{}'",
                self.src
            )));
        }
        digits
            .parse()
            .map_err(|_| MetaError::malformed(format!("invalid {what} value '{digits}'")))
    }

    /// Fractional seconds, normalized to nanoseconds
    fn fraction(&mut self) -> MetaResult<u32> {
        let digits = self.digits();
        if digits.is_empty() {
            return Err(MetaError::malformed(format!(
                "empty fractional second in '{}'",
                self.src
            )));
        }
        let mut padded: String = digits.chars().take(9).collect();
        while padded.len() < 9 {
            padded.push('0');
        }
        padded
            .parse()
            .map_err(|_| MetaError::malformed("invalid fractional second"))
    }
}
