//! Duration literals: a decimal number followed by an optional unit suffix.
//! Without a suffix the number counts as milliseconds. The literal `infinite`
//! is accepted only by call sites that opt in and reads as the
//! `Duration::MAX` sentinel.

use std::time::Duration;

use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{char, digit1, space0};
use nom::combinator::{all_consuming, map, map_res, opt, recognize};
use nom::sequence::{pair, preceded};
use nom::IResult;

use crate::error::{Error, Result};

#[derive(Debug, PartialEq)]
enum DurationUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl DurationUnit {
    fn nanos(&self) -> u64 {
        match self {
            DurationUnit::Nanoseconds => 1,
            DurationUnit::Microseconds => 1_000,
            DurationUnit::Milliseconds => 1_000_000,
            DurationUnit::Seconds => 1_000_000_000,
            DurationUnit::Minutes => 60 * 1_000_000_000,
            DurationUnit::Hours => 60 * 60 * 1_000_000_000,
            DurationUnit::Days => 24 * 60 * 60 * 1_000_000_000,
        }
    }
}

fn nanoseconds(input: &str) -> IResult<&str, DurationUnit> {
    map(
        alt((
            tag_no_case("nanoseconds"),
            tag_no_case("nanosecond"),
            tag_no_case("nanos"),
            tag_no_case("nano"),
            tag_no_case("ns"),
        )),
        |_| DurationUnit::Nanoseconds,
    )(input)
}

fn microseconds(input: &str) -> IResult<&str, DurationUnit> {
    map(
        alt((
            tag_no_case("microseconds"),
            tag_no_case("microsecond"),
            tag_no_case("micros"),
            tag_no_case("micro"),
            tag_no_case("us"),
        )),
        |_| DurationUnit::Microseconds,
    )(input)
}

fn milliseconds(input: &str) -> IResult<&str, DurationUnit> {
    map(
        alt((
            tag_no_case("milliseconds"),
            tag_no_case("millisecond"),
            tag_no_case("millis"),
            tag_no_case("milli"),
            tag_no_case("ms"),
        )),
        |_| DurationUnit::Milliseconds,
    )(input)
}

fn seconds(input: &str) -> IResult<&str, DurationUnit> {
    map(alt((tag_no_case("seconds"), tag_no_case("second"), tag_no_case("s"))), |_| DurationUnit::Seconds)(input)
}

fn minutes(input: &str) -> IResult<&str, DurationUnit> {
    map(alt((tag_no_case("minutes"), tag_no_case("minute"), tag_no_case("m"))), |_| DurationUnit::Minutes)(input)
}

fn hours(input: &str) -> IResult<&str, DurationUnit> {
    map(alt((tag_no_case("hours"), tag_no_case("hour"), tag_no_case("h"))), |_| DurationUnit::Hours)(input)
}

fn days(input: &str) -> IResult<&str, DurationUnit> {
    map(alt((tag_no_case("days"), tag_no_case("day"), tag_no_case("d"))), |_| DurationUnit::Days)(input)
}

fn duration_unit(input: &str) -> IResult<&str, DurationUnit> {
    alt((nanoseconds, microseconds, milliseconds, seconds, minutes, hours, days))(input)
}

/// An unsigned decimal number; the sign-less grammar is what rejects
/// negative durations.
fn decimal(input: &str) -> IResult<&str, f64> {
    map_res(recognize(pair(digit1, opt(pair(char('.'), digit1)))), str::parse::<f64>)(input)
}

pub(crate) fn parse_duration(input: &str, allow_infinite: bool) -> Result<Duration> {
    if input.eq_ignore_ascii_case("infinite") {
        return if allow_infinite {
            Ok(Duration::MAX)
        } else {
            Err(Error::InfiniteDisallowed)
        };
    }
    if input.starts_with('-') {
        return Err(Error::NegativeValue(input.to_string()));
    }
    match all_consuming(pair(decimal, opt(preceded(space0, duration_unit))))(input) {
        Ok((_, (value, unit))) => {
            let unit = unit.unwrap_or(DurationUnit::Milliseconds);
            let nanos = unit.nanos() as f64 * value;
            Ok(Duration::from_nanos(nanos as u64))
        }
        Err(_) => Err(Error::BadDuration(input.to_string())),
    }
}
