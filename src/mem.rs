//! Byte size literals: a decimal number followed by a unit from one of two
//! families. Decimal SI units (`kB`, `MB`, ...) are powers of 1000, binary
//! IEC units (`K`, `Ki`, `KiB`, `M`, ...) are powers of 1024; both accept
//! the long form names. Unit matching is case sensitive, `1K` and `1kB` are
//! different quantities.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, digit1, space0};
use nom::combinator::{all_consuming, map, map_res, opt, recognize};
use nom::sequence::{pair, separated_pair};
use nom::IResult;

use crate::error::{Error, Result};

#[derive(Debug, PartialEq)]
pub(crate) enum MemoryUnit {
    Bytes,
    Kilobytes,
    Kibibytes,
    Megabytes,
    Mebibytes,
    Gigabytes,
    Gibibytes,
    Terabytes,
    Tebibytes,
    Petabytes,
    Pebibytes,
    Exabytes,
    Exbibytes,
    Zettabytes,
    Zebibytes,
    Yottabytes,
    Yobibytes,
}

impl MemoryUnit {
    fn multiplier(&self) -> u128 {
        match self {
            MemoryUnit::Bytes => 1,
            MemoryUnit::Kilobytes => 1000u128.pow(1),
            MemoryUnit::Megabytes => 1000u128.pow(2),
            MemoryUnit::Gigabytes => 1000u128.pow(3),
            MemoryUnit::Terabytes => 1000u128.pow(4),
            MemoryUnit::Petabytes => 1000u128.pow(5),
            MemoryUnit::Exabytes => 1000u128.pow(6),
            MemoryUnit::Zettabytes => 1000u128.pow(7),
            MemoryUnit::Yottabytes => 1000u128.pow(8),
            MemoryUnit::Kibibytes => 1024u128.pow(1),
            MemoryUnit::Mebibytes => 1024u128.pow(2),
            MemoryUnit::Gibibytes => 1024u128.pow(3),
            MemoryUnit::Tebibytes => 1024u128.pow(4),
            MemoryUnit::Pebibytes => 1024u128.pow(5),
            MemoryUnit::Exbibytes => 1024u128.pow(6),
            MemoryUnit::Zebibytes => 1024u128.pow(7),
            MemoryUnit::Yobibytes => 1024u128.pow(8),
        }
    }
}

#[derive(Debug, PartialEq)]
pub(crate) struct MemorySize {
    size: u64,
    unit: MemoryUnit,
}

impl MemorySize {
    pub(crate) fn new(size: u64, unit: MemoryUnit) -> Self {
        MemorySize { size, unit }
    }

    pub(crate) fn bytes(&self) -> Option<u128> {
        (self.size as u128).checked_mul(self.unit.multiplier())
    }
}

fn mem_bytes(input: &str) -> IResult<&str, MemoryUnit> {
    map(alt((tag("bytes"), tag("byte"), tag("B"), tag("b"))), |_| MemoryUnit::Bytes)(input)
}

fn mem_kilobytes(input: &str) -> IResult<&str, MemoryUnit> {
    map(alt((tag("kilobytes"), tag("kilobyte"), tag("kB"))), |_| MemoryUnit::Kilobytes)(input)
}

fn mem_kibibytes(input: &str) -> IResult<&str, MemoryUnit> {
    map(alt((tag("kibibytes"), tag("kibibyte"), tag("KiB"), tag("Ki"), tag("K"), tag("k"))), |_| {
        MemoryUnit::Kibibytes
    })(input)
}

fn mem_megabytes(input: &str) -> IResult<&str, MemoryUnit> {
    map(alt((tag("megabytes"), tag("megabyte"), tag("MB"))), |_| MemoryUnit::Megabytes)(input)
}

fn mem_mebibytes(input: &str) -> IResult<&str, MemoryUnit> {
    map(alt((tag("mebibytes"), tag("mebibyte"), tag("MiB"), tag("Mi"), tag("M"), tag("m"))), |_| {
        MemoryUnit::Mebibytes
    })(input)
}

fn mem_gigabytes(input: &str) -> IResult<&str, MemoryUnit> {
    map(alt((tag("gigabytes"), tag("gigabyte"), tag("GB"))), |_| MemoryUnit::Gigabytes)(input)
}

fn mem_gibibytes(input: &str) -> IResult<&str, MemoryUnit> {
    map(alt((tag("gibibytes"), tag("gibibyte"), tag("GiB"), tag("Gi"), tag("G"), tag("g"))), |_| {
        MemoryUnit::Gibibytes
    })(input)
}

fn mem_terabytes(input: &str) -> IResult<&str, MemoryUnit> {
    map(alt((tag("terabytes"), tag("terabyte"), tag("TB"))), |_| MemoryUnit::Terabytes)(input)
}

fn mem_tebibytes(input: &str) -> IResult<&str, MemoryUnit> {
    map(alt((tag("tebibytes"), tag("tebibyte"), tag("TiB"), tag("Ti"), tag("T"), tag("t"))), |_| {
        MemoryUnit::Tebibytes
    })(input)
}

fn mem_petabytes(input: &str) -> IResult<&str, MemoryUnit> {
    map(alt((tag("petabytes"), tag("petabyte"), tag("PB"))), |_| MemoryUnit::Petabytes)(input)
}

fn mem_pebibytes(input: &str) -> IResult<&str, MemoryUnit> {
    map(alt((tag("pebibytes"), tag("pebibyte"), tag("PiB"), tag("Pi"), tag("P"), tag("p"))), |_| {
        MemoryUnit::Pebibytes
    })(input)
}

fn mem_exabytes(input: &str) -> IResult<&str, MemoryUnit> {
    map(alt((tag("exabytes"), tag("exabyte"), tag("EB"))), |_| MemoryUnit::Exabytes)(input)
}

fn mem_exbibytes(input: &str) -> IResult<&str, MemoryUnit> {
    map(alt((tag("exbibytes"), tag("exbibyte"), tag("EiB"), tag("Ei"), tag("E"), tag("e"))), |_| {
        MemoryUnit::Exbibytes
    })(input)
}

fn mem_zettabytes(input: &str) -> IResult<&str, MemoryUnit> {
    map(alt((tag("zettabytes"), tag("zettabyte"), tag("ZB"))), |_| MemoryUnit::Zettabytes)(input)
}

fn mem_zebibytes(input: &str) -> IResult<&str, MemoryUnit> {
    map(alt((tag("zebibytes"), tag("zebibyte"), tag("ZiB"), tag("Zi"), tag("Z"), tag("z"))), |_| {
        MemoryUnit::Zebibytes
    })(input)
}

fn mem_yottabytes(input: &str) -> IResult<&str, MemoryUnit> {
    map(alt((tag("yottabytes"), tag("yottabyte"), tag("YB"))), |_| MemoryUnit::Yottabytes)(input)
}

fn mem_yobibytes(input: &str) -> IResult<&str, MemoryUnit> {
    map(alt((tag("yobibytes"), tag("yobibyte"), tag("YiB"), tag("Yi"), tag("Y"), tag("y"))), |_| {
        MemoryUnit::Yobibytes
    })(input)
}

/// Decimal families are tried before their binary siblings so that `kB`
/// never lexes as the bare binary `k`.
fn memory_unit(input: &str) -> IResult<&str, MemoryUnit> {
    alt((
        mem_bytes,
        mem_kilobytes,
        mem_kibibytes,
        mem_megabytes,
        mem_mebibytes,
        mem_gigabytes,
        mem_gibibytes,
        mem_terabytes,
        mem_tebibytes,
        mem_petabytes,
        mem_pebibytes,
        mem_exabytes,
        mem_exbibytes,
        mem_zettabytes,
        mem_zebibytes,
        mem_yottabytes,
        mem_yobibytes,
    ))(input)
}

/// An unsigned decimal number; fractional sizes floor to a whole unit count.
fn decimal(input: &str) -> IResult<&str, u64> {
    map_res(recognize(pair(digit1, opt(pair(char('.'), digit1)))), |s: &str| {
        s.parse::<f64>().map(|v| v as u64)
    })(input)
}

fn memory_size(input: &str) -> IResult<&str, MemorySize> {
    map(separated_pair(decimal, space0, memory_unit), |(size, unit)| MemorySize::new(size, unit))(input)
}

pub(crate) fn parse_byte_size(input: &str) -> Result<u128> {
    if input.starts_with('-') {
        return Err(Error::NegativeValue(input.to_string()));
    }
    match all_consuming(memory_size)(input) {
        Ok((_, size)) => size.bytes().ok_or_else(|| Error::ByteSizeOverflow(input.to_string())),
        Err(_) => Err(Error::BadByteSize(input.to_string())),
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    macro_rules! assert_memory_size (
        ($mem_unit:expr, $value:expr, $($rest:expr),+) => {
            assert_memory_size!($mem_unit, $value);
            assert_memory_size!($mem_unit, $($rest),+);
        };
        ($mem_unit:expr, $value:expr) => {
            assert_eq!(memory_size(format!("123{}", $value).as_str()), Ok(("", MemorySize::new(123, $mem_unit))));
            assert_eq!(memory_size(format!("321 {}", $value).as_str()), Ok(("", MemorySize::new(321, $mem_unit))));
        }
    );

    #[test]
    fn recognizes_bytes() {
        assert_memory_size!(MemoryUnit::Bytes, "B", "b", "byte", "bytes");
    }

    #[test]
    fn recognizes_kilobytes() {
        assert_memory_size!(MemoryUnit::Kilobytes, "kilobytes", "kilobyte", "kB");
    }

    #[test]
    fn recognizes_kibibytes() {
        assert_memory_size!(MemoryUnit::Kibibytes, "kibibytes", "kibibyte", "KiB", "Ki", "K", "k");
    }

    #[test]
    fn recognizes_megabytes() {
        assert_memory_size!(MemoryUnit::Megabytes, "megabytes", "megabyte", "MB");
    }

    #[test]
    fn recognizes_mebibytes() {
        assert_memory_size!(MemoryUnit::Mebibytes, "mebibytes", "mebibyte", "MiB", "Mi", "M", "m");
    }

    #[test]
    fn recognizes_gigabytes() {
        assert_memory_size!(MemoryUnit::Gigabytes, "gigabytes", "gigabyte", "GB");
    }

    #[test]
    fn recognizes_gibibytes() {
        assert_memory_size!(MemoryUnit::Gibibytes, "gibibytes", "gibibyte", "GiB", "Gi", "G", "g");
    }

    #[test]
    fn recognizes_terabytes() {
        assert_memory_size!(MemoryUnit::Terabytes, "terabytes", "terabyte", "TB");
    }

    #[test]
    fn recognizes_tebibytes() {
        assert_memory_size!(MemoryUnit::Tebibytes, "tebibytes", "tebibyte", "TiB", "Ti", "T", "t");
    }

    #[test]
    fn recognizes_the_large_families() {
        assert_memory_size!(MemoryUnit::Petabytes, "PB");
        assert_memory_size!(MemoryUnit::Pebibytes, "PiB", "Pi", "P", "p");
        assert_memory_size!(MemoryUnit::Exabytes, "EB");
        assert_memory_size!(MemoryUnit::Exbibytes, "EiB", "Ei", "E", "e");
        assert_memory_size!(MemoryUnit::Zettabytes, "ZB");
        assert_memory_size!(MemoryUnit::Zebibytes, "ZiB", "Zi", "Z", "z");
        assert_memory_size!(MemoryUnit::Yottabytes, "YB");
        assert_memory_size!(MemoryUnit::Yobibytes, "YiB", "Yi", "Y", "y");
    }

    #[test]
    fn binary_and_decimal_kilo_differ() {
        assert_eq!(parse_byte_size("1K").unwrap(), 1024);
        assert_eq!(parse_byte_size("1Ki").unwrap(), 1024);
        assert_eq!(parse_byte_size("1KiB").unwrap(), 1024);
        assert_eq!(parse_byte_size("1kB").unwrap(), 1000);
    }

    #[test]
    fn computes_byte_counts() {
        assert_eq!(parse_byte_size("128M").unwrap(), 128 * 1024 * 1024);
        assert_eq!(parse_byte_size("2GB").unwrap(), 2_000_000_000);
        assert_eq!(parse_byte_size("1Yi").unwrap(), 1024u128.pow(8));
    }

    #[test]
    fn fractional_sizes_floor() {
        assert_eq!(parse_byte_size("1.5K").unwrap(), 1024);
    }

    #[test]
    fn rejects_negative_sizes() {
        assert!(matches!(parse_byte_size("-1K"), Err(Error::NegativeValue(_))));
    }

    #[test]
    fn rejects_missing_or_unknown_units() {
        assert!(parse_byte_size("123").is_err());
        assert!(parse_byte_size("123KB").is_err());
        assert!(parse_byte_size("123 qub").is_err());
    }
}
