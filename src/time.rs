use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map_res, opt};
use nom::sequence::{pair, preceded};
use nom::IResult;

/// Number of nanoseconds in one second
pub const NANOS_PER_SEC: u64 = 1_000_000_000;

fn parse_epoch(i: &str) -> IResult<&str, (u64, Option<&str>)> {
    all_consuming(pair(
        map_res(digit1, str::parse::<u64>),
        opt(preceded(char('.'), digit1)),
    ))(i)
}

/// Split a raw epoch timestamp, as found in the `value` attribute of the PDML `timestamp`
/// field (for ex `1340954905.298858000`), into seconds and nanoseconds
///
/// Digits after the 9th fractional digit are truncated. Returns `None` if the string is not a
/// decimal number.
pub fn split_epoch(ts: &str) -> Option<(u64, u32)> {
    let (_, (secs, frac)) = parse_epoch(ts.trim()).ok()?;
    let nanos = match frac {
        None => 0,
        Some(frac) => {
            let digits = &frac[..frac.len().min(9)];
            let value: u32 = digits.parse().ok()?;
            value * 10u32.pow(9 - digits.len() as u32)
        }
    };
    Some((secs, nanos))
}

/// Return the raw epoch timestamp as a `f64` value, in seconds
pub fn epoch_f64(ts: &str) -> Option<f64> {
    let (secs, nanos) = split_epoch(ts)?;
    // XXX precision is lost past the microsecond for current dates
    Some(secs as f64 + (nanos as f64) / (NANOS_PER_SEC as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_epoch() {
        assert_eq!(
            split_epoch("1340954905.298858000"),
            Some((1340954905, 298_858_000))
        );
        assert_eq!(split_epoch("1340954905.5"), Some((1340954905, 500_000_000)));
        assert_eq!(split_epoch("12"), Some((12, 0)));
        assert_eq!(split_epoch("1.1234567891"), Some((1, 123_456_789)));
        assert_eq!(split_epoch("Jan  1, 1970"), None);
        assert_eq!(split_epoch("12.a"), None);
        assert_eq!(split_epoch(""), None);
        assert_eq!(epoch_f64("3.25"), Some(3.25));
    }
}
