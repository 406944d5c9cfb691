//! `Range` header start-offset parser.
//!
//! Only the first start offset is extracted. End offsets and multi-range
//! lists are ignored; malformed input degrades to 0.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    BeforeEquals,
    Digits,
    Done,
}

/// Extract the start offset of the first range in a `Range` header value.
pub fn parse_range_start(value: &str) -> u64 {
    let mut state = State::BeforeEquals;
    let mut start: u64 = 0;

    for byte in value.bytes() {
        match state {
            State::BeforeEquals => {
                if byte == b'=' {
                    state = State::Digits;
                }
            }
            State::Digits => match byte {
                b'0'..=b'9' => {
                    start = start
                        .saturating_mul(10)
                        .saturating_add(u64::from(byte - b'0'));
                }
                // ',' and '-' end a well-formed start; anything else is junk.
                _ => state = State::Done,
            },
            State::Done => break,
        }
    }

    start
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_ended_range() {
        assert_eq!(parse_range_start("bytes=100-"), 100);
    }

    #[test]
    fn end_offset_is_ignored() {
        assert_eq!(parse_range_start("bytes=5-9"), 5);
        assert_eq!(parse_range_start("bytes=7-8,20-30"), 7);
    }

    #[test]
    fn malformed_input_is_zero() {
        assert_eq!(parse_range_start("bytes=abc"), 0);
        assert_eq!(parse_range_start("bytes 100-"), 0);
        assert_eq!(parse_range_start(""), 0);
        assert_eq!(parse_range_start("bytes=-500"), 0);
    }

    #[test]
    fn digits_stop_at_first_junk() {
        assert_eq!(parse_range_start("bytes=12x34"), 12);
    }

    #[test]
    fn huge_offsets_saturate() {
        assert_eq!(parse_range_start("bytes=99999999999999999999999-"), u64::MAX);
    }
}
