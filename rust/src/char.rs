use lazy_static::lazy_static;

/// Set of byte values, used for matching classes of characters while lexing.
pub struct CharFilter {
    seen: [bool; 256],
}

impl CharFilter {
    pub fn new() -> CharFilter {
        CharFilter { seen: [false; 256] }
    }

    pub fn from_chars(chars: &[u8]) -> CharFilter {
        let mut filter = CharFilter::new();
        for &c in chars {
            filter.seen[c as usize] = true;
        }
        filter
    }

    pub fn from_ranges(ranges: &[(u8, u8)]) -> CharFilter {
        let mut filter = CharFilter::new();
        for &(from, to) in ranges {
            for c in from..=to {
                filter.seen[c as usize] = true;
            }
        }
        filter
    }

    pub fn add_chars(mut self, chars: &[u8]) -> CharFilter {
        for &c in chars {
            self.seen[c as usize] = true;
        }
        self
    }

    pub fn has(&self, c: u8) -> bool {
        self.seen[c as usize]
    }
}

pub const ID_START_CHARSTR: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_$";
pub const ID_CONTINUE_CHARSTR: &[u8] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_$";

lazy_static! {
    pub static ref DIGIT: CharFilter = CharFilter::from_ranges(&[(b'0', b'9')]);
    pub static ref DIGIT_HEX: CharFilter =
        CharFilter::from_ranges(&[(b'0', b'9'), (b'a', b'f'), (b'A', b'F')]);
    pub static ref ID_START: CharFilter = CharFilter::from_chars(ID_START_CHARSTR);
    pub static ref ID_CONTINUE: CharFilter = CharFilter::from_chars(ID_CONTINUE_CHARSTR);
    pub static ref WHITESPACE: CharFilter =
        CharFilter::from_chars(&[b'\x09', b'\x0b', b'\x0c', b'\x20']);
    pub static ref LINE_TERMINATOR: CharFilter = CharFilter::from_chars(&[b'\x0a', b'\x0d']);
}
