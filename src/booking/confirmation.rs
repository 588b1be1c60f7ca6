use rand::Rng;

pub const PREFIX: &str = "BK";
const TIME_DIGITS: usize = 6;
const RANDOM_CHARS: usize = 4;
const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Booking reference such as `BK1234565F3K`: prefix, the last six digits of
/// the current Unix time in milliseconds, then four random base-36 characters.
pub fn generate_confirmation_number() -> String {
    let now_millis = chrono::Utc::now().timestamp_millis();
    confirmation_number_at(now_millis, &mut rand::thread_rng())
}

pub fn confirmation_number_at<R: Rng + ?Sized>(now_millis: i64, rng: &mut R) -> String {
    let time_part = now_millis.unsigned_abs() % 10u64.pow(TIME_DIGITS as u32);
    let random_part: String = (0..RANDOM_CHARS)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect();

    format!("{PREFIX}{time_part:0width$}{random_part}", width = TIME_DIGITS)
}

pub fn is_well_formed(value: &str) -> bool {
    let Some(rest) = value.strip_prefix(PREFIX) else {
        return false;
    };
    if rest.len() != TIME_DIGITS + RANDOM_CHARS {
        return false;
    }
    let (digits, suffix) = rest.split_at(TIME_DIGITS);
    digits.bytes().all(|b| b.is_ascii_digit())
        && suffix
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn uses_last_six_digits_of_the_timestamp() {
        let mut rng = StdRng::seed_from_u64(7);
        let number = confirmation_number_at(1_700_000_123_456, &mut rng);
        assert!(number.starts_with("BK123456"));
        assert_eq!(number.len(), 12);
        assert!(is_well_formed(&number));
    }

    #[test]
    fn pads_short_timestamps() {
        let mut rng = StdRng::seed_from_u64(1);
        let number = confirmation_number_at(42, &mut rng);
        assert!(number.starts_with("BK000042"));
    }

    #[test]
    fn same_seed_same_number() {
        let a = confirmation_number_at(5, &mut StdRng::seed_from_u64(99));
        let b = confirmation_number_at(5, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn generated_numbers_are_well_formed() {
        for _ in 0..50 {
            let number = generate_confirmation_number();
            assert!(is_well_formed(&number), "{number}");
        }
    }

    #[test]
    fn rejects_malformed_references() {
        assert!(!is_well_formed("XX1234565F3K"));
        assert!(!is_well_formed("BK12345"));
        assert!(!is_well_formed("BK1234565f3k"));
        assert!(is_well_formed("BK1234565F3K"));
    }
}
