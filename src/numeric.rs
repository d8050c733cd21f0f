// Exact comparison between the three numeric representations shared by keys
// and objects. Integers are widened to i128 so that u64 and i64 always fit.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Num {
    Int(i128),
    Float(f64),
}

impl From<i64> for Num {
    fn from(v: i64) -> Self {
        Num::Int(v.into())
    }
}

impl From<u64> for Num {
    fn from(v: u64) -> Self {
        Num::Int(v.into())
    }
}

impl From<f64> for Num {
    fn from(v: f64) -> Self {
        Num::Float(v)
    }
}

pub(crate) fn compare(a: Num, b: Num) -> Ordering {
    match (a, b) {
        (Num::Int(a), Num::Int(b)) => a.cmp(&b),
        (Num::Float(a), Num::Float(b)) => a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b)),
        (Num::Int(a), Num::Float(b)) => int_float(a, b),
        (Num::Float(a), Num::Int(b)) => int_float(b, a).reverse(),
    }
}

pub(crate) fn equal(a: Num, b: Num) -> bool {
    match (a, b) {
        // NaN is never equal to anything.
        (Num::Float(a), Num::Float(b)) => a == b,
        (Num::Int(_), Num::Float(f)) | (Num::Float(f), Num::Int(_)) if f.is_nan() => false,
        _ => compare(a, b) == Ordering::Equal,
    }
}

// Rounding an integer to the nearest f64 is monotonic, so a strict
// inequality after rounding holds for the exact value too. Only when the
// rounded value ties with `f` do we need to look at the integer part of `f`,
// which is then guaranteed to be integral and in range.
fn int_float(i: i128, f: f64) -> Ordering {
    if f.is_nan() {
        // NaN has no numeric order; put positive NaN above every integer
        // and negative NaN below, as total order would.
        return if f.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    match (i as f64).partial_cmp(&f) {
        Some(Ordering::Equal) => i.cmp(&(f as i128)),
        Some(o) => o,
        None => Ordering::Less,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_representation() {
        assert!(equal(Num::from(5_i64), Num::from(5_u64)));
        assert!(equal(Num::from(5_u64), Num::from(5.0)));
        assert!(!equal(Num::from(5_i64), Num::from(5.5)));
        assert!(equal(Num::from(-0.0), Num::from(0_i64)));
        assert_eq!(compare(Num::from(-1_i64), Num::from(u64::MAX)), Ordering::Less);
        assert_eq!(compare(Num::from(u64::MAX), Num::from(i64::MAX)), Ordering::Greater);
    }

    #[test]
    fn large_integers_do_not_lose_precision() {
        // 2^53 + 1 rounds to 2^53 as a float.
        let big = (1_i64 << 53) + 1;
        let f = (1_i64 << 53) as f64;
        assert_eq!(compare(Num::from(big), Num::from(f)), Ordering::Greater);
        assert_eq!(compare(Num::from(f), Num::from(big)), Ordering::Less);
        assert!(!equal(Num::from(big), Num::from(f)));
        assert!(equal(Num::from(big - 1), Num::from(f)));
    }

    #[test]
    fn infinities() {
        assert_eq!(compare(Num::from(i64::MAX), Num::from(f64::INFINITY)), Ordering::Less);
        assert_eq!(compare(Num::from(i64::MIN), Num::from(f64::NEG_INFINITY)), Ordering::Greater);
    }

    #[test]
    fn nan_is_unequal() {
        assert!(!equal(Num::from(f64::NAN), Num::from(f64::NAN)));
        assert!(!equal(Num::from(0_i64), Num::from(f64::NAN)));
    }
}
