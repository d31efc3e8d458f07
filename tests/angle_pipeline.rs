//! End-to-end tests of the angle pipeline:
//! orbit → kneading sequence → itinerary → polynomial → associated root.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use kneading_core::{Angle, AssociatedRoot, DynamicsError, Period, PowerNotation};
use num_complex::Complex64;

// ─── helpers ─────────────────────────────────────────────────────────────────

fn angle(num: i64, den: i64) -> Angle {
    Angle::from_fraction(num, den).unwrap()
}

fn assert_root(a: &Angle, re: f64, im: f64) {
    let root = a
        .associated_root()
        .to_option()
        .unwrap_or_else(|| panic!("{a} has no root in the disc"));
    assert_abs_diff_eq!(root.re, re, epsilon = 1e-12);
    assert_abs_diff_eq!(root.im, im, epsilon = 1e-12);
    assert!(root.norm() <= std::f64::consts::FRAC_1_SQRT_2 + 1e-14);
}

// ─── canonical angles ────────────────────────────────────────────────────────

#[test]
fn one_half_round_trip() {
    let a = angle(1, 2);
    assert_eq!(a.kneading_sequence().to_string(), "10");
    assert_eq!(a.itinerary().to_string(), "+-");
    assert_eq!(a.itinerary_period_length(), 1);
    assert_eq!(a.polynomial().to_string(), "(+x^0)*(1-x) +(-x^1)");
    let root = a.associated_root().to_option().unwrap();
    assert_relative_eq!(root.re, 0.5, max_relative = 1e-15);
    assert_eq!(root.im, 0.0);
}

#[test]
fn one_sixth_round_trip() {
    let a = angle(1, 6);
    assert_eq!(a.period(), Period { length: 2, start_index: 1 });
    assert_eq!(a.kneading_sequence().to_string(), "110");
    assert_eq!(a.itinerary().to_string(), "+-++--");
    assert_eq!(a.itinerary_period_length(), 4);
    let root = a.associated_root().to_option().unwrap();
    let expected = Complex64::new(0.25, 0.661_437_827_766_148);
    assert_relative_eq!(root.re, expected.re, max_relative = 1e-14);
    assert_relative_eq!(root.im, expected.im, max_relative = 1e-14);
}

#[test]
fn preperiodic_angles_have_roots_in_the_disc() {
    assert_root(&angle(3, 14), 0.366_875_964_264_129_4, 0.520_259_438_865_200_9);
    assert_root(&angle(3, 8), 0.595_743_941_976_559_3, 0.254_425_889_416_369_07);
    assert_root(&angle(7, 16), 0.636_009_824_757_034_5, 0.106_924_311_121_288_4);
    assert_root(&angle(55, 256), 0.371_858_680_074_136_36, 0.519_411_153_747_942_8);
}

#[test]
fn polynomials_vanish_at_their_roots() {
    for (num, den) in [(1, 2), (1, 6), (3, 14), (3, 8), (7, 16), (55, 256), (1, 4), (5, 24)] {
        let a = angle(num, den);
        if let AssociatedRoot::Found(z) = a.associated_root() {
            assert!(a.polynomial().evaluate(z).norm() < 1e-12, "{a}");
        }
    }
}

#[test]
fn double_star_notation() {
    assert_eq!(
        angle(3, 8).polynomial().render(PowerNotation::DoubleStar),
        "(+x**0-x**1-x**2)*(1-x) +(+x**3)"
    );
}

// ─── periodic and degenerate angles ──────────────────────────────────────────

#[test]
fn zero_angle() {
    let a = angle(0, 1);
    assert_eq!(a.kneading_sequence().to_string(), "*");
    assert_eq!(a.itinerary().to_string(), "+");
    assert_eq!(a.polynomial().to_string(), "1");
    assert_eq!(a.associated_root(), AssociatedRoot::NotFound);
    assert_eq!(a.associated_root().value(), Complex64::new(0.0, 0.0));
    assert_eq!(a.binary_expansion(), "p0");
}

#[test]
fn periodic_angle_has_no_root_in_the_disc() {
    let a = angle(1, 7);
    assert_eq!(a.kneading_sequence().to_string(), "11*");
    assert_eq!(a.itinerary().to_string(), "+-++");
    assert_eq!(a.itinerary_period_length(), 3);
    assert!(!a.associated_root().is_found());
}

#[test]
fn binary_expansions_follow_the_orbit() {
    assert_eq!(angle(1, 2).binary_expansion(), "1p0");
    assert_eq!(angle(1, 6).binary_expansion(), "0p01");
    assert_eq!(angle(55, 256).binary_expansion(), "00110111p0");
    assert_eq!(angle(1, 7).binary_expansion(), "p001");
}

#[test]
fn period_partitions_every_orbit() {
    for den in 1..64 {
        for num in 0..=den {
            let a = angle(num, den);
            let p = a.period();
            assert!(p.length >= 1);
            assert_eq!(p.start_index + p.length + 1, a.orbit().len(), "{a}");
            assert_eq!(a.kneading_sequence().len(), a.orbit().len() - 1, "{a}");
        }
    }
}

// ─── input validation ────────────────────────────────────────────────────────

#[test]
fn invalid_inputs_are_rejected() {
    assert!(matches!(Angle::from_string("3/x"), Err(DynamicsError::MalformedAngle { .. })));
    assert!(matches!(Angle::from_string("34"), Err(DynamicsError::MalformedAngle { .. })));
    assert!(matches!(Angle::from_fraction(1, -3), Err(DynamicsError::NonPositiveDenominator(-3))));
    assert!(matches!(Angle::from_fraction(-1, 3), Err(DynamicsError::AngleOutOfRange { .. })));
    let err = Angle::from_string("a/b").unwrap_err();
    assert!(err.to_string().contains("'3/4'"));
}
