/// Round half away from zero to `places` decimals.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::round_to;

    #[test]
    fn rounds_to_requested_places() {
        assert_eq!(round_to(1.26, 1), 1.3);
        assert_eq!(round_to(-0.1234, 3), -0.123);
        assert_eq!(round_to(60.0, 1), 60.0);
    }
}
