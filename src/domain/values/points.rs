/// Round to one decimal place, the precision every published line uses.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
