/// Affine mapping from a domain interval onto a range interval.
///
/// A zero-width domain (every input ties) maps everything to the start of the
/// range, so a metric on which all modules agree contributes nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map `x` from the domain onto the range.
    pub fn map(&self, x: f64) -> f64 {
        let (x0, x1) = self.domain;
        let (y0, y1) = self.range;
        let width = x1 - x0;
        if width == 0.0 || !width.is_finite() {
            return y0;
        }
        y0 + (x - x0) * (y1 - y0) / width
    }
}
