/// Ordinary least-squares fit of y on x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub n: usize,
}

/// Fit a straight line through `points` by least squares.
///
/// Returns `None` for fewer than two points, when any coordinate is not
/// finite, or when x has no variance (vertical data).
pub fn linear_fit(points: &[(f64, f64)]) -> Option<LinearFit> {
    let n = points.len();
    if n < 2 || points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return None;
    }

    let nf = n as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / nf;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / nf;

    let mut ss_xx = 0.0;
    let mut ss_yy = 0.0;
    let mut ss_xy = 0.0;
    for (x, y) in points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        ss_xx += dx * dx;
        ss_yy += dy * dy;
        ss_xy += dx * dy;
    }

    if ss_xx == 0.0 {
        return None;
    }

    let slope = ss_xy / ss_xx;
    let intercept = mean_y - slope * mean_x;
    // Constant y fits exactly; avoid 0/0 in the correlation.
    let r_squared = if ss_yy == 0.0 {
        1.0
    } else {
        (ss_xy * ss_xy) / (ss_xx * ss_yy)
    };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
        n,
    })
}
