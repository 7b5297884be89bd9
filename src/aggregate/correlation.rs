use crate::aggregate::error::AggregateError;
use crate::types::views::CorrelationMatrix;
use crate::utils::float_values;
use polars::prelude::DataFrame;

/// Pearson correlation matrix over `columns`.
///
/// Columns not present in `filtered` are skipped. Each pair is computed
/// pairwise-complete: only rows where both values are present take part,
/// regardless of gaps in any other column.
pub fn correlation_matrix(
    filtered: &DataFrame,
    columns: &[&str],
) -> Result<CorrelationMatrix, AggregateError> {
    let available: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|name| filtered.column(name).is_ok())
        .collect();

    let series = available
        .iter()
        .map(|name| float_values(filtered, name))
        .collect::<Result<Vec<_>, _>>()?;

    let n = series.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&series[i], &series[j]);
            // A defined self-correlation is exactly 1.
            let r = if i == j { r.map(|_| 1.0) } else { r };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: available.into_iter().map(str::to_string).collect(),
        values,
    })
}

/// Pearson coefficient over the rows where both `a` and `b` are present.
///
/// `None` with fewer than two complete pairs or when either side has zero variance.
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}
