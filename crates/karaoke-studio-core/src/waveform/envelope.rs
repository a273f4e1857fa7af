/// Min/max amplitude of the samples behind one pixel column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnExtent {
    /// Lowest sample, clamped to `[-1, 1]`.
    pub min: f32,
    /// Highest sample, clamped to `[-1, 1]`.
    pub max: f32,
}

impl ColumnExtent {
    const SILENT: Self = Self { min: 0.0, max: 0.0 };
}

/// Compute a min/max envelope with one entry per column.
///
/// Column `c` covers samples `c * len / columns .. (c + 1) * len / columns`,
/// so the trace always spans the full width. With fewer samples than
/// columns a sample is shared by neighbouring columns. Cost is linear in
/// the sample count plus `columns`.
pub fn envelope(samples: &[f32], columns: usize) -> Vec<ColumnExtent> {
    if columns == 0 {
        return Vec::new();
    }
    if samples.is_empty() {
        return vec![ColumnExtent::SILENT; columns];
    }

    let len = samples.len();

    (0..columns)
        .map(|column| {
            let start = (column * len / columns).min(len - 1);
            let end = ((column + 1) * len / columns).max(start + 1);

            let (min, max) = samples[start..end]
                .iter()
                .filter(|s| s.is_finite())
                .fold((1.0f32, -1.0f32), |(lo, hi), &s| (lo.min(s), hi.max(s)));

            if min > max {
                // every sample was NaN/inf
                ColumnExtent::SILENT
            } else {
                ColumnExtent {
                    min: min.clamp(-1.0, 1.0),
                    max: max.clamp(-1.0, 1.0),
                }
            }
        })
        .collect()
}
