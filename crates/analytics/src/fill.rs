//! Gap filling for price columns.

/// Carries the last known value forward into missing cells.
pub fn forward_fill(column: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last = None;
    column
        .iter()
        .map(|cell| {
            if cell.is_some() {
                last = *cell;
            }
            last
        })
        .collect()
}

/// Carries the next known value backward into missing cells.
pub fn backward_fill(column: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut next = None;
    let mut filled: Vec<Option<f64>> = column
        .iter()
        .rev()
        .map(|cell| {
            if cell.is_some() {
                next = *cell;
            }
            next
        })
        .collect();
    filled.reverse();
    filled
}

/// Forward fill, then backward fill whatever is still missing at the start.
///
/// A column without any observation stays entirely missing.
pub fn forward_then_backward_fill(column: &[Option<f64>]) -> Vec<Option<f64>> {
    backward_fill(&forward_fill(column))
}
