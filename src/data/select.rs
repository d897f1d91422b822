use super::error::{DataError, Result};
use super::model::{MatrixData, SelectionResult};

/// Indices of wavelengths inside the inclusive range `[min, max]`.
pub fn selected_indices(wavelengths: &[f64], min: f64, max: f64) -> Vec<usize> {
    wavelengths
        .iter()
        .enumerate()
        .filter(|(_, wl)| min <= **wl && **wl <= max)
        .map(|(i, _)| i)
        .collect()
}

/// Average every matrix row over the columns whose wavelength lies in
/// `[min, max]`.
///
/// The caller guarantees `min <= max`.
pub fn average_range(data: &MatrixData, min: f64, max: f64) -> Result<SelectionResult> {
    let indices = selected_indices(&data.wavelengths, min, max);
    if indices.is_empty() {
        return Err(DataError::EmptySelection);
    }

    let count = indices.len() as f64;
    let averages = data
        .matrix
        .iter()
        .map(|row| indices.iter().map(|&i| row[i]).sum::<f64>() / count)
        .collect();

    log::info!(
        "averaged {} of {} wavelength columns over {} rows",
        indices.len(),
        data.wavelengths.len(),
        data.len()
    );

    Ok(SelectionResult {
        range: [min, max],
        selected_count: indices.len(),
        times: data.times.clone(),
        averages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> MatrixData {
        MatrixData {
            wavelengths: vec![400.0, 450.0, 500.0, 550.0],
            times: vec![0.0, 1.0, 2.0],
            matrix: vec![
                vec![1.0, 2.0, 3.0, 4.0],
                vec![2.0, 4.0, 6.0, 8.0],
                vec![0.5, 0.5, 0.5, 10.5],
            ],
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(selected_indices(&[400.0, 450.0, 500.0], 450.0, 500.0), vec![1, 2]);
        assert_eq!(selected_indices(&[400.0, 450.0, 500.0], 450.0, 450.0), vec![1]);
    }

    #[test]
    fn partial_range() {
        let sel = average_range(&sample(), 440.0, 510.0).unwrap();
        assert_eq!(sel.range, [440.0, 510.0]);
        assert_eq!(sel.selected_count, 2);
        assert_eq!(sel.times, vec![0.0, 1.0, 2.0]);
        assert_relative_eq!(sel.averages[0], 2.5);
        assert_relative_eq!(sel.averages[1], 5.0);
        assert_relative_eq!(sel.averages[2], 0.5);
    }

    #[test]
    fn full_range_matches_row_mean() {
        let data = sample();
        let sel = average_range(&data, 0.0, 1000.0).unwrap();
        assert_eq!(sel.selected_count, data.wavelengths.len());
        for (row, avg) in data.matrix.iter().zip(&sel.averages) {
            let mean = row.iter().sum::<f64>() / row.len() as f64;
            assert_relative_eq!(*avg, mean);
        }
    }

    #[test]
    fn unsorted_wavelengths_are_selected_by_value() {
        let data = MatrixData {
            wavelengths: vec![600.0, 400.0, 500.0],
            times: vec![0.0],
            matrix: vec![vec![9.0, 1.0, 3.0]],
        };
        let sel = average_range(&data, 350.0, 550.0).unwrap();
        assert_eq!(sel.selected_count, 2);
        assert_relative_eq!(sel.averages[0], 2.0);
    }

    #[test]
    fn empty_selection_fails() {
        let err = average_range(&sample(), 700.0, 800.0).unwrap_err();
        assert!(matches!(err, DataError::EmptySelection));
        assert_eq!(err.to_string(), "No wavelength columns in requested range");
    }
}
