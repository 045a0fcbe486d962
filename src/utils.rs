use ndarray::{concatenate, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{OrdinalError, Result};

/// Prepends a column of ones to `x`.
pub fn add_bias_column(x: ArrayView2<f64>) -> Array2<f64> {
    let ones = Array2::ones((x.nrows(), 1));
    concatenate![Axis(1), ones, x]
}

/// Checks that `labels` cover `1..=K` with no gaps and returns `K`.
pub fn class_count(labels: ArrayView1<usize>) -> Result<usize> {
    if labels.is_empty() {
        return Err(OrdinalError::EmptyDataset);
    }
    if let Some(&label) = labels.iter().find(|&&l| l == 0) {
        return Err(OrdinalError::InvalidLabel { label });
    }

    let mut distinct = labels.to_vec();
    distinct.sort_unstable();
    distinct.dedup();

    let classes = distinct[distinct.len() - 1];
    if let Some(missing) = distinct.iter().enumerate().position(|(i, &l)| l != i + 1) {
        return Err(OrdinalError::MissingClass {
            class: missing + 1,
            classes,
        });
    }
    if classes < 2 {
        return Err(OrdinalError::SingleClass);
    }

    Ok(classes)
}

/// `(n x classes)` indicator matrix with a single 1 per row at `label - 1`.
pub fn one_hot(labels: ArrayView1<usize>, classes: usize) -> Array2<f64> {
    let mut y = Array2::zeros((labels.len(), classes));
    for (i, &label) in labels.iter().enumerate() {
        assert!(
            (1..=classes).contains(&label),
            "Label {} is outside 1..={}",
            label,
            classes
        );
        y[[i, label - 1]] = 1.0;
    }
    y
}

pub fn check_finite(x: ArrayView2<f64>) -> Result<()> {
    if x.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(OrdinalError::NonFiniteFeatures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_add_bias_column() {
        let x = array![[2.0, 3.0], [4.0, 5.0]];
        assert_eq!(
            add_bias_column(x.view()),
            array![[1.0, 2.0, 3.0], [1.0, 4.0, 5.0]]
        );
    }

    #[test]
    fn test_class_count() {
        assert_eq!(class_count(array![1, 3, 2, 2].view()), Ok(3));
        assert_eq!(class_count(array![2, 1].view()), Ok(2));
    }

    #[test]
    fn test_class_count_rejects_bad_label_sets() {
        assert_eq!(
            class_count(array![1, 3, 3].view()),
            Err(OrdinalError::MissingClass { class: 2, classes: 3 })
        );
        assert_eq!(
            class_count(array![0, 1, 2].view()),
            Err(OrdinalError::InvalidLabel { label: 0 })
        );
        assert_eq!(class_count(array![1, 1].view()), Err(OrdinalError::SingleClass));
        assert_eq!(
            class_count(ndarray::Array1::<usize>::zeros(0).view()),
            Err(OrdinalError::EmptyDataset)
        );
    }

    #[test]
    fn test_class_count_handles_huge_labels() {
        assert_eq!(
            class_count(array![1, usize::MAX].view()),
            Err(OrdinalError::MissingClass { class: 2, classes: usize::MAX })
        );
        assert_eq!(
            class_count(array![1, 2, 1 << 40].view()),
            Err(OrdinalError::MissingClass { class: 3, classes: 1 << 40 })
        );
    }

    #[test]
    fn test_one_hot_rows_sum_to_one() {
        let y = one_hot(array![1, 3, 2].view(), 3);

        assert_eq!(y, array![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]]);
        for row in y.rows() {
            assert_eq!(row.sum(), 1.0);
        }
    }

    #[test]
    fn test_check_finite() {
        assert!(check_finite(array![[1.0, 2.0]].view()).is_ok());
        assert_eq!(
            check_finite(array![[1.0, f64::NAN]].view()),
            Err(OrdinalError::NonFiniteFeatures)
        );
    }
}
