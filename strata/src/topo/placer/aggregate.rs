//! Merges the coordinates of the four modes into one coordinate per vertex.

use crate::core::base::NUM_MODES;
use crate::core::config::PositionMode;
use crate::core::geometry::mean;

/// \returns the final slice coordinate of every vertex. \p modes holds the
/// coordinates of each mode, in mode index order.
pub fn combine(modes: &[Vec<f64>], mode: PositionMode) -> Vec<f64> {
    assert_eq!(modes.len(), NUM_MODES, "Expected a result for every mode");
    let num_nodes = modes[0].len();

    match mode {
        PositionMode::Single(idx) => {
            assert!(idx < NUM_MODES, "Invalid mode index");
            modes[idx].clone()
        }
        PositionMode::Average => (0..num_nodes)
            .map(|i| {
                let vals: Vec<f64> = modes.iter().map(|m| m[i]).collect();
                mean(&vals)
            })
            .collect(),
    }
}

#[test]
fn test_combine() {
    let modes = vec![
        vec![0., 10.],
        vec![4., 10.],
        vec![8., 20.],
        vec![4., 0.],
    ];
    assert_eq!(combine(&modes, PositionMode::Single(2)), vec![8., 20.]);
    assert_eq!(combine(&modes, PositionMode::Average), vec![4., 10.]);
}

#[test]
fn test_combine_empty_graph() {
    let modes = vec![Vec::new(); NUM_MODES];
    assert!(combine(&modes, PositionMode::Average).is_empty());
}
