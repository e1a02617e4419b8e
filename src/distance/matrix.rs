//! Dense distance matrix over the node table.

use crate::models::Node;

/// Euclidean distances between every pair of nodes, row-major.
///
/// Built once per problem; row `i` holds the distances from table position `i`.
///
/// # Examples
///
/// ```
/// use evrp_search::models::Node;
/// use evrp_search::distance::DistanceMatrix;
///
/// let nodes = vec![
///     Node::depot(1, 0.0, 0.0),
///     Node::customer(2, 3.0, 4.0, 10),
///     Node::charging_station(3, 0.0, 8.0),
/// ];
/// let dm = DistanceMatrix::from_nodes(&nodes);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.nearest(0, &[2, 1]), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Computes the distance of every ordered node pair.
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let data = nodes
            .iter()
            .flat_map(|from| nodes.iter().map(move |to| from.distance_to(to)))
            .collect();
        Self {
            data,
            size: nodes.len(),
        }
    }

    /// Distance from table position `from` to table position `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// The candidate closest to `from`; ties go to the earlier candidate.
    pub fn nearest(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .min_by(|&a, &b| self.get(from, a).total_cmp(&self.get(from, b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_nodes() -> Vec<Node> {
        vec![
            Node::depot(1, 0.0, 0.0),
            Node::customer(2, 3.0, 4.0, 10),
            Node::charging_station(3, 0.0, 8.0),
        ]
    }

    #[test]
    fn test_from_nodes() {
        let dm = DistanceMatrix::from_nodes(&sample_nodes());
        assert_eq!(dm.data.len(), 9);
        assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
        assert!((dm.get(0, 2) - 8.0).abs() < 1e-10);
        assert!(dm.get(1, 1).abs() < 1e-10);
    }

    #[test]
    fn test_both_directions_agree() {
        let dm = DistanceMatrix::from_nodes(&sample_nodes());
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(dm.get(i, j), dm.get(j, i));
            }
        }
    }

    #[test]
    fn test_empty_node_table() {
        let dm = DistanceMatrix::from_nodes(&[]);
        assert!(dm.data.is_empty());
        assert_eq!(dm.nearest(0, &[]), None);
    }

    #[test]
    fn test_nearest() {
        let dm = DistanceMatrix::from_nodes(&sample_nodes());
        assert_eq!(dm.nearest(0, &[1, 2]), Some(1));
        assert_eq!(dm.nearest(1, &[0, 2]), Some(0));
        assert_eq!(dm.nearest(0, &[2]), Some(2));
        assert_eq!(dm.nearest(0, &[]), None);
    }
}
