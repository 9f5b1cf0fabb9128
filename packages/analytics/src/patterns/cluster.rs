//! One-dimensional density-based clustering (DBSCAN).
//!
//! Weekly totals are points on a line; the distance between two weeks is
//! the absolute difference of their totals. A week is a core point when
//! at least `min_samples` weeks (itself included) lie within `eps` of it.
//! Weeks not reachable from any core point are noise, i.e. outliers.

/// Cluster label of every point: `Some(cluster)` or `None` for noise.
#[must_use]
pub fn dbscan(points: &[f64], eps: f64, min_samples: usize) -> Vec<Option<usize>> {
    let neighbors = |i: usize| -> Vec<usize> {
        (0..points.len())
            .filter(|&j| (points[i] - points[j]).abs() <= eps)
            .collect()
    };

    let mut labels: Vec<Option<usize>> = vec![None; points.len()];
    let mut visited = vec![false; points.len()];
    let mut cluster = 0;

    for i in 0..points.len() {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        let seeds = neighbors(i);
        if seeds.len() < min_samples {
            continue;
        }

        labels[i] = Some(cluster);
        let mut queue = seeds;
        while let Some(j) = queue.pop() {
            if labels[j].is_none() {
                labels[j] = Some(cluster);
            }
            if visited[j] {
                continue;
            }
            visited[j] = true;

            let expansion = neighbors(j);
            if expansion.len() >= min_samples {
                queue.extend(expansion);
            }
        }

        cluster += 1;
    }

    labels
}

/// Returns `true` if the point at `index` is noise.
#[must_use]
pub fn is_outlier(points: &[f64], index: usize, eps: f64, min_samples: usize) -> bool {
    dbscan(points, eps, min_samples)
        .get(index)
        .is_some_and(Option::is_none)
}
