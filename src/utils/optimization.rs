//! Bounded Nelder-Mead simplex minimisation used for parameter estimation.

use std::cmp::Ordering;

/// Result of Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The best point found.
    pub optimal_point: Vec<f64>,
    /// Objective value at `optimal_point`.
    pub optimal_value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the simplex met the tolerance before `max_iter`.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    pub max_iter: usize,
    /// Stop when the spread of objective values, or the simplex radius,
    /// falls below this.
    pub tolerance: f64,
    /// Reflection coefficient.
    pub alpha: f64,
    /// Expansion coefficient.
    pub gamma: f64,
    /// Contraction coefficient.
    pub rho: f64,
    /// Shrink coefficient.
    pub sigma: f64,
    /// Relative size of the initial simplex (absolute when a coordinate is 0).
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

#[derive(Debug, Clone)]
struct Vertex {
    point: Vec<f64>,
    value: f64,
}

struct Simplex<'a, F> {
    objective: F,
    bounds: Option<&'a [(f64, f64)]>,
    vertices: Vec<Vertex>,
}

impl<'a, F> Simplex<'a, F>
where
    F: Fn(&[f64]) -> f64,
{
    fn new(objective: F, initial: &[f64], bounds: Option<&'a [(f64, f64)]>, step: f64) -> Self {
        let mut simplex = Self {
            objective,
            bounds,
            vertices: Vec::with_capacity(initial.len() + 1),
        };
        let first = simplex.vertex(initial.to_vec());
        simplex.vertices.push(first);
        for i in 0..initial.len() {
            let mut point = initial.to_vec();
            point[i] += if initial[i].abs() > 1e-10 {
                step * initial[i].abs()
            } else {
                step
            };
            let vertex = simplex.vertex(point);
            simplex.vertices.push(vertex);
        }
        simplex
    }

    fn vertex(&self, mut point: Vec<f64>) -> Vertex {
        if let Some(bounds) = self.bounds {
            for (x, (lo, hi)) in point.iter_mut().zip(bounds) {
                *x = x.clamp(*lo, *hi);
            }
        }
        let value = (self.objective)(&point);
        Vertex { point, value }
    }

    fn sort(&mut self) {
        self.vertices
            .sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal));
    }

    /// Centroid of every vertex except the worst (last after sorting).
    fn centroid(&self) -> Vec<f64> {
        let n = self.vertices.len() - 1;
        let mut c = vec![0.0; self.vertices[0].point.len()];
        for v in &self.vertices[..n] {
            for (acc, x) in c.iter_mut().zip(&v.point) {
                *acc += x;
            }
        }
        c.iter_mut().for_each(|x| *x /= n as f64);
        c
    }

    /// Point `from + t * (to - from)`, bounded and evaluated.
    fn along(&self, from: &[f64], to: &[f64], t: f64) -> Vertex {
        let point = from
            .iter()
            .zip(to)
            .map(|(a, b)| a + t * (b - a))
            .collect();
        self.vertex(point)
    }

    fn radius(&self, centroid: &[f64]) -> f64 {
        self.vertices
            .iter()
            .map(|v| {
                v.point
                    .iter()
                    .zip(centroid)
                    .map(|(a, b)| (a - b).powi(2))
                    .sum::<f64>()
                    .sqrt()
            })
            .fold(0.0, f64::max)
    }
}

/// Minimise `objective` starting from `initial`.
///
/// `bounds`, when given, clamps each coordinate to its `(min, max)` pair after
/// every move.
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let mut simplex = Simplex::new(objective, initial, bounds, config.initial_step);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;
        simplex.sort();

        let best = simplex.vertices[0].value;
        let second_worst = simplex.vertices[n - 1].value;
        let worst = simplex.vertices[n].clone();

        if worst.value - best < config.tolerance {
            converged = true;
            break;
        }
        let centroid = simplex.centroid();
        if simplex.radius(&centroid) < config.tolerance {
            converged = true;
            break;
        }

        let reflected = simplex.along(&centroid, &worst.point, -config.alpha);

        if reflected.value < best {
            let expanded = simplex.along(&centroid, &reflected.point, config.gamma);
            simplex.vertices[n] = if expanded.value < reflected.value {
                expanded
            } else {
                reflected
            };
            continue;
        }
        if reflected.value < second_worst {
            simplex.vertices[n] = reflected;
            continue;
        }

        let contracted = if reflected.value < worst.value {
            let outside = simplex.along(&centroid, &reflected.point, config.rho);
            (outside.value <= reflected.value).then_some(outside)
        } else {
            let inside = simplex.along(&centroid, &worst.point, config.rho);
            (inside.value < worst.value).then_some(inside)
        };
        if let Some(vertex) = contracted {
            simplex.vertices[n] = vertex;
            continue;
        }

        let anchor = simplex.vertices[0].point.clone();
        for i in 1..=n {
            let shrunk = simplex.along(&anchor, &simplex.vertices[i].point, config.sigma);
            simplex.vertices[i] = shrunk;
        }
    }

    simplex.sort();
    let best = simplex.vertices.swap_remove(0);
    NelderMeadResult {
        optimal_point: best.point,
        optimal_value: best.value,
        iterations,
        converged,
    }
}
