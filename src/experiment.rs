//! Measured time/cost trade-offs of the structural resource allocator.
//!
//! Both sweeps were run on the graph `test_structural_4`: one
//! parameter of the allocator is held fixed while the other is swept,
//! and the actual time and cost of the resulting allocation are
//! recorded.

use crate::Error;

/// One swept parameter with the two measurements taken at each of
/// its values.  All three sequences have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    independent: Vec<f64>,
    actual_time: Vec<f64>,
    actual_cost: Vec<f64>,
}

impl Experiment {
    /// Return a new experiment, or [`Error::ShapeMismatch`] if the
    /// measurements do not pair up with the swept values.
    pub fn new(independent: Vec<f64>, actual_time: Vec<f64>,
               actual_cost: Vec<f64>) -> Result<Self, Error> {
        let expected = independent.len();
        if actual_time.len() != expected {
            return Err(Error::ShapeMismatch {
                series: "actual time", expected, found: actual_time.len() })
        }
        if actual_cost.len() != expected {
            return Err(Error::ShapeMismatch {
                series: "actual cost", expected, found: actual_cost.len() })
        }
        Ok(Self { independent, actual_time, actual_cost })
    }

    /// Same as [`Experiment::new`] for integer measurements.
    pub fn from_integers(independent: &[u32], actual_time: &[u32],
                         actual_cost: &[u32]) -> Result<Self, Error> {
        let f = |v: &[u32]| v.iter().map(|&x| f64::from(x)).collect();
        Self::new(f(independent), f(actual_time), f(actual_cost))
    }

    pub fn independent(&self) -> &[f64] {
        &self.independent
    }

    pub fn actual_time(&self) -> &[f64] {
        &self.actual_time
    }

    pub fn actual_cost(&self) -> &[f64] {
        &self.actual_cost
    }

    /// Number of measured points.
    pub fn len(&self) -> usize {
        self.independent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.independent.is_empty()
    }
}

/// An [`Experiment`] together with the names needed to chart it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    /// Name of the swept parameter, used as x-axis label.
    pub parameter: &'static str,
    /// The parameter held fixed, used as figure title.
    pub caption: &'static str,
    /// File stem when the figure is saved.
    pub slug: &'static str,
    pub experiment: Experiment,
}

const MAX_TIME_SWEEP_TIME: [u32; 12] = [
    3078, 4796, 5975, 6384, 6920, 6980, 8167, 7466, 8121, 9642,
    10154, 10206];
const MAX_TIME_SWEEP_COST: [u32; 12] = [
    173855, 141280, 122371, 116442, 110339, 89606, 94528, 90113,
    89914, 88292, 87283, 85302];

const MAX_COST_SWEEP_TIME: [u32; 12] = [
    11022, 11520, 9451, 9831, 7612, 6980, 5918, 7026, 6137, 7127,
    5382, 6409];
const MAX_COST_SWEEP_COST: [u32; 12] = [
    79915, 82960, 86203, 85511, 88704, 89606, 92307, 106356,
    107116, 113804, 118660, 126548];

/// `n` values `step, 2 step,..., n step`.
fn multiples(step: u32, n: u32) -> Vec<u32> {
    (1 ..= n).map(|i| i * step).collect()
}

impl Sweep {
    /// Max time from 1,000 to 12,000 with max cost fixed at 60,000.
    pub fn max_time() -> Result<Sweep, Error> {
        let x = multiples(1000, MAX_TIME_SWEEP_TIME.len() as u32);
        Ok(Sweep {
            parameter: "Max Time",
            caption: "Max Cost = 60,000",
            slug: "max-time-sweep",
            experiment: Experiment::from_integers(
                &x, &MAX_TIME_SWEEP_TIME, &MAX_TIME_SWEEP_COST)?,
        })
    }

    /// Max cost from 10,000 to 120,000 with max time fixed at 6,000.
    pub fn max_cost() -> Result<Sweep, Error> {
        let x = multiples(10_000, MAX_COST_SWEEP_TIME.len() as u32);
        Ok(Sweep {
            parameter: "Max Cost",
            caption: "Max Time = 6,000",
            slug: "max-cost-sweep",
            experiment: Experiment::from_integers(
                &x, &MAX_COST_SWEEP_TIME, &MAX_COST_SWEEP_COST)?,
        })
    }

    /// Both sweeps, in the order they are charted.
    pub fn all() -> Result<[Sweep; 2], Error> {
        Ok([Sweep::max_time()?, Sweep::max_cost()?])
    }
}

/// Order of magnitude of the largest of `values` in absolute terms,
/// or `None` if there is nothing to measure.  This is an estimate of
/// the scientific-notation multiplier: Matplotlib derives its own
/// from the tick range.
pub fn order_of_magnitude(values: &[f64]) -> Option<i32> {
    let m = values.iter()
        .map(|v| v.abs())
        .filter(|v| v.is_finite())
        .fold(0., f64::max);
    if m == 0. {
        return None
    }
    // `log10` may land just below an exact power of ten.
    let e = m.log10().floor() as i32;
    if 10f64.powi(e + 1) <= m {
        Some(e + 1)
    } else if 10f64.powi(e) > m {
        Some(e - 1)
    } else {
        Some(e)
    }
}
