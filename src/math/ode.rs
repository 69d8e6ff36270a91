use ndarray::{Array, ArrayView, ArrayViewMut, Dimension};

/// Workspace for allocation-free Euler steps
#[derive(Debug, Clone)]
pub struct EulerWorkspace<D: Dimension> {
    pub dy: Array<f64, D>,
}

impl<D: Dimension> EulerWorkspace<D> {
    pub fn new(dim: D) -> Self {
        Self { dy: Array::zeros(dim) }
    }

    pub fn resize(&mut self, dim: &D) {
        if self.dy.raw_dim() != *dim {
            self.dy = Array::zeros(dim.clone());
        }
    }
}

/// Single fixed-step explicit Euler step, using a preallocated derivative
/// buffer.
///
/// The derivative is evaluated once from the state at the start of the step and
/// then applied to every component at once. The workspace is resized when `y`
/// changes shape.
pub fn euler_step_ws<D, F>(y: &mut Array<f64, D>, t: f64, dt: f64, ws: &mut EulerWorkspace<D>, mut f: F)
where
    D: Dimension,
    F: FnMut(f64, ArrayView<f64, D>, ArrayViewMut<f64, D>),
{
    ws.resize(&y.raw_dim());
    f(t, y.view(), ws.dy.view_mut());
    y.scaled_add(dt, &ws.dy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Ix1};

    #[test]
    fn euler_decay_matches_closed_form_step() {
        let mut y = array![1.0, 2.0];
        let mut ws = EulerWorkspace::new(Ix1(2));
        euler_step_ws(&mut y, 0.0, 0.5, &mut ws, |_, y, mut dy| dy.assign(&y.mapv(|v| -v)));
        assert_eq!(y, array![0.5, 1.0]);
    }

    #[test]
    fn derivative_comes_from_state_at_step_start() {
        // dy0 = y1, dy1 = y0: both read the old values
        let mut y = array![1.0, 3.0];
        let mut ws = EulerWorkspace::new(Ix1(2));
        euler_step_ws(&mut y, 0.0, 0.5, &mut ws, |_, y, mut dy| {
            dy[0] = y[1];
            dy[1] = y[0];
        });
        assert_eq!(y, array![2.5, 3.5]);
    }

    #[test]
    fn workspace_follows_state_shape() {
        let mut ws = EulerWorkspace::<Ix1>::new(Ix1(0));
        let mut a = array![4.0];
        euler_step_ws(&mut a, 0.0, 0.25, &mut ws, |_, y, mut dy| dy.assign(&y));
        assert_eq!(a, array![5.0]);
        assert_eq!(ws.dy.len(), 1);

        let mut b = array![1.0, -2.0, 8.0];
        euler_step_ws(&mut b, 0.0, 0.25, &mut ws, |_, _, mut dy| dy.fill(4.0));
        assert_eq!(b, array![2.0, -1.0, 9.0]);
        assert_eq!(ws.dy.len(), 3);
    }
}
