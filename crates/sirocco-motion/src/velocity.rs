//! Grid-velocity derivation and flow-solver export.
//!
//! Once the substage positions are final, the grid velocity is either the
//! analytic derivative of the prescribed motion (rigid and perturb modes)
//! or the fourth-order backward difference over the five-level history.
//! Velocities and positions are then pushed to the flow collaborator and
//! its dynamic transforms are rebuilt.

use sirocco_mesh::DynamicMesh;

use crate::config::{MotionConfig, MotionMode};
use crate::flow::FlowElements;

use std::f64::consts::PI;

/// BDF4 stencil coefficients for the first derivative (level 0 first).
const BDF4: [f64; 5] = [25.0 / 12.0, -4.0, 3.0, -4.0 / 3.0, 0.25];

/// Computes the grid velocity at every vertex into the mesh's velocity
/// buffer.
pub fn compute_grid_velocity(mesh: &mut DynamicMesh, config: &MotionConfig, rk_time: f64) {
    let d = mesh.n_dims();
    let n = mesh.n_verts();

    match config.mode {
        MotionMode::Rigid => {
            let spec = &config.rigid;
            let pitching = spec.pitch_amp != 0.0;
            // Plunge rate is the same for every vertex.
            let mut plunge_rate = [0.0_f64; 3];
            for k in 0..d {
                let omega = 2.0 * PI * spec.plunge_freq[k];
                plunge_rate[k] = spec.plunge_amp[k] * omega * (omega * rk_time).cos();
            }
            let omega_p = 2.0 * PI * spec.pitch_freq;
            let theta_t = spec.pitch_amp * (omega_p * rk_time).sin();
            let theta_rate = spec.pitch_amp * omega_p * (omega_p * rk_time).cos();

            let x0 = mesh.x0().to_vec();
            let vel = mesh.grid_vel_mut();
            for iv in 0..n {
                let base = iv * d;
                let mut v = [0.0_f64; 3];
                if pitching {
                    let dx = x0[base] - spec.pitch_axis[0];
                    let dy = x0[base + 1] - spec.pitch_axis[1];
                    let r = (dx * dx + dy * dy).sqrt();
                    let theta = x0[base + 1].atan2(x0[base]) + theta_t;
                    v[0] = -r * theta_rate * theta.sin();
                    v[1] = r * theta_rate * theta.cos();
                }
                for k in 0..d {
                    vel[base + k] = v[k] + plunge_rate[k];
                }
            }
        }
        MotionMode::Perturb => {
            let time_rate = (2.0 * PI * rk_time / 10.0).cos();
            let x0 = mesh.x0().to_vec();
            let vel = mesh.grid_vel_mut();
            for iv in 0..n {
                let base = iv * d;
                let rate = 4.0 * PI / 10.0
                    * (PI * x0[base] / 10.0).sin()
                    * (PI * x0[base + 1] / 10.0).sin()
                    * time_rate;
                vel[base] = rate;
                vel[base + 1] = rate;
                if d == 3 {
                    vel[base + 2] = 0.0;
                }
            }
        }
        _ => {
            // Fourth-order backward difference over the history levels
            // (constant dt).
            let dt = config.dt;
            let mut vel = vec![0.0_f64; n * d];
            for (level, &coeff) in BDF4.iter().enumerate() {
                let xl = mesh.history().level(level);
                for (vi, &xi) in vel.iter_mut().zip(xl) {
                    *vi += coeff * xi;
                }
            }
            for vi in &mut vel {
                *vi /= dt;
            }
            mesh.grid_vel_mut().copy_from_slice(&vel);
        }
    }
}

/// Pushes shape-point grid velocities to the flow collaborator and
/// interpolates them to flux and solution points.
pub fn push_velocity(mesh: &DynamicMesh, flow: &mut dyn FlowElements, rk_step: i32) {
    let d = mesh.n_dims();
    let vel = mesh.grid_vel();

    for ic in 0..mesh.n_cells() {
        let etype = mesh.cell_type(ic);
        let loc = mesh.cell_local_index(ic);
        for (j, &ivg) in mesh.cell_global_nodes(ic).iter().enumerate() {
            let base = ivg as usize * d;
            flow.set_grid_vel_spt(etype, loc, j, &vel[base..base + d]);
        }
    }

    flow.set_grid_vel_fpts(rk_step);
    flow.set_grid_vel_upts(rk_step);
}

/// Pushes the current shape-node positions and rebuilds the dynamic
/// transforms.
pub fn push_shape_nodes(mesh: &DynamicMesh, flow: &mut dyn FlowElements) {
    let d = mesh.n_dims();
    let x = mesh.current();

    for ic in 0..mesh.n_cells() {
        let etype = mesh.cell_type(ic);
        let loc = mesh.cell_local_index(ic);
        for (iv, &ivg) in mesh.cell_global_nodes(ic).iter().enumerate() {
            let base = ivg as usize * d;
            flow.set_dynamic_shape_node(etype, iv, loc, &x[base..base + d]);
        }
    }

    flow.set_transforms_dynamic();
}

/// Restart variant: pushes all five history levels per shape node, then
/// rebuilds transforms.
pub fn push_shape_nodes_restart(mesh: &DynamicMesh, flow: &mut dyn FlowElements) {
    let d = mesh.n_dims();

    for ic in 0..mesh.n_cells() {
        let etype = mesh.cell_type(ic);
        let loc = mesh.cell_local_index(ic);
        for (iv, &ivg) in mesh.cell_global_nodes(ic).iter().enumerate() {
            let base = ivg as usize * d;
            let levels: Vec<&[f64]> = (0..5)
                .map(|k| &mesh.history().level(k)[base..base + d])
                .collect();
            flow.set_dynamic_shape_node_restart(etype, iv, loc, &levels);
        }
    }

    flow.set_transforms_dynamic();
}

/// Full per-substage flow update: grid velocity first, then shape nodes
/// and transforms.
pub fn update_flow(
    mesh: &mut DynamicMesh,
    config: &MotionConfig,
    rk_time: f64,
    rk_step: i32,
    flow: &mut dyn FlowElements,
) {
    compute_grid_velocity(mesh, config, rk_time);
    push_velocity(mesh, flow, rk_step);
    push_shape_nodes(mesh, flow);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sirocco_mesh::generators::two_triangle_square;

    #[test]
    fn bdf4_recovers_quartic_derivative() {
        // x(t) = α t⁴ per vertex; the BDF4 stencil is exact for quartics.
        let mut mesh = two_triangle_square();
        let alpha = 0.3;
        let dt = 0.1;
        let t_now = 1.0;

        let n = mesh.n_verts() * mesh.n_dims();
        let mut levels: Vec<Vec<f64>> = Vec::new();
        for level in 0..5 {
            let t = t_now - level as f64 * dt;
            levels.push(vec![alpha * t.powi(4); n]);
        }
        let refs: [&[f64]; 5] = [
            &levels[0], &levels[1], &levels[2], &levels[3], &levels[4],
        ];
        mesh.history_mut().seed_restart(refs).unwrap();

        let config = MotionConfig {
            mode: MotionMode::Elasticity,
            dt,
            ..Default::default()
        };
        compute_grid_velocity(&mut mesh, &config, t_now);

        let expected = 4.0 * alpha * t_now.powi(3);
        for &v in mesh.grid_vel() {
            assert!(
                (v - expected).abs() < 1e-9,
                "BDF4 velocity {v} vs analytic {expected}"
            );
        }
    }

    #[test]
    fn static_history_gives_zero_velocity() {
        let mut mesh = two_triangle_square();
        let config = MotionConfig {
            mode: MotionMode::Blend,
            dt: 0.01,
            blend_dist: 1.0,
            ..Default::default()
        };
        compute_grid_velocity(&mut mesh, &config, 0.5);
        // All history levels equal: the stencil sums to zero.
        for &v in mesh.grid_vel() {
            assert!(v.abs() < 1e-12);
        }
    }
}
