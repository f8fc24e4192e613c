//! Direct (solve-free) motion kernels: rigid, perturb, blend.
//!
//! All three are pure functions of the initial positions, the descriptor
//! parameters, and the substage time. History rotation happens in the
//! driver before any kernel runs.

use sirocco_mesh::DynamicMesh;

use crate::config::{OscillationSpec, RigidMotionSpec};

use std::f64::consts::PI;

/// Rigid transformation: pitch about the z-axis plus per-axis plunge.
///
/// The pitch radius is taken about the pivot but the reference angle is
/// `atan2(x0_y, x0_x)` about the origin; zero pitch amplitude leaves the
/// grid at `x0` before the plunge is added.
pub fn rigid_update(mesh: &mut DynamicMesh, spec: &RigidMotionSpec, t: f64) {
    let d = mesh.n_dims();
    let n = mesh.n_verts();
    let pitching = spec.pitch_amp != 0.0;
    let theta_t = spec.pitch_amp * (2.0 * PI * spec.pitch_freq * t).sin();

    let (x0, x) = mesh.x0_and_current_mut();

    for iv in 0..n {
        let base = iv * d;
        let mut new_pos = [0.0_f64; 3];

        if pitching {
            let dx = x0[base] - spec.pitch_axis[0];
            let dy = x0[base + 1] - spec.pitch_axis[1];
            let r = (dx * dx + dy * dy).sqrt();
            let theta0 = x0[base + 1].atan2(x0[base]);
            let theta = theta0 + theta_t;
            new_pos[0] = r * theta.cos() + spec.pitch_axis[0];
            new_pos[1] = r * theta.sin() + spec.pitch_axis[1];
        } else {
            new_pos[0] = x0[base];
            new_pos[1] = x0[base + 1];
        }
        if d == 3 {
            new_pos[2] = x0[base + 2];
        }

        // Plunge contribution per axis.
        for k in 0..d {
            new_pos[k] += spec.plunge_amp[k] * (2.0 * PI * spec.plunge_freq[k] * t).sin();
        }

        x[base..base + d].copy_from_slice(&new_pos[..d]);
    }
}

/// Analytic perturbation (Kui verification problem):
/// `x_k = x0_k + 2·sin(π x0_0/10)·sin(π x0_1/10)·sin(2π t/10)` for the
/// first two coordinates.
pub fn perturb_update(mesh: &mut DynamicMesh, t: f64) {
    let d = mesh.n_dims();
    let n = mesh.n_verts();
    let time_factor = (2.0 * PI * t / 10.0).sin();

    let (x0, x) = mesh.x0_and_current_mut();

    for iv in 0..n {
        let base = iv * d;
        let bump = 2.0 * (PI * x0[base] / 10.0).sin() * (PI * x0[base + 1] / 10.0).sin();
        x[base] = x0[base] + bump * time_factor;
        x[base + 1] = x0[base + 1] + bump * time_factor;
    }
}

/// Quintic blending kernel: `1 − (10s³ − 15s⁴ + 6s⁵)`, clamped to 0
/// outside `s = 1`. Smoothly drops from 1 at the boundary to 0 at the
/// blending radius with zero slope at both ends.
pub fn blend_kernel(s: f64) -> f64 {
    if s < 1.0 {
        1.0 - (10.0 * s.powi(3) - 15.0 * s.powi(4) + 6.0 * s.powi(5))
    } else {
        0.0
    }
}

/// Blended boundary motion.
///
/// For every vertex and every moving boundary, the boundary's prescribed
/// displacement is scaled by the blending kernel of the distance to that
/// boundary's nearest vertex and accumulated. A vertex lying *on* a
/// moving boundary takes that boundary's displacement exclusively.
///
/// `moving` pairs each moving mesh-boundary index with its oscillation
/// descriptor; `blend_dist` is the blending radius.
pub fn blend_update(
    mesh: &mut DynamicMesh,
    moving: &[(usize, OscillationSpec)],
    blend_dist: f64,
    t: f64,
) {
    let d = mesh.n_dims();
    let n = mesh.n_verts();
    let mut displacement = vec![0.0_f64; n * d];

    {
        let x = mesh.current();
        let x0 = mesh.x0();

        for iv in 0..n {
            let base = iv * d;
            let mut on_bound = false;

            for &(bnd_idx, ref osc) in moving {
                let bverts = &mesh.boundaries()[bnd_idx].verts;
                if bverts.is_empty() {
                    continue;
                }

                // Nearest vertex of this boundary (current positions).
                let mut min_dist_sq = f64::INFINITY;
                let mut nearest = bverts[0].index();
                for &ivb in bverts {
                    let ivb = ivb.index();
                    if ivb == iv {
                        min_dist_sq = 0.0;
                        nearest = ivb;
                        on_bound = true;
                        break;
                    }
                    let mut dist_sq = 0.0;
                    for k in 0..d {
                        let delta = x[base + k] - x[ivb * d + k];
                        dist_sq += delta * delta;
                    }
                    if dist_sq < min_dist_sq {
                        min_dist_sq = dist_sq;
                        nearest = ivb;
                    }
                }
                let dist = min_dist_sq.sqrt();

                // Boundary displacement: prescribed position minus where
                // the boundary currently is, sampled at the nearest vertex.
                let prescribed = osc.displacement(t);
                let mut disp = [0.0_f64; 3];
                for k in 0..d {
                    disp[k] = prescribed[k] + x0[nearest * d + k] - x[nearest * d + k];
                }

                let phi = blend_kernel(dist / blend_dist);
                if on_bound {
                    // This boundary's displacement exclusively, no summing.
                    for k in 0..d {
                        displacement[base + k] = disp[k];
                    }
                    break;
                }
                for k in 0..d {
                    displacement[base + k] += phi * disp[k];
                }
            }
        }
    }

    let x = mesh.current_mut();
    for (xi, di) in x.iter_mut().zip(&displacement) {
        *xi += di;
    }
}
