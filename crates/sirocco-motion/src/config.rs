//! Run-time motion configuration.
//!
//! Parameters that select the motion strategy, the time-integration
//! substage layout, and the analytic boundary-motion descriptors.
//! Validation happens once at driver construction; an invalid combination
//! is fatal there (the flow solver has not started yet).

use serde::{Deserialize, Serialize};
use sirocco_types::{BoundaryKind, SiroccoError, SiroccoResult};

/// The motion strategy, with its stable configuration codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionMode {
    Static,
    Elasticity,
    Rigid,
    Perturb,
    Blend,
}

impl MotionMode {
    /// Looks up a mode from its configuration code.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Static),
            1 => Some(Self::Elasticity),
            2 => Some(Self::Rigid),
            3 => Some(Self::Perturb),
            4 => Some(Self::Blend),
            _ => None,
        }
    }
}

/// Time-advance scheme selecting the substage layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeScheme {
    /// Single-stage forward Euler.
    ForwardEuler,
    /// Five-stage low-storage RK45 (Carpenter-Kennedy).
    Rk45LowStorage,
}

/// Low-storage Runge-Kutta tableau (`a`, `b`, `c` arrays).
#[derive(Debug, Clone)]
pub struct RkTableau {
    pub a: Vec<f64>,
    pub b: Vec<f64>,
    pub c: Vec<f64>,
}

impl TimeScheme {
    /// Looks up a scheme from its configuration code.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::ForwardEuler),
            3 => Some(Self::Rk45LowStorage),
            _ => None,
        }
    }

    /// Number of substages per macro-step.
    pub fn n_stages(self) -> usize {
        match self {
            Self::ForwardEuler => 1,
            Self::Rk45LowStorage => 5,
        }
    }

    /// The scheme's low-storage tableau.
    ///
    /// The RK45 coefficients are the published Carpenter-Kennedy values;
    /// the `c` entries are kept as exact rationals and divided here.
    pub fn tableau(self) -> RkTableau {
        match self {
            Self::ForwardEuler => RkTableau {
                a: vec![0.0],
                b: vec![0.0],
                c: vec![0.0],
            },
            Self::Rk45LowStorage => RkTableau {
                a: vec![
                    0.0,
                    -0.417890474499852,
                    -1.192151694642677,
                    -1.697784692471528,
                    -1.514183444257156,
                ],
                b: vec![
                    0.149659021999229,
                    0.379210312999627,
                    0.822955029386982,
                    0.699450455949122,
                    0.153057247968152,
                ],
                c: vec![
                    0.0,
                    1432997174477.0 / 9575080441755.0,
                    2526269341429.0 / 6820363962896.0,
                    2006345519317.0 / 3224310063776.0,
                    2802321613138.0 / 2924317926251.0,
                ],
            },
        }
    }
}

/// Sinusoidal per-axis oscillation: nine scalars per moving boundary.
///
/// The prescribed displacement at time `t` is
/// `Δ_k(t) = a_k_sin · sin(2π f_k t) + a_k_cos · cos(2π f_k t)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillationSpec {
    /// Sine amplitudes per axis.
    pub amp_sin: [f64; 3],
    /// Cosine amplitudes per axis.
    pub amp_cos: [f64; 3],
    /// Frequencies per axis (Hz).
    pub freq: [f64; 3],
}

impl OscillationSpec {
    /// A zero-motion descriptor.
    pub fn zero() -> Self {
        Self {
            amp_sin: [0.0; 3],
            amp_cos: [0.0; 3],
            freq: [0.0; 3],
        }
    }

    /// Unpacks the flat 9-scalar layout
    /// `[a_x_sin, a_x_cos, a_y_sin, a_y_cos, a_z_sin, a_z_cos, f_x, f_y, f_z]`.
    pub fn from_params(params: [f64; 9]) -> Self {
        Self {
            amp_sin: [params[0], params[2], params[4]],
            amp_cos: [params[1], params[3], params[5]],
            freq: [params[6], params[7], params[8]],
        }
    }

    /// Prescribed displacement at time `t`.
    pub fn displacement(&self, t: f64) -> [f64; 3] {
        let mut d = [0.0; 3];
        for k in 0..3 {
            let omega = 2.0 * std::f64::consts::PI * self.freq[k];
            d[k] = self.amp_sin[k] * (omega * t).sin() + self.amp_cos[k] * (omega * t).cos();
        }
        d
    }

    /// Time derivative of the prescribed displacement at `t`.
    pub fn velocity(&self, t: f64) -> [f64; 3] {
        let mut v = [0.0; 3];
        for k in 0..3 {
            let omega = 2.0 * std::f64::consts::PI * self.freq[k];
            v[k] = omega * (self.amp_sin[k] * (omega * t).cos() - self.amp_cos[k] * (omega * t).sin());
        }
        v
    }
}

/// Motion descriptor for one moving boundary, keyed by boundary kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingBoundarySpec {
    /// Which mesh boundary this descriptor drives.
    pub kind: BoundaryKind,
    /// Its prescribed oscillation.
    pub oscillation: OscillationSpec,
}

/// Rigid-motion descriptor: plunge per axis plus pitch about the z-axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidMotionSpec {
    /// Plunge amplitudes per axis.
    pub plunge_amp: [f64; 3],
    /// Pitch amplitude (radians, about z).
    pub pitch_amp: f64,
    /// Plunge frequencies per axis (Hz).
    pub plunge_freq: [f64; 3],
    /// Pitch frequency (Hz).
    pub pitch_freq: f64,
    /// Pivot point of the pitching motion.
    pub pitch_axis: [f64; 3],
}

impl RigidMotionSpec {
    /// A zero-motion descriptor.
    pub fn zero() -> Self {
        Self {
            plunge_amp: [0.0; 3],
            pitch_amp: 0.0,
            plunge_freq: [0.0; 3],
            pitch_freq: 0.0,
            pitch_axis: [0.0; 3],
        }
    }
}

/// Complete motion configuration for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Selected motion strategy.
    pub mode: MotionMode,
    /// Time-integration scheme (substage layout).
    pub scheme: TimeScheme,
    /// Physical timestep.
    pub dt: f64,
    /// Number of sub-increments for the elastic deformation ladder.
    pub n_deform_iters: u32,
    /// Moving-boundary descriptors (elasticity and blend modes).
    pub moving_boundaries: Vec<MovingBoundarySpec>,
    /// Rigid-motion descriptor (rigid mode).
    pub rigid: RigidMotionSpec,
    /// Blending radius for blend mode.
    pub blend_dist: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            mode: MotionMode::Static,
            scheme: TimeScheme::ForwardEuler,
            dt: 1.0e-3,
            n_deform_iters: sirocco_types::constants::DEFAULT_DEFORM_ITERS,
            moving_boundaries: Vec::new(),
            rigid: RigidMotionSpec::zero(),
            blend_dist: 0.0,
        }
    }
}

impl MotionConfig {
    /// Validates the configuration. Violations are fatal at setup.
    pub fn validate(&self) -> SiroccoResult<()> {
        if !(self.dt > 0.0) {
            return Err(SiroccoError::InvalidConfig(format!(
                "timestep must be positive, got {}",
                self.dt
            )));
        }
        if self.n_deform_iters == 0 {
            return Err(SiroccoError::InvalidConfig(
                "n_deform_iters must be at least 1".into(),
            ));
        }
        if self.mode == MotionMode::Blend && !(self.blend_dist > 0.0) {
            return Err(SiroccoError::InvalidConfig(format!(
                "blend mode needs a positive blend distance, got {}",
                self.blend_dist
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_codes() {
        assert_eq!(MotionMode::from_code(0), Some(MotionMode::Static));
        assert_eq!(MotionMode::from_code(1), Some(MotionMode::Elasticity));
        assert_eq!(MotionMode::from_code(4), Some(MotionMode::Blend));
        assert_eq!(MotionMode::from_code(5), None);
    }

    #[test]
    fn rk45_tableau_shape() {
        let tab = TimeScheme::Rk45LowStorage.tableau();
        assert_eq!(tab.a.len(), 5);
        assert_eq!(tab.b.len(), 5);
        assert_eq!(tab.c.len(), 5);
        assert_eq!(tab.c[0], 0.0);
        // Carpenter-Kennedy c_2 ≈ 0.1497.
        assert!((tab.c[1] - 0.149659021999229).abs() < 1e-12);
        // Stage times increase monotonically.
        for i in 1..5 {
            assert!(tab.c[i] > tab.c[i - 1]);
        }
    }

    #[test]
    fn oscillation_displacement_and_velocity() {
        let osc = OscillationSpec::from_params([0.1, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        // At t = 0.25, f = 1: sin(π/2) = 1.
        let d = osc.displacement(0.25);
        assert!((d[0] - 0.1).abs() < 1e-14);
        assert_eq!(d[1], 0.0);
        // Velocity is 2π·0.1·cos(π/2) ≈ 0.
        let v = osc.velocity(0.25);
        assert!(v[0].abs() < 1e-12);
    }

    #[test]
    fn validation_catches_bad_combinations() {
        let mut cfg = MotionConfig {
            mode: MotionMode::Blend,
            blend_dist: 0.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        cfg.blend_dist = 1.0;
        assert!(cfg.validate().is_ok());

        cfg.n_deform_iters = 0;
        assert!(cfg.validate().is_err());
    }
}
