use nalgebra::{
    Matrix4, Point3, Rotation3, Similarity3, Translation3, Unit, UnitQuaternion, Vector3,
};

use crate::error::GenerationError;
use crate::math::geometry::{orbit_start_direction, orientation_basis, wrap_angle};

const AXIS_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

/// Opaque reference to a mesh/material owned by the renderer.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct DrawableHandle(pub usize);

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum BodyKind {
    Sun,
    Rocky,
    Gas,
    Moon,
}

impl BodyKind {
    pub fn index(self) -> usize {
        match self {
            BodyKind::Sun => 0,
            BodyKind::Rocky => 1,
            BodyKind::Gas => 2,
            BodyKind::Moon => 3,
        }
    }
}

// All the immutable info about a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParams {
    /// Uniform scale applied to a unit-diameter mesh
    pub diameter: f64,
    /// Radians per unit time around the parent
    pub orbit_velocity: f64,
    /// Radians per unit time around the body's own axis
    pub spin_velocity: f64,
    pub initial_phase: f64,
    pub orbit_radius: f64,
    /// Normal of the orbit plane. Doubles as the spin axis.
    pub orbit_axis: Vector3<f64>,
}

#[derive(Debug, Clone)]
pub struct OrbitBody {
    params: OrbitParams,
    drawable: DrawableHandle,
    // -- derived once --
    orbit_axis: Unit<Vector3<f64>>,
    orientation: Rotation3<f64>,
    orbit_start: Option<Unit<Vector3<f64>>>,
    // -- hierarchy --
    parent: Option<BodyID>,
    children: Vec<BodyID>,
    // -- per-frame --
    orbit_phase: f64,
    spin_phase: f64,
    position: Point3<f64>,
    transform: Similarity3<f64>,
}

impl OrbitBody {
    pub fn new(params: OrbitParams, drawable: DrawableHandle) -> Result<Self, GenerationError> {
        let scalars = [
            ("diameter", params.diameter),
            ("orbit_velocity", params.orbit_velocity),
            ("spin_velocity", params.spin_velocity),
            ("initial_phase", params.initial_phase),
            ("orbit_radius", params.orbit_radius),
        ];
        for &(name, value) in scalars.iter() {
            if !value.is_finite() {
                return Err(GenerationError::NonFiniteParameter(name));
            }
        }
        if !params.orbit_axis.iter().all(|x| x.is_finite()) {
            return Err(GenerationError::NonFiniteParameter("orbit_axis"));
        }
        if params.diameter <= 0.0 {
            return Err(GenerationError::NonPositiveDiameter(params.diameter));
        }
        if params.orbit_radius < 0.0 {
            return Err(GenerationError::NegativeOrbitRadius(params.orbit_radius));
        }

        let axis = params.orbit_axis;
        let orbit_axis = Unit::try_new(axis, AXIS_TOLERANCE)
            .ok_or(GenerationError::ZeroOrbitAxis(axis.x, axis.y, axis.z))?;

        let mut body = OrbitBody {
            params,
            drawable,
            orbit_axis,
            orientation: orientation_basis(&orbit_axis, AXIS_TOLERANCE),
            orbit_start: None,
            parent: None,
            children: vec![],
            orbit_phase: 0.0,
            spin_phase: wrap_angle(params.initial_phase * params.spin_velocity),
            position: Point3::origin(),
            transform: Similarity3::identity(),
        };
        body.transform = body.compose_transform();
        Ok(body)
    }

    /// Hooks this body up to its parent. From here on, `advance` sweeps it
    /// around the parent, starting from `initial_phase`.
    pub fn attach_parent(&mut self, parent: BodyID) {
        self.parent = Some(parent);
        self.orbit_start = Some(orbit_start_direction(&self.orbit_axis, AXIS_TOLERANCE));
        self.orbit_phase = wrap_angle(self.params.initial_phase);
    }

    pub(super) fn push_child(&mut self, child: BodyID) {
        self.children.push(child);
    }

    /// Steps the phases forward by `dt` and recomputes the model transform,
    /// given where the parent ended up this frame. Returns our new position,
    /// for the children to use.
    pub fn advance(&mut self, dt: f64, parent_position: Point3<f64>) -> Point3<f64> {
        let mut position = parent_position;

        self.spin_phase = wrap_angle(self.spin_phase + dt * self.params.spin_velocity);
        if let Some(start) = self.orbit_start {
            self.orbit_phase = wrap_angle(self.orbit_phase + dt * self.params.orbit_velocity);
            let sweep = Rotation3::from_axis_angle(&self.orbit_axis, self.orbit_phase);
            position += sweep * start.into_inner() * self.params.orbit_radius;
        }

        self.position = position;
        self.transform = self.compose_transform();
        position
    }

    // translate * scale * spin * orientation. The scale is uniform, so it
    // commutes with the rotations and this is a similarity.
    fn compose_transform(&self) -> Similarity3<f64> {
        let spin = Rotation3::from_axis_angle(&self.orbit_axis, self.spin_phase);
        Similarity3::from_parts(
            Translation3::from(self.position.coords),
            UnitQuaternion::from_rotation_matrix(&(spin * self.orientation)),
            self.params.diameter,
        )
    }

    pub fn params(&self) -> &OrbitParams {
        &self.params
    }

    pub fn drawable(&self) -> DrawableHandle {
        self.drawable
    }

    pub fn parent(&self) -> Option<BodyID> {
        self.parent
    }

    pub fn children(&self) -> &[BodyID] {
        &self.children
    }

    pub fn orbit_axis(&self) -> Unit<Vector3<f64>> {
        self.orbit_axis
    }

    pub fn orientation(&self) -> &Rotation3<f64> {
        &self.orientation
    }

    pub fn orbit_phase(&self) -> f64 {
        self.orbit_phase
    }

    pub fn spin_phase(&self) -> f64 {
        self.spin_phase
    }

    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    pub fn transform(&self) -> &Similarity3<f64> {
        &self.transform
    }

    pub fn model_matrix(&self) -> Matrix4<f64> {
        self.transform.to_homogeneous()
    }
}
