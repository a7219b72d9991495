use nalgebra::{Matrix4, Point3, Rotation3, Similarity3};

use crate::error::GenerationError;

mod body;

pub use body::{BodyID, BodyKind, DrawableHandle, OrbitBody, OrbitParams};

/// A body's drawable, and where to draw it this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub body: BodyID,
    pub handle: DrawableHandle,
    pub transform: Similarity3<f64>,
}

impl Drawable {
    pub fn matrix(&self) -> Matrix4<f64> {
        self.transform.to_homogeneous()
    }
}

/// Placement of the orbit path of one body: a circle around the parent's
/// current position, in the body's orbit plane.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitRing {
    pub body: BodyID,
    pub center: Point3<f64>,
    pub radius: f64,
    pub orientation: Rotation3<f64>,
}

impl OrbitRing {
    /// Transform for a unit-diameter ring lying in the XZ plane.
    pub fn matrix(&self) -> Matrix4<f64> {
        Matrix4::new_translation(&self.center.coords)
            * Matrix4::new_scaling(2.0 * self.radius)
            * self.orientation.to_homogeneous()
    }
}

// The bodies live in a flat arena. Parent and child links are plain
// indices into it, and a parent is always added before its children, so
// ids are a valid top-down order.
#[derive(Debug, Clone)]
pub struct Orrery {
    bodies: Vec<OrbitBody>,
    root: Option<BodyID>,
    num_moons: usize,
}

impl Orrery {
    pub fn new() -> Self {
        Orrery {
            bodies: vec![],
            root: None,
            num_moons: 0,
        }
    }

    pub fn add_root(
        &mut self,
        params: OrbitParams,
        drawable: DrawableHandle,
    ) -> Result<BodyID, GenerationError> {
        if let Some(root) = self.root {
            return Err(GenerationError::RootAlreadySet(root));
        }
        if params.orbit_radius != 0.0 {
            return Err(GenerationError::RootHasOrbit(params.orbit_radius));
        }

        let id = self.insert_new_body(OrbitBody::new(params, drawable)?);
        self.root = Some(id);
        Ok(id)
    }

    pub fn add_body(
        &mut self,
        params: OrbitParams,
        drawable: DrawableHandle,
        parent_id: BodyID,
    ) -> Result<BodyID, GenerationError> {
        if parent_id.0 >= self.bodies.len() {
            return Err(GenerationError::UnknownParent(parent_id));
        }

        let mut body = OrbitBody::new(params, drawable)?;
        body.attach_parent(parent_id);
        let id = self.insert_new_body(body);
        self.bodies[parent_id.0].push_child(id);
        Ok(id)
    }

    /// Same as `add_body`, but the new body is counted as a moon.
    pub fn add_moon(
        &mut self,
        params: OrbitParams,
        drawable: DrawableHandle,
        parent_id: BodyID,
    ) -> Result<BodyID, GenerationError> {
        let id = self.add_body(params, drawable, parent_id)?;
        self.num_moons += 1;
        Ok(id)
    }

    fn insert_new_body(&mut self, body: OrbitBody) -> BodyID {
        let id = BodyID(self.bodies.len());
        self.bodies.push(body);
        id
    }

    pub fn root(&self) -> Option<BodyID> {
        self.root
    }

    pub fn contains(&self, id: BodyID) -> bool {
        id.0 < self.bodies.len()
    }

    pub fn get_body(&self, id: BodyID) -> &OrbitBody {
        &self.bodies[id.0]
    }

    pub fn get_parent(&self, id: BodyID) -> Option<BodyID> {
        self.bodies[id.0].parent()
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyID, &OrbitBody)> + '_ {
        self.bodies.iter().enumerate().map(|(i, b)| (BodyID(i), b))
    }

    pub fn num_bodies(&self) -> usize {
        self.bodies.len()
    }

    /// Number of bodies that went in through `add_moon`.
    pub fn moon_count(&self) -> usize {
        self.num_moons
    }

    /// Advances every body by `dt`, parents before children. The root sits
    /// at the origin.
    pub fn advance(&mut self, dt: f64) {
        let root = match self.root {
            Some(root) => root,
            None => return,
        };

        let mut stack = vec![(root, Point3::origin())];
        while let Some((id, parent_position)) = stack.pop() {
            let body = &mut self.bodies[id.0];
            let position = body.advance(dt, parent_position);
            stack.extend(body.children().iter().rev().map(|&child| (child, position)));
        }
    }

    /// Bodies reachable from the root, in depth-first preorder.
    pub fn depth_first(&self) -> Vec<BodyID> {
        let mut order = vec![];
        let mut stack: Vec<BodyID> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.bodies[id.0].children().iter().rev());
        }
        order
    }

    pub fn collect_drawables(&self) -> Vec<Drawable> {
        self.bodies()
            .map(|(id, body)| Drawable {
                body: id,
                handle: body.drawable(),
                transform: *body.transform(),
            })
            .collect()
    }

    pub fn collect_orbit_rings(&self) -> Vec<OrbitRing> {
        self.bodies()
            .filter_map(|(id, body)| {
                let parent = body.parent()?;
                Some(OrbitRing {
                    body: id,
                    center: self.bodies[parent.0].position(),
                    radius: body.params().orbit_radius,
                    orientation: *body.orientation(),
                })
            })
            .collect()
    }
}

impl Default for Orrery {
    fn default() -> Self {
        Self::new()
    }
}
