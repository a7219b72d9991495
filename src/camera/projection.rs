use nalgebra::{Matrix4, Vector3};

/// Horizontal field of view that goes with a vertical one at this aspect
/// ratio.
pub fn width_angle(height_angle: f32, aspect_ratio: f32) -> f32 {
    2.0 * ((height_angle / 2.0).tan() * aspect_ratio).atan()
}

/// Perspective projection, assembled in three steps instead of the usual
/// closed form:
///   1. scale the view frustum so the far plane sits at depth 1,
///   2. "unhinge" it into a box, with w picking up -z for the divide,
///   3. remap depth so the near plane lands on -1 and the far plane on +1.
///
/// This is the OpenGL perspective matrix divided through by `far`, so it
/// clips identically.
pub fn unhinged_perspective(
    near: f32,
    far: f32,
    width_angle: f32,
    height_angle: f32,
) -> Matrix4<f32> {
    let inv_far = far.recip();
    let scale = Matrix4::new_nonuniform_scaling(&Vector3::new(
        inv_far / (width_angle / 2.0).tan(),
        inv_far / (height_angle / 2.0).tan(),
        inv_far,
    ));

    let c = -near / far;
    let mut unhinge = Matrix4::identity();
    unhinge[(2, 2)] = 1.0 / (1.0 + c);
    unhinge[(2, 3)] = -c / (1.0 + c);
    unhinge[(3, 2)] = -1.0;
    unhinge[(3, 3)] = 0.0;

    let mut remap_z = Matrix4::identity();
    remap_z[(2, 2)] = -2.0;
    remap_z[(2, 3)] = -1.0;

    remap_z * unhinge * scale
}
