use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Model offset the original front end applied to every frame: six units
/// along the negative view axis, so the object sits in front of the camera.
pub const DEFAULT_MODEL_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -6.0);

/// Perspective viewing volume of the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frustum {
    /// Vertical field of view in radians, strictly between 0 and pi.
    pub field_of_view: f32,
    /// Viewport width divided by height, positive.
    pub aspect: f32,
    /// Near clip distance, positive.
    pub z_near: f32,
    /// Far clip distance, beyond the near plane.
    pub z_far: f32,
}

impl Default for Frustum {
    fn default() -> Self {
        Self {
            field_of_view: 45f32.to_radians(),
            aspect: aspect_for(1280, 720),
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}

impl Frustum {
    pub fn new(field_of_view: f32, aspect: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            field_of_view,
            aspect,
            z_near,
            z_far,
        }
    }

    /// Frustum whose aspect ratio is derived from a viewport in pixels.
    pub fn for_viewport(field_of_view: f32, width: u32, height: u32, z_near: f32, z_far: f32) -> Self {
        Self::new(field_of_view, aspect_for(width, height), z_near, z_far)
    }

    /// Checks the frustum invariants, reporting the first violation.
    pub fn validate(&self) -> Result<(), TransformError> {
        if !(self.field_of_view > 0.0 && self.field_of_view < std::f32::consts::PI) {
            return Err(TransformError::FieldOfView(self.field_of_view));
        }
        if !(self.aspect > 0.0) {
            return Err(TransformError::Aspect(self.aspect));
        }
        if !(self.z_near > 0.0) {
            return Err(TransformError::NearPlane(self.z_near));
        }
        if !(self.z_far > self.z_near) {
            return Err(TransformError::FarPlane {
                near: self.z_near,
                far: self.z_far,
            });
        }
        Ok(())
    }
}

/// Frustum parameter rejected before any matrix is built.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TransformError {
    #[error("field of view must lie strictly between 0 and pi radians, got {0}")]
    FieldOfView(f32),
    #[error("aspect ratio must be positive, got {0}")]
    Aspect(f32),
    #[error("near plane must be positive, got {0}")]
    NearPlane(f32),
    #[error("far plane must lie beyond the near plane, got near={near} far={far}")]
    FarPlane { near: f32, far: f32 },
}

/// Matrix pair handed to the engine each frame.  Both matrices are
/// column-major and owned by the caller; every call allocates fresh ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transforms {
    pub projection: Mat4,
    pub model_view: Mat4,
}

/// Builds the projection and model-view matrices for one frame.
///
/// The projection is the standard symmetric perspective for `frustum`
/// (right-handed, negative z forward).  The model view starts at the
/// identity, the center of the scene, and is composed with a translation
/// of `translation` so that prior transforms stay correct if the starting
/// matrix ever grows rotations.
pub fn compute_transforms(frustum: Frustum, translation: Vec3) -> Result<Transforms, TransformError> {
    frustum.validate()?;
    let projection = Mat4::perspective_rh_gl(
        frustum.field_of_view,
        frustum.aspect,
        frustum.z_near,
        frustum.z_far,
    );
    let model_view = Mat4::IDENTITY * Mat4::from_translation(translation);
    Ok(Transforms {
        projection,
        model_view,
    })
}

/// Aspect ratio of a viewport in pixels, guarding the zero-height case
/// a collapsed window reports.
pub fn aspect_for(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

/// Renders a matrix as four text rows for logs and CLI output.
pub fn format_matrix(matrix: &Mat4) -> String {
    let columns = matrix.to_cols_array_2d();
    (0..4)
        .map(|row| {
            (0..4)
                .map(|column| format!("{:9.4}", columns[column][row]))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec4;
    use std::f32::consts::PI;

    #[test]
    fn projection_matches_perspective_formula() {
        let frustum = Frustum::new(1.0, 1.5, 0.5, 50.0);
        let transforms = compute_transforms(frustum, Vec3::ZERO).unwrap();
        let m = transforms.projection.to_cols_array();

        let f = 1.0 / (frustum.field_of_view / 2.0).tan();
        assert_relative_eq!(m[0], f / frustum.aspect, epsilon = 1e-6);
        assert_relative_eq!(m[5], f, epsilon = 1e-6);
        assert_relative_eq!(
            m[10],
            (frustum.z_far + frustum.z_near) / (frustum.z_near - frustum.z_far),
            epsilon = 1e-6
        );
        assert_eq!(m[11], -1.0);
        assert_relative_eq!(
            m[14],
            (2.0 * frustum.z_far * frustum.z_near) / (frustum.z_near - frustum.z_far),
            epsilon = 1e-6
        );

        let defined = [0, 5, 10, 11, 14];
        for (index, value) in m.iter().enumerate() {
            if !defined.contains(&index) {
                assert_eq!(*value, 0.0, "entry {index} should stay zero");
            }
        }
    }

    #[test]
    fn identical_inputs_yield_identical_matrices() {
        let frustum = Frustum::default();
        let first = compute_transforms(frustum, DEFAULT_MODEL_OFFSET).unwrap();
        let second = compute_transforms(frustum, DEFAULT_MODEL_OFFSET).unwrap();
        assert_eq!(
            first.projection.to_cols_array(),
            second.projection.to_cols_array()
        );
        assert_eq!(
            first.model_view.to_cols_array(),
            second.model_view.to_cols_array()
        );
    }

    #[test]
    fn translation_lands_in_the_fourth_column() {
        let translation = Vec3::new(1.5, -2.0, 3.25);
        let transforms = compute_transforms(Frustum::default(), translation).unwrap();
        let model_view = transforms.model_view;
        assert_eq!(model_view.col(0), Vec4::X);
        assert_eq!(model_view.col(1), Vec4::Y);
        assert_eq!(model_view.col(2), Vec4::Z);
        assert_eq!(model_view.col(3), translation.extend(1.0));
    }

    #[test]
    fn forty_five_degree_view_matches_worked_example() {
        let frustum = Frustum::new(45f32.to_radians(), 1.0, 0.1, 100.0);
        let transforms = compute_transforms(frustum, DEFAULT_MODEL_OFFSET).unwrap();
        assert_relative_eq!(transforms.projection.to_cols_array()[5], 2.4142135, epsilon = 1e-4);
        assert_eq!(
            transforms.model_view.col(3),
            Vec4::new(0.0, 0.0, -6.0, 1.0)
        );
    }

    #[test]
    fn degenerate_parameters_are_rejected() {
        let valid = Frustum::new(1.0, 1.0, 0.1, 10.0);
        let cases = [
            (
                Frustum { field_of_view: 0.0, ..valid },
                TransformError::FieldOfView(0.0),
            ),
            (
                Frustum { field_of_view: PI, ..valid },
                TransformError::FieldOfView(PI),
            ),
            (
                Frustum { aspect: 0.0, ..valid },
                TransformError::Aspect(0.0),
            ),
            (
                Frustum { z_near: 0.0, ..valid },
                TransformError::NearPlane(0.0),
            ),
            (
                Frustum { z_far: valid.z_near, ..valid },
                TransformError::FarPlane { near: 0.1, far: 0.1 },
            ),
        ];
        for (frustum, expected) in cases {
            let err = compute_transforms(frustum, Vec3::ZERO).unwrap_err();
            assert_eq!(err, expected);
        }
    }

    #[test]
    fn nan_field_of_view_is_rejected() {
        let frustum = Frustum::new(f32::NAN, 1.0, 0.1, 10.0);
        assert!(compute_transforms(frustum, Vec3::ZERO).is_err());
    }

    #[test]
    fn aspect_for_guards_collapsed_viewports() {
        assert_relative_eq!(aspect_for(1280, 720), 16.0 / 9.0, epsilon = 1e-6);
        assert_eq!(aspect_for(100, 0), 1.0);
    }

    #[test]
    fn format_matrix_prints_rows_of_the_column_major_layout() {
        let matrix = Mat4::from_translation(Vec3::new(0.0, 0.0, -6.0));
        let text = format_matrix(&matrix);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 4);
        // Row 2 carries the z translation in its last entry.
        assert!(rows[2].trim_start().starts_with("0.0000"));
        assert!(rows[2].ends_with("-6.0000"));
    }
}
