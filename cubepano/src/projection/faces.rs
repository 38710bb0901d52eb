//! The six faces handed to a projector.

use image::RgbImage;

use super::ProjectionError;
use crate::coord::Face;

/// Six square faces of equal size, indexed by [`Face`].
#[derive(Debug, Clone)]
pub struct CubeFaces {
    faces: [RgbImage; 6],
    size: u32,
}

impl CubeFaces {
    /// Wraps six faces given in [`Face::ALL`] order.
    ///
    /// # Errors
    ///
    /// Fails when a face is not square, when sizes differ from the first
    /// face, or when the faces are empty.
    pub fn new(faces: [RgbImage; 6]) -> Result<Self, ProjectionError> {
        let size = faces[0].width();
        if size == 0 {
            return Err(ProjectionError::EmptyFaces);
        }

        for (face, image) in Face::ALL.iter().zip(faces.iter()) {
            let (width, height) = image.dimensions();
            if width != height {
                return Err(ProjectionError::NotSquare {
                    face: *face,
                    width,
                    height,
                });
            }
            if width != size {
                return Err(ProjectionError::UnequalFaces {
                    face: *face,
                    expected: size,
                    actual: width,
                });
            }
        }

        Ok(Self { faces, size })
    }

    /// The image of one face.
    #[inline]
    pub fn face(&self, face: Face) -> &RgbImage {
        &self.faces[face.index()]
    }

    /// Edge length shared by all faces.
    #[inline]
    pub fn face_size(&self) -> u32 {
        self.size
    }
}
