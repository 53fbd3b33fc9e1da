//! # Primitive Vertex Tables

use super::GeometryData;
use crate::gfx::scene::vertex::SkyVertex;

/// Unit cube centred on the origin, one texture tile per face.
#[rustfmt::skip]
const CONTAINER_TABLE: [f32; 288] = [
    // positions           // normals            // texture coords
    -0.5, -0.5, -0.5,   0.0,  0.0, -1.0,   0.0, 0.0,
     0.5, -0.5, -0.5,   0.0,  0.0, -1.0,   1.0, 0.0,
     0.5,  0.5, -0.5,   0.0,  0.0, -1.0,   1.0, 1.0,
     0.5,  0.5, -0.5,   0.0,  0.0, -1.0,   1.0, 1.0,
    -0.5,  0.5, -0.5,   0.0,  0.0, -1.0,   0.0, 1.0,
    -0.5, -0.5, -0.5,   0.0,  0.0, -1.0,   0.0, 0.0,

    -0.5, -0.5,  0.5,   0.0,  0.0,  1.0,   1.0, 0.0,
     0.5, -0.5,  0.5,   0.0,  0.0,  1.0,   0.0, 0.0,
     0.5,  0.5,  0.5,   0.0,  0.0,  1.0,   0.0, 1.0,
     0.5,  0.5,  0.5,   0.0,  0.0,  1.0,   0.0, 1.0,
    -0.5,  0.5,  0.5,   0.0,  0.0,  1.0,   1.0, 1.0,
    -0.5, -0.5,  0.5,   0.0,  0.0,  1.0,   1.0, 0.0,

    -0.5,  0.5,  0.5,  -1.0,  0.0,  0.0,   1.0, 0.0,
    -0.5,  0.5, -0.5,  -1.0,  0.0,  0.0,   1.0, 1.0,
    -0.5, -0.5, -0.5,  -1.0,  0.0,  0.0,   0.0, 1.0,
    -0.5, -0.5, -0.5,  -1.0,  0.0,  0.0,   0.0, 1.0,
    -0.5, -0.5,  0.5,  -1.0,  0.0,  0.0,   0.0, 0.0,
    -0.5,  0.5,  0.5,  -1.0,  0.0,  0.0,   1.0, 0.0,

     0.5,  0.5,  0.5,   1.0,  0.0,  0.0,   1.0, 1.0,
     0.5,  0.5, -0.5,   1.0,  0.0,  0.0,   1.0, 0.0,
     0.5, -0.5, -0.5,   1.0,  0.0,  0.0,   0.0, 0.0,
     0.5, -0.5, -0.5,   1.0,  0.0,  0.0,   0.0, 0.0,
     0.5, -0.5,  0.5,   1.0,  0.0,  0.0,   0.0, 1.0,
     0.5,  0.5,  0.5,   1.0,  0.0,  0.0,   1.0, 1.0,

    -0.5, -0.5, -0.5,   0.0, -1.0,  0.0,   0.0, 1.0,
     0.5, -0.5, -0.5,   0.0, -1.0,  0.0,   1.0, 1.0,
     0.5, -0.5,  0.5,   0.0, -1.0,  0.0,   1.0, 0.0,
     0.5, -0.5,  0.5,   0.0, -1.0,  0.0,   1.0, 0.0,
    -0.5, -0.5,  0.5,   0.0, -1.0,  0.0,   0.0, 0.0,
    -0.5, -0.5, -0.5,   0.0, -1.0,  0.0,   0.0, 1.0,

    -0.5,  0.5, -0.5,   0.0,  1.0,  0.0,   0.0, 0.0,
     0.5,  0.5, -0.5,   0.0,  1.0,  0.0,   1.0, 0.0,
     0.5,  0.5,  0.5,   0.0,  1.0,  0.0,   1.0, 1.0,
     0.5,  0.5,  0.5,   0.0,  1.0,  0.0,   1.0, 1.0,
    -0.5,  0.5,  0.5,   0.0,  1.0,  0.0,   0.0, 1.0,
    -0.5,  0.5, -0.5,   0.0,  1.0,  0.0,   0.0, 0.0,
];

/// Box narrowing from a 1.0 wide rim to a 0.5 wide base, with a soil plane
/// set a quarter unit below the rim instead of a lid.
#[rustfmt::skip]
const PLANTER_TABLE: [f32; 288] = [
    -0.25, -0.5, -0.25,   0.0, -0.25, -1.0,   0.0, 0.0,
     0.25, -0.5, -0.25,   0.0, -0.25, -1.0,   1.0, 0.0,
     0.5,   0.5, -0.5,    0.0, -0.25, -1.0,   1.0, 1.0,
     0.5,   0.5, -0.5,    0.0, -0.25, -1.0,   1.0, 1.0,
    -0.5,   0.5, -0.5,    0.0, -0.25, -1.0,   0.0, 1.0,
    -0.25, -0.5, -0.25,   0.0, -0.25, -1.0,   0.0, 0.0,

    -0.25, -0.5,  0.25,   0.0, -0.25,  1.0,   0.0, 0.0,
     0.25, -0.5,  0.25,   0.0, -0.25,  1.0,   1.0, 0.0,
     0.5,   0.5,  0.5,    0.0, -0.25,  1.0,   1.0, 1.0,
     0.5,   0.5,  0.5,    0.0, -0.25,  1.0,   1.0, 1.0,
    -0.5,   0.5,  0.5,    0.0, -0.25,  1.0,   0.0, 1.0,
    -0.25, -0.5,  0.25,   0.0, -0.25,  1.0,   0.0, 0.0,

    -0.5,   0.5,  0.5,   -1.0, -0.25,  0.0,   1.0, 0.0,
    -0.5,   0.5, -0.5,   -1.0, -0.25,  0.0,   1.0, 1.0,
    -0.25, -0.5, -0.25,  -1.0, -0.25,  0.0,   0.0, 1.0,
    -0.25, -0.5, -0.25,  -1.0, -0.25,  0.0,   0.0, 1.0,
    -0.25, -0.5,  0.25,  -1.0, -0.25,  0.0,   0.0, 0.0,
    -0.5,   0.5,  0.5,   -1.0, -0.25,  0.0,   1.0, 0.0,

     0.5,   0.5,  0.5,    1.0, -0.25,  0.0,   1.0, 0.0,
     0.5,   0.5, -0.5,    1.0, -0.25,  0.0,   1.0, 1.0,
     0.25, -0.5, -0.25,   1.0, -0.25,  0.0,   0.0, 1.0,
     0.25, -0.5, -0.25,   1.0, -0.25,  0.0,   0.0, 1.0,
     0.25, -0.5,  0.25,   1.0, -0.25,  0.0,   0.0, 0.0,
     0.5,   0.5,  0.5,    1.0, -0.25,  0.0,   1.0, 0.0,

    -0.25, -0.5, -0.25,   0.0, -1.0,   0.0,   0.0, 1.0,
     0.25, -0.5, -0.25,   0.0, -1.0,   0.0,   1.0, 1.0,
     0.25, -0.5,  0.25,   0.0, -1.0,   0.0,   1.0, 0.0,
     0.25, -0.5,  0.25,   0.0, -1.0,   0.0,   1.0, 0.0,
    -0.25, -0.5,  0.25,   0.0, -1.0,   0.0,   0.0, 0.0,
    -0.25, -0.5, -0.25,   0.0, -1.0,   0.0,   0.0, 1.0,

    -0.4375, 0.25, -0.4375,   0.0, 1.0, 0.0,   0.0, 1.0,
     0.4375, 0.25, -0.4375,   0.0, 1.0, 0.0,   1.0, 1.0,
     0.4375, 0.25,  0.4375,   0.0, 1.0, 0.0,   1.0, 0.0,
     0.4375, 0.25,  0.4375,   0.0, 1.0, 0.0,   1.0, 0.0,
    -0.4375, 0.25,  0.4375,   0.0, 1.0, 0.0,   0.0, 0.0,
    -0.4375, 0.25, -0.4375,   0.0, 1.0, 0.0,   0.0, 1.0,
];

/// Cube from -1 to 1, wound to be seen from the inside.
#[rustfmt::skip]
const SKY_TABLE: [[f32; 3]; 36] = [
    // back
    [-1.0,  1.0, -1.0], [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],
    // left
    [-1.0, -1.0,  1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0],
    [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [-1.0, -1.0,  1.0],
    // right
    [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0],
    // front
    [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],
    // top
    [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],
    // bottom
    [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0],
    [ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0], [-1.0, -1.0, -1.0],
];

/// Textured unit cube used by the container.
pub fn container_cube() -> GeometryData {
    GeometryData::from_interleaved(&CONTAINER_TABLE)
}

/// Tapered planter box.
pub fn planter_box() -> GeometryData {
    GeometryData::from_interleaved(&PLANTER_TABLE)
}

/// Inside-out cube for the sky dome.
pub fn sky_cube() -> Vec<SkyVertex> {
    SKY_TABLE
        .iter()
        .map(|&position| SkyVertex { position })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_cube() {
        let cube = container_cube();
        assert_eq!(cube.vertex_count(), 36);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube
            .vertices
            .iter()
            .all(|v| v.position.iter().all(|c| c.abs() == 0.5)));
    }

    #[test]
    fn test_planter_box() {
        let planter = planter_box();
        assert_eq!(planter.vertex_count(), 36);

        // the base is narrower than the rim
        let base = planter.vertices.iter().filter(|v| v.position[1] == -0.5);
        assert!(base.into_iter().all(|v| v.position[0].abs() == 0.25));
    }

    #[test]
    fn test_sky_cube() {
        let sky = sky_cube();
        assert_eq!(sky.len(), 36);
        assert!(sky
            .iter()
            .all(|v| v.position.iter().all(|c| c.abs() == 1.0)));
    }

    #[test]
    fn test_uv_stay_in_unit_range() {
        for v in container_cube().vertices.iter().chain(planter_box().vertices.iter()) {
            assert!(v.tex_coords.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }
}
