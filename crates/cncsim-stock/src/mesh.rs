//! ASCII STL export of the remaining stock

use crate::voxel::VoxelStock;
use cncsim_core::Point3;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

/// Solid name written to exported STL files
pub const SOLID_NAME: &str = "reststock";

/// Which faces of occupied cells are exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshExport {
    /// Top face of every occupied cell; fast, not closed
    #[default]
    TopFaces,
    /// Every face between an occupied cell and empty space; closed
    Surface,
}

/// One STL triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    pub normal: Point3,
    pub vertices: [Point3; 3],
}

const UP: Point3 = Point3::new(0.0, 0.0, 1.0);

/// Split a counter-clockwise quad into two facets
fn push_quad(facets: &mut Vec<Facet>, quad: [Point3; 4], normal: Point3) {
    let [v1, v2, v3, v4] = quad;
    facets.push(Facet {
        normal,
        vertices: [v1, v2, v3],
    });
    facets.push(Facet {
        normal,
        vertices: [v1, v3, v4],
    });
}

impl VoxelStock {
    fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        let (nx, ny, nz) = self.grid_size();
        (0..nz)
            .flat_map(move |z| (0..ny).flat_map(move |y| (0..nx).map(move |x| (x, y, z))))
            .filter(|&(x, y, z)| self.is_occupied(x, y, z))
    }

    /// Top face of every occupied cell, z then y then x order
    pub fn top_facets(&self) -> Vec<Facet> {
        let vs = self.voxel_size();
        let mut facets = Vec::new();
        for (x, y, z) in self.occupied_cells() {
            let x0 = x as f64 * vs;
            let x1 = x0 + vs;
            let y0 = y as f64 * vs;
            let y1 = y0 + vs;
            let z1 = (z + 1) as f64 * vs;
            push_quad(
                &mut facets,
                [
                    Point3::new(x0, y0, z1),
                    Point3::new(x1, y0, z1),
                    Point3::new(x1, y1, z1),
                    Point3::new(x0, y1, z1),
                ],
                UP,
            );
        }
        facets
    }

    /// Every exposed face of occupied cells, wound outward
    pub fn surface_facets(&self) -> Vec<Facet> {
        let vs = self.voxel_size();
        let mut facets = Vec::new();
        let empty = |x: usize, y: usize, z: usize| !self.is_occupied(x, y, z);

        for (x, y, z) in self.occupied_cells() {
            let px = x as f64 * vs;
            let py = y as f64 * vs;
            let pz = z as f64 * vs;
            let (qx, qy, qz) = (px + vs, py + vs, pz + vs);
            let p = Point3::new;

            if x == 0 || empty(x - 1, y, z) {
                push_quad(
                    &mut facets,
                    [p(px, py, pz), p(px, py, qz), p(px, qy, qz), p(px, qy, pz)],
                    p(-1.0, 0.0, 0.0),
                );
            }
            if empty(x + 1, y, z) {
                push_quad(
                    &mut facets,
                    [p(qx, py, qz), p(qx, py, pz), p(qx, qy, pz), p(qx, qy, qz)],
                    p(1.0, 0.0, 0.0),
                );
            }
            if y == 0 || empty(x, y - 1, z) {
                push_quad(
                    &mut facets,
                    [p(px, py, pz), p(qx, py, pz), p(qx, py, qz), p(px, py, qz)],
                    p(0.0, -1.0, 0.0),
                );
            }
            if empty(x, y + 1, z) {
                push_quad(
                    &mut facets,
                    [p(px, qy, qz), p(qx, qy, qz), p(qx, qy, pz), p(px, qy, pz)],
                    p(0.0, 1.0, 0.0),
                );
            }
            if z == 0 || empty(x, y, z - 1) {
                push_quad(
                    &mut facets,
                    [p(qx, py, pz), p(px, py, pz), p(px, qy, pz), p(qx, qy, pz)],
                    p(0.0, 0.0, -1.0),
                );
            }
            if empty(x, y, z + 1) {
                push_quad(
                    &mut facets,
                    [p(px, py, qz), p(qx, py, qz), p(qx, qy, qz), p(px, qy, qz)],
                    UP,
                );
            }
        }
        facets
    }

    /// ASCII STL with the top face of every occupied cell
    pub fn export_mesh(&self) -> String {
        write_ascii_stl(SOLID_NAME, &self.top_facets())
    }

    /// ASCII STL of the closed outer surface
    pub fn export_surface_mesh(&self) -> String {
        write_ascii_stl(SOLID_NAME, &self.surface_facets())
    }

    pub fn export(&self, mode: MeshExport) -> String {
        match mode {
            MeshExport::TopFaces => self.export_mesh(),
            MeshExport::Surface => self.export_surface_mesh(),
        }
    }

    /// Write the mesh to `path`
    pub fn save_stl(&self, path: &Path, mode: MeshExport) -> cncsim_core::Result<()> {
        std::fs::write(path, self.export(mode))?;
        tracing::info!("Wrote {:?} stock mesh to {}", mode, path.display());
        Ok(())
    }
}

/// Render facets as ASCII STL, `\n` separated, no trailing newline
pub fn write_ascii_stl(name: &str, facets: &[Facet]) -> String {
    let mut out = String::with_capacity(64 + facets.len() * 160);
    // writing into a String cannot fail
    let _ = writeln!(out, "solid {}", name);
    for facet in facets {
        let n = facet.normal;
        let _ = writeln!(out, " facet normal {} {} {}", n.x, n.y, n.z);
        out.push_str("  outer loop\n");
        for v in &facet.vertices {
            let _ = writeln!(out, "   vertex {} {} {}", v.x, v.y, v.z);
        }
        out.push_str("  endloop\n");
        out.push_str(" endfacet\n");
    }
    let _ = write!(out, "endsolid {}", name);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cncsim_core::StockDimensions;

    fn stock(w: f64, h: f64, d: f64, vs: f64) -> VoxelStock {
        VoxelStock::new(&StockDimensions::new(w, h, d, vs)).unwrap()
    }

    /// Signed volume enclosed by a triangle soup
    fn enclosed_volume(facets: &[Facet]) -> f64 {
        facets
            .iter()
            .map(|f| {
                let [a, b, c] = f.vertices.map(Point3::to_dvec3);
                a.dot(b.cross(c)) / 6.0
            })
            .sum()
    }

    #[test]
    fn test_single_cell_top_face_text() {
        let s = stock(1.0, 1.0, 1.0, 1.0);
        let expected = "solid reststock
 facet normal 0 0 1
  outer loop
   vertex 0 0 1
   vertex 1 0 1
   vertex 1 1 1
  endloop
 endfacet
 facet normal 0 0 1
  outer loop
   vertex 0 0 1
   vertex 1 1 1
   vertex 0 1 1
  endloop
 endfacet
endsolid reststock";
        assert_eq!(s.export_mesh(), expected);
    }

    #[test]
    fn test_top_faces_count() {
        let mut s = stock(3.0, 2.0, 2.0, 1.0);
        assert_eq!(s.top_facets().len(), 2 * 12);
        s.clear(0, 0, 0);
        assert_eq!(s.top_facets().len(), 2 * 11);
        // every normal points up
        assert!(s.top_facets().iter().all(|f| f.normal == UP));
    }

    #[test]
    fn test_fully_removed_stock_exports_empty_solid() {
        let mut s = stock(1.0, 1.0, 1.0, 1.0);
        s.clear(0, 0, 0);
        assert_eq!(s.export_mesh(), "solid reststock\nendsolid reststock");
        assert!(s.surface_facets().is_empty());
    }

    #[test]
    fn test_surface_of_block_counts_outer_faces_only() {
        let s = stock(2.0, 1.0, 1.0, 1.0);
        // 10 exposed faces, the shared one is hidden
        assert_eq!(s.surface_facets().len(), 20);
    }

    #[test]
    fn test_surface_encloses_remaining_volume() {
        let mut s = stock(4.0, 3.0, 2.0, 0.5);
        s.carve(Point3::new(0.0, 1.5, 1.0), Point3::new(4.0, 1.5, 1.0), 0.6);
        let expected = s.occupied_count() as f64 * 0.125;
        let volume = enclosed_volume(&s.surface_facets());
        assert!((volume - expected).abs() < 1e-9, "{} vs {}", volume, expected);
    }

    #[test]
    fn test_export_mode_dispatch() {
        let s = stock(1.0, 1.0, 1.0, 1.0);
        assert_eq!(s.export(MeshExport::TopFaces), s.export_mesh());
        assert_eq!(s.export(MeshExport::Surface).matches("endfacet").count(), 12);
    }

    #[test]
    fn test_save_stl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reststock.stl");
        stock(2.0, 2.0, 1.0, 1.0)
            .save_stl(&path, MeshExport::TopFaces)
            .unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("solid reststock\n"));
        assert_eq!(text.matches("facet normal").count(), 8);
    }
}
