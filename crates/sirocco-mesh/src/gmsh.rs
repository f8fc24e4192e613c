//! Gmsh ASCII 2.2 mesh export.
//!
//! Writes the deformed grid (current vertex positions) so a run can be
//! inspected or restarted from any timestep. Node indices are 1-based and
//! global; quad and hex corners are reordered from the solver's
//! tensor-product storage to the Gmsh corner cycle on the way out.
//! Boundary faces are appended after the volume cells and carry their
//! boundary's physical id in both tag slots.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use sirocco_types::{SiroccoError, SiroccoResult};

use crate::element::ElementType;
use crate::mesh::DynamicMesh;

/// Supported mesh output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    /// Gambit neutral format (recognized but not implemented).
    Gambit,
    /// Gmsh ASCII 2.2.
    Gmsh,
}

impl MeshFormat {
    /// Looks up a format from its configuration code.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Gambit),
            1 => Some(Self::Gmsh),
            _ => None,
        }
    }
}

/// Builds the output file name for a given iteration: `{stem}_{iter:09}.msh`.
pub fn mesh_output_name(stem: &str, iteration: u32) -> String {
    format!("{stem}_{iteration:09}.msh")
}

/// Writes the mesh in the requested format.
///
/// Unknown or unimplemented formats are configuration errors — this is a
/// setup-time decision, not a runtime condition to recover from.
pub fn write_mesh(mesh: &DynamicMesh, format: MeshFormat, path: &Path) -> SiroccoResult<()> {
    match format {
        MeshFormat::Gmsh => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            write_gmsh(mesh, &mut writer)
        }
        MeshFormat::Gambit => Err(SiroccoError::InvalidConfig(
            "Gambit mesh writer not implemented".into(),
        )),
    }
}

/// Writes the mesh as Gmsh ASCII 2.2 to any writer.
pub fn write_gmsh<W: Write>(mesh: &DynamicMesh, out: &mut W) -> SiroccoResult<()> {
    let d = mesh.n_dims();
    let x = mesh.current();

    writeln!(out, "$MeshFormat")?;
    writeln!(out, "2.2 0 8")?;
    writeln!(out, "$EndMeshFormat")?;

    // Physical names: the fluid volume first, then one entry per boundary.
    let fluid_id = 1;
    writeln!(out, "$PhysicalNames")?;
    writeln!(out, "{}", mesh.boundaries().len() + 1)?;
    writeln!(out, "{} {} \"FLUID\"", d, fluid_id)?;
    for (ib, bnd) in mesh.boundaries().iter().enumerate() {
        writeln!(out, "{} {} \"{}\"", d - 1, ib + 2, bnd.kind.name())?;
    }
    writeln!(out, "$EndPhysicalNames")?;

    // Nodes, 1-based.
    writeln!(out, "$Nodes")?;
    writeln!(out, "{}", mesh.n_verts_global())?;
    for iv in 0..mesh.n_verts() {
        let p = &x[iv * d..(iv + 1) * d];
        if d == 2 {
            writeln!(out, "{} {} {} 0", iv + 1, p[0], p[1])?;
        } else {
            writeln!(out, "{} {} {} {}", iv + 1, p[0], p[1], p[2])?;
        }
    }
    writeln!(out, "$EndNodes")?;

    // Volume cells, then boundary faces.
    let n_faces: usize = mesh.boundaries().iter().map(|b| b.faces.len()).sum();
    writeln!(out, "$Elements")?;
    writeln!(out, "{}", mesh.n_cells_global() + n_faces)?;

    for ic in 0..mesh.n_cells() {
        let nodes = mesh.cell_global_nodes(ic);
        let (gmsh_type, order) = gmsh_cell_layout(mesh.cell_type(ic), nodes.len())?;
        write!(out, "{} {} 2 {} {}", ic + 1, gmsh_type, fluid_id, fluid_id)?;
        for &slot in order {
            write!(out, " {}", nodes[slot] + 1)?;
        }
        writeln!(out)?;
    }

    let mut face_id = mesh.n_cells_global() + 1;
    for (ib, bnd) in mesh.boundaries().iter().enumerate() {
        let bid = ib + 2;
        for face in &bnd.faces {
            write!(out, "{} {} 2 {} {}", face_id, face.gmsh_type, bid, bid)?;
            for &iv in &face.verts {
                write!(out, " {}", iv.0 + 1)?;
            }
            writeln!(out)?;
            face_id += 1;
        }
    }
    writeln!(out, "$EndElements")?;
    Ok(())
}

/// Maps an element type and node count to its Gmsh type code and the
/// storage-slot order in which the nodes are written.
fn gmsh_cell_layout(
    ctype: ElementType,
    nv: usize,
) -> SiroccoResult<(i32, &'static [usize])> {
    match (ctype, nv) {
        (ElementType::Tri, 3) => Ok((2, &[0, 1, 2])),
        (ElementType::Tri, 6) => Ok((9, &[0, 1, 2, 3, 4, 5])),
        // Tensor storage → Gmsh corner cycle.
        (ElementType::Quad, 4) => Ok((3, &[0, 1, 3, 2])),
        (ElementType::Quad, 8) => Ok((16, &[0, 1, 2, 3, 4, 5, 6, 7])),
        // 3x3 tensor storage → Gmsh quad9: corners, edge midpoints, center.
        (ElementType::Quad, 9) => Ok((10, &[0, 2, 8, 6, 1, 5, 7, 3, 4])),
        (ElementType::Hex, 8) => Ok((5, &[0, 1, 3, 2, 4, 5, 7, 6])),
        _ => Err(SiroccoError::InvalidConfig(format!(
            "{ctype:?} with {nv} nodes is not supported by the Gmsh writer"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_codes() {
        assert_eq!(MeshFormat::from_code(0), Some(MeshFormat::Gambit));
        assert_eq!(MeshFormat::from_code(1), Some(MeshFormat::Gmsh));
        assert_eq!(MeshFormat::from_code(7), None);
    }

    #[test]
    fn output_name_is_zero_padded() {
        assert_eq!(mesh_output_name("naca0012", 42), "naca0012_000000042.msh");
    }
}
