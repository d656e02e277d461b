//! Voxel occupancy grid

use cncsim_core::{MachineError, StockDimensions};
use serde::{Deserialize, Serialize};

/// Cell value for material present
pub const OCCUPIED: u8 = 1;
/// Cell value for material removed
pub const REMOVED: u8 = 0;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// Dense occupancy grid over the stock block.
///
/// Cell `(x, y, z)` covers `[x, x+1) * voxel_size` on each axis, with the
/// stock origin at zero. Storage is x-fastest, then y, then z. The grid
/// size is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoxelStock {
    dimensions: StockDimensions,
    nx: usize,
    ny: usize,
    nz: usize,
    voxels: Vec<u8>,
}

fn cells_along(extent: f64, voxel_size: f64) -> usize {
    ((extent / voxel_size).ceil() as usize).max(1)
}

impl VoxelStock {
    /// Fully occupied stock with at least one cell per axis
    pub fn new(dimensions: &StockDimensions) -> Result<Self, MachineError> {
        dimensions.validate()?;
        let vs = dimensions.voxel_size;
        let nx = cells_along(dimensions.width, vs);
        let ny = cells_along(dimensions.height, vs);
        let nz = cells_along(dimensions.depth, vs);
        let total = nx
            .checked_mul(ny)
            .and_then(|n| n.checked_mul(nz))
            .ok_or_else(|| MachineError::InvalidStock {
                reason: format!("{}x{}x{} voxels is too large", nx, ny, nz),
            })?;

        tracing::debug!("Created stock grid {}x{}x{} at {} mm", nx, ny, nz, vs);
        Ok(Self {
            dimensions: *dimensions,
            nx,
            ny,
            nz,
            voxels: vec![OCCUPIED; total],
        })
    }

    pub fn dimensions(&self) -> &StockDimensions {
        &self.dimensions
    }

    pub fn voxel_size(&self) -> f64 {
        self.dimensions.voxel_size
    }

    /// Cell counts `(nx, ny, nz)`
    pub fn grid_size(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    pub fn cell_count(&self) -> usize {
        self.voxels.len()
    }

    /// Raw occupancy in storage order
    pub fn voxels(&self) -> &[u8] {
        &self.voxels
    }

    #[inline]
    pub(crate) fn index(&self, x: usize, y: usize, z: usize) -> usize {
        z * self.nx * self.ny + y * self.nx + x
    }

    /// Occupancy of one cell, `false` outside the grid
    pub fn is_occupied(&self, x: usize, y: usize, z: usize) -> bool {
        if x >= self.nx || y >= self.ny || z >= self.nz {
            return false;
        }
        self.voxels[self.index(x, y, z)] == OCCUPIED
    }

    pub(crate) fn clear(&mut self, x: usize, y: usize, z: usize) {
        let idx = self.index(x, y, z);
        self.voxels[idx] = REMOVED;
    }

    pub fn occupied_count(&self) -> usize {
        self.voxels.iter().filter(|&&v| v == OCCUPIED).count()
    }

    pub fn removed_count(&self) -> usize {
        self.cell_count() - self.occupied_count()
    }

    /// Removed material (mm^3), counted in whole cells
    pub fn removed_volume(&self) -> f64 {
        self.removed_count() as f64 * self.voxel_size().powi(3)
    }

    /// Share of cells removed, in `[0, 1]`
    pub fn removal_fraction(&self) -> f64 {
        self.removed_count() as f64 / self.cell_count() as f64
    }

    /// 32-bit FNV-1a over the occupancy bytes, as 8 lowercase hex digits
    pub fn hash(&self) -> String {
        let hash = self.voxels.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
            (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
        });
        format!("{:08x}", hash)
    }
}
