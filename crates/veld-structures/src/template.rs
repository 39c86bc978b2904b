//! Immutable structure prefabs loaded from static data.

use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use veld_chunk::VoxelBox;
use veld_world::{AIR, BlockId, LEAVES, WOOD};

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct TemplateExtent {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct TemplateRoot {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Voxel box of block identifiers with a designated root anchor offset.
/// Stored top-to-bottom on Y (row 0 is the top of the prefab); the flat
/// `blocks` sequence uses the same z-fastest linearization as chunks.
#[derive(Clone, Debug, Deserialize)]
pub struct StructureTemplate {
    pub size: TemplateExtent,
    pub root: TemplateRoot,
    pub blocks: Vec<BlockId>,
}

impl StructureTemplate {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let template: StructureTemplate = toml::from_str(toml_str)?;
        template.validate()?;
        Ok(template)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        let volume = self.voxel_box().volume();
        if self.blocks.len() != volume {
            return Err(format!(
                "template block sequence has {} entries, size {}x{}x{} needs {}",
                self.blocks.len(),
                self.size.x,
                self.size.y,
                self.size.z,
                volume
            )
            .into());
        }
        let root_inside = self.voxel_box().contains(self.root.x, self.root.y, self.root.z);
        if !root_inside {
            return Err(format!(
                "template root ({}, {}, {}) lies outside the box",
                self.root.x, self.root.y, self.root.z
            )
            .into());
        }
        Ok(())
    }

    #[inline]
    pub fn voxel_box(&self) -> VoxelBox {
        VoxelBox::new(self.size.x, self.size.y, self.size.z)
    }

    #[inline]
    pub fn block_at(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.blocks[self.voxel_box().index_of(x, y, z)]
    }

    /// Built-in oak-like tree: four-block trunk with a layered canopy.
    /// Root sits at the trunk base so placements anchor on the surface.
    pub fn tree() -> Self {
        let size = TemplateExtent { x: 5, y: 7, z: 5 };
        let root = TemplateRoot { x: 2, y: 6, z: 2 };
        let vb = VoxelBox::new(size.x, size.y, size.z);
        let mut blocks = vec![AIR; vb.volume()];

        // Canopy, widest in the middle, narrowing toward the top (y = 0).
        for (ty, radius) in [(0usize, 1i32), (1, 2), (2, 2), (3, 1)] {
            for x in 0..size.x as i32 {
                for z in 0..size.z as i32 {
                    let dx = x - root.x;
                    let dz = z - root.z;
                    if dx.abs() <= radius && dz.abs() <= radius {
                        blocks[vb.index_of(x as usize, ty, z as usize)] = LEAVES;
                    }
                }
            }
        }
        // Trunk from the base up into the canopy.
        for ty in 2..=6usize {
            blocks[vb.index_of(root.x as usize, ty, root.z as usize)] = WOOD;
        }

        let template = Self { size, root, blocks };
        debug_assert!(template.validate().is_ok());
        template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_roundtrip_with_explicit_blocks() {
        let template = StructureTemplate::from_toml_str(
            r#"
            size = { x = 1, y = 2, z = 1 }
            root = { x = 0, y = 1, z = 0 }
            blocks = [5, 4]
            "#,
        )
        .unwrap();
        assert_eq!(template.block_at(0, 0, 0), 5);
        assert_eq!(template.block_at(0, 1, 0), 4);
    }

    #[test]
    fn wrong_block_count_is_rejected() {
        let err = StructureTemplate::from_toml_str(
            r#"
            size = { x = 2, y = 2, z = 2 }
            root = { x = 0, y = 0, z = 0 }
            blocks = [1, 2, 3]
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn root_outside_box_is_rejected() {
        let err = StructureTemplate::from_toml_str(
            r#"
            size = { x = 1, y = 1, z = 1 }
            root = { x = 0, y = 1, z = 0 }
            blocks = [1]
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn builtin_tree_has_trunk_at_root() {
        let tree = StructureTemplate::tree();
        assert_eq!(tree.block_at(2, 6, 2), WOOD);
        assert_eq!(tree.block_at(2, 2, 2), WOOD);
        assert_eq!(tree.block_at(2, 1, 2), LEAVES);
        assert_eq!(tree.block_at(0, 1, 0), LEAVES);
        assert_eq!(tree.block_at(0, 6, 0), AIR);
    }
}
