use proptest::prelude::*;
use veld_chunk::{Chunk, VoxelBox};
use veld_world::ChunkIndex;

fn dim() -> impl Strategy<Value = usize> {
    1usize..=8
}

proptest! {
    // index_of maps each (x,y,z) within bounds to a unique in-range index
    #[test]
    fn index_of_is_a_bijection(sx in dim(), sy in dim(), sz in dim()) {
        let vb = VoxelBox::new(sx, sy, sz);
        let volume = vb.volume();
        let mut seen = vec![false; volume];
        for x in 0..sx { for y in 0..sy { for z in 0..sz {
            let i = vb.index_of(x, y, z);
            prop_assert!(i < volume);
            prop_assert!(!seen[i]);
            seen[i] = true;
        }}}
        prop_assert!(seen.into_iter().all(|b| b));
    }

    // coords_of is the exact inverse of index_of over the volume
    #[test]
    fn coords_of_inverts_index_of(sx in dim(), sy in dim(), sz in dim()) {
        let vb = VoxelBox::new(sx, sy, sz);
        for i in 0..vb.volume() {
            let (x, y, z) = vb.coords_of(i);
            prop_assert!(x < sx && y < sy && z < sz);
            prop_assert_eq!(vb.index_of(x, y, z), i);
        }
    }

    // z varies fastest, then y, then x
    #[test]
    fn linearization_order_is_z_y_x(sx in 2usize..=8, sy in 2usize..=8, sz in 2usize..=8) {
        let vb = VoxelBox::new(sx, sy, sz);
        prop_assert_eq!(vb.index_of(0, 0, 1), vb.index_of(0, 0, 0) + 1);
        prop_assert_eq!(vb.index_of(0, 1, 0), vb.index_of(0, 0, 0) + sz);
        prop_assert_eq!(vb.index_of(1, 0, 0), vb.index_of(0, 0, 0) + sy * sz);
    }

    // local get/set round-trips through the chunk's flat storage
    #[test]
    fn chunk_local_get_set_roundtrip(x in 0usize..16, y in 0usize..128, z in 0usize..16, id in 1u16..=5) {
        let mut chunk = Chunk::empty(ChunkIndex::new(0, 0));
        chunk.set_local(x, y, z, id);
        prop_assert_eq!(chunk.get_local(x, y, z), id);
        prop_assert_eq!(chunk.blocks[Chunk::BOX.index_of(x, y, z)], id);
    }
}
