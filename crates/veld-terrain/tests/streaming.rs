//! End-to-end streaming behavior through `Terrain::update`.

use veld_chunk::EntityHandle;
use veld_geom::{Aabb, Vec3};
use veld_terrain::{Observer, Terrain};
use veld_world::{CHUNK_WIDTH, ChunkIndex, STONE, StreamingConfig, WorldConfig};

fn test_config(radius: i32) -> WorldConfig {
    let mut cfg = WorldConfig::default();
    cfg.seed = 4242;
    cfg.streaming = StreamingConfig {
        radius,
        physical_rate: 1,
        graphical_rate: 2,
        refresh_rate: 1,
        refresh_period: 5,
    };
    cfg
}

fn observer_at(id: u64, x: f32, z: f32) -> Observer {
    Observer {
        id,
        position: Vec3::new(x, 60.0, z),
    }
}

fn center_of(cx: i32, cz: i32) -> (f32, f32) {
    let w = CHUNK_WIDTH as f32;
    (cx as f32 * w + w / 2.0, cz as f32 * w + w / 2.0)
}

#[test]
fn streaming_fills_the_diamond_around_the_observer() {
    let mut terrain = Terrain::new(&test_config(3));
    let obs = [observer_at(1, 8.0, 8.0)];
    for _ in 0..40 {
        terrain.update(&obs, &[]);
    }
    // Radius 3 keeps layers 0..=2: 1 + 4 + 8 chunks.
    assert_eq!(terrain.chunks.len(), 13);
    for dx in -4..=4 {
        for dz in -4..=4 {
            let index = ChunkIndex::new(dx, dz);
            assert_eq!(
                terrain.chunks.contains_key(&index),
                dx.abs() + dz.abs() < 3,
                "wrong presence for {index:?}"
            );
        }
    }
}

#[test]
fn moving_the_observer_slides_the_loaded_window() {
    let mut terrain = Terrain::new(&test_config(3));
    for _ in 0..40 {
        terrain.update(&[observer_at(1, 8.0, 8.0)], &[]);
    }
    let (x, z) = center_of(1, 0);
    for _ in 0..40 {
        terrain.update(&[observer_at(1, x, z)], &[]);
    }
    // Trailing edge unloaded, leading edge created.
    assert!(!terrain.chunks.contains_key(&ChunkIndex::new(-2, 0)));
    assert!(terrain.chunks.contains_key(&ChunkIndex::new(3, 0)));
    assert_eq!(terrain.chunks.len(), 13);
    for (index, _) in terrain.chunks.iter() {
        assert!(
            ChunkIndex::new(1, 0).manhattan_distance(*index) < 3,
            "{index:?} is out of range"
        );
    }
}

#[test]
fn removing_an_observer_unloads_its_area() {
    let mut terrain = Terrain::new(&test_config(2));
    for _ in 0..20 {
        terrain.update(&[observer_at(1, 8.0, 8.0)], &[]);
    }
    assert!(!terrain.chunks.is_empty());
    terrain.update(&[], &[]);
    assert!(terrain.chunks.is_empty());
}

#[test]
fn two_observers_keep_both_areas_loaded() {
    let mut terrain = Terrain::new(&test_config(2));
    let (bx, bz) = center_of(10, 0);
    let obs = [observer_at(1, 8.0, 8.0), observer_at(2, bx, bz)];
    for _ in 0..30 {
        terrain.update(&obs, &[]);
    }
    assert!(terrain.chunks.contains_key(&ChunkIndex::new(0, 0)));
    assert!(terrain.chunks.contains_key(&ChunkIndex::new(10, 0)));
    // Each diamond of radius 2 holds five chunks and they do not overlap.
    assert_eq!(terrain.chunks.len(), 10);
}

#[test]
fn unloaded_chunks_regenerate_identically() {
    let mut terrain = Terrain::new(&test_config(2));
    for _ in 0..20 {
        terrain.update(&[observer_at(1, 8.0, 8.0)], &[]);
    }
    let snapshot = terrain.chunks[&ChunkIndex::new(0, 0)].blocks.clone();

    // Walk far enough away that the original area unloads entirely.
    let (fx, fz) = center_of(20, 0);
    for _ in 0..20 {
        terrain.update(&[observer_at(1, fx, fz)], &[]);
    }
    assert!(!terrain.chunks.contains_key(&ChunkIndex::new(0, 0)));

    for _ in 0..20 {
        terrain.update(&[observer_at(1, 8.0, 8.0)], &[]);
    }
    let regenerated = &terrain.chunks[&ChunkIndex::new(0, 0)];
    assert_eq!(regenerated.blocks, snapshot);
}

#[test]
fn manual_edits_are_not_clobbered_while_loaded() {
    let mut terrain = Terrain::new(&test_config(2));
    for _ in 0..20 {
        terrain.update(&[observer_at(1, 8.0, 8.0)], &[]);
    }
    assert!(terrain.set_block_world(8.5, 100.5, 8.5, STONE));
    for _ in 0..20 {
        terrain.update(&[observer_at(1, 8.0, 8.0)], &[]);
    }
    let block = terrain.block_at(8, 100, 8).unwrap();
    assert_eq!(block.id, STONE);
}

#[test]
fn remesh_queue_reports_streamed_and_edited_chunks() {
    let mut terrain = Terrain::new(&test_config(2));
    let obs = [observer_at(1, 8.0, 8.0)];
    for _ in 0..20 {
        terrain.update(&obs, &[]);
    }
    let drained = terrain.drain_remesh();
    assert!(drained.contains(&ChunkIndex::new(0, 0)));

    // An edit marks the chunk stale; the periodic refresh pass picks it up.
    assert!(terrain.set_block_world(3.5, 90.5, 3.5, STONE));
    let mut seen = Vec::new();
    for _ in 0..30 {
        terrain.update(&obs, &[]);
        seen.extend(terrain.drain_remesh());
    }
    assert!(seen.contains(&ChunkIndex::new(0, 0)));
}

#[test]
fn entity_caches_are_rebuilt_each_tick() {
    let mut terrain = Terrain::new(&test_config(2));
    let obs = [observer_at(1, 8.0, 8.0)];
    for _ in 0..20 {
        terrain.update(&obs, &[]);
    }
    // Straddles the boundary between chunks (0,0) and (1,0).
    let entity = EntityHandle {
        id: 9,
        bounds: Aabb::new(Vec3::new(15.2, 60.0, 4.0), Vec3::new(16.8, 61.8, 4.8)),
    };
    terrain.update(&obs, &[entity]);
    let query = Aabb::new(Vec3::new(10.0, 55.0, 0.0), Vec3::new(20.0, 70.0, 10.0));
    assert!(
        terrain.chunks[&ChunkIndex::new(0, 0)]
            .entities_for_collision
            .contains(&entity)
    );
    assert!(
        terrain.chunks[&ChunkIndex::new(1, 0)]
            .entities_for_collision
            .contains(&entity)
    );
    // Both spanned chunks cache it, the query reports it once.
    assert_eq!(terrain.entities_near(query), vec![entity]);

    // The caches hold this tick's entity set only.
    terrain.update(&obs, &[]);
    assert!(
        terrain
            .chunks
            .values()
            .all(|c| c.entities_for_collision.is_empty())
    );
    assert!(terrain.entities_near(query).is_empty());
}

#[test]
fn regenerated_root_chunks_reuse_structure_ids() {
    let mut cfg = test_config(2);
    // Every surface column places a structure; keep the graphical and
    // refresh passes out of the window under test.
    cfg.hills.threshold = -100.0;
    cfg.streaming.graphical_rate = 60;
    cfg.streaming.refresh_period = 1000;
    let mut terrain = Terrain::new(&cfg);

    let a = observer_at(1, 8.0, 8.0);
    let (bx, bz) = center_of(2, 0);
    let b = observer_at(2, bx, bz);
    for _ in 0..40 {
        terrain.update(&[a, b], &[]);
    }
    let mut before: Vec<_> = terrain
        .structures()
        .iter()
        .filter(|s| s.root_chunk == ChunkIndex::new(2, 0))
        .map(|s| s.id)
        .collect();
    before.sort_unstable();
    assert!(!before.is_empty());

    // Drop the second observer: (2,0) unloads, (1,0) stays in the first area
    // with the old structure ids recorded.
    for _ in 0..5 {
        terrain.update(&[a], &[]);
    }
    assert!(!terrain.chunks.contains_key(&ChunkIndex::new(2, 0)));
    assert!(terrain.chunks.contains_key(&ChunkIndex::new(1, 0)));
    if let Some(neighbor) = terrain.chunks.get_mut(&ChunkIndex::new(1, 0)) {
        neighbor.to_refresh = false;
    }

    for _ in 0..40 {
        terrain.update(&[a, b], &[]);
    }
    let mut after: Vec<_> = terrain
        .structures()
        .iter()
        .filter(|s| s.root_chunk == ChunkIndex::new(2, 0))
        .map(|s| s.id)
        .collect();
    after.sort_unstable();
    assert_eq!(before, after);
    // Same ids, so the neighbor skips re-stamping and stays clean.
    assert!(!terrain.chunks[&ChunkIndex::new(1, 0)].to_refresh);
}

#[test]
fn request_reload_resweeps_the_whole_area() {
    let mut terrain = Terrain::new(&test_config(2));
    let obs = [observer_at(1, 8.0, 8.0)];
    for _ in 0..30 {
        terrain.update(&obs, &[]);
    }
    terrain.drain_remesh();

    assert!(terrain.request_reload(1));
    assert!(!terrain.request_reload(99));
    let mut seen = Vec::new();
    for _ in 0..30 {
        terrain.update(&obs, &[]);
        seen.extend(terrain.drain_remesh());
    }
    // The restarted graphical pass revisits every loaded chunk.
    for dx in -1i32..=1 {
        for dz in -1i32..=1 {
            if dx == 0 && dz == 0 || dx.abs() + dz.abs() > 1 {
                continue;
            }
            assert!(seen.contains(&ChunkIndex::new(dx, dz)));
        }
    }
    assert!(seen.contains(&ChunkIndex::new(0, 0)));
}
