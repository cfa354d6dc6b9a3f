//! bevy glue – chunk artifacts become sprites, the draw pass drives their
//! visibility, animated tiles get pooled sprites
//!
//! World space in the core is y‑down (row 0 on top); bevy is y‑up, so every
//! position crossing this module has its y negated.

use bevy::image::ImageSampler;
use bevy::math::Affine2;
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::sprite::Anchor;
use bevy::window::PrimaryWindow;

use crate::render::{CameraView, DrawList, RenderDiagnostics};
use crate::surface::RgbaSurface;
use crate::world::{Layer, TileWorld};

const OUTLINE_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);

/* ===========================================================
   components & resources
   =========================================================== */
#[derive(Component)]
pub struct ChunkSprite {
    pub layer: Layer,
    pub index: usize,
}

#[derive(Component)]
pub struct AnimatedTileSprite;

struct ChunkSlot {
    entity: Entity,
    image: Handle<Image>,
    revision: u32,
}

#[derive(Resource, Default)]
pub struct TilemapSprites {
    atlas: Option<Handle<Image>>,
    layers: [Vec<ChunkSlot>; 2],
    /// animated‑tile sprite pool, reused front to back every frame
    animated: Vec<Entity>,
}

/* ===========================================================
   plugin
   =========================================================== */
pub struct TilemapPlugin;

impl Plugin for TilemapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RenderDiagnostics>()
            .init_resource::<TilemapSprites>()
            .add_systems(
                PostUpdate,
                (pre_render_system, sync_chunk_images_system, draw_pass_system)
                    .chain()
                    .run_if(resource_exists::<TileWorld>),
            );
    }
}

/* ===========================================================
   helpers
   =========================================================== */
#[inline]
fn to_bevy(p: Vec2, z: f32) -> Vec3 {
    Vec3::new(p.x, -p.y, z)
}

#[inline]
fn layer_z(layer: Layer) -> f32 {
    match layer {
        Layer::Base => 0.0,
        Layer::Top => 1.0,
    }
}

pub fn image_from_surface(surface: &RgbaSurface) -> Image {
    let mut image = Image::new(
        Extent3d {
            width: surface.width(),
            height: surface.height(),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        surface.to_bytes(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = ImageSampler::nearest();
    image
}

/// camera rectangle in core (y‑down) world pixels
pub fn camera_view(cam_tf: &Transform, scale: f32, screen: Vec2) -> CameraView {
    let centre = Vec2::new(cam_tf.translation.x, -cam_tf.translation.y);
    let view = Affine2::from_translation(screen * 0.5)
        * Affine2::from_scale(Vec2::splat(1.0 / scale.max(f32::EPSILON)))
        * Affine2::from_translation(-centre);
    CameraView::from_view_transform(view, screen)
}

/* ===========================================================
   pre_render_system – flush dirty chunks once per frame
   =========================================================== */
pub fn pre_render_system(mut world: ResMut<TileWorld>) {
    world.pre_render();
}

/* ===========================================================
   sync_chunk_images_system – one image + sprite per chunk
   =========================================================== */
pub fn sync_chunk_images_system(
    mut commands: Commands,
    world: Res<TileWorld>,
    mut sprites: ResMut<TilemapSprites>,
    mut images: ResMut<Assets<Image>>,
) {
    let sprites = &mut *sprites;
    if sprites.atlas.is_none() {
        let atlas = world.base_layer.atlas().image();
        sprites.atlas = Some(images.add(image_from_surface(atlas)));
    }

    for (li, &layer) in Layer::ALL.iter().enumerate() {
        let map = world.layer(layer);
        let slots = &mut sprites.layers[li];

        for (index, chunk) in map.chunks().iter().enumerate() {
            /* first sight -> spawn hidden, the draw pass decides */
            if index >= slots.len() {
                let image = images.add(image_from_surface(chunk.surface()));
                let origin = map.chunk_world_rect(index).min;
                let entity = commands
                    .spawn((
                        Sprite {
                            image: image.clone(),
                            anchor: Anchor::TopLeft,
                            ..default()
                        },
                        Transform::from_translation(to_bevy(origin, layer_z(layer))),
                        Visibility::Hidden,
                        ChunkSprite { layer, index },
                    ))
                    .id();
                slots.push(ChunkSlot {
                    entity,
                    image,
                    revision: chunk.revision(),
                });
                continue;
            }

            /* re‑upload only recomposed artifacts */
            let slot = &mut slots[index];
            if slot.revision != chunk.revision() {
                if let Some(img) = images.get_mut(&slot.image) {
                    chunk.surface().write_bytes(&mut img.data);
                }
                slot.revision = chunk.revision();
            }
        }
    }
}

/* ===========================================================
   draw_pass_system – cull, animate, outline
   =========================================================== */
#[allow(clippy::too_many_arguments)]
pub fn draw_pass_system(
    mut commands: Commands,
    world: Res<TileWorld>,
    time: Res<Time>,
    mut diag: ResMut<RenderDiagnostics>,
    mut sprites: ResMut<TilemapSprites>,
    cam_q: Query<(&Transform, &OrthographicProjection), With<Camera2d>>,
    window_q: Query<&Window, With<PrimaryWindow>>,
    mut sprite_q: Query<(&mut Visibility, &mut Transform, &mut Sprite), Without<Camera2d>>,
    mut gizmos: Gizmos,
    mut list: Local<DrawList>,
) {
    let Ok((cam_tf, proj)) = cam_q.get_single() else { return };
    let Ok(window) = window_q.get_single() else { return };

    let view = camera_view(cam_tf, proj.scale, Vec2::new(window.width(), window.height()));
    let elapsed = time.elapsed_secs();
    let sprites = &mut *sprites;
    let Some(atlas) = sprites.atlas.clone() else { return };

    diag.begin_frame();
    let mut used = 0;

    for (li, &layer) in Layer::ALL.iter().enumerate() {
        list.clear();
        world.layer(layer).render(&view, elapsed, &mut diag, &mut *list);

        /* chunk visibility ------------------------------------------------ */
        let slots = &sprites.layers[li];
        let mut visible = vec![false; slots.len()];
        for c in &list.chunks {
            if let Some(v) = visible.get_mut(c.index) {
                *v = true;
            }
        }
        for (slot, &on) in slots.iter().zip(&visible) {
            if let Ok((mut vis, _, _)) = sprite_q.get_mut(slot.entity) {
                let want = if on { Visibility::Inherited } else { Visibility::Hidden };
                vis.set_if_neq(want);
            }
        }

        /* animated tiles from the pool ------------------------------------ */
        let z = layer_z(layer) + 0.5;
        for tile in &list.tiles {
            let translation = to_bevy(tile.origin, z);
            let rect = Some(tile.source.as_rect());

            match sprites.animated.get(used) {
                Some(&e) => {
                    if let Ok((mut vis, mut tf, mut sprite)) = sprite_q.get_mut(e) {
                        vis.set_if_neq(Visibility::Inherited);
                        tf.translation = translation;
                        sprite.rect = rect;
                    }
                }
                None => {
                    let e = commands
                        .spawn((
                            Sprite {
                                image: atlas.clone(),
                                rect,
                                anchor: Anchor::TopLeft,
                                ..default()
                            },
                            Transform::from_translation(translation),
                            Visibility::Inherited,
                            AnimatedTileSprite,
                        ))
                        .id();
                    sprites.animated.push(e);
                }
            }
            used += 1;
        }

        /* debug outlines -------------------------------------------------- */
        for r in &list.outlines {
            let corners = [
                r.min,
                Vec2::new(r.max.x, r.min.y),
                r.max,
                Vec2::new(r.min.x, r.max.y),
                r.min,
            ];
            gizmos.linestrip_2d(corners.map(|c| Vec2::new(c.x, -c.y)), OUTLINE_COLOR);
        }
    }

    /* park the unused part of the pool ---------------------------------- */
    for &e in &sprites.animated[used.min(sprites.animated.len())..] {
        if let Ok((mut vis, _, _)) = sprite_q.get_mut(e) {
            vis.set_if_neq(Visibility::Hidden);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_view_flips_y_and_scales() {
        let tf = Transform::from_xyz(100.0, -50.0, 0.0);
        let view = camera_view(&tf, 2.0, Vec2::new(400.0, 200.0));
        let r = view.rect();
        assert!((r.min - Vec2::new(-300.0, -150.0)).length() < 1e-3);
        assert!((r.max - Vec2::new(500.0, 250.0)).length() < 1e-3);
    }

    #[test]
    fn surface_becomes_rgba8_image() {
        let surface = RgbaSurface::new(4, 2);
        let image = image_from_surface(&surface);
        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 2);
        assert_eq!(image.data.len(), 4 * 2 * 4);
    }
}
