//! Keep the camera projection in step with the window size

use bevy::prelude::*;
use bevy::window::WindowResized;
use hellocube_core::Viewport;

use crate::scene::MainCamera;

pub struct ResizePlugin;

impl Plugin for ResizePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, handle_resize);
    }
}

fn handle_resize(
    mut resized: MessageReader<WindowResized>,
    mut cameras: Query<&mut Projection, With<MainCamera>>,
) {
    // Only the latest size matters
    let Some(event) = resized.read().last() else {
        return;
    };

    let viewport = Viewport::new(event.width, event.height);
    for mut projection in &mut cameras {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.aspect_ratio = viewport.aspect_ratio();
        }
    }

    tracing::debug!(
        width = viewport.width,
        height = viewport.height,
        "Viewport resized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_sets_aspect_ratio() {
        let mut app = App::new();
        app.add_message::<WindowResized>().add_plugins(ResizePlugin);
        let camera = app
            .world_mut()
            .spawn((
                Projection::Perspective(PerspectiveProjection::default()),
                MainCamera,
            ))
            .id();

        for (width, height) in [(800.0, 400.0), (300.0, 600.0)] {
            app.world_mut().write_message(WindowResized {
                window: Entity::PLACEHOLDER,
                width,
                height,
            });
            app.update();

            let Some(Projection::Perspective(perspective)) = app.world().get::<Projection>(camera)
            else {
                panic!("camera lost its perspective projection");
            };
            assert_eq!(perspective.aspect_ratio, width / height);
        }
    }

    #[test]
    fn test_zero_height_stays_finite() {
        let mut app = App::new();
        app.add_message::<WindowResized>().add_plugins(ResizePlugin);
        let camera = app
            .world_mut()
            .spawn((
                Projection::Perspective(PerspectiveProjection::default()),
                MainCamera,
            ))
            .id();

        app.world_mut().write_message(WindowResized {
            window: Entity::PLACEHOLDER,
            width: 640.0,
            height: 0.0,
        });
        app.update();

        let Some(Projection::Perspective(perspective)) = app.world().get::<Projection>(camera) else {
            panic!("camera lost its perspective projection");
        };
        assert!(perspective.aspect_ratio.is_finite());
    }
}
