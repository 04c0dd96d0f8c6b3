use anyhow::{Context, Result};
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::carousel::{
    CarouselController, CarouselKind, Direction, HeadlessSurface, LayoutMode, Measurement,
    RenderSurface, Timeline,
};
use crate::events::{CarouselCommand, CarouselMoved};

pub type HeadlessCarousel = CarouselController<HeadlessSurface, Timeline>;

/// Drives an initialized carousel: host commands arrive on `commands`,
/// timeline deadlines are slept on in tokio time, and every cursor change is
/// reported on `moved`.
///
/// Returns the controller once cancelled or once `commands` closes and no
/// timers remain, so callers can inspect its final state.
pub async fn run(
    kind: CarouselKind,
    mut controller: HeadlessCarousel,
    mut commands: Receiver<CarouselCommand>,
    moved: Sender<CarouselMoved>,
    cancel: CancellationToken,
) -> Result<HeadlessCarousel> {
    let origin = Instant::now();
    let base = controller.surface().map(|surface| surface.measure());
    let mut last_cursor = controller.cursor();
    let mut commands_open = true;
    info!(carousel = %kind, active = controller.is_active(), "carousel task started");

    loop {
        let next_deadline = controller.timers().next_deadline();
        if !commands_open && next_deadline.is_none() {
            break;
        }

        select! {
            _ = cancel.cancelled() => break,

            maybe_cmd = commands.recv(), if commands_open => match maybe_cmd {
                Some(cmd) => {
                    // keep the virtual clock in step before acting
                    controller.run_until(origin.elapsed());
                    apply(&mut controller, base, cmd);
                }
                None => {
                    debug!(carousel = %kind, "command channel closed");
                    commands_open = false;
                }
            },

            _ = wait_for(origin, next_deadline) => {
                controller.run_until(origin.elapsed());
            }
        }

        let cursor = controller.cursor();
        if cursor != last_cursor {
            last_cursor = cursor;
            if let (Some(cursor), Some(source_index)) =
                (cursor, controller.current_source_index())
            {
                moved
                    .send(CarouselMoved {
                        carousel: kind,
                        cursor,
                        source_index,
                    })
                    .await
                    .context("failed to publish carousel move")?;
            }
        }
    }

    controller.stop();
    info!(carousel = %kind, "carousel task stopped");
    Ok(controller)
}

fn apply(controller: &mut HeadlessCarousel, base: Option<Measurement>, cmd: CarouselCommand) {
    match cmd {
        CarouselCommand::Next => {
            controller.advance(Direction::Forward);
        }
        CarouselCommand::Prev => {
            controller.advance(Direction::Backward);
        }
        CarouselCommand::Resize { width } => {
            let layout = controller.options().layout;
            if let (Some(surface), Some(base)) = (controller.surface_mut(), base) {
                surface.set_measurement(resized(base, layout, width));
            }
            controller.resize();
        }
    }
}

/// Geometry for a new container width. Centered photos keep the proportion
/// of the container they had at startup; pages always span the container.
fn resized(base: Measurement, layout: LayoutMode, width: f32) -> Measurement {
    match layout {
        LayoutMode::Centered if base.container_width > 0.0 => Measurement {
            item_width: base.item_width * width / base.container_width,
            container_width: width,
            ..base
        },
        LayoutMode::Centered => Measurement {
            container_width: width,
            ..base
        },
        LayoutMode::Paged => Measurement {
            item_width: width,
            container_width: width,
            ..base
        },
    }
}

async fn wait_for(origin: Instant, deadline: Option<std::time::Duration>) {
    match deadline {
        Some(at) => sleep_until(origin + at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_photos_scale_with_container() {
        let base = Measurement {
            item_width: 300.0,
            gap: Some(20.0),
            container_width: 1200.0,
        };
        let m = resized(base, LayoutMode::Centered, 600.0);
        assert_eq!(m.item_width, 150.0);
        assert_eq!(m.container_width, 600.0);
        assert_eq!(m.gap, Some(20.0));
        // back to the original width restores the original photo size
        assert_eq!(resized(base, LayoutMode::Centered, 1200.0), base);

        let zero = Measurement {
            container_width: 0.0,
            ..base
        };
        assert_eq!(resized(zero, LayoutMode::Centered, 800.0).item_width, 300.0);
    }
}
