use fresh_start_site::carousel::{
    CarouselController, CarouselKind, ControllerOptions, HeadlessSurface, Item, ItemContent,
    ItemId, Measurement, Timeline,
};
use fresh_start_site::events::{CarouselCommand, CarouselMoved};
use fresh_start_site::tasks::carousel::{self, HeadlessCarousel};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn items(n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| Item {
            id: ItemId(i),
            content: ItemContent::Image {
                src: format!("student {}.jpg", i + 1),
                alt: String::new(),
            },
        })
        .collect()
}

fn controller(options: ControllerOptions, n: usize) -> HeadlessCarousel {
    let surface = HeadlessSurface::new(
        "test",
        Measurement {
            item_width: 1200.0,
            gap: None,
            container_width: 1200.0,
        },
    );
    let mut c = CarouselController::new(options, Some(surface), Timeline::new());
    c.initialize(items(n));
    c
}

#[tokio::test(start_paused = true)]
async fn auto_advance_publishes_moves_and_snap() {
    let (_cmd_tx, cmd_rx) = mpsc::channel::<CarouselCommand>(8);
    let (moved_tx, mut moved_rx) = mpsc::channel::<CarouselMoved>(8);
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(carousel::run(
        CarouselKind::Students,
        controller(ControllerOptions::students(), 3),
        cmd_rx,
        moved_tx,
        cancel.clone(),
    ));

    let mut cursors = Vec::new();
    while cursors.len() < 4 {
        let ev = moved_rx.recv().await.expect("carousel task ended early");
        assert_eq!(ev.carousel, CarouselKind::Students);
        assert_eq!(ev.source_index, ev.cursor % 3);
        cursors.push(ev.cursor);
    }
    // three ticks forward, then the settle snaps 6 back into the middle copy
    assert_eq!(cursors, vec![4, 5, 6, 3]);

    cancel.cancel();
    let c = handle.await.unwrap().unwrap();
    assert_eq!(c.cursor(), Some(3));
    assert!(!c.is_locked());
}

#[tokio::test(start_paused = true)]
async fn commands_while_locked_are_dropped() {
    let (cmd_tx, cmd_rx) = mpsc::channel::<CarouselCommand>(8);
    let (moved_tx, mut moved_rx) = mpsc::channel::<CarouselMoved>(8);
    let handle = tokio::spawn(carousel::run(
        CarouselKind::Testimonials,
        controller(ControllerOptions::testimonials(), 3),
        cmd_rx,
        moved_tx,
        CancellationToken::new(),
    ));

    cmd_tx.send(CarouselCommand::Next).await.unwrap();
    cmd_tx.send(CarouselCommand::Prev).await.unwrap();
    drop(cmd_tx);

    // exits by itself once commands close and the settle timer has fired
    let c = handle.await.unwrap().unwrap();
    assert_eq!(c.cursor(), Some(4));

    let ev = moved_rx.recv().await.unwrap();
    assert_eq!(
        ev,
        CarouselMoved {
            carousel: CarouselKind::Testimonials,
            cursor: 4,
            source_index: 1,
        }
    );
    assert!(moved_rx.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn resize_command_relayouts_paged_carousel() {
    let (cmd_tx, cmd_rx) = mpsc::channel::<CarouselCommand>(8);
    let (moved_tx, _moved_rx) = mpsc::channel::<CarouselMoved>(8);
    let handle = tokio::spawn(carousel::run(
        CarouselKind::Testimonials,
        controller(ControllerOptions::testimonials(), 2),
        cmd_rx,
        moved_tx,
        CancellationToken::new(),
    ));

    cmd_tx
        .send(CarouselCommand::Resize { width: 800.0 })
        .await
        .unwrap();
    drop(cmd_tx);

    let c = handle.await.unwrap().unwrap();
    assert_eq!(c.cursor(), Some(2));
    let s = c.surface().unwrap();
    assert_eq!(s.transform(), Some(-1600.0));
    assert_eq!(s.slot_width(0), Some(800.0));
}

#[tokio::test(start_paused = true)]
async fn resize_command_rescales_centered_photos() {
    let (cmd_tx, cmd_rx) = mpsc::channel::<CarouselCommand>(8);
    let (moved_tx, _moved_rx) = mpsc::channel::<CarouselMoved>(8);
    let options = ControllerOptions {
        auto_advance: None,
        ..ControllerOptions::students()
    };
    let handle = tokio::spawn(carousel::run(
        CarouselKind::Students,
        controller(options, 2),
        cmd_rx,
        moved_tx,
        CancellationToken::new(),
    ));

    cmd_tx
        .send(CarouselCommand::Resize { width: 600.0 })
        .await
        .unwrap();
    drop(cmd_tx);

    let c = handle.await.unwrap().unwrap();
    assert_eq!(c.cursor(), Some(2));
    // 2 * (600 + 32) + 300, the gap falling back to 32 px
    assert_eq!(c.surface().unwrap().transform(), Some(-1564.0));
}
