use std::cell::Cell;
use std::rc::Rc;

use approx::assert_abs_diff_eq;
use vizij_motion_core::{
    linear, Animation, EventKind, Item, ItemId, ParallelAnimation, Timing, TransformDelta,
};

fn anim(delta: TransformDelta, duration: f64, delay: f64) -> Animation {
    Animation::new(delta, Timing::new(duration, delay, linear))
}

/// Three back-to-back units touching every field.
fn sequence(id: u32) -> Item {
    let mut item = Item::new(ItemId(id));
    item.push(anim(TransformDelta::translate([30.0, -10.0, 0.0]), 100.0, 0.0))
        .push(anim(
            TransformDelta {
                rotate: Some([0.0, 0.0, 45.0]),
                scale: Some([0.5, 0.5, 0.0]),
                ..Default::default()
            },
            200.0,
            0.0,
        ))
        .push(anim(TransformDelta::opacity(0.2), 150.0, 0.0));
    item
}

#[test]
fn seek_matches_free_running_playback() {
    let mut free = sequence(1);
    let mut scrub = sequence(2);
    free.run().unwrap();
    for t in 0..=500 {
        let tick = t as f64;
        free.update(tick).unwrap();
        scrub.seek(tick).unwrap();
        assert_eq!(free.state(), scrub.state(), "diverged at {tick}");
    }
    assert!(!free.is_running());
}

#[test]
fn seek_is_repeatable_in_any_order() {
    let mut item = sequence(1);
    item.seek(250.0).unwrap();
    let at_250 = *item.state();
    item.seek(420.0).unwrap();
    item.seek(10.0).unwrap();
    item.seek(250.0).unwrap();
    assert_eq!(*item.state(), at_250);
    assert_eq!(at_250.translate, [30.0, -10.0, 0.0]);
    assert_eq!(at_250.rotate, [0.0, 0.0, 33.75]);
}

#[test]
fn queued_units_play_back_to_back() {
    // x slides over a second, then y after a 100ms gap
    let build = || {
        let mut item = Item::new(ItemId(0));
        item.push(anim(TransformDelta::translate([100.0, 0.0, 0.0]), 1000.0, 0.0))
            .push(anim(TransformDelta::translate([0.0, 50.0, 0.0]), 500.0, 100.0));
        item
    };

    let mut free = build();
    free.run().unwrap();
    for (tick, expected) in [
        (0.0, [0.0, 0.0, 0.0]),
        (1000.0, [100.0, 0.0, 0.0]),
        (1100.0, [100.0, 0.0, 0.0]),
        (1350.0, [100.0, 25.0, 0.0]),
        (1600.0, [100.0, 50.0, 0.0]),
    ] {
        free.update(tick).unwrap();
        assert_eq!(free.state().translate, expected, "free run at {tick}");
    }
    assert!(!free.is_running());

    let mut scrub = build();
    for (tick, expected) in [
        (1600.0, [100.0, 50.0, 0.0]),
        (1000.0, [100.0, 0.0, 0.0]),
        (1050.0, [100.0, 0.0, 0.0]),
        (500.0, [50.0, 0.0, 0.0]),
    ] {
        scrub.seek(tick).unwrap();
        assert_eq!(scrub.state().translate, expected, "seek to {tick}");
    }
}

#[test]
fn vector_fields_add_opacity_is_absolute() {
    let mut item = Item::new(ItemId(0));
    item.set_translate([10.0, 0.0, 0.0])
        .unwrap()
        .set_opacity(0.4)
        .unwrap();
    item.push(anim(
        TransformDelta {
            translate: Some([10.0, 0.0, 0.0]),
            opacity: Some(0.8),
            ..Default::default()
        },
        100.0,
        0.0,
    ));
    item.run().unwrap();
    item.update(0.0).unwrap();
    item.update(50.0).unwrap();
    assert_eq!(item.state().translate, [15.0, 0.0, 0.0]);
    assert_abs_diff_eq!(item.opacity(), 0.6, epsilon = 1e-12);
    item.update(100.0).unwrap();
    assert_eq!(item.state().translate, [20.0, 0.0, 0.0]);
    assert_eq!(item.opacity(), 0.8);
}

#[test]
fn infinite_item_loops_back_to_the_same_pose() {
    let starts = Rc::new(Cell::new(0));
    let mut spin = anim(TransformDelta::rotate([0.0, 0.0, 360.0]), 500.0, 0.0);
    let counter = starts.clone();
    spin.on(EventKind::Start, move |_| counter.set(counter.get() + 1));

    let mut item = Item::new(ItemId(0));
    item.set_infinite(true).push(spin);
    item.run().unwrap();

    let mut at_500 = None;
    for t in (0..=2000).step_by(10) {
        let tick = t as f64;
        item.update(tick).unwrap();
        if t == 500 {
            at_500 = Some(item.matrix());
        }
    }
    assert!(item.is_running());
    assert_eq!(starts.get(), 5);
    assert_eq!(item.state().rotate[2] % 360.0, 0.0);

    let at_500 = at_500.unwrap();
    let at_2000 = item.matrix();
    for i in 0..16 {
        assert_abs_diff_eq!(at_2000.0[i], at_500.0[i], epsilon = 1e-9);
    }
}

#[test]
fn infinite_seek_cycles_the_queue() {
    let mut item = Item::new(ItemId(0));
    item.set_infinite(true)
        .push(anim(TransformDelta::translate([10.0, 0.0, 0.0]), 100.0, 0.0))
        .push(anim(TransformDelta::translate([0.0, 10.0, 0.0]), 100.0, 0.0));
    item.seek(450.0).unwrap();
    // two full passes, then half of the first unit
    assert_eq!(item.state().translate, [25.0, 20.0, 0.0]);
}

#[test]
fn infinite_seek_matches_free_running_playback() {
    let build = |id| {
        let mut item = Item::new(ItemId(id));
        item.set_infinite(true)
            .push(anim(TransformDelta::translate([10.0, 0.0, 0.0]), 100.0, 0.0))
            .push(anim(TransformDelta::translate([0.0, 5.0, 0.0]), 50.0, 25.0))
            .push(anim(TransformDelta::opacity(0.25), 100.0, 0.0));
        item
    };
    let mut free = build(1);
    let mut scrub = build(2);
    assert_eq!(free.total_duration(), 275.0);
    free.run().unwrap();
    // crosses several pass boundaries, so later seeks skip whole passes
    for t in 0..=1200 {
        let tick = t as f64;
        free.update(tick).unwrap();
        scrub.seek(tick).unwrap();
        assert_eq!(free.state(), scrub.state(), "diverged at {tick}");
    }
}

#[test]
fn parallel_group_inside_a_queue() {
    let group = ParallelAnimation::new(vec![
        anim(TransformDelta::translate([100.0, 0.0, 0.0]), 100.0, 0.0),
        anim(TransformDelta::scale([1.0, 1.0, 0.0]), 200.0, 0.0),
    ])
    .unwrap();
    let mut item = Item::new(ItemId(0));
    item.push(group)
        .push(anim(TransformDelta::opacity(0.0), 100.0, 0.0));
    assert_eq!(item.total_duration(), 300.0);

    item.seek(150.0).unwrap();
    assert_eq!(item.state().translate, [100.0, 0.0, 0.0]);
    assert_eq!(item.state().scale, [1.75, 1.75, 1.0]);
    assert_eq!(item.opacity(), 1.0);

    item.seek(250.0).unwrap();
    assert_eq!(item.state().scale, [2.0, 2.0, 1.0]);
    assert_eq!(item.opacity(), 0.5);
}

#[test]
fn stop_discards_remaining_units() {
    let mut item = sequence(0);
    let ended = Rc::new(Cell::new(None));
    let seen = ended.clone();
    item.on(EventKind::End, move |e| seen.set(Some(*e)));
    item.run().unwrap();
    item.update(0.0).unwrap();
    item.update(50.0).unwrap();
    item.stop();
    assert_eq!(item.state().translate, [15.0, -5.0, 0.0]);
    assert_eq!(item.queue_len(), 0);
    assert_eq!(
        ended.get(),
        Some(vizij_motion_core::MotionEvent::Ended { aborted: true })
    );
}
