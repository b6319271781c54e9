use marble_lab_core::{CellCoord, Command, EditMode, Event, Tile, TileType, WallMask};
use marble_lab_system_stroke::{PointerPhase, StrokeInput, StrokeSystem};
use marble_lab_world::{apply, query, EditSession};

fn input(phase: PointerPhase, row: u32, column: u32) -> StrokeInput {
    StrokeInput::new(phase, Some(CellCoord::new(row, column)))
}

#[test]
fn tap_emits_one_cell_stroke() {
    let mut system = StrokeSystem::new();
    let mut commands = Vec::new();

    system.handle(&[], input(PointerPhase::Press, 1, 2), &mut commands);
    system.handle(&[], StrokeInput::new(PointerPhase::Release, None), &mut commands);

    assert_eq!(
        commands,
        vec![
            Command::BeginStroke,
            Command::PaintCell {
                cell: CellCoord::new(1, 2)
            },
            Command::EndStroke,
        ],
        "a tap should paint exactly the pressed cell",
    );
    assert!(!system.is_pressed());
}

#[test]
fn press_outside_grid_starts_stroke_without_painting() {
    let mut system = StrokeSystem::new();
    let mut commands = Vec::new();

    system.handle(&[], StrokeInput::new(PointerPhase::Press, None), &mut commands);

    assert_eq!(commands, vec![Command::BeginStroke]);
    assert!(system.is_pressed());
}

#[test]
fn drag_without_press_is_ignored() {
    let mut system = StrokeSystem::new();
    let mut commands = Vec::new();

    system.handle(&[], input(PointerPhase::Drag, 0, 0), &mut commands);
    system.handle(&[], StrokeInput::new(PointerPhase::Release, None), &mut commands);

    assert!(commands.is_empty(), "stray drag events must not paint");
}

#[test]
fn cancel_emits_cancel_stroke() {
    let mut system = StrokeSystem::new();
    let mut commands = Vec::new();

    system.handle(&[], input(PointerPhase::Press, 0, 0), &mut commands);
    commands.clear();
    system.handle(&[], StrokeInput::new(PointerPhase::Cancel, None), &mut commands);

    assert_eq!(commands, vec![Command::CancelStroke]);
}

#[test]
fn paints_suppressed_while_transfer_in_flight() {
    let mut system = StrokeSystem::new();
    let mut commands = Vec::new();

    system.handle(&[Event::LoadStarted], input(PointerPhase::Press, 3, 3), &mut commands);
    system.handle(&[], input(PointerPhase::Drag, 3, 4), &mut commands);

    assert_eq!(commands, vec![Command::BeginStroke]);

    commands.clear();
    system.handle(
        &[Event::LoadFailed {
            reason: "gone".to_owned(),
        }],
        input(PointerPhase::Drag, 3, 5),
        &mut commands,
    );
    assert_eq!(
        commands,
        vec![Command::PaintCell {
            cell: CellCoord::new(3, 5)
        }],
        "painting resumes once the transfer finishes",
    );
}

#[test]
fn zig_zag_drag_applies_each_cell_once() {
    let mut session = EditSession::default();
    let mut system = StrokeSystem::new();
    let mut events = Vec::new();

    apply(
        &mut session,
        Command::SelectEditMode {
            mode: EditMode::Walls,
        },
        &mut events,
    );
    apply(
        &mut session,
        Command::SelectWallMask {
            mask: WallMask::UP,
        },
        &mut events,
    );

    let path = [
        input(PointerPhase::Press, 0, 0),
        input(PointerPhase::Drag, 0, 1),
        input(PointerPhase::Drag, 0, 0),
        input(PointerPhase::Drag, 0, 1),
        StrokeInput::new(PointerPhase::Release, None),
    ];

    let mut painted = 0;
    for step in path {
        let mut commands = Vec::new();
        system.handle(&events, step, &mut commands);
        events.clear();
        for command in commands {
            apply(&mut session, command, &mut events);
        }
        painted += events
            .iter()
            .filter(|event| matches!(event, Event::CellPainted { .. }))
            .count();
    }

    assert_eq!(painted, 2, "each cell is painted once per stroke");
    assert_eq!(
        query::tile_at(&session, CellCoord::new(0, 1)),
        Ok(Tile::new(TileType::Floor, WallMask::UP))
    );
}
