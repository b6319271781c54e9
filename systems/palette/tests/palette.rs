use marble_lab_core::{Brush, Command, EditMode, Event, TileType, WallMask};
use marble_lab_system_palette::{Palette, PaletteOption};
use marble_lab_world::{apply, query, EditSession};

#[test]
fn floor_mode_offers_floor_and_hole() {
    assert_eq!(
        Palette::options(EditMode::Floor),
        vec![
            PaletteOption::Tile(TileType::Floor),
            PaletteOption::Tile(TileType::Hole)
        ]
    );
}

#[test]
fn object_mode_offers_marble_and_goal() {
    assert_eq!(
        Palette::options(EditMode::Objects),
        vec![
            PaletteOption::Tile(TileType::Marble),
            PaletteOption::Tile(TileType::Goal)
        ]
    );
}

#[test]
fn wall_mode_labels_follow_display_order() {
    let labels: Vec<_> = Palette::options(EditMode::Walls)
        .into_iter()
        .map(PaletteOption::label)
        .collect();
    assert_eq!(labels, ["Up", "Right", "Down", "Left", "All", "None"]);
}

#[test]
fn combined_wall_masks_are_labelled_by_their_sides() {
    let corner = PaletteOption::Walls(WallMask::UP.with(WallMask::LEFT));
    assert_eq!(corner.label(), "up+left");
    assert_eq!(PaletteOption::Walls(WallMask::NONE).label(), "None");
}

#[test]
fn erase_mode_offers_nothing() {
    assert!(Palette::options(EditMode::Erase).is_empty());
}

#[test]
fn pick_valid_for_mode_emits_selection() {
    let mut palette = Palette::new();
    let mut commands = Vec::new();

    palette.handle(
        &[Event::EditModeChanged {
            mode: EditMode::Objects,
        }],
        Some(PaletteOption::Tile(TileType::Goal)),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::SelectTileType {
            tile_type: TileType::Goal
        }]
    );
    assert_eq!(palette.mode(), EditMode::Objects);
}

#[test]
fn pick_not_offered_by_mode_is_dropped() {
    let mut palette = Palette::new();
    let mut commands = Vec::new();

    palette.handle(&[], Some(PaletteOption::Tile(TileType::Marble)), &mut commands);
    palette.handle(&[], Some(PaletteOption::Walls(WallMask::UP)), &mut commands);

    assert!(commands.is_empty(), "floor mode offers neither marbles nor walls");
}

#[test]
fn picks_dropped_while_transfer_in_flight() {
    let mut palette = Palette::new();
    let mut commands = Vec::new();

    palette.handle(
        &[Event::SaveStarted { tiles: Vec::new() }],
        Some(PaletteOption::Tile(TileType::Hole)),
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn selection_marks_option_in_session_brush() {
    let mut session = EditSession::default();
    let mut palette = Palette::new();
    let mut events = Vec::new();
    let mut commands = Vec::new();

    apply(
        &mut session,
        Command::SelectEditMode {
            mode: EditMode::Walls,
        },
        &mut events,
    );
    palette.handle(&events, Some(PaletteOption::Walls(WallMask::ALL)), &mut commands);
    for command in commands {
        apply(&mut session, command, &mut events);
    }

    let brush = query::brush(&session);
    assert_eq!(brush, Brush::new(TileType::Floor, WallMask::ALL));
    assert!(PaletteOption::Walls(WallMask::ALL).is_selected(brush));
    assert!(!PaletteOption::Walls(WallMask::NONE).is_selected(brush));
}
