//! Integrationstests fuer Copy/Cut/Paste mit Re-Basing:
//! Delta-Berechnung ueber den Tile-Anker, Umverankerung indirekter
//! Frames, Klemmen am Kartenrand und Ueberspringen von Tiles ausserhalb.

use approx::assert_abs_diff_eq;
use dt_map_editor::core::schema::{FRAMES, TILES, VEHICLES, WATCHTOWERS};
use dt_map_editor::{AppState, LayerCommand, MapController, TileSelection};
use glam::DVec2;

const TILE: f64 = 0.585;

fn state_with_map(size: (i64, i64)) -> (MapController, AppState) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut controller = MapController::new();
    let mut state = AppState::new();
    controller
        .new_map(&mut state, "map_1", size, DVec2::splat(TILE))
        .expect("Karte anlegbar");
    (controller, state)
}

/// Selektionsrechteck, das genau die Tile (i, j) trifft.
fn select_single_tile(state: &mut AppState, index: (i64, i64)) {
    let min = DVec2::new(
        index.0 as f64 * TILE + 0.005,
        index.1 as f64 * TILE + 0.005,
    );
    let selection = TileSelection::from_corners(min, min + DVec2::splat(0.005));
    state.selection.select_tiles(selection);
}

fn tile_type(state: &AppState, name: &str) -> Option<String> {
    state
        .layer(TILES)
        .and_then(|layer| layer.get(name))
        .and_then(|tile| tile.type_name())
        .map(str::to_string)
}

#[test]
fn paste_verschiebt_objekt_um_das_anker_delta() {
    let (mut controller, mut state) = state_with_map((10, 10));

    let vehicle = controller.add_object(&mut state, VEHICLES, None).unwrap();
    controller
        .move_object(&mut state, &vehicle, DVec2::new(2.0, 3.0))
        .unwrap();
    state.selection.select_object(vehicle.clone());
    // Quell-Anker: Tile (3, 5) — links-unterste Tile der Kopie
    select_single_tile(&mut state, (3, 5));
    controller.copy(&mut state);

    // Ziel-Anker: zwei Tiles weiter rechts
    select_single_tile(&mut state, (5, 5));
    controller.paste(&mut state).expect("Paste moeglich");

    let pasted = "map_1/vehicle2";
    let pose = state
        .layer(FRAMES)
        .and_then(|layer| layer.get(pasted))
        .and_then(|frame| frame.pose())
        .expect("eingefuegtes Vehicle erwartet");
    assert_abs_diff_eq!(pose.x, 2.0 + 2.0 * TILE, epsilon = 1e-9);
    assert_abs_diff_eq!(pose.y, 3.0, epsilon = 1e-9);
}

#[test]
fn paste_uebertraegt_tile_typ_und_rotation() {
    let (mut controller, mut state) = state_with_map((5, 5));

    select_single_tile(&mut state, (1, 1));
    controller.paint_selected_tiles(&mut state, "curve").unwrap();
    controller
        .dispatch(
            &mut state,
            LayerCommand::RotateObject {
                frame_name: "map_1/tile_1_1".into(),
                new_yaw: 90.0,
            },
        )
        .unwrap();
    controller.copy(&mut state);

    select_single_tile(&mut state, (3, 2));
    controller.paste(&mut state).unwrap();

    assert_eq!(tile_type(&state, "map_1/tile_3_2"), Some("curve".into()));
    let yaw = state
        .layer(FRAMES)
        .and_then(|layer| layer.get("map_1/tile_3_2"))
        .and_then(|frame| frame.pose())
        .map(|pose| pose.yaw)
        .unwrap();
    assert_abs_diff_eq!(yaw, 90.0, epsilon = 1e-12);
    // Die Quelle bleibt unveraendert
    assert_eq!(tile_type(&state, "map_1/tile_1_1"), Some("curve".into()));
}

#[test]
fn paste_ueberspringt_tiles_ausserhalb_der_karte() {
    let (mut controller, mut state) = state_with_map((5, 5));

    select_single_tile(&mut state, (1, 1));
    controller.paint_selected_tiles(&mut state, "grass").unwrap();
    controller.copy(&mut state);

    // Anker am rechten Rand: (1,1)→(4,1) passt, weiter rechts gaebe es nichts
    select_single_tile(&mut state, (4, 1));
    controller.paste(&mut state).expect("teilweises Paste ist ok");
    assert_eq!(tile_type(&state, "map_1/tile_4_1"), Some("grass".into()));

    // Kopie von zwei Tiles, von denen eine ausserhalb landen wuerde
    let wide = TileSelection::from_corners(
        DVec2::new(3.0 * TILE + 0.005, TILE + 0.005),
        DVec2::new(4.0 * TILE + 0.01, TILE + 0.01),
    );
    state.selection.select_tiles(wide);
    controller.paint_selected_tiles(&mut state, "asphalt").unwrap();
    controller.copy(&mut state);

    // Ziel-Tile vor dem Paste zuruecksetzen, damit der Effekt messbar ist
    select_single_tile(&mut state, (4, 1));
    controller.paint_selected_tiles(&mut state, "floor").unwrap();

    select_single_tile(&mut state, (4, 1));
    controller.paste(&mut state).expect("teilweises Paste ist ok");
    // (3,1)→(4,1) gepastet, (4,1)→(5,1) uebersprungen
    assert_eq!(tile_type(&state, "map_1/tile_4_1"), Some("asphalt".into()));
}

#[test]
fn paste_klemmt_objekt_pose_in_die_kartenausdehnung() {
    let (mut controller, mut state) = state_with_map((5, 5));
    let extent = 5.0 * TILE;

    let vehicle = controller.add_object(&mut state, VEHICLES, None).unwrap();
    controller
        .move_object(&mut state, &vehicle, DVec2::new(2.6, 2.6))
        .unwrap();
    state.selection.select_object(vehicle);
    select_single_tile(&mut state, (0, 0));
    controller.copy(&mut state);

    // Anker weit rechts oben: ungeklemmt laege das Objekt ausserhalb
    select_single_tile(&mut state, (4, 4));
    controller.paste(&mut state).unwrap();

    let pose = state
        .layer(FRAMES)
        .and_then(|layer| layer.get("map_1/vehicle2"))
        .and_then(|frame| frame.pose())
        .expect("eingefuegtes Vehicle erwartet");
    assert!(pose.x <= extent + 1e-9);
    assert!(pose.y <= extent + 1e-9);
    assert!(pose.x >= 0.0 && pose.y >= 0.0);
}

#[test]
fn paste_rebased_indirekte_frames_auf_den_root() {
    let (mut controller, mut state) = state_with_map((5, 5));

    let tower = controller.add_object(&mut state, WATCHTOWERS, None).unwrap();
    let vehicle = controller.add_object(&mut state, VEHICLES, None).unwrap();
    controller
        .dispatch(
            &mut state,
            LayerCommand::SetRelativeTo {
                frame_name: vehicle.clone(),
                relative_to: tower.clone(),
            },
        )
        .unwrap();

    state.selection.select_object(vehicle);
    select_single_tile(&mut state, (0, 0));
    controller.copy(&mut state);
    select_single_tile(&mut state, (2, 2));
    controller.paste(&mut state).unwrap();

    // Die Kopie haengt am Root, nicht mehr am Watchtower
    let pasted = "map_1/vehicle2";
    let frame = state
        .layer(FRAMES)
        .and_then(|layer| layer.get(pasted))
        .expect("Frame erwartet");
    assert_eq!(frame.relative_to(), Some("map_1"));
    assert_eq!(state.frame_tree.predecessor(pasted).unwrap(), "map_1");
}

#[test]
fn puffer_ueberlebt_undo_und_mehrfaches_paste() {
    let (mut controller, mut state) = state_with_map((5, 5));

    select_single_tile(&mut state, (1, 1));
    controller.paint_selected_tiles(&mut state, "curve").unwrap();
    controller.copy(&mut state);

    select_single_tile(&mut state, (2, 1));
    controller.paste(&mut state).unwrap();
    controller.undo(&mut state);
    assert_eq!(tile_type(&state, "map_1/tile_2_1"), Some("floor".into()));

    // Der Puffer ist von der History unabhaengig
    select_single_tile(&mut state, (3, 3));
    controller.paste(&mut state).unwrap();
    assert_eq!(tile_type(&state, "map_1/tile_3_3"), Some("curve".into()));
}

#[test]
fn cut_uebermalt_tiles_und_loescht_objekte() {
    let (mut controller, mut state) = state_with_map((5, 5));

    let vehicle = controller.add_object(&mut state, VEHICLES, None).unwrap();
    select_single_tile(&mut state, (1, 1));
    controller.paint_selected_tiles(&mut state, "grass").unwrap();
    state.selection.select_object(vehicle.clone());
    select_single_tile(&mut state, (1, 1));

    controller.cut(&mut state).expect("Cut moeglich");

    // Tile neutral uebermalt, Objekt weg, Puffer gefuellt
    assert_eq!(tile_type(&state, "map_1/tile_1_1"), Some("asphalt".into()));
    assert!(state.layer(VEHICLES).is_some_and(|l| !l.contains(&vehicle)));
    assert!(!state.buffer.is_empty());

    // Einfuegen stellt die Auswahl an neuer Stelle wieder her
    select_single_tile(&mut state, (3, 3));
    controller.paste(&mut state).unwrap();
    assert_eq!(tile_type(&state, "map_1/tile_3_3"), Some("grass".into()));
    assert!(state.layer(VEHICLES).is_some_and(|l| l.contains("map_1/vehicle1")));
}
