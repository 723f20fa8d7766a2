use seabattle::{
    manual_fleet, Board, Match, MatchError, Orientation, Phase, Placement, PlayerSlot,
    ShotOutcome, NUM_SHIPS, SHIPS,
};

fn placed_board() -> Board {
    manual_fleet(&[
        Placement::new(SHIPS[0], 0, Orientation::Horizontal),
        Placement::new(SHIPS[1], 10, Orientation::Horizontal),
        Placement::new(SHIPS[2], 20, Orientation::Horizontal),
        Placement::new(SHIPS[3], 30, Orientation::Horizontal),
        Placement::new(SHIPS[4], 40, Orientation::Horizontal),
    ])
    .unwrap()
}

fn started_match() -> Match {
    let mut game = Match::new();
    game.set_fleet(PlayerSlot::P0, placed_board()).unwrap();
    game.set_fleet(PlayerSlot::P1, placed_board()).unwrap();
    game.start().unwrap();
    game
}

#[test]
fn premature_start_is_a_reported_no_op() {
    let mut game = Match::new();
    game.set_fleet(PlayerSlot::P0, placed_board()).unwrap();
    assert_eq!(game.start().unwrap_err(), MatchError::FleetIncomplete);
    assert_eq!(game.phase(), Phase::Setup);
}

#[test]
fn firing_before_start_is_rejected() {
    let mut game = Match::new();
    assert_eq!(
        game.fire(PlayerSlot::P0, 0).unwrap_err(),
        MatchError::NotStarted
    );
}

#[test]
fn fleets_are_locked_once_started() {
    let mut game = started_match();
    assert_eq!(
        game.set_fleet(PlayerSlot::P0, placed_board()).unwrap_err(),
        MatchError::AlreadyStarted
    );
}

#[test]
fn slot_zero_moves_first_and_miss_flips_turn() {
    let mut game = started_match();
    assert_eq!(game.turn(), PlayerSlot::P0);
    // cell 99 is unoccupied on the standard layout
    let shot = game.fire(PlayerSlot::P0, 99).unwrap();
    assert_eq!(shot.outcome, ShotOutcome::Miss);
    assert_eq!(game.turn(), PlayerSlot::P1);
}

#[test]
fn out_of_turn_shot_is_rejected_without_mutation() {
    let mut game = started_match();
    assert_eq!(
        game.fire(PlayerSlot::P1, 0).unwrap_err(),
        MatchError::NotYourTurn
    );
    assert_eq!(game.turn(), PlayerSlot::P0);
    // the rejected cell is still unrevealed for the rightful attacker later
    let shot = game.fire(PlayerSlot::P0, 0).unwrap();
    assert_eq!(shot.outcome, ShotOutcome::Hit);
}

#[test]
fn turn_alternates_with_each_successful_shot() {
    let mut game = started_match();
    // fire at empty cells so nothing sinks
    for (n, cell) in (50..60).enumerate() {
        let attacker = PlayerSlot::from_index(n % 2).unwrap();
        assert_eq!(game.turn(), attacker);
        game.fire(attacker, cell).unwrap();
    }
    assert_eq!(game.turn(), PlayerSlot::P0);
}

#[test]
fn duplicate_cell_reports_already_revealed() {
    let mut game = started_match();
    game.fire(PlayerSlot::P0, 99).unwrap();
    game.fire(PlayerSlot::P1, 99).unwrap();
    // P0 fires at the same defender cell again
    let err = game.fire(PlayerSlot::P0, 99).unwrap_err();
    assert!(matches!(err, MatchError::Board(_)));
    // failed shot does not flip the turn
    assert_eq!(game.turn(), PlayerSlot::P0);
}

#[test]
fn destroying_the_fleet_ends_the_match_with_the_attacker_winning() {
    let mut game = started_match();
    let targets: Vec<u8> = (0..NUM_SHIPS as u8)
        .flat_map(|row| (0..SHIPS[row as usize].length()).map(move |i| row * 10 + i))
        .collect();
    assert_eq!(targets.len(), 17);

    for (n, &cell) in targets.iter().enumerate() {
        // P0 hits a ship cell, P1 wastes its turn on an empty cell
        game.fire(PlayerSlot::P0, cell).unwrap();
        if n < targets.len() - 1 {
            game.fire(PlayerSlot::P1, 50 + n as u8).unwrap();
        }
    }

    assert_eq!(
        game.phase(),
        Phase::Over {
            winner: Some(PlayerSlot::P0)
        }
    );
    assert_eq!(game.winner(), Some(PlayerSlot::P0));
    assert!(game.board(PlayerSlot::P1).all_sunk());
}

#[test]
fn terminal_match_rejects_further_shots() {
    let mut game = started_match();
    let targets: Vec<u8> = (0..NUM_SHIPS as u8)
        .flat_map(|row| (0..SHIPS[row as usize].length()).map(move |i| row * 10 + i))
        .collect();
    for (n, &cell) in targets.iter().enumerate() {
        game.fire(PlayerSlot::P0, cell).unwrap();
        if !game.is_over() {
            game.fire(PlayerSlot::P1, 60 + n as u8).unwrap();
        }
    }
    assert!(game.is_over());
    assert_eq!(
        game.fire(PlayerSlot::P1, 0).unwrap_err(),
        MatchError::GameAlreadyOver
    );
}
