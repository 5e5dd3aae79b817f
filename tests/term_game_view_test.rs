use focusblocks::core::{Board, GameState, GrantPolicy, Inventory, RewardTally, SimpleRng};
use focusblocks::engine::{Command, Profile, Session, SessionConfig, TaskDraft};
use focusblocks::term::{AnchorY, FrameBuffer, GameView, ViewState, Viewport};
use focusblocks::types::PieceKind;

fn text(fb: &FrameBuffer) -> String {
    let mut all = String::new();
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            all.push(fb.get(x, y).unwrap().ch);
        }
        all.push('\n');
    }
    all
}

fn view<'a>(game: &'a GameState, inventory: &'a Inventory, rewards: &'a RewardTally) -> ViewState<'a> {
    ViewState {
        game,
        paused: false,
        inventory,
        rewards,
        ranked: &[],
        recommended: None,
        selected: None,
        entry: None,
        status: None,
    }
}

#[test]
fn term_view_renders_border_corners() {
    let game = GameState::default();
    let inv = Inventory::new();
    let rewards = RewardTally::default();

    // cell_w=2, cell_h=1: 20x20 board pixels plus border => 22x22
    let fb = GameView::default().render(&view(&game, &inv, &rewards), Viewport::new(22, 22));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(21, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 21).unwrap().ch, '└');
    assert_eq!(fb.get(21, 21).unwrap().ch, '┘');
}

#[test]
fn term_view_renders_settled_cell_two_chars_wide() {
    let mut rows = vec![".........."; 19];
    rows.push("#.........");
    let game = GameState::new(Board::from_pattern(&rows).unwrap());
    let inv = Inventory::new();
    let rewards = RewardTally::default();

    let fb = GameView::default()
        .with_anchor_y(AnchorY::Top)
        .render(&view(&game, &inv, &rewards), Viewport::new(22, 22));

    // Inside border: (1,1) origin.
    assert_eq!(fb.get(1, 20).unwrap().ch, '▓');
    assert_eq!(fb.get(2, 20).unwrap().ch, '▓');
    assert_eq!(fb.get(3, 20).unwrap().ch, '·');
}

#[test]
fn term_view_can_anchor_board_to_top() {
    let game = GameState::default();
    let inv = Inventory::new();
    let rewards = RewardTally::default();
    let fb = GameView::default()
        .with_anchor_y(AnchorY::Top)
        .render(&view(&game, &inv, &rewards), Viewport::new(22, 30));
    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
}

#[test]
fn term_view_centers_board_with_footer_below() {
    let game = GameState::default();
    let inv = Inventory::new();
    let rewards = RewardTally::default();
    let fb = GameView::default().render(&view(&game, &inv, &rewards), Viewport::new(22, 30));
    // Frame plus footer is 23 rows: (30 - 23) / 2 = 3.
    assert_eq!(fb.get(0, 3).unwrap().ch, '┌');
}

#[test]
fn term_view_shows_session_tasks_and_inventory() {
    let config = SessionConfig {
        garbage_rows: 0,
        grant: GrantPolicy::new(2, 2),
    };
    let mut session = Session::new(config, Profile::default(), SimpleRng::new(4));
    let mut draft = TaskDraft::new("ship release");
    draft.impact = 9;
    session.apply(Command::AddTask(draft)).unwrap();
    session.apply(Command::AddTask(TaskDraft::new("water plants"))).unwrap();
    session.apply(Command::ToggleTask(2)).unwrap();

    let ranked = session.ranked();
    let state = ViewState::from_session(&session, &ranked).with_selected(Some(1));
    assert_eq!(state.recommended, Some(1));

    let fb = GameView::default().render(&state, Viewport::new(90, 26));
    let all = text(&fb);
    assert!(all.contains("SCORE"));
    assert!(all.contains("TASKS"));
    assert!(all.contains("ship release"));
    assert!(all.contains("[x]"));
    assert!(all.contains("water plants"));

    let total: u32 = PieceKind::ALL.iter().map(|&k| session.inventory().count(k)).sum();
    assert_eq!(total, 2);
}

#[test]
fn term_view_marks_blocked_spawn() {
    let rows = vec!["#########."; 20];
    let board = Board::from_pattern(&rows).unwrap();
    let inv = Inventory::from_counts([(PieceKind::I, 1)]);
    let mut rng = SimpleRng::new(3);
    let (game, inv) = GameState::new(board).tick(&inv, &mut rng);
    let rewards = RewardTally::default();

    let all = text(&GameView::default().render(&view(&game, &inv, &rewards), Viewport::new(80, 24)));
    assert!(all.contains("BLOCKED - R"));
}
