//! Drive the engine headlessly: answer the first across clue of the sample
//! puzzle and print the resulting grid and status.

use crossword_core::{Cell, Controller, GridDirection, Key, MemoryStorage, Position, Puzzle};

fn main() {
    let mut controller = Controller::new(Puzzle::sample(), MemoryStorage::default());
    controller.start();

    let clue = controller.current_clue().clone();
    println!("1-Across: {}", clue.text);

    for c in "CABS".chars() {
        controller.handle_key_press(Key::Char(c));
    }

    for row in 0..controller.puzzle().height() {
        let mut line = String::new();
        for col in 0..controller.puzzle().width() {
            line.push(match controller.board().get(Position::new(row, col)) {
                Cell::Blocked => '#',
                Cell::Empty => '.',
                Cell::Filled(c) => c,
            });
        }
        println!("{}", line);
    }

    println!(
        "cursor: ({}, {}) {}  status: {:?}",
        controller.selected_cell().row,
        controller.selected_cell().col,
        controller.direction(),
        controller.status()
    );
    assert_eq!(controller.direction(), GridDirection::Across);
}
