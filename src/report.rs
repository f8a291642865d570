extern crate comfy_table;

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use cp_tester::grade::{CaseResult, Outcome};

const HEADER: [&str; 5] = ["Serial No", "Input", "Expected Output", "Your Output", "Result"];

fn outcome_color(outcome: Outcome) -> Color {
    match outcome {
        Outcome::Accepted => Color::Green,
        Outcome::WrongAnswer => Color::Red,
        Outcome::TimeLimitExceeded => Color::Yellow,
        Outcome::RuntimeError | Outcome::CompileError => Color::Magenta,
    }
}

pub fn table(results: &[CaseResult]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(HEADER.to_vec());
    for r in results {
        table.add_row(vec![
            Cell::new(r.serial()),
            Cell::new(r.input.trim_end()),
            Cell::new(&r.expected),
            Cell::new(r.actual_or_na()),
            Cell::new(r.outcome).fg(outcome_color(r.outcome)),
        ]);
    }
    table
}
