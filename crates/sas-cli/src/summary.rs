use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sas_convert::{TableInfo, TestReport};

pub fn print_info(info: &TableInfo) {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec![header_cell("Table"), header_cell("Value")]);
    table.add_row(vec![Cell::new("Name"), Cell::new(&info.name)]);
    table.add_row(vec![
        Cell::new("Label"),
        info.label.as_deref().map_or_else(|| dim_cell("-"), Cell::new),
    ]);
    table.add_row(vec![Cell::new("Rows"), Cell::new(info.row_count)]);
    table.add_row(vec![Cell::new("Columns"), Cell::new(info.column_count)]);
    align_column(&mut table, 1, CellAlignment::Left);
    println!("{table}");
}

pub fn print_test_report(report: &TestReport) {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Declared rows"),
        header_cell("Rows read"),
        header_cell("Seconds"),
    ]);
    let read_color = if report.counts_match() {
        Color::Green
    } else {
        Color::Yellow
    };
    table.add_row(vec![
        Cell::new(&report.name),
        Cell::new(report.declared_rows),
        Cell::new(report.rows_read).fg(read_color),
        Cell::new(format!("{:.3}", report.elapsed.as_secs_f64())),
    ]);
    for index in 1..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
