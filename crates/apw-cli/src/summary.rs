use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use apw_core::{Collision, ConversionSummary, FileSet, PackageOutcome, WorkspaceFile};

pub fn print_pack_summary(workspace: &WorkspaceFile, outcomes: &[PackageOutcome]) {
    println!("Workspace: {}", workspace.path().display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Package"),
        header_cell("Archive"),
        header_cell("Files"),
        header_cell("Kept"),
        header_cell("Converted"),
        header_cell("Dropped"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for outcome in outcomes {
        let ConversionSummary {
            kept,
            replaced,
            dropped,
        } = outcome.conversion;
        table.add_row(vec![
            Cell::new(outcome.profile).add_attribute(Attribute::Bold),
            path_cell(&outcome.archive),
            Cell::new(outcome.file_count),
            Cell::new(kept),
            Cell::new(replaced),
            count_cell(dropped, Color::Yellow),
        ]);
    }
    println!("{table}");
    if let Some(outcome) = outcomes.first() {
        print_collisions(&outcome.collisions);
    }
}

pub fn print_file_check(workspace: &WorkspaceFile, files: &FileSet) {
    println!("Workspace: {}", workspace.path().display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Type"),
        header_cell("Folder"),
        header_cell("Path"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    let missing = files.missing();
    for (path, file_type) in files.iter() {
        let status = if missing.iter().any(|m| m == path) {
            Cell::new("MISSING")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new("ok").fg(Color::Green)
        };
        table.add_row(vec![
            Cell::new(file_type),
            dim_cell(file_type.folder()),
            path_cell(path),
            status,
        ]);
    }
    println!("{table}");
    println!(
        "{} referenced, {} missing",
        files.len(),
        files.missing().len()
    );
    print_collisions(files.collisions());
}

pub fn print_workspace_list(workspaces: &[WorkspaceFile]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Workspace"),
        header_cell("Projects"),
        header_cell("Systems"),
        header_cell("Files"),
        header_cell("Path"),
    ]);
    apply_table_style(&mut table);
    for index in 1..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for file in workspaces {
        let workspace = &file.workspace;
        let systems = workspace.systems().count();
        let files: usize = workspace.systems().map(|s| s.files.len()).sum();
        table.add_row(vec![
            Cell::new(file.identifier()).fg(Color::Cyan),
            Cell::new(workspace.projects().len()),
            Cell::new(systems),
            Cell::new(files),
            path_cell(file.path()),
        ]);
    }
    println!("{table}");
}

fn print_collisions(collisions: &[Collision]) {
    if collisions.is_empty() {
        return;
    }
    eprintln!("Duplicate file entries (last entry kept):");
    for collision in collisions {
        eprintln!(
            "- {} ({} replaced by {})",
            collision.path.display(),
            collision.previous,
            collision.kept
        );
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
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

fn path_cell(path: &Path) -> Cell {
    Cell::new(path.display())
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
