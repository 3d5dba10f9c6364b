use crate::calc::{CalendarModel, Classification, MonthGrid, RangeSelector};
use crate::data::Settings;
use anyhow::{bail, Result};
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

pub fn run(
    months: Option<u32>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    if to.is_some() && from.is_none() {
        bail!("--to requires --from");
    }

    let settings = Settings::load()?;
    let months = months.unwrap_or(settings.months_shown).max(1);
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let model = CalendarModel::new(today);

    // Feed the requested bounds through the same tap state machine the
    // picker uses, so a reversed --from/--to pair normalizes identically.
    let mut selector = RangeSelector::new();
    if let Some(start) = from {
        selector.transition(start);
    }
    if let Some(end) = to {
        selector.transition(end);
    }

    let out = &mut std::io::stdout();
    if json {
        write_json(&model, &selector, months, out)
    } else {
        write_months(&model, &selector, months, out)
    }
}

pub(crate) fn write_months<W: std::io::Write>(
    model: &CalendarModel,
    selector: &RangeSelector,
    months: u32,
    out: &mut W,
) -> Result<()> {
    for offset in 0..months as i32 {
        let grid = model.grid_for(offset);
        writeln!(out, "{:^26}", grid.label())?;
        writeln!(out, "Su  Mo  Tu  We  Th  Fr  Sa")?;

        let mut row = 0usize;
        while row < grid.cell_count() {
            let mut line = String::new();
            for _col in 0..7usize {
                if row >= grid.cell_count() {
                    break;
                }
                match grid.date_at(row) {
                    None => line.push_str("    "),
                    Some(date) => {
                        let mark = match selector.classify(date) {
                            Classification::RangeStart => '[',
                            Classification::RangeEnd => ']',
                            Classification::InRange => '-',
                            Classification::OutOfRange => '.',
                            Classification::Default => ' ',
                        };
                        line.push_str(&format!("{:>2}{} ", date.day(), mark));
                    }
                }
                row += 1;
            }
            writeln!(out, "{}", line.trim_end())?;
        }
        writeln!(out)?;
    }

    if selector.state().is_complete() {
        writeln!(out, "[ start   ] end   - in range   . outside")?;
    } else if selector.state().start().is_some() {
        writeln!(out, "[ start   . outside")?;
    }
    Ok(())
}

// ── JSON output ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ShowJson {
    selection: SelectionJson,
    months: Vec<MonthJson>,
}

#[derive(Serialize)]
struct SelectionJson {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

#[derive(Serialize)]
struct MonthJson {
    label: String,
    first_day: NaiveDate,
    leading_offset: usize,
    cell_count: usize,
    header_dimmed: bool,
    cells: Vec<CellJson>,
}

#[derive(Serialize)]
struct CellJson {
    row: usize,
    date: Option<NaiveDate>,
    state: &'static str,
}

pub(crate) fn write_json<W: std::io::Write>(
    model: &CalendarModel,
    selector: &RangeSelector,
    months: u32,
    out: &mut W,
) -> Result<()> {
    let output = ShowJson {
        selection: SelectionJson {
            start: selector.state().start(),
            end: selector.state().end(),
        },
        months: (0..months as i32)
            .map(|offset| month_json(&model.grid_for(offset), selector))
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *out, &output)?;
    writeln!(out)?;
    Ok(())
}

fn month_json(grid: &MonthGrid, selector: &RangeSelector) -> MonthJson {
    let cells = (0..grid.cell_count())
        .map(|row| {
            let date = grid.date_at(row);
            CellJson {
                row,
                date,
                // Blank placeholders always render default.
                state: state_name(date.map_or(Classification::Default, |d| selector.classify(d))),
            }
        })
        .collect();
    MonthJson {
        label: grid.label(),
        first_day: grid.first_day(),
        leading_offset: grid.leading_offset(),
        cell_count: grid.cell_count(),
        header_dimmed: selector.header_dimmed(grid.first_day()),
        cells,
    }
}

fn state_name(class: Classification) -> &'static str {
    match class {
        Classification::Default => "default",
        Classification::RangeStart => "range_start",
        Classification::RangeEnd => "range_end",
        Classification::InRange => "in_range",
        Classification::OutOfRange => "out_of_range",
    }
}
