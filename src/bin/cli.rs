use chrono::{Local, NaiveDate};
use polars::prelude::{AnyValue, DataFrame};
use staffing_tool::{
    Assignment, CapacityRange, Developer, ObservationWindow, Roster, RosterMetadataError, Team,
    UtilizationBand, load_percentage, load_roster_from_csv, load_roster_from_json,
    save_roster_to_csv, save_roster_to_json,
};

use std::io::{self, Write};

fn render_df_as_text_table(df: &DataFrame) -> String {
    // Compute column widths
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for (ci, col) in columns.iter().enumerate() {
        for row_idx in 0..df.height() {
            if let Ok(ref av) = col.get(row_idx) {
                let s = render_any_value(av);
                if s.len() > widths[ci] {
                    widths[ci] = s.len();
                }
            }
        }
    }

    // Build horizontal separator
    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    // Build output
    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    // Header
    out.push('|');
    for (i, name) in col_names.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        let pad = widths[i] - name.len();
        if pad > 0 {
            out.push_str(&" ".repeat(pad));
        }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    // Rows
    for row_idx in 0..df.height() {
        out.push('|');
        for (ci, col) in columns.iter().enumerate() {
            let mut s = String::new();
            if let Ok(ref av) = col.get(row_idx) {
                s = render_any_value(av);
            }
            out.push(' ');
            out.push_str(&s);
            let pad = widths[ci].saturating_sub(s.len());
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_any_value(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Float64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        _ => av.to_string(),
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show current assignments\n  add <id> <dev_id> <name> <start> [end|-] [ratio]\n                                     Upsert an assignment (dates YYYY-MM-DD)\n  delete <id>                        Delete an assignment\n  dates <id> <start> [end|-]         Set an assignment's date span\n  ratio <id> <float>                 Set an assignment's allocation ratio\n  dev <id> <first> <last> [team_id|-] [position...]\n                                     Register or update a developer\n  team <id> <name...>                Register or update a team\n  workload [from to]                 Weekly workload grid (default window\n                                     is 3 months back, 6 months forward)\n  capacity [from [weeks]]            Team capacity rollup (default 12 weeks)\n  classify <hours>                   Utilization band for a weekly hours value\n  meta show                          Show plan metadata\n  meta name <text...>                Update plan name\n  meta desc <text...>                Update plan description\n  meta window <start> <end>          Update observation window (YYYY-MM-DD)\n  save <json|csv> <path>             Persist roster to disk\n  load <json|csv> <path>             Load roster from disk\n  quit|exit                          Exit"
    );
}

fn print_metadata(roster: &Roster) {
    let metadata = roster.metadata();
    println!("Plan name        : {}", metadata.plan_name);
    println!("Plan description : {}", metadata.plan_description);
    println!("Window start     : {}", metadata.window_start);
    println!("Window end       : {}", metadata.window_end);
}

fn print_workload(roster: &Roster, window: ObservationWindow) {
    let grid = match roster.workload(window) {
        Ok(grid) => grid,
        Err(err) => {
            println!("Error computing workload: {err}");
            return;
        }
    };
    println!("{}", grid.summary().to_cli_summary());
    if grid.weeks.is_empty() {
        println!("No assignments in the observation window.");
        return;
    }
    let labels = grid
        .weeks
        .iter()
        .map(|week| week.label.clone())
        .collect::<Vec<_>>()
        .join(", ");
    println!("Weeks: {labels}");
    for dev in &grid.developers {
        let mut line = format!(
            "  {} [{}] avg={:.1}h:",
            dev.developer_name, dev.position, dev.average_load
        );
        for week in &grid.weeks {
            let hours = dev.hours_for_week(&week.week_key);
            let band = UtilizationBand::classify(hours);
            line.push_str(&format!(" {}={}h({})", week.week_key, hours, band.as_str()));
        }
        println!("{line}");
    }
}

fn print_capacity(roster: &Roster, range: CapacityRange) {
    let teams = match roster.team_capacity(range) {
        Ok(teams) => teams,
        Err(err) => {
            println!("Error computing capacity: {err}");
            return;
        }
    };
    if teams.is_empty() {
        println!("No teams registered.");
        return;
    }
    for team in &teams {
        println!(
            "{}: developers={}, avg_utilization={:.0}%",
            team.team_name,
            team.developer_count,
            team.average_utilization()
        );
        for week in &team.weeks {
            println!(
                "  {}: assigned={}h of {}h ({:.0}%)",
                week.week_start, week.assigned_hours, week.total_capacity, week.utilization
            );
        }
    }
}

fn print_metadata_error(err: RosterMetadataError) {
    match err {
        RosterMetadataError::StartAfterEnd { .. } => {
            println!("Window start date must be on or before window end date.");
        }
    }
}

fn parse_date_arg(input: &str) -> Option<NaiveDate> {
    input.parse::<NaiveDate>().ok()
}

fn main() {
    let mut roster = Roster::new();

    println!("Staffing Tool (CLI) - type 'help' for commands\n");
    println!("{}", render_df_as_text_table(roster.dataframe()));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        if stdin.read_line(&mut line).is_err() {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => {
                print_help();
            }
            "quit" | "exit" => break,
            "show" => {
                println!("{}", render_df_as_text_table(roster.dataframe()));
            }
            "add" => {
                let args: Vec<&str> = parts.collect();
                if args.len() < 4 {
                    println!("Usage: add <id> <dev_id> <name> <start> [end|-] [ratio]");
                    continue;
                }
                let (Ok(id), Ok(dev_id)) = (args[0].parse::<i32>(), args[1].parse::<i32>())
                else {
                    println!("Invalid id or dev_id.");
                    continue;
                };
                let Some(start) = parse_date_arg(args[3]) else {
                    println!("Invalid start date '{}'.", args[3]);
                    continue;
                };
                let mut assignment = Assignment::new(id, dev_id, args[2]);
                assignment.start_date = Some(start);
                if let Some(end_s) = args.get(4) {
                    if *end_s != "-" {
                        let Some(end) = parse_date_arg(end_s) else {
                            println!("Invalid end date '{end_s}'.");
                            continue;
                        };
                        assignment.end_date = Some(end);
                    }
                }
                if let Some(ratio_s) = args.get(5) {
                    let Ok(ratio) = ratio_s.parse::<f64>() else {
                        println!("Invalid ratio '{ratio_s}'.");
                        continue;
                    };
                    assignment.ratio = Some(ratio);
                }
                match roster.upsert_assignment_record(assignment) {
                    Ok(()) => println!("{}", render_df_as_text_table(roster.dataframe())),
                    Err(err) => println!("Error: {err}"),
                }
            }
            "delete" => match parts.next().map(str::parse::<i32>) {
                Some(Ok(id)) => match roster.delete_assignment(id) {
                    Ok(true) => println!("Deleted assignment {id}."),
                    Ok(false) => println!("Assignment {id} not found."),
                    Err(err) => println!("Error: {err}"),
                },
                _ => println!("Usage: delete <id>"),
            },
            "dates" => {
                let args: Vec<&str> = parts.collect();
                if args.len() < 2 {
                    println!("Usage: dates <id> <start> [end|-]");
                    continue;
                }
                let Ok(id) = args[0].parse::<i32>() else {
                    println!("Invalid assignment id.");
                    continue;
                };
                let Some(start) = parse_date_arg(args[1]) else {
                    println!("Invalid start date '{}'.", args[1]);
                    continue;
                };
                let end = match args.get(2) {
                    Some(end_s) if *end_s != "-" => match parse_date_arg(end_s) {
                        Some(end) => Some(end),
                        None => {
                            println!("Invalid end date '{end_s}'.");
                            continue;
                        }
                    },
                    _ => None,
                };
                match roster.set_assignment_dates(id, start, end) {
                    Ok(()) => println!("Updated dates for assignment {id}."),
                    Err(err) => println!("Error: {err}"),
                }
            }
            "ratio" => {
                let (Some(id_s), Some(ratio_s)) = (parts.next(), parts.next()) else {
                    println!("Usage: ratio <id> <float>");
                    continue;
                };
                let (Ok(id), Ok(ratio)) = (id_s.parse::<i32>(), ratio_s.parse::<f64>()) else {
                    println!("Invalid id or ratio.");
                    continue;
                };
                match roster.set_assignment_ratio(id, ratio) {
                    Ok(()) => println!("Updated ratio for assignment {id}."),
                    Err(err) => println!("Error: {err}"),
                }
            }
            "dev" => {
                let args: Vec<&str> = parts.collect();
                if args.len() < 3 {
                    println!("Usage: dev <id> <first> <last> [team_id|-] [position...]");
                    continue;
                }
                let Ok(id) = args[0].parse::<i32>() else {
                    println!("Invalid developer id.");
                    continue;
                };
                let mut developer = Developer::new(id, args[1], args[2]);
                if let Some(team_s) = args.get(3) {
                    if *team_s != "-" {
                        let Ok(team_id) = team_s.parse::<i32>() else {
                            println!("Invalid team id '{team_s}'.");
                            continue;
                        };
                        developer.team_id = Some(team_id);
                    }
                }
                if args.len() > 4 {
                    developer.position = Some(args[4..].join(" "));
                }
                roster.upsert_developer(developer);
                println!("Registered developer {id}.");
            }
            "team" => {
                let args: Vec<&str> = parts.collect();
                if args.len() < 2 {
                    println!("Usage: team <id> <name...>");
                    continue;
                }
                let Ok(id) = args[0].parse::<i32>() else {
                    println!("Invalid team id.");
                    continue;
                };
                roster.upsert_team(Team::new(id, args[1..].join(" ")));
                println!("Registered team {id}.");
            }
            "workload" => {
                let args: Vec<&str> = parts.collect();
                let window = match (args.first(), args.get(1)) {
                    (Some(from_s), Some(to_s)) => {
                        match (parse_date_arg(from_s), parse_date_arg(to_s)) {
                            (Some(from), Some(to)) => ObservationWindow::new(from, to),
                            _ => {
                                println!("Usage: workload [from to] (dates YYYY-MM-DD)");
                                continue;
                            }
                        }
                    }
                    _ => ObservationWindow::around(Local::now().date_naive()),
                };
                print_workload(&roster, window);
            }
            "capacity" => {
                let args: Vec<&str> = parts.collect();
                let start = match args.first() {
                    Some(from_s) => match parse_date_arg(from_s) {
                        Some(from) => from,
                        None => {
                            println!("Usage: capacity [from [weeks]] (date YYYY-MM-DD)");
                            continue;
                        }
                    },
                    None => Local::now().date_naive(),
                };
                let weeks = match args.get(1) {
                    Some(weeks_s) => match weeks_s.parse::<usize>() {
                        Ok(weeks) => weeks,
                        Err(_) => {
                            println!("Invalid week count '{weeks_s}'.");
                            continue;
                        }
                    },
                    None => 12,
                };
                print_capacity(&roster, CapacityRange::new(start, weeks));
            }
            "classify" => match parts.next().map(str::parse::<f64>) {
                Some(Ok(hours)) => {
                    let band = UtilizationBand::classify(hours);
                    println!(
                        "{hours}h -> {} ({:.0}% of capacity, {})",
                        band.as_str(),
                        load_percentage(hours),
                        band.hex_color()
                    );
                }
                _ => println!("Usage: classify <hours>"),
            },
            "meta" => {
                let sub = parts.next().unwrap_or("");
                match sub {
                    "show" => print_metadata(&roster),
                    "name" => {
                        let rest: Vec<&str> = parts.collect();
                        if rest.is_empty() {
                            println!("Usage: meta name <text...>");
                            continue;
                        }
                        roster.set_plan_name(rest.join(" "));
                        println!("Updated plan name.");
                    }
                    "desc" => {
                        let rest: Vec<&str> = parts.collect();
                        if rest.is_empty() {
                            println!("Usage: meta desc <text...>");
                            continue;
                        }
                        roster.set_plan_description(rest.join(" "));
                        println!("Updated plan description.");
                    }
                    "window" => {
                        let (Some(start_s), Some(end_s)) = (parts.next(), parts.next()) else {
                            println!("Usage: meta window <start> <end>");
                            continue;
                        };
                        let (Some(start), Some(end)) =
                            (parse_date_arg(start_s), parse_date_arg(end_s))
                        else {
                            println!("Invalid dates; expected YYYY-MM-DD.");
                            continue;
                        };
                        match roster.set_window(start, end) {
                            Ok(()) => println!("Updated observation window."),
                            Err(err) => print_metadata_error(err),
                        }
                    }
                    _ => println!("Usage: meta <show|name|desc|window>"),
                }
            }
            "save" => {
                let (Some(format), Some(path)) = (parts.next(), parts.next()) else {
                    println!("Usage: save <json|csv> <path>");
                    continue;
                };
                let result = match format {
                    "json" => save_roster_to_json(&roster, path),
                    "csv" => save_roster_to_csv(&roster, path),
                    other => {
                        println!("Unknown format '{other}'; expected json or csv.");
                        continue;
                    }
                };
                match result {
                    Ok(()) => println!("Roster saved to {path}."),
                    Err(err) => println!("Error saving roster: {err}"),
                }
            }
            "load" => {
                let (Some(format), Some(path)) = (parts.next(), parts.next()) else {
                    println!("Usage: load <json|csv> <path>");
                    continue;
                };
                let result = match format {
                    "json" => load_roster_from_json(path),
                    "csv" => load_roster_from_csv(path),
                    other => {
                        println!("Unknown format '{other}'; expected json or csv.");
                        continue;
                    }
                };
                match result {
                    Ok(loaded) => {
                        roster = loaded;
                        println!("Roster loaded from {path}.");
                        println!("{}", render_df_as_text_table(roster.dataframe()));
                    }
                    Err(err) => println!("Error loading roster: {err}"),
                }
            }
            other => {
                println!("Unknown command '{other}'. Type 'help' for commands.");
            }
        }
    }
}
