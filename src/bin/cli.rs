use garment_schedule::{
    ConfirmationPeriod, Department, Feasibility, LoadOptions, PlannerConfig, ProcessType,
    Schedule, Session, Step, StyleStore, department_steps, import_styles_from_csv,
    load_schedule_from_csv, load_schedule_from_json, logging, parse_date, render_text_table,
    save_schedule_to_csv, save_schedule_to_json, save_timeline_to_csv,
};
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

fn print_help() {
    println!(
        "Commands:\n  help                                   Show this help\n  login <user>                           Load the style list of <user>\n  logout                                 Save and close the current user\n  add <date> <process> <cycle> <style...> Add styles sharing one start date\n  import <csv_path>                      Add styles from a CSV export (款号, 缝纫开始时间, 工序, 确认周转周期)\n  list                                   List styles\n  delete <n>                             Remove style n\n  clear                                  Remove all styles\n  schedule <n>                           Compute and show the schedule of style n\n  adjust <department> <step> <date>      Move a step of the shown schedule\n  export <json|csv> <path>               Save the shown schedule\n  export timeline <path>                 Save every style's dated steps as CSV\n  load <path>                            Load a schedule saved with export (.json or .csv)\n  departments <department>               Show one department across all styles, latest first\n  catalog [process]                      Show departments and steps\n  quit|exit                              Save and exit"
    );
}

fn print_catalog(process_type: Option<ProcessType>) {
    for (department, steps) in department_steps(process_type) {
        println!("{} ({})", department, department.label());
        for step in steps {
            println!("  - {} ({})", step, step.label());
        }
    }
}

fn print_styles(session: &Session) {
    if session.styles().is_empty() {
        println!("No styles.");
        return;
    }
    for (idx, style) in session.styles().iter().enumerate() {
        println!(
            "{:>3}. {:<16} {} {:<32} {}",
            idx + 1,
            style.style_number,
            style.sewing_start_date,
            style.process_type.to_string(),
            style.cycle
        );
    }
}

fn print_schedule(label: &str, schedule: &Schedule) {
    println!(
        "Schedule for {} ({}, {}-day confirmation)",
        label,
        schedule.process_type(),
        schedule.confirmation_period()
    );
    match schedule.to_dataframe() {
        Ok(df) => println!("{}", render_text_table(&df)),
        Err(e) => println!("Error rendering schedule: {}", e),
    }
    match schedule.sewing_feasibility() {
        Feasibility::Feasible(date) => println!("Sewing start: {}", date),
        Feasibility::Infeasible => {
            println!("Sewing start: infeasible (cut pieces and trims are not ready on the same day)")
        }
    }
}

fn save_session(session: &Session, store: &dyn StyleStore) {
    if let Err(e) = session.save(store) {
        println!("Error saving styles: {}", e);
    }
}

fn parse_index(input: Option<&str>, usage: &str) -> Option<usize> {
    match input.map(str::parse::<usize>) {
        Some(Ok(n)) if n >= 1 => Some(n - 1),
        Some(_) => {
            println!("Invalid style number (use the number shown by 'list')");
            None
        }
        None => {
            println!("Usage: {}", usage);
            None
        }
    }
}

fn main() -> ExitCode {
    let config = match PlannerConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.logging);
    let store = match config.open_store() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Could not open style store: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Garment Schedule (CLI) - type 'help' for commands\n");

    let mut session: Option<Session> = None;
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "catalog" => match parts.next() {
                None => print_catalog(None),
                Some(value) => match value.parse::<ProcessType>() {
                    Ok(process_type) => print_catalog(Some(process_type)),
                    Err(e) => println!("Error: {}", e),
                },
            },
            "login" => match parts.next() {
                Some(user) => {
                    if let Some(previous) = session.take() {
                        save_session(&previous, store.as_ref());
                    }
                    match Session::open(store.as_ref(), user, config.lead_times.clone()) {
                        Ok(opened) => {
                            println!(
                                "Logged in as {} ({} styles).",
                                opened.user_id(),
                                opened.styles().len()
                            );
                            session = Some(opened);
                        }
                        Err(e) => println!("Error: {}", e),
                    }
                }
                None => println!("Usage: login <user>"),
            },
            _ => {
                let Some(active) = session.as_mut() else {
                    println!("Not logged in. Use 'login <user>'.");
                    continue;
                };
                match cmd {
                    "logout" => {
                        let user = active.user_id().to_string();
                        if let Some(closing) = session.take() {
                            match closing.close(store.as_ref()) {
                                Ok(_) => println!("Logged out {}.", user),
                                Err(e) => println!("Error saving styles: {}", e),
                            }
                        }
                    }
                    "add" => {
                        let date_s = parts.next();
                        let process_s = parts.next();
                        let cycle_s = parts.next();
                        let numbers: Vec<&str> = parts.collect();
                        match (date_s, process_s, cycle_s) {
                            (Some(date_s), Some(process_s), Some(cycle_s)) if !numbers.is_empty() => {
                                let parsed = parse_date(date_s).and_then(|date| {
                                    Ok((
                                        date,
                                        process_s.parse::<ProcessType>()?,
                                        cycle_s.parse::<ConfirmationPeriod>()?,
                                    ))
                                });
                                match parsed {
                                    Ok((date, process_type, cycle)) => match active.add_batch(
                                        &numbers.join("\n"),
                                        date,
                                        process_type,
                                        cycle,
                                    ) {
                                        Ok(added) => {
                                            println!("Added {} styles.", added);
                                            save_session(active, store.as_ref());
                                        }
                                        Err(e) => println!("Error: {}", e),
                                    },
                                    Err(e) => println!("Error: {}", e),
                                }
                            }
                            _ => println!(
                                "Usage: add <YYYY-MM-DD> <process> <7|14|20> <style> [style...]"
                            ),
                        }
                    }
                    "import" => match parts.next() {
                        Some(path) => match import_styles_from_csv(path) {
                            Ok(styles) => match active.add_styles(styles) {
                                Ok(added) => {
                                    println!("Imported {} styles from {}.", added, path);
                                    save_session(active, store.as_ref());
                                }
                                Err(e) => println!("Error: {}", e),
                            },
                            Err(e) => println!("Error importing {}: {}", path, e),
                        },
                        None => println!("Usage: import <csv_path>"),
                    },
                    "list" => print_styles(active),
                    "delete" => {
                        if let Some(idx) = parse_index(parts.next(), "delete <n>") {
                            match active.remove_style(idx) {
                                Ok(style) => {
                                    println!("Deleted style {}.", style.style_number);
                                    save_session(active, store.as_ref());
                                }
                                Err(e) => println!("Error: {}", e),
                            }
                        }
                    }
                    "clear" => {
                        active.clear();
                        save_session(active, store.as_ref());
                        println!("All styles removed.");
                    }
                    "schedule" => {
                        if let Some(idx) = parse_index(parts.next(), "schedule <n>") {
                            match active.select(idx).map(|_| ()) {
                                Ok(()) => {
                                    if let Some(current) = active.current() {
                                        print_schedule(&current.style_number, &current.schedule);
                                    }
                                }
                                Err(e) => println!("Error: {}", e),
                            }
                        }
                    }
                    "adjust" => {
                        let dept_s = parts.next();
                        let step_s = parts.next();
                        let date_s = parts.next();
                        match (dept_s, step_s, date_s) {
                            (Some(dept_s), Some(step_s), Some(date_s)) => {
                                let parsed = dept_s.parse::<Department>().and_then(|department| {
                                    Ok((
                                        department,
                                        step_s.parse::<Step>()?,
                                        parse_date(date_s)?,
                                    ))
                                });
                                match parsed {
                                    Ok((department, step, date)) => {
                                        match active.adjust_current(department, step, date) {
                                            Ok(adjustment) if adjustment.is_shifted() => {
                                                println!("Adjusted {} / {}.", department, step);
                                                if let Some(current) = active.current() {
                                                    print_schedule(
                                                        &current.style_number,
                                                        &current.schedule,
                                                    );
                                                }
                                            }
                                            Ok(adjustment) => {
                                                println!("Adjustment ignored: {:?}", adjustment)
                                            }
                                            Err(e) => println!("Error: {}", e),
                                        }
                                    }
                                    Err(e) => println!("Error: {}", e),
                                }
                            }
                            _ => println!("Usage: adjust <department> <step> <YYYY-MM-DD>"),
                        }
                    }
                    "export" => {
                        let fmt = parts.next();
                        let path = parts.next();
                        match (fmt, path) {
                            (Some("timeline"), Some(path)) => match active.timeline_rows() {
                                Ok(rows) => match save_timeline_to_csv(&rows, path) {
                                    Ok(_) => println!("Timeline saved to {}.", path),
                                    Err(e) => println!("Error saving timeline: {}", e),
                                },
                                Err(e) => println!("Error: {}", e),
                            },
                            (Some(fmt @ ("json" | "csv")), Some(path)) => match active.current() {
                                Some(current) => {
                                    let result = if fmt == "json" {
                                        save_schedule_to_json(&current.schedule, path)
                                    } else {
                                        save_schedule_to_csv(&current.schedule, path)
                                    };
                                    match result {
                                        Ok(_) => println!("Schedule saved to {}.", path),
                                        Err(e) => println!("Error saving schedule: {}", e),
                                    }
                                }
                                None => println!("No schedule shown. Use 'schedule <n>' first."),
                            },
                            _ => println!("Usage: export <json|csv|timeline> <path>"),
                        }
                    }
                    "load" => match parts.next() {
                        Some(path) => {
                            let is_csv = Path::new(path)
                                .extension()
                                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
                            let loaded = if is_csv {
                                load_schedule_from_csv(path)
                            } else {
                                load_schedule_from_json(path)
                            };
                            match loaded {
                                Ok(schedule) => {
                                    println!("Schedule loaded from {}.", path);
                                    active.set_current(path, schedule);
                                    if let Some(current) = active.current() {
                                        print_schedule(&current.style_number, &current.schedule);
                                    }
                                }
                                Err(e) => println!("Error loading schedule: {}", e),
                            }
                        }
                        None => println!("Usage: load <path>"),
                    },
                    "departments" => match parts.next().map(str::parse::<Department>) {
                        Some(Ok(department)) => match active.department_timeline(department) {
                            Ok(df) => println!("{}", render_text_table(&df)),
                            Err(e) => println!("Error: {}", e),
                        },
                        Some(Err(e)) => println!("Error: {}", e),
                        None => println!("Usage: departments <department>"),
                    },
                    _ => println!("Unknown command. Type 'help'."),
                }
            }
        }
    }

    if let Some(active) = session.take() {
        if let Err(e) = active.close(store.as_ref()) {
            eprintln!("Error saving styles: {}", e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
