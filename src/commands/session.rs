use anyhow::Result;
use colored::Colorize;
use irontrack::{
    SessionError, catalog,
    session::{self, SetField},
    utils::{BAR_WEIGHT, estimate_one_rm, format_clock, format_duration, format_plates, resolve_plates},
};

use super::{Ctx, confirm, fmt_kg, now_ms, zero_based};
use crate::cli::SessionCmd;

fn report(e: SessionError) {
    let hint = match e {
        SessionError::NoActiveSession => " — start one with `session start`",
        _ => "",
    };
    println!("{} {}{}", "error:".red().bold(), e, hint.dimmed());
}

pub async fn handle(cmd: SessionCmd, ctx: &mut Ctx) -> Result<()> {
    match cmd {
        SessionCmd::Start { routine, force } => {
            if let Some(active) = ctx.tracker.active() {
                if !force {
                    println!(
                        "{} there is already an active session ({}) — use --force to replace it",
                        "error:".red().bold(),
                        active.name
                    );
                    return Ok(());
                }
            }

            let started = match routine {
                Some(key) => match ctx.tracker.start_routine(&key, now_ms()) {
                    Ok(s) => s,
                    Err(e) => {
                        report(e);
                        return Ok(());
                    }
                },
                None => ctx.tracker.start(None, now_ms()),
            };
            let (name, id, count) = (started.name.clone(), started.id.clone(), started.exercises.len());

            if count > 0 {
                println!("{}", "Exercises:".cyan().bold());
                let state = ctx.tracker.state();
                let routine = state
                    .active_workout
                    .as_ref()
                    .and_then(|w| w.routine_id.as_deref())
                    .and_then(|rid| state.routines.iter().find(|r| r.id == rid));
                if let Some(routine) = routine {
                    for (i, re) in routine.exercises.iter().enumerate() {
                        let reps = if re.target_reps.is_empty() {
                            String::new()
                        } else {
                            format!(" ({})", re.target_reps)
                        };
                        println!(
                            "{} • {} — {} sets{}",
                            format!("{}", i + 1).yellow(),
                            state.exercise_name(&re.exercise_id).bold(),
                            re.target_sets,
                            reps
                        );
                    }
                }
            }

            println!("\n{} session `{}` started (id: {})", "ok:".green().bold(), name, id);
        }

        SessionCmd::Cancel { yes } => {
            if ctx.tracker.active().is_none() {
                report(SessionError::NoActiveSession);
                return Ok(());
            }
            if !confirm("discard the current session?", yes)? {
                println!("{} kept the session", "info:".blue().bold());
                return Ok(());
            }
            if let Some(dropped) = ctx.tracker.cancel() {
                println!("{} session cancelled (id: {})", "ok:".green().bold(), dropped.id);
            }
        }

        SessionCmd::Finish => match ctx.tracker.finish(now_ms()) {
            Ok(finished) => {
                ctx.play(&finished.signals);
                let w = &finished.workout;
                let minutes = w.duration().map(|d| d.num_minutes()).unwrap_or(0);
                println!("{} {}", "Session complete:".cyan().bold(), w.name.bold());
                println!("  {:<10} {} min", "duration".dimmed(), minutes);
                println!("  {:<10} {:.1}k kg", "volume".dimmed(), finished.volume / 1000.0);
                println!("  {:<10} {}", "records".dimmed(), w.records.len().to_string().green());
            }
            Err(e) => report(e),
        },

        SessionCmd::Show => show(ctx),

        SessionCmd::AddEx { exercise } => {
            let key = exercise.join(" ");
            let state = ctx.tracker.state();
            let found = match catalog::find_exercise(state, &key) {
                Ok(ex) => ex.id.clone(),
                Err(e) => {
                    report(e);
                    if let Some(s) = catalog::suggest_exercise(state, &key) {
                        println!("  did you mean `{}`?", s.name.green());
                    }
                    return Ok(());
                }
            };
            match ctx.tracker.add_exercise(&found) {
                Ok(()) => println!(
                    "{} added {}",
                    "ok:".green().bold(),
                    ctx.tracker.state().exercise_name(&found).bold()
                ),
                Err(e) => report(e),
            }
        }

        SessionCmd::RmEx { exercise, yes } => {
            let idx = zero_based(exercise, "Exercise")?;
            let Some(name) = ctx
                .tracker
                .active()
                .and_then(|w| w.exercises.get(idx))
                .map(|l| ctx.tracker.state().exercise_name(&l.exercise_id).to_string())
            else {
                match ctx.tracker.active() {
                    None => report(SessionError::NoActiveSession),
                    Some(w) => report(SessionError::ExerciseOutOfRange {
                        index: idx,
                        len: w.exercises.len(),
                    }),
                }
                return Ok(());
            };
            if !confirm(&format!("remove {name} from this session?"), yes)? {
                return Ok(());
            }
            match ctx.tracker.remove_exercise(idx) {
                Ok(()) => println!("{} removed {}", "ok:".green().bold(), name),
                Err(e) => report(e),
            }
        }

        SessionCmd::AddSet { exercise } => {
            let idx = zero_based(exercise, "Exercise")?;
            match ctx.tracker.add_set(idx) {
                Ok(()) => {
                    let sets = ctx.tracker.active().map(|w| w.exercises[idx].sets.len()).unwrap_or(0);
                    println!("{} added set {}-{}", "ok:".green().bold(), exercise, sets);
                }
                Err(e) => report(e),
            }
        }

        SessionCmd::RmSet { exercise, set } => {
            let (ex, st) = (zero_based(exercise, "Exercise")?, zero_based(set, "Set")?);
            match ctx.tracker.remove_set(ex, st) {
                Ok(()) => println!("{} removed set {}-{}", "ok:".green().bold(), exercise, set),
                Err(e) => report(e),
            }
        }

        SessionCmd::Set {
            exercise,
            set,
            field,
            value,
        } => {
            let (ex, st) = (zero_based(exercise, "Exercise")?, zero_based(set, "Set")?);
            let field = match SetField::parse(&field, &value) {
                Ok(f) => f,
                Err(e) => {
                    report(e);
                    return Ok(());
                }
            };
            let completes = matches!(field, SetField::Completed(true));
            match ctx.tracker.update_set(ex, st, field) {
                Ok(applied) => {
                    ctx.play(&applied.signals);
                    announce_record(ctx, &applied);
                    println!("{} updated set {}-{}", "ok:".green().bold(), exercise, set);
                    if completes && applied.started_rest() {
                        ctx.persist().await?;
                        super::timer::run(ctx).await?;
                    }
                }
                Err(e) => report(e),
            }
        }

        SessionCmd::Done {
            exercise,
            set,
            weight,
            reps,
            no_rest,
        } => {
            let (ex, st) = (zero_based(exercise, "Exercise")?, zero_based(set, "Set")?);
            let mut edits = Vec::new();
            if let Some(w) = weight {
                edits.push(SetField::parse("weight", &w)?);
            }
            if let Some(r) = reps {
                edits.push(SetField::parse("reps", &r)?);
            }
            edits.push(SetField::Completed(true));

            let mut rest = false;
            for field in edits {
                match ctx.tracker.update_set(ex, st, field) {
                    Ok(applied) => {
                        ctx.play(&applied.signals);
                        announce_record(ctx, &applied);
                        rest |= applied.started_rest();
                    }
                    Err(e) => {
                        report(e);
                        return Ok(());
                    }
                }
            }

            let logged = ctx
                .tracker
                .active()
                .map(|w| w.exercises[ex].sets[st].clone());
            if let Some(s) = logged {
                println!(
                    "{} set {}-{} done: {} × {}  {}",
                    "ok:".green().bold(),
                    exercise,
                    set,
                    fmt_kg(s.weight),
                    s.reps,
                    format!("(volume {:.1}k kg)", ctx.tracker.volume() / 1000.0).dimmed()
                );
            }

            if rest {
                if no_rest {
                    ctx.tracker.cancel_rest();
                } else {
                    ctx.persist().await?;
                    super::timer::run(ctx).await?;
                }
            }
        }

        SessionCmd::Undo { exercise, set } => {
            let (ex, st) = (zero_based(exercise, "Exercise")?, zero_based(set, "Set")?);
            match ctx.tracker.update_set(ex, st, SetField::Completed(false)) {
                Ok(_) => println!("{} set {}-{} reopened", "ok:".green().bold(), exercise, set),
                Err(e) => report(e),
            }
        }

        SessionCmd::Warmup { exercise, set } => {
            let (ex, st) = (zero_based(exercise, "Exercise")?, zero_based(set, "Set")?);
            let current = ctx
                .tracker
                .active()
                .and_then(|w| w.exercises.get(ex))
                .and_then(|l| l.sets.get(st))
                .map(|s| s.is_warmup)
                .unwrap_or(false);
            match ctx.tracker.update_set(ex, st, SetField::Warmup(!current)) {
                Ok(_) => println!(
                    "{} set {}-{} is {}",
                    "ok:".green().bold(),
                    exercise,
                    set,
                    if current { "a working set" } else { "a warmup" }
                ),
                Err(e) => report(e),
            }
        }

        SessionCmd::Note { exercise, note } => {
            let idx = zero_based(exercise, "Exercise")?;
            match ctx.tracker.note_exercise(idx, Some(note)) {
                Ok(()) => println!("{} note saved", "ok:".green().bold()),
                Err(e) => report(e),
            }
        }
    }

    Ok(())
}

fn announce_record(ctx: &Ctx, applied: &irontrack::tracker::Applied) {
    if let Some((exercise_id, weight, previous)) = applied.new_record() {
        let name = ctx.tracker.state().exercise_name(exercise_id);
        let previous = if previous > 0.0 {
            format!("previous best {}", fmt_kg(previous))
        } else {
            "first time logged".to_string()
        };
        println!(
            "{} {} {} {}",
            "PR:".yellow().bold(),
            name.bold(),
            fmt_kg(weight).green().bold(),
            format!("({previous})").dimmed()
        );
    }
}

fn show(ctx: &Ctx) {
    let tracker = &ctx.tracker;
    let state = tracker.state();
    let Some(workout) = tracker.active() else {
        report(SessionError::NoActiveSession);
        return;
    };

    let elapsed = (now_ms() - workout.start_time).max(0) / 1000;
    let (done, total) = session::progress(workout);
    println!(
        "{} {} (elapsed {}, {}/{} sets)",
        "Session:".cyan().bold(),
        workout.name.bold(),
        format_clock(elapsed as u64),
        done,
        total
    );
    println!(
        "{} {:.1}k kg",
        "Volume:".cyan().bold(),
        session::current_volume(workout) / 1000.0
    );
    if let Some(rest) = tracker.timer().remaining() {
        println!("{} {}", "Resting:".cyan().bold(), format_clock(rest as u64));
    }

    if workout.exercises.is_empty() {
        println!("\n{}", "  (no exercises yet — add one with `session add-ex`)".dimmed());
        return;
    }

    for (ex_idx, log) in workout.exercises.iter().enumerate() {
        let trophy = if workout.records.contains(&log.exercise_id) {
            " 🏆"
        } else {
            ""
        };
        println!(
            "\n{} {}{}",
            format!("{}.", ex_idx + 1).yellow(),
            state.exercise_name(&log.exercise_id).bold(),
            trophy
        );
        if let Some(note) = &log.notes {
            println!("   {}", note.dimmed());
        }

        for (set_idx, set) in log.sets.iter().enumerate() {
            let label = if set.is_warmup {
                "W".to_string()
            } else {
                (set_idx + 1).to_string()
            };
            let mark = if set.completed {
                "✔".green().to_string()
            } else {
                "·".dimmed().to_string()
            };
            let mut line = format!("   {} {:>2}  {} × {}", mark, label, fmt_kg(set.weight), set.reps);

            if let Some(rpe) = set.rpe {
                line.push_str(&format!(" @ RPE {rpe}"));
            }
            if set.completed && !set.is_warmup {
                let est = estimate_one_rm(set.weight, set.reps);
                if est > 0 {
                    line.push_str(&format!("  {}", format!("~{est}kg 1RM").dimmed()));
                }
            }
            if !set.completed {
                if let Some(ghost) = tracker.ghost(ex_idx, set_idx) {
                    line.push_str(&format!(
                        "  {}",
                        format!("last: {} × {}", fmt_kg(ghost.weight), ghost.reps).dimmed()
                    ));
                }
                if set.weight > BAR_WEIGHT {
                    line.push_str(&format!(
                        "  {}",
                        format!("plates/side: {}", format_plates(&resolve_plates(set.weight))).dimmed()
                    ));
                }
            }
            if let Some(n) = &set.notes {
                line.push_str(&format!(" - {n}"));
            }
            println!("{line}");
        }
    }

    if let Some(last) = state.history.first() {
        if let Some(d) = last.duration() {
            println!(
                "\n{} {} ({})",
                "Last session:".dimmed(),
                last.name.dimmed(),
                format_duration(d).dimmed()
            );
        }
    }
}
