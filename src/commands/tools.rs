use anyhow::Result;
use colored::Colorize;
use irontrack::utils::{
    BAR_WEIGHT, estimate_one_rm, format_plates, one_rm_table, parse_reps, parse_weight,
    resolve_plates,
};

use crate::cli::ToolsCmd;

pub async fn handle(cmd: ToolsCmd) -> Result<()> {
    match cmd {
        ToolsCmd::OneRm { weight, reps } => {
            let (w, r) = (parse_weight(&weight), parse_reps(&reps));
            let one_rm = estimate_one_rm(w, r);
            if one_rm == 0 {
                println!(
                    "{} weight and reps must both be greater than 0",
                    "warning:".yellow().bold()
                );
                return Ok(());
            }

            println!(
                "{} {} ({}kg × {}, Epley)",
                "Estimated 1RM:".cyan().bold(),
                format!("{one_rm}kg").bold(),
                w,
                r
            );
            for (pct, kg) in one_rm_table(one_rm) {
                println!("  {:>3}% {}", pct.to_string().yellow(), format!("{kg}kg").dimmed());
            }
        }

        ToolsCmd::Plates { total } => {
            let total = parse_weight(&total);
            let plates = resolve_plates(total);
            println!(
                "{} {}kg {}",
                "Plates per side for".cyan().bold(),
                total,
                format!("({BAR_WEIGHT}kg bar)").dimmed()
            );
            println!("  {}", format_plates(&plates).bold());

            let loaded = BAR_WEIGHT.max(BAR_WEIGHT + 2.0 * plates.iter().sum::<f64>());
            if total > BAR_WEIGHT && loaded < total {
                println!(
                    "  {} loads {}kg, {}kg short",
                    "note:".yellow().bold(),
                    loaded,
                    total - loaded
                );
            }
        }
    }

    Ok(())
}
