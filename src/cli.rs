use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "irontrack", version, about = "Workout tracker: sessions, rest timer, records")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Use this database file instead of the configured one.
    #[arg(global = true, long, value_name = "PATH")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Active workout commands
    #[command(subcommand, visible_alias = "s")]
    Session(SessionCmd),

    /// Run the rest countdown for the active session
    #[command(visible_alias = "t")]
    Timer {
        /// Seconds to rest (defaults to the configured rest time)
        seconds: Option<u32>,
    },

    /// One-rep-max and plate calculators
    #[command(subcommand)]
    Tools(ToolsCmd),

    /// Exercise catalog
    #[command(subcommand, visible_alias = "ex")]
    Exercise(ExerciseCmd),

    /// Routine templates
    #[command(subcommand, visible_alias = "r")]
    Routine(RoutineCmd),

    /// Body measurements
    #[command(subcommand, visible_alias = "m")]
    Measure(MeasureCmd),

    /// View or change app settings (sound, haptics, rest time)
    #[command(subcommand)]
    Settings(SettingsCmd),

    /// View or edit irontrack config
    #[command(subcommand)]
    Config(ConfigCmd),

    /// Snapshot export, import and reset
    #[command(subcommand)]
    Db(DbCmd),
}

//
// Commands
//

#[derive(Subcommand)]
pub enum SessionCmd {
    /// Start a session, optionally from a routine
    #[command(visible_alias = "s")]
    Start {
        /// Routine index (from `routine list`), id or name
        routine: Option<String>,

        /// Replace an already active session
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Discard the current session without saving it
    #[command(visible_alias = "c")]
    Cancel {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Finish the current session and move it to history
    #[command(visible_alias = "f")]
    Finish,

    /// Show current session details
    #[command(visible_alias = "i")]
    Show,

    /// Add an exercise to the current session
    #[command(visible_alias = "a")]
    AddEx {
        /// Exercise index (from `exercise list`), id or name
        exercise: Vec<String>,
    },

    /// Remove an exercise from the current session
    RmEx {
        /// 1-based exercise index
        exercise: usize,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Append a set, copying the previous one
    #[command(visible_alias = "as")]
    AddSet { exercise: usize },

    /// Remove a set
    RmSet { exercise: usize, set: usize },

    /// Set one field of a set - Usage: session set EX SET FIELD VALUE
    #[command(visible_alias = "e")]
    #[command(override_usage = "session set <EX> <SET> <weight|reps|rpe|notes|warmup|completed> <VALUE>")]
    Set {
        exercise: usize,
        set: usize,
        field: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Log a set: optionally set weight/reps, mark it done and rest
    #[command(visible_alias = "d")]
    Done {
        exercise: usize,
        set: usize,

        /// Weight in kg
        #[arg(long, short = 'w')]
        weight: Option<String>,

        /// Number of reps
        #[arg(long, short = 'r')]
        reps: Option<String>,

        /// Do not run the rest countdown
        #[arg(long)]
        no_rest: bool,
    },

    /// Mark a completed set as not done
    Undo { exercise: usize, set: usize },

    /// Toggle the warmup flag of a set
    #[command(visible_alias = "w")]
    Warmup { exercise: usize, set: usize },

    #[command(visible_alias = "n")]
    #[command(override_usage = "session note <EX_IDX> <NOTE_STRING>")]
    Note {
        /// 1-based index of the exercise (same order shown in `session show`)
        #[arg(value_name = "EX_IDX")]
        exercise: usize,

        /// Free-form text (empty clears it)
        #[arg(value_name = "NOTE_STRING")]
        note: String,
    },
}

#[derive(Subcommand)]
pub enum ToolsCmd {
    /// Estimated one-rep max (Epley)
    #[command(visible_alias = "1rm")]
    OneRm {
        #[arg(allow_hyphen_values = true)]
        weight: String,
        #[arg(allow_hyphen_values = true)]
        reps: String,
    },

    /// Plates per side for a total barbell weight (20kg bar)
    #[command(visible_alias = "p")]
    Plates {
        #[arg(allow_hyphen_values = true)]
        total: String,
    },
}

#[derive(Subcommand)]
pub enum ExerciseCmd {
    /// Add a custom exercise
    #[command(visible_alias = "a")]
    Add {
        /// Exercise name
        name: String,

        /// Muscle group
        #[arg(short, long)]
        muscle: String,

        /// Exercise description
        #[arg(short, long)]
        desc: Option<String>,
    },

    /// List exercises
    #[command(visible_alias = "l")]
    List {
        /// Filter by muscle group
        #[arg(short, long)]
        muscle: Option<String>,
    },

    /// Show description and tips
    #[command(visible_alias = "s")]
    Show {
        /// Exercise index, id or name
        exercise: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum RoutineCmd {
    /// Import routines from TOML files
    #[command(visible_alias = "i")]
    Import { files: Vec<String> },

    /// List routines
    #[command(visible_alias = "l")]
    List,

    /// Show a single routine in detail
    #[command(visible_alias = "s")]
    Show {
        /// Routine index (from `routine list`), id or name
        routine: String,
    },

    /// Delete a routine
    #[command(visible_alias = "d")]
    Delete {
        /// Routine index (from `routine list`), id or name
        routine: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum MeasureCmd {
    /// Record body weight (and optionally body fat %)
    #[command(visible_alias = "a")]
    Add {
        weight: String,

        #[arg(long, short = 'f')]
        body_fat: Option<String>,

        #[arg(long, short = 'n')]
        note: Option<String>,
    },

    /// List measurements, newest first
    #[command(visible_alias = "l")]
    List,

    /// Delete a measurement by id (a unique prefix is enough)
    #[command(visible_alias = "d")]
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum SettingsCmd {
    /// Show current settings
    Show,

    /// Set one of: sound, haptics, dark-mode, rest
    Set { key: String, val: String },

    /// Adjust the default rest time by a signed number of seconds
    Rest {
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },

    /// Flip between dark and light theme
    ToggleTheme,
}

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Show all config keys
    List,

    /// Get the value of a key
    Get { key: String },

    /// Set or override a key
    Set { key: String, val: String },

    /// Remove a key
    Unset { key: String },
}

#[derive(Subcommand)]
pub enum DbCmd {
    /// Export the whole snapshot as JSON
    Export {
        /// Output file path (defaults to irontrack-export.json)
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Replace the stored snapshot with a JSON export
    Import {
        /// Input JSON file path
        file: String,
    },

    /// Factory reset: erase history, routines and custom exercises
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
