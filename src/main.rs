/* 3rd party libraries */
use clap::Parser;
use log::{info, warn};
use std::io::{self, BufRead};
use std::thread::{Builder, JoinHandle};

/* Custom libraries */
use elevator_sim::config::{self, Config};
use elevator_sim::console::{self, ConsoleCommand};
use elevator_sim::{unwrap_or_exit, Dispatcher, FleetState};

/* Command line */
#[derive(Parser, Debug)]
#[clap(name = "elevator-sim", version, about = "Elevator dispatch simulator")]
struct Args {
    /// Path to the configuration file
    #[clap(short, long, default_value = "config.toml")]
    config: String,

    /// Number of floors, overrides the configuration file
    #[clap(long)]
    floors: Option<u8>,

    /// Number of elevators, overrides the configuration file
    #[clap(long)]
    elevators: Option<usize>,

    /// Milliseconds per single-floor step, overrides the configuration file
    #[clap(long)]
    tick_ms: Option<u64>,

    /// Comma separated floors to call; runs until the fleet is idle, then exits
    #[clap(long, value_delimiter = ',')]
    calls: Vec<u8>,

    /// Print the final fleet state of a scripted run as JSON
    #[clap(long)]
    json: bool,
}

/* Main */
fn main() {
    let args = Args::parse();

    // Load the configuration
    let config = config::load_config(&args.config).and_then(|config| apply_overrides(config, &args));
    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    let config = unwrap_or_exit!(config);

    // Start the simulation
    let dispatcher = unwrap_or_exit!(Dispatcher::start(&config.building, &config.elevator));

    // Print fleet activity until the controller goes away. A JSON run keeps
    // stdout for the snapshot alone.
    let printer = if args.json && !args.calls.is_empty() {
        None
    } else {
        let events = dispatcher.events();
        let printer_thread = Builder::new().name("event_printer".into());
        Some(unwrap_or_exit!(printer_thread.spawn(move || {
            for event in events.iter() {
                println!("{}", console::describe_event(&event));
            }
        })))
    };

    if args.calls.is_empty() {
        run_interactive(&dispatcher);
        dispatcher.shutdown();
        join_printer(printer);
    } else {
        let fleet = console::run_scripted(&dispatcher, &args.calls, config.elevator.tick());
        dispatcher.shutdown();
        join_printer(printer);

        let fleet = unwrap_or_exit!(fleet);
        if args.json {
            print_json(&fleet);
        } else {
            print!("{}", console::render_building(&fleet));
        }
    }

    info!("Simulation stopped");
}

fn apply_overrides(mut config: Config, args: &Args) -> Result<Config, config::ConfigError> {
    if let Some(floors) = args.floors {
        config.building.n_floors = floors;
    }
    if let Some(elevators) = args.elevators {
        config.building.n_elevators = elevators;
    }
    if let Some(tick_ms) = args.tick_ms {
        config.elevator.tick_ms = tick_ms;
    }
    config.validate()?;
    Ok(config)
}

fn run_interactive(dispatcher: &Dispatcher) {
    println!("{}", console::HELP);

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read input: {}", e);
                break;
            }
        };

        let command = match console::parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            ConsoleCommand::Call(floor) => {
                if let Err(e) = dispatcher.call_elevator(floor) {
                    println!("{}", e);
                }
            }
            ConsoleCommand::Status => {
                let fleet = unwrap_or_exit!(dispatcher.snapshot());
                print!("{}", console::render_building(&fleet));
            }
            ConsoleCommand::Json => print_json(&unwrap_or_exit!(dispatcher.snapshot())),
            ConsoleCommand::Help => println!("{}", console::HELP),
            ConsoleCommand::Quit => break,
        }
    }
}

// The printer ends once the controller has dropped its event sender
fn join_printer(printer: Option<JoinHandle<()>>) {
    if let Some(printer) = printer {
        if printer.join().is_err() {
            warn!("Event printer panicked");
        }
    }
}

fn print_json(fleet: &FleetState) {
    match console::fleet_json(fleet) {
        Ok(json) => println!("{}", json),
        Err(e) => warn!("Failed to serialize fleet state: {}", e),
    }
}
