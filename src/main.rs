use pickup_hours::commands::{Command, USAGE};
use pickup_hours::startup;
use tracing::{debug, info};

fn main() -> miette::Result<()> {
    // Configuration first, it carries the log filter
    let config = startup::load_config()?;
    startup::init_logging(&config.log_filter)?;

    info!("Starting pickup_hours");

    let command = match Command::parse(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", USAGE);
            return Err(e.into());
        }
    };
    debug!("Running {:?}", command);

    let output = command.run(&config)?;
    println!("{}", output);

    Ok(())
}
