use clap::Parser;
use limec_drv::{run, Cli, Config};

fn main() {
    let cli = Cli::parse();
    let config = Config::from(cli);

    match run(&config) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            let err: anyhow::Error = err.into();
            eprintln!("error: {err:?}");
            std::process::exit(1);
        }
    }
}
