use std::fs::File;
use std::io::{stdin, stdout, BufReader};

use ramdb::config::Config;
use ramdb::format::PlainTextSink;
use ramdb::session::Session;

fn init_logging(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() {
    let config = Config::parse_args();
    init_logging(&config.log_level);

    let mut session = Session::new();
    let mut sink = PlainTextSink::new(stdout());

    match config.script {
        Some(path) => {
            let file = File::open(&path).unwrap_or_else(|e| {
                eprintln!("[Error]  could not open {}: {e}", path.display());
                std::process::exit(1);
            });
            session.run(BufReader::new(file), None, &mut sink);
        }
        None => {
            println!("# Welcome to ramdb!");
            println!("# Input sql in one line.");
            println!("# Enter 'exit' or 'q' to quit this program.");
            session.run(stdin().lock(), Some(&mut stdout()), &mut sink);
            println!("# Bye~");
        }
    }
}
