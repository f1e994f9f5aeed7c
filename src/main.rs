use waf_buildbot::{Dispatcher, cli, logging};

fn main() {
    logging::init();
    let argv: Vec<String> = std::env::args().collect();
    let mut dispatcher = Dispatcher::default();
    let code = cli::run(
        &argv,
        &mut dispatcher,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    );
    std::process::exit(code);
}
