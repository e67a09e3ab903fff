fn main() {
    env_logger::init();

    let config = match dotboy::parse_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = dotboy::run(config) {
        log::error!("{err:#}");
        eprintln!("dotboy: {err:#}");
        std::process::exit(1);
    }
}
