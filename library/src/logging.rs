use log::LevelFilter;

pub fn init_logging() {
    let init_result = simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init();
    match init_result {
        Ok(_) => log::debug!("Logging initialized"),
        Err(e) => eprintln!("Failed to initialize logging: {}", e),
    }
}
