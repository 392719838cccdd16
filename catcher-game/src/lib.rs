pub mod catcher_environment;
pub mod random_agent;

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}
