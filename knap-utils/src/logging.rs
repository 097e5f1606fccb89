use log::LevelFilter;
use once_cell::sync::Lazy;
use std::time::Instant;

pub static EPOCH: Lazy<Instant> = Lazy::new(Instant::now);

/// Installs a stderr logger that prefixes every record with its level, the
/// time elapsed since [`EPOCH`] and the emitting thread.
pub fn init_logger(level_filter: LevelFilter) -> anyhow::Result<()> {
    Lazy::force(&EPOCH);
    fern::Dispatch::new()
        .format(|out, message, record| {
            let handle = std::thread::current();
            let thread_name = handle.name().unwrap_or("-");

            let duration = EPOCH.elapsed();
            let sec = duration.as_secs() % 60;
            let min = (duration.as_secs() / 60) % 60;
            let hours = (duration.as_secs() / 60) / 60;

            let prefix = format!(
                "[{}] [{:0>2}:{:0>2}:{:0>2}] <{}>",
                record.level(),
                hours,
                min,
                sec,
                thread_name,
            );

            out.finish(format_args!("{:<27}{}", prefix, message))
        })
        .level(level_filter)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}
